pub mod builder;
pub mod config;
pub mod dlx;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod queue;
pub mod sudoku;

// Necessary to export the modules to be integration tested in 'tests'

//! The producer/worker pipeline that drives batch solving.
//!
//! Translates the source's raw-pointer `Buf` descriptors and
//! `thread_loop` workers directly: a bounded queue of `Batch` values
//! hands disjoint byte ranges of the memory-mapped input and output
//! files to a fixed pool of worker threads. Because batches never
//! overlap, workers write their slice of the output file with no
//! locking beyond the queue handoff itself.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::builder;
use crate::config::Config;
use crate::dlx::DlxMatrix;
use crate::error::SolverError;
use crate::io::{InputRegion, OutputRegion, INPUT_RECORD_LEN, OUTPUT_RECORD_LEN};
use crate::queue::BoundedQueue;
use crate::sudoku::parse_grid;

const NO_SOLUTION: &[u8] = b"No solution";

/// A contiguous run of `count` puzzles starting at `start_index`,
/// addressed as raw offsets into the shared input/output regions rather
/// than slices, since the regions outlive every worker and no two
/// batches ever address the same byte. `count == 0` is the shutdown
/// sentinel.
#[derive(Clone, Copy)]
struct Batch {
    input_ptr: *const u8,
    output_ptr: *mut u8,
    count: usize,
}

// Safety: batches are disjoint byte ranges by construction (the
// producer advances strictly by `count` records each time), so sending
// one across threads never aliases another live batch.
unsafe impl Send for Batch {}

fn shutdown_batch() -> Batch {
    Batch {
        input_ptr: std::ptr::null(),
        output_ptr: std::ptr::null_mut(),
        count: 0,
    }
}

/// Runs the full pipeline: opens and maps `input_path`/`output_path`,
/// spawns `config.workers` worker threads, partitions the input into
/// batches of `config.batch_size`, and blocks until every puzzle has
/// been solved and every worker has exited.
pub fn run(config: &Config, input_path: &Path, output_path: &Path) -> Result<(), SolverError> {
    let input = InputRegion::open(input_path)?;
    let (puzzle_count, mismatch) = crate::io::puzzle_count_and_mismatch(input.len());
    if mismatch {
        warn!(
            "input file size {} is not a whole number of {}-byte records",
            input.len(),
            INPUT_RECORD_LEN
        );
    }
    info!("solving {} puzzles", puzzle_count);

    let mut output = OutputRegion::create(output_path, puzzle_count)?;

    let input_base = input.as_ptr();
    let output_base = output.as_mut_ptr();

    let queue: Arc<BoundedQueue<Batch>> = Arc::new(BoundedQueue::new(config.queue_capacity));

    let handles: Vec<_> = (0..config.workers)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || worker_loop(&queue))
        })
        .collect();

    let mut produced = 0usize;
    let mut next_flush = config.flush_stride;
    while produced < puzzle_count {
        let count = config.batch_size.min(puzzle_count - produced);

        if let Some(b) = input.byte_at(produced * INPUT_RECORD_LEN + 81) {
            if b != b'\n' {
                warn!("record {} is not newline-terminated", produced);
            }
        }

        let batch = Batch {
            input_ptr: unsafe { input_base.add(produced * INPUT_RECORD_LEN) },
            output_ptr: unsafe { output_base.add(produced * OUTPUT_RECORD_LEN) },
            count,
        };
        queue.put(batch);
        produced += count;

        if produced >= next_flush {
            let safe_prefix = produced.saturating_sub(config.queue_capacity * config.batch_size);
            if let Err(e) = output.flush_async_prefix(safe_prefix * OUTPUT_RECORD_LEN) {
                warn!("asynchronous flush failed: {}", e);
            }
            next_flush += config.flush_stride;
        }
    }

    for _ in 0..config.workers {
        queue.put(shutdown_batch());
    }

    for h in handles {
        h.join().expect("worker thread panicked");
    }

    Ok(())
}

fn worker_loop(queue: &BoundedQueue<Batch>) {
    let mut matrix = DlxMatrix::new();
    loop {
        let batch = queue.take();
        if batch.count == 0 {
            break;
        }
        for i in 0..batch.count {
            unsafe {
                let input = std::slice::from_raw_parts(
                    batch.input_ptr.add(i * INPUT_RECORD_LEN),
                    81,
                );
                let output = std::slice::from_raw_parts_mut(
                    batch.output_ptr.add(i * OUTPUT_RECORD_LEN),
                    OUTPUT_RECORD_LEN,
                );
                solve_one(&mut matrix, input, output);
            }
        }
    }
}

/// Transcribes the puzzle, solves it, and writes the result record:
/// `input(81) ',' solution(81) '\n'`.
fn solve_one(matrix: &mut DlxMatrix, input: &[u8], output: &mut [u8]) {
    output[..81].copy_from_slice(input);
    output[81] = b',';
    output[OUTPUT_RECORD_LEN - 1] = b'\n';

    let grid = parse_grid(input);
    matrix.init();
    let base_depth = builder::build(matrix, &grid);

    if matrix.alg_x_itr_search(base_depth) {
        for &node in matrix.solution() {
            let row = matrix.row_of(node) as usize;
            let cell = row / 9;
            let digit = (row % 9 + 1) as u8 + b'0';
            output[82 + cell] = digit;
        }
    } else {
        output[82..82 + 81].fill(b' ');
        output[82..82 + NO_SOLUTION.len()].copy_from_slice(NO_SOLUTION);
    }
}

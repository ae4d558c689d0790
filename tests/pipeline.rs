use std::fs;
use std::io::Write;

use dlx_sudoku_solver::config::Config;
use dlx_sudoku_solver::io::OUTPUT_RECORD_LEN;
use dlx_sudoku_solver::pipeline;
use dlx_sudoku_solver::sudoku::{grid_is_valid, parse_grid};

const EASY: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";

fn write_input(lines: &[&str]) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut f = file.reopen().unwrap();
    for line in lines {
        writeln!(f, "{}", line).unwrap();
    }
    file
}

fn small_config() -> Config {
    Config {
        batch_size: 2,
        workers: 3,
        queue_capacity: 2,
        flush_stride: 4,
    }
}

#[test]
fn solves_a_single_easy_puzzle_end_to_end() {
    let input = write_input(&[EASY]);
    let output = tempfile::NamedTempFile::new().unwrap();

    pipeline::run(&small_config(), input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(bytes.len(), OUTPUT_RECORD_LEN);
    assert_eq!(&bytes[..81], EASY.as_bytes());
    assert_eq!(bytes[81], b',');
    assert_eq!(bytes[163], b'\n');

    let solved = parse_grid(&bytes[82..163]);
    assert!(grid_is_valid(&solved));
}

#[test]
fn reports_no_solution_for_contradictory_givens() {
    let mut bad = ['.'; 81];
    bad[0] = '1';
    bad[1] = '1';
    let puzzle: String = bad.iter().collect();

    let input = write_input(&[&puzzle]);
    let output = tempfile::NamedTempFile::new().unwrap();

    pipeline::run(&small_config(), input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(&bytes[82..82 + 11], b"No solution");
    assert_eq!(bytes[82 + 11], b' ');
    assert_eq!(bytes[163], b'\n');
}

#[test]
fn preserves_order_across_a_batch_boundary() {
    let empty = ".".repeat(81);
    let input = write_input(&[EASY, &empty, EASY, &empty, EASY]);
    let output = tempfile::NamedTempFile::new().unwrap();

    pipeline::run(&small_config(), input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(bytes.len(), OUTPUT_RECORD_LEN * 5);

    for i in 0..5 {
        let rec = &bytes[i * OUTPUT_RECORD_LEN..(i + 1) * OUTPUT_RECORD_LEN];
        let expected_input = if i % 2 == 0 { EASY.as_bytes() } else { empty.as_bytes() };
        assert_eq!(&rec[..81], expected_input, "record {} input mismatch", i);
        let solved = parse_grid(&rec[82..163]);
        assert!(grid_is_valid(&solved), "record {} is not a valid grid", i);
    }
}

#[test]
fn empty_input_file_produces_empty_output_file() {
    let input = tempfile::NamedTempFile::new().unwrap();
    let output = tempfile::NamedTempFile::new().unwrap();

    pipeline::run(&small_config(), input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert!(bytes.is_empty());
}

#[test]
fn already_solved_board_round_trips_unchanged() {
    let solved = "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
    let input = write_input(&[solved]);
    let output = tempfile::NamedTempFile::new().unwrap();

    pipeline::run(&small_config(), input.path(), output.path()).unwrap();

    let bytes = fs::read(output.path()).unwrap();
    assert_eq!(&bytes[82..163], solved.as_bytes());
}

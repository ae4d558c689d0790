//! Translates an 81-cell puzzle into DLX matrix rows, pruning candidates
//! by row/column masks and pre-covering the columns a given cell already
//! satisfies.

use crate::dlx::{DlxMatrix, BOX_COL, CELL_COL, COL_COL, ROW_COL};
use crate::sudoku::{compute_masks, Grid};

/// Builds `matrix` from `grid`, returning the search's base depth (the
/// number of givens pushed onto the solution stack before any branching).
/// The matrix must already have had `init()` called.
pub fn build(matrix: &mut DlxMatrix, grid: &Grid) -> usize {
    let masks = compute_masks(grid);
    let mut precover = [0u32; 324];
    let mut precover_len = 0usize;

    for i in 0..81 {
        let digit = grid[i];
        let mut candidates: u32 = if digit != 0 {
            1u32 << (digit - 1)
        } else {
            let mut c = 0x1FFu32;
            c &= !(masks.row[i / 9] as u32);
            c &= !(masks.col[i % 9] as u32);
            c
        };

        // A single candidate bit (given, or reduced to one by masks) means
        // this cell's value is already forced: no matrix row is needed,
        // only a placeholder for output transcription and four columns to
        // pre-cover.
        if candidates.count_ones() == 1 {
            let d = candidates.trailing_zeros() as usize; // 0-indexed digit
            let row = i * 9 + d;

            let cell_col = CELL_COL[row] as usize;
            let row_col = ROW_COL[row] as usize;
            let col_col = COL_COL[row] as usize;
            let box_col = BOX_COL[row] as usize;

            let placeholder = matrix.mark_given(cell_col, row);
            matrix.push_given(placeholder);

            for col in [cell_col, row_col, col_col, box_col] {
                precover[precover_len] = matrix.header_of(col);
                precover_len += 1;
            }
            continue;
        }

        while candidates != 0 {
            let d = candidates.trailing_zeros() as usize;
            candidates &= candidates - 1;

            let row = i * 9 + d;
            let n1 = matrix.insert(row, CELL_COL[row] as usize);
            let n2 = matrix.insert(row, ROW_COL[row] as usize);
            let n3 = matrix.insert(row, COL_COL[row] as usize);
            let n4 = matrix.insert(row, BOX_COL[row] as usize);
            matrix.link_row([n1, n2, n3, n4]);
        }
    }

    matrix.finalize_cols();

    // De-duplication is unnecessary: initial_cover on an already-pinned
    // header (count already 100) just re-walks an empty ring and re-pins.
    for &header in &precover[..precover_len] {
        matrix.initial_cover(header);
    }

    matrix.assign_column_headers();
    matrix.base_depth()
}

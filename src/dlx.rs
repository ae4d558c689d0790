//! Toroidal dancing-links matrix for a 9x9 exact-cover formulation of Sudoku.
//!
//! The classic implementation links `Node*` pointers into a cyclic
//! quadruply-linked structure. Here the pool is a flat `Vec<Node>` and
//! `u32` indices stand in for the pointers; "node at index i" replaces
//! "node at address p" everywhere below. Each of the 324 constraint
//! columns occupies a fixed 10-slot slab (header + up to 9 candidate
//! rows), so the header of column `c` always lives at `c * 10` and a
//! backtrack step can tell a header from a body node with nothing more
//! than an index check.

use once_cell::sync::Lazy;

pub const NUM_COLS: usize = 324;
const SLAB: usize = 10;
const NUM_BUCKETS: usize = 11;
const TOTAL_NODES: usize = NUM_COLS * SLAB + NUM_BUCKETS;

/// Candidate row `9*cell + digit - 1` hits exactly one column from each of
/// these four lookup tables, precomputed once and shared across every
/// worker thread's matrix.
pub static CELL_COL: Lazy<[u16; 729]> = Lazy::new(|| build_table(0));
pub static ROW_COL: Lazy<[u16; 729]> = Lazy::new(|| build_table(1));
pub static COL_COL: Lazy<[u16; 729]> = Lazy::new(|| build_table(2));
pub static BOX_COL: Lazy<[u16; 729]> = Lazy::new(|| build_table(3));

fn build_table(which: usize) -> [u16; 729] {
    let mut table = [0u16; 729];
    for i in 0..81 {
        let row_n = i / 9;
        let col_n = i % 9;
        let box_n = (row_n / 3) * 3 + col_n / 3;
        for d in 0..9 {
            let r = 9 * i + d;
            table[r] = match which {
                0 => i as u16,                     // cell i
                1 => (81 + row_n * 9 + d) as u16,   // row row_n, digit d
                2 => (162 + col_n * 9 + d) as u16,  // col col_n, digit d
                _ => (243 + box_n * 9 + d) as u16,  // box box_n, digit d
            };
        }
    }
    table
}

#[derive(Clone, Copy, Debug, Default)]
struct Node {
    row: u32,
    col: u32,
    count: u32,
    up: u32,
    down: u32,
    left: u32,
    right: u32,
}

#[inline]
fn header_idx(col: usize) -> u32 {
    (col * SLAB) as u32
}

#[inline]
fn bucket_idx(k: usize) -> u32 {
    (NUM_COLS * SLAB + k) as u32
}

#[inline]
fn is_header(idx: u32) -> bool {
    (idx as usize) < NUM_COLS * SLAB && (idx as usize) % SLAB == 0
}

/// One toroidal matrix, reused across puzzles by a single worker thread.
/// The node pool is allocated once; `init` resets headers, buckets, and
/// the solution pointer for the next puzzle without touching cell-node
/// contents (they are overwritten on the next round of `insert`s).
pub struct DlxMatrix {
    nodes: Vec<Node>,
    solution_stack: [u32; 81],
    solution_ptr: usize,
}

impl DlxMatrix {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default(); TOTAL_NODES],
            solution_stack: [0; 81],
            solution_ptr: 0,
        }
    }

    /// Clears all 324 column headers' counts, re-self-loops the 11
    /// count-bucket sentinels, and clears the solution pointer.
    pub fn init(&mut self) {
        for col in 0..NUM_COLS {
            self.nodes[header_idx(col) as usize].count = 0;
        }
        for k in 0..NUM_BUCKETS {
            let b = bucket_idx(k);
            self.nodes[b as usize].left = b;
            self.nodes[b as usize].right = b;
        }
        self.solution_ptr = 0;
    }

    /// Appends a new cell node at the next free slot of column `col`,
    /// linking it as the new bottom of that column's partial vertical
    /// chain. Returns the new node's index so the caller can stitch the
    /// four nodes of a candidate row into a horizontal cycle.
    pub fn insert(&mut self, row: usize, col: usize) -> u32 {
        let header = header_idx(col) as usize;
        let ptr = self.nodes[header].count as usize;
        let ante = header + ptr;
        let new_idx = header + ptr + 1;

        self.nodes[new_idx].row = row as u32;
        self.nodes[new_idx].col = col as u32;
        self.nodes[ante].down = new_idx as u32;
        self.nodes[new_idx].up = ante as u32;
        self.nodes[header].count += 1;

        new_idx as u32
    }

    /// Links four cell-node indices (cell, row, column, box) into a
    /// right-linked cycle of length 4: the candidate row for one (cell,
    /// digit) assignment.
    pub fn link_row(&mut self, ids: [u32; 4]) {
        for i in 0..4 {
            let cur = ids[i];
            let next = ids[(i + 1) % 4];
            self.nodes[cur as usize].right = next;
            self.nodes[next as usize].left = cur;
        }
    }

    /// Reserves the next free slot of column `col` and tags it with
    /// `row`, without linking it into the column's chain or bumping its
    /// count. Used for cells with a single candidate: no matrix row is
    /// ever inserted for them, but their chosen row still needs a place
    /// on the solution stack for output transcription. Safe because a
    /// column backing a single candidate never receives a real `insert`.
    pub fn mark_given(&mut self, col: usize, row: usize) -> u32 {
        let header = header_idx(col) as usize;
        let idx = header + self.nodes[header].count as usize + 1;
        self.nodes[idx].row = row as u32;
        idx as u32
    }

    /// Pushes a node already known to belong to the solution (a given
    /// cell's placeholder) onto the solution stack.
    pub fn push_given(&mut self, node: u32) {
        self.solution_stack[self.solution_ptr] = node;
        self.solution_ptr += 1;
    }

    /// Current depth of the solution stack; used by the builder as the
    /// search's base depth once all givens have been pushed.
    pub fn base_depth(&self) -> usize {
        self.solution_ptr
    }

    /// Closes each column's vertical chain into a ring. Columns with no
    /// inserts self-loop at their header.
    pub fn finalize_cols(&mut self) {
        for col in 0..NUM_COLS {
            let header = header_idx(col) as usize;
            let count = self.nodes[header].count as usize;
            if count == 0 {
                self.nodes[header].down = header as u32;
                self.nodes[header].up = header as u32;
            } else {
                let last = header + count;
                self.nodes[header].up = last as u32;
                self.nodes[last].down = header as u32;
            }
        }
    }

    /// A specialized pre-cover for columns with a known single candidate:
    /// pins `count` to a sentinel value above 9 (so `assign_column_headers`
    /// skips it) and vertically disconnects every sibling node in every
    /// row touching this column, without touching bucket membership.
    pub fn initial_cover(&mut self, header: u32) {
        self.nodes[header as usize].count = 100;
        let mut vert = self.nodes[header as usize].down;
        while vert != header {
            let mut horiz = self.nodes[vert as usize].right;
            while horiz != vert {
                self.unlink_v(horiz);
                let hh = header_idx(self.nodes[horiz as usize].col as usize);
                self.nodes[hh as usize].count -= 1;
                horiz = self.nodes[horiz as usize].right;
            }
            vert = self.nodes[vert as usize].down;
        }
    }

    /// Inserts every header with `count <= 9` into its matching count
    /// bucket. Headers pinned to 100 by `initial_cover` are skipped.
    pub fn assign_column_headers(&mut self) {
        for col in 0..NUM_COLS {
            let header = header_idx(col);
            let count = self.nodes[header as usize].count;
            if count <= 9 {
                self.link_h_after(header, bucket_idx(count as usize));
            }
        }
    }

    /// Scans buckets 0..9 in order and returns the first non-empty
    /// bucket's first member, or `None` if every column is covered.
    pub fn select_min_column(&self) -> Option<u32> {
        for k in 0..10 {
            let b = bucket_idx(k);
            let r = self.nodes[b as usize].right;
            if r != b {
                return Some(r);
            }
        }
        None
    }

    pub fn count(&self, header: u32) -> u32 {
        self.nodes[header as usize].count
    }

    pub fn header_of(&self, col: usize) -> u32 {
        header_idx(col)
    }

    pub fn row_of(&self, node: u32) -> u32 {
        self.nodes[node as usize].row
    }

    /// Covers the column that `node` belongs to: removes its header from
    /// its count bucket, then for every row still touching the column,
    /// vertically disconnects the row's other members from their own
    /// columns, decrementing and re-bucketing those columns as needed.
    pub fn cover(&mut self, node: u32) {
        let header = header_idx(self.nodes[node as usize].col as usize);
        self.unlink_h(header);

        let mut vert = self.nodes[header as usize].down;
        while vert != header {
            let mut horiz = self.nodes[vert as usize].right;
            while horiz != vert {
                self.unlink_v(horiz);
                let hh = header_idx(self.nodes[horiz as usize].col as usize);
                self.nodes[hh as usize].count -= 1;
                self.maybe_rebucket(hh);
                horiz = self.nodes[horiz as usize].right;
            }
            vert = self.nodes[vert as usize].down;
        }
    }

    /// Exact inverse of `cover`, applied in reverse order: reinserts the
    /// header into its current bucket first, then walks the column
    /// bottom-to-top reconnecting siblings right-to-left.
    pub fn uncover(&mut self, node: u32) {
        let header = header_idx(self.nodes[node as usize].col as usize);
        let hcount = self.nodes[header as usize].count;
        self.link_h_after(header, bucket_idx(hcount as usize));

        let mut vert = self.nodes[header as usize].up;
        while vert != header {
            let mut horiz = self.nodes[vert as usize].left;
            while horiz != vert {
                self.relink_v(horiz);
                let hh = header_idx(self.nodes[horiz as usize].col as usize);
                self.nodes[hh as usize].count += 1;
                self.maybe_rebucket(hh);
                horiz = self.nodes[horiz as usize].left;
            }
            vert = self.nodes[vert as usize].up;
        }
    }

    /// Re-buckets a column header by its new count, but only if it is
    /// still present in some bucket ring: the test
    /// `header.right.left == header` tells "currently bucketed" apart
    /// from "already covered" (whose horizontal links point elsewhere).
    fn maybe_rebucket(&mut self, header: u32) {
        let hr = self.nodes[header as usize].right;
        if self.nodes[hr as usize].left == header {
            let count = self.nodes[header as usize].count;
            self.rebucket_h(header, bucket_idx(count as usize));
        }
    }

    fn unlink_h(&mut self, idx: u32) {
        let l = self.nodes[idx as usize].left;
        let r = self.nodes[idx as usize].right;
        self.nodes[r as usize].left = l;
        self.nodes[l as usize].right = r;
    }

    fn link_h_after(&mut self, idx: u32, ante: u32) {
        let ar = self.nodes[ante as usize].right;
        self.nodes[idx as usize].right = ar;
        self.nodes[idx as usize].left = ante;
        self.nodes[ar as usize].left = idx;
        self.nodes[ante as usize].right = idx;
    }

    fn rebucket_h(&mut self, idx: u32, ante: u32) {
        self.unlink_h(idx);
        self.link_h_after(idx, ante);
    }

    fn unlink_v(&mut self, idx: u32) {
        let u = self.nodes[idx as usize].up;
        let d = self.nodes[idx as usize].down;
        self.nodes[d as usize].up = u;
        self.nodes[u as usize].down = d;
    }

    /// Inverse of `unlink_v`: `idx.up`/`idx.down` were only bypassed, never
    /// overwritten, so the neighbors can be pointed straight back at `idx`.
    fn relink_v(&mut self, idx: u32) {
        let u = self.nodes[idx as usize].up;
        let d = self.nodes[idx as usize].down;
        self.nodes[d as usize].up = idx;
        self.nodes[u as usize].down = idx;
    }

    /// Iterative Algorithm X: descends by covering the row at the current
    /// node and selecting the next minimum column, backtracks by
    /// uncovering in reverse order when a column is starved, and never
    /// pops the stack below `base_depth` (the prefix occupied by givens).
    /// Returns `true` with the solution stack holding 81 entries on
    /// success, `false` if no exact cover exists.
    pub fn alg_x_itr_search(&mut self, base_depth: usize) -> bool {
        let mut selected_col = match self.select_min_column() {
            Some(c) => c,
            None => return true,
        };
        if self.nodes[selected_col as usize].count == 0 {
            return false;
        }
        let mut vert_itr = self.nodes[selected_col as usize].down;

        loop {
            self.solution_stack[self.solution_ptr] = vert_itr;
            self.solution_ptr += 1;

            let mut h = vert_itr;
            loop {
                self.cover(h);
                h = self.nodes[h as usize].right;
                if h == vert_itr {
                    break;
                }
            }

            selected_col = match self.select_min_column() {
                None => return true,
                Some(c) => c,
            };
            if self.nodes[selected_col as usize].count > 0 {
                vert_itr = self.nodes[selected_col as usize].down;
                continue;
            }

            loop {
                if self.solution_ptr == base_depth {
                    return false;
                }
                self.solution_ptr -= 1;
                vert_itr = self.solution_stack[self.solution_ptr];

                let start = self.nodes[vert_itr as usize].left;
                let mut h = start;
                loop {
                    self.uncover(h);
                    h = self.nodes[h as usize].left;
                    if h == start {
                        break;
                    }
                }

                vert_itr = self.nodes[vert_itr as usize].down;
                if !is_header(vert_itr) {
                    break;
                }
            }
        }
    }

    pub fn solution(&self) -> &[u32] {
        &self.solution_stack[..self.solution_ptr]
    }
}

impl Default for DlxMatrix {
    fn default() -> Self {
        Self::new()
    }
}

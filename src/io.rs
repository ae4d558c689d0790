//! Opens, sizes, and memory-maps the input and output files. Treated as
//! an external collaborator by the design: argument defaulting and the
//! bit-exact textual format live here, while the solving core never
//! touches a file handle directly.

use std::fs::{File, OpenOptions};
use std::path::Path;

use memmap2::{Mmap, MmapMut};

use crate::error::SolverError;

pub const INPUT_RECORD_LEN: usize = 82;
pub const OUTPUT_RECORD_LEN: usize = 164;

/// A read-only view of the input file. `memmap2` refuses to map a
/// zero-length file, so an empty input is represented without a backing
/// `Mmap` at all -- `as_ptr()` is then never dereferenced because the
/// puzzle count is zero. Unmapping happens on `Drop`; a failure there
/// has nowhere to report to and is silently ignored, same as the
/// reference implementation's documented "report and ignore" policy for
/// a failed `munmap`.
pub struct InputRegion {
    mmap: Option<Mmap>,
    len: usize,
}

impl InputRegion {
    pub fn open(path: &Path) -> Result<Self, SolverError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len() as usize;
        let mmap = if len == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file)? })
        };
        Ok(Self { mmap, len })
    }

    pub fn as_ptr(&self) -> *const u8 {
        match &self.mmap {
            Some(m) => m.as_ptr(),
            None => std::ptr::null(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.mmap.as_ref().and_then(|m| m.get(offset).copied())
    }
}

/// A read-write view of the output file, pre-sized via `truncate` to
/// `OUTPUT_RECORD_LEN * puzzle_count` before mapping.
pub struct OutputRegion {
    mmap: Option<MmapMut>,
}

impl OutputRegion {
    pub fn create(path: &Path, puzzle_count: usize) -> Result<Self, SolverError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let size = (OUTPUT_RECORD_LEN * puzzle_count) as u64;
        file.set_len(size)?;

        let mmap = if puzzle_count == 0 {
            None
        } else {
            Some(unsafe { MmapMut::map_mut(&file)? })
        };
        Ok(Self { mmap })
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        match &mut self.mmap {
            Some(m) => m.as_mut_ptr(),
            None => std::ptr::null_mut(),
        }
    }

    /// Best-effort asynchronous flush hint over `[0, end)`. Failures are
    /// reported by the caller and otherwise ignored.
    pub fn flush_async_prefix(&self, end: usize) -> std::io::Result<()> {
        match &self.mmap {
            Some(m) if end > 0 => m.flush_async_range(0, end.min(m.len())),
            _ => Ok(()),
        }
    }
}

/// Validates that the input file size matches `82*N` or `82*N - 1`
/// (trailing newline optional), returning the puzzle count `N`. A
/// mismatch is reported by the caller and does not abort -- it's
/// returned alongside the best-effort count derived from truncating
/// division.
pub fn puzzle_count_and_mismatch(file_len: usize) -> (usize, bool) {
    if file_len == 0 {
        return (0, false);
    }
    let n = (file_len + 1) / INPUT_RECORD_LEN;
    let exact = n * INPUT_RECORD_LEN == file_len + 1 || n * INPUT_RECORD_LEN == file_len;
    (n, !exact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puzzle_count_accepts_both_newline_variants() {
        assert_eq!(puzzle_count_and_mismatch(82 * 5), (5, false));
        assert_eq!(puzzle_count_and_mismatch(82 * 5 - 1), (5, false));
        assert_eq!(puzzle_count_and_mismatch(82 * 5 + 3), (5, true));
        assert_eq!(puzzle_count_and_mismatch(0), (0, false));
    }
}

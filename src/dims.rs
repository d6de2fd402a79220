//! Launch geometry for map kernels.
//!
//! A map kernel runs one thread per list item, so the grid only has to cover the list: blocks of
//! [`BLOCK_SIZE`](constant.BLOCK_SIZE.html) threads, and enough of them to reach the last item.
//! Threads past the end of the list must check their index against the length themselves.

use crate::error::*;

/// Threads per block used for map kernels.
pub const BLOCK_SIZE: u32 = 1024;

/// Grid and block dimensions for a one-dimensional kernel launch.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LaunchDims {
    /// Number of blocks in each dimension.
    pub grid: (u32, u32, u32),
    /// Number of threads per block in each dimension.
    pub block: (u32, u32, u32),
}

impl LaunchDims {
    /// Computes the dimensions needed to give each of `len` items its own thread.
    ///
    /// ```
    /// use gpumap::dims::LaunchDims;
    ///
    /// let dims = LaunchDims::for_len(2500).unwrap();
    /// assert_eq!((3, 1, 1), dims.grid);
    /// assert_eq!((1024, 1, 1), dims.block);
    /// ```
    pub fn for_len(len: usize) -> PackResult<Self> {
        let block = BLOCK_SIZE as usize;
        let blocks = len / block + if len % block > 0 { 1 } else { 0 };
        if blocks > u32::MAX as usize {
            return Err(PackError::LengthOverflow { len });
        }
        let dims = LaunchDims {
            grid: (blocks as u32, 1, 1),
            block: (BLOCK_SIZE, 1, 1),
        };
        log::debug!("launch dims for {} items: {:?}", len, dims);
        Ok(dims)
    }

    /// Total number of threads the launch starts.
    pub fn threads(&self) -> u64 {
        let (gx, gy, gz) = self.grid;
        let (bx, by, bz) = self.block;
        u64::from(gx) * u64::from(gy) * u64::from(gz) * u64::from(bx) * u64::from(by) * u64::from(bz)
    }
}

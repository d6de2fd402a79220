//! gpumap-core is the device-side half of gpumap, intended to be used in kernel crates.
//!
//! It holds the types a map kernel touches directly: the integer [`RangeIterator`], the
//! [`DeviceList`] view over a length-prefixed item buffer, and the [`DeviceCopy`] marker shared
//! between host and device. Everything here is plain stack data; nothing allocates.
//!
//! ```
//! use gpumap_core::range_step;
//!
//! let mut it = range_step(10, 0, -3).unwrap();
//! let mut seen = [0i32; 4];
//! let mut n = 0;
//! while it.has_next() {
//!     seen[n] = it.advance();
//!     n += 1;
//! }
//! assert_eq!(seen, [10, 7, 4, 1]);
//! ```

#![no_std]
#![warn(
    missing_docs,
    missing_debug_implementations,
    unused_import_braces,
    unused_results,
    unused_qualifications
)]
#![allow(unknown_lints)]

mod memory;
pub use crate::memory::*;

pub mod list;
pub mod range;

pub use crate::list::{
    items_offset, len, DeviceList, DeviceRows, ListHeader, ListIterator, RowIterator, HEADER_SIZE,
};
pub use crate::range::{range, range_from, range_step, RangeError, RangeInt, RangeIterator};

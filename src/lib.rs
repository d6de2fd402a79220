//! gpumap prepares data for GPU map kernels and reads their results back.
//!
//! A map kernel runs one thread per item of an input list and writes one item of an output list.
//! This crate covers the host side of that exchange:
//!
//! - [`pack`](pack/index.html) lays slices out in the length-prefixed list format that
//!   [`DeviceList`](struct.DeviceList.html) views on the device, and unpacks kernel output.
//! - [`dims`](dims/index.html) computes the launch geometry for a list.
//!
//! The device half lives in `gpumap_core` and is re-exported here: the integer
//! [`RangeIterator`](struct.RangeIterator.html), the list views and iterators, and the
//! [`DeviceCopy`](trait.DeviceCopy.html) marker with its derive.
//!
//! gpumap does not allocate device memory or launch kernels; the byte buffers and dimensions it
//! produces are handed to whatever driver wrapper the application uses.
//!
//! ```
//! use gpumap::pack::{pack_list, unpack_list};
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, DeviceCopy)]
//! #[repr(C)]
//! struct Point {
//!     x: f32,
//!     y: f32,
//! }
//!
//! let points = vec![Point { x: 1.0, y: 2.0 }, Point { x: -3.0, y: 0.5 }];
//! let bytes = pack_list(&points).unwrap();
//!
//! // ... copy `bytes` to the device, run the kernel, copy them back ...
//!
//! let back: Vec<Point> = unsafe { unpack_list(&bytes, points.len()) }.unwrap();
//! assert_eq!(points, back);
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    unused_import_braces,
    unused_results,
    unused_qualifications
)]
#![allow(unknown_lints)]

pub mod dims;
pub mod error;
pub mod pack;
pub mod prelude;

mod derive_compile_fail;

pub use gpumap_core::*;
pub use gpumap_derive::DeviceCopy;

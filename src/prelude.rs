//! This module re-exports a number of commonly-used types for working with gpumap.
//!
//! This allows the user to `use gpumap::prelude::*;` and have the most commonly-used types
//! available quickly.

pub use crate::dims::LaunchDims;
pub use crate::error::{PackError, PackResult};
pub use crate::pack::{
    filter_by_flags, filter_list, output_flags, output_list, pack_list, pack_nested, project_size,
    ListLayout,
};
pub use crate::DeviceCopy;
pub use gpumap_core::{range, range_from, range_step, DeviceList, RangeIterator};

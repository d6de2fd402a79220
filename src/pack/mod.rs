//! Conversion between Rust slices and the list buffers kernels read and write.
//!
//! A map kernel receives its input as one flat allocation: an `i32` header with the item count,
//! padding up to the alignment of the item type, then the items back to back (see
//! [`ListLayout`](struct.ListLayout.html)). This module builds such buffers from host slices and
//! turns kernel output back into Rust values. It only deals in bytes; copying a buffer to and
//! from the device is up to the caller.
//!
//! # Input and output lists
//!
//! An input list is packed with [`pack_list`](fn.pack_list.html). Since kernels may modify their
//! input items in place, [`unpack_list_into`](fn.unpack_list_into.html) writes the returned buffer
//! back over the original values, after checking that the header still matches.
//!
//! An output list is sized with [`project_size`](fn.project_size.html) or created zeroed with
//! [`output_list`](fn.output_list.html). Kernels write only the items, never the header, so
//! [`unpack_list`](fn.unpack_list.html) takes the expected length from the caller instead of the
//! buffer.
//!
//! # Nested lists
//!
//! A rectangular list of lists is flattened row after row behind a single header holding the
//! inner length; see [`pack_nested`](fn.pack_nested.html).
//!
//! # Filters
//!
//! A filter kernel writes one `bool` per input item into [`output_flags`](fn.output_flags.html).
//! [`filter_list`](fn.filter_list.html) then keeps the input items whose flag is set.
//!
//! # Item types
//!
//! Items are copied as raw bytes, so only `DeviceCopy` types are accepted, and their layout must
//! be the one the kernel was compiled against. `#[derive(DeviceCopy)]` enforces `#[repr(C)]` for
//! that reason.

mod filter;
mod layout;
mod nested;

pub use self::filter::*;
pub use self::layout::*;
pub use self::nested::*;

use crate::error::*;
use gpumap_core::DeviceCopy;
use std::mem;
use std::ptr;

/// Packs `items` into a new list buffer.
///
/// ```
/// use gpumap::pack::{pack_list, read_header};
///
/// let bytes = pack_list(&[1.0f32, 2.0, 3.0]).unwrap();
/// assert_eq!(4 + 3 * 4, bytes.len());
/// assert_eq!(Ok(3), read_header(&bytes));
/// ```
pub fn pack_list<T: DeviceCopy>(items: &[T]) -> PackResult<Vec<u8>> {
    let layout = ListLayout::<T>::new(items.len())?;
    let mut bytes = vec![0u8; layout.size_in_bytes()];
    write_header(&mut bytes, layout.header());
    write_items(&mut bytes, layout.items_offset(), items);
    log::debug!(
        "packed {} items into {} bytes",
        layout.len(),
        layout.size_in_bytes()
    );
    Ok(bytes)
}

/// Creates a zeroed list buffer for `len` items, with the header already set to `len`.
pub fn output_list<T: DeviceCopy>(len: usize) -> PackResult<Vec<u8>> {
    let layout = ListLayout::<T>::new(len)?;
    let mut bytes = vec![0u8; layout.size_in_bytes()];
    write_header(&mut bytes, layout.header());
    log::debug!(
        "allocated output list of {} items ({} bytes)",
        len,
        layout.size_in_bytes()
    );
    Ok(bytes)
}

/// Reads `len` items out of a list buffer written by a kernel.
///
/// The header is not consulted, since kernels only write items. Bytes past the end of the layout
/// are ignored.
///
/// # Safety
///
/// Every item slot covered by the layout must hold a valid value of `T`, as written by
/// [`pack_list`](fn.pack_list.html) or by a kernel storing `T` values.
pub unsafe fn unpack_list<T: DeviceCopy>(bytes: &[u8], len: usize) -> PackResult<Vec<T>> {
    let layout = ListLayout::<T>::new(len)?;
    layout.check_fits(bytes)?;
    let mut items = Vec::with_capacity(len);
    read_items(bytes, layout.items_offset(), items.as_mut_ptr(), len);
    items.set_len(len);
    log::debug!("unpacked {} items from {} bytes", len, bytes.len());
    Ok(items)
}

/// Overwrites `dst` with the items of a list buffer, e.g. an input list after a kernel ran.
///
/// Fails with `LengthMismatch` unless the header equals `dst.len()`.
///
/// # Safety
///
/// The same requirements as [`unpack_list`](fn.unpack_list.html) apply.
pub unsafe fn unpack_list_into<T: DeviceCopy>(bytes: &[u8], dst: &mut [T]) -> PackResult<()> {
    let header = read_header(bytes)?;
    if header != dst.len() {
        return Err(PackError::LengthMismatch {
            header,
            expected: dst.len(),
        });
    }
    let layout = ListLayout::<T>::new(dst.len())?;
    layout.check_fits(bytes)?;
    read_items(bytes, layout.items_offset(), dst.as_mut_ptr(), dst.len());
    log::debug!("unpacked {} items in place", dst.len());
    Ok(())
}

/// Copies the raw bytes of `items` to `bytes[offset..]`.
fn write_items<T: DeviceCopy>(bytes: &mut [u8], offset: usize, items: &[T]) {
    let count = mem::size_of_val(items);
    let dst = bytes[offset..offset + count].as_mut_ptr();
    unsafe {
        ptr::copy_nonoverlapping(items.as_ptr() as *const u8, dst, count);
    }
}

/// Copies `len` items from `bytes[offset..]` into `dst`, which need not be initialized.
///
/// The caller has already checked that `bytes` covers the items.
unsafe fn read_items<T: DeviceCopy>(bytes: &[u8], offset: usize, dst: *mut T, len: usize) {
    let count = len * mem::size_of::<T>();
    let src = bytes[offset..offset + count].as_ptr();
    ptr::copy_nonoverlapping(src, dst as *mut u8, count);
}

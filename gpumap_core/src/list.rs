//! Device-side view of a length-prefixed list.
//!
//! A list arrives on the device as one contiguous allocation laid out like the C struct
//! `struct { int32_t length; T items[]; }`: an `i32` [`ListHeader`], padding up to the alignment of
//! `T`, then `length` items back to back. The host-side packer in `gpumap` produces exactly this
//! layout, using [`items_offset`] to place the first item.

use crate::memory::DeviceCopy;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Index, IndexMut};
use core::slice;

/// The `i32` item count at the front of every list buffer.
///
/// For nested lists it holds the length of each inner list instead.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct ListHeader {
    /// Number of items following the header.
    pub length: i32,
}

unsafe impl DeviceCopy for ListHeader {}

/// Size in bytes of [`ListHeader`].
pub const HEADER_SIZE: usize = mem::size_of::<ListHeader>();

/// Byte offset of the first item of a `T` list, measured from the start of the header.
pub const fn items_offset<T>() -> usize {
    let align = mem::align_of::<T>();
    (HEADER_SIZE + align - 1) / align * align
}

/// Reads a header, treating a negative count as an empty list.
fn header_len(header: ListHeader) -> usize {
    if header.length < 0 {
        0
    } else {
        header.length as usize
    }
}

/// Mutable view of the items of a list in device-accessible memory.
///
/// The view holds a pointer to the first item rather than a slice, so several views over one
/// list can coexist, one per kernel thread. Only the accessors that are called create references,
/// and `get`/`get_mut`/indexing reference a single item.
#[derive(Debug)]
pub struct DeviceList<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: DeviceCopy> DeviceList<'a, T> {
    /// Views items that are already available as a slice.
    pub fn from_slice(items: &'a mut [T]) -> Self {
        DeviceList {
            ptr: items.as_mut_ptr(),
            len: items.len(),
            _marker: PhantomData,
        }
    }

    /// Views the list whose header is at `header`.
    ///
    /// A negative length in the header yields an empty list. Every thread of a map kernel may
    /// call this on the same header; the views share the items.
    ///
    /// # Safety
    ///
    /// `header` must point to a live, suitably aligned list allocation laid out as described in
    /// the [module documentation](index.html), holding at least as many initialized `T` values as
    /// the header claims, for all of `'a`.
    ///
    /// While views over the same list are alive, an item written through one of them must not be
    /// read or written through any other at the same time. Threads that each touch only the item
    /// at their own index satisfy this. `as_slice`, `as_mut_slice`, `iter` and `iter_mut` touch
    /// every item.
    pub unsafe fn from_raw(header: *mut ListHeader) -> Self {
        let len = header_len(*header);
        let ptr = (header as *mut u8).add(items_offset::<T>()) as *mut T;
        DeviceList {
            ptr,
            len,
            _marker: PhantomData,
        }
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the item at `index`, or `None` if it is out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(unsafe { &*self.ptr.add(index) })
        } else {
            None
        }
    }

    /// Returns the item at `index` mutably, or `None` if it is out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(unsafe { &mut *self.ptr.add(index) })
        } else {
            None
        }
    }

    /// The items as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// The items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> ListIterator<'_, T> {
        ListIterator::new(self.as_slice())
    }

    /// Iterates over the items in order, allowing them to be modified.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<'a, T: DeviceCopy> Index<usize> for DeviceList<'a, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index {} out of bounds for list of {} items", index, self.len),
        }
    }
}

impl<'a, T: DeviceCopy> IndexMut<usize> for DeviceList<'a, T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index {} out of bounds for list of {} items", index, len),
        }
    }
}

impl<'l, 'a, T: DeviceCopy> IntoIterator for &'l DeviceList<'a, T> {
    type Item = &'l T;
    type IntoIter = ListIterator<'l, T>;

    fn into_iter(self) -> ListIterator<'l, T> {
        self.iter()
    }
}

/// Number of items in `list`.
pub fn len<T: DeviceCopy>(list: &DeviceList<'_, T>) -> usize {
    list.len()
}

/// Index cursor over the items of a [`DeviceList`].
#[derive(Clone, Debug)]
pub struct ListIterator<'a, T> {
    curr_idx: usize,
    items: &'a [T],
}

impl<'a, T> ListIterator<'a, T> {
    fn new(items: &'a [T]) -> Self {
        ListIterator { curr_idx: 0, items }
    }

    /// Returns true if there are items left.
    pub fn has_next(&self) -> bool {
        self.curr_idx < self.items.len()
    }

    /// Index of the item the next call to `next` returns.
    pub fn position(&self) -> usize {
        self.curr_idx
    }
}

impl<'a, T> Iterator for ListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.items.get(self.curr_idx)?;
        self.curr_idx += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.len() - self.curr_idx;
        (n, Some(n))
    }
}

impl<'a, T> ExactSizeIterator for ListIterator<'a, T> {}

impl<'a, T> FusedIterator for ListIterator<'a, T> {}

/// Mutable view of a nested list: `rows` inner lists, all of the same length.
///
/// The header of a nested list buffer stores the inner length; the number of rows is not in the
/// buffer and must come from the kernel's arguments. Like [`DeviceList`], the view holds a pointer
/// and references only the rows it is asked for.
#[derive(Debug)]
pub struct DeviceRows<'a, T> {
    ptr: *mut T,
    row_len: usize,
    rows: usize,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: DeviceCopy> DeviceRows<'a, T> {
    /// Splits `items` into rows of `row_len` items. A trailing partial row is not part of the view.
    pub fn from_slice(items: &'a mut [T], row_len: usize) -> Self {
        let rows = if row_len == 0 { 0 } else { items.len() / row_len };
        DeviceRows {
            ptr: items.as_mut_ptr(),
            row_len,
            rows,
            _marker: PhantomData,
        }
    }

    /// Views the nested list whose header is at `header`, holding `rows` inner lists.
    ///
    /// # Safety
    ///
    /// The same requirements as [`DeviceList::from_raw`] apply, with rows in place of items: the
    /// allocation must hold `rows * length` initialized items, where `length` is the value in the
    /// header, and a row written through one view must not be touched through another at the
    /// same time. `iter_rows` touches every row.
    pub unsafe fn from_raw(header: *mut ListHeader, rows: usize) -> Self {
        let row_len = header_len(*header);
        let ptr = (header as *mut u8).add(items_offset::<T>()) as *mut T;
        DeviceRows {
            ptr,
            row_len,
            rows,
            _marker: PhantomData,
        }
    }

    /// Length of every inner list.
    pub fn row_len(&self) -> usize {
        self.row_len
    }

    /// Number of inner lists.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns inner list `index`, or `None` if it is out of bounds.
    pub fn row(&self, index: usize) -> Option<&[T]> {
        if index >= self.rows {
            return None;
        }
        Some(unsafe { slice::from_raw_parts(self.ptr.add(index * self.row_len), self.row_len) })
    }

    /// Returns inner list `index` mutably, or `None` if it is out of bounds.
    pub fn row_mut(&mut self, index: usize) -> Option<&mut [T]> {
        if index >= self.rows {
            return None;
        }
        Some(unsafe {
            slice::from_raw_parts_mut(self.ptr.add(index * self.row_len), self.row_len)
        })
    }

    /// Iterates over the inner lists in order.
    pub fn iter_rows(&self) -> RowIterator<'_, T> {
        RowIterator {
            items: unsafe { slice::from_raw_parts(self.ptr, self.rows * self.row_len) },
            row_len: self.row_len,
            rows: self.rows,
            curr_row: 0,
        }
    }
}

/// Iterator over the inner lists of a [`DeviceRows`].
#[derive(Clone, Debug)]
pub struct RowIterator<'a, T> {
    items: &'a [T],
    row_len: usize,
    rows: usize,
    curr_row: usize,
}

impl<'a, T> Iterator for RowIterator<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        if self.curr_row >= self.rows {
            return None;
        }
        let start = self.curr_row * self.row_len;
        self.curr_row += 1;
        Some(&self.items[start..start + self.row_len])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rows - self.curr_row;
        (n, Some(n))
    }
}

impl<'a, T> ExactSizeIterator for RowIterator<'a, T> {}

impl<'a, T> FusedIterator for RowIterator<'a, T> {}

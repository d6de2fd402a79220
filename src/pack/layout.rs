use crate::error::*;
use gpumap_core::{items_offset, DeviceCopy, HEADER_SIZE};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

/// Byte layout of a list of `len` values of `T`, as read by [`DeviceList`] on the device.
///
/// The header sits at offset 0, the first item at [`items_offset`](#method.items_offset) and each
/// following item `size_of::<T>()` bytes further on.
///
/// ```
/// use gpumap::pack::ListLayout;
///
/// let layout = ListLayout::<f64>::new(3).unwrap();
/// assert_eq!(8, layout.items_offset());
/// assert_eq!(8 + 3 * 8, layout.size_in_bytes());
/// ```
///
/// [`DeviceList`]: ../../gpumap_core/list/struct.DeviceList.html
pub struct ListLayout<T> {
    len: usize,
    size_in_bytes: usize,
    _marker: PhantomData<T>,
}

impl<T: DeviceCopy> ListLayout<T> {
    /// Computes the layout of a list of `len` items.
    ///
    /// Fails with `LengthOverflow` if `len` cannot be stored in the `i32` header or the total size
    /// overflows `usize`.
    pub fn new(len: usize) -> PackResult<Self> {
        if len > i32::MAX as usize {
            return Err(PackError::LengthOverflow { len });
        }
        let size_in_bytes = len
            .checked_mul(mem::size_of::<T>())
            .and_then(|items| items.checked_add(items_offset::<T>()))
            .ok_or(PackError::LengthOverflow { len })?;
        log::trace!(
            "layout for {} x {} bytes: items at {}, {} bytes total",
            len,
            mem::size_of::<T>(),
            items_offset::<T>(),
            size_in_bytes
        );
        Ok(ListLayout {
            len,
            size_in_bytes,
            _marker: PhantomData,
        })
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value stored in the header.
    pub fn header(&self) -> i32 {
        // Bounded by `new`.
        self.len as i32
    }

    /// Byte offset of the first item.
    pub fn items_offset(&self) -> usize {
        items_offset::<T>()
    }

    /// Byte offset of item `index`. Does not check `index` against the length.
    pub fn item_offset(&self, index: usize) -> usize {
        items_offset::<T>() + index * mem::size_of::<T>()
    }

    /// Total number of bytes the packed list occupies.
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    /// Fails with `BufferTooShort` if `bytes` cannot hold this layout.
    pub(crate) fn check_fits(&self, bytes: &[u8]) -> PackResult<()> {
        if bytes.len() < self.size_in_bytes {
            Err(PackError::BufferTooShort {
                needed: self.size_in_bytes,
                actual: bytes.len(),
            })
        } else {
            Ok(())
        }
    }
}

impl<T> Clone for ListLayout<T> {
    fn clone(&self) -> Self {
        ListLayout {
            len: self.len,
            size_in_bytes: self.size_in_bytes,
            _marker: PhantomData,
        }
    }
}

impl<T> Copy for ListLayout<T> {}

impl<T> PartialEq for ListLayout<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
    }
}

impl<T> Eq for ListLayout<T> {}

impl<T> fmt::Debug for ListLayout<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ListLayout")
            .field("len", &self.len)
            .field("size_in_bytes", &self.size_in_bytes)
            .finish()
    }
}

/// Number of bytes a packed list of `len` items of `T` occupies.
///
/// This is what a caller allocates on the device for a kernel's output list.
pub fn project_size<T: DeviceCopy>(len: usize) -> PackResult<usize> {
    ListLayout::<T>::new(len).map(|layout| layout.size_in_bytes())
}

/// Reads the item count from the header at the start of `bytes`.
///
/// Fails with `BufferTooShort` if there is no complete header and `NegativeLength` if the header
/// is negative.
pub fn read_header(bytes: &[u8]) -> PackResult<usize> {
    if bytes.len() < HEADER_SIZE {
        return Err(PackError::BufferTooShort {
            needed: HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    let mut raw = [0u8; HEADER_SIZE];
    raw.copy_from_slice(&bytes[..HEADER_SIZE]);
    let length = i32::from_ne_bytes(raw);
    if length < 0 {
        Err(PackError::NegativeLength(length))
    } else {
        Ok(length as usize)
    }
}

pub(crate) fn write_header(bytes: &mut [u8], length: i32) {
    bytes[..HEADER_SIZE].copy_from_slice(&length.to_ne_bytes());
}

#[cfg(test)]
mod test {
    use super::*;

    #[repr(C)]
    #[derive(Clone, Copy)]
    struct Body {
        pos: [f32; 3],
        mass: f64,
    }
    unsafe impl DeviceCopy for Body {}

    #[test]
    fn test_layout_of_plain_ints() {
        let layout = ListLayout::<i32>::new(5).unwrap();
        assert_eq!(5, layout.len());
        assert_eq!(5, layout.header());
        assert_eq!(4, layout.items_offset());
        assert_eq!(4 + 2 * 4, layout.item_offset(2));
        assert_eq!(24, layout.size_in_bytes());
    }

    #[test]
    fn test_layout_pads_to_item_alignment() {
        let layout = ListLayout::<Body>::new(2).unwrap();
        assert_eq!(8, layout.items_offset());
        assert_eq!(8 + mem::size_of::<Body>(), layout.item_offset(1));
        assert_eq!(8 + 2 * 24, layout.size_in_bytes());
    }

    #[test]
    fn test_empty_layout_is_header_only() {
        let layout = ListLayout::<u8>::new(0).unwrap();
        assert!(layout.is_empty());
        assert_eq!(4, layout.size_in_bytes());
        assert_eq!(Ok(8), project_size::<f64>(0));
    }

    #[test]
    fn test_length_overflow() {
        let too_long = i32::MAX as usize + 1;
        assert_eq!(
            Err(PackError::LengthOverflow { len: too_long }),
            ListLayout::<u8>::new(too_long)
        );
        assert_eq!(Ok(4 + i32::MAX as usize), project_size::<u8>(i32::MAX as usize));
    }

    #[test]
    fn test_read_header() {
        let mut bytes = [0u8; 8];
        write_header(&mut bytes, 7);
        assert_eq!(Ok(7), read_header(&bytes));

        write_header(&mut bytes, -3);
        assert_eq!(Err(PackError::NegativeLength(-3)), read_header(&bytes));

        assert_eq!(
            Err(PackError::BufferTooShort {
                needed: 4,
                actual: 3
            }),
            read_header(&bytes[..3])
        );
    }

    #[test]
    fn test_check_fits() {
        let layout = ListLayout::<u16>::new(3).unwrap();
        assert_eq!(Ok(()), layout.check_fits(&[0u8; 10]));
        assert_eq!(
            Err(PackError::BufferTooShort {
                needed: 10,
                actual: 9
            }),
            layout.check_fits(&[0u8; 9])
        );
    }
}

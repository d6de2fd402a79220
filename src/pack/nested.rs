use super::{read_items, write_items, ListLayout};
use crate::error::*;
use crate::pack::layout::{read_header, write_header};
use gpumap_core::DeviceCopy;

/// Returns the common inner length of `lists`, or `RaggedList` at the first list that differs.
fn row_len<T, L: AsRef<[T]>>(lists: &[L]) -> PackResult<usize> {
    let expected = lists.first().map_or(0, |l| l.as_ref().len());
    for (index, list) in lists.iter().enumerate() {
        let found = list.as_ref().len();
        if found != expected {
            return Err(PackError::RaggedList {
                index,
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// Layout of the flattened items plus the header value, which is the inner length.
fn nested_layout<T: DeviceCopy>(rows: usize, row_len: usize) -> PackResult<(ListLayout<T>, i32)> {
    let total = rows
        .checked_mul(row_len)
        .ok_or(PackError::LengthOverflow { len: rows })?;
    let layout = ListLayout::<T>::new(total)?;
    // row_len <= total unless there are no rows, in which case it is 0.
    let header = if rows == 0 { 0 } else { row_len as i32 };
    Ok((layout, header))
}

/// Packs a rectangular list of lists into a single buffer.
///
/// The rows are stored one after another behind a header holding the *inner* length; the number
/// of rows is not stored and must be passed to the kernel separately. Fails with `RaggedList` if
/// the inner lists differ in length.
///
/// ```
/// use gpumap::pack::{pack_nested, read_header};
///
/// let grid = vec![vec![1u32, 2, 3], vec![4, 5, 6]];
/// let bytes = pack_nested(&grid).unwrap();
/// assert_eq!(Ok(3), read_header(&bytes));
/// assert_eq!(4 + 6 * 4, bytes.len());
/// ```
pub fn pack_nested<T: DeviceCopy, L: AsRef<[T]>>(lists: &[L]) -> PackResult<Vec<u8>> {
    let inner = row_len::<T, L>(lists)?;
    let (layout, header) = nested_layout::<T>(lists.len(), inner)?;
    let mut bytes = vec![0u8; layout.size_in_bytes()];
    write_header(&mut bytes, header);
    for (row, list) in lists.iter().enumerate() {
        write_items(&mut bytes, layout.item_offset(row * inner), list.as_ref());
    }
    log::debug!(
        "packed {} x {} nested items into {} bytes",
        lists.len(),
        inner,
        layout.size_in_bytes()
    );
    Ok(bytes)
}

/// Overwrites the inner lists of `dst` with the rows of a nested list buffer.
///
/// `dst` must be rectangular and its inner length must equal the header, otherwise this fails
/// with `RaggedList` or `LengthMismatch` and leaves `dst` untouched.
///
/// # Safety
///
/// Every item slot covered by the layout must hold a valid value of `T`.
pub unsafe fn unpack_nested_into<T: DeviceCopy, L: AsMut<[T]> + AsRef<[T]>>(
    bytes: &[u8],
    dst: &mut [L],
) -> PackResult<()> {
    let inner = row_len::<T, L>(dst)?;
    let header = read_header(bytes)?;
    if !dst.is_empty() && header != inner {
        return Err(PackError::LengthMismatch {
            header,
            expected: inner,
        });
    }
    let (layout, _) = nested_layout::<T>(dst.len(), inner)?;
    layout.check_fits(bytes)?;
    for (row, list) in dst.iter_mut().enumerate() {
        read_items(
            bytes,
            layout.item_offset(row * inner),
            list.as_mut().as_mut_ptr(),
            inner,
        );
    }
    log::debug!("unpacked {} x {} nested items in place", dst.len(), inner);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use gpumap_core::{DeviceRows, ListHeader};

    #[test]
    fn test_pack_nested_flattens_rows() {
        let grid = [[1i32, 2], [3, 4], [5, 6]];
        let bytes = pack_nested(&grid).unwrap();
        assert_eq!(Ok(2), read_header(&bytes));
        let flat = unsafe { crate::pack::unpack_list::<i32>(&bytes, 6) }.unwrap();
        assert_eq!(vec![1, 2, 3, 4, 5, 6], flat);
    }

    #[test]
    fn test_pack_nested_rejects_ragged() {
        let lists = vec![vec![1u8, 2], vec![3, 4], vec![5]];
        assert_eq!(
            Err(PackError::RaggedList {
                index: 2,
                expected: 2,
                found: 1
            }),
            pack_nested(&lists)
        );
    }

    #[test]
    fn test_pack_nested_empty() {
        let lists: Vec<Vec<f32>> = vec![];
        let bytes = pack_nested(&lists).unwrap();
        assert_eq!(4, bytes.len());
        assert_eq!(Ok(0), read_header(&bytes));
    }

    #[test]
    fn test_unpack_nested_into() {
        let mut lists = vec![vec![0.0f64; 3], vec![0.0; 3]];
        let source = vec![vec![1.0f64, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let bytes = pack_nested(&source).unwrap();
        unsafe { unpack_nested_into(&bytes, &mut lists) }.unwrap();
        assert_eq!(source, lists);
    }

    #[test]
    fn test_unpack_nested_into_header_mismatch() {
        let bytes = pack_nested(&[[1u32, 2, 3]]).unwrap();
        let mut lists = vec![vec![0u32; 2]];
        assert_eq!(
            Err(PackError::LengthMismatch {
                header: 3,
                expected: 2
            }),
            unsafe { unpack_nested_into(&bytes, &mut lists) }
        );
        assert_eq!(vec![vec![0u32; 2]], lists);
    }

    #[test]
    fn test_unpack_nested_into_rejects_ragged_dst() {
        let bytes = pack_nested(&[[1i16, 2], [3, 4], [5, 6]]).unwrap();
        let mut lists = vec![vec![0i16; 2], vec![0; 2], vec![0; 3]];
        assert_eq!(
            Err(PackError::RaggedList {
                index: 2,
                expected: 2,
                found: 3
            }),
            unsafe { unpack_nested_into(&bytes, &mut lists) }
        );
        assert_eq!(vec![vec![0i16; 2], vec![0; 2], vec![0; 3]], lists);
    }

    #[test]
    fn test_nested_overflow_reports_row_count() {
        let rows = usize::max_value() / 2 + 1;
        assert_eq!(
            Err(PackError::LengthOverflow { len: rows }),
            nested_layout::<u8>(rows, 2).map(|(layout, _)| layout.len())
        );
    }

    #[test]
    fn test_device_rows_reads_packed_nested() {
        let grid = vec![vec![10u64, 11], vec![20, 21], vec![30, 31]];
        let bytes = pack_nested(&grid).unwrap();

        // Host buffers are only byte aligned; copy into u64 storage as a device allocation would.
        let mut storage = vec![0u64; (bytes.len() + 7) / 8];
        unsafe {
            std::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                storage.as_mut_ptr() as *mut u8,
                bytes.len(),
            );
        }
        let rows =
            unsafe { DeviceRows::<u64>::from_raw(storage.as_mut_ptr() as *mut ListHeader, 3) };
        assert_eq!(2, rows.row_len());
        let collected: Vec<&[u64]> = rows.iter_rows().collect();
        assert_eq!(vec![&[10u64, 11][..], &[20, 21][..], &[30, 31][..]], collected);
    }
}

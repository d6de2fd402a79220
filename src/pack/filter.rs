use super::unpack_list;
use crate::error::*;

/// Keeps the items whose flag is set, in their original order.
///
/// This is the host half of a filter: a map kernel decides per item, and the host gathers the
/// survivors. Fails with `LengthMismatch` unless there is exactly one flag per item.
///
/// ```
/// use gpumap::pack::filter_by_flags;
///
/// let kept = filter_by_flags(&[3, 8, 5, 12], &[false, true, false, true]).unwrap();
/// assert_eq!(vec![8, 12], kept);
/// ```
pub fn filter_by_flags<T: Clone>(items: &[T], flags: &[bool]) -> PackResult<Vec<T>> {
    if flags.len() != items.len() {
        return Err(PackError::LengthMismatch {
            header: flags.len(),
            expected: items.len(),
        });
    }
    let kept: Vec<T> = items
        .iter()
        .zip(flags)
        .filter(|&(_, &keep)| keep)
        .map(|(item, _)| item.clone())
        .collect();
    log::debug!("filter kept {} of {} items", kept.len(), items.len());
    Ok(kept)
}

/// Creates the zeroed output list a filter kernel writes one `bool` per item into.
pub fn output_flags(len: usize) -> PackResult<Vec<u8>> {
    super::output_list::<bool>(len)
}

/// Keeps the items of `items` whose flag in the kernel output `flag_bytes` is set.
///
/// `flag_bytes` is an output list of `items.len()` flags, as created by
/// [`output_flags`](fn.output_flags.html). Each flag is read as a byte and any nonzero value
/// counts as true, so bytes that are not a valid `bool` cannot cause undefined behavior.
pub fn filter_list<T: Clone>(items: &[T], flag_bytes: &[u8]) -> PackResult<Vec<T>> {
    // bool and u8 share a layout, and every byte is a valid u8.
    let raw: Vec<u8> = unsafe { unpack_list::<u8>(flag_bytes, items.len()) }?;
    let flags: Vec<bool> = raw.iter().map(|&b| b != 0).collect();
    filter_by_flags(items, &flags)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pack::{pack_list, read_header};
    use gpumap_core::DeviceCopy;

    #[derive(Clone, Copy, Debug, PartialEq)]
    #[repr(C)]
    struct Sample {
        value: f32,
        weight: f32,
    }
    unsafe impl DeviceCopy for Sample {}

    #[test]
    fn test_filter_by_flags_keeps_order() {
        let items = ["a", "b", "c", "d", "e"];
        let flags = [true, false, true, true, false];
        assert_eq!(Ok(vec!["a", "c", "d"]), filter_by_flags(&items, &flags));
    }

    #[test]
    fn test_filter_by_flags_length_mismatch() {
        assert_eq!(
            Err(PackError::LengthMismatch {
                header: 2,
                expected: 3
            }),
            filter_by_flags(&[1, 2, 3], &[true, true])
        );
    }

    #[test]
    fn test_filter_nothing_and_everything() {
        let empty: [u8; 0] = [];
        assert_eq!(Ok(vec![]), filter_by_flags(&empty, &[]));
        assert_eq!(Ok(vec![]), filter_by_flags(&[1, 2], &[false, false]));
        assert_eq!(Ok(vec![1, 2]), filter_by_flags(&[1, 2], &[true, true]));
    }

    #[test]
    fn test_output_flags_layout() {
        let bytes = output_flags(6).unwrap();
        assert_eq!(Ok(6), read_header(&bytes));
        assert_eq!(4 + 6, bytes.len());
        assert!(bytes[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_filter_list_reads_kernel_output() {
        let items: Vec<Sample> = (0..5)
            .map(|i| Sample {
                value: i as f32,
                weight: 1.0,
            })
            .collect();
        let mut flag_bytes = output_flags(items.len()).unwrap();
        // A kernel keeping the even values; any nonzero byte counts as true.
        flag_bytes[4] = 1;
        flag_bytes[6] = 0xff;
        flag_bytes[8] = 1;
        let kept = filter_list(&items, &flag_bytes).unwrap();
        assert_eq!(vec![items[0], items[2], items[4]], kept);
    }

    #[test]
    fn test_filter_list_short_buffer() {
        let flag_bytes = pack_list(&[true, false]).unwrap();
        assert_eq!(
            Err(PackError::BufferTooShort {
                needed: 7,
                actual: 6
            }),
            filter_list(&[1u64, 2, 3], &flag_bytes)
        );
    }
}

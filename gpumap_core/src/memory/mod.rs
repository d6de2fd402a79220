use core::marker::PhantomData;
use core::num::*;

/// Marker trait for values which can be moved between host and device as raw bytes.
///
/// A type is `DeviceCopy` if duplicating its bits produces an equivalent value and it holds no
/// reference into host-only memory. The host-side packer writes `DeviceCopy` items straight into
/// the list buffer a kernel reads, and reads kernel output back the same way, so the layout of the
/// type must also be fixed (`#[repr(C)]`, `#[repr(transparent)]` or a primitive).
///
/// ## Implementing DeviceCopy
///
/// Prefer `#[derive(DeviceCopy)]` from the `gpumap` crate, which checks every field and the
/// `repr` of the type. It can also be implemented by hand, in which case the implementor vouches
/// for the layout:
///
/// ```
/// use gpumap_core::DeviceCopy;
///
/// #[derive(Clone)]
/// #[repr(C)]
/// struct Pair(i32, i32);
///
/// unsafe impl DeviceCopy for Pair {}
/// ```
///
/// ## Relation to `Copy`
///
/// `DeviceCopy` does not imply `Copy`; large item types need not be implicitly copied on every
/// assignment. It is stricter in the other direction: `&T`, raw pointers into host memory and
/// anything implementing `Drop` must never be `DeviceCopy`.
///
/// `Option<T>` is only `DeviceCopy` for the `NonZero*` integers, where the niche guarantees it
/// has the same layout as the integer with `None` stored as zero. For other `T` the position of
/// the discriminant is unspecified, so a kernel could not read it.
pub unsafe trait DeviceCopy {}

macro_rules! impl_device_copy {
    ($($t:ty)*) => {
        $(
            unsafe impl DeviceCopy for $t {}
        )*
    }
}

impl_device_copy!(
    usize u8 u16 u32 u64 u128
    isize i8 i16 i32 i64 i128
    f32 f64
    bool char

    NonZeroU8 NonZeroU16 NonZeroU32 NonZeroU64 NonZeroU128
    NonZeroI8 NonZeroI16 NonZeroI32 NonZeroI64 NonZeroI128

    Option<NonZeroU8> Option<NonZeroU16> Option<NonZeroU32> Option<NonZeroU64> Option<NonZeroU128>
    Option<NonZeroI8> Option<NonZeroI16> Option<NonZeroI32> Option<NonZeroI64> Option<NonZeroI128>
);
unsafe impl DeviceCopy for () {}
unsafe impl<T: ?Sized + DeviceCopy> DeviceCopy for PhantomData<T> {}
unsafe impl<T: DeviceCopy> DeviceCopy for Wrapping<T> {}
unsafe impl<T: DeviceCopy, const N: usize> DeviceCopy for [T; N] {}

macro_rules! impl_device_copy_tuple {
    ($(($($name:ident),+))*) => {
        $(
            unsafe impl<$($name: DeviceCopy),+> DeviceCopy for ($($name,)+) {}
        )*
    }
}

impl_device_copy_tuple! {
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
    (A, B, C, D, E)
    (A, B, C, D, E, F)
    (A, B, C, D, E, F, G)
    (A, B, C, D, E, F, G, H)
}

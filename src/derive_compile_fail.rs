//! This module is a dummy module. It contains doctests that should fail to compile. It's used for
//! testing the DeviceCopy custom-derive macro and should not contain any actual code.
//!
//! Fields that cannot be copied to the device:
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(C)]
//! struct ShouldFailTuple(Vec<u64>);
//! ```
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(C)]
//! struct ShouldFailStruct<'a> {
//!     v: &'a u64,
//! }
//! ```
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(u8)]
//! enum ShouldFailStructEnum {
//!     Unit,
//!     Struct { v: Vec<u64> },
//! }
//! ```
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Copy, Clone, DeviceCopy)]
//! #[repr(C)]
//! union ShouldFailUnion {
//!     u: *const u64,
//!     o: *const i64,
//! }
//! ```
//!
//! `Option` of anything but a `NonZero*` integer has no fixed layout:
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(C)]
//! struct ShouldFailOptionField {
//!     id: Option<u32>,
//! }
//! ```
//!
//! Types without a fixed layout:
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! struct ShouldFailNoRepr {
//!     x: f32,
//!     y: f32,
//! }
//! ```
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(packed)]
//! struct ShouldFailPackedOnly {
//!     x: u8,
//!     y: u32,
//! }
//! ```
//!
//! ```compile_fail
//! use gpumap::DeviceCopy;
//!
//! #[derive(Clone, DeviceCopy)]
//! #[repr(transparent)]
//! enum ShouldFailTransparentEnum {
//!     Only(u32),
//! }
//! ```

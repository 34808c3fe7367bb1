//! Backend interfacing.
//!
//! Backends implement the traits of this module. They are `unsafe` to implement and to call: the
//! safe wrappers of this crate are responsible for upholding the invariants a backend relies on
//! (a representation is only ever used with the backend that created it, the context is used from
//! a single thread, etc.).

pub mod pipeline;
pub mod shader;
pub mod tess;
pub mod texture;

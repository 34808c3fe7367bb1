//! OpenGL backends.
//!
//! This crate exports the [OpenGL](https://www.khronos.org/opengl/) 3.3 backend of lucent. The
//! OpenGL function pointers must be loaded (e.g. with `gl::load_with`) and a context must be
//! current on the calling thread before [`GL33::new`] is called; surface crates such as
//! `lucent-glfw` do both for you.

pub mod gl33;

pub use gl33::GL33;

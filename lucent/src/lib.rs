//! # A small, explicit graphics layer for learning OpenGL
//!
//! lucent wraps the handful of driver objects the introductory rendering programs need (shader
//! programs, vertex arrays and textures) in owned Rust values. Every object is released when its
//! value is dropped and every failure is returned as a typed error instead of being printed and
//! forgotten.
//!
//! # What’s included?
//!
//! - **Shader programs**: [`shader::Program`] compiles a vertex and a fragment stage, links them and
//!   gives you a handle you can activate and write uniforms to. A failed build never hands you a
//!   program: you get a [`shader::ProgramError`] telling you which stage failed and why (with the
//!   driver log), or that the program failed to link, or that a source file couldn’t be read.
//! - **Tessellations**: [`tess::Tess`] owns a vertex array object plus its buffers and knows how to
//!   issue its single draw call.
//! - **Textures**: [`texture::Texture`] uploads raw RGB / RGBA texels to a 2D texture.
//! - **Pipeline state**: clearing and viewport control, see [`pipeline`].
//!
//! # Graphics context and bindings
//!
//! A graphics API such as OpenGL carries a lot of hidden global state: the currently used program,
//! the bound vertex array, the bound texture of each unit, the viewport… lucent makes that state
//! explicit. Everything goes through a value implementing [`context::GraphicsContext`], and every
//! operation that replaces a binding returns the previous one as a [`binding::Handle`] so that you
//! can restore it if you need to.
//!
//! # Backends
//!
//! This crate doesn’t talk to any driver by itself. The [`backend`] module defines the traits a
//! backend must implement; `lucent-gl` provides the OpenGL 3.3 implementation and
//! `lucent-headless` a recording implementation that needs no GPU.

#![deny(missing_docs)]

pub mod backend;
pub mod binding;
pub mod context;
pub mod pipeline;
pub mod shader;
pub mod tess;
pub mod texture;

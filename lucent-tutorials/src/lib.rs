//! lucent tutorials.
//!
//! This crate provides the introductory rendering programs, in the order they build on each other:
//!
//! 1. [`hello_triangle`]: a single orange triangle, shaders compiled from strings.
//! 2. [`two_triangles`]: two triangles, each one with its own vertex array.
//! 3. [`colored_triangle`]: interleaved positions and colors, shaders loaded from files and a
//!    uniform written every frame.
//! 4. [`textured_quad`]: an indexed quad sampling a texture.
//!
//! # Tutorial architecture
//!
//! Tutorials are simple modules exposed from this crate. They do not depend on any platform-specific
//! concepts, such as system events or windows. Whenever a tutorial requires something from the
//! outside world (input, files), an abstract type from this crate is used and the platform code
//! running the tutorial provides it.
//!
//! Tutorials are generic over the backend ([`TutorialBackend`]) so that the same code runs on
//! `lucent-gl` in the desktop binary and on `lucent-headless` in tests.
//!
//! # Error handling
//!
//! Bootstrapping a tutorial returns a [`TutorialError`] if any of its resources cannot be created.
//! A texture that cannot be fetched is not an error: it is logged and replaced by a placeholder.

use lucent::backend::pipeline::Pipeline as PipelineBackend;
use lucent::backend::shader::{Shader, Uniformable};
use lucent::backend::tess::Tess as TessBackend;
use lucent::backend::texture::Texture as TextureBackend;
use lucent::context::GraphicsContext;
use lucent::shader::ProgramError;
use lucent::tess::TessError;
use lucent::texture::TextureError;
use std::{error, fmt, path::PathBuf};

pub mod colored_triangle;
pub mod hello_triangle;
mod shared;
pub mod textured_quad;
pub mod two_triangles;

/// Backend features the tutorials need.
///
/// This is not a real trait alias, but a type system trick that brings all of the traits in scope
/// whenever this one is used as a bound.
pub trait TutorialBackend:
  Shader + Uniformable<f32> + Uniformable<i32> + TessBackend + TextureBackend + PipelineBackend
{
}

impl<B> TutorialBackend for B where
  B: Shader + Uniformable<f32> + Uniformable<i32> + TessBackend + TextureBackend + PipelineBackend
{
}

/// Tutorial interface.
pub trait Tutorial<B>: Sized
where
  B: TutorialBackend,
{
  /// Create all the resources of the tutorial.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> Result<Self, TutorialError>;

  /// Handle the input actions of this iteration and render a frame.
  fn render_frame(
    &mut self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> LoopFeedback;
}

/// A type used to pass “inputs” to tutorials.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Framebuffer size changed.
  Resized {
    /// New width of the framebuffer.
    width: u32,
    /// New height of the framebuffer.
    height: u32,
  },
}

/// Whether the render loop should keep going.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback {
  /// Render another frame.
  Continue,
  /// Stop the loop.
  Exit,
}

/// Services a platform provides to tutorials.
pub trait PlatformServices {
  /// Error returned when a texture cannot be fetched.
  type FetchError: error::Error;

  /// Path of a shader source file.
  fn shader_path(&self, name: &str) -> PathBuf;

  /// Fetch and decode a texture.
  ///
  /// The first row of the returned image is the bottom row of the texture.
  fn fetch_texture(&mut self, name: &str) -> Result<image::RgbImage, Self::FetchError>;
}

/// Error that can occur while bootstrapping a tutorial.
#[non_exhaustive]
#[derive(Debug)]
pub enum TutorialError {
  /// The shader program couldn’t be built.
  Program(ProgramError),
  /// A tessellation couldn’t be built.
  Tess(TessError),
  /// A texture couldn’t be created.
  Texture(TextureError),
}

impl fmt::Display for TutorialError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TutorialError::Program(ref e) => write!(f, "shader program error: {}", e),
      TutorialError::Tess(ref e) => write!(f, "tessellation error: {}", e),
      TutorialError::Texture(ref e) => write!(f, "texture error: {}", e),
    }
  }
}

impl error::Error for TutorialError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TutorialError::Program(e) => Some(e),
      TutorialError::Tess(e) => Some(e),
      TutorialError::Texture(e) => Some(e),
    }
  }
}

impl From<ProgramError> for TutorialError {
  fn from(e: ProgramError) -> Self {
    TutorialError::Program(e)
  }
}

impl From<TessError> for TutorialError {
  fn from(e: TessError) -> Self {
    TutorialError::Tess(e)
  }
}

impl From<TextureError> for TutorialError {
  fn from(e: TextureError) -> Self {
    TutorialError::Texture(e)
  }
}

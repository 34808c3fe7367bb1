//! Shader API.
//!
//! A [`Program`] is the linked combination of a vertex and a fragment [`Stage`]. Building one goes
//! through the following steps:
//!
//! 1. The sources are loaded, either from strings or from files ([`ShaderSource`]). A file that
//!    cannot be read yields [`ProgramError::ResourceNotFound`].
//! 2. Both stages are compiled. Stages are compiled independently: if the vertex stage fails, the
//!    fragment stage is still compiled, so that a single build reports every broken stage at once
//!    ([`ProgramError::StageErrors`]).
//! 3. If both stages compiled, they are linked into a program. A link failure yields
//!    [`ProgramError::LinkFailed`] along with the driver log.
//! 4. The compiled stages are released as soon as linking has been attempted.
//!
//! Every failure is also reported to the [`log`] facade with a fixed-format tag (see
//! [`StageError::tag`] and [`ProgramError::tag`]).
//!
//! There is no such thing as a “failed program” value: if you hold a [`Program`], it’s linked and
//! you can [`activate`](Program::activate) it and write its uniforms.

use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::backend::shader::{Shader, Uniformable};
use crate::binding::Handle;
use crate::context::GraphicsContext;

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl StageType {
  // name used in diagnostic tags
  fn tag_name(self) -> &'static str {
    match self {
      StageType::VertexShader => "VERTEX",
      StageType::FragmentShader => "FRAGMENT",
    }
  }
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that shader stages can emit.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// Occurs when a shader fails to compile. Carries the driver log.
  CompilationFailed(StageType, String),
}

impl StageError {
  /// Create a compilation error.
  pub fn compilation_failed(ty: StageType, reason: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, reason.into())
  }

  /// Type of the stage that failed.
  pub fn stage_type(&self) -> StageType {
    match *self {
      StageError::CompilationFailed(ty, _) => ty,
    }
  }

  /// Driver diagnostic log.
  pub fn log(&self) -> &str {
    match *self {
      StageError::CompilationFailed(_, ref log) => log,
    }
  }

  /// Fixed-format diagnostic tag, e.g. `ERROR::SHADER::VERTEX::COMPILATION_FAILED`.
  pub fn tag(&self) -> String {
    match *self {
      StageError::CompilationFailed(ty, _) => {
        format!("ERROR::SHADER::{}::COMPILATION_FAILED", ty.tag_name())
      }
    }
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ref ty, ref r) => write!(f, "{} compilation error: {}", ty, r),
    }
  }
}

impl error::Error for StageError {}

/// Errors that a [`Program`] can generate.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// The source of a stage could not be read.
  ResourceNotFound {
    /// Stage the source was meant for.
    stage: StageType,
    /// Path that was read.
    path: PathBuf,
    /// Underlying I/O error.
    source: io::Error,
  },
  /// One or more stages failed to compile. Ordered vertex first; never empty.
  StageErrors(Vec<StageError>),
  /// Program link failed. You can inspect the reason by looking at the contained `String`.
  LinkFailed(String),
}

impl ProgramError {
  /// Create a link error.
  pub fn link_failed(reason: impl Into<String>) -> Self {
    ProgramError::LinkFailed(reason.into())
  }

  /// Compilation error of the given stage, if that stage failed to compile.
  pub fn stage_error(&self, ty: StageType) -> Option<&StageError> {
    match *self {
      ProgramError::StageErrors(ref errors) => errors.iter().find(|e| e.stage_type() == ty),
      _ => None,
    }
  }

  /// Fixed-format diagnostic tag of the (first) failure.
  pub fn tag(&self) -> String {
    match *self {
      ProgramError::ResourceNotFound { .. } => "ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ".to_owned(),
      ProgramError::StageErrors(ref errors) => errors
        .first()
        .map(StageError::tag)
        .unwrap_or_else(|| "ERROR::SHADER::COMPILATION_FAILED".to_owned()),
      ProgramError::LinkFailed(_) => "ERROR::SHADER::PROGRAM::LINKING_FAILED".to_owned(),
    }
  }
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::ResourceNotFound {
        ref stage,
        ref path,
        ref source,
      } => write!(
        f,
        "cannot read {} source {}: {}",
        stage,
        path.display(),
        source
      ),

      ProgramError::StageErrors(ref errors) => {
        f.write_str("shader program has stage errors")?;

        for e in errors {
          write!(f, "\n  {}", e)?;
        }

        Ok(())
      }

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::ResourceNotFound { source, .. } => Some(source),
      ProgramError::StageErrors(errors) => errors
        .first()
        .map(|e| e as &(dyn error::Error + 'static)),
      ProgramError::LinkFailed(_) => None,
    }
  }
}

/// Warnings related to uniform issues.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UniformWarning {
  /// Inactive uniform (not in use / no participation to the final output in shaders).
  Inactive(String),
  /// Type mismatch between the requested type and the type reflected from the program.
  TypeMismatch(String, UniformType),
}

impl UniformWarning {
  /// Create an inactive uniform warning.
  pub fn inactive<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::Inactive(name.into())
  }

  /// Create a type mismatch.
  pub fn type_mismatch<N>(name: N, ty: UniformType) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::TypeMismatch(name.into(), ty)
  }
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformWarning::Inactive(ref s) => write!(f, "inactive {} uniform", s),

      UniformWarning::TypeMismatch(ref n, ref t) => {
        write!(f, "type mismatch for uniform {}: {}", n, t)
      }
    }
  }
}

impl error::Error for UniformWarning {}

/// Type of a uniform.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UniformType {
  /// 32-bit signed integer. Also used to select the texture unit of a sampler.
  Int,
  /// 32-bit unsigned integer.
  UInt,
  /// 32-bit floating-point number.
  Float,
  /// Boolean.
  Bool,
  /// 2D floating-point vector.
  Vec2,
  /// 3D floating-point vector.
  Vec3,
  /// 4D floating-point vector.
  Vec4,
}

impl fmt::Display for UniformType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformType::Int => f.write_str("int"),
      UniformType::UInt => f.write_str("uint"),
      UniformType::Float => f.write_str("float"),
      UniformType::Bool => f.write_str("bool"),
      UniformType::Vec2 => f.write_str("vec2"),
      UniformType::Vec3 => f.write_str("vec3"),
      UniformType::Vec4 => f.write_str("vec4"),
    }
  }
}

/// A resolved uniform location.
///
/// An index of `-1` denotes a location the backend silently ignores.
#[derive(Debug)]
pub struct Uniform<T>
where
  T: ?Sized,
{
  index: i32,
  _t: PhantomData<*const T>,
}

impl<T> Uniform<T>
where
  T: ?Sized,
{
  /// Wrap a backend location.
  ///
  /// # Unsafety
  ///
  /// The index must come from the backend the uniform will be used with.
  pub unsafe fn new(index: i32) -> Self {
    Uniform {
      index,
      _t: PhantomData,
    }
  }

  /// Backend location.
  pub fn index(&self) -> i32 {
    self.index
  }
}

/// Vertex and fragment sources of a program.
///
/// Sources are read once and never change afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderSource {
  vertex: String,
  fragment: String,
}

impl ShaderSource {
  /// Sources from strings.
  pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
    ShaderSource {
      vertex: vertex.into(),
      fragment: fragment.into(),
    }
  }

  /// Read both sources from disk, vertex first.
  ///
  /// The first file that cannot be read is reported as [`ProgramError::ResourceNotFound`].
  pub fn from_files(
    vertex: impl AsRef<Path>,
    fragment: impl AsRef<Path>,
  ) -> Result<Self, ProgramError> {
    let vertex = read_stage_source(StageType::VertexShader, vertex.as_ref())?;
    let fragment = read_stage_source(StageType::FragmentShader, fragment.as_ref())?;

    Ok(ShaderSource { vertex, fragment })
  }

  /// Vertex shader source.
  pub fn vertex(&self) -> &str {
    &self.vertex
  }

  /// Fragment shader source.
  pub fn fragment(&self) -> &str {
    &self.fragment
  }

  /// Source of the given stage.
  pub fn stage(&self, ty: StageType) -> &str {
    match ty {
      StageType::VertexShader => &self.vertex,
      StageType::FragmentShader => &self.fragment,
    }
  }
}

fn read_stage_source(stage: StageType, path: &Path) -> Result<String, ProgramError> {
  fs::read_to_string(path).map_err(|source| {
    let err = ProgramError::ResourceNotFound {
      stage,
      path: path.to_owned(),
      source,
    };

    log::error!("{}\n{}", err.tag(), err);
    err
  })
}

/// A compiled shader stage.
///
/// The driver object is released when the stage is dropped.
pub struct Stage<S>
where
  S: ?Sized + Shader,
{
  repr: S::StageRepr,
  ty: StageType,
}

impl<S> Stage<S>
where
  S: ?Sized + Shader,
{
  /// Compile a stage.
  pub fn new<C, R>(ctx: &mut C, ty: StageType, src: R) -> Result<Self, StageError>
  where
    C: GraphicsContext<Backend = S>,
    R: AsRef<str>,
  {
    unsafe {
      ctx
        .backend()
        .new_stage(ty, src.as_ref())
        .map(|repr| Stage { repr, ty })
    }
  }

  /// Type of this stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

/// A linked shader program.
///
/// The driver object is released when the program is dropped.
pub struct Program<S>
where
  S: ?Sized + Shader,
{
  repr: S::ProgramRepr,
}

impl<S> Program<S>
where
  S: ?Sized + Shader,
{
  /// Link two compiled stages.
  pub fn from_stages<C>(
    ctx: &mut C,
    vertex: &Stage<S>,
    fragment: &Stage<S>,
  ) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    let repr = unsafe { ctx.backend().new_program(&vertex.repr, &fragment.repr) };

    match repr {
      Ok(repr) => {
        let program = Program { repr };
        log::debug!("shader program {} linked", program.handle());
        Ok(program)
      }

      Err(err) => {
        log::error!("{}\n{}", err.tag(), err);
        Err(err)
      }
    }
  }

  /// Compile both stages of `source` and link them.
  pub fn from_source<C>(ctx: &mut C, source: &ShaderSource) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    // both stages are always compiled so that every broken stage is reported
    let vertex = Stage::new(ctx, StageType::VertexShader, source.vertex());
    let fragment = Stage::new(ctx, StageType::FragmentShader, source.fragment());

    let (vertex, fragment) = match (vertex, fragment) {
      (Ok(vertex), Ok(fragment)) => (vertex, fragment),

      (vertex, fragment) => {
        let errors: Vec<StageError> = vec![vertex.err(), fragment.err()]
          .into_iter()
          .flatten()
          .collect();

        for err in &errors {
          log::error!("{}\n{}", err.tag(), err.log());
        }

        return Err(ProgramError::StageErrors(errors));
      }
    };

    // stages are dropped, hence released, whether linking succeeded or not
    Self::from_stages(ctx, &vertex, &fragment)
  }

  /// Compile and link a program from source strings.
  pub fn from_strings<C, V, F>(ctx: &mut C, vertex: V, fragment: F) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
    V: Into<String>,
    F: Into<String>,
  {
    Self::from_source(ctx, &ShaderSource::new(vertex, fragment))
  }

  /// Read, compile and link a program from source files.
  pub fn from_files<C, V, F>(ctx: &mut C, vertex: V, fragment: F) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
    V: AsRef<Path>,
    F: AsRef<Path>,
  {
    let source = ShaderSource::from_files(vertex, fragment)?;
    Self::from_source(ctx, &source)
  }

  /// Driver name of the program.
  pub fn handle(&self) -> Handle {
    unsafe { S::program_handle(&self.repr) }
  }

  /// Use this program for subsequent draw calls and return the previously used program.
  pub fn activate<C>(&self, ctx: &mut C) -> Handle
  where
    C: GraphicsContext<Backend = S>,
  {
    unsafe { ctx.backend().use_program(self.handle()) }
  }

  /// Use this program while `f` runs, then restore the previously used program.
  pub fn shade<C, F, R>(&mut self, ctx: &mut C, f: F) -> R
  where
    C: GraphicsContext<Backend = S>,
    F: FnOnce(&mut C, &mut Self) -> R,
  {
    let previous = self.activate(ctx);
    let r = f(ctx, self);

    unsafe {
      ctx.backend().use_program(previous);
    }

    r
  }

  /// Resolve an active uniform.
  pub fn uniform<T>(&self, name: &str) -> Result<Uniform<T>, UniformWarning>
  where
    S: Uniformable<T>,
  {
    unsafe { S::ask_uniform(&self.repr, name) }
  }

  /// Write a value to a resolved uniform.
  ///
  /// The program in use is left untouched: this program is used for the write only.
  pub fn set_uniform<C, T>(&mut self, ctx: &mut C, uniform: &Uniform<T>, value: T)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<T>,
  {
    let handle = self.handle();
    let backend = ctx.backend();

    unsafe {
      let previous = backend.use_program(handle);
      backend.update(&mut self.repr, uniform, value);
      backend.use_program(previous);
    }
  }

  /// Write a value to the uniform called `name`.
  ///
  /// Writing to a name that is not an active uniform of this program does nothing.
  pub fn set<C, T>(&mut self, ctx: &mut C, name: &str, value: T)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<T>,
  {
    match self.uniform(name) {
      Ok(uniform) => self.set_uniform(ctx, &uniform, value),
      Err(UniformWarning::Inactive(_)) => {
        log::trace!("ignoring write to inactive uniform {}", name)
      }
      Err(warning) => log::warn!("ignoring uniform write: {}", warning),
    }
  }

  /// Write a boolean uniform.
  pub fn set_bool<C>(&mut self, ctx: &mut C, name: &str, value: bool)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<bool>,
  {
    self.set(ctx, name, value)
  }

  /// Write a signed integer uniform (or the texture unit of a sampler).
  pub fn set_int<C>(&mut self, ctx: &mut C, name: &str, value: i32)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<i32>,
  {
    self.set(ctx, name, value)
  }

  /// Write an unsigned integer uniform.
  pub fn set_uint<C>(&mut self, ctx: &mut C, name: &str, value: u32)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<u32>,
  {
    self.set(ctx, name, value)
  }

  /// Write a floating-point uniform.
  pub fn set_float<C>(&mut self, ctx: &mut C, name: &str, value: f32)
  where
    C: GraphicsContext<Backend = S>,
    S: Uniformable<f32>,
  {
    self.set(ctx, name, value)
  }
}

/// Program builder, obtained from [`GraphicsContext::new_shader_program`].
pub struct ProgramBuilder<'a, C>
where
  C: ?Sized,
{
  ctx: &'a mut C,
}

impl<'a, C> ProgramBuilder<'a, C>
where
  C: GraphicsContext,
  C::Backend: Shader,
{
  pub(crate) fn new(ctx: &'a mut C) -> Self {
    ProgramBuilder { ctx }
  }

  /// See [`Program::from_source`].
  pub fn from_source(self, source: &ShaderSource) -> Result<Program<C::Backend>, ProgramError> {
    Program::from_source(self.ctx, source)
  }

  /// See [`Program::from_strings`].
  pub fn from_strings<V, F>(self, vertex: V, fragment: F) -> Result<Program<C::Backend>, ProgramError>
  where
    V: Into<String>,
    F: Into<String>,
  {
    Program::from_strings(self.ctx, vertex, fragment)
  }

  /// See [`Program::from_files`].
  pub fn from_files<V, F>(self, vertex: V, fragment: F) -> Result<Program<C::Backend>, ProgramError>
  where
    V: AsRef<Path>,
    F: AsRef<Path>,
  {
    Program::from_files(self.ctx, vertex, fragment)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write as _;

  #[test]
  fn stage_tags() {
    let vs = StageError::compilation_failed(StageType::VertexShader, "oops");
    let fs = StageError::compilation_failed(StageType::FragmentShader, "oops");

    assert_eq!(vs.tag(), "ERROR::SHADER::VERTEX::COMPILATION_FAILED");
    assert_eq!(fs.tag(), "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED");
  }

  #[test]
  fn program_tags() {
    let link = ProgramError::link_failed("nope");
    assert_eq!(link.tag(), "ERROR::SHADER::PROGRAM::LINKING_FAILED");

    let stages = ProgramError::StageErrors(vec![StageError::compilation_failed(
      StageType::FragmentShader,
      "bad",
    )]);
    assert_eq!(stages.tag(), "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED");
    assert!(stages.stage_error(StageType::VertexShader).is_none());
    assert_eq!(
      stages.stage_error(StageType::FragmentShader).map(StageError::log),
      Some("bad")
    );
  }

  #[test]
  fn stage_errors_display_every_stage() {
    let err = ProgramError::StageErrors(vec![
      StageError::compilation_failed(StageType::VertexShader, "vs log"),
      StageError::compilation_failed(StageType::FragmentShader, "fs log"),
    ]);
    let msg = err.to_string();

    assert!(msg.contains("vertex shader compilation error: vs log"));
    assert!(msg.contains("fragment shader compilation error: fs log"));
  }

  #[test]
  fn source_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let vs_path = dir.path().join("shader.vs");
    let fs_path = dir.path().join("shader.fs");
    fs::File::create(&vs_path)
      .unwrap()
      .write_all(b"void main() {}")
      .unwrap();
    fs::File::create(&fs_path)
      .unwrap()
      .write_all(b"out vec4 frag; void main() {}")
      .unwrap();

    let source = ShaderSource::from_files(&vs_path, &fs_path).unwrap();

    assert_eq!(source.vertex(), "void main() {}");
    assert_eq!(source.stage(StageType::FragmentShader), "out vec4 frag; void main() {}");
  }

  #[test]
  fn missing_file_names_stage_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let vs_path = dir.path().join("shader.vs");
    let fs_path = dir.path().join("missing.fs");
    fs::write(&vs_path, "void main() {}").unwrap();

    match ShaderSource::from_files(&vs_path, &fs_path) {
      Err(ProgramError::ResourceNotFound { stage, path, .. }) => {
        assert_eq!(stage, StageType::FragmentShader);
        assert_eq!(path, fs_path);
      }
      other => panic!("expected ResourceNotFound, got {:?}", other),
    }
  }

  #[test]
  fn missing_vertex_file_is_reported_first() {
    let dir = tempfile::tempdir().unwrap();
    let err = ShaderSource::from_files(dir.path().join("a.vs"), dir.path().join("b.fs")).unwrap_err();

    assert_eq!(err.tag(), "ERROR::SHADER::FILE_NOT_SUCCESSFULLY_READ");
    assert!(matches!(
      err,
      ProgramError::ResourceNotFound {
        stage: StageType::VertexShader,
        ..
      }
    ));
  }
}

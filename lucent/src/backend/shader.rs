//! Shader backend interface.
//!
//! Stage and program representations release their driver object when dropped.

use crate::binding::Handle;
use crate::shader::{ProgramError, StageError, StageType, Uniform, UniformType, UniformWarning};

/// Shader stages and programs.
pub unsafe trait Shader {
  /// Backend representation of a compiled shader stage.
  type StageRepr;

  /// Backend representation of a linked shader program.
  type ProgramRepr;

  /// Create and compile a stage.
  ///
  /// On failure, the driver object must already be released and the error must carry the driver
  /// log.
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError>;

  /// Create a program, attach both stages and link it.
  ///
  /// On failure, the program object must already be released.
  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError>;

  /// Driver name of a program.
  unsafe fn program_handle(program: &Self::ProgramRepr) -> Handle;

  /// Currently used program.
  unsafe fn current_program(&self) -> Handle;

  /// Use the program with the given name and return the previously used one.
  ///
  /// [`Handle::NONE`] unbinds any program.
  unsafe fn use_program(&mut self, program: Handle) -> Handle;

  /// Look up an active uniform by name.
  unsafe fn ask_uniform<T>(
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Result<Uniform<T>, UniformWarning>
  where
    Self: Uniformable<T>;
}

/// Types that can be written to uniforms of a backend.
pub unsafe trait Uniformable<T>: Shader {
  /// Reflected type of the uniform.
  unsafe fn ty() -> UniformType;

  /// Write a value to the program in use, which is always `program`.
  unsafe fn update(&mut self, program: &mut Self::ProgramRepr, uniform: &Uniform<T>, value: T);
}

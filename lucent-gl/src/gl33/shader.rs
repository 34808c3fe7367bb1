use gl::{self, types::*};
use lucent::{
  backend::shader::{Shader, Uniformable},
  binding::Handle,
  shader::{ProgramError, StageError, StageType, Uniform, UniformType, UniformWarning},
};
use std::{
  cell::RefCell,
  ffi::CString,
  ptr::{null, null_mut},
  rc::Rc,
};

use crate::gl33::state::GLState;
use crate::gl33::GL33;

/// A compiled OpenGL shader object.
#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

impl Stage {
  /// Type of the stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }

    log::trace!("released {} #{}", self.ty, self.handle);
  }
}

/// A linked OpenGL program object.
#[derive(Debug)]
pub struct Program {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for Program {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unuse_program(self.handle);
      gl::DeleteProgram(self.handle);
    }

    log::trace!("released shader program #{}", self.handle);
  }
}

impl Program {
  fn link(&self) -> Result<(), ProgramError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
        let mut written: GLsizei = 0;
        gl::GetProgramInfoLog(
          handle,
          log_len,
          &mut written,
          log.as_mut_ptr() as *mut GLchar,
        );
        log.truncate(written.max(0) as usize);

        Err(ProgramError::link_failed(info_log(log)))
      }
    }
  }
}

unsafe impl Shader for GL33 {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let c_src = CString::new(src.as_bytes())
      .map_err(|_| StageError::compilation_failed(ty, "source contains a NUL byte"))?;

    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(StageError::compilation_failed(
        ty,
        "unable to create shader stage",
      ));
    }

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(Stage { handle, ty })
    } else {
      let mut log_len: GLint = 0;
      gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

      let mut log: Vec<u8> = vec![0; log_len.max(0) as usize];
      let mut written: GLsizei = 0;
      gl::GetShaderInfoLog(
        handle,
        log_len,
        &mut written,
        log.as_mut_ptr() as *mut GLchar,
      );
      log.truncate(written.max(0) as usize);

      gl::DeleteShader(handle);

      Err(StageError::compilation_failed(ty, info_log(log)))
    }
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      return Err(ProgramError::link_failed("unable to create shader program"));
    }

    gl::AttachShader(handle, vertex.handle);
    gl::AttachShader(handle, fragment.handle);

    // deleting the program on link failure happens in Drop
    let program = Program {
      handle,
      state: self.state.clone(),
    };
    program.link()?;

    gl::DetachShader(handle, vertex.handle);
    gl::DetachShader(handle, fragment.handle);

    Ok(program)
  }

  unsafe fn program_handle(program: &Self::ProgramRepr) -> Handle {
    Handle::new(program.handle)
  }

  unsafe fn current_program(&self) -> Handle {
    Handle::new(self.state.borrow().current_program())
  }

  unsafe fn use_program(&mut self, program: Handle) -> Handle {
    Handle::new(self.state.borrow_mut().use_program(program.raw()))
  }

  unsafe fn ask_uniform<T>(
    program: &Self::ProgramRepr,
    name: &str,
  ) -> Result<Uniform<T>, UniformWarning>
  where
    Self: Uniformable<T>,
  {
    let c_name = CString::new(name.as_bytes()).map_err(|_| UniformWarning::inactive(name))?;
    let location = gl::GetUniformLocation(program.handle, c_name.as_ptr() as *const GLchar);

    // ensure the location smells good
    if location < 0 {
      return Err(UniformWarning::inactive(name));
    }

    // ensure the type is correct regarding what we have in the type-system
    uniform_type_match(program.handle, &c_name, name, <Self as Uniformable<T>>::ty())?;

    Ok(Uniform::new(location))
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

// drivers may NUL-terminate the log or emit invalid UTF-8
fn info_log(mut log: Vec<u8>) -> String {
  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}

fn uniform_type_match(
  program: GLuint,
  c_name: &CString,
  name: &str,
  ty: UniformType,
) -> Result<(), UniformWarning> {
  let mut glty: GLuint = 0;
  let mut found_size: GLint = 0;

  unsafe {
    // get the index of the uniform
    let mut index = gl::INVALID_INDEX;
    gl::GetUniformIndices(
      program,
      1,
      [c_name.as_ptr() as *const GLchar].as_ptr(),
      &mut index,
    );

    if index == gl::INVALID_INDEX {
      return Err(UniformWarning::inactive(name));
    }

    // get its size and type; we are not interested in the name
    gl::GetActiveUniform(
      program,
      index,
      0,
      null_mut(),
      &mut found_size,
      &mut glty,
      null_mut(),
    );
  }

  check_uniform_type_match(name, ty, glty)
}

fn check_uniform_type_match(
  name: &str,
  ty: UniformType,
  glty: GLuint,
) -> Result<(), UniformWarning> {
  // helper macro to check type mismatch for each variant
  macro_rules! milkcheck {
    ($ty:expr, $( ( $v:tt, $($t:tt)|+ ) ),* $(,)?) => {
      match $ty {
        $(
          UniformType::$v => {
            if $(glty == gl::$t)||+ {
              Ok(())
            } else {
              Err(UniformWarning::type_mismatch(name, ty))
            }
          }
        )*
      }
    }
  }

  milkcheck!(
    ty,
    // scalars; samplers are set with their texture unit
    (
      Int,
      INT
        | SAMPLER_1D
        | SAMPLER_2D
        | SAMPLER_3D
        | SAMPLER_CUBE
        | SAMPLER_2D_RECT
        | SAMPLER_1D_ARRAY
        | SAMPLER_2D_ARRAY
        | SAMPLER_BUFFER
        | SAMPLER_2D_MULTISAMPLE
        | SAMPLER_2D_SHADOW
        | SAMPLER_CUBE_SHADOW
        | INT_SAMPLER_2D
        | INT_SAMPLER_3D
        | UNSIGNED_INT_SAMPLER_2D
        | UNSIGNED_INT_SAMPLER_3D
    ),
    (UInt, UNSIGNED_INT),
    (Float, FLOAT),
    (Bool, BOOL),
    // vectors
    (Vec2, FLOAT_VEC2),
    (Vec3, FLOAT_VEC3),
    (Vec4, FLOAT_VEC4),
  )
}

macro_rules! impl_Uniformable {
  (vec $t:ty, $uty:tt, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn ty() -> UniformType {
        UniformType::$uty
      }

      unsafe fn update(&mut self, _: &mut Program, uniform: &Uniform<$t>, value: $t) {
        gl::$f(uniform.index(), 1, value.as_ptr());
      }
    }
  };

  ($t:ty, $uty:tt, $f:tt) => {
    unsafe impl Uniformable<$t> for GL33 {
      unsafe fn ty() -> UniformType {
        UniformType::$uty
      }

      unsafe fn update(&mut self, _: &mut Program, uniform: &Uniform<$t>, value: $t) {
        gl::$f(uniform.index(), value);
      }
    }
  };
}

impl_Uniformable!(i32, Int, Uniform1i);
impl_Uniformable!(u32, UInt, Uniform1ui);
impl_Uniformable!(f32, Float, Uniform1f);
impl_Uniformable!(vec [f32; 2], Vec2, Uniform2fv);
impl_Uniformable!(vec [f32; 3], Vec3, Uniform3fv);
impl_Uniformable!(vec [f32; 4], Vec4, Uniform4fv);

unsafe impl Uniformable<bool> for GL33 {
  unsafe fn ty() -> UniformType {
    UniformType::Bool
  }

  unsafe fn update(&mut self, _: &mut Program, uniform: &Uniform<bool>, value: bool) {
    gl::Uniform1i(uniform.index(), value as GLint);
  }
}

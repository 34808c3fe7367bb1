use std::cell::RefCell;
use std::rc::Rc;

use lucent::backend::shader::{Shader, Uniformable};
use lucent::binding::Handle;
use lucent::shader::{ProgramError, StageError, StageType, Uniform, UniformType, UniformWarning};

use crate::glsl::{self, GlslType, Scalar, StageInterface, Variable};
use crate::state::{HeadlessState, UniformValue};
use crate::Headless;

/// A compiled stage.
#[derive(Debug)]
pub struct Stage {
  name: u32,
  interface: StageInterface,
  state: Rc<RefCell<HeadlessState>>,
}

impl Stage {
  /// Interface extracted at compile time.
  pub fn interface(&self) -> &StageInterface {
    &self.interface
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    self.state.borrow_mut().delete_stage(self.name);
  }
}

/// A linked program.
#[derive(Debug)]
pub struct Program {
  name: u32,
  // location of a uniform is its index
  uniforms: Vec<Variable>,
  state: Rc<RefCell<HeadlessState>>,
}

impl Program {
  /// Active uniforms.
  pub fn uniforms(&self) -> &[Variable] {
    &self.uniforms
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    self.state.borrow_mut().delete_program(self.name);
  }
}

unsafe impl Shader for Headless {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let name = {
      let mut st = self.state.borrow_mut();
      st.record_compile(ty);
      st.create_stage(ty)
    };

    match glsl::compile(ty, src) {
      Ok(interface) => Ok(Stage {
        name,
        interface,
        state: self.state.clone(),
      }),

      Err(log) => {
        self.state.borrow_mut().delete_stage(name);
        Err(StageError::compilation_failed(ty, log))
      }
    }
  }

  unsafe fn new_program(
    &mut self,
    vertex: &Self::StageRepr,
    fragment: &Self::StageRepr,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let name = self.state.borrow_mut().create_program();

    match glsl::link(&vertex.interface, &fragment.interface) {
      Ok(uniforms) => Ok(Program {
        name,
        uniforms,
        state: self.state.clone(),
      }),

      Err(log) => {
        self.state.borrow_mut().delete_program(name);
        Err(ProgramError::link_failed(log))
      }
    }
  }

  unsafe fn program_handle(program: &Self::ProgramRepr) -> Handle {
    Handle::new(program.name)
  }

  unsafe fn current_program(&self) -> Handle {
    self.state.borrow().current_program()
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
    let (index, uniform) = program
      .uniforms
      .iter()
      .enumerate()
      .find(|(_, u)| u.name == name)
      .ok_or_else(|| UniformWarning::inactive(name))?;

    let ty = <Self as Uniformable<T>>::ty();

    if type_matches(ty, uniform.ty) {
      Ok(Uniform::new(index as i32))
    } else {
      Err(UniformWarning::type_mismatch(name, ty))
    }
  }
}

fn type_matches(ty: UniformType, glsl_ty: GlslType) -> bool {
  matches!(
    (ty, glsl_ty),
    (UniformType::Int, GlslType::Scalar(Scalar::Int))
      | (UniformType::Int, GlslType::Sampler { .. })
      | (UniformType::UInt, GlslType::Scalar(Scalar::UInt))
      | (UniformType::Float, GlslType::Scalar(Scalar::Float))
      | (UniformType::Bool, GlslType::Scalar(Scalar::Bool))
      | (UniformType::Vec2, GlslType::Vector(Scalar::Float, 2))
      | (UniformType::Vec3, GlslType::Vector(Scalar::Float, 3))
      | (UniformType::Vec4, GlslType::Vector(Scalar::Float, 4))
  )
}

macro_rules! impl_Uniformable {
  ($t:ty, $uty:tt) => {
    unsafe impl Uniformable<$t> for Headless {
      unsafe fn ty() -> UniformType {
        UniformType::$uty
      }

      unsafe fn update(&mut self, program: &mut Program, uniform: &Uniform<$t>, value: $t) {
        if let Some(var) = program.uniforms.get(uniform.index() as usize) {
          self
            .state
            .borrow_mut()
            .record_uniform(&var.name, UniformValue::$uty(value));
        }
      }
    }
  };
}

impl_Uniformable!(i32, Int);
impl_Uniformable!(u32, UInt);
impl_Uniformable!(f32, Float);
impl_Uniformable!(bool, Bool);
impl_Uniformable!([f32; 2], Vec2);
impl_Uniformable!([f32; 3], Vec3);
impl_Uniformable!([f32; 4], Vec4);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn samplers_take_units() {
    let sampler = |name| GlslType::from_name(name).unwrap();

    assert!(type_matches(UniformType::Int, sampler("sampler2D")));
    assert!(type_matches(UniformType::Int, sampler("samplerCube")));
    assert!(type_matches(UniformType::Int, sampler("usampler3D")));
    assert!(!type_matches(UniformType::Float, sampler("sampler2D")));
    assert!(!type_matches(UniformType::Int, sampler("mat4")));
    assert!(!type_matches(UniformType::Vec3, sampler("ivec3")));
  }
}

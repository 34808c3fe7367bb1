//! Recorded state.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use lucent::binding::Handle;
use lucent::pipeline::Viewport;
use lucent::shader::StageType;
use lucent::tess::Mode;

/// A value written to a uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
  /// `int` or sampler unit.
  Int(i32),
  /// `uint`.
  UInt(u32),
  /// `float`.
  Float(f32),
  /// `bool`.
  Bool(bool),
  /// `vec2`.
  Vec2([f32; 2]),
  /// `vec3`.
  Vec3([f32; 3]),
  /// `vec4`.
  Vec4([f32; 4]),
}

/// A recorded draw call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DrawCall {
  /// Primitive mode.
  pub mode: Mode,
  /// Number of vertices (or indices) drawn.
  pub count: usize,
  /// Whether the draw was indexed.
  pub indexed: bool,
  /// Program in use at the time of the draw.
  pub program: Handle,
  /// Vertex array bound at the time of the draw.
  pub vertex_array: Handle,
}

/// Objects, bindings and commands recorded by a [`Headless`](crate::Headless) backend.
#[derive(Debug)]
pub struct HeadlessState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  next_name: u32,

  // live objects
  stages: HashMap<u32, StageType>,
  programs: HashSet<u32>,
  vertex_arrays: HashSet<u32>,
  buffers: HashSet<u32>,
  textures: HashSet<u32>,

  // bindings
  current_program: u32,
  bound_vertex_array: u32,
  bound_textures: Vec<u32>,
  viewport: Viewport,
  clear_color: [f32; 4],

  // commands
  compile_attempts: HashMap<StageType, usize>,
  link_attempts: usize,
  uniform_values: HashMap<(u32, String), UniformValue>,
  draw_calls: Vec<DrawCall>,
  clears: usize,
}

impl HeadlessState {
  pub(crate) fn new(viewport: Viewport) -> Self {
    HeadlessState {
      _a: PhantomData,
      next_name: 1,
      stages: HashMap::new(),
      programs: HashSet::new(),
      vertex_arrays: HashSet::new(),
      buffers: HashSet::new(),
      textures: HashSet::new(),
      current_program: 0,
      bound_vertex_array: 0,
      bound_textures: vec![0; 16],
      viewport,
      clear_color: [0., 0., 0., 0.],
      compile_attempts: HashMap::new(),
      link_attempts: 0,
      uniform_values: HashMap::new(),
      draw_calls: Vec::new(),
      clears: 0,
    }
  }

  // object names are shared across object kinds; they’re never reused
  fn gen_name(&mut self) -> u32 {
    let name = self.next_name;
    self.next_name += 1;
    name
  }

  pub(crate) fn create_stage(&mut self, ty: StageType) -> u32 {
    let name = self.gen_name();
    self.stages.insert(name, ty);
    name
  }

  pub(crate) fn delete_stage(&mut self, name: u32) {
    self.stages.remove(&name);
  }

  pub(crate) fn record_compile(&mut self, ty: StageType) {
    *self.compile_attempts.entry(ty).or_insert(0) += 1;
  }

  pub(crate) fn create_program(&mut self) -> u32 {
    let name = self.gen_name();
    self.programs.insert(name);
    self.link_attempts += 1;
    name
  }

  pub(crate) fn delete_program(&mut self, name: u32) {
    self.programs.remove(&name);
    self.uniform_values.retain(|(program, _), _| *program != name);

    if self.current_program == name {
      self.current_program = 0;
    }
  }

  pub(crate) fn create_vertex_array(&mut self) -> u32 {
    let name = self.gen_name();
    self.vertex_arrays.insert(name);
    name
  }

  pub(crate) fn delete_vertex_array(&mut self, name: u32) {
    self.vertex_arrays.remove(&name);

    if self.bound_vertex_array == name {
      self.bound_vertex_array = 0;
    }
  }

  pub(crate) fn create_buffer(&mut self) -> u32 {
    let name = self.gen_name();
    self.buffers.insert(name);
    name
  }

  pub(crate) fn delete_buffer(&mut self, name: u32) {
    self.buffers.remove(&name);
  }

  pub(crate) fn create_texture(&mut self) -> u32 {
    let name = self.gen_name();
    self.textures.insert(name);
    name
  }

  pub(crate) fn delete_texture(&mut self, name: u32) {
    self.textures.remove(&name);

    for t in self.bound_textures.iter_mut().filter(|t| **t == name) {
      *t = 0;
    }
  }

  pub(crate) fn use_program(&mut self, name: u32) -> u32 {
    std::mem::replace(&mut self.current_program, name)
  }

  pub(crate) fn bind_vertex_array(&mut self, name: u32) -> u32 {
    std::mem::replace(&mut self.bound_vertex_array, name)
  }

  pub(crate) fn bind_texture(&mut self, unit: u32, name: u32) -> u32 {
    let unit = unit as usize;

    if unit >= self.bound_textures.len() {
      self.bound_textures.resize(unit + 1, 0);
    }

    std::mem::replace(&mut self.bound_textures[unit], name)
  }

  pub(crate) fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
    std::mem::replace(&mut self.viewport, viewport)
  }

  pub(crate) fn set_clear_color(&mut self, color: [f32; 4]) {
    self.clear_color = color;
  }

  pub(crate) fn record_clear(&mut self) {
    self.clears += 1;
  }

  // like glUniform*, a write lands in the program in use
  pub(crate) fn record_uniform(&mut self, name: &str, value: UniformValue) {
    if self.current_program == 0 {
      log::warn!("uniform {} written with no program in use", name);
      return;
    }

    self
      .uniform_values
      .insert((self.current_program, name.to_owned()), value);
  }

  pub(crate) fn record_draw(&mut self, mode: Mode, count: usize, indexed: bool) {
    let draw = DrawCall {
      mode,
      count,
      indexed,
      program: Handle::new(self.current_program),
      vertex_array: Handle::new(self.bound_vertex_array),
    };

    log::trace!("draw {:?}", draw);
    self.draw_calls.push(draw);
  }

  pub(crate) fn reset_frame(&mut self) {
    self.draw_calls.clear();
    self.clears = 0;
  }

  /// Number of live shader stages.
  pub fn live_stages(&self) -> usize {
    self.stages.len()
  }

  /// Number of live shader programs.
  pub fn live_programs(&self) -> usize {
    self.programs.len()
  }

  /// Number of live vertex arrays.
  pub fn live_vertex_arrays(&self) -> usize {
    self.vertex_arrays.len()
  }

  /// Number of live buffers.
  pub fn live_buffers(&self) -> usize {
    self.buffers.len()
  }

  /// Number of live textures.
  pub fn live_textures(&self) -> usize {
    self.textures.len()
  }

  /// Whether a program with this name is alive.
  pub fn is_program(&self, program: Handle) -> bool {
    self.programs.contains(&program.raw())
  }

  /// Number of compilations attempted for a stage type.
  pub fn compile_attempts(&self, ty: StageType) -> usize {
    self.compile_attempts.get(&ty).copied().unwrap_or(0)
  }

  /// Number of links attempted.
  pub fn link_attempts(&self) -> usize {
    self.link_attempts
  }

  /// Program in use.
  pub fn current_program(&self) -> Handle {
    Handle::new(self.current_program)
  }

  /// Bound vertex array.
  pub fn bound_vertex_array(&self) -> Handle {
    Handle::new(self.bound_vertex_array)
  }

  /// Texture bound to a unit.
  pub fn bound_texture(&self, unit: u32) -> Handle {
    Handle::new(self.bound_textures.get(unit as usize).copied().unwrap_or(0))
  }

  /// Current viewport.
  pub fn viewport(&self) -> Viewport {
    self.viewport
  }

  /// Current clear color.
  pub fn clear_color(&self) -> [f32; 4] {
    self.clear_color
  }

  /// Number of color buffer clears.
  pub fn clears(&self) -> usize {
    self.clears
  }

  /// Last value written to a uniform of a program.
  pub fn uniform_value(&self, program: Handle, name: &str) -> Option<UniformValue> {
    self
      .uniform_values
      .get(&(program.raw(), name.to_owned()))
      .copied()
  }

  /// Number of uniform values recorded for a program.
  pub fn uniform_count(&self, program: Handle) -> usize {
    self
      .uniform_values
      .keys()
      .filter(|(p, _)| *p == program.raw())
      .count()
  }

  /// Recorded draw calls.
  pub fn draw_calls(&self) -> &[DrawCall] {
    &self.draw_calls
  }
}

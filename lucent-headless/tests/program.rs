use lucent::context::GraphicsContext;
use lucent::shader::{Program, ProgramError, ShaderSource, StageType, UniformWarning};
use lucent_headless::{Headless, HeadlessContext, UniformValue};

const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
out vec3 ourColor;
uniform float xOffset;
void main() {
  gl_Position = vec4(aPos.x + xOffset, aPos.y, aPos.z, 1.0);
  ourColor = aColor;
}
";

const FS: &str = "#version 330 core
in vec3 ourColor;
out vec4 FragColor;
uniform float alpha;
void main() {
  FragColor = vec4(ourColor, alpha);
}
";

// missing semicolon and closing brace
const BROKEN_VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main() {
  gl_Position = vec4(aPos, 1.0)
";

const BROKEN_FS: &str = "#version 330 core
out vec4 FragColor;
void main() {
  FragColor = vec4(1.0, 0.5, 0.2, 1.0);
";

// reads a varying the vertex stage never writes
const MISMATCHED_FS: &str = "#version 330 core
in vec2 texCoord;
out vec4 FragColor;
void main() {
  FragColor = vec4(texCoord, 0.0, 1.0);
}
";

fn build(
  ctx: &mut HeadlessContext,
  vs: &str,
  fs: &str,
) -> Result<Program<Headless>, ProgramError> {
  ctx.new_shader_program().from_strings(vs, fs)
}

#[test]
fn valid_program_links_and_activates() {
  let mut ctx = HeadlessContext::new(800, 600);
  let program = build(&mut ctx, VS, FS).unwrap();

  assert!(ctx.state().is_program(program.handle()));

  let previous = program.activate(&mut ctx);

  assert!(previous.is_none());
  assert_eq!(ctx.state().current_program(), program.handle());
}

#[test]
fn broken_vertex_stage_still_compiles_fragment_stage() {
  let mut ctx = HeadlessContext::new(800, 600);

  match build(&mut ctx, BROKEN_VS, FS) {
    Err(ProgramError::StageErrors(errors)) => {
      assert_eq!(errors.len(), 1);
      assert_eq!(errors[0].stage_type(), StageType::VertexShader);
      assert_eq!(errors[0].tag(), "ERROR::SHADER::VERTEX::COMPILATION_FAILED");
      assert!(!errors[0].log().is_empty());
    }

    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("broken vertex stage linked"),
  }

  let state = ctx.state();
  assert_eq!(state.compile_attempts(StageType::VertexShader), 1);
  assert_eq!(state.compile_attempts(StageType::FragmentShader), 1);
  assert_eq!(state.link_attempts(), 0);
}

#[test]
fn broken_fragment_stage_is_the_only_one_reported() {
  let mut ctx = HeadlessContext::new(800, 600);
  let err = build(&mut ctx, VS, BROKEN_FS).err().unwrap();

  assert!(err.stage_error(StageType::VertexShader).is_none());
  assert!(err.stage_error(StageType::FragmentShader).is_some());
  assert_eq!(err.tag(), "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED");
}

#[test]
fn both_broken_stages_are_reported_in_order() {
  let mut ctx = HeadlessContext::new(800, 600);

  match build(&mut ctx, BROKEN_VS, BROKEN_FS) {
    Err(ProgramError::StageErrors(errors)) => {
      let stages: Vec<_> = errors.iter().map(|e| e.stage_type()).collect();
      assert_eq!(
        stages,
        vec![StageType::VertexShader, StageType::FragmentShader]
      );
    }

    _ => panic!("expected stage errors"),
  }
}

#[test]
fn interface_mismatch_fails_to_link() {
  let mut ctx = HeadlessContext::new(800, 600);

  match build(&mut ctx, VS, MISMATCHED_FS) {
    Err(e @ ProgramError::LinkFailed(_)) => {
      assert_eq!(e.tag(), "ERROR::SHADER::PROGRAM::LINKING_FAILED");

      if let ProgramError::LinkFailed(log) = e {
        assert!(log.contains("texCoord"));
      }
    }

    Err(e) => panic!("unexpected error: {}", e),
    Ok(_) => panic!("mismatched interfaces linked"),
  }

  assert_eq!(ctx.state().link_attempts(), 1);
}

#[test]
fn inactive_uniform_write_is_a_no_op() {
  let mut ctx = HeadlessContext::new(800, 600);
  let mut program = build(&mut ctx, VS, FS).unwrap();
  let handle = program.handle();

  program.set_float(&mut ctx, "xOffset", 0.5);
  program.set_float(&mut ctx, "nonexistent", 1.0);
  program.set_int(&mut ctx, "alsoMissing", 3);

  let state = ctx.state();
  assert_eq!(
    state.uniform_value(handle, "xOffset"),
    Some(UniformValue::Float(0.5))
  );
  assert_eq!(state.uniform_count(handle), 1);
}

#[test]
fn uniform_lookup_warnings() {
  let mut ctx = HeadlessContext::new(800, 600);
  let program = build(&mut ctx, VS, FS).unwrap();

  assert_eq!(
    program.uniform::<f32>("nonexistent").err(),
    Some(UniformWarning::inactive("nonexistent"))
  );
  assert!(matches!(
    program.uniform::<i32>("xOffset"),
    Err(UniformWarning::TypeMismatch(..))
  ));
  assert!(program.uniform::<f32>("alpha").is_ok());
}

#[test]
fn uniform_writes_keep_current_program() {
  let mut ctx = HeadlessContext::new(800, 600);
  let mut a = build(&mut ctx, VS, FS).unwrap();
  let b = build(&mut ctx, VS, FS).unwrap();

  b.activate(&mut ctx);
  a.set_float(&mut ctx, "alpha", 1.0);

  // the write went to `a` while it was in use, then `b` was used again
  let state = ctx.state();
  assert_eq!(state.current_program(), b.handle());
  assert_eq!(
    state.uniform_value(a.handle(), "alpha"),
    Some(UniformValue::Float(1.0))
  );
  assert_eq!(state.uniform_value(b.handle(), "alpha"), None);
}

#[test]
fn uniform_writes_with_no_program_in_use() {
  let mut ctx = HeadlessContext::new(800, 600);
  let mut a = build(&mut ctx, VS, FS).unwrap();

  a.set_float(&mut ctx, "xOffset", 0.5);

  let state = ctx.state();
  assert!(state.current_program().is_none());
  assert_eq!(
    state.uniform_value(a.handle(), "xOffset"),
    Some(UniformValue::Float(0.5))
  );
}

#[test]
fn shade_restores_previous_program() {
  let mut ctx = HeadlessContext::new(800, 600);
  let mut a = build(&mut ctx, VS, FS).unwrap();
  let b = build(&mut ctx, VS, FS).unwrap();
  let a_handle = a.handle();

  b.activate(&mut ctx);

  let inside = a.shade(&mut ctx, |ctx, program| {
    program.set_float(ctx, "xOffset", -0.25);
    let current = ctx.state().current_program();
    current
  });

  assert_eq!(inside, a_handle);
  assert_eq!(ctx.state().current_program(), b.handle());
}

#[test]
fn dropping_programs_releases_everything() {
  let mut ctx = HeadlessContext::new(800, 600);

  for _ in 0..8 {
    let program = build(&mut ctx, VS, FS).unwrap();
    program.activate(&mut ctx);
  }

  let _ = build(&mut ctx, BROKEN_VS, FS);
  let _ = build(&mut ctx, VS, BROKEN_FS);
  let _ = build(&mut ctx, VS, MISMATCHED_FS);

  let state = ctx.state();
  assert_eq!(state.live_stages(), 0);
  assert_eq!(state.live_programs(), 0);
  assert!(state.current_program().is_none());
}

#[test]
fn stages_are_released_once_linked() {
  let mut ctx = HeadlessContext::new(800, 600);
  let _program = build(&mut ctx, VS, FS).unwrap();

  assert_eq!(ctx.state().live_stages(), 0);
  assert_eq!(ctx.state().live_programs(), 1);
}

#[test]
fn program_from_files() {
  let dir = tempfile::tempdir().unwrap();
  let vs_path = dir.path().join("shader.vs");
  let fs_path = dir.path().join("shader.fs");
  std::fs::write(&vs_path, VS).unwrap();
  std::fs::write(&fs_path, FS).unwrap();

  let mut ctx = HeadlessContext::new(800, 600);
  let program = ctx.new_shader_program().from_files(&vs_path, &fs_path);

  assert!(program.is_ok());
}

#[test]
fn missing_file_is_not_a_compile_error() {
  let dir = tempfile::tempdir().unwrap();
  let vs_path = dir.path().join("shader.vs");
  std::fs::write(&vs_path, VS).unwrap();
  let fs_path = dir.path().join("nope.fs");

  let mut ctx = HeadlessContext::new(800, 600);

  match ctx.new_shader_program().from_files(&vs_path, &fs_path) {
    Err(ProgramError::ResourceNotFound { stage, path, .. }) => {
      assert_eq!(stage, StageType::FragmentShader);
      assert_eq!(path, fs_path);
    }

    _ => panic!("expected ResourceNotFound"),
  }

  assert_eq!(ctx.state().compile_attempts(StageType::VertexShader), 0);
}

#[test]
fn program_from_source() {
  let mut ctx = HeadlessContext::new(800, 600);
  let source = ShaderSource::new(VS, FS);
  let program = Program::from_source(&mut ctx, &source).unwrap();

  assert!(!program.handle().is_none());
}

#[test]
fn full_glsl_330_interfaces_link() {
  let vs = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in int aId;
flat out int id;
out vec2 uv[2], st;
uniform mat3 normalMatrix;
uniform mat4 model, view;
void main() {
  gl_Position = view * model * vec4(normalMatrix * aPos, 1.0);
  id = aId;
  uv[0] = aPos.xy;
  uv[1] = aPos.yz;
  st = aPos.xz;
}
";

  let fs = "#version 330 core
flat in int id;
in vec2 uv[2], st;
out vec4 FragColor;
uniform samplerCube skybox;
uniform vec3 colors[4];
void main() {
  FragColor = texture(skybox, vec3(uv[0], st.x)) * vec4(colors[id], 1.0);
}
";

  let mut ctx = HeadlessContext::new(800, 600);
  let mut program = build(&mut ctx, vs, fs).unwrap();

  assert!(program.uniform::<i32>("skybox").is_ok());
  assert!(program.uniform::<f32>("normalMatrix").is_err());

  program.set_int(&mut ctx, "skybox", 0);
  assert_eq!(
    ctx.state().uniform_value(program.handle(), "skybox"),
    Some(UniformValue::Int(0))
  );
}

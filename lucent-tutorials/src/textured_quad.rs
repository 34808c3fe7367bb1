//! A quad made of two indexed triangles, sampling a texture.
//!
//! Each vertex carries a position, a color and texture coordinates. The fragment stage multiplies
//! the texel by the interpolated color. The sampler uniform `texture1` reads from texture unit 0.
//!
//! If `container.png` cannot be fetched, the error is logged and a single white texel is used
//! instead, so that the quad still shows its vertex colors.

use crate::shared::{frame_state, handle_actions};
use crate::{InputAction, LoopFeedback, PlatformServices, Tutorial, TutorialBackend, TutorialError};
use lucent::context::GraphicsContext;
use lucent::shader::Program;
use lucent::tess::{Tess, VertexLayout};
use lucent::texture::{GenMipmaps, PixelFormat, Sampler, Texture};

pub const TEXTURE_NAME: &str = "container.png";

const TEXTURE_UNIT: u32 = 0;

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
  // positions      // colors        // texture coords
   0.5,  0.5, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, // top right
   0.5, -0.5, 0.0,  0.0, 1.0, 0.0,  1.0, 0.0, // bottom right
  -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0, // bottom left
  -0.5,  0.5, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, // top left
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

pub struct LocalTutorial<B>
where
  B: TutorialBackend,
{
  program: Program<B>,
  quad: Tess<B>,
  texture: Texture<B>,
}

impl<B> LocalTutorial<B>
where
  B: TutorialBackend,
{
  pub fn texture(&self) -> &Texture<B> {
    &self.texture
  }
}

impl<B> Tutorial<B> for LocalTutorial<B>
where
  B: TutorialBackend,
{
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> Result<Self, TutorialError> {
    let mut program = context.new_shader_program().from_files(
      platform.shader_path("texture.vs"),
      platform.shader_path("texture.fs"),
    )?;
    program.set_int(context, "texture1", TEXTURE_UNIT as i32);

    let quad = context
      .new_tess()
      .set_vertices(&VERTICES, VertexLayout::packed(&[3, 3, 2]))
      .set_indices(&INDICES)
      .build()?;

    let texture = match platform.fetch_texture(TEXTURE_NAME) {
      Ok(img) => {
        let (width, height) = img.dimensions();
        context.new_texture(
          [width, height],
          PixelFormat::RGB8,
          Sampler::default(),
          GenMipmaps::Yes,
          img.as_raw(),
        )?
        // the decoded image is dropped here, once uploaded
      }

      Err(e) => {
        log::error!("Failed to load texture {}: {}", TEXTURE_NAME, e);
        context.new_texture(
          [1, 1],
          PixelFormat::RGB8,
          Sampler::default(),
          GenMipmaps::No,
          &[255, 255, 255],
        )?
      }
    };

    Ok(LocalTutorial {
      program,
      quad,
      texture,
    })
  }

  fn render_frame(
    &mut self,
    _time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> LoopFeedback {
    if handle_actions(actions, context) == LoopFeedback::Exit {
      return LoopFeedback::Exit;
    }

    context.clear(&frame_state());
    self.texture.bind(context, TEXTURE_UNIT);

    let quad = &self.quad;
    self.program.shade(context, |ctx, _| quad.render(ctx));

    LoopFeedback::Continue
  }
}

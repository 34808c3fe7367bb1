//! Platform services implementation.

use crate::CLIOpts;
use image::ImageError;
use lucent_tutorials::PlatformServices;
use std::path::PathBuf;

/// Desktop implementation of the [`PlatformServices`] API.
///
/// Shaders and textures are looked up in the directories given on the command line, or in the
/// `shaders/` and `textures/` directories shipped with this crate.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  shaders: PathBuf,
  textures: PathBuf,
}

impl DesktopPlatformServices {
  pub fn new(cli_opts: &CLIOpts) -> Self {
    let shaders = cli_opts
      .shaders
      .clone()
      .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders")));
    let textures = cli_opts
      .textures
      .clone()
      .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/textures")));

    Self { shaders, textures }
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = ImageError;

  fn shader_path(&self, name: &str) -> PathBuf {
    self.shaders.join(name)
  }

  fn fetch_texture(&mut self, name: &str) -> Result<image::RgbImage, Self::FetchError> {
    let path = self.textures.join(name);
    log::info!("loading texture {}", path.display());

    // OpenGL expects the first row to be the bottom one
    let img = image::open(&path)?.flipv().to_rgb8();
    Ok(img)
  }
}

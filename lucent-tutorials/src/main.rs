mod platform;

use glfw::{Action, Key, WindowEvent};
use lucent_gl::GL33;
use lucent_glfw::GlfwSurface;
use lucent_tutorials::{InputAction, LoopFeedback, Tutorial};
use lucent_windowing::{WindowDim, WindowOpt};
use platform::DesktopPlatformServices;
use std::{path::PathBuf, process, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long)]
  /// Directory where to pick shaders from (defaults to the crate's `shaders/`).
  shaders: Option<PathBuf>,

  #[structopt(short, long)]
  /// Directory where to pick textures from (defaults to the crate's `textures/`).
  textures: Option<PathBuf>,

  #[structopt(long, default_value = "800")]
  /// Width of the window.
  width: u32,

  #[structopt(long, default_value = "600")]
  /// Height of the window.
  height: u32,

  #[structopt(short, long)]
  /// List available tutorials.
  list_tutorials: bool,

  #[structopt(default_value = "two-triangles")]
  /// Tutorial to run.
  tutorial: String,
}

/// Macro to declaratively add tutorials.
macro_rules! tutorials {
  ($($name:literal, $module:ident),* $(,)?) => {
    fn show_available_tutorials() {
      println!("available tutorials:");
      $( println!("  - {}", $name); )*
    }

    // run a tutorial based on its name and return the process exit code
    fn pick_and_run_tutorial(cli_opts: CLIOpts) -> i32 {
      let name = cli_opts.tutorial.clone();
      match name.as_str() {
        $(
          $name => run_tutorial::<lucent_tutorials::$module::LocalTutorial<GL33>>(&cli_opts, $name),
        )*

        _ => {
          log::error!("no tutorial named {}", name);
          show_available_tutorials();
          1
        }
      }
    }
  }
}

// Run a tutorial until its window is closed.
fn run_tutorial<T>(cli_opts: &CLIOpts, name: &str) -> i32
where
  T: Tutorial<GL33>,
{
  let mut platform = DesktopPlatformServices::new(cli_opts);

  let dim = WindowDim::Windowed {
    width: cli_opts.width,
    height: cli_opts.height,
  };
  let surface = match GlfwSurface::new_gl33(name, WindowOpt::default().set_dim(dim)) {
    Ok(surface) => surface,
    Err(e) => {
      log::error!("cannot create GLFW surface: {}", e);
      return -1;
    }
  };
  let mut context = surface.context;
  let events = surface.events_rx;

  let mut tutorial = match T::bootstrap(&mut platform, &mut context) {
    Ok(tutorial) => tutorial,
    Err(e) => {
      log::error!("cannot bootstrap {}: {}", name, e);
      return 1;
    }
  };
  let start_t = Instant::now();

  while !context.should_close() {
    context.process_input();

    // handle events
    context.window.glfw.poll_events();
    let mut actions = Vec::new();

    for (_, event) in glfw::flush_messages(&events) {
      context.handle_event(&event);
      actions.extend(adapt_events(event));
    }

    if context.should_close() {
      actions.push(InputAction::Quit);
    }

    let t = start_t.elapsed().as_secs_f32();
    let feedback = tutorial.render_frame(t, actions.into_iter(), &mut context);

    if feedback == LoopFeedback::Exit {
      break;
    }

    context.swap_buffers();
  }

  0
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
      Some(InputAction::Quit)
    }

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width as _,
      height: height as _,
    }),

    _ => None,
  }
}

tutorials! {
  "hello-triangle", hello_triangle,
  "two-triangles", two_triangles,
  "colored-triangle", colored_triangle,
  "textured-quad", textured_quad,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_tutorials {
    show_available_tutorials();
  } else {
    process::exit(pick_and_run_tutorial(cli_opts));
  }
}

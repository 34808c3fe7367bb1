//! [GLFW](https://crates.io/crates/glfw) surface for lucent.
//!
//! A [`GlfwSurface`] owns a window with an OpenGL 3.3 core context made current on the calling
//! thread, the GLFW event queue of that window and a [`GL33Context`] to render with.

#![deny(missing_docs)]

use glfw::{self, Action, Context as _, Glfw, InitError, Key, Window, WindowEvent, WindowMode};
use lucent::context::GraphicsContext;
use lucent::pipeline::Viewport;
pub use lucent_gl::gl33::StateQueryError;
use lucent_gl::GL33;
use lucent_windowing::{CursorMode, WindowDim, WindowOpt};
use std::{error, fmt, os::raw::c_void, sync::mpsc::Receiver};

/// Whether GLFW errors are logged instead of panicking (feature `log-errors`, on by default).
///
/// When they are logged, failing to initialize GLFW or to create the window is reported by
/// [`GlfwSurface::new`] as a [`GlfwSurfaceError`].
pub const LOGS_ERRORS: bool = cfg!(feature = "log-errors");

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum GlfwSurfaceError {
  /// Initialization of the surface went wrong.
  ///
  /// This variant exposes a **glfw** error for further information about what went wrong.
  InitError(InitError),

  /// The window (and its OpenGL context) couldn’t be created.
  WindowCreationFailed,

  /// OpenGL function pointers couldn’t be loaded.
  DriverLoadFailed,

  /// The graphics state is not available.
  ///
  /// This error is generated when the initialization code is called on a thread on which the
  /// graphics state has already been acquired.
  GraphicsStateError(StateQueryError),
}

impl fmt::Display for GlfwSurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      GlfwSurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      GlfwSurfaceError::WindowCreationFailed => f.write_str("failed to create GLFW window"),
      GlfwSurfaceError::DriverLoadFailed => f.write_str("failed to load OpenGL functions"),
      GlfwSurfaceError::GraphicsStateError(ref e) => {
        write!(f, "failed to get graphics state: {}", e)
      }
    }
  }
}

impl From<InitError> for GlfwSurfaceError {
  fn from(e: InitError) -> Self {
    GlfwSurfaceError::InitError(e)
  }
}

impl error::Error for GlfwSurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      GlfwSurfaceError::InitError(e) => Some(e),
      GlfwSurfaceError::GraphicsStateError(e) => Some(e),
      _ => None,
    }
  }
}

/// GLFW surface.
///
/// This type is a helper that exposes two important concepts: the GLFW event receiver that you can
/// use to poll events and the [`GL33Context`], which allows you to perform the rendering part.
#[derive(Debug)]
pub struct GlfwSurface {
  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped lucent context.
  pub context: GL33Context,
}

impl GlfwSurface {
  /// Initialize GLFW to provide a lucent environment.
  ///
  /// `create_window` is handed the GLFW instance once the OpenGL hints are set and must return the
  /// created window along with its event queue.
  pub fn new(
    create_window: impl FnOnce(
      &mut Glfw,
    ) -> Result<(Window, Receiver<(f64, WindowEvent)>), GlfwSurfaceError>,
  ) -> Result<Self, GlfwSurfaceError> {
    #[cfg(feature = "log-errors")]
    let error_cbk = glfw::LOG_ERRORS;
    #[cfg(not(feature = "log-errors"))]
    let error_cbk = glfw::FAIL_ON_ERRORS;

    let mut glfw = glfw::init(error_cbk)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
    glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));

    let (mut window, events_rx) = create_window(&mut glfw)?;

    window.make_current();
    window.set_framebuffer_size_polling(true);
    window.set_key_polling(true);
    window.set_close_polling(true);

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    if !gl::Viewport::is_loaded() {
      return Err(GlfwSurfaceError::DriverLoadFailed);
    }

    let gl = GL33::new().map_err(GlfwSurfaceError::GraphicsStateError)?;
    let mut context = GL33Context { window, gl };

    // the framebuffer can be larger than the window on high-DPI screens
    let (w, h) = context.window.get_framebuffer_size();
    context.set_viewport(Viewport::whole(w as u32, h as u32));

    Ok(GlfwSurface { events_rx, context })
  }

  /// Open a window titled `title` with an OpenGL 3.3 core context, using the given options.
  pub fn new_gl33(title: &str, win_opt: WindowOpt) -> Result<Self, GlfwSurfaceError> {
    GlfwSurface::new(|glfw| {
      glfw.window_hint(glfw::WindowHint::Samples(win_opt.num_samples()));

      let created = match *win_opt.dim() {
        WindowDim::Windowed { width, height } => {
          glfw.create_window(width, height, title, WindowMode::Windowed)
        }

        WindowDim::Fullscreen => glfw.with_primary_monitor(|glfw, monitor| {
          let monitor = monitor?;
          let mode = monitor.get_video_mode()?;
          glfw.create_window(mode.width, mode.height, title, WindowMode::FullScreen(monitor))
        }),

        WindowDim::FullscreenRestricted { width, height } => {
          glfw.with_primary_monitor(|glfw, monitor| {
            glfw.create_window(width, height, title, WindowMode::FullScreen(monitor?))
          })
        }
      };

      let (mut window, events_rx) = created.ok_or(GlfwSurfaceError::WindowCreationFailed)?;

      window.set_cursor_mode(match win_opt.cursor_mode() {
        CursorMode::Visible => glfw::CursorMode::Normal,
        CursorMode::Invisible => glfw::CursorMode::Hidden,
        CursorMode::Disabled => glfw::CursorMode::Disabled,
      });

      Ok((window, events_rx))
    })
  }
}

/// lucent OpenGL 3.3 context.
///
/// This type also re-exports the GLFW window, if you need access to it.
#[derive(Debug)]
pub struct GL33Context {
  /// Wrapped GLFW window.
  pub window: Window,

  /// OpenGL 3.3 state.
  gl: GL33,
}

impl GL33Context {
  /// Whether the window was asked to close.
  pub fn should_close(&self) -> bool {
    self.window.should_close()
  }

  /// Flag the window to close if escape is currently pressed.
  pub fn process_input(&mut self) {
    if self.window.get_key(Key::Escape) == Action::Press {
      self.window.set_should_close(true);
    }
  }

  /// React to window events that affect the context.
  ///
  /// A framebuffer resize sets the viewport to the whole new framebuffer.
  pub fn handle_event(&mut self, event: &WindowEvent) {
    if let WindowEvent::FramebufferSize(width, height) = *event {
      log::debug!("framebuffer resized to {}×{}", width, height);
      self.set_viewport(Viewport::whole(width as u32, height as u32));
    }
  }

  /// Swap the front and back buffers.
  pub fn swap_buffers(&mut self) {
    self.window.swap_buffers();
  }
}

unsafe impl GraphicsContext for GL33Context {
  type Backend = GL33;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }
}

//! Window and OpenGL context creation with glutin.
use crate::api as gl;
use crate::api::Gl;
use crate::settings::WindowSettings;
use glutin::dpi::PhysicalSize;
use glutin::event_loop::EventLoop;
use glutin::window::WindowBuilder;
use glutin::{ContextBuilder, GlProfile, GlRequest, PossiblyCurrent, WindowedContext};
use std::error::Error;
use std::ffi::CStr;
use std::fmt;
use std::os::raw::{c_char, c_void};

pub type GlWindow = WindowedContext<PossiblyCurrent>;

macro_rules! check_loaded {
    ($gl:expr, $($func:ident),* $(,)*) => {{
        let mut missing = Vec::new();
        $(
            if !$gl.$func.is_loaded() {
                missing.push(concat!("gl", stringify!($func)));
            }
        )*
        missing
    }};
}

/// Returns the entry points, among those every tutorial program needs, that did not resolve
/// (neither under their core name nor under any fallback name).
pub fn missing_functions(gl: &Gl) -> Vec<&'static str> {
    check_loaded!(
        gl,
        Viewport,
        Clear,
        CreateShader,
        CompileShader,
        LinkProgram,
        GenVertexArrays,
        GenBuffers,
        BufferData,
        VertexAttribPointer,
        TexImage2D,
        DrawElements,
        DrawArrays,
    )
}

//--------------------------------------------------------------------------------------------------
#[derive(Debug)]
pub enum WindowCreationError {
    Context(glutin::CreationError),
    MakeCurrent(glutin::ContextError),
    /// The function table was loaded but these required entry points were not found.
    MissingFunctions(Vec<&'static str>),
}

impl fmt::Display for WindowCreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WindowCreationError::Context(err) => {
                write!(f, "failed to create window and context: {}", err)
            }
            WindowCreationError::MakeCurrent(err) => {
                write!(f, "failed to make the context current: {}", err)
            }
            WindowCreationError::MissingFunctions(missing) => write!(
                f,
                "failed to load OpenGL functions: {}",
                missing.join(", ")
            ),
        }
    }
}

impl Error for WindowCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WindowCreationError::Context(err) => Some(err),
            WindowCreationError::MakeCurrent(err) => Some(err),
            WindowCreationError::MissingFunctions(_) => None,
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// Opens a window with an OpenGL 3.3 core context, makes it current and loads the function table.
pub fn create_window_and_context(
    settings: &WindowSettings,
    event_loop: &EventLoop<()>,
) -> Result<(GlWindow, Gl), WindowCreationError> {
    let window_builder = WindowBuilder::new()
        .with_title(settings.title.clone())
        .with_inner_size(PhysicalSize::new(settings.width, settings.height));

    let context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(glutin::Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(settings.vsync)
        .build_windowed(window_builder, event_loop)
        .map_err(WindowCreationError::Context)?;

    let context = unsafe { context.make_current() }
        .map_err(|(_, err)| WindowCreationError::MakeCurrent(err))?;

    let gl = Gl::load_with(|symbol| context.get_proc_address(symbol) as *const c_void);
    let missing = missing_functions(&gl);
    if !missing.is_empty() {
        return Err(WindowCreationError::MissingFunctions(missing));
    }

    log_context_info(&gl);

    let size = context.window().inner_size();
    set_viewport(&gl, size.width, size.height);

    Ok((context, gl))
}

fn log_context_info(gl: &Gl) {
    let get = |name| unsafe {
        let ptr = gl.GetString(name);
        if ptr.is_null() {
            "<unknown>".to_string()
        } else {
            CStr::from_ptr(ptr as *const c_char)
                .to_string_lossy()
                .into_owned()
        }
    };
    info!(
        "OpenGL version {} (vendor: {}, renderer: {})",
        get(gl::VERSION),
        get(gl::VENDOR),
        get(gl::RENDERER)
    );
}

pub fn set_viewport(gl: &Gl, width: u32, height: u32) {
    unsafe {
        gl.Viewport(0, 0, width as i32, height as i32);
    }
}

//--------------------------------------------------------------------------------------------------

/// Keeps the viewport in step with the framebuffer size.
///
/// Polled once per frame with the current framebuffer size; reports each change exactly once.
#[derive(Copy, Clone, Debug)]
pub struct ViewportTracker {
    size: (u32, u32),
}

impl ViewportTracker {
    pub fn new(width: u32, height: u32) -> ViewportTracker {
        ViewportTracker {
            size: (width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size;
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    /// Returns the new size if it differs from the last one seen.
    ///
    /// Zero-sized framebuffers (minimized windows) are ignored.
    pub fn sync(&mut self, size: (u32, u32)) -> Option<(u32, u32)> {
        if size.0 == 0 || size.1 == 0 || size == self.size {
            return None;
        }
        self.size = size;
        Some(size)
    }
}

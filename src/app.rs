//! Window, context and frame loop shared by the tutorial programs.
use crate::api::Gl;
use crate::input::KeyboardState;
use crate::settings::Settings;
use crate::window::{
    create_window_and_context, set_viewport, GlWindow, ViewportTracker, WindowCreationError,
};
use glutin::event::{Event, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;
use std::fmt;
use std::process;
use std::time::Instant;

/// State handed to the frame callback.
pub struct Frame<'a> {
    pub gl: &'a Gl,
    pub keys: &'a KeyboardState,
    /// Seconds since the app was created.
    pub time: f32,
    /// Number of frames rendered before this one.
    pub index: u64,
    pub viewport: &'a ViewportTracker,
}

pub struct App {
    settings: Settings,
    event_loop: EventLoop<()>,
    context: GlWindow,
    gl: Gl,
    viewport: ViewportTracker,
    start: Instant,
}

impl App {
    /// Initializes logging, loads the settings and opens the window.
    pub fn new() -> Result<App, WindowCreationError> {
        let _ = pretty_env_logger::try_init();

        let settings = Settings::load().unwrap_or_else(|err| {
            warn!("unable to load settings ({}), using defaults", err);
            Settings::default()
        });
        debug!("{:?}", settings);

        let event_loop = EventLoop::new();
        let (context, gl) = create_window_and_context(&settings.window, &event_loop)?;
        let size = context.window().inner_size();

        Ok(App {
            settings,
            event_loop,
            context,
            gl,
            viewport: ViewportTracker::new(size.width, size.height),
            start: Instant::now(),
        })
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }

    /// Runs the frame loop until the window is closed or Escape is pressed.
    ///
    /// Each iteration: process pending window events, resize the viewport if the framebuffer
    /// changed, call `f`, present.
    pub fn run<F>(self, mut f: F)
    where
        F: FnMut(&mut Frame),
    {
        let App {
            mut event_loop,
            context,
            gl,
            mut viewport,
            start,
            ..
        } = self;

        let mut keys = KeyboardState::new();
        let mut index = 0u64;

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                    WindowEvent::KeyboardInput { input, .. } => keys.handle_input(&input),
                    WindowEvent::Focused(false) => keys.clear(),
                    _ => {}
                },
                Event::MainEventsCleared => {
                    if keys.is_pressed(VirtualKeyCode::Escape) {
                        *control_flow = ControlFlow::Exit;
                        return;
                    }

                    let size = context.window().inner_size();
                    if let Some((width, height)) = viewport.sync((size.width, size.height)) {
                        debug!("framebuffer resized to {}x{}", width, height);
                        context.resize(size);
                        set_viewport(&gl, width, height);
                    }

                    let mut frame = Frame {
                        gl: &gl,
                        keys: &keys,
                        time: start.elapsed().as_secs_f32(),
                        index,
                        viewport: &viewport,
                    };
                    f(&mut frame);
                    index += 1;

                    if let Err(err) = context.swap_buffers() {
                        error!("unable to present: {}", err);
                        *control_flow = ControlFlow::Exit;
                    }
                }
                _ => {}
            }
        });

        info!("exiting after {} frames", index);
    }
}

/// Logs a fatal error and exits the process with a failure status.
pub fn fatal<E: fmt::Display>(err: E) -> ! {
    error!("{}", err);
    process::exit(-1)
}

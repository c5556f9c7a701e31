//! Shared building blocks for the LearnOpenGL tutorial programs in `src/bin`.
//!
//! Each program opens a window through [App], builds its shader program with
//! [shader::build_program], uploads its geometry and textures once, then draws from the frame
//! callback passed to [App::run].
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

// Reexport nalgebra_glm so that the programs don't need their own dependency
pub use nalgebra_glm as glm;

pub mod api;
pub mod app;
pub mod draw;
pub mod geometry;
pub mod input;
pub mod settings;
pub mod shader;
pub mod texture;
pub mod transform;
pub mod window;

pub use self::app::{App, Frame};
pub use self::settings::Settings;
pub use self::shader::{build_program, BuildPolicy, ShaderProgram, ShaderSource};

//! Small per-frame state helpers: clearing, depth test, polygon mode.
use crate::api as gl;
use crate::api::types::*;
use crate::api::Gl;

/// Background color used by every tutorial program.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

bitflags! {
    pub struct ClearFlags: GLbitfield {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
    }
}

pub fn clear(gl: &Gl, color: [f32; 4], flags: ClearFlags) {
    unsafe {
        gl.ClearColor(color[0], color[1], color[2], color[3]);
        gl.Clear(flags.bits());
    }
}

pub fn enable_depth_test(gl: &Gl) {
    unsafe { gl.Enable(gl::DEPTH_TEST) }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PolygonMode {
    Fill,
    Line,
}

impl PolygonMode {
    pub fn to_glenum(self) -> GLenum {
        match self {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        }
    }

    pub fn toggled(self) -> PolygonMode {
        match self {
            PolygonMode::Fill => PolygonMode::Line,
            PolygonMode::Line => PolygonMode::Fill,
        }
    }

    pub fn apply(self, gl: &Gl) {
        unsafe { gl.PolygonMode(gl::FRONT_AND_BACK, self.to_glenum()) }
    }
}

/// Flips between filled and wireframe rendering every `period` frames, starting on frame 0.
#[derive(Copy, Clone, Debug)]
pub struct PolygonModeToggle {
    period: u64,
    mode: PolygonMode,
}

impl PolygonModeToggle {
    pub fn new(period: u64) -> PolygonModeToggle {
        PolygonModeToggle {
            period: period.max(1),
            mode: PolygonMode::Fill,
        }
    }

    pub fn mode(&self) -> PolygonMode {
        self.mode
    }

    /// Returns the new mode on the frames where it changes.
    pub fn tick(&mut self, frame_index: u64) -> Option<PolygonMode> {
        if frame_index % self.period == 0 {
            self.mode = self.mode.toggled();
            Some(self.mode)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_on_period_boundaries() {
        let mut t = PolygonModeToggle::new(120);
        assert_eq!(t.tick(0), Some(PolygonMode::Line));
        assert!((1..120).all(|i| t.tick(i).is_none()));
        assert_eq!(t.mode(), PolygonMode::Line);
        assert_eq!(t.tick(120), Some(PolygonMode::Fill));
        assert_eq!(t.tick(240), Some(PolygonMode::Line));
    }

    #[test]
    fn clear_flags_match_gl_bits() {
        let flags = ClearFlags::COLOR | ClearFlags::DEPTH;
        assert_eq!(flags.bits(), gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
}

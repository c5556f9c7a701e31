//! Shader build step: turns a vertex and a fragment source into a linked program.
//!
//! All GL calls go through [ShaderDevice], which [Gl] implements. The build step itself
//! never touches the driver directly.
use crate::api as gl;
use crate::api::types::*;
use crate::api::Gl;
use nalgebra_glm as glm;
use std::borrow::Cow;
use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

/// Upper bound on the size of a retrieved compile or link log, in bytes.
pub const MAX_INFO_LOG_LEN: usize = 1024;

//--------------------------------------------------------------------------------------------------
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn to_glenum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// Where the text of a shader stage comes from.
#[derive(Clone, Debug)]
pub enum ShaderSource {
    /// Source embedded in the program.
    Inline(Cow<'static, str>),
    /// Source read from a file when the program is built.
    File(PathBuf),
}

impl ShaderSource {
    pub fn inline(src: impl Into<Cow<'static, str>>) -> ShaderSource {
        ShaderSource::Inline(src.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> ShaderSource {
        ShaderSource::File(path.into())
    }

    /// Short human-readable description of the source, used in diagnostics.
    pub fn origin(&self) -> String {
        match self {
            ShaderSource::Inline(_) => "<inline>".to_string(),
            ShaderSource::File(path) => path.display().to_string(),
        }
    }

    pub fn load(&self) -> io::Result<Cow<'_, str>> {
        match self {
            ShaderSource::Inline(src) => Ok(Cow::Borrowed(src.as_ref())),
            ShaderSource::File(path) => fs::read_to_string(path).map(Cow::Owned),
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// What to do when a stage fails to compile or the program fails to link.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuildPolicy {
    /// Stop at the first diagnostic and return it as an error.
    FailFast,
    /// Log every diagnostic and hand back a program that draws nothing.
    Permissive,
}

impl Default for BuildPolicy {
    fn default() -> Self {
        BuildPolicy::FailFast
    }
}

impl FromStr for BuildPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "failfast" | "abort" => Ok(BuildPolicy::FailFast),
            "permissive" | "continue" => Ok(BuildPolicy::Permissive),
            other => Err(format!("unknown shader build policy `{}`", other)),
        }
    }
}

//--------------------------------------------------------------------------------------------------
#[derive(Debug)]
pub enum ShaderBuildError {
    /// The source file could not be read.
    Io { path: PathBuf, err: io::Error },
    /// The source text was empty.
    EmptySource { stage: ShaderStage, origin: String },
    /// The driver rejected a stage.
    Compile {
        stage: ShaderStage,
        origin: String,
        log: String,
    },
    /// The driver could not link the two stages together.
    Link { log: String },
}

impl ShaderBuildError {
    /// The driver log, if this error came from the driver.
    pub fn log(&self) -> Option<&str> {
        match self {
            ShaderBuildError::Compile { log, .. } | ShaderBuildError::Link { log } => Some(log),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderBuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShaderBuildError::Io { path, err } => {
                write!(f, "unable to read shader source `{}`: {}", path.display(), err)
            }
            ShaderBuildError::EmptySource { stage, origin } => {
                write!(f, "{} shader source `{}` is empty", stage, origin)
            }
            ShaderBuildError::Compile { stage, origin, log } => write!(
                f,
                "{} shader compilation failed (`{}`):\n{}",
                stage, origin, log
            ),
            ShaderBuildError::Link { log } => write!(f, "program linking failed:\n{}", log),
        }
    }
}

impl Error for ShaderBuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ShaderBuildError::Io { err, .. } => Some(err),
            _ => None,
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// The subset of the graphics API needed to build programs and set their uniforms.
///
/// Object names follow GL conventions: 0 is never a valid object, and a uniform location of -1
/// designates a uniform that does not exist (setting it is a no-op).
pub trait ShaderDevice {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    /// Uploads the source text and compiles it. Returns the compile status.
    fn compile_shader(&self, shader: GLuint, source: &str) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    /// Links the program. Returns the link status.
    fn link_program(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    fn use_program(&self, program: GLuint);
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]);
}

fn log_from_bytes(mut buf: Vec<u8>, len: GLsizei) -> String {
    buf.truncate(len.max(0) as usize);
    String::from_utf8_lossy(&buf)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

impl ShaderDevice for Gl {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { self.CreateShader(stage.to_glenum()) }
    }

    fn compile_shader(&self, shader: GLuint, source: &str) -> bool {
        unsafe {
            let sources = [source.as_ptr() as *const GLchar];
            let lengths = [source.len() as GLint];
            self.ShaderSource(shader, 1, sources.as_ptr(), lengths.as_ptr());
            self.CompileShader(shader);
            let mut status = 0;
            self.GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
            status == gl::TRUE as GLint
        }
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        unsafe {
            let mut log_size = 0;
            self.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_size);
            let cap = (log_size.max(0) as usize).min(MAX_INFO_LOG_LEN);
            let mut log_buf = vec![0u8; cap];
            let mut written = 0;
            self.GetShaderInfoLog(
                shader,
                cap as GLsizei,
                &mut written,
                log_buf.as_mut_ptr() as *mut GLchar,
            );
            log_from_bytes(log_buf, written)
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { self.DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { self.CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { self.AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) -> bool {
        unsafe {
            self.LinkProgram(program);
            let mut status = 0;
            self.GetProgramiv(program, gl::LINK_STATUS, &mut status);
            status == gl::TRUE as GLint
        }
    }

    fn program_info_log(&self, program: GLuint) -> String {
        unsafe {
            let mut log_size = 0;
            self.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_size);
            let cap = (log_size.max(0) as usize).min(MAX_INFO_LOG_LEN);
            let mut log_buf = vec![0u8; cap];
            let mut written = 0;
            self.GetProgramInfoLog(
                program,
                cap as GLsizei,
                &mut written,
                log_buf.as_mut_ptr() as *mut GLchar,
            );
            log_from_bytes(log_buf, written)
        }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { self.DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { self.UseProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match CString::new(name) {
            Ok(name) => unsafe { self.GetUniformLocation(program, name.as_ptr()) },
            Err(_) => -1,
        }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { self.Uniform1f(location, value) }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { self.Uniform1i(location, value) }
    }

    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        unsafe { self.UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }
}

//--------------------------------------------------------------------------------------------------

/// A linked shader program, or a placeholder for one that failed to build.
#[derive(Debug)]
pub struct ShaderProgram {
    obj: GLuint,
    diagnostics: Vec<ShaderBuildError>,
}

impl ShaderProgram {
    fn invalid(diagnostics: Vec<ShaderBuildError>) -> ShaderProgram {
        ShaderProgram {
            obj: 0,
            diagnostics,
        }
    }

    pub fn obj(&self) -> GLuint {
        self.obj
    }

    /// Whether linking succeeded. Invalid programs are never bound.
    pub fn is_valid(&self) -> bool {
        self.obj != 0 && self.diagnostics.is_empty()
    }

    /// Diagnostics collected while building under [BuildPolicy::Permissive].
    pub fn diagnostics(&self) -> &[ShaderBuildError] {
        &self.diagnostics
    }

    pub fn bind<D: ShaderDevice + ?Sized>(&self, device: &D) {
        if self.is_valid() {
            device.use_program(self.obj);
        }
    }

    fn location<D: ShaderDevice + ?Sized>(&self, device: &D, name: &str) -> Option<GLint> {
        if !self.is_valid() {
            return None;
        }
        let loc = device.uniform_location(self.obj, name);
        if loc < 0 {
            trace!("uniform `{}` not found in program {}", name, self.obj);
            None
        } else {
            Some(loc)
        }
    }

    /// Sets a float uniform. The program must be bound.
    pub fn set_f32<D: ShaderDevice + ?Sized>(&self, device: &D, name: &str, value: f32) {
        if let Some(loc) = self.location(device, name) {
            device.uniform_1f(loc, value);
        }
    }

    /// Sets an integer (or sampler) uniform. The program must be bound.
    pub fn set_i32<D: ShaderDevice + ?Sized>(&self, device: &D, name: &str, value: i32) {
        if let Some(loc) = self.location(device, name) {
            device.uniform_1i(loc, value);
        }
    }

    /// Sets a 4x4 matrix uniform (column-major, not transposed). The program must be bound.
    pub fn set_mat4<D: ShaderDevice + ?Sized>(&self, device: &D, name: &str, value: &glm::Mat4) {
        if let Some(loc) = self.location(device, name) {
            let mut data = [0.0f32; 16];
            data.copy_from_slice(value.as_slice());
            device.uniform_matrix4(loc, &data);
        }
    }

    pub fn destroy<D: ShaderDevice + ?Sized>(self, device: &D) {
        if self.obj != 0 {
            device.delete_program(self.obj);
        }
    }
}

//--------------------------------------------------------------------------------------------------
fn compile_stage<D: ShaderDevice + ?Sized>(
    device: &D,
    stage: ShaderStage,
    source: &ShaderSource,
) -> Result<GLuint, ShaderBuildError> {
    let text = source.load().map_err(|err| ShaderBuildError::Io {
        path: match source {
            ShaderSource::File(path) => path.clone(),
            ShaderSource::Inline(_) => PathBuf::new(),
        },
        err,
    })?;

    if text.trim().is_empty() {
        return Err(ShaderBuildError::EmptySource {
            stage,
            origin: source.origin(),
        });
    }

    let obj = device.create_shader(stage);
    if device.compile_shader(obj, &text) {
        debug!("compiled {} shader `{}` ({})", stage, source.origin(), obj);
        Ok(obj)
    } else {
        let log = device.shader_info_log(obj);
        device.delete_shader(obj);
        Err(ShaderBuildError::Compile {
            stage,
            origin: source.origin(),
            log,
        })
    }
}

fn link_stages<D: ShaderDevice + ?Sized>(
    device: &D,
    vertex: GLuint,
    fragment: GLuint,
) -> Result<GLuint, ShaderBuildError> {
    let program = device.create_program();
    device.attach_shader(program, vertex);
    device.attach_shader(program, fragment);
    let linked = device.link_program(program);

    // the stages are not needed anymore, whatever the outcome
    device.delete_shader(vertex);
    device.delete_shader(fragment);

    if linked {
        Ok(program)
    } else {
        let log = device.program_info_log(program);
        device.delete_program(program);
        Err(ShaderBuildError::Link { log })
    }
}

/// Compiles both stages and links them into a program.
///
/// Under [BuildPolicy::FailFast] the first diagnostic is returned as an error. Under
/// [BuildPolicy::Permissive] every diagnostic is logged and an invalid program carrying them
/// is returned instead; this never returns `Err`.
pub fn build_program<D: ShaderDevice + ?Sized>(
    device: &D,
    vertex: &ShaderSource,
    fragment: &ShaderSource,
    policy: BuildPolicy,
) -> Result<ShaderProgram, ShaderBuildError> {
    let mut compiled = Vec::with_capacity(2);
    let mut diagnostics = Vec::new();

    for &(stage, source) in &[
        (ShaderStage::Vertex, vertex),
        (ShaderStage::Fragment, fragment),
    ] {
        match compile_stage(device, stage, source) {
            Ok(obj) => compiled.push(obj),
            Err(err) => {
                if policy == BuildPolicy::FailFast {
                    compiled.iter().for_each(|&obj| device.delete_shader(obj));
                    return Err(err);
                }
                error!("{}", err);
                diagnostics.push(err);
            }
        }
    }

    if !diagnostics.is_empty() {
        compiled.iter().for_each(|&obj| device.delete_shader(obj));
        return Ok(ShaderProgram::invalid(diagnostics));
    }

    match link_stages(device, compiled[0], compiled[1]) {
        Ok(obj) => {
            debug!(
                "linked program {} (`{}` + `{}`)",
                obj,
                vertex.origin(),
                fragment.origin()
            );
            Ok(ShaderProgram {
                obj,
                diagnostics: Vec::new(),
            })
        }
        Err(err) => match policy {
            BuildPolicy::FailFast => Err(err),
            BuildPolicy::Permissive => {
                error!("{}", err);
                Ok(ShaderProgram::invalid(vec![err]))
            }
        },
    }
}

/// Convenience wrapper reading both stages from files.
pub fn build_program_from_files<D: ShaderDevice + ?Sized>(
    device: &D,
    vertex_path: impl Into<PathBuf>,
    fragment_path: impl Into<PathBuf>,
    policy: BuildPolicy,
) -> Result<ShaderProgram, ShaderBuildError> {
    build_program(
        device,
        &ShaderSource::file(vertex_path),
        &ShaderSource::file(fragment_path),
        policy,
    )
}

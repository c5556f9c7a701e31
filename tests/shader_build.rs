use learngl::glm;
use learngl::shader::{
    build_program, build_program_from_files, BuildPolicy, ShaderBuildError, ShaderDevice,
    ShaderSource, ShaderStage,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;

const VALID_VS: &str = "#version 330 core\nvoid main() { gl_Position = vec4(0.0, 0.0, 0.0, 1.0); }\n";
const VALID_FS: &str =
    "#version 330 core\nout vec4 fragColor;\nvoid main() { fragColor = vec4(1.0, 1.0, 1.0, 1.0); }\n";
const BROKEN_FS: &str = "#version 330 core\nout vec4 fragColor;\nvoid main() { fragColor = vec4(1.0 }\n";

#[derive(Debug, PartialEq)]
enum Uniform {
    F32(i32, f32),
    I32(i32, i32),
    Mat4(i32, [f32; 16]),
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    log: String,
    deleted: bool,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    deleted: bool,
}

/// Stands in for a GL context: "compiles" anything with a `main` and balanced parentheses and
/// braces, and links unless told otherwise.
#[derive(Default)]
struct FakeDevice {
    next_obj: Cell<u32>,
    fail_link: bool,
    shaders: RefCell<HashMap<u32, FakeShader>>,
    programs: RefCell<HashMap<u32, FakeProgram>>,
    bound: Cell<u32>,
    uniforms: RefCell<Vec<Uniform>>,
}

impl FakeDevice {
    fn failing_link() -> FakeDevice {
        FakeDevice {
            fail_link: true,
            ..FakeDevice::default()
        }
    }

    fn alloc(&self) -> u32 {
        self.next_obj.set(self.next_obj.get() + 1);
        self.next_obj.get()
    }

    fn live_shaders(&self) -> usize {
        self.shaders.borrow().values().filter(|s| !s.deleted).count()
    }

    fn created_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    fn live_programs(&self) -> usize {
        self.programs.borrow().values().filter(|p| !p.deleted).count()
    }

    fn created_programs(&self) -> usize {
        self.programs.borrow().len()
    }
}

fn balanced(source: &str) -> bool {
    let mut depth = 0i32;
    for c in source.chars() {
        match c {
            '(' | '{' => depth += 1,
            ')' | '}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

impl ShaderDevice for FakeDevice {
    fn create_shader(&self, stage: ShaderStage) -> u32 {
        let obj = self.alloc();
        self.shaders.borrow_mut().insert(
            obj,
            FakeShader {
                stage,
                log: String::new(),
                deleted: false,
            },
        );
        obj
    }

    fn compile_shader(&self, shader: u32, source: &str) -> bool {
        let ok = source.contains("void main") && balanced(source);
        if !ok {
            let mut shaders = self.shaders.borrow_mut();
            let s = shaders.get_mut(&shader).unwrap();
            s.log = format!("0:3(44): error: syntax error in {:?} stage", s.stage);
        }
        ok
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shaders.borrow()[&shader].log.clone()
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().get_mut(&shader).unwrap().deleted = true;
    }

    fn create_program(&self) -> u32 {
        let obj = self.alloc();
        self.programs
            .borrow_mut()
            .insert(obj, FakeProgram::default());
        obj
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        assert!(!self.shaders.borrow()[&shader].deleted);
        self.programs
            .borrow_mut()
            .get_mut(&program)
            .unwrap()
            .attached
            .push(shader);
    }

    fn link_program(&self, program: u32) -> bool {
        assert_eq!(self.programs.borrow()[&program].attached.len(), 2);
        !self.fail_link
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: fragment shader input `TexCoord` has no matching vertex output".to_string()
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().get_mut(&program).unwrap().deleted = true;
    }

    fn use_program(&self, program: u32) {
        self.bound.set(program);
    }

    fn uniform_location(&self, _program: u32, name: &str) -> i32 {
        match name {
            "alpha" => 0,
            "texture1" => 1,
            "model" => 2,
            _ => -1,
        }
    }

    fn uniform_1f(&self, location: i32, value: f32) {
        self.uniforms.borrow_mut().push(Uniform::F32(location, value));
    }

    fn uniform_1i(&self, location: i32, value: i32) {
        self.uniforms.borrow_mut().push(Uniform::I32(location, value));
    }

    fn uniform_matrix4(&self, location: i32, value: &[f32; 16]) {
        self.uniforms
            .borrow_mut()
            .push(Uniform::Mat4(location, *value));
    }
}

//--------------------------------------------------------------------------------------------------

#[test]
fn test_valid_pair_links() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap();

    assert!(program.is_valid());
    assert!(program.diagnostics().is_empty());
    assert_eq!(dev.programs.borrow()[&program.obj()].attached.len(), 2);
    // stage objects are released once linked
    assert_eq!(dev.created_shaders(), 2);
    assert_eq!(dev.live_shaders(), 0);
    assert_eq!(dev.live_programs(), 1);

    program.bind(&dev);
    assert_eq!(dev.bound.get(), program.obj());
}

#[test]
fn test_minimal_placeholder_shaders() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline("void main(){gl_Position=vec4(0,0,0,1);}"),
        &ShaderSource::inline("void main(){fragColor=vec4(1,1,1,1);}"),
        BuildPolicy::Permissive,
    )
    .unwrap();
    assert!(program.is_valid());
    assert!(program.diagnostics().is_empty());
}

#[test]
fn test_compile_error_fail_fast() {
    let dev = FakeDevice::default();
    let err = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(BROKEN_FS),
        BuildPolicy::FailFast,
    )
    .unwrap_err();

    match err {
        ShaderBuildError::Compile {
            stage, ref log, ..
        } => {
            assert_eq!(stage, ShaderStage::Fragment);
            assert!(!log.is_empty());
        }
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("fragment shader compilation failed"));

    // nothing leaks, nothing gets linked
    assert_eq!(dev.live_shaders(), 0);
    assert_eq!(dev.created_programs(), 0);
}

#[test]
fn test_vertex_error_stops_before_fragment() {
    let dev = FakeDevice::default();
    let err = build_program(
        &dev,
        &ShaderSource::inline("void main() { gl_Position = vec4(0.0; }"),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap_err();

    assert!(err.log().map_or(false, |log| !log.is_empty()));
    assert_eq!(dev.created_shaders(), 1);
    assert_eq!(dev.live_shaders(), 0);
}

#[test]
fn test_compile_error_permissive() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(BROKEN_FS),
        BuildPolicy::Permissive,
    )
    .unwrap();

    assert!(!program.is_valid());
    assert_eq!(program.diagnostics().len(), 1);
    assert!(!program.diagnostics()[0].to_string().is_empty());
    assert_eq!(dev.live_shaders(), 0);
    assert_eq!(dev.created_programs(), 0);

    // an invalid program is never bound and never receives uniforms
    program.bind(&dev);
    program.set_f32(&dev, "alpha", 0.5);
    assert_eq!(dev.bound.get(), 0);
    assert!(dev.uniforms.borrow().is_empty());
}

#[test]
fn test_permissive_reports_both_stages() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline("void main() {"),
        &ShaderSource::inline(BROKEN_FS),
        BuildPolicy::Permissive,
    )
    .unwrap();

    let stages: Vec<_> = program
        .diagnostics()
        .iter()
        .map(|d| match d {
            ShaderBuildError::Compile { stage, .. } => *stage,
            other => panic!("unexpected error: {:?}", other),
        })
        .collect();
    assert_eq!(stages, vec![ShaderStage::Vertex, ShaderStage::Fragment]);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("shader.vert");
    let dev = FakeDevice::default();

    let err = build_program(
        &dev,
        &ShaderSource::file(&missing),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap_err();
    match err {
        ShaderBuildError::Io { ref path, .. } => assert_eq!(path, &missing),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("shader.vert"));
    assert_eq!(dev.created_shaders(), 0);

    let program = build_program(
        &dev,
        &ShaderSource::file(&missing),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::Permissive,
    )
    .unwrap();
    assert!(!program.is_valid());
    assert_eq!(dev.live_shaders(), 0);
    assert_eq!(dev.created_programs(), 0);
}

#[test]
fn test_sources_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let vs = dir.path().join("shader.vert");
    let fs_path = dir.path().join("shader.frag");
    fs::write(&vs, VALID_VS).unwrap();
    fs::write(&fs_path, VALID_FS).unwrap();

    let dev = FakeDevice::default();
    let program = build_program_from_files(&dev, &vs, &fs_path, BuildPolicy::FailFast).unwrap();
    assert!(program.is_valid());
}

#[test]
fn test_empty_source() {
    let dev = FakeDevice::default();
    let err = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline("  \n"),
        BuildPolicy::FailFast,
    )
    .unwrap_err();
    match err {
        ShaderBuildError::EmptySource { stage, .. } => assert_eq!(stage, ShaderStage::Fragment),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(dev.live_shaders(), 0);
}

#[test]
fn test_link_error() {
    let dev = FakeDevice::failing_link();
    let err = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap_err();
    match err {
        ShaderBuildError::Link { ref log } => assert!(log.contains("TexCoord")),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(dev.live_shaders(), 0);
    assert_eq!(dev.created_programs(), 1);
    assert_eq!(dev.live_programs(), 0);

    let program = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::Permissive,
    )
    .unwrap();
    assert!(!program.is_valid());
    assert!(program.diagnostics()[0].log().is_some());
}

#[test]
fn test_uniforms() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap();

    program.bind(&dev);
    program.set_f32(&dev, "alpha", 0.6);
    program.set_i32(&dev, "texture1", 0);
    program.set_f32(&dev, "does_not_exist", 1.0);
    let model = glm::translate(&glm::identity(), &glm::vec3(1.0, 2.0, 3.0));
    program.set_mat4(&dev, "model", &model);

    let uniforms = dev.uniforms.borrow();
    assert_eq!(uniforms.len(), 3);
    assert_eq!(uniforms[0], Uniform::F32(0, 0.6));
    assert_eq!(uniforms[1], Uniform::I32(1, 0));
    match uniforms[2] {
        // column-major: translation in elements 12..15
        Uniform::Mat4(2, m) => assert_eq!(&m[12..15], &[1.0, 2.0, 3.0]),
        ref other => panic!("unexpected uniform: {:?}", other),
    }
}

#[test]
fn test_destroy_releases_program() {
    let dev = FakeDevice::default();
    let program = build_program(
        &dev,
        &ShaderSource::inline(VALID_VS),
        &ShaderSource::inline(VALID_FS),
        BuildPolicy::FailFast,
    )
    .unwrap();
    program.destroy(&dev);
    assert_eq!(dev.live_programs(), 0);
}

#[test]
fn test_policy_from_str() {
    assert_eq!("fail_fast".parse(), Ok(BuildPolicy::FailFast));
    assert_eq!("Permissive".parse(), Ok(BuildPolicy::Permissive));
    assert!("sometimes".parse::<BuildPolicy>().is_err());
    assert_eq!(BuildPolicy::default(), BuildPolicy::FailFast);
}

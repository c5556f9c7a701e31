//! An orange quad drawn from an index buffer, flipping between filled and wireframe rendering
//! every 120 frames.
use learngl::app::fatal;
use learngl::draw::{self, ClearFlags, PolygonModeToggle};
use learngl::geometry::{self, Mesh};
use learngl::{build_program, App, ShaderSource};

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
out vec4 FragColor;

void main()
{
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
"#;

const VERTICES: [f32; 12] = [
    0.5, 0.5, 0.0, // top right
    0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5, 0.5, 0.0, // top left
];

const INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

fn main() {
    let app = App::new().unwrap_or_else(|err| fatal(err));
    let gl = app.gl();

    let program = build_program(
        gl,
        &ShaderSource::inline(VERTEX_SHADER),
        &ShaderSource::inline(FRAGMENT_SHADER),
        app.settings().shader_policy,
    )
    .unwrap_or_else(|err| fatal(err));

    let quad = Mesh::new(gl, &VERTICES, Some(&INDICES[..]), &geometry::POSITION);
    let mut wireframe = PolygonModeToggle::new(120);

    app.run(move |frame| {
        if let Some(mode) = wireframe.tick(frame.index) {
            mode.apply(frame.gl);
        }

        draw::clear(frame.gl, draw::CLEAR_COLOR, ClearFlags::COLOR);
        program.bind(frame.gl);
        quad.draw(frame.gl);
    });
}

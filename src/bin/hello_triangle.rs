//! Two shapes sharing one vertex buffer; the vertex shader picks the color from the height
//! of each vertex.
use learngl::app::fatal;
use learngl::draw::{self, ClearFlags};
use learngl::geometry::{self, Mesh};
use learngl::{build_program, App, ShaderSource};

const VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
out vec4 vertexColour;

void main()
{
    gl_Position = vec4(aPos, 1.0);
    if (aPos.y < -0.5)
        vertexColour = vec4(1.0, 0.0, 0.0, 1.0);
    else
        vertexColour = vec4(0.0, 1.0, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 330 core
out vec4 FragColor;
in vec4 vertexColour;

void main()
{
    FragColor = vertexColour;
}
"#;

#[rustfmt::skip]
const VERTICES: [f32; 24] = [
     0.5,  0.5,  0.0, // top right
     0.5, -0.5,  0.0, // bottom right
    -0.5, -0.5,  0.0, // bottom left
    -0.5,  0.5,  0.0, // top left
     0.0, -0.6,  0.0,
     0.5, -0.6,  0.0,
    -0.5, -0.6,  0.0,
     0.0, -0.75, 0.0,
];

#[rustfmt::skip]
const INDICES: [u32; 12] = [
    0, 1, 3, // quad
    1, 2, 3,
    5, 6, 7, // lower triangles
    4, 6, 7,
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

    let mesh = Mesh::new(gl, &VERTICES, Some(&INDICES[..]), &geometry::POSITION);

    app.run(move |frame| {
        draw::clear(frame.gl, draw::CLEAR_COLOR, ClearFlags::COLOR);
        program.bind(frame.gl);
        mesh.draw(frame.gl);
    });
}

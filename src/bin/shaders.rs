//! A triangle with per-vertex colors, shaders loaded from files, shifted horizontally through
//! a uniform.
use learngl::app::fatal;
use learngl::draw::{self, ClearFlags};
use learngl::geometry::{self, Mesh};
use learngl::shader::build_program_from_files;
use learngl::App;

const VERTICES: [f32; 18] = [
    // positions     // colors
    0.5, -0.5, 0.0, 1.0, 0.0, 0.0, // bottom right
    -0.5, -0.5, 0.0, 0.0, 1.0, 0.0, // bottom left
    0.0, 0.5, 0.0, 0.0, 0.0, 1.0, // top
];

const INDICES: [u32; 3] = [0, 1, 2];

fn main() {
    let app = App::new().unwrap_or_else(|err| fatal(err));
    let gl = app.gl();
    let settings = app.settings();

    let program = build_program_from_files(
        gl,
        settings.shader_path("shaders.vert"),
        settings.shader_path("shaders.frag"),
        settings.shader_policy,
    )
    .unwrap_or_else(|err| fatal(err));

    let triangle = Mesh::new(gl, &VERTICES, Some(&INDICES[..]), &geometry::POSITION_COLOR);

    app.run(move |frame| {
        draw::clear(frame.gl, draw::CLEAR_COLOR, ClearFlags::COLOR);

        program.bind(frame.gl);
        program.set_f32(frame.gl, "horiz_offs", 0.5);

        triangle.draw(frame.gl);
    });
}

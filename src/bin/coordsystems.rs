//! Ten textured cubes spinning in a perspective view.
use learngl::app::fatal;
use learngl::draw::{self, ClearFlags};
use learngl::geometry::{self, Mesh};
use learngl::input::BlendControl;
use learngl::shader::build_program_from_files;
use learngl::texture::{Texture, TextureParams};
use learngl::transform::{self, CUBE_POSITIONS};
use learngl::App;

#[rustfmt::skip]
const CUBE_VERTICES: [f32; 180] = [
    // positions       // texture coords
    -0.5, -0.5, -0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 0.0,

    -0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,

    -0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5,  0.5,  1.0, 0.0,

     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5,  0.5,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,

    -0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0, 1.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,

    -0.5,  0.5, -0.5,  0.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
];

const CAMERA_DISTANCE: f32 = 3.0;

fn main() {
    let app = App::new().unwrap_or_else(|err| fatal(err));
    let gl = app.gl();
    let settings = app.settings();

    let program = build_program_from_files(
        gl,
        settings.shader_path("coordsystems.vert"),
        settings.shader_path("coordsystems.frag"),
        settings.shader_policy,
    )
    .unwrap_or_else(|err| fatal(err));

    let cube = Mesh::new(gl, &CUBE_VERTICES, None, &geometry::POSITION_TEXCOORD);

    let params = TextureParams::default();
    let container = Texture::load_or_empty(gl, settings.texture_path("container.jpg"), &params);
    let face = Texture::load_or_empty(gl, settings.texture_path("awesomeface.png"), &params);

    let mut alpha = BlendControl::new(0.5);

    program.bind(gl);
    program.set_i32(gl, "texture1", 0);
    program.set_i32(gl, "texture2", 1);
    program.set_f32(gl, "alpha", alpha.value());
    program.set_mat4(
        gl,
        "projection",
        &transform::projection(app.viewport().aspect_ratio()),
    );

    draw::enable_depth_test(gl);

    let mut aspect_ratio = app.viewport().aspect_ratio();

    app.run(move |frame| {
        program.bind(frame.gl);
        if let Some(value) = alpha.poll(frame.keys) {
            program.set_f32(frame.gl, "alpha", value);
        }
        if frame.viewport.aspect_ratio() != aspect_ratio {
            aspect_ratio = frame.viewport.aspect_ratio();
            program.set_mat4(frame.gl, "projection", &transform::projection(aspect_ratio));
        }

        draw::clear(
            frame.gl,
            draw::CLEAR_COLOR,
            ClearFlags::COLOR | ClearFlags::DEPTH,
        );

        container.bind(frame.gl, 0);
        face.bind(frame.gl, 1);

        program.set_mat4(frame.gl, "view", &transform::view(CAMERA_DISTANCE));

        cube.bind(frame.gl);
        for i in 0..CUBE_POSITIONS.len() {
            let model = transform::cube_model(&transform::cube_position(i), i, frame.time);
            program.set_mat4(frame.gl, "model", &model);
            cube.draw(frame.gl);
        }
    });
}

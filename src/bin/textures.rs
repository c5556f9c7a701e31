//! A quad mixing two textures. Up/Down change how much of the second texture shows through.
use learngl::app::fatal;
use learngl::draw::{self, ClearFlags};
use learngl::geometry::{self, Mesh};
use learngl::input::BlendControl;
use learngl::shader::build_program_from_files;
use learngl::texture::{Texture, TextureParams};
use learngl::App;

const VERTICES: [f32; 32] = [
    // positions     // colors       // texture coords
    0.5, 0.5, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, // top right
    0.5, -0.5, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, // bottom right
    -0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, // bottom left
    -0.5, 0.5, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, // top left
];

const INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

fn main() {
    let app = App::new().unwrap_or_else(|err| fatal(err));
    let gl = app.gl();
    let settings = app.settings();

    let program = build_program_from_files(
        gl,
        settings.shader_path("textures.vert"),
        settings.shader_path("textures.frag"),
        settings.shader_policy,
    )
    .unwrap_or_else(|err| fatal(err));

    let quad = Mesh::new(
        gl,
        &VERTICES,
        Some(&INDICES[..]),
        &geometry::POSITION_COLOR_TEXCOORD,
    );

    let params = TextureParams::default();
    let container = Texture::load_or_empty(gl, settings.texture_path("container.jpg"), &params);
    let face = Texture::load_or_empty(gl, settings.texture_path("awesomeface.png"), &params);

    let mut alpha = BlendControl::new(0.5);

    program.bind(gl);
    program.set_i32(gl, "texture1", 0);
    program.set_i32(gl, "texture2", 1);
    program.set_f32(gl, "alpha", alpha.value());

    app.run(move |frame| {
        program.bind(frame.gl);
        if let Some(value) = alpha.poll(frame.keys) {
            program.set_f32(frame.gl, "alpha", value);
        }

        draw::clear(frame.gl, draw::CLEAR_COLOR, ClearFlags::COLOR);

        container.bind(frame.gl, 0);
        face.bind(frame.gl, 1);
        quad.draw(frame.gl);
    });
}

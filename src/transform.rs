//! Model/view/projection matrices for the cube scene.
use nalgebra_glm as glm;

pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

/// Degrees per second, multiplied by the cube index.
pub const ROTATION_SPEED: f32 = 20.0;

/// Positions of the ten cubes in world space.
pub const CUBE_POSITIONS: [[f32; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [-1.7, 3.0, -7.5],
    [1.3, -2.0, -2.5],
    [1.5, 2.0, -2.5],
    [1.5, 0.2, -1.5],
    [-1.3, 1.0, -1.5],
];

pub fn projection(aspect_ratio: f32) -> glm::Mat4 {
    glm::perspective(aspect_ratio, FOV_DEGREES.to_radians(), NEAR, FAR)
}

/// Camera placed `distance` units back along +z, looking down -z.
pub fn view(distance: f32) -> glm::Mat4 {
    glm::translate(&glm::identity(), &glm::vec3(0.0, 0.0, -distance))
}

/// Model matrix of cube `index` at `time` seconds: translated to its position, then rotated by
/// `ROTATION_SPEED * index * time` degrees around (1, 0.3, 0.5).
pub fn cube_model(position: &glm::Vec3, index: usize, time: f32) -> glm::Mat4 {
    let model = glm::translate(&glm::identity(), position);
    let angle = ROTATION_SPEED * index as f32 * time;
    glm::rotate(&model, angle.to_radians(), &glm::vec3(1.0, 0.3, 0.5))
}

pub fn cube_position(index: usize) -> glm::Vec3 {
    let [x, y, z] = CUBE_POSITIONS[index];
    glm::vec3(x, y, z)
}

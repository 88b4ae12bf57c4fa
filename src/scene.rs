use glam::{EulerRot, Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

pub const PARTICLE_COUNT: usize = 5_000;
pub const PARTICLE_SPREAD: f32 = 50.0;
pub const PARTICLE_SIZE: f32 = 0.05;

pub const TORUS_RADIUS: f32 = 5.0;
pub const TORUS_TUBE: f32 = 2.0;
pub const TORUS_RADIAL_SEGMENTS: u16 = 16;
pub const TORUS_TUBULAR_SEGMENTS: u16 = 100;

pub const TORUS_SPIN: Vec2 = Vec2::new(0.01, 0.005);
pub const PARTICLE_SPIN: Vec2 = Vec2::new(0.002, 0.002);

const CAMERA_FOV_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1_000.0;
const CAMERA_DISTANCE: f32 = 15.0;

fn aspect_ratio(width: f64, height: f64) -> f32 {
    if width > 0.0 && height > 0.0 {
        (width / height) as f32
    } else {
        1.0
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Camera {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            aspect: aspect_ratio(width, height),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct TorusGeometry {
    pub positions: Vec<f32>,
    pub indices: Vec<u16>,
}

impl TorusGeometry {
    pub fn new(radius: f32, tube: f32, radial_segments: u16, tubular_segments: u16) -> Self {
        let columns = tubular_segments + 1;
        let vertex_count = usize::from(radial_segments + 1) * usize::from(columns);
        let mut positions = Vec::with_capacity(vertex_count * 3);

        for j in 0..=radial_segments {
            let v = f32::from(j) / f32::from(radial_segments) * TAU;
            for i in 0..=tubular_segments {
                let u = f32::from(i) / f32::from(tubular_segments) * TAU;
                let ring = radius + tube * v.cos();
                positions.extend_from_slice(&[ring * u.cos(), ring * u.sin(), tube * v.sin()]);
            }
        }

        let mut indices =
            Vec::with_capacity(usize::from(radial_segments) * usize::from(tubular_segments) * 6);
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = columns * j + i - 1;
                let b = columns * (j - 1) + i - 1;
                let c = columns * (j - 1) + i;
                let d = columns * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { positions, indices }
    }
}

/// Flat xyz triples, each coordinate uniform in `[-spread / 2, spread / 2)`.
/// `random` must yield values in `[0, 1)`.
pub fn particle_positions(count: usize, spread: f32, mut random: impl FnMut() -> f64) -> Vec<f32> {
    (0..count * 3)
        .map(|_| ((random() - 0.5) as f32) * spread)
        .collect()
}

#[derive(Clone, PartialEq, Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub torus_rotation: Vec2,
    pub particle_rotation: Vec2,
    pub viewport: (f64, f64),
}

impl SceneState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            camera: Camera::new(width, height),
            torus_rotation: Vec2::ZERO,
            particle_rotation: Vec2::ZERO,
            viewport: (width, height),
        }
    }

    pub fn advance(&mut self) {
        self.torus_rotation += TORUS_SPIN;
        self.particle_rotation += PARTICLE_SPIN;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.aspect = aspect_ratio(width, height);
        self.viewport = (width, height);
    }

    pub fn torus_model(&self) -> Mat4 {
        rotation_matrix(self.torus_rotation)
    }

    pub fn particle_model(&self) -> Mat4 {
        rotation_matrix(self.particle_rotation)
    }

    pub fn point_scale(&self) -> f32 {
        (self.viewport.1 / 2.0) as f32
    }
}

fn rotation_matrix(rotation: Vec2) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, 0.0)
}

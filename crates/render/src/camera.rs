use glam::{Mat4, Vec3};

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
const ORTHO_HALF_EXTENT: f32 = 2.0;
const PITCH_LIMIT: f32 = 89.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_ZOOM: f32 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportProjection {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-flying camera. `yaw`, `pitch` and `zoom` (vertical field of view)
/// are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            zoom: 45.0,
            speed: 2.5,
            sensitivity: 0.1,
        }
    }
}

impl FlyCamera {
    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(WORLD_UP).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up())
    }

    pub fn projection_matrix(&self, projection: ViewportProjection, aspect: f32) -> Mat4 {
        match projection {
            ViewportProjection::Perspective => Mat4::perspective_rh(
                self.zoom.to_radians(),
                aspect.max(1e-4),
                NEAR_PLANE,
                FAR_PLANE,
            ),
            ViewportProjection::Orthographic => Mat4::orthographic_rh(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                NEAR_PLANE,
                FAR_PLANE,
            ),
        }
    }

    pub fn process_move(&mut self, direction: CameraMove, dt: f32) {
        let velocity = self.speed * dt;
        let offset = match direction {
            CameraMove::Forward => self.front(),
            CameraMove::Backward => -self.front(),
            CameraMove::Right => self.right(),
            CameraMove::Left => -self.right(),
            CameraMove::Up => self.up(),
            CameraMove::Down => -self.up(),
        };
        self.position += offset * velocity;
    }

    /// `dx`/`dy` in screen pixels, y pointing up.
    pub fn process_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = FlyCamera::default();
        assert!(approx(camera.front(), Vec3::NEG_Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
        let origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(approx(origin, Vec3::new(0.0, 0.0, -3.0)));
    }

    #[test]
    fn movement_follows_orientation() {
        let mut camera = FlyCamera::default();
        camera.process_move(CameraMove::Forward, 1.0);
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, 0.5)));
        camera.process_move(CameraMove::Right, 0.4);
        assert!(approx(camera.position, Vec3::new(1.0, 0.0, 0.5)));
        camera.process_move(CameraMove::Up, 0.4);
        assert!(approx(camera.position, Vec3::new(1.0, 1.0, 0.5)));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_look(0.0, 5000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.process_look(100.0, -10000.0);
        assert_eq!(camera.pitch, -89.0);
        assert!((camera.yaw - (-80.0)).abs() < 1e-4);
    }

    #[test]
    fn scroll_zoom_stays_in_range() {
        let mut camera = FlyCamera::default();
        camera.process_scroll(10.0);
        assert_eq!(camera.zoom, 35.0);
        camera.process_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom, 45.0);
    }

    #[test]
    fn orthographic_maps_fixed_box_to_clip_space() {
        let camera = FlyCamera::default();
        let proj = camera.projection_matrix(ViewportProjection::Orthographic, 2.0);
        let corner = proj.project_point3(Vec3::new(2.0, 2.0, -50.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&corner.z));
    }

    #[test]
    fn projection_modes_differ() {
        let camera = FlyCamera::default();
        let persp = camera.projection_matrix(ViewportProjection::Perspective, 1.0);
        let ortho = camera.projection_matrix(ViewportProjection::Orthographic, 1.0);
        assert_ne!(persp, ortho);
        let near = persp.project_point3(Vec3::new(0.0, 0.0, -NEAR_PLANE));
        assert!(near.z.abs() < 1e-5);
    }
}

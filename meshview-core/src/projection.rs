/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// A projected point: pixel coordinates plus normalized depth in `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Perspective camera looking at the origin
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera five units in front of the origin with a 45 degree field of view.
    ///
    /// `aspect` is width over height of the viewport in the same units the
    /// renderer rasterizes in.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect,
            near: 0.1,
            far: 50.0,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a model-space point through `model` onto a `width` x `height`
    /// viewport.
    ///
    /// Returns `None` for points on or behind the eye plane. Points outside
    /// the viewport are still returned; clipping to the viewport is left to
    /// the rasterizer.
    pub fn project(
        &self,
        point: &Point3<f32>,
        model: &Matrix4<f32>,
        width: usize,
        height: usize,
    ) -> Option<ScreenPoint> {
        project_with(&(self.view_projection() * model), point, width, height)
    }
}

/// Project `point` with a precomputed model-view-projection matrix
pub fn project_with(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: usize,
    height: usize,
) -> Option<ScreenPoint> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;

    Some(ScreenPoint {
        x: (ndc.x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc.y) * 0.5 * height as f32,
        depth: ndc.z,
    })
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(4.0 / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800.0 / 600.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert!(camera.view_matrix().norm() > 0.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(2.0);
        let p = camera
            .project(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!((p.x - 40.0).abs() < 1e-4);
        assert!((p.y - 20.0).abs() < 1e-4);
        assert!(p.depth > -1.0 && p.depth < 1.0);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::new(1.0);
        let p = camera
            .project(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 100, 100)
            .unwrap();
        assert!(p.y < 50.0);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(1.0);
        let near = camera
            .project(&Point3::new(0.0, 0.0, 1.0), &Matrix4::identity(), 10, 10)
            .unwrap();
        let far = camera
            .project(&Point3::new(0.0, 0.0, -1.0), &Matrix4::identity(), 10, 10)
            .unwrap();
        assert!(near.depth < far.depth);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(1.0);
        let behind = Point3::new(0.0, 0.0, 6.0);
        assert!(camera
            .project(&behind, &Matrix4::identity(), 10, 10)
            .is_none());
    }
}

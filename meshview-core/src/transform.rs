/// Model transform for the displayed mesh
use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};

/// Uniform scale followed by an accumulated rotation
#[derive(Debug, Clone, Copy)]
pub struct ModelTransform {
    pub scale: f32,
    pub rotation: UnitQuaternion<f32>,
}

impl ModelTransform {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Rotate by `angle` radians about `axis`, in model space
    pub fn rotate(&mut self, axis: &Vector3<f32>, angle: f32) {
        let Some(axis) = Unit::try_new(*axis, 1e-6) else {
            return;
        };
        self.rotation *= UnitQuaternion::from_axis_angle(&axis, angle);
        // Repeated composition drifts off unit length
        self.rotation.renormalize();
    }

    /// Idle spin: one degree about the `(1, 1, 1)` diagonal
    pub fn spin(&mut self) {
        self.rotate(&Vector3::new(1.0, 1.0, 1.0), 1f32.to_radians());
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.rotation.to_homogeneous() * Matrix4::new_scaling(self.scale)
    }

    /// Rotation for transforming normals; the uniform scale only changes their length
    pub fn normal_matrix(&self) -> UnitQuaternion<f32> {
        self.rotation
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

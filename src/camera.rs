//! Camera system: slow auto-orbit around the stage, or a fixed front view.

use glam::{Mat4, Vec3};

use crate::params::{CameraPreset, FixedCamera, OrbitCamera, RenderConfig};

/// Camera system driven by elapsed time
pub struct CameraSystem {
    preset: CameraPreset,
}

impl CameraSystem {
    /// Create new camera system with specified preset
    pub fn new(preset: CameraPreset) -> Self {
        Self { preset }
    }

    pub fn preset(&self) -> &CameraPreset {
        &self.preset
    }

    /// Compute camera position and look-at target for given time
    ///
    /// # Arguments
    /// * `time_s` - Seconds since the window opened
    ///
    /// # Returns
    /// Tuple of (eye_position, target_position)
    pub fn compute_position_and_target(&self, time_s: f32) -> (Vec3, Vec3) {
        match &self.preset {
            CameraPreset::Orbit(params) => Self::compute_orbit_path(params, time_s),
            CameraPreset::Fixed(params) => Self::compute_fixed_path(params),
        }
    }

    fn compute_fixed_path(p: &FixedCamera) -> (Vec3, Vec3) {
        (Vec3::from_array(p.position), Vec3::from_array(p.target))
    }

    /// Circle the origin about Y, starting on +Z
    fn compute_orbit_path(p: &OrbitCamera, time_s: f32) -> (Vec3, Vec3) {
        let angle = time_s * p.angular_speed_rad_per_s;
        let eye = Vec3::new(
            angle.sin() * p.distance,
            p.elevation,
            angle.cos() * p.distance,
        );
        (eye, Vec3::ZERO)
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(
        &self,
        time_s: f32,
        render_config: &RenderConfig,
    ) -> (Mat4, Vec3) {
        let (eye, target) = self.compute_position_and_target(time_s);

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_starts_in_front_of_stage() {
        let camera = CameraSystem::new(CameraPreset::default());
        let (eye, target) = camera.compute_position_and_target(0.0);
        assert!((eye - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
        assert_eq!(target, Vec3::ZERO);
    }

    #[test]
    fn test_orbit_keeps_distance_and_completes_revolution() {
        let params = OrbitCamera::default();
        let camera = CameraSystem::new(CameraPreset::Orbit(params.clone()));

        for t in 0..120 {
            let (eye, _) = camera.compute_position_and_target(t as f32);
            assert!((eye.length() - params.distance).abs() < 1e-4);
        }

        // Quarter turn after 30 s
        let (quarter, _) = camera.compute_position_and_target(30.0);
        assert!((quarter - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);

        let (full, _) = camera.compute_position_and_target(120.0);
        assert!((full - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-3);
    }

    #[test]
    fn test_fixed_camera_ignores_time() {
        let camera = CameraSystem::new(CameraPreset::Fixed(FixedCamera::default()));
        assert_eq!(
            camera.compute_position_and_target(0.0),
            camera.compute_position_and_target(99.0)
        );
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = CameraSystem::new(CameraPreset::default());
        let render_config = RenderConfig::default();

        let (view_proj, eye_pos) = camera.create_view_proj_matrix(0.0, &render_config);

        // Matrix should not be identity or zero
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(eye_pos.is_finite());

        // Stage centre projects to the middle of the screen
        let centre = view_proj.project_point3(Vec3::ZERO);
        assert!(centre.x.abs() < 1e-5 && centre.y.abs() < 1e-5);
    }
}

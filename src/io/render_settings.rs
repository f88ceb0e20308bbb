use crate::error::{CubeError, Result};
use crate::geometry::Real;
use crate::geometry::camera::Camera;
use nalgebra::{Point3, Vector3};

/// Every parameter that can be set from TOML or the command line.
///
/// Plain data; parsing lives in `TomlConfigLoader`, checking in
/// [`RenderSettings::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== Files =====
    /// Texture image applied to every face
    pub texture: String,
    /// Base name of the recorded video, without extension
    pub output: String,
    /// Directory receiving the video and the temporary frames
    pub output_dir: String,

    // ===== Render =====
    pub width: usize,
    pub height: usize,

    // ===== Camera =====
    /// Camera position, "x,y,z"
    pub camera_position: String,
    /// Vertical field of view in degrees
    pub camera_fov: Real,

    // ===== Cube =====
    /// Edge length
    pub cube_size: Real,

    // ===== Animation =====
    /// Global multiplier on the angular velocity
    pub speed: Real,
    /// Seconds of animation recorded in headless mode
    pub duration: Real,
    pub fps: usize,
    /// Radians per second about x, y and z, "x,y,z"
    pub angular_velocity: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            texture: "image.png".to_string(),
            output: "cube_animation".to_string(),
            output_dir: "output".to_string(),
            width: 600,
            height: 600,
            camera_position: "0,0,-5".to_string(),
            camera_fov: 60.0,
            cube_size: 2.0,
            speed: 1.0,
            duration: 10.0,
            fps: 30,
            angular_velocity: "0.3,0.5,0.1".to_string(),
        }
    }
}

/// Parses three comma-separated numbers.
pub fn parse_vec3(s: &str) -> Result<Vector3<Real>> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(CubeError::config(format!(
            "expected 3 comma-separated values, got '{}'",
            s
        )));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<Real>()
            .map_err(|e| CubeError::config(format!("invalid number '{}': {}", part, e)))?;
    }
    Ok(Vector3::from(values))
}

pub fn parse_point3(s: &str) -> Result<Point3<Real>> {
    parse_vec3(s).map(Point3::from)
}

impl RenderSettings {
    pub fn camera_position_point(&self) -> Result<Point3<Real>> {
        parse_point3(&self.camera_position)
    }

    pub fn angular_velocity_vec(&self) -> Result<Vector3<Real>> {
        parse_vec3(&self.angular_velocity)
    }

    pub fn camera(&self) -> Result<Camera> {
        Ok(Camera::new(self.camera_position_point()?, self.camera_fov))
    }

    /// Frames recorded in headless mode, `round(duration × fps)`.
    pub fn total_frames(&self) -> usize {
        (self.duration * self.fps as Real).round().max(0.0) as usize
    }

    pub fn video_path(&self) -> String {
        format!("{}/{}.mp4", self.output_dir, self.output)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CubeError::config("width and height must be greater than 0"));
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return Err(CubeError::config(format!(
                "fov must lie in (0, 180) degrees, got {}",
                self.camera_fov
            )));
        }
        if !(self.cube_size > 0.0 && self.cube_size.is_finite()) {
            return Err(CubeError::config(format!(
                "cube size must be positive, got {}",
                self.cube_size
            )));
        }
        if self.fps == 0 {
            return Err(CubeError::config("fps must be greater than 0"));
        }
        if !(self.duration >= 0.0 && self.duration.is_finite()) {
            return Err(CubeError::config(format!(
                "duration must be a non-negative number of seconds, got {}",
                self.duration
            )));
        }
        if !self.speed.is_finite() {
            return Err(CubeError::config("speed must be finite"));
        }
        if self.texture.trim().is_empty() {
            return Err(CubeError::config("texture path must not be empty"));
        }
        if self.output.trim().is_empty() {
            return Err(CubeError::config("output name must not be empty"));
        }
        if self.output_dir.trim().is_empty() {
            return Err(CubeError::config("output directory must not be empty"));
        }

        self.camera_position_point().map_err(|e| {
            CubeError::config(format!("camera position should be x,y,z: {}", e))
        })?;
        self.angular_velocity_vec().map_err(|e| {
            CubeError::config(format!("angular velocity should be x,y,z: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.total_frames(), 300);
        assert_eq!(settings.video_path(), "output/cube_animation.mp4");
        assert_eq!(
            settings.angular_velocity_vec().unwrap(),
            Vector3::new(0.3, 0.5, 0.1)
        );
    }

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3(" 1, -2.5 ,3").unwrap(), Vector3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
        assert_eq!(parse_point3("0,0,-5").unwrap(), Point3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases: [fn(&mut RenderSettings); 10] = [
            |s| s.width = 0,
            |s| s.camera_fov = 180.0,
            |s| s.camera_fov = 0.0,
            |s| s.cube_size = -1.0,
            |s| s.fps = 0,
            |s| s.duration = -0.5,
            |s| s.speed = Real::NAN,
            |s| s.output = "  ".to_string(),
            |s| s.camera_position = "0,0".to_string(),
            |s| s.angular_velocity = "a,b,c".to_string(),
        ];
        for mutate in cases {
            let mut settings = RenderSettings::default();
            mutate(&mut settings);
            assert!(matches!(settings.validate(), Err(CubeError::Config { .. })));
        }
    }

    #[test]
    fn test_total_frames_rounds() {
        let settings = RenderSettings {
            duration: 1.26,
            fps: 10,
            ..Default::default()
        };
        assert_eq!(settings.total_frames(), 13);
    }
}

use crate::error::{CubeError, Result};
use crate::geometry::Real;
use crate::io::render_settings::RenderSettings;
use log::warn;
use std::path::Path;
use toml::Value;

/// Reads and writes [`RenderSettings`] as TOML.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CubeError::config(format!("failed to read '{}': {}", path.display(), e))
        })?;

        Self::load_from_content(&content)
    }

    /// Missing sections and keys keep their defaults.
    pub fn load_from_content(content: &str) -> Result<RenderSettings> {
        let toml_value: Value = toml::from_str(content)
            .map_err(|e| CubeError::config(format!("failed to parse TOML: {}", e)))?;

        Self::parse_toml_to_settings(toml_value)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<()> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Writes the defaults as a template.
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::save_to_file(&RenderSettings::default(), path)
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings> {
        let mut settings = RenderSettings::default();

        // [files]
        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }

        // [render]
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        // [camera]
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }

        // [cube]
        if let Some(cube) = toml.get("cube").and_then(|v| v.as_table()) {
            Self::parse_cube_section(&mut settings, cube)?;
        }

        // [animation]
        if let Some(animation) = toml.get("animation").and_then(|v| v.as_table()) {
            Self::parse_animation_section(&mut settings, animation)?;
        }

        if let Some(table) = toml.as_table() {
            for key in table.keys() {
                if !["files", "render", "camera", "cube", "animation"].contains(&key.as_str()) {
                    warn!("Ignoring unknown config section [{}]", key);
                }
            }
        }

        Ok(settings)
    }

    // ===== Sections =====

    fn parse_files_section(settings: &mut RenderSettings, files: &toml::Table) -> Result<()> {
        if let Some(texture) = files.get("texture").and_then(|v| v.as_str()) {
            settings.texture = texture.to_string();
        }
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        Ok(())
    }

    fn parse_render_section(settings: &mut RenderSettings, render: &toml::Table) -> Result<()> {
        if let Some(width) = render.get("width") {
            settings.width = Self::non_negative_integer("render.width", width)?;
        }
        if let Some(height) = render.get("height") {
            settings.height = Self::non_negative_integer("render.height", height)?;
        }
        Ok(())
    }

    fn parse_camera_section(settings: &mut RenderSettings, camera: &toml::Table) -> Result<()> {
        if let Some(position) = camera.get("position").and_then(|v| v.as_str()) {
            settings.camera_position = position.to_string();
        }
        if let Some(fov) = camera.get("fov") {
            settings.camera_fov = Self::number("camera.fov", fov)?;
        }
        Ok(())
    }

    fn parse_cube_section(settings: &mut RenderSettings, cube: &toml::Table) -> Result<()> {
        if let Some(size) = cube.get("size") {
            settings.cube_size = Self::number("cube.size", size)?;
        }
        Ok(())
    }

    fn parse_animation_section(
        settings: &mut RenderSettings,
        animation: &toml::Table,
    ) -> Result<()> {
        if let Some(speed) = animation.get("speed") {
            settings.speed = Self::number("animation.speed", speed)?;
        }
        if let Some(duration) = animation.get("duration") {
            settings.duration = Self::number("animation.duration", duration)?;
        }
        if let Some(fps) = animation.get("fps") {
            settings.fps = Self::non_negative_integer("animation.fps", fps)?;
        }
        if let Some(velocity) = animation.get("angular_velocity").and_then(|v| v.as_str()) {
            settings.angular_velocity = velocity.to_string();
        }
        Ok(())
    }

    /// Accepts both `60` and `60.0`.
    fn number(key: &str, value: &Value) -> Result<Real> {
        value
            .as_float()
            .or_else(|| value.as_integer().map(|i| i as Real))
            .ok_or_else(|| CubeError::config(format!("{} must be a number", key)))
    }

    fn non_negative_integer(key: &str, value: &Value) -> Result<usize> {
        value
            .as_integer()
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| CubeError::config(format!("{} must be a non-negative integer", key)))
    }

    // ===== RenderSettings -> TOML =====

    fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        content.push_str("# Rotating cube renderer configuration\n\n");

        // [files]
        content.push_str("[files]\n");
        content.push_str(&format!("texture = {}\n", Value::from(settings.texture.as_str())));
        content.push_str(&format!("output = {}\n", Value::from(settings.output.as_str())));
        content.push_str(&format!(
            "output_dir = {}\n",
            Value::from(settings.output_dir.as_str())
        ));
        content.push('\n');

        // [render]
        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push('\n');

        // [camera]
        content.push_str("[camera]\n");
        content.push_str(&format!(
            "position = {}\n",
            Value::from(settings.camera_position.as_str())
        ));
        content.push_str(&format!("fov = {}\n", Value::from(settings.camera_fov)));
        content.push('\n');

        // [cube]
        content.push_str("[cube]\n");
        content.push_str(&format!("size = {}\n", Value::from(settings.cube_size)));
        content.push('\n');

        // [animation]
        content.push_str("[animation]\n");
        content.push_str(&format!("speed = {}\n", Value::from(settings.speed)));
        content.push_str(&format!("duration = {}\n", Value::from(settings.duration)));
        content.push_str(&format!("fps = {}\n", settings.fps));
        content.push_str(&format!(
            "angular_velocity = {}\n",
            Value::from(settings.angular_velocity.as_str())
        ));

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_gives_defaults() {
        let settings = TomlConfigLoader::load_from_content("").unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let content = r#"
            [files]
            texture = "crate.png"

            [render]
            width = 320
            height = 240

            [camera]
            position = "0,1,-8"
            fov = 45

            [cube]
            size = 1.5

            [animation]
            speed = 2.0
            fps = 24
            angular_velocity = "0,1,0"
        "#;
        let settings = TomlConfigLoader::load_from_content(content).unwrap();
        assert_eq!(settings.texture, "crate.png");
        assert_eq!((settings.width, settings.height), (320, 240));
        assert_eq!(settings.camera_position, "0,1,-8");
        assert_eq!(settings.camera_fov, 45.0);
        assert_eq!(settings.cube_size, 1.5);
        assert_eq!(settings.speed, 2.0);
        assert_eq!(settings.fps, 24);
        assert_eq!(settings.angular_velocity, "0,1,0");
        assert_eq!(settings.duration, 10.0);
        assert_eq!(settings.output, "cube_animation");
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(TomlConfigLoader::load_from_content("[render]\nwidth = -3\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[camera]\nfov = \"wide\"\n").is_err());
        assert!(TomlConfigLoader::load_from_content("[files\n").is_err());
    }

    #[test]
    fn test_serialized_defaults_parse_back() {
        let settings = RenderSettings {
            camera_fov: 75.5,
            cube_size: 3.0,
            output: "spin \"demo\"".to_string(),
            ..Default::default()
        };
        let content = TomlConfigLoader::settings_to_toml(&settings);
        assert_eq!(TomlConfigLoader::load_from_content(&content).unwrap(), settings);
    }
}

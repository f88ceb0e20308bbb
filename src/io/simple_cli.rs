use crate::error::Result;
use crate::geometry::Real;
use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

/// Command line: a config file plus a few overrides.
#[derive(Parser, Debug)]
#[command(name = "cube_renderer")]
#[command(about = "Software-rendered textured rotating cube")]
pub struct SimpleCli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Record a video instead of opening the preview window
    #[arg(long)]
    pub headless: bool,

    /// Write example_config.toml and load it
    #[arg(long)]
    pub use_example_config: bool,

    /// Texture image, overrides [files] texture
    #[arg(long, value_name = "PATH")]
    pub texture: Option<String>,

    /// Animation speed multiplier, overrides [animation] speed
    #[arg(long)]
    pub speed: Option<Real>,

    /// Recorded seconds, overrides [animation] duration
    #[arg(long)]
    pub duration: Option<Real>,
}

impl SimpleCli {
    /// Parses the process arguments and returns the validated settings and
    /// whether the preview window should start.
    pub fn process() -> Result<(RenderSettings, bool)> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<(RenderSettings, bool)> {
        let mut settings = if self.use_example_config {
            let example_path = "example_config.toml";
            TomlConfigLoader::create_example_config(example_path)?;
            info!("Wrote example config to {}", example_path);
            TomlConfigLoader::load_from_file(example_path)?
        } else if let Some(config_path) = &self.config {
            info!("Loading config {}", config_path);
            TomlConfigLoader::load_from_file(config_path)?
        } else {
            info!("No config given, using defaults");
            RenderSettings::default()
        };

        if let Some(texture) = self.texture {
            settings.texture = texture;
        }
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if let Some(duration) = self.duration {
            settings.duration = duration;
        }

        settings.validate()?;
        Ok((settings, !self.headless))
    }
}

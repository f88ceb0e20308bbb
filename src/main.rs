use cube_renderer::io::simple_cli::SimpleCli;
use cube_renderer::material_system::texture::Texture;
use cube_renderer::ui::app::start_gui;
use cube_renderer::utils::save_utils::record_video;
use cube_renderer::CubeError;
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;

fn run() -> Result<(), CubeError> {
    let (settings, start_window) = SimpleCli::process()?;
    let texture = Arc::new(Texture::from_file(&settings.texture)?);

    if start_window {
        start_gui(settings, texture)
    } else {
        let video_path = record_video(&settings, texture)?;
        info!("Done: {}", video_path.display());
        Ok(())
    }
}

fn main() -> Result<(), CubeError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    run().inspect_err(|e| error!("{}", e))
}

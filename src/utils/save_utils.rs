use crate::core::frame_buffer::FrameBuffer;
use crate::error::{CubeError, Result};
use crate::io::render_settings::RenderSettings;
use crate::material_system::texture::Texture;
use crate::utils::animation_utils::{CubeAnimation, frame_time};
use image::ColorType;
use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;

/// Writes an RGB frame as PNG.
pub fn save_image<P: AsRef<Path>>(path: P, frame: &FrameBuffer) -> Result<()> {
    image::save_buffer(
        path.as_ref(),
        frame.get_color_buffer_bytes(),
        frame.width as u32,
        frame.height as u32,
        ColorType::Rgb8,
    )?;
    Ok(())
}

pub fn check_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

pub fn frame_file_name(frame_index: usize) -> String {
    format!("frame_{:04}.png", frame_index)
}

/// Renders `total_frames` frames at `frame_index / fps` seconds each and
/// saves them as `frame_%04d.png` in `frames_dir`.
///
/// Frames are independent of each other, so they are rendered in parallel,
/// each worker on its own copy of the animation.
pub fn render_frames(
    animation: &CubeAnimation,
    frames_dir: &Path,
    total_frames: usize,
    fps: usize,
) -> Result<()> {
    let progress = ProgressBar::new(total_frames as u64);

    (0..total_frames).into_par_iter().try_for_each_init(
        || animation.clone(),
        |anim: &mut CubeAnimation, frame_index: usize| -> Result<()> {
            let frame = anim.render_at(frame_time(frame_index, fps));
            save_image(frames_dir.join(frame_file_name(frame_index)), &frame)?;
            progress.inc(1);
            Ok(())
        },
    )?;

    progress.finish_and_clear();
    Ok(())
}

/// Runs ffmpeg over the `frame_%04d.png` sequence in `frames_dir`.
pub fn encode_video(frames_dir: &Path, fps: usize, output_path: &Path) -> Result<()> {
    let frames_pattern = frames_dir.join("frame_%04d.png");
    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-framerate")
        .arg(fps.to_string())
        .arg("-i")
        .arg(&frames_pattern)
        .args(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-crf", "23"])
        .arg(output_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| CubeError::video(format!("failed to run ffmpeg: {}", e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(CubeError::video(format!("ffmpeg exited with {}", status)))
    }
}

/// Headless mode: renders `round(duration × fps)` frames into a temporary
/// directory under `output_dir`, encodes them to `{output_dir}/{output}.mp4`
/// and removes the temporary frames.
pub fn record_video(settings: &RenderSettings, texture: Arc<Texture>) -> Result<PathBuf> {
    let total_frames = settings.total_frames();
    if total_frames == 0 {
        return Err(CubeError::video(format!(
            "nothing to record: {} s at {} fps is zero frames",
            settings.duration, settings.fps
        )));
    }
    if !check_ffmpeg_available() {
        return Err(CubeError::video("ffmpeg not found, install it to record videos"));
    }

    std::fs::create_dir_all(&settings.output_dir)?;
    let frames_dir = PathBuf::from(format!(
        "{}/temp_frames_{}",
        settings.output_dir,
        chrono::Utc::now().timestamp_millis()
    ));
    std::fs::create_dir_all(&frames_dir)?;

    let animation = CubeAnimation::new(settings, texture)?;
    let video_path = PathBuf::from(settings.video_path());
    info!(
        "Recording {} frames ({} s at {} fps) to {}",
        total_frames,
        settings.duration,
        settings.fps,
        video_path.display()
    );

    let start = Instant::now();
    let result = render_frames(&animation, &frames_dir, total_frames, settings.fps)
        .and_then(|_| encode_video(&frames_dir, settings.fps, &video_path));

    if let Err(e) = std::fs::remove_dir_all(&frames_dir) {
        warn!("Could not remove {}: {}", frames_dir.display(), e);
    }
    result?;

    info!(
        "Video written to {} in {:.2?}",
        video_path.display(),
        start.elapsed()
    );
    Ok(video_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 32,
            height: 24,
            fps: 10,
            duration: 0.3,
            ..Default::default()
        }
    }

    fn texture() -> Arc<Texture> {
        Arc::new(Texture::from_rgb8(1, 1, vec![40, 80, 120]).unwrap())
    }

    #[test]
    fn test_save_image_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut frame = FrameBuffer::new(4, 2);
        frame.set_pixel(3, 1, [1, 2, 3]);

        save_image(&path, &frame).unwrap();
        let loaded = image::open(&path).unwrap().into_rgb8();
        assert_eq!(loaded.dimensions(), (4, 2));
        assert_eq!(loaded.get_pixel(3, 1).0, [1, 2, 3]);
    }

    #[test]
    fn test_render_frames_writes_numbered_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let settings = small_settings();
        let animation = CubeAnimation::new(&settings, texture()).unwrap();

        render_frames(&animation, dir.path(), settings.total_frames(), settings.fps).unwrap();
        for i in 0..3 {
            assert!(dir.path().join(frame_file_name(i)).exists());
        }
        assert!(!dir.path().join(frame_file_name(3)).exists());
    }

    #[test]
    fn test_zero_frames_is_an_error() {
        let settings = RenderSettings {
            duration: 0.0,
            ..small_settings()
        };
        assert!(matches!(
            record_video(&settings, texture()),
            Err(CubeError::Video { .. })
        ));
    }
}

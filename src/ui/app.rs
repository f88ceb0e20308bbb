use crate::error::{CubeError, Result};
use crate::geometry::Real;
use crate::io::render_settings::RenderSettings;
use crate::material_system::texture::Texture;
use crate::utils::animation_utils::CubeAnimation;
use egui::{Color32, ColorImage, RichText, TextureOptions, Vec2};
use log::info;
use std::sync::Arc;
use std::time::{Duration, Instant};

const FPS_HISTORY_SIZE: usize = 30;

/// Moving average over the last few frame times.
#[derive(Debug, Default)]
pub struct FpsCounter {
    history: Vec<f32>,
}

impl FpsCounter {
    pub fn record(&mut self, frame_time: Duration) {
        let secs = frame_time.as_secs_f32();
        if secs <= 0.0 {
            return;
        }
        self.history.push(1.0 / secs);
        if self.history.len() > FPS_HISTORY_SIZE {
            self.history.remove(0);
        }
    }

    pub fn average(&self) -> f32 {
        if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f32>() / self.history.len() as f32
        }
    }

    /// Label text and a traffic-light colour.
    pub fn display(&self) -> (String, Color32) {
        let fps = self.average();
        let color = if fps >= 30.0 {
            Color32::from_rgb(50, 220, 50)
        } else if fps >= 15.0 {
            Color32::from_rgb(220, 180, 50)
        } else {
            Color32::from_rgb(220, 50, 50)
        };
        (format!("FPS: {:.1}", fps), color)
    }
}

/// Live preview: every repaint rotates the cube by the wall-clock time since
/// start, renders it and shows the frame.
pub struct CubePreviewApp {
    animation: CubeAnimation,
    start_time: Instant,
    last_frame_time: Option<Instant>,
    fps: FpsCounter,
    rendered_image: Option<egui::TextureHandle>,
    last_render_time: Duration,
}

impl CubePreviewApp {
    pub fn new(animation: CubeAnimation) -> Self {
        Self {
            animation,
            start_time: Instant::now(),
            last_frame_time: None,
            fps: FpsCounter::default(),
            rendered_image: None,
            last_render_time: Duration::ZERO,
        }
    }

    fn render_frame(&mut self, ctx: &egui::Context) {
        let render_start = Instant::now();
        let elapsed = self.start_time.elapsed().as_secs_f64() as Real;
        let frame = self.animation.render_at(elapsed);
        self.last_render_time = render_start.elapsed();

        let image = ColorImage::from_rgba_unmultiplied(
            [frame.width, frame.height],
            &frame.to_rgba_bytes(),
        );
        if let Some(texture) = self.rendered_image.as_mut() {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.rendered_image =
                Some(ctx.load_texture("cube_frame", image, TextureOptions::LINEAR));
        }

        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            self.fps.record(now - last);
        }
        self.last_frame_time = Some(now);
    }
}

impl eframe::App for CubePreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.render_frame(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let angles = self.animation.cube().rotation();
                ui.label(format!(
                    "rotation ({:.2}, {:.2}, {:.2}) rad",
                    angles.x, angles.y, angles.z
                ));
                ui.separator();
                ui.label(format!("render {:.1?}", self.last_render_time));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (fps_text, fps_color) = self.fps.display();
                    ui.label(RichText::new(fps_text).color(fps_color));
                    ui.separator();
                    ui.label("Q / Esc: quit");
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(texture) = &self.rendered_image {
                    let renderer = self.animation.renderer();
                    let available = ui.available_size();
                    let scale = (available.x / renderer.width as f32)
                        .min(available.y / renderer.height as f32)
                        .max(0.0);
                    let size = Vec2::new(
                        renderer.width as f32 * scale,
                        renderer.height as f32 * scale,
                    );
                    ui.centered_and_justified(|ui| {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                    });
                }
            });

        ctx.request_repaint();
    }
}

/// Opens the preview window and blocks until it is closed.
pub fn start_gui(settings: RenderSettings, texture: Arc<Texture>) -> Result<()> {
    let animation = CubeAnimation::new(&settings, texture)?;
    info!(
        "Opening preview window {}x{}",
        settings.width, settings.height
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Rotating cube")
            .with_inner_size([settings.width as f32, settings.height as f32 + 40.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rotating cube",
        options,
        Box::new(|_cc| Ok(Box::new(CubePreviewApp::new(animation)))),
    )
    .map_err(|e| CubeError::Gui {
        message: e.to_string(),
    })
}

mod app;
mod artifacts;
mod backend;

use eframe::egui;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = client_core::load_settings();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PixelPerfect Type")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "PixelPerfect Type",
        options,
        Box::new(move |_cc| {
            let app = app::PixelTypeApp::new(settings).map_err(|err| {
                tracing::error!("desktop client startup failed: {err:#}");
                Box::<dyn std::error::Error + Send + Sync>::from(err)
            })?;
            Ok(Box::new(app))
        }),
    )
}

#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use stockroom_business::BusinessConfig;
use stockroom_ui::{StockroomApp, state::State};

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    // Values from `.env` never override the real environment.
    let _ = dotenvy::dotenv();

    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = BusinessConfig::from_env().context("failed to load configuration")?;

    // Commands and form flows are spawned from the UI thread onto this runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 480.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Stockroom",
        native_options,
        Box::new(move |_cc| Ok(Box::new(StockroomApp::new(State::new(config))))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run UI: {e}"))
}

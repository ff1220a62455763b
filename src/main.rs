#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::{NativeOptions, egui};
use tokio::runtime::Runtime;

use golden_cross::config::{PERSISTENCE, PLOT_CONFIG, STRATEGY};
use golden_cross::data::write_daily_series_async;
use golden_cross::ui::ui_text::UI_TEXT;
use golden_cross::{Cli, SignalDeriver, fetch_price_data, log_signal_summary, run_app};

// Room for the side and status panels around the chart
const SIDE_PANEL_ALLOWANCE: f32 = 260.0;
const STATUS_PANEL_ALLOWANCE: f32 = 60.0;

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args (bad windows or dates fail before any network traffic)
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);
    let params = args.strategy_params()?;
    let request = args.ticker_request()?;

    // C. Data Loading (Blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let fetched = rt.block_on(fetch_price_data(&request, &args))?;
    let (daily_series, source) = (fetched.series, fetched.source);
    log::info!(
        "Loaded {} rows for {} from {}",
        daily_series.len(),
        request,
        source
    );

    // D. Background Cache Write (only for fresh remote data)
    let cache_write = fetched.is_remote.then(|| {
        let cache_request = request.clone();
        let cache_data = daily_series.clone();
        rt.spawn(async move {
            if let Err(e) = write_daily_series_async(source, cache_request, cache_data).await {
                log::error!("⚠️  Failed to write cache: {:#}", e);
            }
        })
    });

    // E. Signals
    let series = SignalDeriver::new(params).derive(&daily_series.close_points());
    let tail_rows = match (args.print_tail, args.headless) {
        (Some(n), _) => n,
        (None, true) => STRATEGY.default_tail_rows,
        (None, false) => 0,
    };
    log_signal_summary(&series, tail_rows);

    if args.headless {
        if let Some(handle) = cache_write {
            rt.block_on(handle).context("Cache write task panicked")?;
        }
        return Ok(());
    }

    // F. Run Native App
    let title = format!("{} - {} ({})", UI_TEXT.window_title_prefix, request.symbol(), params);
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.as_str())
            .with_inner_size([
                PLOT_CONFIG.plot_width + SIDE_PANEL_ALLOWANCE,
                PLOT_CONFIG.plot_height + STATUS_PANEL_ALLOWANCE,
            ]),
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(run_app(cc, request, series, source))),
    )
    .map_err(|e| anyhow!("Chart window failed: {}", e))
}

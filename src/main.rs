use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::Result;
use site::{Build, BuildOptions};
use tracing::{info, level_filters::LevelFilter, subscriber};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer};

#[derive(Parser)]
struct Args {
    /// The site root to build from.
    #[clap(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file, relative to the root.
    #[clap(long, default_value = "Config.toml")]
    config: PathBuf,

    /// Theme overlay file, relative to the root.
    #[clap(long, default_value = "theme.toml")]
    theme: PathBuf,

    /// Where log files go.
    #[clap(long, default_value = "log/")]
    log_path: PathBuf,
}

fn main() -> Result<()> {
    // Install panic and error report handlers.
    color_eyre::install()?;

    let args = Args::parse();

    let file_appender = tracing_appender::rolling::hourly(&args.log_path, "rill.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let subscriber =
        tracing_subscriber::registry().with(fmt::layer().compact().with_filter(LevelFilter::INFO));

    let file_log = if cfg!(debug_assertions) {
        Some(
            fmt::Layer::default()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(LevelFilter::TRACE),
        )
    } else {
        None
    };

    let subscriber = subscriber.with(file_log);
    subscriber::set_global_default(subscriber)?;

    info!("Set up subscribers");

    let mut options = BuildOptions::new(args.root);
    options.config_file = args.config;
    options.theme_file = args.theme;

    let now = Instant::now();
    let mut build = Build::new();
    let model = build.run(&options)?;
    let elapsed = now.elapsed();

    info!(
        "Built site model for `{}` in {:.2?}: {} documents, {} warnings",
        model.config.site_metadata.name,
        elapsed,
        model.documents.len(),
        model.warnings.len()
    );

    for warning in &model.warnings {
        info!("warning: {warning}");
    }

    // The model is handed to a renderer in memory; nothing is written here.
    Ok(())
}

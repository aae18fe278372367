use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use pixcat::{Config, PixcatError, ResizeFilter, Size, TermImage};

/// Exit status after Ctrl-C, as a shell would report it
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Draw an image in the terminal with 24-bit colored blocks
#[derive(Debug, Parser)]
#[command(name = "pixcat", version, about)]
struct Cli {
    /// Image file path or http(s) URL
    source: String,

    /// Render size as WxH; a non-positive side follows the aspect ratio
    #[arg(short, long, conflicts_with = "native")]
    size: Option<Size>,

    /// Render at the image's own resolution
    #[arg(long)]
    native: bool,

    /// Milliseconds between animation frames
    #[arg(short, long)]
    interval: Option<u64>,

    /// Resampling filter used when resizing
    #[arg(short, long, value_enum)]
    filter: Option<ResizeFilter>,

    /// Stop animations after this many cycles
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    loops: Option<u32>,

    /// Config file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Log debug details to stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if self.native {
            config.size = None;
        } else if let Some(size) = self.size {
            config.size = Some(size);
        }
        if let Some(ms) = self.interval {
            config.interval = Duration::from_millis(ms);
        }
        if let Some(filter) = self.filter {
            config.filter = filter;
        }
        if self.loops.is_some() {
            config.loops = self.loops;
        }
    }
}

async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // stdout carries the image, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    tracing::debug!("pixcat version {}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config);
    tracing::debug!(?config, "resolved config");

    let mut image = TermImage::from_config(&cli.source, &config)
        .await
        .with_context(|| format!("cannot open {}", cli.source))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match image.draw(&mut out, interrupt_signal()).await {
        Ok(()) => Ok(()),
        Err(PixcatError::Interrupted) => {
            tracing::info!("interrupted");
            drop(out);
            process::exit(INTERRUPTED_EXIT_CODE);
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("failed to draw {}", cli.source))),
    }
}

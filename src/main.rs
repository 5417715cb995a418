use std::path::PathBuf;

use anyhow::{Context, Result};
use backdrop::{Backdrop, BackdropConfig, BackendKind, ThemeSource};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Particles,
    Shapes,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Particles => BackendKind::Particles,
            BackendArg::Shapes => BackendKind::Shapes,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    System,
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeSource {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::System => ThemeSource::System,
            ThemeArg::Light => ThemeSource::Light,
            ThemeArg::Dark => ThemeSource::Dark,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Pointer-reactive ambient backdrop", version)]
struct Args {
    /// TOML configuration file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,
    /// Fixed spawn seed for reproducible layouts.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Render without a window and write the last frame to `--out`.
    #[arg(long)]
    headless: bool,
    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 120)]
    frames: u32,
    #[arg(long, default_value = "backdrop.png")]
    out: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BackdropConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BackdropConfig::default(),
    };

    let mut backdrop = Backdrop::from_config(config);
    if let Some(backend) = args.backend {
        backdrop = backdrop.with_backend(backend.into());
    }
    if let Some(theme) = args.theme {
        backdrop = backdrop.with_theme(theme.into());
    }
    if let Some(seed) = args.seed {
        backdrop = backdrop.with_seed(seed);
    }
    let window = &backdrop.config().window;
    let (width, height) = (args.width.unwrap_or(window.width), args.height.unwrap_or(window.height));
    backdrop = backdrop.with_window_size(width, height);

    if args.headless {
        let frame = backdrop
            .render_headless(args.frames)
            .context("headless render failed")?
            .context("no frame was drawn")?;
        frame
            .image()
            .save(&args.out)
            .with_context(|| format!("writing {}", args.out.display()))?;
        info!(path = %args.out.display(), frames = args.frames, "frame written");
        return Ok(());
    }

    backdrop.run().context("backdrop window failed")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

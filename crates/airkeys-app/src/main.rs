//! AirKeys entry point.
//!
//! Loads the configuration, opens a hand-tracking recording, and runs the
//! interaction loop over it.  Typed characters go to stdout; logs go to
//! stderr.  Operator commands are read from stdin, one per line.
//!
//! # Usage
//!
//! ```text
//! airkeys --replay session.jsonl [OPTIONS]
//!
//! Options:
//!   --replay <PATH>   Recording to replay (JSON lines)
//!   --config <PATH>   Config file [default: platform config dir]
//!   --output <PATH>   Where `save` writes the buffer
//!   --layout <ID>     Initial layout id
//!   --no-pace         Replay as fast as possible
//!   --init-config     Write a default config file and exit
//! ```
//!
//! # Commands (stdin)
//!
//! `q`/`quit`, `s`/`save`, `l`/`cycle-layout`, `c`/`clear`.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AppConfig                 -- TOML, defaults when absent
//!  └─ AppConfig::build_registry()    -- built-in + custom layouts
//!  └─ ReplayFrameSource::open()      -- frames from the recording
//!  └─ spawn_stdin_reader()           -- ControlCommand channel, own thread
//!  └─ InteractionLoop::run()         -- until quit, Ctrl-C, or end of recording
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use airkeys_app::application::interaction_loop::{InteractionLoop, LoopExit};
use airkeys_app::infrastructure::{
    control_input::spawn_stdin_reader,
    frame_source::replay::{RecordedHandDetector, ReplayFrameSource},
    input_injection::stdout::StdoutInputSink,
    storage::{
        config::{config_file_path, load_config_from, save_config_to, AppConfig},
        text_export::FileTextExporter,
    },
};
use airkeys_core::LayoutId;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Virtual keyboard driven by hand gestures.
#[derive(Debug, Parser)]
#[command(name = "airkeys", about = "Type by pinching in the air", version)]
struct Cli {
    /// Hand-tracking recording to replay, one JSON frame per line.
    #[arg(long, env = "AIRKEYS_REPLAY", required_unless_present = "init_config")]
    replay: Option<PathBuf>,

    /// Configuration file.  Defaults to the platform config directory.
    #[arg(long, env = "AIRKEYS_CONFIG")]
    config: Option<PathBuf>,

    /// Output file for `save`, overriding `app.output_path`.
    #[arg(long, env = "AIRKEYS_OUTPUT")]
    output: Option<PathBuf>,

    /// Initial layout id, overriding `layout.default_layout`.
    #[arg(long, env = "AIRKEYS_LAYOUT")]
    layout: Option<String>,

    /// Serve frames as fast as possible instead of at recorded speed.
    #[arg(long)]
    no_pace: bool,

    /// Write a configuration file with all defaults and exit.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path().context("resolving config file location"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path()?;

    if cli.init_config {
        save_config_to(&config_path, &AppConfig::default())
            .with_context(|| format!("writing {}", config_path.display()))?;
        eprintln!("wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let config = load_config_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // Logs go to stderr so stdout carries only typed text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("AirKeys starting");

    let registry = config.build_registry().context("building layout registry")?;
    let initial_layout = cli
        .layout
        .as_deref()
        .map(LayoutId::new)
        .unwrap_or_else(|| config.default_layout_id());
    let output_path = cli.output.clone().unwrap_or_else(|| config.app.output_path.clone());

    let mut interaction = InteractionLoop::new(
        registry,
        &initial_layout,
        config.loop_config(),
        Box::new(RecordedHandDetector::new(config.capture.mirror)),
        Arc::new(StdoutInputSink::new()),
        Arc::new(FileTextExporter::new(&output_path)),
    )
    .with_context(|| format!("selecting initial layout {initial_layout}"))?;

    let replay = cli
        .replay
        .context("--replay is required unless --init-config is given")?;
    let mut source = ReplayFrameSource::open(
        &replay,
        config.capture.frame_width,
        config.capture.frame_height,
        !cli.no_pace,
    )
    .await?;

    // ── Control commands and Ctrl-C ───────────────────────────────────────────
    let (command_tx, mut command_rx) = mpsc::channel(16);
    // Detached: a pending terminal read must not delay exit.
    spawn_stdin_reader(command_tx).context("starting control input reader")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown_flag.store(true, Ordering::Relaxed);
        }
    });

    // ── Main loop ─────────────────────────────────────────────────────────────
    let exit = interaction
        .run(&mut source, &mut command_rx, &shutdown)
        .await;

    let snapshot = interaction.snapshot();
    info!(
        frames = interaction.frames_processed(),
        status = %snapshot.status,
        "AirKeys stopped"
    );

    match exit {
        LoopExit::SourceFailed(e) => Err(e).context("frame source failed"),
        LoopExit::Quit | LoopExit::Cancelled | LoopExit::Exhausted => Ok(()),
    }
}

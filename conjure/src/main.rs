//! conjure: interactive entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::error;

use alchemy_circle::RenderStyle;
use conjure::{run, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "conjure", about = "Gesture-summoned conjuring circles")]
struct Cli {
    /// Frame width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Circle recipe: strange or classic
    #[arg(long, default_value = "strange")]
    style: RenderStyle,

    /// Seed for circle styles and rune placement (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Flip incoming hands horizontally
    #[arg(long)]
    mirror: bool,

    /// Hide the hand skeleton overlay
    #[arg(long)]
    no_landmarks: bool,

    /// Play a recorded session (JSON lines) instead of live input
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Restart the replay when it ends
    #[arg(long, requires = "replay")]
    loop_replay: bool,

    /// Record every frame's hands to a JSON-lines file
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        AppConfig {
            width:          cli.width.max(1),
            height:         cli.height.max(1),
            style:          cli.style,
            seed:           cli.seed,
            mirror:         cli.mirror,
            show_landmarks: !cli.no_landmarks,
            replay:         cli.replay,
            loop_replay:    cli.loop_replay,
            record:         cli.record,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from(Cli::parse());

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Conjure: Gesture-Summoned Circles                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.replay {
        Some(path) => println!("  Mode: replay of {}", path.display()),
        #[cfg(feature = "leap")]
        None => println!("  Mode: LeapMotion hardware"),
        #[cfg(not(feature = "leap"))]
        None => println!("  Mode: Keyboard simulation  (use --features leap for hardware)"),
    }
    println!("  Style: {}  Frame: {}×{}", cfg.style.name(), cfg.width, cfg.height);
    println!();

    match run(cfg).context("conjure session failed") {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

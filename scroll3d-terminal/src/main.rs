/// scroll3d terminal showcase
///
/// Scroll through a page of sections and watch the model viewport follow.
/// Controls:
///   - Arrow keys / mouse wheel / PgUp / PgDn: Scroll
///   - 1-9: Activate a section directly
///   - p / g: Dump section positions / scroll progress
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use scroll3d_core::ShowcaseConfig;
use scroll3d_terminal::TerminalApp;

#[derive(Debug, Parser)]
#[command(name = "scroll3d-terminal", about = "Scroll-driven 3D model showcase in the terminal")]
struct Args {
    /// Showcase configuration (TOML). The built-in five-model showcase is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where log output goes while the terminal is in raw mode
    #[arg(long, default_value = "scroll3d.log")]
    log_file: PathBuf,

    /// Height of each section panel in rows (defaults to the terminal height)
    #[arg(long)]
    section_rows: Option<usize>,

    /// Directory model references are resolved against; missing files are reported as load errors
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = fs::File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ShowcaseConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ShowcaseConfig::default(),
    };

    let mut app = TerminalApp::new(&config, args.section_rows, args.models_dir)
        .context("failed to start showcase")?;
    app.run().context("terminal session failed")?;

    println!("Thank you for using scroll3d!");
    Ok(())
}

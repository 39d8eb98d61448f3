use std::env;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use render::{RenderConfig, Viewport};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod pipeline;

#[derive(Debug, Parser)]
#[command(name = "slopeplot", about = "Render slope stability search results headlessly")]
struct Cli {
    /// Render config JSON; falls back to $SLOPEPLOT_CONFIG, then defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw the section and candidates, applying each threshold in turn.
    Render {
        #[arg(long)]
        section: PathBuf,
        #[arg(long)]
        feed: PathBuf,
        /// FOS color table JSON; the built-in ladder when omitted.
        #[arg(long)]
        colors: Option<PathBuf>,
        /// Display thresholds, applied in order (repeatable).
        #[arg(long = "threshold", required = true)]
        thresholds: Vec<f64>,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Figure output path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the FOS color legend.
    Legend {
        #[arg(long)]
        colors: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    let config_path = cli
        .config
        .or_else(|| env::var_os("SLOPEPLOT_CONFIG").map(PathBuf::from));
    let config = match &config_path {
        Some(path) => RenderConfig::load(path).map_err(|e| e.to_string())?,
        None => RenderConfig::default(),
    };

    match cli.command {
        Command::Render {
            section,
            feed,
            colors,
            thresholds,
            width,
            height,
            out,
        } => {
            let inputs = pipeline::Inputs::load(&section, &feed, colors.as_deref())?;
            let figure =
                pipeline::render_figure(inputs, &thresholds, Viewport::new(width, height), config)?;
            let payload =
                serde_json::to_string_pretty(&figure).map_err(|e| format!("json: {e}"))?;
            match out {
                Some(path) => {
                    fs::write(&path, payload).map_err(|e| format!("write {path:?}: {e}"))?;
                    info!(
                        "wrote {} ({} traces)",
                        path.display(),
                        figure.traces.len()
                    );
                }
                None => println!("{payload}"),
            }
            Ok(())
        }
        Command::Legend { colors } => {
            let table = pipeline::load_colors(colors.as_deref())?;
            let payload = serde_json::to_string_pretty(&table.legend())
                .map_err(|e| format!("json: {e}"))?;
            println!("{payload}");
            Ok(())
        }
    }
}

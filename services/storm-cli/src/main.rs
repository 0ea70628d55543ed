//! STORM render command-line tool.
//!
//! Loads molecule lists, renders every channel and writes one PNG per
//! channel and z slice together with the resolved axes.

mod input;
mod output;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use storm_common::RenderConfig;

#[derive(Parser, Debug)]
#[command(name = "storm-render")]
#[command(about = "Render single-molecule localization lists into image stacks")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level or filter directive (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render molecule lists to PNG slices
    Render(RenderArgs),
    /// Print the default configuration as YAML
    Defaults,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Molecule file (JSON, or YAML by extension)
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long, env = "STORM_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the rendered slices and axes.json
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Axes from an earlier render, to reuse its window
    #[arg(long)]
    axes: Option<PathBuf>,

    /// Parameter overrides as name/value pairs, e.g. `zoom 8 fast true`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    params: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&cli.log_level));

    // stdout is reserved for command output
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow!(e))?;

    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Defaults => {
            print!("{}", RenderConfig::default().to_yaml()?);
            Ok(())
        }
    }
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(level)
}

fn run_render(args: RenderArgs) -> Result<()> {
    let start = Instant::now();

    let mut config = input::load_config(args.config.as_deref(), &args.params)?;
    if let Some(path) = &args.axes {
        config.axes = Some(input::load_axes(path)?);
    }

    let channels = input::load_channels(&args.input)?;
    info!(
        input = %args.input.display(),
        channels = channels.len(),
        molecules = channels.iter().map(|c| c.len()).sum::<usize>(),
        "Loaded molecule lists"
    );

    let rendered = storm_render::render(&channels, &config).context("render failed")?;
    let written = output::write_outputs(&rendered, &args.output_dir)?;

    info!(
        output_dir = %args.output_dir.display(),
        files = written.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Render complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_level_filter_accepts_plain_levels() {
        assert_eq!(level_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(level_filter("warn").max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_level_filter_accepts_directives() {
        let filter = level_filter("warn,storm_render=trace");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }
}

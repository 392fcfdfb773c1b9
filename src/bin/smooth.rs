use anyhow::{Context, Result};
use clap::Parser;
use sensor_smoothing::{config, Filter, FilterConfig, SmoothingFilter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "smooth",
    version,
    about = "Smooth sensor readings with a sliding-window mean or median"
)]
struct Cli {
    /// TOML filter configuration; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Readings to smooth. Read from stdin when none are given.
    #[arg(allow_negative_numbers = true)]
    values: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (settings, mut filter) = build_filter(&cli)?;
    tracing::info!(
        max_size = settings.max_size,
        window_size = settings.window_size,
        statistic = %settings.statistic,
        "smoothing started"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.values.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            for token in line.split_whitespace() {
                smooth_token(&mut filter, token, &mut out)?;
            }
        }
    } else {
        for token in &cli.values {
            smooth_token(&mut filter, token, &mut out)?;
        }
    }

    Ok(())
}

fn build_filter(cli: &Cli) -> Result<(FilterConfig, SmoothingFilter)> {
    let settings = match &cli.config {
        Some(path) => {
            config::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => FilterConfig::default(),
    };
    let filter = settings.build().context("building filter")?;
    Ok((settings, filter))
}

fn smooth_token(filter: &mut impl Filter<f64>, token: &str, out: &mut impl Write) -> Result<()> {
    let x: f64 = token
        .parse()
        .with_context(|| format!("invalid reading '{}'", token))?;
    let y = filter.filter(x)?;
    writeln!(out, "{}", y)?;
    Ok(())
}

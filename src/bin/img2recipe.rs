//! CLI binary for img2recipe.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints a run summary.

use anyhow::{Context, Result};
use clap::Parser;
use img2recipe::{extract_dir, ExtractionConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every recipe photo in a directory (output to cwd)
  img2recipe ./recipe_photos

  # Write the JSON documents somewhere else
  img2recipe ./recipe_photos -o ./recipes

  # Use a different model and a tighter response budget
  img2recipe --model claude-3-opus-20240229 --max-tokens 1500 ./photos

  # Structured run summary on stdout
  img2recipe --json ./photos > run.json

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY       Anthropic API key (required)
  IMG2RECIPE_MODEL        Override model ID

  A .env file in the working directory is loaded once at startup, so the
  key can live there instead of the shell environment.

PROCESSING RULES:
  - Only files ending in .jpg or .jpeg (case-sensitive) are processed;
    everything else is skipped silently. Subdirectories are not entered.
  - Images over 5 MiB are recompressed in place at JPEG quality 95 before
    upload. The original file is overwritten.
  - Each extracted recipe is printed to stdout and written to
    <title>.json, overwriting any existing file of that name.
"#;

/// Convert photographed recipe cards to structured JSON.
#[derive(Parser, Debug)]
#[command(
    name = "img2recipe",
    version,
    about = "Convert photographed recipe cards to structured JSON using a vision LLM",
    long_about = "Scan a directory of JPEG recipe photos, send each to the Anthropic \
Messages API with a forced recipe_formatter tool choice, and write each extracted \
recipe as an indented <title>.json document.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing .jpg/.jpeg recipe photos.
    directory: PathBuf,

    /// Directory where <title>.json files are written.
    #[arg(short, long, env = "IMG2RECIPE_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Model ID (e.g. claude-3-sonnet-20240229).
    #[arg(long, env = "IMG2RECIPE_MODEL")]
    model: Option<String>,

    /// Response-length budget in tokens.
    #[arg(long, env = "IMG2RECIPE_MAX_TOKENS", default_value_t = 2000)]
    max_tokens: u32,

    /// JPEG quality for in-place recompression (1-100).
    #[arg(long, env = "IMG2RECIPE_JPEG_QUALITY", default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Recompress images larger than this many MiB.
    #[arg(long, env = "IMG2RECIPE_MAX_IMAGE_MIB", default_value_t = 5.0)]
    max_image_mib: f64,

    /// Path to a text file containing a custom system persona.
    #[arg(long, env = "IMG2RECIPE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Print the structured run summary (ExtractionOutput) as JSON.
    #[arg(long, env = "IMG2RECIPE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMG2RECIPE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the per-recipe prints.
    #[arg(short, long, env = "IMG2RECIPE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Optional local configuration file, loaded once before anything reads
    // the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let system_prompt = match cli.system_prompt {
        Some(ref path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {path:?}"))?,
        ),
        None => None,
    };

    let mut builder = ExtractionConfig::builder()
        .out_dir(&cli.out_dir)
        .max_tokens(cli.max_tokens)
        .jpeg_quality(cli.jpeg_quality)
        .max_image_mib(cli.max_image_mib);

    if let Some(model) = cli.model.clone() {
        builder = builder.model(model);
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract_dir(&cli.directory, &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} recipes written  ->  {}",
            if stats.skipped_no_recipe == 0 {
                green("OK")
            } else {
                cyan("~")
            },
            bold(&stats.recipes_written.to_string()),
            stats.jpeg_files,
            cli.out_dir.display(),
        );
        if stats.recompressed_files > 0 {
            eprintln!(
                "   {} images recompressed in place",
                stats.recompressed_files
            );
        }
        eprintln!(
            "   {} tokens in  /  {} tokens out  -  {}ms total",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
            stats.total_duration_ms,
        );
    }

    Ok(())
}

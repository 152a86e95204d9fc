//! Scores catalog items against the form card renderer's field-type table.
//!
//! Loads the catalog export (`--input` or `CATALOG_DATA_PATH`), prints the
//! compatibility summary to stdout, and writes `catalog_compatibility.json`
//! under the output directory (`--output-dir` or `ANALYSIS_OUTPUT_DIR`).
//! Diagnostics go to stderr and are filtered by `RUST_LOG`.

use anyhow::{Context, Result, anyhow, bail};
use catalog_compat::{
    CompatibilityReport, analyze, load_export, render_console_report, render_saved_line,
    resolve_input_path, resolve_output_dir, write_report,
};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let input = resolve_input_path(cli.input.as_deref())?;
    let output_dir = resolve_output_dir(cli.output_dir.as_deref())?;
    debug!(input = %input.display(), output_dir = %output_dir.display(), "resolved paths");

    let export = load_export(&input).context("Error loading JSON file")?;
    let analysis = analyze(&export);

    print!(
        "{}",
        render_console_report(&analysis, &export.catalog_names())
    );

    let report = CompatibilityReport::from_analysis(&analysis);
    let path = write_report(&output_dir, &report)?;
    println!("{}", render_saved_line(&path));
    Ok(())
}

struct Cli {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut input = None;
        let mut output_dir = None;

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--input" => input = Some(next_path("--input", &mut args)?),
                "--output-dir" => output_dir = Some(next_path("--output-dir", &mut args)?),
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self { input, output_dir })
    }
}

fn next_path(flag: &str, args: &mut env::ArgsOs) -> Result<PathBuf> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?;
    let path = PathBuf::from(
        value
            .into_string()
            .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?,
    );
    if path.as_os_str().is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(path)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: catalog-compat [--input PATH] [--output-dir PATH]\n\nOptions:\n  --input PATH              Catalog export to analyze (or set CATALOG_DATA_PATH; default scripts/output/catalog_data.json).\n  --output-dir PATH         Directory for catalog_compatibility.json (or set ANALYSIS_OUTPUT_DIR; default scripts/analysis_output).\n  --help                    Show this help text."
    );
    std::process::exit(code);
}

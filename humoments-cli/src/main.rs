use clap::Parser;
use humoments::report::DEFAULT_REPORT_NAME;
use humoments::source::{load_reference, DirectorySource};
use humoments::{save_report, BatchConfig, BatchReport, BatchRunner};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Hu moment descriptors for a reference mask and a search folder")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Reference image (overrides the config).
    #[arg(short, long, value_name = "IMAGE")]
    reference: Option<String>,
    /// Search folder (overrides the config).
    #[arg(short, long, value_name = "DIR")]
    search_dir: Option<String>,
    /// Report file (overrides the config).
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    reference_path: String,
    search_dir: String,
    output_path: String,
    skip_names: Vec<String>,
    case_insensitive_skip: bool,
    parallel: bool,
    fail_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        let batch = BatchConfig::default();
        Self {
            reference_path: String::new(),
            search_dir: String::new(),
            output_path: DEFAULT_REPORT_NAME.to_string(),
            skip_names: batch.skip_names,
            case_insensitive_skip: batch.case_insensitive_skip,
            parallel: batch.parallel,
            fail_on_empty: false,
        }
    }
}

impl Config {
    fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            skip_names: self.skip_names.clone(),
            case_insensitive_skip: self.case_insensitive_skip,
            parallel: self.parallel,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("humoments=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let mut config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    if let Some(reference) = cli.reference {
        config.reference_path = reference;
    }
    if let Some(search_dir) = cli.search_dir {
        config.search_dir = search_dir;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    if config.reference_path.is_empty() {
        return Err("reference_path must be set (config or --reference)".into());
    }
    if config.search_dir.is_empty() {
        return Err("no search folder selected; no report written".into());
    }

    let batch = config.batch_config();
    let reference = load_reference(&config.reference_path);
    let source = DirectorySource::open(&config.search_dir)?;
    let mut runner = BatchRunner::new(batch);
    let report = run(&mut runner, reference, source)?;

    for skip in report.skipped().iter().filter(|s| s.reason.is_failure()) {
        tracing::warn!(entry = %skip.name, reason = %skip.reason, "entry skipped");
    }

    if report.is_empty_search() {
        if config.fail_on_empty {
            report.require_search_rows(&config.search_dir)?;
        }
        eprintln!("no images found in {}", config.search_dir);
    }

    save_report(&report, &config.output_path)?;
    println!(
        "wrote {} ({} images, {} skipped)",
        config.output_path,
        report.search_rows().len(),
        report.skipped().len()
    );
    if let Some((row, dist)) = report.closest_match() {
        println!("closest to {}: {} (distance {dist:e})", report.reference().label, row.label);
    }

    Ok(())
}

#[cfg(feature = "rayon")]
fn run(
    runner: &mut BatchRunner,
    reference: humoments::CandidateEntry<humoments::BinaryImage>,
    source: DirectorySource,
) -> humoments::HuResult<BatchReport> {
    if runner.config().parallel {
        runner.run_parallel(reference, source.collect())
    } else {
        runner.run(reference, source)
    }
}

#[cfg(not(feature = "rayon"))]
fn run(
    runner: &mut BatchRunner,
    reference: humoments::CandidateEntry<humoments::BinaryImage>,
    source: DirectorySource,
) -> humoments::HuResult<BatchReport> {
    if runner.config().parallel {
        tracing::warn!("built without the rayon feature; running sequentially");
    }
    runner.run(reference, source)
}

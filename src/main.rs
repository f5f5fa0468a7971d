use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use genotype_report::config::Settings;
use genotype_report::discovery::DEFAULT_PATTERN;
use genotype_report::output::DEFAULT_LOOKUP_URL;
use genotype_report::{
    analyze, FileDiscovery, PositionPolicy, ReferenceTable, Report, ReportFormat,
    ReportGenerator, TwentyThreeAndMeParser,
};

/// Summary statistics and noteworthy-variant scan for 23andMe raw data
#[derive(Parser, Debug)]
#[command(
    name = "genotype-report",
    version,
    about = "Summarize a 23andMe raw data file and flag noteworthy variants",
    long_about = r#"
Reads a 23andMe raw data export, tallies genotype calls by chromosome and by
genotype, and cross-references every SNP against a curated table of
noteworthy variants. Matches are flagged as exact, complementary (reported
from the opposite strand) or no-call.

Without --input, the current directory (or --dir) is searched for files
matching --pattern and you are asked to pick one.

Results are for research and educational use only, not for medical purposes.
"#
)]
struct Cli {
    /// Raw data file to analyze (plain, .gz, .bz2, .xz or .zip)
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Directory searched for raw data files when no input is given
    #[arg(short, long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    dir: Option<PathBuf>,

    /// File name pattern used when searching for raw data files
    #[arg(short, long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Recursive search for raw data files
    #[arg(short, long, help = "Recursively search directories")]
    recursive: bool,

    /// Curated reference table (CSV/TSV with variant_id,gene,genotype,note)
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    reference: Option<PathBuf>,

    /// Position de-duplication policy for the summary
    #[arg(long, value_enum)]
    positions: Option<PositionPolicy>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Accept files without the 23andMe banner line
    #[arg(long)]
    no_header_check: bool,

    /// Base URL for per-variant reading links
    #[arg(long, value_name = "URL")]
    lookup_url: Option<String>,

    /// Settings file (TOML)
    #[arg(
        long,
        value_name = "FILE",
        env = "GENOTYPE_REPORT_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions
    Completions { shell: Shell },
    /// List the curated reference table in use
    Reference,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = AppConfig::resolve(&cli, settings);
    let table = load_reference(config.reference.as_deref())?;

    if let Some(Commands::Reference) = &cli.command {
        list_reference(&table);
        return Ok(());
    }

    run_analysis(&config, &table)
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("genotype_report={}", level))
        .with_writer(io::stderr)
        .init();
}

fn load_reference(path: Option<&Path>) -> Result<ReferenceTable> {
    match path {
        Some(path) => ReferenceTable::from_path(path)
            .with_context(|| format!("Failed to load reference table {}", path.display())),
        None => Ok(ReferenceTable::builtin()),
    }
}

fn list_reference(table: &ReferenceTable) {
    println!("{}", style("Curated Reference Variants:").bold().cyan());
    println!();

    for entry in table.iter() {
        println!(
            "  {:11} {} {}",
            style(&entry.key).green().bold(),
            style(&entry.genotype).yellow(),
            style(&entry.gene).cyan()
        );
        println!("              {}", style(&entry.note).dim());
    }
}

fn run_analysis(config: &AppConfig, table: &ReferenceTable) -> Result<()> {
    let input = match &config.input {
        Some(path) => path.clone(),
        None => {
            let discovery = FileDiscovery::new(&config.pattern, config.recursive)?;
            let candidates = discovery.discover(&config.dir)?;
            discovery.select(&candidates, console::user_attended_stderr())?
        }
    };

    info!("Analyzing {}", input.display());

    let pb = if console::user_attended_stderr() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} SNPs {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let parser = TwentyThreeAndMeParser::new()
        .check_header(config.header_check)
        .with_progress(pb.clone());
    let store = parser
        .parse(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    pb.finish_and_clear();

    if store.is_empty() {
        warn!("{} contains no genotype calls", input.display());
    }

    let (summary, matches) = analyze(&store, table, config.positions);
    let report = Report::new(input.display().to_string(), summary, matches);

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?;
            let generator = ReportGenerator::new(false, &config.lookup_url);
            generator.generate(&report, config.format, &mut BufWriter::new(file))?;

            eprintln!(
                "{} Report saved to: {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
        }
        None => {
            let color = config.color && console::colors_enabled();
            let generator = ReportGenerator::new(color, &config.lookup_url);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            generator.generate(&report, config.format, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

#[derive(Debug)]
struct AppConfig {
    input: Option<PathBuf>,
    dir: PathBuf,
    pattern: String,
    recursive: bool,
    reference: Option<PathBuf>,
    positions: PositionPolicy,
    format: ReportFormat,
    output: Option<PathBuf>,
    color: bool,
    header_check: bool,
    lookup_url: String,
}

impl AppConfig {
    /// Command-line flags first, then the settings file, then defaults
    fn resolve(cli: &Cli, settings: Settings) -> Self {
        Self {
            input: cli.input.clone().or(settings.input),
            dir: cli
                .dir
                .clone()
                .or(settings.dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            pattern: cli
                .pattern
                .clone()
                .or(settings.pattern)
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            recursive: cli.recursive || settings.recursive.unwrap_or(false),
            reference: cli.reference.clone().or(settings.reference),
            positions: cli.positions.or(settings.positions).unwrap_or_default(),
            format: cli.format.or(settings.format).unwrap_or_default(),
            output: cli.output.clone().or(settings.output),
            color: !cli.no_color && settings.color.unwrap_or(true),
            header_check: !cli.no_header_check && settings.header_check.unwrap_or(true),
            lookup_url: cli
                .lookup_url
                .clone()
                .or(settings.lookup_url)
                .unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string()),
        }
    }
}

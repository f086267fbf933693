use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use sense_projection::{
    AlignmentQualityAnalyzer, AlignmentStore, AnalyzerConfig, InputPaths, ProjectionEngine,
    QualityReport, ReportFormat, Snapshot, TokenCorpus, save_tsv,
};

#[derive(Parser)]
#[command(
    name = "sense-projection",
    version,
    about = "Project word senses across word alignments and audit alignment quality"
)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,
    /// Log per-sentence details
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project gold senses onto target-language tokens
    Project(ProjectArgs),
    /// Report alignment quality without a gold alignment
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Annotation table TSV: sentence_id, instance_id, token
    #[arg(long, value_name = "PATH")]
    annotations: PathBuf,
    /// Gold sense key file: instance_id label [label...]
    #[arg(long, value_name = "PATH")]
    key: PathBuf,
    /// Aligner output: index<TAB>i-j i-j ...
    #[arg(long, value_name = "PATH")]
    alignments: PathBuf,
    /// Aligner source tokens, one sentence per line
    #[arg(long, value_name = "PATH")]
    source: PathBuf,
    /// Aligner target tokens, one sentence per line
    #[arg(long, value_name = "PATH")]
    target: PathBuf,
    /// Token substitution table: old<TAB>new
    #[arg(long, value_name = "PATH")]
    substitutions: Option<PathBuf>,
    #[arg(long, value_name = "PATH", default_value = "senses.tsv")]
    output: PathBuf,
    /// Sentence index to print a trace for
    #[arg(long, default_value_t = 0)]
    show_example: usize,
}

#[derive(Args)]
struct EvaluateArgs {
    #[arg(long, value_name = "PATH")]
    source: PathBuf,
    #[arg(long, value_name = "PATH")]
    target: PathBuf,
    /// Alignment file to evaluate
    #[arg(long, value_name = "PATH")]
    alignments: PathBuf,
    /// Second alignment of the same corpus to compare against
    #[arg(long, value_name = "PATH")]
    compare: Option<PathBuf>,
    #[arg(long, default_value = "Other Method")]
    compare_name: String,
    /// Analyzer settings (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Flag degrees above this value
    #[arg(long)]
    chain_threshold: Option<usize>,
    /// Number of manual inspection samples
    #[arg(long)]
    samples: Option<usize>,
    /// Also write the report here
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// text, json or toon
    #[arg(long, default_value = "text")]
    format: ReportFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Project(args) => run_project(args),
        Commands::Evaluate(args) => run_evaluate(args),
    }
}

fn run_project(args: ProjectArgs) -> Result<()> {
    let paths = InputPaths {
        annotations: args.annotations,
        key: args.key,
        alignments: args.alignments,
        source: args.source,
        target: args.target,
        substitutions: args.substitutions,
    };
    let snapshot = Snapshot::load(&paths).context("failed to load projection inputs")?;
    let engine = ProjectionEngine::new(&snapshot);

    let projection = engine.project_all();
    save_tsv(&projection.records, &args.output)?;

    let stats = &projection.stats;
    log::info!(
        "Skipped links: {} unmapped, {} no instance, {} duplicate mention, {} no sense, {} out of range, {} without sentence data",
        stats.unmapped,
        stats.no_instance,
        stats.duplicate_mention,
        stats.no_sense,
        stats.source_out_of_range + stats.target_out_of_range,
        stats.missing_sentence_data
    );

    print!("{}", projection.summary(10));
    match engine.trace(args.show_example) {
        Some(trace) => print!("\n{trace}"),
        None => log::warn!("sentence {} has no data to trace", args.show_example),
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(t) = args.chain_threshold {
        config.chain_threshold = t;
    }
    if let Some(n) = args.samples {
        config.inspection_samples = n;
    }

    let source = TokenCorpus::load(&args.source)?;
    let target = TokenCorpus::load(&args.target)?;
    let alignments = AlignmentStore::load(&args.alignments)?;
    let other = args
        .compare
        .as_deref()
        .map(AlignmentStore::load)
        .transpose()
        .context("failed to load comparison alignments")?;

    let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &config);
    let report = QualityReport::build(
        &analyzer,
        other.as_ref().map(|o| (o, args.compare_name.as_str())),
    );
    let rendered = report.render(args.format)?;

    println!("{rendered}");
    if let Some(path) = &args.report {
        std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        log::info!("Report saved to {}", path.display());
    }
    Ok(())
}

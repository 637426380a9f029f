//! # CLI Module
//!
//! Command-line interface for the near-duplicate mover.
//!
//! ## Usage
//! ```bash
//! # Ask before moving each duplicate
//! dupe-sort scan ~/Photos ~/Photos-duplicates
//!
//! # Looser matching, finer fingerprints
//! dupe-sort scan ~/Photos ~/dupes --threshold 20 --hash-size 32
//!
//! # Dry run that only reports, as JSON
//! dupe-sort scan ~/Photos ~/dupes --policy keep --output json
//!
//! # Keep every comparison frame for later review
//! dupe-sort scan ~/Photos ~/dupes --preview-dir /tmp/frames
//!
//! # Print fingerprints of individual images
//! dupe-sort hash a.jpg b.jpg --hash-size 8
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use near_duplicate_mover::core::comparator::{ComparisonStrategy, ThresholdStrategy};
use near_duplicate_mover::core::decision::{AlwaysKeep, AlwaysMove};
use near_duplicate_mover::core::source::ImageFilter;
use near_duplicate_mover::core::{
    DecodePolicy, Decision, DecisionPort, DecisionRequest, DuplicateScanner, FolderSource,
    PerceptualHasher, ScanConfig, ScanReport,
};
use near_duplicate_mover::error::Result;
use near_duplicate_mover::events::{
    ComparisonEvent, EventSink, LogLevel, SummaryEvent, TracingSink,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Near-Duplicate Mover - sort look-alike images out of a folder
#[derive(Parser, Debug)]
#[command(name = "dupe-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare every pair of images in a folder and move duplicates away
    Scan {
        /// Folder to check for duplicates (not searched recursively)
        source: PathBuf,

        /// Folder confirmed duplicates are moved into
        destination: PathBuf,

        /// Percentage of fingerprint bits allowed to differ (0-100)
        #[arg(short, long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=100))]
        threshold: u32,

        /// Fingerprint grid size (bits = size squared)
        #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..=256))]
        hash_size: u32,

        /// How to answer each duplicate
        #[arg(short, long, default_value = "ask")]
        policy: Policy,

        /// Hash every file once before comparing
        #[arg(long)]
        precompute: bool,

        /// Skip unreadable images instead of stopping
        #[arg(long)]
        skip_unreadable: bool,

        /// Also compare hidden files (names starting with .)
        #[arg(long)]
        include_hidden: bool,

        /// Only compare files with these extensions (repeatable)
        #[arg(short, long = "extension", value_name = "EXT")]
        extensions: Vec<String>,

        /// Save every comparison frame as a PNG into this folder
        #[arg(long)]
        preview_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the fingerprint of each image as hex
    Hash {
        /// Image files to fingerprint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Fingerprint grid size (bits = size squared)
        #[arg(long, default_value = "16", value_parser = clap::value_parser!(u32).range(1..=256))]
        hash_size: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Prompt on the terminal for every duplicate (default)
    Ask,
    /// Move every duplicate without asking
    Move,
    /// Never move anything; report only
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            source,
            destination,
            threshold,
            hash_size,
            policy,
            precompute,
            skip_unreadable,
            include_hidden,
            extensions,
            preview_dir,
            output,
            verbose,
        } => {
            let decode_policy = if skip_unreadable {
                DecodePolicy::Skip
            } else {
                DecodePolicy::Abort
            };
            let config = ScanConfig::new(source, destination)
                .threshold(threshold)
                .hash_size(hash_size)
                .precompute_fingerprints(precompute)
                .decode_policy(decode_policy);

            let mut filter = ImageFilter::new().with_hidden(include_hidden);
            if !extensions.is_empty() {
                filter = filter.with_extensions(extensions);
            }
            let source = FolderSource::with_filter(filter);

            run_scan(config, &source, policy, preview_dir, output, verbose)
        }
        Commands::Hash {
            files,
            hash_size,
            output,
        } => run_hash(&files, hash_size, output),
    }
}

fn run_hash(files: &[PathBuf], hash_size: u32, output: OutputFormat) -> Result<()> {
    let mut hasher = PerceptualHasher::new(hash_size)?;
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        match hasher.hash_file(file) {
            Ok(hashed) => results.push((file, hashed.fingerprint)),
            Err(e) => eprintln!("{} {}", style("✗").red().bold(), e),
        }
    }

    match output {
        OutputFormat::Pretty => {
            for (file, fingerprint) in &results {
                println!(
                    "{}  {}",
                    style(fingerprint.to_hex()).cyan(),
                    display_path(file)
                );
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = results
                .iter()
                .map(|(file, fingerprint)| {
                    serde_json::json!({
                        "path": file,
                        "hash_size": fingerprint.hash_size(),
                        "fingerprint": fingerprint.to_hex(),
                        "ones": fingerprint.count_ones(),
                    })
                })
                .collect();
            match serde_json::to_string_pretty(&entries) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!(error = %e, "failed to serialize results"),
            }
        }
    }

    Ok(())
}

fn run_scan(
    config: ScanConfig,
    source: &FolderSource,
    policy: Policy,
    preview_dir: Option<PathBuf>,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if output == OutputFormat::Pretty {
        term.write_line(&format!(
            "{} {}",
            style("Near-Duplicate Mover").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line(&format!(
            "  {} {}",
            style("source:").dim(),
            display_path(&config.source_folder)
        ))
        .ok();
        term.write_line(&format!(
            "  {} {}",
            style("duplicates go to:").dim(),
            display_path(&config.destination_folder)
        ))
        .ok();
        if verbose {
            let strategy = ThresholdStrategy::new(config.threshold);
            term.write_line(&format!("  {}", style(strategy.description()).dim()))
                .ok();
        }
        term.write_line("").ok();
    }

    let progress = if output == OutputFormat::Pretty {
        let pb = ProgressBar::new_spinner();
        let template = "{spinner:.green} {pos} compared {msg}";
        if let Ok(spinner) = ProgressStyle::default_spinner().template(template) {
            pb.set_style(spinner);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    if let Some(dir) = &preview_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!(path = %dir.display(), error = %e, "cannot create preview folder");
        }
    }

    let mut sink = CliSink {
        progress: progress.clone(),
        verbose,
        preview_dir,
        frames_saved: 0,
    };

    let mut scanner = DuplicateScanner::new(config);
    let result = match policy {
        Policy::Ask => {
            let mut prompt = TermPrompt {
                term: term.clone(),
                progress: progress.clone(),
            };
            scanner.run(source, &mut sink, &mut prompt)
        }
        Policy::Move => scanner.run(source, &mut sink, &mut AlwaysMove),
        Policy::Keep => scanner.run(source, &mut sink, &mut AlwaysKeep),
    };

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let report = result?;

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, scanner.config(), verbose),
        OutputFormat::Json => print_json_results(&report, scanner.config()),
    }

    Ok(())
}

/// Terminal front end for scan events
struct CliSink {
    progress: Option<ProgressBar>,
    verbose: bool,
    preview_dir: Option<PathBuf>,
    frames_saved: usize,
}

impl CliSink {
    fn print(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }

    fn save_frame(&mut self, event: &ComparisonEvent) {
        let Some(dir) = &self.preview_dir else {
            return;
        };
        let name = format!(
            "{:05}_{}_{}.png",
            self.frames_saved,
            stem(&event.reference),
            stem(&event.candidate)
        );
        let path = dir.join(name);
        match event.frame.save(&path) {
            Ok(()) => self.frames_saved += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to save preview frame"),
        }
    }
}

impl EventSink for CliSink {
    fn on_comparison(&mut self, event: &ComparisonEvent) {
        TracingSink.on_comparison(event);
        if let Some(pb) = &self.progress {
            pb.inc(1);
            pb.set_message(format!(
                "{} ~ {} (distance {})",
                stem(&event.reference),
                stem(&event.candidate),
                event.distance
            ));
        }
        self.save_frame(event);
    }

    fn on_summary(&mut self, event: &SummaryEvent) {
        TracingSink.on_summary(event);
    }

    fn on_log(&mut self, level: LogLevel, message: &str) {
        let line = match level {
            LogLevel::Debug => {
                TracingSink.on_log(level, message);
                return;
            }
            LogLevel::Info if !self.verbose => return,
            LogLevel::Info => format!("  {} {}", style("·").dim(), message),
            LogLevel::Warn => format!("  {} {}", style("!").yellow().bold(), message),
            LogLevel::Error => format!("  {} {}", style("✗").red().bold(), message),
        };
        self.print(line);
    }
}

/// Yes/no prompt on the terminal, defaulting to keep
struct TermPrompt {
    term: Term,
    progress: Option<ProgressBar>,
}

impl TermPrompt {
    fn ask(&self, request: &DecisionRequest) -> Decision {
        let question = format!(
            "{} Found {} element ({}) of {}, similar to {}\n  Move it to {}? [y/N] ",
            style("?").cyan().bold(),
            request.candidate_index,
            style(file_label(&request.candidate)).yellow(),
            request.total_files,
            file_label(&request.reference),
            display_path(&request.destination)
        );

        if self.term.write_str(&question).is_err() {
            return Decision::Keep;
        }

        match self.term.read_line() {
            Ok(answer) if is_yes(&answer) => Decision::Move,
            _ => Decision::Keep,
        }
    }
}

impl DecisionPort for TermPrompt {
    fn request(&mut self, request: &DecisionRequest) -> Decision {
        match &self.progress {
            Some(pb) => pb.suspend(|| self.ask(request)),
            None => self.ask(request),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_pretty_results(term: &Term, report: &ScanReport, config: &ScanConfig, verbose: bool) {
    let summary = &report.summary;

    term.write_line("").ok();
    let headline = if summary.cancelled {
        format!("{} Scan Cancelled", style("!").yellow().bold())
    } else {
        format!("{} Scan Complete", style("✓").green().bold())
    };
    term.write_line(&headline).ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images listed, {} pairs compared",
        style(summary.total_files).cyan(),
        style(summary.comparisons).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} duplicates found",
        style(summary.duplicate_count).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} moved to {}",
        style(summary.moved_count).green(),
        display_path(&config.destination_folder)
    ))
    .ok();

    if summary.move_failures > 0 {
        term.write_line(&format!(
            "  {} moves failed (files kept in place)",
            style(summary.move_failures).red()
        ))
        .ok();
    }

    if summary.skipped_files > 0 {
        term.write_line(&format!(
            "  {} unreadable files skipped",
            style(summary.skipped_files).yellow()
        ))
        .ok();
    }

    if verbose {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Remaining files:").bold().underlined()))
            .ok();
        for file in &report.remaining {
            term.write_line(&format!("    {}", display_path(file))).ok();
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{}",
        style("Nothing was deleted. Moved files can be put back by hand.").dim()
    ))
    .ok();
}

fn print_json_results(report: &ScanReport, config: &ScanConfig) {
    let output = serde_json::json!({
        "source": config.source_folder,
        "destination": config.destination_folder,
        "threshold": config.threshold,
        "hash_size": config.hash_size,
        "summary": report.summary,
        "remaining": report.remaining,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "failed to serialize results"),
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}

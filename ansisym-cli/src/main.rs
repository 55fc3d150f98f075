//! Ansisym CLI - generate gEDA symbols from JSON part descriptions.

use ansisym::model::Directive;
use ansisym::{AnsisymCore, Diagnostic, GenerateOptions, GenerationResult, Severity};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "ansisym")]
#[command(about = "ANSI-style gEDA/gschem symbol generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate part descriptions and write one .sym file per block
    Generate {
        /// Part description (.json) or a directory of them
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Directory the .sym files are written to
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only write the named block (repeatable)
        #[arg(short, long = "block", value_name = "NAME")]
        blocks: Vec<String>,

        /// Print symbols to stdout instead of writing files
        #[arg(long)]
        stdout: bool,
    },

    /// Validate part descriptions without writing anything
    Check {
        /// Part description (.json) or a directory of them
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if diagnostics at this severity or higher are found
        #[arg(long, value_enum, default_value = "fatal")]
        fail_on: FailOnSeverity,
    },

    /// List the directives a part may set
    Directives {
        /// Show value types
        #[arg(short = 'l', long)]
        long: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
    /// GitHub Actions annotations
    Github,
}

#[derive(Clone, ValueEnum)]
enum FailOnSeverity {
    Fatal,
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Generate {
            path,
            output,
            format,
            strict,
            blocks,
            stdout,
        } => {
            let options = GenerateOptions {
                strict_mode: strict,
                blocks,
            };
            handle_generate(&path, &output, &format, &options, stdout)
        }
        Commands::Check {
            path,
            format,
            fail_on,
        } => handle_check(&path, &format, &fail_on),
        Commands::Directives { long } => {
            handle_directives(long);
            Ok(0)
        }
    }
}

fn load_results(path: &Path, options: &GenerateOptions) -> anyhow::Result<Vec<GenerationResult>> {
    let results = if path.is_dir() {
        AnsisymCore::generate_dir(path, options)
    } else {
        AnsisymCore::generate_file(path, options).map(|r| vec![r])
    };
    results.with_context(|| format!("failed to process {}", path.display()))
}

fn handle_generate(
    path: &Path,
    output: &Path,
    format: &OutputFormat,
    options: &GenerateOptions,
    stdout: bool,
) -> anyhow::Result<i32> {
    let results = load_results(path, options)?;

    let mut written = Vec::new();
    for result in &results {
        if stdout {
            for symbol in &result.symbols {
                print!("{}", symbol);
            }
        } else {
            let paths = AnsisymCore::write_symbols(&result.symbols, output)
                .with_context(|| format!("failed to write symbols to {}", output.display()))?;
            written.extend(paths);
        }
    }

    // stdout carries the symbols; keep reports off it
    if stdout {
        for result in &results {
            for d in &result.diagnostics {
                eprintln!("{}", d);
            }
        }
    } else {
        output_results(&results, format, &written);
    }

    let blocked = results
        .iter()
        .any(|r| r.has_fatal() || (options.strict_mode && r.has_warnings()));
    Ok(if blocked { 1 } else { 0 })
}

fn handle_check(path: &Path, format: &OutputFormat, fail_on: &FailOnSeverity) -> anyhow::Result<i32> {
    let paths = if path.is_dir() {
        ansisym::discover_part_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut results = Vec::new();
    for file in paths {
        let mut sink = ansisym::Diagnostics::new();
        let part = AnsisymCore::load_part(&file, &mut sink)
            .with_context(|| format!("failed to load {}", file.display()))?;
        part.validate(&mut sink);
        results.push(GenerationResult {
            file: Some(file),
            symbols: Vec::new(),
            stats: sink.counts(),
            diagnostics: sink.into_entries(),
        });
    }
    output_results(&results, format, &[]);

    let failed = results.iter().any(|r| match fail_on {
        FailOnSeverity::Fatal => r.has_fatal(),
        FailOnSeverity::Warning => r.has_fatal() || r.has_warnings(),
    });
    Ok(if failed { 1 } else { 0 })
}

fn file_label(result: &GenerationResult) -> String {
    result
        .file
        .as_ref()
        .map_or_else(|| "<input>".to_string(), |f| f.display().to_string())
}

fn output_results(results: &[GenerationResult], format: &OutputFormat, written: &[PathBuf]) {
    match format {
        OutputFormat::Human => output_human(results, written),
        OutputFormat::Json => output_json(results, written),
        OutputFormat::Github => output_github(results),
    }
}

fn output_human(results: &[GenerationResult], written: &[PathBuf]) {
    for result in results {
        println!("\nFile: {}", file_label(result));
        println!("{}", "─".repeat(60));

        if result.total_diagnostics() == 0 {
            println!("  No problems found");
        }
        for severity in [Severity::Panic, Severity::Fatal, Severity::Warning, Severity::Info] {
            let matching: Vec<&Diagnostic> = result
                .diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .collect();
            if matching.is_empty() {
                continue;
            }
            println!("\n  {}:", severity);
            for d in matching {
                println!("    - {}", d.message);
                match (&d.block, d.line) {
                    (Some(block), Some(line)) => println!("      Block: {} (line {})", block, line),
                    (Some(block), None) => println!("      Block: {}", block),
                    (None, Some(line)) => println!("      Line: {}", line),
                    (None, None) => {}
                }
            }
        }

        if !result.symbols.is_empty() {
            println!("\n  Symbols:");
            for symbol in &result.symbols {
                println!("    {} ({})", symbol.file_name(), symbol.package);
            }
        }

        println!("\n  Summary:");
        println!("    Fatal:    {}", result.stats.fatal + result.stats.panic);
        println!("    Warning:  {}", result.stats.warning);
        println!("    Info:     {}", result.stats.info);
    }
    if !written.is_empty() {
        println!("\nWrote {} file(s)", written.len());
    }
}

fn output_json(results: &[GenerationResult], written: &[PathBuf]) {
    let output = serde_json::json!({
        "results": results.iter().map(|r| {
            serde_json::json!({
                "file": file_label(r),
                "symbols": r.symbols.iter().map(|s| s.file_name()).collect::<Vec<_>>(),
                "diagnostics": r.diagnostics,
                "stats": r.stats,
            })
        }).collect::<Vec<_>>(),
        "written": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "total_symbols": results.iter().map(|r| r.symbols.len()).sum::<usize>(),
            "total_diagnostics": results.iter().map(|r| r.total_diagnostics()).sum::<usize>(),
            "fatal": results.iter().map(|r| r.stats.fatal + r.stats.panic).sum::<usize>(),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn severity_to_github(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic.severity {
        Severity::Panic | Severity::Fatal => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

fn output_github(results: &[GenerationResult]) {
    for result in results {
        for d in &result.diagnostics {
            let location = match d.line {
                Some(line) => format!("file={},line={}", file_label(result), line),
                None => format!("file={}", file_label(result)),
            };
            println!(
                "::{} {}::{}",
                severity_to_github(d),
                location,
                d.message.replace('\n', " ")
            );
        }
    }
}

fn handle_directives(long: bool) {
    println!("Available directives:\n");

    for directive in Directive::ALL {
        println!("  {} (default: {})", directive.name(), directive.default_value());
        println!("    {}", directive.description());
        if long {
            println!("    Value: {}", directive.kind().describe());
            if let Some(range) = directive.range() {
                println!("    Range: {} to {}", range.start(), range.end());
            }
        }
        println!();
    }
}

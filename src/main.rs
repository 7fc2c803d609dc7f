use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use cdgraph::config::{validate_output_name, ExtractorConfig, FailurePolicy, MergePolicy};
use cdgraph::core::{Extractor, FileFailure, GraphBuilder};
use cdgraph::formatters::{
    DotFormatter, GraphFormatter, GraphvizRenderer, ImageFormat, JsonCompactFormatter,
};
use cdgraph::{logging, CdgError};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "cdgraph",
    version,
    about = "Component dependency graph generator for Python codebases"
)]
struct Cli {
    /// Directory containing the source tree to analyze
    #[arg(
        short,
        long,
        value_name = "PATH",
        default_value = "repo",
        env = "CDGRAPH_INPUT"
    )]
    input: PathBuf,

    /// Directory the graph is written to
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        default_value = "output",
        env = "CDGRAPH_OUTPUT_DIR"
    )]
    output_dir: PathBuf,

    /// Output base name without extension; prompted for when omitted
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Comma-separated source file extensions
    #[arg(
        short,
        long,
        value_name = "EXTS",
        value_delimiter = ',',
        default_value = "py"
    )]
    extensions: Vec<String>,

    /// Abort on the first file that cannot be read or parsed
    #[arg(long)]
    fail_fast: bool,

    /// Fail when a qualified name is declared more than once
    #[arg(long)]
    strict_names: bool,

    /// Graphviz executable used for image formats
    #[arg(long, value_name = "PATH", default_value = "dot", env = "CDGRAPH_DOT")]
    dot_binary: String,

    /// Also write the dependency index as <NAME>.index.json
    #[arg(long)]
    emit_index: bool,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Png,
    Svg,
    Pdf,
    Dot,
    Json,
}

impl OutputFormat {
    fn formatter(self, dot_binary: &str) -> Box<dyn GraphFormatter> {
        let image = |format: ImageFormat| -> Box<dyn GraphFormatter> {
            Box::new(GraphvizRenderer::new(format).with_binary(dot_binary))
        };
        match self {
            OutputFormat::Png => image(ImageFormat::Png),
            OutputFormat::Svg => image(ImageFormat::Svg),
            OutputFormat::Pdf => image(ImageFormat::Pdf),
            OutputFormat::Dot => Box::new(DotFormatter::new()),
            OutputFormat::Json => Box::new(JsonCompactFormatter::new().with_labels()),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("An error occurred: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CdgError>())
        .map(CdgError::exit_code)
        .unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        output_dir,
        name,
        format,
        extensions,
        fail_fast,
        strict_names,
        dot_binary,
        emit_index,
        verbose: _,
    } = cli;

    println!("Welcome to the Component Dependency Graph Generator!");

    if !input.is_dir() {
        return Err(CdgError::InputNotFound(input).into());
    }

    let name = match name {
        Some(name) => name,
        None => prompt_for_name()?,
    };
    let name = validate_output_name(&name)?;

    let formatter = format.formatter(&dot_binary);
    let output_path = output_dir.join(format!("{name}.{}", formatter.extension()));

    let config = ExtractorConfig::new()
        .with_extensions(extensions)
        .with_failure_policy(if fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::SkipAndContinue
        })
        .with_merge_policy(if strict_names {
            MergePolicy::Reject
        } else {
            MergePolicy::Overwrite
        });

    println!("Parsing Python files in the folder '{}'...", input.display());
    let start_time = Instant::now();

    let mut extractor = Extractor::new(config)?;
    let extraction = extractor.extract(&input)?;
    let index = &extraction.index;

    println!(
        "Dependencies extracted successfully! {} files, {} classes, {} methods, {} functions in {:.2}s",
        index.files.len(),
        index.classes.len(),
        index.method_count(),
        index.functions.len(),
        start_time.elapsed().as_secs_f64()
    );
    report_failures(&extraction.failures, extraction.files_scanned);

    let graph = GraphBuilder::from_index(index);
    println!(
        "Built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    formatter.format_to_file(&graph, &output_path)?;
    println!(
        "Component Dependency Graph saved to '{}'",
        output_path.display()
    );

    if emit_index {
        let index_path = output_dir.join(format!("{name}.index.json"));
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        fs::write(&index_path, index.to_json()?)
            .with_context(|| format!("Failed to write {}", index_path.display()))?;
        println!("Dependency index saved to '{}'", index_path.display());
    }

    Ok(())
}

fn prompt_for_name() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(CdgError::InvalidName(
            String::new(),
            "no --name given and stdin is not a terminal",
        )
        .into());
    }

    dialoguer::Input::<String>::new()
        .with_prompt("Enter the output graph name (without extension, e.g., cdg_project)")
        .interact_text()
        .context("Failed to read the output graph name")
}

fn report_failures(failures: &[FileFailure], files_scanned: usize) {
    if failures.is_empty() {
        return;
    }
    println!(
        "Skipped {} of {} files that could not be parsed:",
        failures.len(),
        files_scanned
    );
    for failure in failures {
        println!("  {}: {}", failure.path.display(), failure.reason);
    }
}

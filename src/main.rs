//! sitedigest is a CLI tool that analyses the output of a website crawl and
//! summarises what the site is about.
//!
//! The tool has two main commands:
//! 1. `analyze` - Classifies pages, extracts contacts and key figures, prints a report
//!    and/or saves it as JSON
//! 2. `digest` - Writes one contact-preserving summary of every crawled page

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, info, warn};

use sitedigest::{
    OutputFormat, WebsiteType,
    analyze::WebsiteAnalyzer,
    backend::LlmBackend,
    config::Settings,
    digest::build_digest,
    loader::{LoadedCrawl, load_file},
    report::{render, render_digest, save_analysis},
    summarize::{SummaryGenerator, SummaryOptions},
};

/// A CLI tool to analyse and summarise crawled website data
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute (analyze or digest)
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 1)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a crawl file and report page types, contacts and a summary
    Analyze {
        /// Path to the JSON crawl file
        crawl_file: PathBuf,
        /// Type of website: restaurant, ecommerce, corporate, portfolio or generic
        #[arg(default_value = "generic")]
        website_type: WebsiteType,
        /// Output file for the JSON analysis
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Output format: "text" (default), "json" or "both"
        #[arg(long, default_value = "text")]
        format: OutputFormat,
        /// Disable AI summarization (faster, simpler summaries)
        #[arg(long)]
        no_ai: bool,
        /// URL of the LLM model used for summaries, e.g. ollama://llama3
        #[arg(long, short)]
        model: Option<String>,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
        /// Path to a YAML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Summarise every page of a crawl into one digest keeping all contacts
    Digest {
        /// Path to the JSON crawl file
        crawl_file: PathBuf,
        /// URL of the LLM model used for the summary, e.g. openai://gpt-4o-mini
        #[arg(long, short)]
        model: Option<String>,
        /// Path to the file with a prompt template
        #[arg(long, short = 'p')]
        prompt_file: Option<String>,
        /// Path to a YAML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// Path to output file to write the digest to
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Analyze {
            crawl_file,
            website_type,
            output,
            format,
            no_ai,
            model,
            prompt_file,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            let model = if no_ai { None } else { model };
            let generator = build_generator(
                model.as_deref(),
                prompt_file,
                settings.analysis_summary_options(),
            )?;
            handle_analyze_command(
                &crawl_file,
                website_type,
                output,
                format,
                &settings,
                &generator,
            )
            .await
        }
        Command::Digest {
            crawl_file,
            model,
            prompt_file,
            config,
            output,
        } => {
            let settings = Settings::load(config.as_deref())?;
            let generator = build_generator(
                model.as_deref(),
                prompt_file,
                settings.digest_summary_options(),
            )?;
            handle_digest_command(&crawl_file, output, &settings, &generator).await
        }
    }
}

async fn handle_analyze_command(
    crawl_file: &Path,
    website_type: WebsiteType,
    output: Option<PathBuf>,
    format: OutputFormat,
    settings: &Settings,
    generator: &SummaryGenerator,
) -> Result<()> {
    info!(
        "Analyzing {} as {} website, AI summarization {}",
        crawl_file.display(),
        website_type.as_str(),
        if generator.has_backend() { "enabled" } else { "disabled" }
    );

    let crawl = load_crawl(crawl_file, settings)?;
    let analyzer =
        WebsiteAnalyzer::new(settings, generator).with_website_type(website_type.as_str());
    let analysis = analyzer
        .analyze(&crawl.pages)
        .await
        .context("No pages found to analyze")?;

    if format.includes_text() {
        println!("{}", render(&analysis));
    }

    if format.includes_json() || output.is_some() {
        let output_file = output.unwrap_or_else(|| default_output_path(crawl_file));
        save_analysis(&analysis, &output_file)?;
        if format == OutputFormat::Json {
            println!("Analysis saved to: {}", output_file.display());
        }
    }

    Ok(())
}

async fn handle_digest_command(
    crawl_file: &Path,
    output: Option<PathBuf>,
    settings: &Settings,
    generator: &SummaryGenerator,
) -> Result<()> {
    let crawl = load_crawl(crawl_file, settings)?;
    let digest = build_digest(&crawl.pages, generator).await?;
    let rendered = render_digest(&digest);

    match output {
        Some(output_file) => {
            fs::write(&output_file, &rendered).context(format!(
                "Failed to write digest to {}",
                output_file.display()
            ))?;
            info!("Digest saved to {}", output_file.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn load_crawl(crawl_file: &Path, settings: &Settings) -> Result<LoadedCrawl> {
    if !crawl_file.exists() {
        bail!("Crawl file not found: {}", crawl_file.display());
    }

    let crawl = load_file(crawl_file, &settings.rules())?;
    if crawl.skipped_lines > 0 {
        warn!("Skipped {} malformed lines", crawl.skipped_lines);
    }
    if crawl.pages.is_empty() {
        bail!("No pages found to analyze in {}", crawl_file.display());
    }

    Ok(crawl)
}

fn build_generator(
    model: Option<&str>,
    prompt_file: Option<String>,
    options: SummaryOptions,
) -> Result<SummaryGenerator> {
    let Some(model) = model else {
        return Ok(SummaryGenerator::extractive(options));
    };

    let prompt_template = match prompt_file {
        Some(file) => {
            let content =
                fs::read_to_string(&file).context(format!("Failed to read prompt file: {file}"))?;
            Some(content)
        }
        None => None,
    };

    Ok(match LlmBackend::from_model_url(model, prompt_template) {
        Ok(backend) => SummaryGenerator::with_backend(Box::new(backend), options),
        Err(err) => {
            warn!("{err}, falling back to extractive summaries");
            SummaryGenerator::extractive(options)
        }
    })
}

fn default_output_path(crawl_file: &Path) -> PathBuf {
    let stem = crawl_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "crawl".to_owned());
    PathBuf::from(format!("{stem}_analysis.json"))
}

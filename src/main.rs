use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use wikiclean::batch::{self, RenderCounts};
use wikiclean::cleaner::{self, render, RawContent};
use wikiclean::source;
use wikiclean::Settings;

#[derive(Parser)]
#[command(name = "wikiclean", about = "Clean and structure Wikipedia article content")]
struct Cli {
    /// Settings file (toml, yaml or json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip tags and decode entities
    Strip {
        /// Input file (default: stdin)
        file: Option<PathBuf>,
    },
    /// Remove wiki artifacts and repair line breaks
    Clean {
        file: Option<PathBuf>,
        /// Join everything into one paragraph
        #[arg(long)]
        flatten: bool,
        #[arg(long)]
        no_line_breaks: bool,
        #[arg(long)]
        no_dates: bool,
        #[arg(long)]
        no_organizations: bool,
        #[arg(long)]
        no_numbers: bool,
        #[arg(long)]
        no_extra_spaces: bool,
    },
    /// Run the full pipeline and print paragraphs separated by blank lines
    Paragraphs {
        file: Option<PathBuf>,
        /// Locale for topic-shift cues (default: from settings)
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// Decide between html and text rendering and print the result as JSON
    Render {
        file: Option<PathBuf>,
        #[arg(short, long)]
        locale: Option<String>,
        /// Print display-ready HTML instead of JSON
        #[arg(long)]
        html: bool,
    },
    /// Convert markup to markdown-style text
    Markdown { file: Option<PathBuf> },
    /// Shorten text at a sentence or word boundary
    Truncate {
        file: Option<PathBuf>,
        /// Max characters
        #[arg(short = 'n', long)]
        max: usize,
    },
    /// Render a JSON-lines file of records ({"key", "body", "locale"})
    Batch {
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    info!(settings_loaded = ?settings, msg = "starting wikiclean");

    match cli.command {
        Commands::Strip { file } => {
            let input = read(file.as_deref())?;
            println!("{}", cleaner::strip_tags(&input));
        }
        Commands::Clean {
            file,
            flatten,
            no_line_breaks,
            no_dates,
            no_organizations,
            no_numbers,
            no_extra_spaces,
        } => {
            let input = read(file.as_deref())?;
            let mut options = settings.cleaning;
            options.fix_line_breaks &= !no_line_breaks;
            options.fix_dates &= !no_dates;
            options.fix_organizations &= !no_organizations;
            options.fix_numbers &= !no_numbers;
            options.remove_extra_spaces &= !no_extra_spaces;
            if flatten {
                options = options.flattened();
            }
            println!("{}", cleaner::extract_clean_text_with(&input, &options));
        }
        Commands::Paragraphs { file, locale } => {
            let content = content(file.as_deref(), locale, &settings)?;
            let structurer = settings.structurer_for(&content.locale);
            let paragraphs = cleaner::process_content_with(&content, &structurer);
            println!("{}", cleaner::join_paragraphs(&paragraphs));
        }
        Commands::Render { file, locale, html } => {
            let content = content(file.as_deref(), locale, &settings)?;
            let structurer = settings.structurer_for(&content.locale);
            let rendered = render::select_render_mode_with(&content, &structurer);
            if html {
                println!("{}", rendered.to_html());
            } else {
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            }
        }
        Commands::Markdown { file } => {
            let input = read(file.as_deref())?;
            println!("{}", cleaner::html_to_markdown(&input));
        }
        Commands::Truncate { file, max } => {
            let input = read(file.as_deref())?;
            println!("{}", cleaner::smart_truncate(input.trim(), max));
        }
        Commands::Batch { input, output } => {
            let records = source::read_records_file(&input, &settings.default_locale)?;
            if records.is_empty() {
                println!("No records in {}.", input.display());
                return Ok(());
            }
            info!(records = records.len(), input = %input.display(), "rendering batch");

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(std::io::BufWriter::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                )),
                None => Box::new(std::io::stdout().lock()),
            };
            let counts = render_records(&records, &settings, &mut writer)?;
            drop(writer);
            info!(
                total = counts.total(),
                html = counts.html,
                text = counts.text,
                paragraphs = counts.paragraphs,
                "batch finished"
            );
            if let Some(path) = output {
                eprintln!(
                    "Rendered {} records ({} html, {} text) to {}",
                    counts.total(),
                    counts.html,
                    counts.text,
                    path.display()
                );
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn read(file: Option<&Path>) -> anyhow::Result<String> {
    Ok(source::read_text(file)?)
}

fn content(
    file: Option<&Path>,
    locale: Option<String>,
    settings: &Settings,
) -> anyhow::Result<RawContent> {
    let body = read(file)?;
    let locale = locale.unwrap_or_else(|| settings.default_locale.clone());
    let mut content = RawContent::new(body, locale);
    if let Some(stem) = file.and_then(Path::file_stem) {
        content = content.with_key(stem.to_string_lossy());
    }
    Ok(content)
}

fn render_records(
    records: &[RawContent],
    settings: &Settings,
    writer: &mut dyn Write,
) -> anyhow::Result<RenderCounts> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = RenderCounts::default();
    for chunk in records.chunks(500) {
        let rendered = batch::render_all(chunk, settings);
        rendered.iter().for_each(|r| counts.add(r));
        batch::write_records(&mut *writer, &rendered)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

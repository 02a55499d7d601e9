//! CLI binary for pdf-quarry.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SearchConfig`, reads files, and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_quarry::{
    locate_matches, render_page, scan_document, DecodeSession, DocumentEngine, PdfiumEngine,
    SearchConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pdfquarry",
    version,
    about = "Full-text PDF search with pixel-space highlight boxes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit JSON instead of human-readable output.
    #[arg(long, global = true)]
    json: bool,

    /// Render/overlay resolution in DPI (rect scale = DPI / 72).
    #[arg(long, global = true, default_value_t = 180)]
    dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, global = true, env = "PDFQUARRY_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Search every page of a document for a query.
    Search {
        /// Path to the PDF file.
        file: PathBuf,
        /// Literal text to search for (case-insensitive).
        query: String,
        /// Worker-pool size; 0 = one worker per logical core.
        #[arg(long, default_value_t = 0)]
        parallelism: usize,
    },
    /// Print highlight rectangles for one page's matches.
    Boxes {
        /// Path to the PDF file.
        file: PathBuf,
        /// Literal text to search for (case-insensitive).
        query: String,
        /// 1-based page number.
        #[arg(long)]
        page: u32,
    },
    /// Render one page to a PNG at the configured DPI.
    Render {
        /// Path to the PDF file.
        file: PathBuf,
        /// 1-based page number.
        #[arg(long)]
        page: u32,
        /// Output path; defaults to page-<N>.png next to the input.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the document's page count.
    Info {
        /// Path to the PDF file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = SearchConfig::builder().dpi(cli.dpi);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }

    match cli.command {
        Command::Search {
            file,
            query,
            parallelism,
        } => {
            let config = builder.parallelism(parallelism).build()?;
            let bytes = read_bytes(&file)?;
            let engine = Arc::new(engine_for(&cli.password));
            let result =
                scan_document(engine, bytes, &display_name(&file), &query, &config).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{} {}",
                    green("✓"),
                    bold(&format!(
                        "{}/{} pages match \"{}\" in {}",
                        result.matched_pages, result.total_pages, result.query, result.source
                    ))
                );
                println!(
                    "{}",
                    dim(&format!(
                        "  {} workers, {} ms load, {} ms scan",
                        result.parallelism, result.load_ms, result.scan_ms
                    ))
                );
                for hit in &result.pages {
                    println!(
                        "  page {:>4}  {:>3} occurrence(s)",
                        hit.page_number, hit.occurrences
                    );
                }
            }
        }

        Command::Boxes { file, query, page } => {
            let config = builder.build()?;
            let bytes = read_bytes(&file)?;
            let engine = Arc::new(engine_for(&cli.password));
            let rects = locate_matches(engine, bytes, &query, page, &config).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rects)?);
            } else if rects.is_empty() {
                println!("no matches on page {page}");
            } else {
                println!(
                    "{} {}",
                    green("✓"),
                    bold(&format!("{} box(es) on page {page}", rects.len()))
                );
                for r in &rects {
                    println!(
                        "  x={:<8.1} y={:<8.1} w={:<8.1} h={:.1}",
                        r.x, r.y, r.w, r.h
                    );
                }
            }
        }

        Command::Render { file, page, out } => {
            let config = builder.build()?;
            let bytes = read_bytes(&file)?;
            let image = render_page(bytes, page, &config).await?;
            let out = out.unwrap_or_else(|| PathBuf::from(format!("page-{page}.png")));
            image
                .save(&out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "{} {}",
                green("✓"),
                bold(&format!(
                    "page {page} → {} ({}x{} px)",
                    out.display(),
                    image.width(),
                    image.height()
                ))
            );
        }

        Command::Info { file } => {
            let bytes = read_bytes(&file)?;
            let engine = engine_for(&cli.password);
            let session = engine.open(&bytes)?;
            let total = session.page_count();
            if cli.json {
                println!("{}", serde_json::json!({ "pages": total }));
            } else {
                println!("{total} page(s)");
            }
        }
    }

    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn engine_for(password: &Option<String>) -> PdfiumEngine {
    match password {
        Some(pwd) => PdfiumEngine::with_password(pwd.clone()),
        None => PdfiumEngine::new(),
    }
}

fn read_bytes(file: &Path) -> Result<Arc<[u8]>> {
    let bytes = std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    Ok(bytes.into())
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::Result;
use crate::config::Config;
use crate::embeddings::EmbeddingClient;
use crate::extractor::extract_pdf_pages;
use crate::index::SearchIndexClient;
use crate::pipeline::{IngestManifest, IngestPipeline, IngestStats};
use crate::processor::DocumentProcessor;

/// Print the resolved configuration
#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir)?;

    println!("Configuration ({})", config_dir.join("config.toml").display());
    println!();
    println!("Search:");
    println!("  Endpoint:     {}", config.search.endpoint);
    println!("  Index name:   {}", config.search.index_name);
    println!("  API version:  {}", config.search.api_version);
    println!(
        "  API key:      {}",
        if config.search.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        }
    );
    println!("Embeddings:");
    println!("  Endpoint:     {}", config.embeddings.endpoint);
    println!("  Model:        {}", config.embeddings.model);
    println!("  Batch size:   {}", config.embeddings.batch_size);
    match config.embeddings.dimension {
        Some(dimension) => println!("  Dimension:    {}", dimension),
        None => println!("  Dimension:    (by model)"),
    }
    println!("Chunking:");
    println!("  Max chunk size: {}", config.chunking.max_chunk_size);
    println!("  Overlap size:   {}", config.chunking.overlap_size);

    Ok(())
}

/// Chunk, embed, and upload every PDF in a directory
#[inline]
pub fn run_ingest(config_dir: &Path, data_dir: &Path, dry_run: bool) -> Result<()> {
    let config = Config::load(config_dir)?;

    let pdf_files = find_pdf_files(data_dir)?;
    if pdf_files.is_empty() {
        println!("No PDF files found in {}", data_dir.display());
        return Ok(());
    }

    println!("Found {} PDF file(s) in {}", pdf_files.len(), data_dir.display());
    for path in &pdf_files {
        println!("  - {}", file_name(path));
    }

    let processor = DocumentProcessor::new(config.chunking.clone())?;

    if dry_run {
        return report_chunks(&processor, &pdf_files);
    }

    let embedder = EmbeddingClient::new(&config.embeddings)?;
    let mut store = SearchIndexClient::new(&config.search)?;
    let mut pipeline = IngestPipeline::new(
        processor,
        &embedder,
        &mut store,
        config.embeddings.batch_size,
    );

    pipeline.prepare().context("Failed to prepare search index")?;

    let progress = ProgressBar::new(pdf_files.len() as u64);
    let mut sources = Vec::new();

    for path in &pdf_files {
        let source = file_name(path);
        progress.set_message(source.clone());

        let pages = match extract_pdf_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Skipping {}: {}", source, e);
                progress.inc(1);
                continue;
            }
        };

        let uploaded = pipeline.ingest_document(&source, &pages)?;
        info!("Stored {} chunk(s) from {}", uploaded, source);
        sources.push(source);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let stats = pipeline.into_stats();
    let manifest = IngestManifest::new(config.search.index_name.clone(), stats.uploaded, sources);
    let manifest_path = data_dir.join("ingest-manifest.json");
    manifest
        .write_to(&manifest_path)
        .context("Failed to write ingest manifest")?;

    print_summary(&stats);
    println!("Manifest written to {}", manifest_path.display());

    Ok(())
}

/// Dry run: chunk everything, upload nothing.
fn report_chunks(processor: &DocumentProcessor, pdf_files: &[PathBuf]) -> Result<()> {
    let mut total_pages = 0;
    let mut total_chunks = 0;

    for path in pdf_files {
        let source = file_name(path);
        let pages = match extract_pdf_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Skipping {}: {}", source, e);
                continue;
            }
        };

        let chunks = processor.process(&source, &pages);
        println!("{}: {} page(s), {} chunk(s)", source, pages.len(), chunks.len());
        total_pages += pages.len();
        total_chunks += chunks.len();
    }

    println!();
    println!(
        "{} {} page(s), {} chunk(s) across {} file(s)",
        style("Dry run:").bold(),
        total_pages,
        total_chunks,
        pdf_files.len()
    );
    Ok(())
}

fn print_summary(stats: &IngestStats) {
    println!("{}", style("Ingest complete").green().bold());
    println!("  Documents: {}", stats.documents);
    println!("  Pages:     {}", stats.pages);
    println!("  Chunks:    {}", stats.chunks);
    println!("  Uploaded:  {}", stats.uploaded);
    if stats.failed > 0 {
        println!("  {}", style(format!("Failed:    {}", stats.failed)).red());
    }
}

fn find_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

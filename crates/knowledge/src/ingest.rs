//! Ingestion batches.
//!
//! A batch resets the knowledge base, parses documents strictly one after
//! another and builds the lexical index exactly once at the end.

use crate::extract::{DocumentFormat, Extractor};
use crate::outline::{OutlineParser, ParseSummary};
use crate::store::KnowledgeBase;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Statistics of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStats {
    /// Documents parsed
    pub documents: usize,

    /// Nodes in the knowledge base
    pub nodes: usize,

    /// Chunks in the knowledge base
    pub chunks: usize,

    /// Duration in seconds
    pub duration_secs: f64,

    /// When the index was built
    pub finished_at: DateTime<Utc>,
}

/// An open ingestion batch.
///
/// Holds the knowledge base mutably until [`finish`](Self::finish) builds the
/// index. Dropping an unfinished batch leaves the store without an index.
#[derive(Debug)]
pub struct IngestBatch<'a> {
    kb: &'a mut KnowledgeBase,
    parser: &'a OutlineParser,
    documents: usize,
    started: Instant,
}

impl<'a> IngestBatch<'a> {
    pub(crate) fn new(kb: &'a mut KnowledgeBase, parser: &'a OutlineParser) -> Self {
        tracing::debug!("Starting ingestion batch");
        Self {
            kb,
            parser,
            documents: 0,
            started: Instant::now(),
        }
    }

    /// Parse one document's extracted text into the store.
    pub fn add_document(&mut self, source: &str, text: &str) -> ParseSummary {
        self.documents += 1;
        self.parser.parse(text, source, self.kb)
    }

    /// Build the index and close the batch.
    pub fn finish(self) -> BatchStats {
        self.kb.build_index();

        let stats = BatchStats {
            documents: self.documents,
            nodes: self.kb.nodes().len(),
            chunks: self.kb.chunks().len(),
            duration_secs: self.started.elapsed().as_secs_f64(),
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Batch complete: {} documents, {} nodes, {} chunks in {:.2}s",
            stats.documents,
            stats.nodes,
            stats.chunks,
            stats.duration_secs
        );

        stats
    }
}

/// A file left out of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of ingesting a set of paths.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Files found after expanding directories
    pub files_seen: usize,

    /// Files whose text was parsed
    pub files_indexed: usize,

    /// Files skipped as unsupported or unreadable
    pub skipped: Vec<SkippedFile>,

    pub batch: BatchStats,
}

/// Expand directories into the files beneath them.
///
/// Files are returned as given; directory contents are walked recursively in
/// file-name order so batches are deterministic.
pub fn collect_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(
                WalkDir::new(path)
                    .follow_links(false)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path()),
            );
        } else {
            files.push(path.clone());
        }
    }

    files
}

/// Run one ingestion batch over `paths`.
///
/// Files are extracted and parsed sequentially. Unsupported or unreadable
/// files are logged and skipped; the index is built once all files are done.
pub async fn ingest_paths(
    kb: &mut KnowledgeBase,
    parser: &OutlineParser,
    extractor: &dyn Extractor,
    paths: &[PathBuf],
) -> IngestReport {
    let files = collect_paths(paths);
    tracing::info!(
        "Ingesting {} file(s) with the {} extractor",
        files.len(),
        extractor.name()
    );

    let mut batch = kb.begin_batch(parser);
    let mut skipped = Vec::new();
    let mut files_indexed = 0;

    for path in &files {
        let format = DocumentFormat::from_path(path);
        if !extractor.supports(format) {
            tracing::warn!("Skipping unsupported file {:?} ({})", path, format.as_str());
            skipped.push(SkippedFile {
                path: path.clone(),
                reason: format!("unsupported format: {}", format.as_str()),
            });
            continue;
        }

        tracing::debug!("Reading {:?}", path);
        match extractor.extract(path).await {
            Ok(text) => {
                batch.add_document(&source_name(path), &text);
                files_indexed += 1;
            }
            Err(e) => {
                if e.is_skippable() {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                } else {
                    tracing::error!("Ingest error for {:?}: {}", path, e);
                }
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let stats = batch.finish();

    IngestReport {
        files_seen: files.len(),
        files_indexed,
        skipped,
        batch: stats,
    }
}

/// Source name recorded on nodes: the file name, or the full path if it has none.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

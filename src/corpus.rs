//! Corpus construction and cosine retrieval.
//!
//! The corpus is built once at startup: the FAQ dataset is read from JSON,
//! each entry is formatted into a chunk, and all chunks are embedded in one
//! batched call. Any failure aborts startup — a partial corpus is never
//! served. After build the corpus is immutable and shared read-only across
//! request handlers.
//!
//! Retrieval is a brute-force cosine similarity scan over every entry.
//! There is no index and no pruning; this is acceptable only because the
//! corpus is small and static.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::embedding::{self, cosine_similarity};
use crate::models::{CorpusEntry, FaqEntry, ScoredChunk};

/// Immutable collection of chunk/embedding pairs.
#[derive(Debug)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    dims: usize,
}

impl Corpus {
    /// Validate entries and fix the corpus dimensionality.
    ///
    /// # Errors
    ///
    /// Fails on an empty entry list, zero-length vectors, or entries with
    /// inconsistent dimensionality.
    pub fn new(entries: Vec<CorpusEntry>) -> Result<Self> {
        let first = entries
            .first()
            .ok_or_else(|| anyhow::anyhow!("Corpus is empty: dataset contains no entries"))?;

        let dims = first.embedding.len();
        if dims == 0 {
            bail!("Corpus embeddings have zero dimensions");
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.embedding.len() != dims {
                bail!(
                    "Corpus entry {} has {} dimensions, expected {}",
                    i,
                    entry.embedding.len(),
                    dims
                );
            }
        }

        Ok(Self { entries, dims })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensionality shared by every entry.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Score every entry against the query vector and return the `top_n`
    /// best matches, sorted by descending similarity.
    ///
    /// Ties keep dataset insertion order (the sort is stable). Returns
    /// fewer than `top_n` chunks when the corpus is smaller.
    ///
    /// # Errors
    ///
    /// Fails if the query vector's dimensionality does not match the
    /// corpus.
    pub fn retrieve(&self, query_vec: &[f32], top_n: usize) -> Result<Vec<ScoredChunk>> {
        if query_vec.len() != self.dims {
            bail!(
                "Query embedding has {} dimensions, corpus has {}",
                query_vec.len(),
                self.dims
            );
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.text.clone(),
                score: cosine_similarity(query_vec, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_n);

        Ok(scored)
    }
}

/// Format one FAQ entry as a corpus chunk.
pub fn format_chunk(entry: &FaqEntry) -> String {
    format!("q: {}\na: {}", entry.question, entry.answer)
}

/// Load the FAQ dataset from a JSON file (array of question/answer objects).
pub fn load_dataset(path: &Path) -> Result<Vec<FaqEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    let entries: Vec<FaqEntry> =
        serde_json::from_str(&content).with_context(|| "Failed to parse dataset JSON")?;

    Ok(entries)
}

/// Build the corpus: load the dataset, format chunks, embed them all in one
/// batch, and validate the result.
pub async fn build_corpus(config: &Config) -> Result<Corpus> {
    let dataset = load_dataset(&config.dataset.path)?;
    if dataset.is_empty() {
        bail!(
            "Dataset {} contains no entries",
            config.dataset.path.display()
        );
    }

    let chunks: Vec<String> = dataset.iter().map(format_chunk).collect();

    println!(
        "Embedding {} chunks with model {}...",
        chunks.len(),
        config.ollama.embedding_model
    );

    let vectors = embedding::embed_texts(&config.ollama, &chunks).await?;

    let entries: Vec<CorpusEntry> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(text, embedding)| CorpusEntry { text, embedding })
        .collect();

    let corpus = Corpus::new(entries)?;
    println!(
        "Corpus ready: {} entries, {} dims",
        corpus.len(),
        corpus.dims()
    );

    Ok(corpus)
}

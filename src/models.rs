//! Core data types used throughout FAQ Harness.
//!
//! These types represent the dataset records, corpus entries, and retrieval
//! results that flow through the embed-and-retrieve pipeline.

use serde::Deserialize;

/// One question/answer record from the FAQ dataset JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A formatted text chunk paired with its embedding vector.
///
/// Created once during corpus build and never mutated afterward.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    /// Chunk text in `"q: <question>\na: <answer>"` form.
    pub text: String,
    /// Embedding vector; same dimensionality for every entry in a corpus.
    pub embedding: Vec<f32>,
}

/// A retrieval result: chunk text with its cosine similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    /// Cosine similarity against the query embedding, in `[-1.0, 1.0]`.
    pub score: f32,
}

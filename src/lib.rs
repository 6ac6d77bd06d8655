//! # FAQ Harness
//!
//! A retrieval-augmented FAQ chatbot service backed by Ollama.
//!
//! At startup the FAQ dataset is loaded from JSON, each entry is embedded,
//! and the resulting corpus is held immutably in memory. Incoming queries
//! are embedded, scored against every corpus entry by cosine similarity,
//! and the best-matching chunks are folded into a system prompt for the
//! chat model.
//!
//! ## Quick Start
//!
//! ```bash
//! faqbot serve api          # build the corpus, start the chat API
//! faqbot serve frontend     # serve the static frontend
//! faqbot ask "When is Bitcamp?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`corpus`] | Dataset loading, corpus build, cosine retrieval |
//! | [`embedding`] | Ollama embedding client and similarity |
//! | [`chat`] | Ollama chat client |
//! | [`prompt`] | System prompt assembly |
//! | [`server`] | Chat API HTTP server |
//! | [`frontend`] | Static frontend file server |

pub mod ask;
pub mod chat;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod frontend;
pub mod models;
pub mod prompt;
pub mod server;

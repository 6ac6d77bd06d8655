//! One-shot `ask` command.
//!
//! Runs the full pipeline once from the terminal: build the corpus, embed
//! the query, retrieve the best-matching chunks, and print the chat
//! model's reply.

use anyhow::Result;

use crate::chat::{self, ChatMessage};
use crate::config::Config;
use crate::corpus;
use crate::embedding;
use crate::prompt;

pub async fn run_ask(config: &Config, query: &str, top_n: Option<usize>) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let corpus = corpus::build_corpus(config).await?;
    let top_n = top_n.unwrap_or(config.retrieval.top_n);

    let query_vec = embedding::embed_query(&config.ollama, query).await?;
    let retrieved = corpus.retrieve(&query_vec, top_n)?;

    println!("Retrieved {} chunks:", retrieved.len());
    for chunk in &retrieved {
        let first_line = chunk.text.lines().next().unwrap_or("");
        println!("  [{:.4}] {}", chunk.score, first_line);
    }
    println!();

    let system_prompt = prompt::build_system_prompt(&retrieved);
    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(query),
    ];

    let reply = chat::chat(&config.ollama, &messages).await?;
    println!("{}", reply);

    Ok(())
}

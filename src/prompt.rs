//! System prompt assembly.
//!
//! Builds the instruction string handed to the chat model: the retrieved
//! chunks are joined into an Information block, and the model is told to
//! answer only from that block, falling back to [`FALLBACK_REPLY`] verbatim
//! when the answer is not present. The fallback is a contract with the
//! model, not enforced programmatically.

use crate::models::ScoredChunk;

/// Exact text the model must return when the answer is not in the
/// Information block.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm not sure how to help you with this. Please contact hello@bit.camp for more details.";

/// Join retrieved chunk texts into an Information block, separated by
/// blank lines, preserving retrieval order.
pub fn info_block(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the full system prompt around the retrieved chunks.
pub fn build_system_prompt(chunks: &[ScoredChunk]) -> String {
    format!(
        "You are an FAQ helper.\n\
         Use ONLY the information in the 'Information' section below to answer the user's question.\n\
         Do NOT invent or assume anything not present in that section.\n\
         Feel free to engage in greeting and returning common sayings with the user, but DO NOT answer technical questions without the Information provided.\n\
         Give the user a WARNING if the message appears to be offensive in any way.\n\
         ABOVE ALL: MAINTAIN FULL PROFESSIONALISM.\n\
         If the answer to the user's question is not explicitly contained in the Information, reply EXACTLY with the following text (and nothing else):\n\
         {}\n\
         \n\
         Information:\n\
         {}\n",
        FALLBACK_REPLY,
        info_block(chunks)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_prompt_contains_fallback() {
        let prompt = build_system_prompt(&[chunk("q: a\na: b")]);
        assert!(prompt.contains(FALLBACK_REPLY));
    }

    #[test]
    fn test_chunks_joined_with_blank_line() {
        let chunks = vec![chunk("first chunk"), chunk("second chunk")];
        let block = info_block(&chunks);
        assert_eq!(block, "first chunk\n\nsecond chunk");

        let prompt = build_system_prompt(&chunks);
        assert!(prompt.contains("first chunk\n\nsecond chunk"));
    }

    #[test]
    fn test_chunk_order_preserved() {
        let chunks = vec![chunk("alpha"), chunk("beta"), chunk("gamma")];
        let block = info_block(&chunks);
        let a = block.find("alpha").unwrap();
        let b = block.find("beta").unwrap();
        let g = block.find("gamma").unwrap();
        assert!(a < b && b < g);
    }

    #[test]
    fn test_empty_chunks_still_valid_prompt() {
        let prompt = build_system_prompt(&[]);
        assert!(prompt.contains("Information:"));
        assert!(prompt.contains(FALLBACK_REPLY));
    }
}

// Matching engine: summarize → embed → score → explain, with keyword fallback.
// All embedding calls go through the `Embedder` trait; nothing here talks HTTP directly.

pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod reasons;
pub mod similarity;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

use crate::embedding_client::EmbeddingError;

pub use orchestrator::Matcher;

/// Why an AI scoring pass was abandoned. Always recovered by the fallback matcher.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Embedding service error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("No embedding returned for input {index}")]
    MissingEmbedding { index: usize },

    #[error("Could not encode job payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Highest score first. `sort_by` is stable, so equal scores keep input order.
pub(crate) fn sort_by_score_desc<T>(items: &mut [T], score: impl Fn(&T) -> u8) {
    items.sort_by(|a, b| score(b).cmp(&score(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keeps_ties_in_input_order() {
        let mut items = vec![("first", 80), ("third", 60), ("second", 80)];
        sort_by_score_desc(&mut items, |(_, s)| *s);
        assert_eq!(
            items.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
    }
}

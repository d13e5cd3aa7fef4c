//! In-process embedders for driving the orchestrators without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embedding_client::{Embedder, EmbeddingError, EmbeddingVector};

type EmbedFn = Box<dyn Fn(&str) -> EmbeddingVector + Send + Sync>;

/// Embeds each text with a caller-supplied function and records every batch.
pub struct FnEmbedder {
    embed_fn: EmbedFn,
    batches: Mutex<Vec<Vec<String>>>,
}

impl FnEmbedder {
    pub fn new(embed_fn: impl Fn(&str) -> EmbeddingVector + Send + Sync + 'static) -> Self {
        Self {
            embed_fn: Box::new(embed_fn),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl Embedder for FnEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.batches.lock().unwrap().push(texts.to_vec());
        Ok(texts.iter().map(|t| (self.embed_fn)(t)).collect())
    }

    async fn probe(&self) -> bool {
        true
    }
}

/// Fails every call the way an unreachable inference endpoint would.
#[derive(Default)]
pub struct FailingEmbedder {
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmbeddingError::Api {
            status: 503,
            body: "Service Unavailable".to_string(),
        })
    }

    async fn probe(&self) -> bool {
        false
    }
}

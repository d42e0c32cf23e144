use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::PokemonDetails;

/// Append-only memo of detail records keyed by request URL.
///
/// Entries are never evicted or replaced. When two fetches for the same URL
/// race, the first insert wins and both callers get that record.
#[derive(Debug, Default)]
pub struct DetailsCache {
    entries: RwLock<HashMap<String, Arc<PokemonDetails>>>,
}

impl DetailsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, url: &str) -> Option<Arc<PokemonDetails>> {
        self.entries.read().await.get(url).cloned()
    }

    /// Store a record unless one is already present. Returns the stored record.
    pub async fn insert(&self, url: &str, details: PokemonDetails) -> Arc<PokemonDetails> {
        let mut entries = self.entries.write().await;
        entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(details))
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

//! The data-source seam used by the session layer.

use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::types::{PokemonDetails, PokemonSummary};

/// Anything that can produce the roster and per-record details.
///
/// [`PokeApiClient`](crate::PokeApiClient) is the production implementation;
/// tests substitute in-memory sources.
pub trait PokemonSource: Send + Sync {
    /// Fetch the full roster of `{name, url}` summaries.
    fn list_pokemon(&self)
        -> impl Future<Output = Result<Vec<PokemonSummary>, ApiError>> + Send;

    /// Fetch the detail record behind a summary URL.
    fn get_details(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Arc<PokemonDetails>, ApiError>> + Send;
}

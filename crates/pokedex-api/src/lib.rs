//! Client for the PokéAPI REST service.
//!
//! Fetches the roster and per-record details. Details are memoized per URL
//! for the lifetime of the client.

pub mod cache;
pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use cache::DetailsCache;
pub use client::PokeApiClient;
pub use error::ApiError;
pub use traits::PokemonSource;
pub use types::{PokemonDetails, PokemonSummary};

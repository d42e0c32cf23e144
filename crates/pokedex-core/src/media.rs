//! Audio cry lookup: candidate URL generation and sequential fallback probing.

pub mod candidates;
pub mod http;
pub mod probe;

pub use candidates::{generate_candidates, CandidateOptions, MediaCandidates};
pub use http::HttpMediaLoader;
pub use probe::{LoadOutcome, MediaHandle, MediaLoader, ProbeResult, Prober};

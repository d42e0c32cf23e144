pub mod view;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;

use pokedex_api::{ApiError, PokemonSource, PokemonSummary};
use pokedex_core::media::{
    generate_candidates, CandidateOptions, MediaCandidates, MediaLoader, Prober,
};

pub use view::{AudioSlot, DetailView};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("API error: {0}")]
    ListFetch(#[source] ApiError),
    #[error("detail fetch failed for {url}: {source}")]
    DetailFetch {
        url: String,
        #[source]
        source: ApiError,
    },
    #[error("roster is empty")]
    EmptyRoster,
    #[error("no roster entry at position {0}")]
    OutOfRange(usize),
    #[error("not found: {0}")]
    NotFound(String),
}

/// What the front end renders. Only the session writes to it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub roster: Vec<PokemonSummary>,
    /// Entry most recently navigated to.
    pub cursor: Option<usize>,
    /// Entry whose record is in `detail`.
    pub displayed: Option<usize>,
    pub detail: Option<DetailView>,
    pub audio: AudioSlot,
    /// Generation of the request that produced `detail`.
    pub generation: u64,
}

/// Hands the audio lookup for a displayed record to [`Session::resolve_audio`].
#[derive(Debug, Clone)]
pub struct AudioTicket {
    pub generation: u64,
    pub candidates: MediaCandidates,
}

#[derive(Debug, Clone)]
pub enum ShowOutcome {
    /// The record is on screen; its audio is still pending.
    Displayed(AudioTicket),
    /// A newer navigation request started before this one finished.
    Superseded,
}

/// Roster, cursor and detail view for one browsing session.
///
/// Every navigation request takes a new generation number. A result is only
/// applied while its generation is the latest one, so a slow response can
/// never overwrite a newer view.
pub struct Session<S, L> {
    source: S,
    prober: Prober<L>,
    candidate_options: CandidateOptions,
    state: RwLock<ViewState>,
    generation: AtomicU64,
}

impl<S: PokemonSource, L: MediaLoader> Session<S, L> {
    pub fn new(source: S, prober: Prober<L>, candidate_options: CandidateOptions) -> Self {
        Self {
            source,
            prober,
            candidate_options,
            state: RwLock::new(ViewState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn prober(&self) -> &Prober<L> {
        &self.prober
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    /// Fetch the roster. Returns the number of entries.
    pub async fn load_roster(&self) -> Result<usize, RuntimeError> {
        let roster = self
            .source
            .list_pokemon()
            .await
            .map_err(RuntimeError::ListFetch)?;

        let count = roster.len();
        let mut state = self.state.write().await;
        state.roster = roster;
        state.cursor = None;
        Ok(count)
    }

    /// Load the roster and show its first entry.
    ///
    /// Only a roster failure is an error; a failed first detail is logged.
    pub async fn start(&self) -> Result<Option<AudioTicket>, RuntimeError> {
        if self.load_roster().await? == 0 {
            return Ok(None);
        }
        match self.show(0).await {
            Ok(ShowOutcome::Displayed(ticket)) => Ok(Some(ticket)),
            Ok(ShowOutcome::Superseded) => Ok(None),
            Err(e) => {
                tracing::error!(error = %e, "failed to show default entry");
                Ok(None)
            }
        }
    }

    /// Move the cursor to `index` and display that record's details.
    ///
    /// On a fetch error the previous detail stays on screen and the cursor
    /// returns to it.
    pub async fn show(&self, index: usize) -> Result<ShowOutcome, RuntimeError> {
        let (generation, url) = {
            let mut state = self.state.write().await;
            if state.roster.is_empty() {
                return Err(RuntimeError::EmptyRoster);
            }
            let url = state
                .roster
                .get(index)
                .map(|entry| entry.url.clone())
                .ok_or(RuntimeError::OutOfRange(index))?;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.cursor = Some(index);
            (generation, url)
        };
        tracing::debug!(generation, index, url = url.as_str(), "showing entry");

        let details = match self.source.get_details(&url).await {
            Ok(details) => details,
            Err(source) if !self.is_current(generation) => {
                tracing::debug!(generation, error = %source, "superseded request failed");
                return Ok(ShowOutcome::Superseded);
            }
            Err(source) => {
                {
                    let mut state = self.state.write().await;
                    if self.is_current(generation) {
                        state.cursor = state.displayed;
                    }
                }
                let err = RuntimeError::DetailFetch { url, source };
                tracing::error!(generation, error = %err, "detail fetch failed");
                return Err(err);
            }
        };

        {
            let mut state = self.state.write().await;
            if !self.is_current(generation) {
                tracing::debug!(generation, "discarding superseded details");
                return Ok(ShowOutcome::Superseded);
            }
            state.displayed = Some(index);
            state.detail = Some(DetailView::from_details(&details));
            state.audio = AudioSlot::Pending;
            state.generation = generation;
        }

        let candidates = generate_candidates(details.id, &details.name, self.candidate_options);
        Ok(ShowOutcome::Displayed(AudioTicket {
            generation,
            candidates,
        }))
    }

    /// Probe the ticket's candidates and fill the audio slot.
    ///
    /// The ticket stays valid while its record is the one on screen, even if
    /// a later navigation failed. Returns `None` when another record has
    /// replaced it, in which case nothing is applied. Never fails: a missing
    /// cry is [`AudioSlot::Unavailable`].
    pub async fn resolve_audio(&self, ticket: AudioTicket) -> Option<AudioSlot> {
        if self.state.read().await.generation != ticket.generation {
            return None;
        }

        let slot = AudioSlot::from(self.prober.probe(ticket.candidates.as_slice()).await);

        let mut state = self.state.write().await;
        if state.generation != ticket.generation {
            tracing::debug!(generation = ticket.generation, "discarding superseded audio");
            return None;
        }
        state.audio = slot.clone();
        Some(slot)
    }

    /// `show` followed by `resolve_audio`.
    pub async fn show_with_audio(&self, index: usize) -> Result<ShowOutcome, RuntimeError> {
        let outcome = self.show(index).await?;
        if let ShowOutcome::Displayed(ticket) = &outcome {
            self.resolve_audio(ticket.clone()).await;
        }
        Ok(outcome)
    }

    /// Step forward. Stops at the last entry (returns `None`).
    pub async fn next(&self) -> Result<Option<ShowOutcome>, RuntimeError> {
        let target = {
            let state = self.state.read().await;
            if state.roster.is_empty() {
                return Err(RuntimeError::EmptyRoster);
            }
            match state.cursor {
                None => Some(0),
                Some(i) if i + 1 < state.roster.len() => Some(i + 1),
                Some(_) => None,
            }
        };
        match target {
            Some(index) => self.show(index).await.map(Some),
            None => Ok(None),
        }
    }

    /// Step back. Stops at the first entry (returns `None`).
    pub async fn previous(&self) -> Result<Option<ShowOutcome>, RuntimeError> {
        let target = {
            let state = self.state.read().await;
            if state.roster.is_empty() {
                return Err(RuntimeError::EmptyRoster);
            }
            match state.cursor {
                None => Some(0),
                Some(0) => None,
                Some(i) => Some(i - 1),
            }
        };
        match target {
            Some(index) => self.show(index).await.map(Some),
            None => Ok(None),
        }
    }

    /// Jump to the entry with this name (case-insensitive).
    pub async fn select_by_name(&self, name: &str) -> Result<ShowOutcome, RuntimeError> {
        let wanted = name.trim();
        let index = {
            let state = self.state.read().await;
            if state.roster.is_empty() {
                return Err(RuntimeError::EmptyRoster);
            }
            state
                .roster
                .iter()
                .position(|entry| entry.name.eq_ignore_ascii_case(wanted))
        };
        match index {
            Some(index) => self.show(index).await,
            None => Err(RuntimeError::NotFound(wanted.to_string())),
        }
    }
}

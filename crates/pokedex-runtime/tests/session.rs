use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pokedex_api::{ApiError, PokemonDetails, PokemonSource, PokemonSummary};
use pokedex_core::media::{CandidateOptions, LoadOutcome, MediaHandle, MediaLoader, Prober};
use pokedex_runtime::view::NO_AUDIO;
use pokedex_runtime::{AudioSlot, RuntimeError, Session, ShowOutcome};

const SHOWDOWN_BULBASAUR: &str = "https://play.pokemonshowdown.com/audio/cries/bulbasaur.mp3";

// ── Fakes ───────────────────────────────────────────────────────

#[derive(Default)]
struct FakeSource {
    roster: Vec<PokemonSummary>,
    list_error: Option<u16>,
    /// url -> (detail JSON, response delay)
    details: HashMap<String, (&'static str, Duration)>,
    fetches: Mutex<Vec<String>>,
}

impl FakeSource {
    fn entry(mut self, name: &str, url: &str, json: &'static str, delay_ms: u64) -> Self {
        self.roster.push(PokemonSummary {
            name: name.into(),
            url: url.into(),
        });
        self.details
            .insert(url.into(), (json, Duration::from_millis(delay_ms)));
        self
    }

    fn missing(mut self, name: &str, url: &str) -> Self {
        self.roster.push(PokemonSummary {
            name: name.into(),
            url: url.into(),
        });
        self
    }
}

fn status_error(status: u16) -> ApiError {
    let reason = match status {
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    ApiError::Status {
        status,
        reason: reason.into(),
    }
}

impl PokemonSource for FakeSource {
    async fn list_pokemon(&self) -> Result<Vec<PokemonSummary>, ApiError> {
        match self.list_error {
            Some(status) => Err(status_error(status)),
            None => Ok(self.roster.clone()),
        }
    }

    async fn get_details(&self, url: &str) -> Result<Arc<PokemonDetails>, ApiError> {
        self.fetches.lock().unwrap().push(url.to_string());
        let Some((json, delay)) = self.details.get(url).copied() else {
            return Err(status_error(404));
        };
        tokio::time::sleep(delay).await;
        serde_json::from_str(json)
            .map(Arc::new)
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[derive(Default)]
struct FakeLoader {
    playable: HashSet<String>,
    attempts: Mutex<Vec<String>>,
}

impl FakeLoader {
    fn playing(urls: &[&str]) -> Self {
        Self {
            playable: urls.iter().map(|u| u.to_string()).collect(),
            attempts: Mutex::new(Vec::new()),
        }
    }
}

impl MediaLoader for FakeLoader {
    async fn load(&self, url: &str) -> LoadOutcome {
        self.attempts.lock().unwrap().push(url.to_string());
        if self.playable.contains(url) {
            LoadOutcome::Playable(MediaHandle::new(url))
        } else {
            LoadOutcome::Failed("error event".into())
        }
    }
}

fn session(source: FakeSource, loader: FakeLoader) -> Session<FakeSource, FakeLoader> {
    Session::new(
        source,
        Prober::new(loader, Duration::from_secs(5)),
        CandidateOptions::default(),
    )
}

const BULBASAUR: &str = r#"{"id": 1, "name": "bulbasaur",
    "sprites": {"front_default": "img1"}, "types": [{"type": {"name": "grass"}}]}"#;
const IVYSAUR: &str = r#"{"id": 2, "name": "ivysaur",
    "sprites": {"front_default": "img2"}, "types": [{"type": {"name": "grass"}}]}"#;
const VENUSAUR: &str = r#"{"id": 3, "name": "venusaur"}"#;

fn starters() -> FakeSource {
    FakeSource::default()
        .entry("bulbasaur", "U1", BULBASAUR, 0)
        .entry("ivysaur", "U2", IVYSAUR, 0)
        .entry("venusaur", "U3", VENUSAUR, 0)
}

fn displayed(outcome: ShowOutcome) -> pokedex_runtime::AudioTicket {
    match outcome {
        ShowOutcome::Displayed(ticket) => ticket,
        other => panic!("Expected Displayed, got {other:?}"),
    }
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn test_start_renders_first_entry() {
    let source = FakeSource::default().entry("bulbasaur", "U1", BULBASAUR, 0);
    let s = session(source, FakeLoader::playing(&[SHOWDOWN_BULBASAUR]));

    let ticket = s.start().await.unwrap().expect("first entry displayed");
    let state = s.snapshot().await;
    let detail = state.detail.as_ref().unwrap();
    assert_eq!(detail.title, "Bulbasaur");
    assert_eq!(detail.type_line.as_deref(), Some("Type: Grass"));
    assert_eq!(detail.image_url.as_deref(), Some("img1"));
    assert_eq!(state.cursor, Some(0));
    assert_eq!(state.audio, AudioSlot::Pending);

    assert_eq!(
        ticket.candidates.as_slice().first().map(String::as_str),
        Some(SHOWDOWN_BULBASAUR)
    );
    let slot = s.resolve_audio(ticket).await.unwrap();
    assert_eq!(slot, AudioSlot::Ready(MediaHandle::new(SHOWDOWN_BULBASAUR)));
    assert_eq!(s.snapshot().await.audio, slot);
}

#[tokio::test]
async fn test_audio_unavailable_after_all_candidates_fail() {
    let s = session(starters(), FakeLoader::default());

    let ticket = s.start().await.unwrap().unwrap();
    let candidates = ticket.candidates.len();
    let slot = s.resolve_audio(ticket).await.unwrap();

    assert_eq!(slot, AudioSlot::Unavailable);
    assert_eq!(slot.to_string(), NO_AUDIO);
    assert_eq!(s.source().fetches.lock().unwrap().len(), 1);
    let state = s.snapshot().await;
    assert_eq!(state.audio, AudioSlot::Unavailable);
    assert_eq!(candidates, 4);
}

#[tokio::test]
async fn test_list_failure_is_fatal() {
    let source = FakeSource {
        list_error: Some(500),
        ..Default::default()
    };
    let s = session(source, FakeLoader::default());

    let err = s.start().await.unwrap_err();
    assert!(matches!(err, RuntimeError::ListFetch(_)));
    assert_eq!(err.to_string(), "API error: 500 Internal Server Error");
    assert!(s.snapshot().await.detail.is_none());
}

#[tokio::test]
async fn test_start_survives_failed_first_detail() {
    let source = FakeSource::default()
        .missing("missingno", "U0")
        .entry("bulbasaur", "U1", BULBASAUR, 0);
    let s = session(source, FakeLoader::default());

    assert!(s.start().await.unwrap().is_none());
    let state = s.snapshot().await;
    assert_eq!(state.roster.len(), 2);
    assert!(state.detail.is_none());
}

#[tokio::test]
async fn test_empty_roster() {
    let s = session(FakeSource::default(), FakeLoader::default());
    assert!(s.start().await.unwrap().is_none());
    assert!(matches!(s.next().await, Err(RuntimeError::EmptyRoster)));
}

// ── Stale results ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_slow_stale_details_do_not_overwrite_newer() {
    let source = FakeSource::default()
        .entry("bulbasaur", "U1", BULBASAUR, 500)
        .entry("ivysaur", "U2", IVYSAUR, 10);
    let s = session(source, FakeLoader::default());
    s.load_roster().await.unwrap();

    let (slow, fast) = tokio::join!(s.show(0), s.show(1));

    assert!(matches!(slow.unwrap(), ShowOutcome::Superseded));
    let ticket = displayed(fast.unwrap());
    let state = s.snapshot().await;
    assert_eq!(state.detail.unwrap().title, "Ivysaur");
    assert_eq!(state.cursor, Some(1));
    assert_eq!(state.generation, ticket.generation);
}

#[tokio::test]
async fn test_stale_audio_is_discarded() {
    let s = session(starters(), FakeLoader::playing(&[SHOWDOWN_BULBASAUR]));
    s.load_roster().await.unwrap();

    let old = displayed(s.show(0).await.unwrap());
    let new = displayed(s.show(1).await.unwrap());

    assert!(s.resolve_audio(old).await.is_none());
    assert_eq!(s.snapshot().await.audio, AudioSlot::Pending);
    // Superseded tickets never reach the loader.
    assert!(s.prober().loader().attempts.lock().unwrap().is_empty());

    assert_eq!(s.resolve_audio(new).await, Some(AudioSlot::Unavailable));
    assert_eq!(s.snapshot().await.detail.unwrap().title, "Ivysaur");
}

// ── Navigation ──────────────────────────────────────────────────

#[tokio::test]
async fn test_next_and_previous_stop_at_ends() {
    let s = session(starters(), FakeLoader::default());
    s.load_roster().await.unwrap();

    assert!(s.previous().await.unwrap().is_some());
    assert_eq!(s.snapshot().await.cursor, Some(0));
    assert!(s.previous().await.unwrap().is_none());

    assert!(s.next().await.unwrap().is_some());
    assert!(s.next().await.unwrap().is_some());
    assert_eq!(s.snapshot().await.cursor, Some(2));
    assert!(s.next().await.unwrap().is_none());
    assert_eq!(s.snapshot().await.detail.unwrap().title, "Venusaur");

    assert!(s.previous().await.unwrap().is_some());
    assert_eq!(s.snapshot().await.detail.unwrap().title, "Ivysaur");
}

#[tokio::test]
async fn test_select_by_name() {
    let s = session(starters(), FakeLoader::default());
    s.load_roster().await.unwrap();

    displayed(s.select_by_name(" IVYSAUR ").await.unwrap());
    assert_eq!(s.snapshot().await.cursor, Some(1));

    match s.select_by_name("mew").await {
        Err(RuntimeError::NotFound(name)) => assert_eq!(name, "mew"),
        other => panic!("Expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_out_of_range() {
    let s = session(starters(), FakeLoader::default());
    s.load_roster().await.unwrap();
    assert!(matches!(s.show(3).await, Err(RuntimeError::OutOfRange(3))));
    assert_eq!(s.snapshot().await.cursor, None);
}

#[tokio::test]
async fn test_detail_failure_keeps_last_good_view() {
    let source = FakeSource::default()
        .entry("bulbasaur", "U1", BULBASAUR, 0)
        .missing("ghost", "U404");
    let s = session(source, FakeLoader::default());
    s.load_roster().await.unwrap();

    s.show_with_audio(0).await.unwrap();
    let err = s.show(1).await.unwrap_err();
    match &err {
        RuntimeError::DetailFetch { url, source } => {
            assert_eq!(url, "U404");
            assert_eq!(source.status(), Some(404));
        }
        other => panic!("Expected DetailFetch, got {other:?}"),
    }

    let state = s.snapshot().await;
    assert_eq!(state.detail.unwrap().title, "Bulbasaur");
    assert_eq!(state.audio, AudioSlot::Unavailable);
    assert_eq!(state.cursor, Some(0));
    assert_eq!(state.displayed, Some(0));
}

#[tokio::test]
async fn test_audio_still_lands_after_failed_navigation() {
    let source = FakeSource::default()
        .entry("bulbasaur", "U1", BULBASAUR, 0)
        .missing("ghost", "U404");
    let s = session(source, FakeLoader::playing(&[SHOWDOWN_BULBASAUR]));
    s.load_roster().await.unwrap();

    let ticket = displayed(s.show(0).await.unwrap());
    assert!(s.show(1).await.is_err());
    assert!(s.current_generation() > ticket.generation);

    let slot = s.resolve_audio(ticket).await;
    assert_eq!(
        slot,
        Some(AudioSlot::Ready(MediaHandle::new(SHOWDOWN_BULBASAUR)))
    );
    let state = s.snapshot().await;
    assert_eq!(state.detail.unwrap().title, "Bulbasaur");
    assert_ne!(state.audio, AudioSlot::Pending);
}

#[tokio::test]
async fn test_next_after_failed_fetch_steps_from_shown_entry() {
    let source = FakeSource::default()
        .entry("bulbasaur", "U1", BULBASAUR, 0)
        .missing("ghost", "U404")
        .entry("venusaur", "U3", VENUSAUR, 0);
    let s = session(source, FakeLoader::default());
    s.load_roster().await.unwrap();

    displayed(s.show(0).await.unwrap());
    assert!(s.next().await.is_err());
    assert_eq!(s.snapshot().await.cursor, Some(0));

    displayed(s.show(2).await.unwrap());
    let state = s.snapshot().await;
    assert_eq!(state.displayed, Some(2));
    assert!(s.previous().await.is_err());
    let state = s.snapshot().await;
    assert_eq!(state.cursor, Some(2));
    assert_eq!(state.detail.unwrap().title, "Venusaur");
}

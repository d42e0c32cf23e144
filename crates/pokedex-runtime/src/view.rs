//! Text rendering of roster entries and detail records.

use std::fmt;

use serde::Serialize;

use pokedex_api::{PokemonDetails, PokemonSummary};
use pokedex_core::media::{MediaHandle, ProbeResult};

pub const LOADING: &str = "Loading...";
pub const NO_AUDIO: &str = "No audio available";

/// Everything the detail panel shows for one record, minus the audio slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: Option<i64>,
    pub name: String,
    pub title: String,
    pub image_url: Option<String>,
    /// `None` when the record carries no types at all.
    pub type_line: Option<String>,
    pub height_m: Option<f32>,
    pub weight_kg: Option<f32>,
    pub abilities: Vec<AbilityLine>,
    pub stats: Vec<StatLine>,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbilityLine {
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatLine {
    pub name: String,
    pub base: u32,
}

impl DetailView {
    pub fn from_details(details: &PokemonDetails) -> Self {
        let type_line = (!details.types.is_empty()).then(|| {
            let names: Vec<String> = details.type_names().map(capitalize).collect();
            format!("Type: {}", names.join(", "))
        });

        Self {
            id: details.id,
            name: details.name.clone(),
            title: capitalize(&details.name),
            image_url: details.artwork_url().map(str::to_string),
            type_line,
            height_m: details.height.map(|dm| dm as f32 / 10.0),
            weight_kg: details.weight.map(|hg| hg as f32 / 10.0),
            abilities: details
                .abilities
                .iter()
                .map(|a| AbilityLine {
                    name: a.ability.name.clone(),
                    hidden: a.is_hidden,
                })
                .collect(),
            stats: details
                .stats
                .iter()
                .map(|s| StatLine {
                    name: s.stat.name.clone(),
                    base: s.base_stat,
                })
                .collect(),
            moves: details.moves.iter().map(|m| m.kind.name.clone()).collect(),
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => writeln!(f, "{} (#{id})", self.title)?,
            None => writeln!(f, "{}", self.title)?,
        }
        if let Some(image) = &self.image_url {
            writeln!(f, "Image: {image}")?;
        }
        if let Some(types) = &self.type_line {
            writeln!(f, "{types}")?;
        }
        match (self.height_m, self.weight_kg) {
            (Some(h), Some(w)) => writeln!(f, "Height: {h:.1} m  Weight: {w:.1} kg")?,
            (Some(h), None) => writeln!(f, "Height: {h:.1} m")?,
            (None, Some(w)) => writeln!(f, "Weight: {w:.1} kg")?,
            (None, None) => {}
        }
        if !self.abilities.is_empty() {
            let abilities: Vec<String> = self
                .abilities
                .iter()
                .map(|a| {
                    let name = capitalize(&a.name);
                    if a.hidden {
                        format!("{name} (hidden)")
                    } else {
                        name
                    }
                })
                .collect();
            writeln!(f, "Abilities: {}", abilities.join(", "))?;
        }
        if !self.stats.is_empty() {
            let stats: Vec<String> = self
                .stats
                .iter()
                .map(|s| format!("{} {}", s.name, s.base))
                .collect();
            writeln!(f, "Stats: {}", stats.join(", "))?;
        }
        if !self.moves.is_empty() {
            writeln!(f, "Moves ({}): {}", self.moves.len(), self.moves.join(", "))?;
        }
        Ok(())
    }
}

/// State of the audio player slot under the detail panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "media", rename_all = "snake_case")]
pub enum AudioSlot {
    /// No detail shown yet.
    #[default]
    Idle,
    Pending,
    Ready(MediaHandle),
    Unavailable,
}

impl From<ProbeResult> for AudioSlot {
    fn from(result: ProbeResult) -> Self {
        match result {
            ProbeResult::Found(handle) => Self::Ready(handle),
            ProbeResult::NotFound => Self::Unavailable,
        }
    }
}

impl fmt::Display for AudioSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Pending => write!(f, "Audio: {LOADING}"),
            Self::Ready(handle) => write!(f, "Audio: {}", handle.url),
            Self::Unavailable => write!(f, "{NO_AUDIO}"),
        }
    }
}

/// One roster line, numbered from 1.
pub fn roster_line(index: usize, entry: &PokemonSummary) -> String {
    format!("{}. {}", index + 1, entry.name)
}

pub fn error_line(message: impl fmt::Display) -> String {
    format!("Error: {message}")
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

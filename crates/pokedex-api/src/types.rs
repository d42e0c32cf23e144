use serde::{Deserialize, Deserializer};

// ── List endpoint ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PokemonListResponse {
    pub count: Option<u64>,
    pub results: Vec<PokemonSummary>,
}

/// One roster entry: the record name and the URL of its detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
    pub url: String,
}

// ── Detail endpoint ─────────────────────────────────────────────

/// The subset of a PokéAPI `pokemon` record that the front end uses.
///
/// Everything except `name` may be missing upstream, so every field defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PokemonDetails {
    /// Numeric id. Anything that isn't a JSON integer is treated as absent.
    #[serde(default, deserialize_with = "integer_or_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sprites: Option<Sprites>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    /// Decimetres.
    #[serde(default)]
    pub height: Option<u32>,
    /// Hectograms.
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<ArtworkSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
}

/// A `{ "name": ..., "url": ... }` reference to another resource. Only the
/// name is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub stat: NamedResource,
    pub base_stat: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub kind: NamedResource,
}

impl PokemonDetails {
    /// Best available picture: official artwork, then the default sprite.
    pub fn artwork_url(&self) -> Option<&str> {
        let sprites = self.sprites.as_ref()?;
        sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .or(sprites.front_default.as_deref())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|t| t.kind.name.as_str())
    }
}

fn integer_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

use std::collections::HashSet;

const SHOWDOWN_CRY: &str = "https://play.pokemonshowdown.com/audio/cries";
const BULBAGARDEN_CRY: &str = "https://archives.bulbagarden.net/media/sound/ogg/vg/cries";
const POKEMONCRIES_CRY: &str = "https://pokemoncries.com/cries";
const POKESPRITE_IMAGE: &str =
    "https://raw.githubusercontent.com/msikma/pokesprite/master/sprites/pokemon/384x384";

/// Knobs for [`generate_candidates`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateOptions {
    /// Only emit the id-keyed sprite URL when the id is valid. When false,
    /// a missing id is rendered as the literal `null`.
    pub gate_image_on_id: bool,
}

/// Ordered, duplicate-free list of media URLs to probe. The first playable one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCandidates(Vec<String>);

impl MediaCandidates {
    /// Collect URLs, dropping any repeat of an earlier one.
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        Self(
            urls.into_iter()
                .filter(|url| seen.insert(url.clone()))
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a MediaCandidates {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build the audio candidates for a record.
///
/// Order: name-keyed Showdown cry, id-keyed Bulbagarden and pokemoncries.com
/// cries (valid id only), then the id-keyed pokesprite image.
pub fn generate_candidates(
    id: Option<i64>,
    name: &str,
    options: CandidateOptions,
) -> MediaCandidates {
    let slug = normalize_name(name);
    let valid_id = id.filter(|n| *n >= 0);

    let mut urls = vec![format!("{SHOWDOWN_CRY}/{slug}.mp3")];

    if let Some(n) = valid_id {
        urls.push(format!("{BULBAGARDEN_CRY}/{n}.ogg"));
        urls.push(format!("{POKEMONCRIES_CRY}/{n}.mp3"));
    }

    if options.gate_image_on_id {
        if let Some(n) = valid_id {
            urls.push(format!("{POKESPRITE_IMAGE}/{n}.png"));
        }
    } else {
        let key = id.map_or_else(|| "null".to_string(), |n| n.to_string());
        urls.push(format!("{POKESPRITE_IMAGE}/{key}.png"));
    }

    MediaCandidates::from_urls(urls)
}

/// Lowercase, then replace anything outside `[a-z0-9-]` with `-`.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect()
}

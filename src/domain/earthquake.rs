//! Earthquake bulletin types as published by the BMKG TEWS feed.
//!
//! The feed wraps every payload as `{ "Infogempa": { "gempa": ... } }`,
//! where `gempa` is a single object for the latest-event document and an
//! array for the recent-events document. Field values are kept as opaque
//! text: magnitudes and depths are never parsed.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One earthquake event, fields named after the feed's Indonesian keys.
///
/// Produced fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EarthquakeEvent {
    /// Event date (`Tanggal`), e.g. `"19 Okt 2026"`.
    #[serde(rename = "Tanggal", default, deserialize_with = "opaque_text")]
    pub date: String,
    /// Event time (`Jam`), e.g. `"08:56:01 WIB"`.
    #[serde(rename = "Jam", default, deserialize_with = "opaque_text")]
    pub time: String,
    /// Magnitude (`Magnitude`) as published.
    #[serde(rename = "Magnitude", default, deserialize_with = "opaque_text")]
    pub magnitude: String,
    /// Depth (`Kedalaman`) as published, e.g. `"10 km"`.
    #[serde(rename = "Kedalaman", default, deserialize_with = "opaque_text")]
    pub depth: String,
    /// Free-text region description (`Wilayah`).
    #[serde(rename = "Wilayah", default, deserialize_with = "opaque_text")]
    pub region: String,
    /// Tsunami potential note (`Potensi`); absent from list entries.
    #[serde(
        rename = "Potensi",
        default,
        deserialize_with = "opaque_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub tsunami_potential: Option<String>,
    /// Shakemap image path relative to the feed base (`Shakemap`).
    #[serde(
        rename = "Shakemap",
        default,
        deserialize_with = "opaque_text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub shakemap_path: Option<String>,
}

impl EarthquakeEvent {
    /// Returns the absolute shakemap URL: `base` followed by the relative
    /// shakemap path (or `base` alone when the event carries none).
    #[must_use]
    pub fn shakemap_url(&self, base: &str) -> String {
        format!("{base}{}", self.shakemap_path.as_deref().unwrap_or_default())
    }
}

/// Ordered events in feed order (presumed newest first). Never sorted or
/// deduplicated.
pub type EarthquakeList = Vec<EarthquakeEvent>;

/// Top-level feed envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Bulletin<T> {
    /// The `Infogempa` wrapper object.
    #[serde(rename = "Infogempa")]
    pub info: InfoGempa<T>,
}

/// The `Infogempa` object holding the `gempa` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoGempa<T> {
    /// Either a single [`EarthquakeEvent`] or an [`EarthquakeList`].
    pub gempa: T,
}

impl<T> Bulletin<T> {
    /// Unwraps the envelope, returning the `gempa` payload.
    pub fn into_gempa(self) -> T {
        self.info.gempa
    }
}

/// Accepts any JSON scalar and keeps its textual form.
fn opaque_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opaque_text_opt(deserializer)?.unwrap_or_default())
}

fn opaque_text_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

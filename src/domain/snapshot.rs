//! Snapshot record persisted by the local mirror store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::document::{Container, Document};

/// One mirror row: the page text captured at a point in time.
///
/// Serialized with the persisted key names:
/// `{ "tanggal": <ISO-8601>, "data": { "info": { "tanggal", "daftar" } } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotRecord {
    /// ISO-8601 capture timestamp; the record's primary key.
    #[serde(rename = "tanggal")]
    pub captured_at: String,
    /// Captured page text.
    pub data: SnapshotData,
}

/// Wrapper matching the persisted `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotData {
    /// Text of both containers.
    pub info: SnapshotInfo,
}

/// Rendered text of the two containers at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotInfo {
    /// Text of `#info-gempa`.
    #[serde(rename = "tanggal")]
    pub date: String,
    /// Text of `#daftar-gempa`.
    #[serde(rename = "daftar")]
    pub list: String,
}

impl SnapshotRecord {
    /// Captures the current container text of `document` at `at`.
    #[must_use]
    pub fn capture(document: &Document, at: DateTime<Utc>) -> Self {
        Self {
            captured_at: iso_timestamp(at),
            data: SnapshotData {
                info: SnapshotInfo {
                    date: document.inner_text(Container::LatestInfo),
                    list: document.inner_text(Container::RecentList),
                },
            },
        }
    }
}

/// Formats `at` as millisecond-precision UTC ISO-8601 (`...T08:56:01.123Z`).
#[must_use]
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn capture_uses_container_text() {
        let mut doc = Document::new();
        doc.set_inner_html(Container::LatestInfo, "<p>Tanggal: 1</p>".to_string());
        doc.set_inner_html(Container::RecentList, "<h2>Daftar</h2>".to_string());

        let Some(at) = Utc.with_ymd_and_hms(2026, 10, 19, 8, 56, 1).single() else {
            panic!("valid timestamp");
        };
        let record = SnapshotRecord::capture(&doc, at);

        assert_eq!(record.captured_at, "2026-10-19T08:56:01.000Z");
        assert_eq!(record.data.info.date, "Tanggal: 1");
        assert_eq!(record.data.info.list, "Daftar");
    }

    #[test]
    fn serializes_with_store_key_names() {
        let record = SnapshotRecord::capture(&Document::new(), Utc::now());
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert!(json.get("tanggal").is_some());
        assert!(json.pointer("/data/info/daftar").is_some());
    }
}

//! HTML fragment builders.
//!
//! Field values are interpolated verbatim. The feed is trusted to return
//! display text, and the mirror store relies on the literal values showing
//! up in the container text.

use std::fmt::Write as _;

use crate::domain::EarthquakeEvent;

/// Heading of the latest-event container.
pub const LATEST_HEADING: &str = "Informasi Gempa Terkini";

/// Heading of the recent-events container.
pub const LIST_HEADING: &str = "Daftar Gempa Bumi M 5.0+";

/// Builds the `#info-gempa` fragment for `event`, resolving its shakemap
/// against `shakemap_base`.
#[must_use]
pub fn latest_fragment(event: &EarthquakeEvent, shakemap_base: &str) -> String {
    format!(
        r#"
            <h2>{LATEST_HEADING}</h2>
            <p>Tanggal: {}</p>
            <p>Jam: {}</p>
            <p>Magnitude: {}</p>
            <p>Kedalaman: {}</p>
            <p>Wilayah: {}</p>
            <p>Potensi Tsunami: {}</p>
            <img src="{}" alt="Shakemap">
        "#,
        event.date,
        event.time,
        event.magnitude,
        event.depth,
        event.region,
        event.tsunami_potential.as_deref().unwrap_or_default(),
        event.shakemap_url(shakemap_base),
    )
}

/// Builds the `#daftar-gempa` fragment: the heading followed by one
/// `gempa-item` block per event, in input order. An empty slice still
/// yields the heading.
#[must_use]
pub fn list_fragment(events: &[EarthquakeEvent]) -> String {
    let mut html = format!("<h2>{LIST_HEADING}</h2>");
    for event in events {
        let _ = write!(
            html,
            r#"
                <div class="gempa-item">
                    <h3>{}</h3>
                    <p>Jam: {}</p>
                    <p>Magnitude: {}</p>
                    <p>Kedalaman: {}</p>
                    <p>Wilayah: {}</p>
                </div>
            "#,
            event.date, event.time, event.magnitude, event.depth, event.region,
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: u8) -> EarthquakeEvent {
        EarthquakeEvent {
            date: format!("{n} Okt 2026"),
            time: format!("0{n}:00:00 WIB"),
            magnitude: format!("5.{n}"),
            depth: format!("{n}0 km"),
            region: format!("Wilayah {n}"),
            tsunami_potential: Some("Tidak berpotensi tsunami".to_string()),
            shakemap_path: Some(format!("{n}.mmi.jpg")),
        }
    }

    #[test]
    fn latest_contains_every_field_and_image() {
        let html = latest_fragment(&event(1), "https://data.bmkg.go.id/DataMKG/TEWS/");
        for needle in [
            "Tanggal: 1 Okt 2026",
            "Jam: 01:00:00 WIB",
            "Magnitude: 5.1",
            "Kedalaman: 10 km",
            "Wilayah: Wilayah 1",
            "Potensi Tsunami: Tidak berpotensi tsunami",
            r#"<img src="https://data.bmkg.go.id/DataMKG/TEWS/1.mmi.jpg" alt="Shakemap">"#,
        ] {
            assert!(html.contains(needle), "missing {needle:?} in {html}");
        }
    }

    #[test]
    fn list_renders_one_block_per_event_in_order() {
        let events = [event(3), event(1), event(2)];
        let html = list_fragment(&events);

        assert!(html.starts_with("<h2>Daftar Gempa Bumi M 5.0+</h2>"));
        assert_eq!(html.matches(r#"class="gempa-item""#).count(), 3);

        let positions: Vec<usize> = ["<h3>3 Okt", "<h3>1 Okt", "<h3>2 Okt"]
            .iter()
            .filter_map(|needle| html.find(needle))
            .collect();
        assert_eq!(positions.len(), 3);
        assert!(positions.windows(2).all(|w| matches!(w, [a, b] if a < b)));
    }

    #[test]
    fn empty_list_keeps_heading_only() {
        let html = list_fragment(&[]);
        assert_eq!(html, "<h2>Daftar Gempa Bumi M 5.0+</h2>");
    }
}

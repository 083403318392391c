//! The `index.html` shell around the two containers.

use crate::domain::document::{INFO_CONTAINER_ID, INSTALL_BUTTON_ID, LIST_CONTAINER_ID};
use crate::domain::{Container, Document};

/// Page title.
pub const TITLE: &str = "Info Gempa Bumi";

/// Renders the full page for `document`. The install button is emitted
/// with `display: block` or `display: none` according to
/// `install_button_visible`.
#[must_use]
pub fn index_html(document: &Document, install_button_visible: bool) -> String {
    let display = if install_button_visible { "block" } else { "none" };
    format!(
        r##"<!DOCTYPE html>
<html lang="id">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="theme-color" content="#b71c1c">
    <title>{TITLE}</title>
    <link rel="stylesheet" href="/styles.css">
    <link rel="manifest" href="/manifest.json">
    <link rel="apple-touch-icon" href="/images/icon-192x192.png">
</head>
<body>
    <header>
        <h1>{TITLE}</h1>
        <button id="{INSTALL_BUTTON_ID}" style="display: {display};">Install</button>
    </header>
    <main>
        <section id="{INFO_CONTAINER_ID}">{}</section>
        <section id="{LIST_CONTAINER_ID}">{}</section>
    </main>
    <script src="/app.js" defer></script>
</body>
</html>
"##,
        document.inner_html(Container::LatestInfo),
        document.inner_html(Container::RecentList),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_wraps_containers() {
        let mut doc = Document::new();
        doc.set_inner_html(Container::LatestInfo, "<p>satu</p>".to_string());
        let html = index_html(&doc, false);

        assert!(html.contains(r#"<section id="info-gempa"><p>satu</p></section>"#));
        assert!(html.contains(r#"<section id="daftar-gempa"></section>"#));
        assert!(html.contains(r#"id="install-button" style="display: none;""#));
        assert!(html.contains(r##"<meta name="theme-color" content="#b71c1c">"##));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn visible_button_is_displayed() {
        let html = index_html(&Document::new(), true);
        assert!(html.contains(r#"style="display: block;""#));
    }
}

//! Server-held page model: the three elements the page script touches.
//!
//! The page owns two content containers (`info-gempa` and `daftar-gempa`).
//! Containers hold raw HTML; their rendered text is derived on demand for
//! the mirror store. The install button's visibility belongs to the
//! install prompt controller.

/// Element id of the latest-event container.
pub const INFO_CONTAINER_ID: &str = "info-gempa";

/// Element id of the recent-events container.
pub const LIST_CONTAINER_ID: &str = "daftar-gempa";

/// Element id of the install button.
pub const INSTALL_BUTTON_ID: &str = "install-button";

/// One of the two content containers on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `#info-gempa`: the latest event.
    LatestInfo,
    /// `#daftar-gempa`: the recent-events list.
    RecentList,
}

impl Container {
    /// Returns the DOM id of this container.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::LatestInfo => INFO_CONTAINER_ID,
            Self::RecentList => LIST_CONTAINER_ID,
        }
    }
}

/// Container state shared by the render pipeline and the mirror store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    latest_html: String,
    list_html: String,
}

impl Document {
    /// Creates an empty page with both containers blank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the inner HTML of `container`.
    pub fn set_inner_html(&mut self, container: Container, html: String) {
        match container {
            Container::LatestInfo => self.latest_html = html,
            Container::RecentList => self.list_html = html,
        }
    }

    /// Returns the inner HTML of `container`.
    #[must_use]
    pub fn inner_html(&self, container: Container) -> &str {
        match container {
            Container::LatestInfo => &self.latest_html,
            Container::RecentList => &self.list_html,
        }
    }

    /// Returns the rendered text of `container`: markup removed, one line
    /// per text run, blank lines dropped.
    #[must_use]
    pub fn inner_text(&self, container: Container) -> String {
        html_to_text(self.inner_html(container))
    }
}

fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push('\n');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    decode_entities(&text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes the character references markup commonly carries. `&amp;` goes
/// last so `&amp;lt;` stays `&lt;`.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_is_blank() {
        let doc = Document::new();
        assert!(doc.inner_html(Container::LatestInfo).is_empty());
        assert!(doc.inner_text(Container::RecentList).is_empty());
    }

    #[test]
    fn inner_text_strips_markup() {
        let mut doc = Document::new();
        doc.set_inner_html(
            Container::LatestInfo,
            "\n  <h2>Judul</h2>\n  <p>Jam: 08:00</p>\n  <img src=\"x\" alt=\"y\">\n".to_string(),
        );
        assert_eq!(doc.inner_text(Container::LatestInfo), "Judul\nJam: 08:00");
    }

    #[test]
    fn inner_text_decodes_entities() {
        let mut doc = Document::new();
        doc.set_inner_html(
            Container::RecentList,
            "<p>Laut &amp; Darat</p><p>&lt;5 km&gt; &quot;dangkal&quot; &#39;x&#39;</p><p>&amp;lt;</p>"
                .to_string(),
        );
        assert_eq!(
            doc.inner_text(Container::RecentList),
            "Laut & Darat\n<5 km> \"dangkal\" 'x'\n&lt;"
        );
    }

    #[test]
    fn containers_are_independent() {
        let mut doc = Document::new();
        doc.set_inner_html(Container::RecentList, "<p>a</p>".to_string());
        assert!(doc.inner_html(Container::LatestInfo).is_empty());
        assert_eq!(Container::RecentList.id(), "daftar-gempa");
    }
}

//! CSS selectors for wiki HTML parsing.
//!
//! All structural landmarks used to locate data on gamepedia-style pages
//! live here. Update this file when the wiki changes its markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Abbreviations substituted for inline icon links, keyed by the link's
/// `title` attribute. Unknown titles pass through unchanged.
pub static SYMBOL_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Gold", ""),
    ("Energy", "E"),
    ("Green resource", "G"),
    ("Blue resource", "B"),
    ("Red resource", "R"),
    ("Attack", "X"),
    ("Ability", "Click"),
];

/// Looks up the abbreviation for an icon title, falling back to the title
/// itself for symbols without a short form.
pub fn symbol_for(title: &str) -> &str {
    SYMBOL_ABBREVIATIONS
        .iter()
        .find(|(key, _)| *key == title)
        .map(|(_, abbreviation)| *abbreviation)
        .unwrap_or(title)
}

/// Selectors for the unit listing page.
pub mod listing {
    use super::*;

    /// The listing table; a document without one is unusable.
    pub static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

    /// Table rows, header and data alike.
    pub static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table tr").unwrap());

    /// Data cells within a row. Header rows carry `th` instead and end up
    /// with no cells at all.
    pub static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

    /// Unit page link inside the name cell.
    pub static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
}

/// Selectors for individual unit pages.
pub mod unit {
    use super::*;

    /// Page title container.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.title").unwrap());

    /// Info box whose last block holds the ability text.
    pub static INFO_BOX: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.box").unwrap());

    /// Blocks inside the info box.
    pub static INFO_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());

    /// Change log section anchor.
    pub static CHANGE_LOG: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#Change_log").unwrap());

    /// Current-article tab carrying the canonical page path.
    pub static CURRENT_ARTICLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#ca-view").unwrap());

    /// Anchor within the current-article tab.
    pub static ARTICLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    /// Unit artwork thumbnail.
    pub static THUMBNAIL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".thumbimage").unwrap());

    /// In-game panel screenshot inside a paragraph.
    pub static PANEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("p > a.image > img").unwrap());

    /// Bulleted lists (change log days and their entries).
    pub static LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").unwrap());

    /// Items within a bulleted list.
    pub static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
}

/// A nested wrapper some cells place around their true value.
pub static VALUE_WRAP: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn selectors_compile() {
        // Force evaluation of all lazy selectors to ensure they compile
        let _ = &*VALUE_WRAP;
        let _ = &*listing::TABLE;
        let _ = &*listing::ROW;
        let _ = &*listing::CELL;
        let _ = &*listing::NAME_LINK;
        let _ = &*unit::TITLE;
        let _ = &*unit::INFO_BOX;
        let _ = &*unit::INFO_BLOCK;
        let _ = &*unit::CHANGE_LOG;
        let _ = &*unit::CURRENT_ARTICLE;
        let _ = &*unit::ARTICLE_LINK;
        let _ = &*unit::THUMBNAIL;
        let _ = &*unit::PANEL;
        let _ = &*unit::LIST;
        let _ = &*unit::LIST_ITEM;
    }

    #[test]
    fn basic_landmark_matching() {
        let html = Html::parse_document(
            r#"<div class="title">Walker</div>
               <div class="box"><div>Stats</div><div>Ability text</div></div>
               <h2><span id="Change_log">Change log</span></h2>"#,
        );

        assert_eq!(html.select(&unit::TITLE).count(), 1);
        assert_eq!(html.select(&unit::INFO_BOX).count(), 1);
        assert!(html.select(&unit::CHANGE_LOG).next().is_some());
    }

    #[test]
    fn symbol_lookup() {
        assert_eq!(symbol_for("Gold"), "");
        assert_eq!(symbol_for("Energy"), "E");
        assert_eq!(symbol_for("Green resource"), "G");
        assert_eq!(symbol_for("Blue resource"), "B");
        assert_eq!(symbol_for("Red resource"), "R");
        assert_eq!(symbol_for("Attack"), "X");
        assert_eq!(symbol_for("Ability"), "Click");
        // Unknown titles pass through unchanged
        assert_eq!(symbol_for("Promptness"), "Promptness");
    }
}

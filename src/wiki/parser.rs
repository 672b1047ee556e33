//! HTML parsers for the unit listing table and per-unit detail pages.
//!
//! Both parsers are pure functions of their markup argument: no caching, no
//! shared state. Column positions and landmarks are fixed; markup that does
//! not match them is reported as [`ScrapeError::Format`] rather than guessed
//! around.

use crate::wiki::error::ScrapeError;
use crate::wiki::models::{DetailLinks, Unit, UnitDetail, POSITION};
use crate::wiki::models::{Attributes, Costs, Links, Stats};
use crate::wiki::selectors::{self, listing, unit, VALUE_WRAP};
use chrono::NaiveDate;
use regex_lite::Regex;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Cell count of a valid listing row.
const COLUMN_COUNT: usize = 20;

/// Ordinal suffixes directly after a digit ("31st", "2nd", "3rd", "4th").
static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)(st|nd|rd|th)\b").unwrap());

/// Extracts an element's text value: unwraps the nested `div` some cells
/// place around their content, then collects and trims the text.
fn clean_text(element: ElementRef) -> String {
    let target = element.select(&VALUE_WRAP).next().unwrap_or(element);
    target.text().collect::<String>().trim().to_string()
}

/// [`clean_text`] with a decimal integer cast. A value that does not parse
/// is a format error, not a zero.
fn clean_int(element: ElementRef) -> Result<u32, ScrapeError> {
    clean_text(element).parse().map_err(|_| ScrapeError::Format)
}

/// [`clean_text`] with the wiki's boolean convention: the literal `"True"`
/// is true, anything else (including empty) is false.
fn clean_bool(element: ElementRef) -> bool {
    clean_text(element) == "True"
}

/// Collects an element's text with every inline icon link replaced by its
/// text abbreviation. The link's `title` attribute (falling back to its own
/// text) is looked up in the symbol table; unknown titles pass through.
pub fn text_with_symbols(element: ElementRef) -> String {
    let mut out = String::new();
    append_text(element, &mut out);
    out
}

fn append_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(el) = ElementRef::wrap(child) {
            if el.value().name() == "a" {
                let title = el
                    .value()
                    .attr("title")
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| el.text().collect::<String>());
                out.push_str(selectors::symbol_for(&title));
            } else {
                append_text(el, out);
            }
        }
    }
}

/// Collapses runs of whitespace (newlines included) into single spaces and
/// trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the unit listing table into one record per row, keyed by unit name.
///
/// Markup without a `table` is unusable and fails with
/// [`ScrapeError::Format`]. Header rows (no `td` cells) are skipped. Rows
/// sharing a name overwrite each other, last one wins. An empty but
/// well-formed table yields an empty map.
pub fn parse_unit_table(html: &str) -> Result<BTreeMap<String, Unit>, ScrapeError> {
    let document = Html::parse_document(html);
    if document.select(&listing::TABLE).next().is_none() {
        return Err(ScrapeError::Format);
    }

    let mut units = BTreeMap::new();
    for row in document.select(&listing::ROW) {
        let cells: Vec<ElementRef> = row.select(&listing::CELL).collect();
        if cells.is_empty() {
            continue;
        }
        let unit = parse_unit_row(&cells)?;
        units.insert(unit.name.clone(), unit);
    }

    debug!("Parsed {} units from listing", units.len());
    Ok(units)
}

// Fixed column layout: 0=name+link, 1=type, 2=unit/spell, 3-7=costs
// (gold,energy,green,blue,red), 8=supply, 9=build_time, 10=health,
// 11=frontline, 12=fragile, 13=blocker, 14=prompt, 15=attack, 16=stamina,
// 17=exhaust_turn, 18=exhaust_ability, 19=lifespan.
fn parse_unit_row(cells: &[ElementRef]) -> Result<Unit, ScrapeError> {
    if cells.len() < COLUMN_COUNT {
        return Err(ScrapeError::Format);
    }

    let name = clean_text(cells[0]);
    if name.is_empty() {
        return Err(ScrapeError::Format);
    }

    let path = cells[0]
        .select(&listing::NAME_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ScrapeError::Format)?
        .to_string();

    // Attack is blank for units without one; every other numeric column is
    // required to hold a value.
    let attack_text = clean_text(cells[15]);
    let attack = if attack_text.is_empty() {
        0
    } else {
        attack_text.parse().map_err(|_| ScrapeError::Format)?
    };

    Ok(Unit {
        name,
        costs: Costs {
            gold: clean_int(cells[3])?,
            energy: clean_int(cells[4])?,
            green: clean_int(cells[5])?,
            blue: clean_int(cells[6])?,
            red: clean_int(cells[7])?,
        },
        stats: Stats { attack, health: clean_int(cells[10])? },
        attributes: Attributes {
            supply: clean_int(cells[8])?,
            frontline: clean_bool(cells[11]),
            fragile: clean_bool(cells[12]),
            blocker: clean_bool(cells[13]),
            prompt: clean_bool(cells[14]),
            stamina: clean_int(cells[16])?,
            lifespan: clean_int(cells[19])?,
            build_time: clean_int(cells[9])?,
            exhaust_turn: clean_int(cells[17])?,
            exhaust_ability: clean_int(cells[18])?,
        },
        links: Links { path, image: None, panel: None },
        unit_type: clean_int(cells[1])?,
        unit_spell: clean_text(cells[2]),
        abilities: None,
        change_history: None,
        position: None,
    })
}

/// Parses a unit detail page into name, ability text, change history and
/// secondary links.
///
/// The title container and info box are required landmarks; a page without
/// them fails with [`ScrapeError::Format`]. A missing change log landmark is
/// normal (new units) and yields an empty history. The page path, thumbnail
/// and panel image are optional.
pub fn parse_unit_page(html: &str) -> Result<UnitDetail, ScrapeError> {
    let document = Html::parse_document(html);

    let title = document.select(&unit::TITLE).next().ok_or(ScrapeError::Format)?;
    let name = clean_text(title);
    if name.is_empty() {
        return Err(ScrapeError::Format);
    }

    // The info box stacks a variable number of blocks; ability text is
    // always the last one.
    let info_box = document.select(&unit::INFO_BOX).next().ok_or(ScrapeError::Format)?;
    let abilities_block = info_box.select(&unit::INFO_BLOCK).last().ok_or(ScrapeError::Format)?;
    let abilities = collapse_whitespace(&text_with_symbols(abilities_block));

    let change_history = parse_change_log(&document)?;

    let path = document
        .select(&unit::CURRENT_ARTICLE)
        .next()
        .and_then(|tab| tab.select(&unit::ARTICLE_LINK).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);
    let image = document
        .select(&unit::THUMBNAIL)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);
    let panel = document
        .select(&unit::PANEL)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    debug!("Unit processed: {}", name);

    Ok(UnitDetail {
        name,
        abilities,
        change_history,
        links: DetailLinks { path, image, panel },
        position: POSITION.to_string(),
    })
}

/// Extracts the per-day change history from a detail page.
///
/// Walks from the change log anchor up to its enclosing `h2`, forward to the
/// next list, then over the list's direct items; each missing step
/// short-circuits to an empty map. Items sharing a date overwrite each
/// other, last one wins.
fn parse_change_log(document: &Html) -> Result<BTreeMap<String, Vec<String>>, ScrapeError> {
    let Some(anchor) = document.select(&unit::CHANGE_LOG).next() else {
        return Ok(BTreeMap::new());
    };
    let Some(heading) =
        anchor.ancestors().filter_map(ElementRef::wrap).find(|el| el.value().name() == "h2")
    else {
        return Ok(BTreeMap::new());
    };
    let Some(list) = next_list(&heading) else {
        return Ok(BTreeMap::new());
    };

    let mut history = BTreeMap::new();
    for item in list.children().filter_map(ElementRef::wrap) {
        if item.value().name() != "li" {
            continue;
        }
        let (day, changes) = parse_change_item(item)?;
        history.insert(day, changes);
    }
    Ok(history)
}

/// First list following the heading in document order.
fn next_list<'a>(heading: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    for sibling in heading.next_siblings() {
        if let Some(el) = ElementRef::wrap(sibling) {
            if el.value().name() == "ul" {
                return Some(el);
            }
            if let Some(nested) = el.select(&unit::LIST).next() {
                return Some(nested);
            }
        }
    }
    None
}

/// One change log day: the item's leading text is the date label, the nested
/// list holds that day's changes in document order.
fn parse_change_item(item: ElementRef) -> Result<(String, Vec<String>), ScrapeError> {
    let raw_day = item
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .ok_or(ScrapeError::Format)?
        .to_string();
    let day = normalize_date(&raw_day)?;

    let list = item.select(&unit::LIST).next().ok_or(ScrapeError::Format)?;
    let changes = list
        .select(&unit::LIST_ITEM)
        .map(|entry| collapse_whitespace(&text_with_symbols(entry)))
        .collect();

    Ok((day, changes))
}

/// Canonicalizes a human-readable date label ("October 31st, 1984") into ISO
/// form ("1984-10-31"). Ordinal suffixes are stripped only when they
/// directly follow a digit, so month names stay intact.
fn normalize_date(raw: &str) -> Result<String, ScrapeError> {
    let stripped = ORDINAL_SUFFIX.replace_all(raw, "$1");
    let date = NaiveDate::parse_from_str(stripped.as_ref(), "%B %d, %Y")
        .map_err(|_| ScrapeError::ChangeDate(raw.to_string()))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

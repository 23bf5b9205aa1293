use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::types::{ParsedRoster, RosterField, RosterRow};

/// Why a pasted roster could not be turned into a `ParsedRoster`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    HeadingNotFound,
    MonthNotFound,
    YearNotFound,
    TableNotFound,
    HeaderMapping(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::HeadingNotFound => write!(f, "heading not found"),
            ParseError::MonthNotFound => write!(f, "month not found"),
            ParseError::YearNotFound => write!(f, "year not found"),
            ParseError::TableNotFound => write!(f, "table not found"),
            ParseError::HeaderMapping(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Month names as they appear after `normalize`, January first.
const MONTHS: [&str; 12] = [
    "janvier", "fevrier", "mars", "avril", "mai", "juin",
    "juillet", "aout", "septembre", "octobre", "novembre", "decembre",
];

/// A header matches a rule when its normalised text contains any of the needles.
struct HeaderRule {
    needles: &'static [&'static str],
    field: RosterField,
}

impl HeaderRule {
    fn matches(&self, header: &str) -> bool {
        self.needles.iter().any(|n| header.contains(n))
    }
}

// Evaluated top to bottom; first match wins. The date rule comes first, so any
// header mentioning "jour" (e.g. "Présidence du jour") is the date column.
const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule { needles: &["date", "jour"], field: RosterField::Date },
    HeaderRule { needles: &["presid"], field: RosterField::Presidence },
    HeaderRule { needles: &["pred", "message"], field: RosterField::Predicateur },
    HeaderRule { needles: &["musi", "chant", "louange"], field: RosterField::Musique },
    HeaderRule { needles: &["enfant", "ecole du dimanche"], field: RosterField::Enfants },
    HeaderRule { needles: &["accueil"], field: RosterField::Accueil },
    HeaderRule { needles: &["projec", "video"], field: RosterField::Projection },
    HeaderRule { needles: &["diffus", "direct", "streaming"], field: RosterField::Diffusion },
    HeaderRule { needles: &["menage", "nettoyage"], field: RosterField::Menage },
    HeaderRule { needles: &["observ", "remarque", "note"], field: RosterField::Observations },
];

static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector"));
static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static TABLE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year pattern"));

/// Lower-case, strip accents and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    collapse_whitespace(&folded)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Month number (1..=12) of the first month name found as a whole word.
pub fn extract_month(title: &str) -> Option<u32> {
    normalize(title)
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|word| MONTHS.iter().position(|m| *m == word))
        .map(|idx| idx as u32 + 1)
}

/// First standalone 4-digit number in the title.
pub fn extract_year(title: &str) -> Option<i32> {
    YEAR.captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Map a header cell to a roster field using the synonym table.
pub fn match_header(header: &str) -> Option<RosterField> {
    let normalized = normalize(header);
    if normalized.is_empty() {
        return None;
    }
    HEADER_RULES
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.field)
}

/// Direct `th`/`td` children of a table row.
fn row_cells<'a>(tr: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "th" | "td"))
        .collect()
}

/// Column index -> field, from the header row. A field is claimed by its first column only.
fn map_columns(header: ElementRef<'_>) -> Result<Vec<Option<RosterField>>, ParseError> {
    let mut columns: Vec<Option<RosterField>> = Vec::new();
    for cell in row_cells(header) {
        let field = match_header(&element_text(&cell)).filter(|f| !columns.contains(&Some(*f)));
        columns.push(field);
    }

    if !columns.contains(&Some(RosterField::Date)) {
        return Err(ParseError::HeaderMapping("date column not found".to_string()));
    }
    Ok(columns)
}

/// Parse a pasted heading + table fragment into a monthly roster.
pub fn parse(html: &str) -> Result<ParsedRoster, ParseError> {
    let fragment = Html::parse_fragment(html);

    let heading = fragment
        .select(&HEADING)
        .next()
        .ok_or(ParseError::HeadingNotFound)?;
    let title = element_text(&heading);

    let month = extract_month(&title).ok_or(ParseError::MonthNotFound)?;
    let year = extract_year(&title).ok_or(ParseError::YearNotFound)?;

    let table = fragment
        .select(&TABLE)
        .next()
        .ok_or(ParseError::TableNotFound)?;

    let mut trs = table.select(&TABLE_ROW);
    let header = trs
        .next()
        .ok_or_else(|| ParseError::HeaderMapping("table has no header row".to_string()))?;
    let columns = map_columns(header)?;

    let mut rows = Vec::new();
    for tr in trs {
        let mut row = RosterRow::default();
        for (idx, cell) in row_cells(tr).into_iter().enumerate() {
            if let Some(Some(field)) = columns.get(idx) {
                row.set(*field, &element_text(&cell));
            }
        }
        if row.date.is_empty() {
            continue;
        }
        rows.push(row);
    }

    log::debug!("Parsed roster '{}' ({}/{}) with {} rows", title, month, year, rows.len());

    Ok(ParsedRoster { title, month, year, rows })
}

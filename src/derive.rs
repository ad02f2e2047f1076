// src/derive.rs
//! Display-field derivation: date from catalogue id, cleaned title,
//! classification badge, score dots, detail link.
//!
//! Every function here is total. Anomalies in the input resolve to fallback
//! text instead of errors, so rendering a record can never fail.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{non_empty, EventRecord};

pub const DATE_UNKNOWN: &str = "date unknown";
pub const MONTH_UNKNOWN: &str = "unknown month";
pub const DEFAULT_DETAIL_BASE_URL: &str = "https://gracedb.ligo.org/superevents/";

/// Two-digit years at or above this resolve to the 1900s.
pub const YEAR_PIVOT: u32 = 80;
pub const SCORE_UNITS: usize = 10;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ASCII letters, then exactly six ASCII digits (a seventh digit breaks the match)
static RE_ID_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+([0-9]{2})([0-9]{2})([0-9]{2})(?:[^0-9]|$)").expect("id date regex")
});

static RE_TRAILING_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("trailing paren regex"));

fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTHS[(month - 1) as usize],
        _ => MONTH_UNKNOWN,
    }
}

/// `"S251117dq"` → `"17 November 2025"`, `"GW150914"` → `"14 September 2015"`.
pub fn derive_date_from_id(id: &str) -> String {
    let Some(caps) = RE_ID_DATE.captures(id) else {
        return DATE_UNKNOWN.to_string();
    };
    let num = |i: usize| caps[i].parse::<u32>().ok();
    let (Some(yy), Some(mm), Some(dd)) = (num(1), num(2), num(3)) else {
        return DATE_UNKNOWN.to_string();
    };

    let year = if yy >= YEAR_PIVOT { 1900 + yy } else { 2000 + yy };
    format!("{} {} {}", dd, month_name(mm), year)
}

/// Strips one trailing `(remark)`; returns the input untouched when there is none.
pub fn clean_title(title: &str) -> String {
    if RE_TRAILING_PAREN.is_match(title) {
        RE_TRAILING_PAREN.replace(title, "").trim().to_string()
    } else {
        title.to_string()
    }
}

/// Badge class + label for a free-text event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class: &'static str,
    pub label: &'static str,
}

impl Classification {
    pub const BLACK_HOLES: Self = Self {
        class: "bbh",
        label: "BLACK HOLES",
    };
    pub const NEUTRON_STARS: Self = Self {
        class: "bns",
        label: "NEUTRON STARS",
    };
    pub const MIXED: Self = Self {
        class: "mixed",
        label: "MIXED",
    };
    pub const COMPACT: Self = Self {
        class: "default",
        label: "COMPACT",
    };
}

/// Substring containment, first match wins: `bbh`, then `bns`, then `nsbh`.
pub fn classify_type(kind: Option<&str>) -> Classification {
    let t = kind.unwrap_or_default().to_lowercase();
    if t.contains("bbh") {
        Classification::BLACK_HOLES
    } else if t.contains("bns") {
        Classification::NEUTRON_STARS
    } else if t.contains("nsbh") {
        Classification::MIXED
    } else {
        Classification::COMPACT
    }
}

/// Fixed-length dot gauge. Unit `p` (1-based) is active iff `p <= score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDots([bool; SCORE_UNITS]);

impl ScoreDots {
    pub fn units(&self) -> &[bool; SCORE_UNITS] {
        &self.0
    }

    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|on| **on).count()
    }
}

/// No clamping: negative scores light nothing, scores above ten light everything.
pub fn render_score(score: i64) -> ScoreDots {
    let mut units = [false; SCORE_UNITS];
    for (i, unit) in units.iter_mut().enumerate() {
        *unit = (i as i64 + 1) <= score;
    }
    ScoreDots(units)
}

/// `readable_date` verbatim, else a formatted `date`, else derived from the id.
pub fn display_date(record: &EventRecord) -> String {
    if let Some(readable) = non_empty(&record.readable_date) {
        return readable.trim().to_string();
    }
    if let Some(raw) = non_empty(&record.date) {
        return format_raw_date(raw.trim()).unwrap_or_else(|| raw.trim().to_string());
    }
    derive_date_from_id(record.id_or_empty())
}

fn format_raw_date(raw: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S UTC").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(format!(
        "{} {} {}",
        date.day(),
        month_name(date.month()),
        date.year()
    ))
}

/// Link to the event page: the record's own `url`, else `{base}{id}/view/`.
pub fn detail_url(record: &EventRecord, base: &str) -> String {
    match non_empty(&record.url) {
        Some(url) => url.trim().to_string(),
        None => format!("{}{}/view/", base, record.id_or_empty()),
    }
}

/// Everything the card template needs, computed once per record.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub date: String,
    pub title: String,
    pub classification: Classification,
    pub score: Option<i64>,
    pub dots: ScoreDots,
    pub detail_url: String,
}

impl DerivedFields {
    pub fn from_record(record: &EventRecord, detail_base_url: &str) -> Self {
        Self {
            date: display_date(record),
            title: clean_title(record.title.as_deref().unwrap_or_default()),
            classification: classify_type(record.kind.as_deref()),
            score: record.score,
            dots: render_score(record.score.unwrap_or(0)),
            detail_url: detail_url(record, detail_base_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_date_superevent() {
        assert_eq!(derive_date_from_id("S251117dq"), "17 November 2025");
    }

    #[test]
    fn id_date_gw_catalogue_name() {
        assert_eq!(derive_date_from_id("GW150914"), "14 September 2015");
    }

    #[test]
    fn id_date_pivot_to_1900s() {
        assert_eq!(derive_date_from_id("S870224a"), "24 February 1987");
        assert_eq!(derive_date_from_id("S791231a"), "31 December 2079");
    }

    #[test]
    fn id_date_case_insensitive_and_no_leading_zero() {
        assert_eq!(derive_date_from_id("ms230501x"), "1 May 2023");
    }

    #[test]
    fn id_date_unknown_month() {
        assert_eq!(derive_date_from_id("S251317a"), "17 unknown month 2025");
        assert_eq!(derive_date_from_id("S250017a"), "17 unknown month 2025");
    }

    #[test]
    fn id_date_fallbacks() {
        assert_eq!(derive_date_from_id("X1"), DATE_UNKNOWN);
        assert_eq!(derive_date_from_id(""), DATE_UNKNOWN);
        assert_eq!(derive_date_from_id("251117"), DATE_UNKNOWN);
        assert_eq!(derive_date_from_id("S2511170"), DATE_UNKNOWN);
    }

    #[test]
    fn id_date_requires_ascii_digits_and_letters() {
        // Arabic-Indic and fullwidth digits
        assert_eq!(
            derive_date_from_id("S\u{0662}\u{0665}\u{0661}\u{0661}\u{0661}\u{0667}dq"),
            DATE_UNKNOWN
        );
        assert_eq!(
            derive_date_from_id("S\u{FF12}\u{FF15}\u{FF11}\u{FF11}\u{FF11}\u{FF17}dq"),
            DATE_UNKNOWN
        );
        // KELVIN SIGN and LONG S only fold to ASCII letters under Unicode case folding
        assert_eq!(derive_date_from_id("\u{212A}251117"), DATE_UNKNOWN);
        assert_eq!(derive_date_from_id("\u{017F}251117"), DATE_UNKNOWN);
        // a non-ASCII digit right after the run still ends it
        assert_eq!(derive_date_from_id("S251117\u{0662}"), "17 November 2025");
    }

    #[test]
    fn title_cleaning() {
        assert_eq!(clean_title("Merger Event (Unconfirmed)"), "Merger Event");
        assert_eq!(clean_title("Plain Title"), "Plain Title");
        assert_eq!(clean_title("A (b) (c)"), "A (b)");
        assert_eq!(clean_title("Mid (paren) title"), "Mid (paren) title");
        assert_eq!(clean_title("Trailing (x)  "), "Trailing");
    }

    #[test]
    fn classification_priority() {
        assert_eq!(classify_type(Some("BBH candidate")), Classification::BLACK_HOLES);
        assert_eq!(classify_type(Some("bns")), Classification::NEUTRON_STARS);
        assert_eq!(classify_type(Some("possible NSBH")), Classification::MIXED);
        assert_eq!(classify_type(Some("Terrestrial")), Classification::COMPACT);
        assert_eq!(classify_type(None), Classification::COMPACT);
        assert_eq!(Classification::COMPACT.label, "COMPACT");
    }

    #[test]
    fn score_dots_without_clamp() {
        assert_eq!(render_score(10).active_count(), 10);
        assert_eq!(render_score(0).active_count(), 0);
        assert_eq!(render_score(13).active_count(), 10);
        assert_eq!(render_score(-4).active_count(), 0);

        let three = render_score(3);
        assert_eq!(three.active_count(), 3);
        assert!(three.units()[2]);
        assert!(!three.units()[3]);
    }

    #[test]
    fn date_precedence() {
        let mut r = EventRecord {
            id: Some("S251117dq".into()),
            ..Default::default()
        };
        assert_eq!(display_date(&r), "17 November 2025");

        r.date = Some("2025-11-18 03:10:00 UTC".into());
        assert_eq!(display_date(&r), "18 November 2025");

        r.date = Some("2025-11-19T03:10:00Z".into());
        assert_eq!(display_date(&r), "19 November 2025");

        r.date = Some("last tuesday".into());
        assert_eq!(display_date(&r), "last tuesday");

        r.readable_date = Some("  ".into());
        assert_eq!(display_date(&r), "last tuesday");

        r.readable_date = Some("17 novembre 2025".into());
        assert_eq!(display_date(&r), "17 novembre 2025");
    }

    #[test]
    fn detail_url_prefers_record_url() {
        let mut r = EventRecord {
            id: Some("S251117dq".into()),
            ..Default::default()
        };
        assert_eq!(
            detail_url(&r, DEFAULT_DETAIL_BASE_URL),
            "https://gracedb.ligo.org/superevents/S251117dq/view/"
        );
        r.url = Some("https://example.org/e/1".into());
        assert_eq!(detail_url(&r, DEFAULT_DETAIL_BASE_URL), "https://example.org/e/1");
    }
}

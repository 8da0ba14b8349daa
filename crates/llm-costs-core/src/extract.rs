//! Pricing-table extraction.
//!
//! Turns a parsed pricing page into a normalized [`RecordSet`]. Each
//! `<table>` is classified against a fixed-priority list of known header
//! shapes; rows under a recognized shape map to price fields plus the
//! provider/region constants of that section. Anything that does not fit
//! is skipped or recorded as an absent price; extraction never fails.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::record::{PricingRecord, RecordSet, PRICE_UNIT};

/// Which known header shape a table matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutKind {
    /// Name + input/output/batch-input/batch-output/cache-write/cache-read.
    Extended,
    /// Name + input price + output price.
    Simple,
}

/// A recognized table layout: a pure predicate over the normalized header
/// row, plus the constants rows parsed under it inherit.
struct Layout {
    kind: LayoutKind,
    columns: usize,
    provider: &'static str,
    region: &'static str,
    matches: fn(&[String]) -> bool,
}

/// Known layouts, tried in order. First match wins; no match skips the
/// table.
const LAYOUTS: &[Layout] = &[
    Layout {
        kind: LayoutKind::Extended,
        columns: 7,
        provider: "Anthropic",
        region: "us-east-1 / us-west-2",
        matches: |headers: &[String]| {
            headers.first().is_some_and(|h| h.contains("anthropic models"))
        },
    },
    Layout {
        kind: LayoutKind::Simple,
        columns: 3,
        provider: "AI21 Labs",
        region: "us-east-1",
        matches: |headers: &[String]| {
            headers
                .get(1)
                .is_some_and(|h| h.contains("price per 1,000 input tokens"))
        },
    },
];

/// Result of one extraction pass over a document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: RecordSet,
    pub tables_seen: usize,
    pub tables_classified: usize,
    pub rows_skipped: usize,
}

impl Extraction {
    /// True when no table matched a known layout: the page shape likely
    /// changed. Distinct from individual tables or rows being skipped.
    pub fn layout_drift(&self) -> bool {
        self.tables_classified == 0
    }
}

/// Extract every recognizable pricing table from a parsed document.
///
/// Pure over the document: no network, no IO, and the same document
/// always yields the same record set.
pub fn extract(document: &Html) -> Extraction {
    let mut out = Extraction::default();

    let (table_sel, row_sel, cell_sel) = match (
        Selector::parse("table"),
        Selector::parse("tr"),
        Selector::parse("th, td"),
    ) {
        (Ok(t), Ok(r), Ok(c)) => (t, r, c),
        _ => return out,
    };

    for table in document.select(&table_sel) {
        out.tables_seen += 1;

        let rows: Vec<ElementRef> = table.select(&row_sel).collect();
        // A usable table has a header row and at least one data row.
        if rows.len() < 2 {
            continue;
        }

        let headers: Vec<String> = cells_text(&rows[0], &cell_sel)
            .into_iter()
            .map(|c| c.to_lowercase())
            .collect();
        if headers.is_empty() {
            continue;
        }

        let Some(layout) = LAYOUTS.iter().find(|l| (l.matches)(&headers)) else {
            debug!(?headers, "table matched no known layout, skipping");
            continue;
        };
        out.tables_classified += 1;

        for row in &rows[1..] {
            let cells = cells_text(row, &cell_sel);
            if cells.len() != layout.columns {
                out.rows_skipped += 1;
                continue;
            }
            let model_id = cells[0].clone();
            if model_id.is_empty() {
                out.rows_skipped += 1;
                continue;
            }
            out.records.insert(model_id, parse_row(layout, &cells));
        }
    }

    if out.layout_drift() {
        warn!(
            tables_seen = out.tables_seen,
            "no pricing tables recognized; page layout may have drifted"
        );
    } else {
        info!(
            records = out.records.len(),
            tables = out.tables_classified,
            rows_skipped = out.rows_skipped,
            "extracted pricing records"
        );
    }
    out
}

/// Convenience wrapper parsing raw HTML first.
pub fn extract_html(html: &str) -> Extraction {
    extract(&Html::parse_document(html))
}

/// One record from a data row under a classified layout.
fn parse_row(layout: &Layout, cells: &[String]) -> PricingRecord {
    let mut record = PricingRecord {
        input_price: parse_price(&cells[1]),
        output_price: parse_price(&cells[2]),
        batch_input_price: None,
        batch_output_price: None,
        cache_write_price: None,
        cache_read_price: None,
        unit: PRICE_UNIT.to_string(),
        provider: layout.provider.to_string(),
        region: layout.region.to_string(),
    };
    if layout.kind == LayoutKind::Extended {
        record.batch_input_price = parse_price(&cells[3]);
        record.batch_output_price = parse_price(&cells[4]);
        record.cache_write_price = parse_price(&cells[5]);
        record.cache_read_price = parse_price(&cells[6]);
    }
    record
}

/// Parse a price cell like `"$0.0188"` or `"$1,234.56 per model unit"`.
///
/// Strips the currency symbol and thousands separators, then parses the
/// first whitespace-delimited token. Anything unparsable (including a
/// negative number) is an absent price, never an error.
pub fn parse_price(cell: &str) -> Option<f64> {
    let cleaned = cell.replace(['$', ','], "");
    let token = cleaned.split_whitespace().next()?;
    token.parse::<f64>().ok().filter(|p| *p >= 0.0)
}

/// Text of each cell in a row: trimmed, with internal whitespace runs
/// (including newlines from nested markup) collapsed to single spaces.
fn cells_text(row: &ElementRef, cell_sel: &Selector) -> Vec<String> {
    row.select(cell_sel)
        .map(|cell| normalize_ws(&cell.text().collect::<String>()))
        .collect()
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

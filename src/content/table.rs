use std::fmt::Write as _;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::{Fragment, csv};

pub const PREVIEW_ROWS: usize = 5;

const TABLE_CLASS: &str = "w-full border-collapse border border-gray-300";
const HEADER_ROW_CLASS: &str = "bg-gray-100";
const TH_CLASS: &str = "border border-gray-300 px-3 py-2 text-left font-['Space_Mono'] font-medium";
const TR_CLASS: &str = "hover:bg-gray-50";
const TD_CLASS: &str = "border border-gray-300 px-3 py-2 font-['Inter']";
const CAPTION_CLASS: &str = "text-sm text-gray-600 mt-1 text-center font-['Inter'] italic";

pub type Row = IndexMap<String, String>;

/// Rows parsed from a CSV document, keyed by the header line.
///
/// A row only holds the cells its record actually had, so a short record
/// yields fewer keys. Column order always comes from the first row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    rows: Vec<Row>,
}

impl TableData {
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, crate::Error> {
        if rows.is_empty() {
            return Err(crate::Error::Parse("No data found in CSV".into()));
        }
        Ok(Self { rows })
    }

    pub fn from_csv(src: &str) -> Result<Self, crate::Error> {
        let mut records = csv::parse_records(src)
            .map_err(|e| crate::Error::Parse(e.to_string()))?
            .into_iter();
        let Some(header) = records.next() else {
            return Err(crate::Error::Parse("No data found in CSV".into()));
        };
        let header = unique_headers(header);
        let rows = records
            .map(|record| {
                header
                    .iter()
                    .cloned()
                    .zip(record)
                    .collect::<Row>()
            })
            .collect::<Vec<_>>();
        debug!(rows = rows.len(), columns = header.len(), "parsed CSV");
        Self::from_rows(rows)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.rows
            .first()
            .into_iter()
            .flat_map(|row| row.keys().map(String::as_str))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Repeated names get a `_N` suffix (`a`, `a_1`, `a_2`) so every column
/// keeps its own key.
fn unique_headers(header: Vec<String>) -> Vec<String> {
    let mut seen = IndexSet::with_capacity(header.len());
    for name in header {
        let mut unique = name.clone();
        let mut n = 1;
        while seen.contains(&unique) {
            unique = format!("{name}_{n}");
            n += 1;
        }
        seen.insert(unique);
    }
    seen.into_iter().collect()
}

fn write_header(out: &mut String, headers: &[&str], th_class: &str) {
    write!(out, r#"<thead><tr class="{HEADER_ROW_CLASS}">"#).unwrap();
    for header in headers {
        write!(out, r#"<th class="{th_class}">{header}</th>"#).unwrap();
    }
    out.push_str("</tr></thead>");
}

fn write_row(out: &mut String, headers: &[&str], row: &Row, tr_class: Option<&str>) {
    match tr_class {
        Some(class) => write!(out, r#"<tr class="{class}">"#).unwrap(),
        None => out.push_str("<tr>"),
    }
    for header in headers {
        let cell = row.get(*header).map(String::as_str).unwrap_or_default();
        write!(out, r#"<td class="{TD_CLASS}">{cell}</td>"#).unwrap();
    }
    out.push_str("</tr>");
}

/// The table as it is inserted into a post, with an optional italic caption.
pub fn table_fragment(data: &TableData, caption: Option<&str>) -> Fragment {
    let headers = data.headers().collect::<Vec<_>>();
    let mut out = String::new();
    write!(out, r#"<div class="overflow-x-auto my-2"><table class="{TABLE_CLASS}">"#).unwrap();
    write_header(&mut out, &headers, TH_CLASS);
    out.push_str("<tbody>");
    for row in data.rows() {
        write_row(&mut out, &headers, row, Some(TR_CLASS));
    }
    out.push_str("</tbody></table>");
    if let Some(caption) = caption.map(str::trim).filter(|c| !c.is_empty()) {
        write!(out, r#"<p class="{CAPTION_CLASS}">{caption}</p>"#).unwrap();
    }
    out.push_str("</div>");
    Fragment::block(out)
}

/// A compact rendering of the first few rows, shown right after a CSV is
/// loaded.
pub fn table_preview(data: &TableData) -> String {
    let headers = data.headers().collect::<Vec<_>>();
    let mut out = String::new();
    write!(out, r#"<table class="{TABLE_CLASS}">"#).unwrap();
    write_header(
        &mut out,
        &headers,
        "border border-gray-300 px-3 py-2 text-left font-['Space_Mono']",
    );
    out.push_str("<tbody>");
    for row in data.rows().iter().take(PREVIEW_ROWS) {
        write_row(&mut out, &headers, row, None);
    }
    if data.len() > PREVIEW_ROWS {
        write!(
            out,
            r#"<tr><td colspan="{}" class="text-center text-gray-500 font-['Inter']">... and {} more rows</td></tr>"#,
            headers.len(),
            data.len() - PREVIEW_ROWS
        )
        .unwrap();
    }
    out.push_str("</tbody></table>");
    out
}

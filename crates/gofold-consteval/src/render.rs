//! Human and machine renderings of a constant table.

use crate::format::{format_constant, FormatOptions};
use crate::table::{ConstEntry, ConstTable};
use gofold_common::SourceMap;
use serde::Serialize;

const INVALID: &str = "<error>";

/// One constant as it appears in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstRow {
    pub name: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub value: Option<String>,
    pub exported: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub implicit: bool,
}

impl ConstRow {
    pub fn new(entry: &ConstEntry, sources: &SourceMap, opts: &FormatOptions) -> Self {
        let file = sources.get(entry.span.source);
        Self {
            name: entry.name.to_string(),
            file: file.as_ref().map(|f| f.name()),
            line: file.as_ref().map(|f| f.line_number(entry.span.start)),
            ty: entry.constant.as_ref().map(|c| c.ty.to_string()),
            value: entry.constant.as_ref().map(|c| format_constant(c, opts)),
            exported: entry.exported,
            implicit: entry.implicit,
        }
    }
}

pub fn rows(table: &ConstTable, sources: &SourceMap, opts: &FormatOptions) -> Vec<ConstRow> {
    table.iter().map(|e| ConstRow::new(e, sources, opts)).collect()
}

/// Render the table as aligned `LINE NAME TYPE VALUE` columns.
pub fn render_text(table: &ConstTable, sources: &SourceMap, opts: &FormatOptions) -> String {
    let rows = rows(table, sources, opts);
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.line.map(|l| l.to_string()).unwrap_or_default(),
                r.name.clone(),
                r.ty.clone().unwrap_or_else(|| INVALID.to_string()),
                r.value.clone().unwrap_or_else(|| INVALID.to_string()),
            ]
        })
        .collect();

    let header = ["LINE", "NAME", "TYPE", "VALUE"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(&cells) {
        let line = format!(
            "{:>w0$}  {:<w1$}  {:<w2$}  {}",
            row[0],
            row[1],
            row[2],
            row[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_json(
    table: &ConstTable,
    sources: &SourceMap,
    opts: &FormatOptions,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&rows(table, sources, opts))
}

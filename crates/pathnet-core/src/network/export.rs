//! Plan files: node positions and style bypasses as CSV or JSON.
//!
//! Names and values are written verbatim: a node called `-ATP` must match
//! `-ATP` in the network the plan is applied to.

use super::plan::PathwayLayout;
use crate::error::Result;
use crate::storage::csv::escape_csv_field;
use crate::storage::{RetryPolicy, write_text};
use pathnet_engine::engine::format_number;
use pathnet_engine::style::Bypass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanFormat {
    #[default]
    Csv,
    Json,
}

impl PlanFormat {
    /// JSON for a `.json` path, CSV otherwise.
    pub fn for_path(path: &Path) -> PlanFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => PlanFormat::Json,
            _ => PlanFormat::Csv,
        }
    }
}

impl FromStr for PlanFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(PlanFormat::Csv),
            "json" => Ok(PlanFormat::Json),
            other => Err(format!("unknown plan format: {}", other)),
        }
    }
}

impl fmt::Display for PlanFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFormat::Csv => f.write_str("csv"),
            PlanFormat::Json => f.write_str("json"),
        }
    }
}

fn csv_line(fields: &[&str]) -> String {
    let escaped: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
    let mut line = escaped.join(",");
    line.push('\n');
    line
}

/// Placements of every layout, pathway by pathway.
pub fn render_layouts(layouts: &[PathwayLayout], format: PlanFormat) -> Result<String> {
    match format {
        PlanFormat::Json => Ok(serde_json::to_string_pretty(layouts)?),
        PlanFormat::Csv => {
            let mut out = String::from("name,x,y\n");
            for p in layouts.iter().flat_map(|l| &l.placements) {
                let mut line = escape_csv_field(&p.name);
                line.push(',');
                line.push_str(&format_number(p.x));
                line.push(',');
                line.push_str(&format_number(p.y));
                line.push('\n');
                out.push_str(&line);
            }
            Ok(out)
        }
    }
}

pub fn render_bypasses(bypasses: &[Bypass], format: PlanFormat) -> Result<String> {
    match format {
        PlanFormat::Json => Ok(serde_json::to_string_pretty(bypasses)?),
        PlanFormat::Csv => {
            let mut out = String::from("element,id,property,value\n");
            for b in bypasses {
                let element = b.element.to_string();
                out.push_str(&csv_line(&[&element, &b.id, &b.property, &b.value]));
            }
            Ok(out)
        }
    }
}

pub fn write_layouts(
    path: &Path,
    layouts: &[PathwayLayout],
    format: PlanFormat,
    retry: &RetryPolicy,
) -> Result<()> {
    write_text(path, &render_layouts(layouts, format)?, retry)
}

pub fn write_bypasses(
    path: &Path,
    bypasses: &[Bypass],
    format: PlanFormat,
    retry: &RetryPolicy,
) -> Result<()> {
    write_text(path, &render_bypasses(bypasses, format)?, retry)
}

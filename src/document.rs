//! Extracted-document model: the table/text-extraction layer runs out of
//! process and hands us one JSON file per source document, shaped
//! `document → pages → rows of cells` plus a plain-text rendering per page.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Page {
    /// Table rows, flattened across the page's tables.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Full-text rendering of the page; used by the plain-text adapter only.
    #[serde(default)]
    pub text: String,
}

impl Document {
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Load one extracted document. A missing source file is not an error:
/// the vendor simply contributes no rows this run.
pub fn load(path: &Path) -> Result<Option<Document>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let doc = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(doc))
}

// ── Tests ──

// src/parser/mod.rs
// =============================================================================
// This module turns llms.txt text into a structured document.
//
// The llms.txt layout (https://llmstxt.org) looks like this:
//
//   # Project Name
//
//   > One paragraph summary of the project.
//
//   Free-form details: anything up to the first section heading.
//
//   ## Docs
//
//   - [Quick start](https://example.com/start.md): How to get going
//   - [API](/api.md)
//
// Submodules:
// - document: splits the text into title / description / details / sections
// - markdown: reads one "- [name](url): notes" list item
// =============================================================================

mod document;
mod markdown;

use serde::{Deserialize, Serialize};

pub use document::parse_llms_txt;

/// A parsed llms.txt file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmsTxt {
    /// Text of the single H1 heading
    pub title: String,
    /// The blockquote right below the title
    pub description: Option<String>,
    /// Everything between the description and the first section
    pub details: Option<String>,
    pub sections: Vec<Section>,
}

/// One "## Heading" and the links listed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    pub files: Vec<FileEntry>,
}

/// One "- [name](url): notes" line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    /// Link destination exactly as written (may be relative)
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LlmsTxt {
    // Iterates over every file entry of every section, in document order
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.sections.iter().flat_map(|section| section.files.iter())
    }
}

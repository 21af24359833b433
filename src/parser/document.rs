// src/parser/document.rs
// =============================================================================
// Splits llms.txt text into its parts, line by line.
//
// Order of the parts is fixed by the format:
//   1. exactly one "# Title"
//   2. an optional "> description" blockquote
//   3. optional free-form details
//   4. zero or more "## Section" blocks holding the file lists
//
// Lines inside fenced code blocks (``` or ~~~) are never treated as headings,
// so a "# comment" inside a shell snippet in the details is safe.
// =============================================================================

use crate::error::ParseError;

use super::markdown::read_file_entry;
use super::{LlmsTxt, Section};

// What the previous lines have told us about where we are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Title,
    Description,
    Details,
    Sections,
}

// Parses llms.txt text
//
// Fails only when the text has no usable title; everything else is lenient
// (unknown lines in sections are skipped, not rejected).
pub fn parse_llms_txt(text: &str) -> Result<LlmsTxt, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut part = Part::Title;
    let mut title = String::new();
    let mut description: Vec<String> = Vec::new();
    let mut details: Vec<&str> = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut fence: Option<char> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();

        // Code fences: everything inside is plain text for whichever part we are in
        if let Some(marker) = fence_marker(trimmed) {
            fence = match fence {
                Some(open) if open == marker => None,
                Some(open) => Some(open),
                None => Some(marker),
            };
        }
        let in_fence = fence.is_some() || fence_marker(trimmed).is_some();

        if !in_fence {
            if let Some(text) = heading(trimmed, 1) {
                if part != Part::Title {
                    return Err(ParseError::MultipleTitles { line: index + 1 });
                }
                if text.is_empty() {
                    return Err(ParseError::EmptyTitle);
                }
                title = text.to_string();
                part = Part::Description;
                continue;
            }
        }

        match part {
            Part::Title => {
                if !trimmed.is_empty() {
                    return Err(ParseError::MissingTitle);
                }
            }
            Part::Description => {
                if trimmed.is_empty() && description.is_empty() {
                    continue;
                }
                if let Some(quoted) = trimmed.strip_prefix('>') {
                    let quoted = quoted.trim();
                    if !quoted.is_empty() {
                        description.push(quoted.to_string());
                    }
                    continue;
                }
                part = Part::Details;
                if !in_fence && start_section(trimmed, &mut sections) {
                    part = Part::Sections;
                } else {
                    details.push(line);
                }
            }
            Part::Details => {
                if !in_fence && start_section(trimmed, &mut sections) {
                    part = Part::Sections;
                } else {
                    details.push(line);
                }
            }
            Part::Sections => {
                if in_fence || start_section(trimmed, &mut sections) {
                    continue;
                }
                let entry = read_file_entry(trimmed);
                if let (Some(section), Some(entry)) = (sections.last_mut(), entry) {
                    section.files.push(entry);
                }
            }
        }
    }

    Ok(LlmsTxt {
        title,
        description: non_empty(description.join(" ")),
        details: non_empty(details.join("\n").trim().to_string()),
        sections,
    })
}

// Opens a new section when the line is a "## Name" heading
fn start_section(line: &str, sections: &mut Vec<Section>) -> bool {
    match heading(line, 2) {
        Some(name) => {
            sections.push(Section {
                name: name.to_string(),
                files: Vec::new(),
            });
            true
        }
        None => false,
    }
}

// Returns the heading text when the line is an ATX heading of exactly `level`
fn heading(line: &str, level: usize) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes != level {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some("");
    }
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    // Closing hashes ("## Docs ##") are decoration
    Some(rest.trim().trim_end_matches('#').trim_end())
}

fn fence_marker(line: &str) -> Option<char> {
    if line.starts_with("```") {
        Some('`')
    } else if line.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// src/parser/markdown.rs
// =============================================================================
// This module reads a single llms.txt file entry from a Markdown list item.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (list item, link, text, etc.)
// - Follows the CommonMark specification, so escapes, autolinks and
//   <angle-bracket> destinations all work the way authors expect
//
// A file entry is a list item whose FIRST inline element is a link:
//
//   - [Guide](https://example.com/guide.md): Setup and first steps
//     ^^^^^^^ name  ^^^^^^^^^^^^^^^^^^^^^^^^  ^^^^^^^^^^^^^^^^^^^^^^ notes
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

use super::FileEntry;

// Where we are inside the list item while walking the events
enum Position {
    // Inside the item, nothing seen yet
    BeforeLink,
    // Inside [ ... ] of the leading link
    InLink,
    // Past the closing ) of the leading link
    AfterLink,
}

// Reads a list item line into a FileEntry
//
// Returns None when the line is not a list item, or when the item does not
// start with a link (e.g. "- see [docs](x)").
pub fn read_file_entry(line: &str) -> Option<FileEntry> {
    let line = line.trim_start();
    if !is_list_item(line) {
        return None;
    }

    let mut position = Position::BeforeLink;
    let mut name = String::new();
    let mut url = String::new();
    let mut notes = String::new();
    let mut depth = 0usize;

    for event in Parser::new(line) {
        match event {
            Event::Start(Tag::Item) => depth += 1,
            Event::End(Tag::Item) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }

            Event::Start(Tag::Link(_link_type, dest_url, _title)) => match position {
                Position::BeforeLink => {
                    url = dest_url.to_string();
                    position = Position::InLink;
                }
                // Later links are just part of the notes
                Position::InLink | Position::AfterLink => {}
            },
            Event::End(Tag::Link(..)) => {
                if matches!(position, Position::InLink) {
                    position = Position::AfterLink;
                }
            }

            Event::Text(text) | Event::Code(text) => match position {
                Position::BeforeLink => {
                    if !text.trim().is_empty() {
                        return None;
                    }
                }
                Position::InLink => name.push_str(&text),
                Position::AfterLink => notes.push_str(&text),
            },
            Event::SoftBreak | Event::HardBreak => {
                if matches!(position, Position::AfterLink) {
                    notes.push(' ');
                }
            }

            _ => {}
        }
    }

    if matches!(position, Position::BeforeLink) {
        return None;
    }

    Some(FileEntry {
        name: name.trim().to_string(),
        url,
        notes: clean_notes(&notes),
    })
}

// "- ", "* " and "+ " bullets (ordered lists are not file entries)
fn is_list_item(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('-' | '*' | '+')) && matches!(chars.next(), Some(' ' | '\t'))
}

// Strips the ": " separator between link and notes
fn clean_notes(raw: &str) -> Option<String> {
    let notes = raw.trim();
    let notes = notes.strip_prefix(':').unwrap_or(notes).trim();
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}

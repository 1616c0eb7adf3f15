//! Defines the [`Entry`] type and the [`Parser`] that extracts entries
//! from the delimited diary source text. The source is a restricted,
//! hand-rolled subset of a front-matter convention: blocks separated by
//! `---`, each holding `title:` and `date:` lines and an optional
//! `content: |` literal block.

use crate::date;

/// One diary record parsed from the source text. Immutable once parsed;
/// every render cycle constructs entries fresh from the current source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The entry's headline. Date-only diaries omit it and let the feed
    /// renderer title items with the kanji date instead.
    pub title: Option<String>,

    /// The entry's calendar date as 8 decimal digits (`YYYYMMDD`). Always
    /// a valid Gregorian date; blocks failing that check are dropped.
    pub date: String,

    /// The entry body with internal newlines preserved verbatim. Renderers
    /// decide whether to flatten them to spaces (thumbnail) or map them to
    /// `<br />` (feed); the parser never flattens.
    pub content: String,
}

const DELIMITER: &str = "---";

/// Parses [`Entry`] records out of raw diary text.
pub struct Parser {
    /// Whether blocks without a `title:` line are kept. Title-and-date
    /// diaries set this so the feed never renders an untitled item;
    /// date-only diaries leave it off.
    require_title: bool,
}

impl Parser {
    pub fn new(require_title: bool) -> Parser {
        Parser { require_title }
    }

    /// Splits the source on the `---` delimiter and extracts one [`Entry`]
    /// per well-formed block, preserving source order. Blocks missing a
    /// required field are dropped, never an error.
    ///
    /// A content body that itself contains the `---` delimiter splits its
    /// block in two and is mangled. The source format has no escaping
    /// convention, so this is a documented limitation of the format rather
    /// than something the parser papers over.
    pub fn parse(&self, raw: &str) -> Vec<Entry> {
        raw.split(DELIMITER)
            .filter_map(|block| self.parse_block(block))
            .collect()
    }

    fn parse_block(&self, block: &str) -> Option<Entry> {
        let block = block.trim();
        if block.is_empty() {
            return None;
        }

        let mut title = None;
        let mut date = None;
        let mut content: Vec<&str> = Vec::new();
        let mut in_content = false;

        for line in block.lines() {
            if in_content {
                content.push(strip_content_marker(line));
                continue;
            }
            let line = line.trim();
            if let Some(value) = line.strip_prefix("title:") {
                title = Some(value.trim().to_owned());
            } else if let Some(value) = line.strip_prefix("date:") {
                let value = value.trim();
                if date::parse(value).is_ok() {
                    date = Some(value.to_owned());
                }
            } else if line.strip_prefix("content:").map(str::trim) == Some("|") {
                in_content = true;
            }
        }

        let date = date?;
        if self.require_title && title.is_none() {
            return None;
        }

        // Trim blank lines off both ends of the content, keeping interior
        // newlines intact.
        let start = content
            .iter()
            .position(|line| !line.is_empty())
            .unwrap_or(content.len());
        let end = content
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(start, |i| i + 1);

        Some(Entry {
            title,
            date,
            content: content[start..end].join("\n"),
        })
    }
}

/// Strips the literal-block indent from one content line: leading
/// whitespace, then an optional `|` marker and the whitespace after it.
fn strip_content_marker(line: &str) -> &str {
    let line = line.trim_start();
    match line.strip_prefix('|') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

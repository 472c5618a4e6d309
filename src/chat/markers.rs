//! In-band control markers
//!
//! Assistant messages may carry structured directives inside their text:
//!
//! ```text
//! COACHING_TIP:<text>END_COACHING_TIP
//! ROLE_PLAY_LEVEL:<digits>END_ROLE_PLAY_LEVEL
//! ```
//!
//! [`parse_markers`] pulls these out and returns the remaining display text.
//! Parsing never fails: a marker that is not well-formed is simply left in
//! the display content.

use std::ops::Range;

/// Opening sentinel of a coaching tip
pub const COACHING_TIP_START: &str = "COACHING_TIP:";
/// Closing sentinel of a coaching tip
pub const COACHING_TIP_END: &str = "END_COACHING_TIP";
/// Opening sentinel of a role-play depth level
pub const ROLE_PLAY_LEVEL_START: &str = "ROLE_PLAY_LEVEL:";
/// Closing sentinel of a role-play depth level
pub const ROLE_PLAY_LEVEL_END: &str = "END_ROLE_PLAY_LEVEL";

/// Level shown by renderers when a message carries no usable level
pub const DEFAULT_ROLE_PLAY_LEVEL: u64 = 1;

/// Metadata and display text derived from one message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedMessage {
    /// Trimmed text of the first coaching tip, if any
    pub coaching_tip: Option<String>,
    /// Role-play depth of the first level marker, if any
    pub role_play_level: Option<u64>,
    /// Content with every extracted marker span removed, trimmed
    pub display_content: String,
}

impl ParsedMessage {
    /// Role-play level for presentation, defaulting to level 1
    pub fn level_or_default(&self) -> u64 {
        self.role_play_level.unwrap_or(DEFAULT_ROLE_PLAY_LEVEL)
    }

    /// True when neither marker was extracted
    pub fn is_plain(&self) -> bool {
        self.coaching_tip.is_none() && self.role_play_level.is_none()
    }
}

/// A located marker: the whole delimited span and the text between sentinels
#[derive(Debug)]
struct MarkerMatch<'a> {
    span: Range<usize>,
    payload: &'a str,
}

/// Extract coaching tip and role-play level from `content`
///
/// Both markers are searched for in the unmodified content independently, so
/// their order does not matter and one never hides the other. Only the first
/// occurrence of each is extracted. Markers formed by joining the text around
/// a removed span are stripped as well, so the display content never carries
/// a well-formed marker.
///
/// # Arguments
/// * `content` - Raw message text
///
/// # Returns
/// * `ParsedMessage` - metadata plus content with the matched spans removed
pub fn parse_markers(content: &str) -> ParsedMessage {
    let tip = find_coaching_tip(content);
    let level = find_role_play_level(content);

    let mut spans: Vec<Range<usize>> = Vec::with_capacity(2);
    if let Some(m) = &tip {
        spans.push(m.span.clone());
    }
    if let Some(m) = &level {
        spans.push(m.span.clone());
    }

    ParsedMessage {
        coaching_tip: tip.map(|m| m.payload.trim().to_string()),
        // digits that overflow still count as a marker; the span is removed
        role_play_level: level.and_then(|m| m.payload.parse::<u64>().ok()),
        display_content: strip_joined_markers(remove_spans(content, spans))
            .trim()
            .to_string(),
    }
}

/// Remove markers that only exist because a removal joined their halves
///
/// Each pass shortens the text, so the loop ends.
fn strip_joined_markers(mut display: String) -> String {
    loop {
        let spans: Vec<Range<usize>> = find_coaching_tip(&display)
            .map(|m| m.span)
            .into_iter()
            .chain(find_role_play_level(&display).map(|m| m.span))
            .collect();
        if spans.is_empty() {
            return display;
        }
        display = remove_spans(&display, spans);
    }
}

/// Shortest `COACHING_TIP:` ... `END_COACHING_TIP` span with a non-empty payload
fn find_coaching_tip(content: &str) -> Option<MarkerMatch<'_>> {
    let start = content.find(COACHING_TIP_START)?;
    let payload_start = start + COACHING_TIP_START.len();

    // payload holds at least one character
    let first = content[payload_start..].chars().next()?;
    let search_from = payload_start + first.len_utf8();
    let payload_end = search_from + content[search_from..].find(COACHING_TIP_END)?;

    Some(MarkerMatch {
        span: start..payload_end + COACHING_TIP_END.len(),
        payload: &content[payload_start..payload_end],
    })
}

/// First `ROLE_PLAY_LEVEL:<digits>END_ROLE_PLAY_LEVEL` span
///
/// An opening sentinel that is not followed by digits and the closing
/// sentinel is skipped, and the scan continues after it.
fn find_role_play_level(content: &str) -> Option<MarkerMatch<'_>> {
    let mut from = 0;
    while let Some(offset) = content[from..].find(ROLE_PLAY_LEVEL_START) {
        let start = from + offset;
        let digits_start = start + ROLE_PLAY_LEVEL_START.len();
        let digits_len = content[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        let digits_end = digits_start + digits_len;

        if digits_len > 0 && content[digits_end..].starts_with(ROLE_PLAY_LEVEL_END) {
            return Some(MarkerMatch {
                span: start..digits_end + ROLE_PLAY_LEVEL_END.len(),
                payload: &content[digits_start..digits_end],
            });
        }

        // sentinel starts with an ASCII byte, so start + 1 is a char boundary
        from = start + 1;
    }
    None
}

/// Copy `content` without the given byte ranges (overlaps are merged)
fn remove_spans(content: &str, mut spans: Vec<Range<usize>>) -> String {
    if spans.is_empty() {
        return content.to_string();
    }
    spans.sort_by_key(|s| s.start);

    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            out.push_str(&content[cursor..span.start]);
        }
        cursor = cursor.max(span.end);
    }
    out.push_str(&content[cursor..]);
    out
}

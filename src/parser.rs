//! Caption text parser with 4-strategy segmentation.
//!
//! Turns the free-form text a vision model returns into an ordered list of
//! display-ready captions. Handles the common output shapes:
//! 1. Options separated by blank lines
//! 2. `**Option N (Category):**` headers or `1.` / `2.` numbered lists
//! 3. One caption per line
//! 4. A short run of sentences, one caption each
//!
//! Every segment is then cleaned (header lines, bold markers, leftover
//! `Option N:` labels and surrounding quotes removed) and deduplicated.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Lines at or above this many characters are treated as wrapped prose when
/// deciding whether a newline split is meaningful.
pub const SHORT_LINE_LIMIT: usize = 120;

/// Maximum number of sentences accepted as separate captions. Arbitrary;
/// long single captions with many sentences stay whole above this bound.
pub const SENTENCE_LIMIT: usize = 10;

const LABEL_LINE_LIMIT: usize = 60;
const CATEGORY_LINE_LIMIT: usize = 40;
const BARE_LABEL_WORDS: usize = 3;

static UI_TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)📋\s*copy|💬\s*share").unwrap());

static UI_TOKEN_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:📋\s*copy|💬\s*share)$").unwrap());

static BLANK_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

static NEWLINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

static SEGMENT_START_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:(?:\*\*[ \t]*)?Option[ \t]*\d+|\d+\.)").unwrap()
});

static SENTENCE_END_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

static OPTION_HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*{0,2}\s*Option\s*\d+").unwrap());

static CATEGORY_LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?[A-Za-z\s&-]{1,30}\)?$").unwrap());

static OPTION_LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Option\s*\d+\s*(?:\([^)]*\))?\s*[:)\-–—]?\s*").unwrap());

static BOLD_OPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*\*\s*Option\s*\d+[^*]*\*\*\s*(.*)$").unwrap());

static BARE_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z&\s-]+$").unwrap());

static LIST_MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// Parse a raw model response into an ordered, deduplicated list of captions.
///
/// Never fails and never returns an empty list: empty or unusable input
/// yields a single (possibly empty) caption so callers always have a slot
/// to render.
///
/// Segmentation strategies are tried in order and the first one producing
/// at least two segments wins (see [`SegmentStrategy`]). If none does, the
/// whole text is one segment.
pub fn parse_captions(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return vec![String::new()];
    }

    let normalized = strip_ui_tokens(raw);

    let segments = SegmentStrategy::ALL
        .iter()
        .find_map(|strategy| {
            let parts = strategy.split(&normalized)?;
            log::trace!("{} strategy produced {} segments", strategy.name(), parts.len());
            Some(parts)
        })
        .unwrap_or_else(|| vec![normalized.trim().to_string()]);

    let mut seen = HashSet::new();
    let captions: Vec<String> = segments
        .iter()
        .map(|s| clean_caption(s))
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .collect();

    if captions.is_empty() {
        return vec![clean_caption(&normalized)];
    }

    captions
}

/// Remove copy/share UI tokens (`📋 Copy`, `💬 Share`) anywhere in the text.
pub fn strip_ui_tokens(text: &str) -> String {
    UI_TOKEN_PATTERN.replace_all(text, "").into_owned()
}

/// A named way of cutting a response into caption segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStrategy {
    /// Split on one or more blank lines.
    BlankLines,
    /// Split before `Option N` headers and `N.` list items.
    OptionHeaders,
    /// Split on single newlines when at least one line is short.
    ShortLines,
    /// Split after `.`, `!` or `?` followed by whitespace.
    Sentences,
}

impl SegmentStrategy {
    /// All strategies in the order they are tried.
    pub const ALL: [SegmentStrategy; 4] = [
        SegmentStrategy::BlankLines,
        SegmentStrategy::OptionHeaders,
        SegmentStrategy::ShortLines,
        SegmentStrategy::Sentences,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SegmentStrategy::BlankLines => "blank-lines",
            SegmentStrategy::OptionHeaders => "option-headers",
            SegmentStrategy::ShortLines => "short-lines",
            SegmentStrategy::Sentences => "sentences",
        }
    }

    /// Split `text` into trimmed, non-empty segments.
    ///
    /// Returns `None` unless the strategy applies and yields at least two
    /// segments.
    pub fn split(&self, text: &str) -> Option<Vec<String>> {
        let parts = match self {
            SegmentStrategy::BlankLines => non_empty(BLANK_LINE_PATTERN.split(text)),
            SegmentStrategy::OptionHeaders => split_at_headers(text),
            SegmentStrategy::ShortLines => {
                let lines = non_empty(NEWLINE_PATTERN.split(text));
                if !lines.iter().any(|l| l.chars().count() < SHORT_LINE_LIMIT) {
                    return None;
                }
                lines
            }
            SegmentStrategy::Sentences => {
                let sentences = split_sentences(text);
                if sentences.len() > SENTENCE_LIMIT {
                    return None;
                }
                sentences
            }
        };

        if parts.len() > 1 {
            Some(parts)
        } else {
            None
        }
    }
}

fn non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cut before every header match; each segment keeps its own header.
fn split_at_headers(text: &str) -> Vec<String> {
    let mut starts: Vec<usize> = SEGMENT_START_PATTERN
        .find_iter(text)
        .map(|m| m.start())
        .collect();
    starts.insert(0, 0);
    starts.push(text.len());
    starts.dedup();

    non_empty(starts.windows(2).map(|w| &text[w[0]..w[1]]))
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut from = 0;
    for m in SENTENCE_END_PATTERN.find_iter(text) {
        // Keep the punctuation with its sentence.
        pieces.push(&text[from..m.start() + 1]);
        from = m.end();
    }
    pieces.push(&text[from..]);
    non_empty(pieces.into_iter())
}

/// Clean one segment into a display-ready caption.
///
/// Strips leading header lines, bold markers, a leftover `Option N:` label
/// or `N.` list marker, surrounding whitespace and one pair of quotes.
/// Repeats until nothing changes, so cleaning a cleaned caption is a no-op.
pub fn clean_caption(segment: &str) -> String {
    let mut current = clean_once(segment);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(segment: &str) -> String {
    let body = strip_header_lines(segment).replace("**", "");
    let body = OPTION_LABEL_PATTERN.replace(&body, "");
    let body = LIST_MARKER_PATTERN.replace(body.trim(), "");
    let body = body.trim();
    let body = body.strip_prefix('"').unwrap_or(body);
    let body = body.strip_suffix('"').unwrap_or(body);
    body.to_string()
}

/// Drop header-like lines from the top of a segment and join the rest with
/// single spaces.
///
/// A line is a header if any of these match, checked in order:
/// a bare copy/share token, an `Option N` header, a short line ending in a
/// colon or dash, or a short parenthetical category label. Scanning stops at
/// the first line that is none of these.
///
/// The last line of a segment is kept when it is an `Option N` line whose
/// label is followed by caption text (`**Option 1:** Sunny vibes`); the
/// label is removed during cleaning. A trailing `Option N: Playful` is still
/// a header.
pub fn strip_header_lines(segment: &str) -> String {
    const HEADER_PREDICATES: [fn(&str) -> bool; 4] = [
        is_ui_token_line,
        is_option_header,
        is_label_line,
        is_category_label,
    ];

    let lines = non_empty(NEWLINE_PATTERN.split(segment));
    let body_start = lines
        .iter()
        .enumerate()
        .position(|(i, line)| {
            let inline_option =
                i + 1 == lines.len() && is_option_header(line) && has_inline_caption(line);
            inline_option || !HEADER_PREDICATES.iter().any(|is_header| is_header(line))
        })
        .unwrap_or(lines.len());

    lines[body_start..].join(" ")
}

fn is_ui_token_line(line: &str) -> bool {
    UI_TOKEN_LINE_PATTERN.is_match(line)
}

fn is_option_header(line: &str) -> bool {
    OPTION_HEADER_PATTERN.is_match(line)
}

/// Whether an `Option N` line carries caption text after its label.
///
/// Text after a closing bold marker (`**Option 1:** text`) always counts.
/// Otherwise the text after the label must not look like a category: a
/// parenthetical label or at most three bare words.
fn has_inline_caption(line: &str) -> bool {
    if let Some(caps) = BOLD_OPTION_PATTERN.captures(line) {
        return caps.get(1).is_some_and(|m| !m.as_str().trim().is_empty());
    }

    let unbolded = line.replace("**", "");
    let rest = OPTION_LABEL_PATTERN.replace(&unbolded, "");
    let rest = rest.trim();
    !rest.is_empty() && !is_category_label(rest) && !is_bare_label(rest)
}

fn is_bare_label(text: &str) -> bool {
    BARE_LABEL_PATTERN.is_match(text) && text.split_whitespace().count() <= BARE_LABEL_WORDS
}

fn is_label_line(line: &str) -> bool {
    line.chars().count() < LABEL_LINE_LIMIT && line.ends_with([':', '-', '–', '—'])
}

fn is_category_label(line: &str) -> bool {
    line.chars().count() < CATEGORY_LINE_LIMIT
        && line.contains('(')
        && CATEGORY_LABEL_PATTERN.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Strategy 1: Blank lines ──

    #[test]
    fn blank_lines_split() {
        let parts = SegmentStrategy::BlankLines
            .split("First caption.\n\n\nSecond caption.\n  \nThird.")
            .unwrap();
        assert_eq!(parts, vec!["First caption.", "Second caption.", "Third."]);
    }

    #[test]
    fn blank_lines_single_paragraph_declines() {
        assert!(SegmentStrategy::BlankLines.split("one\ntwo").is_none());
    }

    // ── Strategy 2: Option headers ──

    #[test]
    fn option_headers_keep_their_header() {
        let input = "**Option 1:** Sunny vibes\n**Option 2:** Beach please";
        let parts = SegmentStrategy::OptionHeaders.split(input).unwrap();
        assert_eq!(parts, vec!["**Option 1:** Sunny vibes", "**Option 2:** Beach please"]);
    }

    #[test]
    fn option_headers_keep_preamble() {
        let input = "Here you go\nOption 1) Hello\noption 2: World";
        let parts = SegmentStrategy::OptionHeaders.split(input).unwrap();
        assert_eq!(parts, vec!["Here you go", "Option 1) Hello", "option 2: World"]);
    }

    #[test]
    fn numbered_list_split() {
        let input = "1. Beach day bliss\n2. Sandy toes\n10. Last one";
        let parts = SegmentStrategy::OptionHeaders.split(input).unwrap();
        assert_eq!(parts, vec!["1. Beach day bliss", "2. Sandy toes", "10. Last one"]);
    }

    #[test]
    fn mid_line_option_is_not_a_header() {
        assert!(SegmentStrategy::OptionHeaders
            .split("Pick Option 1 or Option 2.")
            .is_none());
    }

    // ── Strategy 3: Short lines ──

    #[test]
    fn short_lines_split() {
        let parts = SegmentStrategy::ShortLines.split("Hello sun\nHello sea").unwrap();
        assert_eq!(parts, vec!["Hello sun", "Hello sea"]);
    }

    #[test]
    fn long_wrapped_lines_decline() {
        let line = "word ".repeat(30);
        let input = format!("{}\n{}", line, line);
        assert!(SegmentStrategy::ShortLines.split(&input).is_none());
    }

    // ── Strategy 4: Sentences ──

    #[test]
    fn sentences_split() {
        let parts = SegmentStrategy::Sentences.split("Sun. Smiles! Repeat?").unwrap();
        assert_eq!(parts, vec!["Sun.", "Smiles!", "Repeat?"]);
    }

    #[test]
    fn single_sentence_declines() {
        assert!(SegmentStrategy::Sentences.split("Just one sentence.").is_none());
    }

    #[test]
    fn too_many_sentences_decline() {
        let input = "Go. ".repeat(SENTENCE_LIMIT + 1);
        assert!(SegmentStrategy::Sentences.split(&input).is_none());
    }

    #[test]
    fn sentence_limit_is_inclusive() {
        let input = "Go. ".repeat(SENTENCE_LIMIT);
        let parts = SegmentStrategy::Sentences.split(&input).unwrap();
        assert_eq!(parts.len(), SENTENCE_LIMIT);
    }

    // ── Header stripping ──

    #[test]
    fn strips_option_and_category_headers() {
        let input = "**Option 1 (Playful):**\n(Playful)\nLiving for golden hour.";
        assert_eq!(strip_header_lines(input), "Living for golden hour.");
    }

    #[test]
    fn strips_label_lines_with_dashes() {
        assert_eq!(strip_header_lines("Short & sweet —\nSun."), "Sun.");
        assert_eq!(strip_header_lines("Caption:\nSun."), "Sun.");
    }

    #[test]
    fn stops_at_first_body_line() {
        let input = "Option 2:\nFirst body line\nSecond:";
        assert_eq!(strip_header_lines(input), "First body line Second:");
    }

    #[test]
    fn trailing_option_line_is_kept() {
        assert_eq!(strip_header_lines("**Option 1:** Sunny vibes"), "**Option 1:** Sunny vibes");
    }

    #[test]
    fn trailing_option_category_is_a_header() {
        assert_eq!(strip_header_lines("**Option 1: Playful**"), "");
        assert_eq!(strip_header_lines("Option 2: Romantic"), "");
        assert_eq!(strip_header_lines("Option 3 - Short & sweet"), "");
        assert_eq!(strip_header_lines("Option 4: (Witty)"), "");
        assert_eq!(strip_header_lines("**Option 5 (Short):**"), "");
    }

    #[test]
    fn trailing_option_sentence_is_kept() {
        assert_eq!(
            strip_header_lines("Option 2: Golden hour, golden heart."),
            "Option 2: Golden hour, golden heart."
        );
    }

    #[test]
    fn long_colon_line_is_body() {
        let line = format!("{}:", "a".repeat(LABEL_LINE_LIMIT));
        assert_eq!(strip_header_lines(&line), line);
    }

    #[test]
    fn parenthesis_required_for_category() {
        assert_eq!(strip_header_lines("Playful"), "Playful");
        assert_eq!(strip_header_lines("(Playful)\nHi"), "Hi");
    }

    // ── Cleaning ──

    #[test]
    fn clean_removes_bold_and_quotes() {
        assert_eq!(clean_caption("**\"Sun. Smiles. Repeat.\"**"), "Sun. Smiles. Repeat.");
    }

    #[test]
    fn clean_removes_leftover_labels() {
        assert_eq!(clean_caption("  Option 3: Hello, world!"), "Hello, world!");
        assert_eq!(clean_caption("2. Sandy toes"), "Sandy toes");
    }

    #[test]
    fn clean_removes_inline_option_with_category() {
        assert_eq!(clean_caption("**Option 2 (Short):** Sun. Smiles."), "Sun. Smiles.");
    }

    #[test]
    fn clean_is_idempotent_for_quoted_labels() {
        let once = clean_caption("\"Fun time:\"");
        assert_eq!(clean_caption(&once), once);
    }

    #[test]
    fn clean_leaves_decimal_numbers() {
        assert_eq!(clean_caption("3.5 stars of fun"), "3.5 stars of fun");
    }

    #[test]
    fn ui_tokens_removed_case_insensitive() {
        assert_eq!(strip_ui_tokens("Nice 📋COPY shot 💬  share"), "Nice  shot ");
    }

    // ── Full parse ──

    #[test]
    fn empty_input() {
        assert_eq!(parse_captions(""), vec![""]);
        assert_eq!(parse_captions("  \n\n \t"), vec![""]);
    }

    #[test]
    fn only_headers_falls_back_to_single_slot() {
        assert_eq!(parse_captions("**Option 1:**\n\n📋 Copy"), vec![""]);
    }

    #[test]
    fn inline_option_headers() {
        let captions = parse_captions("**Option 1:** Sunny vibes\n**Option 2:** Beach please");
        assert_eq!(captions, vec!["Sunny vibes", "Beach please"]);
    }

    #[test]
    fn bold_category_headers_in_own_paragraph() {
        let raw = "**Option 1: Playful**\n\nLiving for golden hour.\n\n**Option 2: Short**\n\nSun. Smiles. Repeat.";
        assert_eq!(
            parse_captions(raw),
            vec!["Living for golden hour.", "Sun. Smiles. Repeat."]
        );
    }

    #[test]
    fn dash_and_colon_category_headers() {
        let raw = "Option 1 - Playful\n\"Golden hour glow\"\n\nOption 2: Romantic\n\nYou and me.";
        assert_eq!(parse_captions(raw), vec!["Golden hour glow", "You and me."]);
    }

    #[test]
    fn blank_line_wins_over_sentences() {
        let captions = parse_captions("One. Two.\n\nThree.");
        assert_eq!(captions, vec!["One. Two.", "Three."]);
    }
}

//! Line wrapping and pagination for exported text.
//!
//! Each source line becomes one block. Blocks are greedily word-wrapped to the
//! page's text width at whitespace, keeping the source's own spacing; a word
//! wider than a whole line is split by characters.
//! An empty source line still occupies one line slot. Lines flow onto a new page
//! once the bottom break margin would be crossed.

use super::font_metrics::{FontMetricTable, PageConfig};

/// One rendered page: the text of each line slot, top to bottom.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LaidOutPage {
    pub lines: Vec<String>,
}

/// Lays out `text` into pages. Always returns at least one page.
pub fn layout_text(text: &str, config: &PageConfig, metrics: &FontMetricTable) -> Vec<LaidOutPage> {
    let max_width = config.text_width_em();
    let per_page = config.lines_per_page();

    let lines: Vec<String> = text
        .split('\n')
        .flat_map(|line| wrap_line(line.trim_end_matches('\r'), max_width, metrics))
        .collect();

    let mut pages: Vec<LaidOutPage> = lines
        .chunks(per_page)
        .map(|chunk| LaidOutPage {
            lines: chunk.to_vec(),
        })
        .collect();

    if pages.is_empty() {
        pages.push(LaidOutPage::default());
    }
    pages
}

/// Greedy word-wrap of a single source line. Returns one entry per printed line.
///
/// Whitespace runs are kept as written (indentation, repeated spaces, tabs); only
/// the run at which a line breaks is consumed, so a line that fits is returned
/// unchanged.
pub fn wrap_line(line: &str, max_width: f32, metrics: &FontMetricTable) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    // Whitespace since the last word, placed only once the next word is.
    let mut gap = String::new();

    for (is_space, run) in whitespace_runs(line) {
        if is_space {
            gap.push_str(run);
            continue;
        }

        let word_w = metrics.measure_str(run);
        if !current.is_empty() && current_width + metrics.measure_str(&gap) + word_w > max_width {
            out.push(std::mem::take(&mut current));
            current_width = 0.0;
            gap.clear();
        }

        current_width += metrics.measure_str(&gap);
        current.push_str(&gap);
        gap.clear();

        if current_width + word_w > max_width {
            // Too wide even for a fresh line: hard-break it, keeping the tail open
            // so following words can share its line.
            current.push_str(run);
            let mut pieces = split_long_word(&current, max_width, metrics);
            let tail = pieces.pop().unwrap_or_default();
            out.extend(pieces);
            current_width = metrics.measure_str(&tail);
            current = tail;
            continue;
        }

        current.push_str(run);
        current_width += word_w;
    }

    current.push_str(&gap);
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Splits a line into alternating whitespace and non-whitespace runs, in order.
fn whitespace_runs(line: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut previous: Option<bool> = None;

    for (i, c) in line.char_indices() {
        let is_space = c.is_whitespace();
        if let Some(prev) = previous {
            if prev != is_space {
                runs.push((prev, &line[start..i]));
                start = i;
            }
        }
        previous = Some(is_space);
    }
    if let Some(prev) = previous {
        runs.push((prev, &line[start..]));
    }
    runs
}

fn split_long_word(word: &str, max_width: f32, metrics: &FontMetricTable) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let w = metrics.measure_char(c);
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::font_metrics::{default_page_config, HELVETICA};

    #[test]
    fn test_short_lines_map_one_to_one() {
        let pages = layout_text("Summary\nSkills", &default_page_config(), &HELVETICA);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines, vec!["Summary", "Skills"]);
    }

    #[test]
    fn test_blank_source_line_keeps_its_slot() {
        let pages = layout_text("Summary\n\nSkills", &default_page_config(), &HELVETICA);
        assert_eq!(pages[0].lines, vec!["Summary", "", "Skills"]);
    }

    #[test]
    fn test_empty_text_is_one_blank_page() {
        let pages = layout_text("", &default_page_config(), &HELVETICA);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines, vec![""]);
    }

    #[test]
    fn test_long_line_wraps_within_width() {
        let config = default_page_config();
        let line = "Designed and operated low-latency Rust services for payments ".repeat(6);
        let wrapped = wrap_line(&line, config.text_width_em(), &HELVETICA);

        assert!(wrapped.len() > 1);
        for l in &wrapped {
            assert!(HELVETICA.measure_str(l.trim_end()) <= config.text_width_em());
        }
        // No words lost or reordered.
        assert_eq!(
            wrapped.join(" ").split_whitespace().collect::<Vec<_>>(),
            line.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_overlong_word_is_split_by_characters() {
        let config = default_page_config();
        let word = "W".repeat(200);
        let wrapped = wrap_line(&word, config.text_width_em(), &HELVETICA);

        assert!(wrapped.len() >= 4);
        assert_eq!(wrapped.concat(), word);
        for l in &wrapped {
            assert!(HELVETICA.measure_str(l) <= config.text_width_em());
        }
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let config = default_page_config();
        let per_page = config.lines_per_page();
        let text: Vec<String> = (0..per_page + 3).map(|i| format!("Line {i}")).collect();
        let pages = layout_text(&text.join("\n"), &config, &HELVETICA);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), per_page);
        assert_eq!(pages[1].lines.len(), 3);
        assert_eq!(pages[1].lines[0], format!("Line {per_page}"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let pages = layout_text("Summary\r\nSkills\r\n", &default_page_config(), &HELVETICA);
        assert_eq!(pages[0].lines, vec!["Summary", "Skills", ""]);
    }

    #[test]
    fn test_source_spacing_is_preserved() {
        let config = default_page_config();
        for line in ["  - Nested bullet", "Name:\tJane  Doe", "trailing   ", "   "] {
            assert_eq!(wrap_line(line, config.text_width_em(), &HELVETICA), vec![line]);
        }
    }

    #[test]
    fn test_break_consumes_only_the_breaking_gap() {
        let config = default_page_config();
        let line = format!("    {}", "Rust  services ".repeat(8));
        let wrapped = wrap_line(&line, config.text_width_em(), &HELVETICA);

        assert!(wrapped.len() > 1);
        assert!(wrapped[0].starts_with("    Rust  services"));
        for l in &wrapped[1..] {
            assert!(!l.starts_with(' '), "continuation line starts with a space: {l:?}");
        }
        let squeeze = |s: &str| s.split_whitespace().collect::<String>();
        assert_eq!(squeeze(&wrapped.concat()), squeeze(&line));
    }
}

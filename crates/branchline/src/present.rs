//! Text helpers for node cards.
//!
//! Lengths are counted in characters, not bytes.

const ELLIPSIS: char = '…';

/// Maximum number of lines produced by [`wrap_text`].
pub const MAX_LINES: usize = 2;

/// Formats a duration as `h:mm:ss`, or `m:ss` below one hour.
///
/// Zero yields `None`, as an unknown duration would.
///
/// ```
/// # use branchline::present::format_duration;
/// assert_eq!(format_duration(95).as_deref(), Some("1:35"));
/// assert_eq!(format_duration(3725).as_deref(), Some("1:02:05"));
/// assert_eq!(format_duration(0), None);
/// ```
pub fn format_duration(seconds: u64) -> Option<String> {
    if seconds == 0 {
        return None;
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    Some(if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    })
}

/// Shortens `text` to at most `max` characters, ending in an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Greedy word wrap to at most [`MAX_LINES`] lines of `max_width` characters.
///
/// Words longer than a line are cut. When text is dropped, the last line
/// ends with an ellipsis.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut has_more = false;

    for word in text.split(' ') {
        if lines.len() >= MAX_LINES {
            has_more = true;
            break;
        }

        let word_len = word.chars().count();
        if word_len > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if lines.len() < MAX_LINES {
                lines.push(truncate(word, max_width));
                has_more = true;
            }
            continue;
        }

        let candidate_len = if current.is_empty() {
            word_len
        } else {
            current.chars().count() + 1 + word_len
        };
        if candidate_len > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        if lines.len() < MAX_LINES {
            lines.push(current);
        } else {
            has_more = true;
        }
    }

    if has_more {
        if let Some(last) = lines.last_mut() {
            if !last.ends_with(ELLIPSIS) {
                last.push(ELLIPSIS);
            }
        }
    }
    lines
}

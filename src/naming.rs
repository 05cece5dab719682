//! Output-name suggestion segmentation.
//!
//! The filename edit offers truncated variants of the current name; the
//! menu entries come from cutting the name at the run boundaries computed
//! here.

/// Split `text` into the runs the truncation menu cuts at.
///
/// Runs are: a repeated punctuation mark, a bracketed span (up to and
/// including the matching closer), a digit run, or general text. General
/// text stops before punctuation, digits, or a `v`/`V` that is directly
/// followed by a digit (so `myfilev001` splits ahead of the `v`).
pub fn truncated_name_suggestions(text: &str) -> Vec<String> {
    const PUNCTUATION: &str = ",._-)]}+'";
    const OPENERS: &str = "([{";
    const CLOSERS: &str = ")]}";
    const BREAKERS: &str = ",._-()[]{}+'";

    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let first = chars[start];
        let mut end = start + 1;
        if PUNCTUATION.contains(first) {
            while end < chars.len() && chars[end] == first {
                end += 1;
            }
        } else if OPENERS.contains(first) {
            while end < chars.len() {
                if CLOSERS.contains(chars[end]) {
                    end += 1;
                    break;
                }
                end += 1;
            }
        } else if first.is_ascii_digit() {
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        } else {
            while end < chars.len() {
                let c = chars[end];
                let version_marker = (c == 'v' || c == 'V')
                    && end + 1 < chars.len()
                    && chars[end + 1].is_ascii_digit();
                if BREAKERS.contains(c) || c.is_ascii_digit() || version_marker {
                    break;
                }
                end += 1;
            }
        }
        runs.push(chars[start..end].iter().collect());
        start = end;
    }
    runs
}

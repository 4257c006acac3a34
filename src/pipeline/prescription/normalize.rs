//! Transcript normalization, sentence segmentation and output capitalization.

/// Lower-case and trim a transcript. All pattern matching runs on this form;
/// capitalization is re-applied only to output fields.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Split normalized text into sentence-like segments on `.`, `!` and `?`.
///
/// Runs of terminators count as one split, segments are trimmed and empty
/// ones dropped. A `.` between two ASCII digits is a decimal point
/// ("2.5mg"), not a terminator.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let is_decimal_point = ch == '.'
            && prev.is_some_and(|p| p.is_ascii_digit())
            && chars.peek().is_some_and(|&(_, next)| next.is_ascii_digit());

        if matches!(ch, '.' | '!' | '?') && !is_decimal_point {
            push_segment(&mut segments, &text[start..idx]);
            start = idx + ch.len_utf8();
        }
        prev = Some(ch);
    }
    push_segment(&mut segments, &text[start..]);

    segments
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed);
    }
}

/// First letter upper-case, the rest lower-case. Empty stays empty.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
        None => String::new(),
    }
}

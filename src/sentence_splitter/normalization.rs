/// Collapse interior line breaks and whitespace runs into single spaces and
/// trim both ends. `\r\n` counts as one break.
pub fn normalize_sentence(text: &str) -> String {
    normalize_sentence_with(text, " ")
}

/// Same as [`normalize_sentence`] but whitespace runs become `joiner`.
/// Unspaced scripts pass `""` so a wrapped line does not gain a space.
pub fn normalize_sentence_with(text: &str, joiner: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_sentence_into(text, joiner, &mut result);
    result
}

/// Normalize into a caller-supplied buffer, replacing its contents
pub fn normalize_sentence_into(text: &str, joiner: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_gap = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_gap = true;
            continue;
        }
        if pending_gap {
            buffer.push_str(joiner);
            pending_gap = false;
        }
        buffer.push(ch);
    }
}

/// Placeholder shown in place of the term in cloze sentences
pub const CLOZE_PLACEHOLDER: &str = "[...]";

/// Replace the first exact occurrence of `term_surface` in `sentence`
pub fn mask_term(sentence: &str, term_surface: &str, placeholder: &str) -> String {
    if term_surface.is_empty() {
        return sentence.to_string();
    }
    match sentence.find(term_surface) {
        Some(start) => {
            let end = start + term_surface.len();
            let mut masked = String::with_capacity(sentence.len() - term_surface.len() + placeholder.len());
            masked.push_str(&sentence[..start]);
            masked.push_str(placeholder);
            masked.push_str(&sentence[end..]);
            masked
        }
        None => sentence.to_string(),
    }
}

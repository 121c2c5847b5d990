//! Field escaping for the annotation format.
//!
//! TAB separates column groups and `|` separates fields, so both are escaped
//! inside a field together with the backslash and line breaks.

pub const GROUP_SEPARATOR: char = '\t';
pub const FIELD_SEPARATOR: char = '|';
const ESCAPE: char = '\\';

/// Append `field` to `out` with separators and line breaks escaped
pub fn escape_field_into(field: &str, out: &mut String) {
    for ch in field.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            FIELD_SEPARATOR => out.push_str("\\|"),
            GROUP_SEPARATOR => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
}

pub fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    escape_field_into(field, &mut out);
    out
}

/// Split one annotation line into groups of unescaped fields. An empty line
/// has no groups. The error is a human-readable reason.
pub fn split_line(line: &str) -> Result<Vec<Vec<String>>, String> {
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let mut groups = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            ESCAPE => match chars.next() {
                Some((_, ESCAPE)) => field.push(ESCAPE),
                Some((_, FIELD_SEPARATOR)) => field.push(FIELD_SEPARATOR),
                Some((_, 't')) => field.push(GROUP_SEPARATOR),
                Some((_, 'r')) => field.push('\r'),
                Some((_, 'n')) => field.push('\n'),
                Some((_, other)) => {
                    return Err(format!("unknown escape '\\{other}' at byte {offset}"));
                }
                None => return Err(format!("dangling escape at byte {offset}")),
            },
            FIELD_SEPARATOR => fields.push(std::mem::take(&mut field)),
            GROUP_SEPARATOR => {
                fields.push(std::mem::take(&mut field));
                groups.push(std::mem::take(&mut fields));
            }
            _ => field.push(ch),
        }
    }
    fields.push(field);
    groups.push(fields);

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_field("a|b\tc\\d\r\ne"), "a\\|b\\tc\\\\d\\r\\ne");
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn test_split_line_groups_and_fields() {
        let groups = split_line("Hello|Hallo|\tworld|Welt|vɛlt").unwrap();
        assert_eq!(
            groups,
            vec![
                vec!["Hello".to_string(), "Hallo".to_string(), String::new()],
                vec!["world".to_string(), "Welt".to_string(), "vɛlt".to_string()],
            ]
        );
    }

    #[test]
    fn test_split_line_unescapes() {
        let line = format!("{}|{}", escape_field("a|b"), escape_field("line\nbreak\\"));
        let groups = split_line(&line).unwrap();
        assert_eq!(groups[0], vec!["a|b".to_string(), "line\nbreak\\".to_string()]);
    }

    #[test]
    fn test_split_line_rejects_bad_escapes() {
        assert!(split_line("abc\\").unwrap_err().contains("dangling"));
        assert!(split_line("a\\xb|c").unwrap_err().contains("unknown escape"));
    }

    #[test]
    fn test_empty_line_and_empty_group() {
        assert!(split_line("").unwrap().is_empty());
        let groups = split_line("a|b\t\tc|d").unwrap();
        assert_eq!(groups[1], vec![String::new()]);
    }
}

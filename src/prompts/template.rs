//! Literal `{name}` substitution for prompt slots that embed raw JSON.
//!
//! A templating engine that treats `{{`/`}}` as delimiters would parse any
//! `{` or `}` inside a substituted JSON blob as template syntax and corrupt
//! the render. Plan, Coverage, and Draft prompts substitute pre-rendered
//! strings (conversation transcripts, tool-result JSON) directly, so they
//! use this single-pass literal replacement instead.

use std::collections::HashMap;

/// Replace every `{key}` occurrence in `template` with its value from
/// `values`. Keys not present in `values` are left untouched so a missing
/// slot is visible in the rendered prompt rather than silently dropped.
pub fn render(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = template[i + 1..].find('}') {
                let key = &template[i + 1..i + 1 + end];
                if let Some(value) = values.get(key) {
                    out.push_str(value);
                    i = i + 1 + end + 1;
                    continue;
                }
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_keys() {
        let mut values = HashMap::new();
        values.insert("conversation", "hello".to_string());
        let rendered = render("Conversation:\n{conversation}\nDone", &values);
        assert_eq!(rendered, "Conversation:\nhello\nDone");
    }

    #[test]
    fn leaves_unknown_keys_untouched() {
        let values = HashMap::new();
        let rendered = render("{unknown}", &values);
        assert_eq!(rendered, "{unknown}");
    }

    #[test]
    fn does_not_choke_on_embedded_json_braces() {
        let mut values = HashMap::new();
        values.insert("data", r#"{"a": 1, "b": [1,2,3]}"#.to_string());
        let rendered = render("Data: {data}", &values);
        assert_eq!(rendered, r#"Data: {"a": 1, "b": [1,2,3]}"#);
    }
}

//! HTML text escaping for the views and the map popups

/// Escape text for use in HTML element content or quoted attributes
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Serialize a value as JSON that can sit inside a `<script>` element
pub fn script_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Bar" & 'Grill'</b>"#),
            "&lt;b&gt;&quot;Bar&quot; &amp; &#39;Grill&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("Café Den Engel"), "Café Den Engel");
    }

    #[test]
    fn test_script_json_breaks_closing_tags() {
        let json = script_json(&vec!["</script><script>alert(1)"]).unwrap();
        assert!(!json.contains("</script>"));
    }
}

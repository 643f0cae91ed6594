//! Text escaping for feed payloads

/// Escape text for embedding in a feed entry.
///
/// The service expects exactly these four entities; apostrophes pass
/// through unescaped.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Normalize a column title into the gsx element name the service derives
/// from it: whitespace and underscores dropped, non-word characters dropped,
/// lowercased.
pub fn encode_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>\"x\"</tag>"), "&lt;tag&gt;&quot;x&quot;&lt;/tag&gt;");
        assert_eq!(escape_xml("it's"), "it's");
    }

    #[test]
    fn test_encode_column_name() {
        assert_eq!(encode_column_name("First Name"), "firstname");
        assert_eq!(encode_column_name("e-mail_address"), "emailaddress");
        assert_eq!(encode_column_name("Age (years)"), "ageyears");
    }
}

//! In-place patching of retained entry fragments
//!
//! The edit endpoints are strict about the XML they accept: a re-serialized
//! entry, even when semantically identical, gets rejected. Edits therefore
//! operate on the byte-exact fragment the service issued, replacing only the
//! targeted pieces and leaving every other byte untouched.

use super::escape::escape_xml;

/// Add namespace declarations to the opening `<entry>` tag of a fragment.
///
/// Existing attributes on the tag (etags and the like) are preserved.
/// Returns the fragment unchanged when it does not start with an entry tag.
pub fn inject_entry_namespaces(xml: &str, namespaces: &[(&str, &str)]) -> String {
    let rest = match xml.strip_prefix("<entry") {
        Some(rest) => rest,
        None => return xml.to_string(),
    };
    // Only patch when "<entry" is the complete tag name.
    if !rest.starts_with('>') && !rest.starts_with(' ') && !rest.starts_with('/') {
        return xml.to_string();
    }

    let mut decls = String::new();
    for (prefix, uri) in namespaces {
        if prefix.is_empty() {
            decls.push_str(&format!(" xmlns='{uri}'"));
        } else {
            decls.push_str(&format!(" xmlns:{prefix}='{uri}'"));
        }
    }
    format!("<entry{decls}{rest}")
}

/// Replace the text content of a `<gsx:{column}>` element in a fragment.
///
/// Handles the expanded form, the empty form and the self-closing form.
/// The new value is entity-escaped; all bytes outside the element are left
/// as-is. Fragments without the element come back unchanged.
pub fn set_gsx_value(xml: &str, column: &str, value: &str) -> String {
    let escaped = escape_xml(value);

    // <gsx:col>old</gsx:col>
    let open = format!("<gsx:{column}>");
    let close = format!("</gsx:{column}>");
    if let Some(start) = xml.find(&open) {
        let content_start = start + open.len();
        if let Some(rel_end) = xml[content_start..].find(&close) {
            let content_end = content_start + rel_end;
            return format!("{}{}{}", &xml[..content_start], escaped, &xml[content_end..]);
        }
    }

    // <gsx:col/> and <gsx:col />
    for selfclosing in [format!("<gsx:{column}/>"), format!("<gsx:{column} />")] {
        if let Some(start) = xml.find(&selfclosing) {
            let end = start + selfclosing.len();
            return format!("{}{}{}{}{}", &xml[..start], open, escaped, close, &xml[end..]);
        }
    }

    xml.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_namespaces_plain_tag() {
        let patched = inject_entry_namespaces(
            "<entry><id>x</id></entry>",
            &[("", "http://www.w3.org/2005/Atom")],
        );
        assert_eq!(
            patched,
            "<entry xmlns='http://www.w3.org/2005/Atom'><id>x</id></entry>"
        );
    }

    #[test]
    fn test_inject_namespaces_keeps_existing_attributes() {
        let patched = inject_entry_namespaces(
            r#"<entry gd:etag="W/abc"><id>x</id></entry>"#,
            &[("gsx", "http://schemas.google.com/spreadsheets/2006/extended")],
        );
        assert!(patched.starts_with(
            r#"<entry xmlns:gsx='http://schemas.google.com/spreadsheets/2006/extended' gd:etag="W/abc">"#
        ));
    }

    #[test]
    fn test_set_gsx_value_replaces_only_target() {
        let xml = "<entry><id>r1</id><gsx:name>Alice</gsx:name><gsx:age>30</gsx:age></entry>";
        let patched = set_gsx_value(xml, "age", "31");
        assert_eq!(
            patched,
            "<entry><id>r1</id><gsx:name>Alice</gsx:name><gsx:age>31</gsx:age></entry>"
        );
    }

    #[test]
    fn test_set_gsx_value_escapes() {
        let xml = "<entry><gsx:note>x</gsx:note></entry>";
        let patched = set_gsx_value(xml, "note", "a < b & c");
        assert_eq!(patched, "<entry><gsx:note>a &lt; b &amp; c</gsx:note></entry>");
    }

    #[test]
    fn test_set_gsx_value_expands_selfclosing() {
        let xml = "<entry><gsx:city/></entry>";
        assert_eq!(
            set_gsx_value(xml, "city", "Hanoi"),
            "<entry><gsx:city>Hanoi</gsx:city></entry>"
        );

        let xml = "<entry><gsx:city /></entry>";
        assert_eq!(
            set_gsx_value(xml, "city", "Hanoi"),
            "<entry><gsx:city>Hanoi</gsx:city></entry>"
        );
    }

    #[test]
    fn test_unrelated_bytes_preserved() {
        let xml = "<entry gd:etag='W/1'>\n  <id>r1</id>\n  <updated>2016-01-01</updated>\n  <gsx:a>1</gsx:a>\n  <gsx:b>2</gsx:b>\n</entry>";
        let patched = set_gsx_value(xml, "b", "9");
        // Everything except the b value is byte-identical.
        assert_eq!(patched.replace("<gsx:b>9</gsx:b>", "<gsx:b>2</gsx:b>"), xml);
    }

    #[test]
    fn test_missing_column_is_noop() {
        let xml = "<entry><gsx:a>1</gsx:a></entry>";
        assert_eq!(set_gsx_value(xml, "zzz", "x"), xml);
    }
}

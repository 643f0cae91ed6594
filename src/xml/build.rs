//! Builders for the payload shapes the service dictates
//!
//! Payloads are assembled as strings in the exact element order the service
//! accepts. Namespace URIs are fixed by the wire protocol.

use super::escape::{encode_column_name, escape_xml};

pub const NS_ATOM: &str = "http://www.w3.org/2005/Atom";
pub const NS_GS: &str = "http://schemas.google.com/spreadsheets/2006";
pub const NS_GSX: &str = "http://schemas.google.com/spreadsheets/2006/extended";
pub const NS_BATCH: &str = "http://schemas.google.com/gdata/batch";

/// Keys of a row map that never become gsx elements
const RESERVED_ROW_KEYS: [&str; 4] = ["id", "title", "content", "_links"];

/// Worksheet metadata entry, used both to create a worksheet and to update
/// its title and dimensions.
pub fn worksheet_entry(title: &str, row_count: u32, col_count: u32) -> String {
    let mut xml = format!(r#"<entry xmlns="{NS_ATOM}" xmlns:gs="{NS_GS}">"#);
    xml.push_str(&format!("<title>{}</title>", escape_xml(title)));
    xml.push_str(&format!("<gs:rowCount>{row_count}</gs:rowCount>"));
    xml.push_str(&format!("<gs:colCount>{col_count}</gs:colCount>"));
    xml.push_str("</entry>");
    xml
}

/// List-feed entry for appending a row. Column names are normalized the way
/// the service derives gsx element names from header titles; reserved keys
/// are skipped.
pub fn row_entry<'a>(columns: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut xml = format!(r#"<entry xmlns="{NS_ATOM}" xmlns:gsx="{NS_GSX}">"#);
    xml.push('\n');
    for (name, value) in columns {
        if RESERVED_ROW_KEYS.contains(&name) {
            continue;
        }
        let col = encode_column_name(name);
        if col.is_empty() {
            continue;
        }
        xml.push_str(&format!(
            "<gsx:{col}>{}</gsx:{col}>\n",
            escape_xml(value)
        ));
    }
    xml.push_str("</entry>");
    xml
}

/// Single-cell edit entry for a PUT to the cell's edit link
pub fn cell_entry(id: &str, edit_href: &str, row: u32, col: u32, input_value: &str) -> String {
    format!(
        concat!(
            r#"<entry xmlns='{atom}' xmlns:gs='{gs}'>"#,
            "<id>{id}</id>",
            r#"<link rel="edit" type="application/atom+xml" href="{href}"/>"#,
            r#"<gs:cell row="{row}" col="{col}" inputValue="{value}"/>"#,
            "</entry>"
        ),
        atom = NS_ATOM,
        gs = NS_GS,
        id = id,
        href = edit_href,
        row = row,
        col = col,
        value = escape_xml(input_value),
    )
}

/// One entry of a cells batch feed
pub fn batch_entry(
    id: &str,
    edit_href: &str,
    row: u32,
    col: u32,
    input_value: &str,
    operation: &str,
) -> String {
    format!(
        concat!(
            "<entry><batch:id>R{row}C{col}</batch:id>",
            r#"<batch:operation type="{op}" />"#,
            "<id>{id}</id>",
            r#"<link rel="edit" type="application/atom+xml" href="{href}"/>"#,
            r#"<gs:cell row="{row}" col="{col}" inputValue="{value}" />"#,
            "</entry>"
        ),
        row = row,
        col = col,
        op = operation,
        id = id,
        href = edit_href,
        value = escape_xml(input_value),
    )
}

/// Batch feed wrapper around pre-built batch entries. `cells_feed_href` is
/// the worksheet's cellsfeed link, which doubles as the feed id.
pub fn batch_feed(cells_feed_href: &str, entries: &str) -> String {
    format!(
        concat!(
            r#"<feed xmlns="{atom}" xmlns:batch="{batch}" xmlns:gs="{gs}">"#,
            "<id>{id}</id>{entries}</feed>"
        ),
        atom = NS_ATOM,
        batch = NS_BATCH,
        gs = NS_GS,
        id = cells_feed_href,
        entries = entries,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worksheet_entry_shape() {
        let xml = worksheet_entry("Expenses & Income", 50, 10);
        assert!(xml.starts_with(
            r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:gs="http://schemas.google.com/spreadsheets/2006">"#
        ));
        assert!(xml.contains("<title>Expenses &amp; Income</title>"));
        assert!(xml.contains("<gs:rowCount>50</gs:rowCount>"));
        assert!(xml.contains("<gs:colCount>10</gs:colCount>"));
        assert!(xml.ends_with("</entry>"));
    }

    #[test]
    fn test_row_entry_skips_reserved_and_normalizes() {
        let xml = row_entry([
            ("First Name", "Alice"),
            ("id", "nope"),
            ("title", "nope"),
            ("content", "nope"),
            ("_links", "nope"),
            ("Age", "30"),
        ]);
        assert!(xml.contains("<gsx:firstname>Alice</gsx:firstname>"));
        assert!(xml.contains("<gsx:age>30</gsx:age>"));
        assert!(!xml.contains("nope"));
    }

    #[test]
    fn test_cell_entry_shape() {
        let xml = cell_entry(
            "https://spreadsheets.google.com/feeds/cells/k/od6/private/full/R2C3",
            "https://spreadsheets.google.com/feeds/cells/k/od6/private/full/R2C3/v1",
            2,
            3,
            "=A1&\"x\"",
        );
        assert!(xml.contains(r#"<gs:cell row="2" col="3" inputValue="=A1&amp;&quot;x&quot;"/>"#));
        assert!(xml.contains(r#"link rel="edit""#));
    }

    #[test]
    fn test_batch_feed_shape() {
        let entry = batch_entry("cellid", "editurl", 1, 2, "v", "update");
        let feed = batch_feed("https://spreadsheets.google.com/feeds/cells/k/od6/private/full", &entry);
        assert!(entry.contains("<batch:id>R1C2</batch:id>"));
        assert!(entry.contains(r#"<batch:operation type="update" />"#));
        assert!(feed.starts_with("<feed "));
        assert!(feed.contains("<id>https://spreadsheets.google.com/feeds/cells/k/od6/private/full</id>"));
        assert!(feed.ends_with("</feed>"));
    }
}

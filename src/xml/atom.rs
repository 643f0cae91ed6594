//! Atom/GData feed parsing
//!
//! Feeds come back as Atom documents with `gs:`/`gsx:` namespaced
//! extensions. Parsing produces plain structs, but every `<entry>` also
//! keeps its byte-exact source fragment: the service rejects reformatted
//! XML on edit, so later writes patch that fragment instead of
//! regenerating it.

use indexmap::IndexMap;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use crate::error::{FeedError, Result};

/// A typed link attached to a feed or entry
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Full `rel` attribute value
    pub rel: String,
    /// Target URL
    pub href: String,
    /// Media type, when given
    pub kind: Option<String>,
}

/// Map key for a link: the fragment after `#` in `rel`, or the whole `rel`
/// when there is none. Gives `edit`, `self`, `listfeed`, `cellsfeed`, ...
fn link_key(rel: &str) -> String {
    match rel.rfind('#') {
        Some(idx) => rel[idx + 1..].to_string(),
        None => rel.to_string(),
    }
}

/// `gs:cell` element of a cells-feed entry
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    /// 1-based row coordinate
    pub row: u32,
    /// 1-based column coordinate
    pub col: u32,
    /// The literal value as entered (`inputValue` attribute)
    pub input_value: String,
    /// Numeric interpretation, when the service supplies one
    pub numeric_value: Option<f64>,
    /// Displayed value (element text)
    pub text: String,
}

/// One `<entry>` of a feed
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub updated: Option<String>,
    /// Links keyed by rel fragment (`edit`, `cellsfeed`, ...)
    pub links: IndexMap<String, Link>,
    /// `gs:`-namespaced scalar extensions (`rowCount`, `colCount`, ...)
    pub gs: HashMap<String, String>,
    /// `gsx:` column values of a list-feed entry, in document order
    pub gsx: IndexMap<String, String>,
    /// `gs:cell` payload of a cells-feed entry
    pub cell: Option<CellData>,
    /// Byte-exact source fragment, `<entry ...>` through `</entry>`
    pub raw_xml: String,
}

impl Entry {
    /// Href of a link by map key, or a `MissingLink` error
    pub fn link_href(&self, rel: &str) -> Result<&str> {
        self.links
            .get(rel)
            .map(|l| l.href.as_str())
            .ok_or_else(|| FeedError::MissingLink {
                rel: rel.to_string(),
            })
    }
}

/// A parsed Atom feed
#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub id: String,
    pub title: String,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub links: IndexMap<String, Link>,
    pub entries: Vec<Entry>,
}

/// Parse a feed document. A bare `<entry>` root (as returned by POSTs that
/// create a resource) is accepted and yields a feed with that one entry.
pub fn parse_feed(xml: &str) -> Result<Feed> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = Feed::default();
    // Path of element names from the root, for attributing text events
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<Entry> = None;
    let mut entry_start: usize = 0;
    // Offset of the upcoming event, i.e. position after the previous one
    let mut pos: usize = 0;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let in_entry = current.is_some();
                if !in_entry && name == "entry" {
                    // Whitespace between sibling elements is not reported as
                    // an event, so skip forward to the opening bracket.
                    entry_start = xml[pos..].find('<').map(|i| pos + i).unwrap_or(pos);
                    current = Some(Entry::default());
                } else if let Some(entry) = current.as_mut() {
                    if let Some(cell) = read_cell_attrs(&name, &e)? {
                        entry.cell = Some(cell);
                    } else if let Some(col) = name.strip_prefix("gsx:") {
                        // Pre-register the column so <gsx:x></gsx:x> still
                        // shows up as an empty value.
                        entry.gsx.entry(col.to_string()).or_default();
                    }
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "link" {
                    read_link_element(&e, &mut feed, current.as_mut())?;
                } else if let Some(entry) = current.as_mut() {
                    if let Some(cell) = read_cell_attrs(&name, &e)? {
                        entry.cell = Some(cell);
                    } else if let Some(col) = name.strip_prefix("gsx:") {
                        // Self-closing gsx element: empty column value
                        entry.gsx.insert(col.to_string(), String::new());
                    } else if let Some(key) = name.strip_prefix("gs:") {
                        entry.gs.insert(key.to_string(), String::new());
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                if let Some(leaf) = path.last() {
                    apply_text(leaf, &path, text, &mut feed, current.as_mut());
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.pop();
                if name == "entry" && path.len() <= 1 {
                    if let Some(mut entry) = current.take() {
                        let end = reader.buffer_position() as usize;
                        entry.raw_xml = xml[entry_start..end].to_string();
                        feed.entries.push(entry);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        pos = reader.buffer_position() as usize;
    }

    Ok(feed)
}

/// Parse a document whose payload is a single entry
pub fn parse_entry(xml: &str) -> Result<Entry> {
    let mut feed = parse_feed(xml)?;
    if feed.entries.is_empty() {
        return Err(FeedError::Xml("expected an <entry> element".to_string()));
    }
    Ok(feed.entries.remove(0))
}

fn read_link_element(
    e: &quick_xml::events::BytesStart<'_>,
    feed: &mut Feed,
    entry: Option<&mut Entry>,
) -> Result<()> {
    let mut rel = String::new();
    let mut href = String::new();
    let mut kind = None;
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"rel" => rel = value,
            b"href" => href = value,
            b"type" => kind = Some(value),
            _ => {}
        }
    }
    let link = Link { rel, href, kind };
    let key = link_key(&link.rel);
    match entry {
        Some(entry) => {
            entry.links.insert(key, link);
        }
        None => {
            feed.links.insert(key, link);
        }
    }
    Ok(())
}

/// Pull coordinates and values off a `gs:cell` element, if this is one
fn read_cell_attrs(
    name: &str,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<Option<CellData>> {
    if name != "gs:cell" {
        return Ok(None);
    }
    let mut cell = CellData {
        row: 0,
        col: 0,
        input_value: String::new(),
        numeric_value: None,
        text: String::new(),
    };
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"row" => cell.row = value.parse().unwrap_or(0),
            b"col" => cell.col = value.parse().unwrap_or(0),
            b"inputValue" => cell.input_value = value,
            b"numericValue" => cell.numeric_value = value.parse().ok(),
            _ => {}
        }
    }
    Ok(Some(cell))
}

/// Route a text event to the right field based on the element path
fn apply_text(
    leaf: &str,
    path: &[String],
    text: String,
    feed: &mut Feed,
    entry: Option<&mut Entry>,
) {
    match entry {
        Some(entry) => match leaf {
            "id" => entry.id = text,
            "title" => entry.title = text,
            "updated" => entry.updated = Some(text),
            "gs:cell" => {
                if let Some(cell) = entry.cell.as_mut() {
                    cell.text = text;
                }
            }
            other => {
                if let Some(col) = other.strip_prefix("gsx:") {
                    entry.gsx.insert(col.to_string(), text);
                } else if let Some(key) = other.strip_prefix("gs:") {
                    entry.gs.insert(key.to_string(), text);
                }
            }
        },
        None => match leaf {
            "id" if path.len() == 2 => feed.id = text,
            "title" if path.len() == 2 => feed.title = text,
            "updated" if path.len() == 2 => feed.updated = Some(text),
            "name" if path.ends_with(&["author".to_string(), "name".to_string()]) => {
                feed.author = Some(text)
            }
            _ => {}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSHEETS_FEED: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gs="http://schemas.google.com/spreadsheets/2006">
  <id>https://spreadsheets.google.com/feeds/worksheets/key1/private/full</id>
  <updated>2016-03-08T17:00:00.000Z</updated>
  <title>Budget</title>
  <author><name>owner</name><email>owner@example.com</email></author>
  <entry>
    <id>https://spreadsheets.google.com/feeds/worksheets/key1/private/full/od6</id>
    <updated>2016-03-08T17:00:00.000Z</updated>
    <title>Sheet1</title>
    <link rel="http://schemas.google.com/spreadsheets/2006#listfeed" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/key1/od6/private/full"/>
    <link rel="http://schemas.google.com/spreadsheets/2006#cellsfeed" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/cells/key1/od6/private/full"/>
    <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/worksheets/key1/private/full/od6/version"/>
    <gs:rowCount>100</gs:rowCount>
    <gs:colCount>20</gs:colCount>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_worksheets_feed() {
        let feed = parse_feed(WORKSHEETS_FEED).unwrap();
        assert_eq!(feed.title, "Budget");
        assert_eq!(feed.author.as_deref(), Some("owner"));
        assert_eq!(feed.entries.len(), 1);

        let ws = &feed.entries[0];
        assert_eq!(ws.title, "Sheet1");
        assert_eq!(ws.gs.get("rowCount").map(String::as_str), Some("100"));
        assert_eq!(ws.gs.get("colCount").map(String::as_str), Some("20"));
        assert!(ws.links.contains_key("listfeed"));
        assert!(ws.links.contains_key("cellsfeed"));
        assert!(ws
            .link_href("edit")
            .unwrap()
            .ends_with("od6/version"));
    }

    #[test]
    fn test_raw_fragment_is_byte_exact() {
        let feed = parse_feed(WORKSHEETS_FEED).unwrap();
        let raw = &feed.entries[0].raw_xml;
        assert!(raw.starts_with("<entry>"));
        assert!(raw.ends_with("</entry>"));
        // The fragment is a literal slice of the document.
        assert!(WORKSHEETS_FEED.contains(raw.as_str()));
        assert!(raw.contains("<gs:rowCount>100</gs:rowCount>"));
    }

    #[test]
    fn test_parse_list_entry_columns_in_order() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended">
<entry>
  <id>https://spreadsheets.google.com/feeds/list/key1/od6/private/full/row1</id>
  <title>Alice</title>
  <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/key1/od6/private/full/row1/v1"/>
  <gsx:name>Alice</gsx:name>
  <gsx:age>30</gsx:age>
  <gsx:city/>
</entry>
</feed>"#;
        let feed = parse_feed(xml).unwrap();
        let row = &feed.entries[0];
        let cols: Vec<_> = row.gsx.keys().cloned().collect();
        assert_eq!(cols, vec!["name", "age", "city"]);
        assert_eq!(row.gsx.get("age").map(String::as_str), Some("30"));
        assert_eq!(row.gsx.get("city").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_cell_entry() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gs="http://schemas.google.com/spreadsheets/2006">
<entry>
  <id>https://spreadsheets.google.com/feeds/cells/key1/od6/private/full/R2C3</id>
  <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/cells/key1/od6/private/full/R2C3/v2"/>
  <gs:cell row="2" col="3" inputValue="=SUM(A1:A5)" numericValue="12.5">12.5</gs:cell>
</entry>
</feed>"#;
        let feed = parse_feed(xml).unwrap();
        let cell = feed.entries[0].cell.as_ref().unwrap();
        assert_eq!(cell.row, 2);
        assert_eq!(cell.col, 3);
        assert_eq!(cell.input_value, "=SUM(A1:A5)");
        assert_eq!(cell.numeric_value, Some(12.5));
        assert_eq!(cell.text, "12.5");
    }

    #[test]
    fn test_parse_bare_entry_root() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:gs="http://schemas.google.com/spreadsheets/2006">
  <id>https://spreadsheets.google.com/feeds/worksheets/key1/private/full/od7</id>
  <title>New Sheet</title>
  <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/worksheets/key1/private/full/od7/v0"/>
  <gs:rowCount>10</gs:rowCount>
  <gs:colCount>5</gs:colCount>
</entry>"#;
        let entry = parse_entry(xml).unwrap();
        assert_eq!(entry.title, "New Sheet");
        assert_eq!(entry.gs.get("rowCount").map(String::as_str), Some("10"));
    }

    #[test]
    fn test_missing_link_is_typed_error() {
        let entry = Entry::default();
        let err = entry.link_href("edit").unwrap_err();
        assert!(matches!(err, FeedError::MissingLink { ref rel } if rel == "edit"));
    }
}

//! A row of the list feed
//!
//! Rows keep the raw `<entry>` fragment they were parsed from. Saving a row
//! patches column values into that fragment instead of regenerating it,
//! because the edit endpoint rejects XML it did not shape itself.

use indexmap::IndexMap;

use crate::client::FeedClient;
use crate::error::Result;
use crate::model::link_href;
use crate::xml::{build, encode_column_name, patch, Entry, Link};

/// One row: a mapping from normalized column names to string values
#[derive(Debug, Clone)]
pub struct Row {
    /// Entry id
    pub id: String,
    /// Entry title (the service mirrors the first column value here)
    pub title: String,
    columns: IndexMap<String, String>,
    links: IndexMap<String, Link>,
    raw_xml: String,
}

impl Row {
    pub(crate) fn from_entry(entry: Entry) -> Self {
        Row {
            id: entry.id,
            title: entry.title,
            columns: entry.gsx,
            links: entry.links,
            raw_xml: entry.raw_xml,
        }
    }

    /// Value of a column. The name is normalized the same way the service
    /// derives element names from header titles, so `"First Name"` and
    /// `"firstname"` address the same column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(&encode_column_name(column))
            .map(String::as_str)
    }

    /// Set a column value. Only columns the row already has can be set;
    /// the return value tells whether the column existed.
    pub fn set(&mut self, column: &str, value: impl Into<String>) -> bool {
        let key = encode_column_name(column);
        match self.columns.get_mut(&key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// All columns in document order
    pub fn columns(&self) -> &IndexMap<String, String> {
        &self.columns
    }

    /// The retained source fragment
    pub fn raw_xml(&self) -> &str {
        &self.raw_xml
    }

    /// Persist the row by patching current column values into the retained
    /// fragment and PUTting it to the edit link. Unrelated bytes of the
    /// fragment are preserved.
    pub fn save(&self, client: &mut FeedClient) -> Result<()> {
        let mut payload = patch::inject_entry_namespaces(
            &self.raw_xml,
            &[("", build::NS_ATOM), ("gsx", build::NS_GSX)],
        );
        for (column, value) in &self.columns {
            payload = patch::set_gsx_value(&payload, column, value);
        }
        let edit = link_href(&self.links, "edit")?;
        client.save_row(edit, payload)
    }

    /// Delete the row through its edit link
    pub fn delete(&self, client: &mut FeedClient) -> Result<()> {
        let edit = link_href(&self.links, "edit")?;
        client.delete_row(edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    fn sample_row() -> Row {
        let feed_xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended">
<entry><id>https://spreadsheets.google.com/feeds/list/k/od6/private/full/r1</id><updated>2016-01-01T00:00:00.000Z</updated><title>Alice</title><link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/k/od6/private/full/r1/v5"/><gsx:firstname>Alice</gsx:firstname><gsx:age>30</gsx:age></entry>
</feed>"#;
        let feed = xml::parse_feed(feed_xml).unwrap();
        Row::from_entry(feed.entries.into_iter().next().unwrap())
    }

    #[test]
    fn test_get_normalizes_column_names() {
        let row = sample_row();
        assert_eq!(row.get("firstname"), Some("Alice"));
        assert_eq!(row.get("First Name"), Some("Alice"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_set_only_existing_columns() {
        let mut row = sample_row();
        assert!(row.set("Age", "31"));
        assert_eq!(row.get("age"), Some("31"));
        assert!(!row.set("nosuch", "x"));
    }

    #[test]
    fn test_raw_fragment_retained() {
        let row = sample_row();
        assert!(row.raw_xml().starts_with("<entry>"));
        assert!(row.raw_xml().contains("<gsx:age>30</gsx:age>"));
    }
}

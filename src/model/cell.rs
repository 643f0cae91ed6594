//! A single cell of the cells feed

use indexmap::IndexMap;

use crate::client::FeedClient;
use crate::error::{FeedError, Result};
use crate::model::link_href;
use crate::xml::{build, Entry, Link};

/// One cell, with 1-based coordinates and a dirty flag set on mutation
#[derive(Debug, Clone)]
pub struct Cell {
    /// Entry id, also used as the id element of edit payloads
    pub id: String,
    row: u32,
    col: u32,
    value: String,
    input_value: String,
    numeric_value: Option<f64>,
    dirty: bool,
    links: IndexMap<String, Link>,
}

impl Cell {
    /// Build a cell from a cells-feed entry. Entries without a `gs:cell`
    /// element are malformed.
    pub(crate) fn from_entry(entry: Entry) -> Result<Self> {
        let data = entry
            .cell
            .ok_or_else(|| FeedError::Xml("cells-feed entry without gs:cell".to_string()))?;
        Ok(Cell {
            id: entry.id,
            row: data.row,
            col: data.col,
            value: data.text,
            input_value: data.input_value,
            numeric_value: data.numeric_value,
            dirty: false,
            links: entry.links,
        })
    }

    /// 1-based row coordinate
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 1-based column coordinate
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Displayed value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value as entered (formulas keep their `=` form here)
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// Numeric interpretation, when the service supplied one
    pub fn numeric_value(&self) -> Option<f64> {
        self.numeric_value
    }

    /// Whether the cell has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Change the cell value and mark it for saving
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.input_value = value.clone();
        self.value = value;
        self.dirty = true;
    }

    /// The cell value normalized into a list-feed column name: whitespace
    /// becomes underscores, other non-word characters are dropped,
    /// lowercased. Useful when the cell holds a header title.
    pub fn value_as_column_name(&self) -> String {
        let mut out = String::with_capacity(self.value.len());
        for ch in self.value.chars() {
            if ch.is_whitespace() {
                out.push('_');
            } else if ch.is_alphanumeric() || ch == '_' {
                out.extend(ch.to_lowercase());
            }
        }
        out
    }

    /// Batch-feed entry for this cell, or an empty string when there is
    /// nothing to save
    pub(crate) fn batch_entry(&self) -> Result<String> {
        if !self.dirty {
            return Ok(String::new());
        }
        let edit = link_href(&self.links, "edit")?;
        Ok(build::batch_entry(
            &self.id,
            edit,
            self.row,
            self.col,
            &self.value,
            "update",
        ))
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Save this cell on its own with a single PUT
    pub fn save(&mut self, client: &mut FeedClient) -> Result<()> {
        let edit = link_href(&self.links, "edit")?.to_string();
        let payload = build::cell_entry(&self.id, &edit, self.row, self.col, &self.value);
        client.save_cell(&edit, payload)?;
        self.dirty = false;
        Ok(())
    }
}

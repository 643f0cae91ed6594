//! A worksheet of the worksheets feed

use indexmap::IndexMap;

use crate::client::FeedClient;
use crate::error::Result;
use crate::model::{link_href, Cell, Row};
use crate::query::{CellQuery, RowQuery};
use crate::xml::{build, Entry, Link};

/// One worksheet: identity, dimensions, typed links and a lazily loaded
/// cell collection
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Service-assigned worksheet id (the tail of the entry id)
    pub id: String,
    pub title: String,
    pub row_count: u32,
    pub col_count: u32,
    /// Typed links: `listfeed`, `cellsfeed`, `edit`, ...
    pub links: IndexMap<String, Link>,
    cells: Vec<Cell>,
}

impl Worksheet {
    pub(crate) fn from_entry(entry: Entry) -> Self {
        let id = entry
            .id
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let row_count = entry
            .gs
            .get("rowCount")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let col_count = entry
            .gs
            .get("colCount")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        Worksheet {
            id,
            title: entry.title,
            row_count,
            col_count,
            links: entry.links,
            cells: Vec::new(),
        }
    }

    /// Rename and/or resize the worksheet
    pub fn update_metadata(
        &mut self,
        client: &mut FeedClient,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()> {
        let edit = link_href(&self.links, "edit")?.to_string();
        client.update_worksheet_metadata(&edit, title, rows, cols)?;
        self.title = title.to_string();
        self.row_count = rows;
        self.col_count = cols;
        Ok(())
    }

    /// Fetch rows from the list feed. The first worksheet row is the header
    /// and never part of the results.
    pub fn get_rows(&self, client: &mut FeedClient, query: &RowQuery) -> Result<Vec<Row>> {
        client.get_rows(&self.id, query)
    }

    /// Append a row. Column names are matched against the header titles
    /// after normalization; reserved names (`id`, `title`, `content`,
    /// `_links`) are ignored.
    pub fn add_row(&self, client: &mut FeedClient, columns: &[(&str, &str)]) -> Result<Row> {
        let payload = build::row_entry(columns.iter().copied());
        client.add_row(&self.id, payload)
    }

    /// Fetch cells from the cells feed and keep them on the worksheet for
    /// later batch saving
    pub fn get_cells(&mut self, client: &mut FeedClient, query: &CellQuery) -> Result<&mut [Cell]> {
        self.cells = client.get_cells(&self.id, query)?;
        Ok(&mut self.cells)
    }

    /// Cells from the last [`get_cells`](Self::get_cells) call
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to the loaded cells, for staging edits
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Save all dirty cells in one batch request. A no-op when no cells are
    /// loaded or none are dirty. Dirty flags are cleared once the service
    /// accepts the batch.
    pub fn save(&mut self, client: &mut FeedClient) -> Result<()> {
        if self.cells.is_empty() {
            return Ok(());
        }
        let mut entries = String::new();
        for cell in &self.cells {
            entries.push_str(&cell.batch_entry()?);
        }
        if entries.is_empty() {
            return Ok(());
        }
        let cells_feed = link_href(&self.links, "cellsfeed")?;
        let payload = build::batch_feed(cells_feed, &entries);
        client.save_worksheet_batch(&self.id, payload)?;
        for cell in &mut self.cells {
            cell.clear_dirty();
        }
        Ok(())
    }

    /// Delete this worksheet through its edit link
    pub fn delete(self, client: &mut FeedClient) -> Result<()> {
        let edit = link_href(&self.links, "edit")?;
        client.delete_worksheet(edit)
    }
}

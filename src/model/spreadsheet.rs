//! The spreadsheet itself, built from the worksheets feed

use crate::client::FeedClient;
use crate::error::Result;
use crate::model::{link_href, Worksheet};
use crate::xml::Feed;

/// A spreadsheet: its title and worksheets
#[derive(Debug, Clone)]
pub struct Spreadsheet {
    pub title: String,
    pub updated: Option<String>,
    pub author: Option<String>,
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    pub(crate) fn from_feed(feed: Feed) -> Self {
        Spreadsheet {
            title: feed.title,
            updated: feed.updated,
            author: feed.author,
            worksheets: feed.entries.into_iter().map(Worksheet::from_entry).collect(),
        }
    }

    /// Worksheet by title, if present
    pub fn worksheet(&self, title: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.title == title)
    }

    /// Create a worksheet with the given dimensions, append it to the local
    /// list and return it
    pub fn add_worksheet(
        &mut self,
        client: &mut FeedClient,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet> {
        let worksheet = client.add_worksheet(title, rows, cols)?;
        self.worksheets.push(worksheet.clone());
        Ok(worksheet)
    }

    /// Delete a worksheet by id and drop it from the local list
    pub fn delete_worksheet(&mut self, client: &mut FeedClient, worksheet_id: &str) -> Result<()> {
        let Some(index) = self.worksheets.iter().position(|ws| ws.id == worksheet_id) else {
            return Ok(());
        };
        let edit = link_href(&self.worksheets[index].links, "edit")?.to_string();
        client.delete_worksheet(&edit)?;
        self.worksheets.remove(index);
        Ok(())
    }
}

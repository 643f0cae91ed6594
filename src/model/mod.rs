//! Data-model adapters over parsed feed entries
//!
//! Each type wraps one entry of a feed and knows how to turn edits back
//! into the exact XML the service accepts. Operations that touch the wire
//! borrow the [`FeedClient`](crate::FeedClient) they should go through.

pub mod cell;
pub mod row;
pub mod spreadsheet;
pub mod worksheet;

pub use cell::Cell;
pub use row::Row;
pub use spreadsheet::Spreadsheet;
pub use worksheet::Worksheet;

use indexmap::IndexMap;

use crate::error::{FeedError, Result};
use crate::xml::Link;

/// Look up a link href by rel fragment, with a typed error when absent
pub(crate) fn link_href<'a>(links: &'a IndexMap<String, Link>, rel: &str) -> Result<&'a str> {
    links
        .get(rel)
        .map(|l| l.href.as_str())
        .ok_or_else(|| FeedError::MissingLink {
            rel: rel.to_string(),
        })
}

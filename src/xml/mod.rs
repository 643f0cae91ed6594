//! XML layer: Atom feed parsing, payload building and fragment patching

pub mod atom;
pub mod build;
pub mod escape;
pub mod patch;

pub use atom::{parse_entry, parse_feed, CellData, Entry, Feed, Link};
pub use escape::{encode_column_name, escape_xml};

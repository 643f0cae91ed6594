//! # gridfeed
//!
//! A Rust client for tabular-data services exposed as Atom/GData XML feeds.
//!
//! ## Features
//!
//! - **Worksheets, rows, cells**: Typed model objects over the worksheets,
//!   list and cells feeds
//! - **Faithful writes**: Edits patch the exact XML fragments the service
//!   issued, so strict edit endpoints accept them
//! - **Three auth modes**: Anonymous, static token, or service-account
//!   tokens refreshed on expiry through a pluggable [`TokenSource`]
//! - **Typed errors**: HTTP statuses mapped to concrete error variants,
//!   including the private-sheet HTML response
//! - **Testable transport**: The HTTP backend sits behind a trait, so the
//!   whole request path runs against a mock in tests
//!
//! ## Quick Start
//!
//! ### Reading rows from a public sheet
//!
//! ```rust,no_run
//! use gridfeed::{FeedClient, RowQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = FeedClient::new("your-spreadsheet-key")?;
//! let spreadsheet = client.get_spreadsheet()?;
//!
//! let sheet = &spreadsheet.worksheets[0];
//! for row in sheet.get_rows(&mut client, &RowQuery::new().with_max_results(10))? {
//!     println!("{} is {:?}", row.title, row.get("age"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Editing cells with a batch save
//!
//! ```rust,no_run
//! use gridfeed::{AccessToken, CellQuery, FeedClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = FeedClient::new("your-spreadsheet-key")?
//!     .with_auth_token(AccessToken::google_login("your-token"));
//! let mut spreadsheet = client.get_spreadsheet()?;
//!
//! let sheet = &mut spreadsheet.worksheets[0];
//! sheet.get_cells(&mut client, &CellQuery::new().with_max_row(1))?;
//! for cell in sheet.cells_mut() {
//!     if cell.value().is_empty() {
//!         cell.set_value("n/a");
//!     }
//! }
//! sheet.save(&mut client)?; // one batch request for all dirty cells
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod model;
pub mod query;
pub mod transport;
pub mod xml;

pub use auth::{AccessToken, Credential, ServiceAccountKey, TokenSource, TokenType};
pub use client::{FeedClient, Projection, Visibility, DEFAULT_FEED_URL};
pub use error::{FeedError, Result};
pub use model::{Cell, Row, Spreadsheet, Worksheet};
pub use query::{CellQuery, RowQuery};
pub use transport::{FeedRequest, FeedResponse, HttpTransport, Method};

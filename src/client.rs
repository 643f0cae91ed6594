//! The feed client: URL construction, auth, request dispatch and error
//! classification
//!
//! All traffic for one spreadsheet goes through a [`FeedClient`]. Operations
//! on the model types ([`Spreadsheet`](crate::Spreadsheet),
//! [`Worksheet`](crate::Worksheet), ...) borrow the client for the duration
//! of each call; there is no hidden shared state.

use chrono::Utc;
use url::form_urlencoded;

use crate::auth::{AccessToken, Credential, TokenSource};
use crate::error::{FeedError, Result};
use crate::model::{Cell, Row, Spreadsheet, Worksheet};
use crate::query::{CellQuery, RowQuery};
use crate::transport::{FeedRequest, FeedResponse, HttpTransport, Method, ReqwestTransport};
use crate::xml;

/// Base URL of the feed service
pub const DEFAULT_FEED_URL: &str = "https://spreadsheets.google.com/feeds";

/// Access mode for the target spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Access-level parameter controlling which fields the service returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Values,
    Full,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Values => "values",
            Projection::Full => "full",
        }
    }
}

/// Client for the worksheets, list and cells feeds of one spreadsheet
pub struct FeedClient {
    key: String,
    feed_url: String,
    credential: Credential,
    visibility: Option<Visibility>,
    projection: Option<Projection>,
    transport: Box<dyn HttpTransport>,
}

impl FeedClient {
    /// Create a client for the spreadsheet identified by `key`
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(FeedError::MissingKey);
        }
        Ok(FeedClient {
            key,
            feed_url: DEFAULT_FEED_URL.to_string(),
            credential: Credential::Anonymous,
            visibility: None,
            projection: None,
            transport: Box::new(ReqwestTransport::new()),
        })
    }

    /// Pin the visibility instead of deriving it from the credential
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Pin the projection instead of deriving it from the credential
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Use a different feed base URL
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = url.into();
        self
    }

    /// Replace the HTTP backend
    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Builder form of [`set_auth_token`](Self::set_auth_token)
    pub fn with_auth_token(mut self, token: AccessToken) -> Self {
        self.set_auth_token(token);
        self
    }

    /// Authenticate with a static token. The token is used as-is and never
    /// refreshed.
    pub fn set_auth_token(&mut self, token: AccessToken) {
        self.credential = Credential::Static(token);
    }

    /// Authenticate as a service account. Performs an initial token fetch so
    /// auth failures surface here rather than on the first feed call.
    pub fn use_service_account_auth(&mut self, source: impl TokenSource + 'static) -> Result<()> {
        self.credential = Credential::ServiceAccount {
            source: Box::new(source),
            token: None,
        };
        self.credential.ensure_fresh(Utc::now())
    }

    /// The spreadsheet key this client targets
    pub fn spreadsheet_key(&self) -> &str {
        &self.key
    }

    /// Effective visibility: explicit override, else derived from whether a
    /// credential is present
    pub fn visibility(&self) -> Visibility {
        self.visibility.unwrap_or(if self.credential.is_authenticated() {
            Visibility::Private
        } else {
            Visibility::Public
        })
    }

    /// Effective projection, derived the same way as the visibility
    pub fn projection(&self) -> Projection {
        self.projection.unwrap_or(if self.credential.is_authenticated() {
            Projection::Full
        } else {
            Projection::Values
        })
    }

    /// `{feed_url}/{kind}/{key}[/{worksheet}]/{visibility}/{projection}[/{extra}]`
    fn feed_path(&self, kind: &str, worksheet: Option<&str>, extra: Option<&str>) -> String {
        let mut segments = vec![self.feed_url.as_str(), kind, self.key.as_str()];
        if let Some(ws) = worksheet {
            segments.push(ws);
        }
        let visibility = self.visibility();
        let projection = self.projection();
        segments.push(visibility.as_str());
        segments.push(projection.as_str());
        if let Some(extra) = extra {
            segments.push(extra);
        }
        segments.join("/")
    }

    /// Issue one request and classify the response.
    ///
    /// Query parameters only apply to GETs; POST and PUT bodies go out as
    /// `application/atom+xml`. No retries: every failure propagates.
    fn request(
        &mut self,
        method: Method,
        mut url: String,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<String> {
        self.credential.ensure_fresh(Utc::now())?;

        let mut headers = Vec::new();
        if let Some(token) = self.credential.token() {
            headers.push(("Authorization".to_string(), token.authorization_header()));
        }
        if matches!(method, Method::Post | Method::Put) {
            headers.push((
                "Content-Type".to_string(),
                "application/atom+xml".to_string(),
            ));
        }
        if method == Method::Get && !query.is_empty() {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (name, value) in query {
                serializer.append_pair(name, value);
            }
            url.push('?');
            url.push_str(&serializer.finish());
        }

        log::debug!("{} {}", method.as_str(), url);
        let response = self.transport.execute(&FeedRequest {
            method,
            url,
            headers,
            body,
        })?;
        Self::classify(response)
    }

    fn classify(response: FeedResponse) -> Result<String> {
        log::debug!("status {} ({} bytes)", response.status, response.body.len());
        if response.status == 401 {
            return Err(FeedError::InvalidCredentials {
                body: response.body,
            });
        }
        if response.status >= 400 {
            return Err(FeedError::Http {
                status: response.status,
                body: response.body,
            });
        }
        if response.status == 200
            && response
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.contains("text/html"))
        {
            return Err(FeedError::PrivateSheet {
                body: response.body,
            });
        }
        Ok(response.body)
    }

    // Feed operations

    /// Fetch the worksheets feed and build the spreadsheet model
    pub fn get_spreadsheet(&mut self) -> Result<Spreadsheet> {
        let url = self.feed_path("worksheets", None, None);
        let body = self.request(Method::Get, url, &[], None)?;
        if body.is_empty() {
            return Err(FeedError::NoResponse {
                operation: "getSpreadsheet",
            });
        }
        let feed = xml::parse_feed(&body)?;
        Ok(Spreadsheet::from_feed(feed))
    }

    /// Create a worksheet. Worksheet ids are assigned by the service,
    /// starting at 1.
    pub fn add_worksheet(&mut self, title: &str, rows: u32, cols: u32) -> Result<Worksheet> {
        let url = self.feed_path("worksheets", None, None);
        let payload = xml::build::worksheet_entry(title, rows, cols);
        let body = self.request(Method::Post, url, &[], Some(payload))?;
        if body.is_empty() {
            return Err(FeedError::NoResponse {
                operation: "addWorksheet",
            });
        }
        let entry = xml::parse_entry(&body)?;
        Ok(Worksheet::from_entry(entry))
    }

    /// Update a worksheet's title and dimensions through its edit link
    pub fn update_worksheet_metadata(
        &mut self,
        edit_url: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<()> {
        let payload = xml::build::worksheet_entry(title, rows, cols);
        self.request(Method::Put, edit_url.to_string(), &[], Some(payload))?;
        Ok(())
    }

    /// Delete a worksheet through its edit link
    pub fn delete_worksheet(&mut self, edit_url: &str) -> Result<()> {
        self.request(Method::Delete, edit_url.to_string(), &[], None)?;
        Ok(())
    }

    /// Forward a batch feed of cell updates to the cells feed
    pub fn save_worksheet_batch(&mut self, worksheet_id: &str, feed_xml: String) -> Result<String> {
        let url = self.feed_path("cells", Some(worksheet_id), Some("batch"));
        self.request(Method::Post, url, &[], Some(feed_xml))
    }

    /// Fetch rows from the list feed. The first worksheet row serves as
    /// column titles and is not part of the results.
    pub fn get_rows(&mut self, worksheet_id: &str, query: &RowQuery) -> Result<Vec<Row>> {
        let url = self.feed_path("list", Some(worksheet_id), None);
        let body = self.request(Method::Get, url, &query.to_params(), None)?;
        if body.is_empty() {
            return Err(FeedError::NoResponse { operation: "getRows" });
        }
        let feed = xml::parse_feed(&body)?;
        Ok(feed.entries.into_iter().map(Row::from_entry).collect())
    }

    /// Append a row to the list feed
    pub fn add_row(&mut self, worksheet_id: &str, entry_xml: String) -> Result<Row> {
        let url = self.feed_path("list", Some(worksheet_id), None);
        let body = self.request(Method::Post, url, &[], Some(entry_xml))?;
        if body.is_empty() {
            return Err(FeedError::NoResponse { operation: "addRow" });
        }
        let entry = xml::parse_entry(&body)?;
        Ok(Row::from_entry(entry))
    }

    /// Delete a row through its edit link
    pub fn delete_row(&mut self, edit_url: &str) -> Result<()> {
        self.request(Method::Delete, edit_url.to_string(), &[], None)?;
        Ok(())
    }

    /// PUT a patched row fragment to its edit link
    pub fn save_row(&mut self, edit_url: &str, entry_xml: String) -> Result<()> {
        self.request(Method::Put, edit_url.to_string(), &[], Some(entry_xml))?;
        Ok(())
    }

    /// Fetch cells from the cells feed
    pub fn get_cells(&mut self, worksheet_id: &str, query: &CellQuery) -> Result<Vec<Cell>> {
        let url = self.feed_path("cells", Some(worksheet_id), None);
        let body = self.request(Method::Get, url, &query.to_params(), None)?;
        if body.is_empty() {
            return Err(FeedError::NoResponse { operation: "getCells" });
        }
        let feed = xml::parse_feed(&body)?;
        feed.entries.into_iter().map(Cell::from_entry).collect()
    }

    /// PUT a cell edit entry to its edit link
    pub fn save_cell(&mut self, edit_url: &str, entry_xml: String) -> Result<()> {
        self.request(Method::Put, edit_url.to_string(), &[], Some(entry_xml))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(FeedClient::new(""), Err(FeedError::MissingKey)));
    }

    #[test]
    fn test_defaults_follow_credential() {
        let client = FeedClient::new("key1").unwrap();
        assert_eq!(client.visibility(), Visibility::Public);
        assert_eq!(client.projection(), Projection::Values);

        let client = client.with_auth_token(AccessToken::google_login("tok"));
        assert_eq!(client.visibility(), Visibility::Private);
        assert_eq!(client.projection(), Projection::Full);
    }

    #[test]
    fn test_explicit_overrides_win() {
        let client = FeedClient::new("key1")
            .unwrap()
            .with_visibility(Visibility::Public)
            .with_projection(Projection::Values)
            .with_auth_token(AccessToken::google_login("tok"));
        assert_eq!(client.visibility(), Visibility::Public);
        assert_eq!(client.projection(), Projection::Values);
    }

    #[test]
    fn test_feed_path_shapes() {
        let client = FeedClient::new("key1").unwrap();
        assert_eq!(
            client.feed_path("worksheets", None, None),
            "https://spreadsheets.google.com/feeds/worksheets/key1/public/values"
        );
        assert_eq!(
            client.feed_path("cells", Some("od6"), Some("batch")),
            "https://spreadsheets.google.com/feeds/cells/key1/od6/public/values/batch"
        );
    }

    #[test]
    fn test_classify_statuses() {
        let ok = FeedResponse {
            status: 200,
            content_type: Some("application/atom+xml; charset=UTF-8".to_string()),
            body: "<feed/>".to_string(),
        };
        assert_eq!(FeedClient::classify(ok).unwrap(), "<feed/>");

        let unauthorized = FeedResponse {
            status: 401,
            content_type: None,
            body: "denied".to_string(),
        };
        assert!(matches!(
            FeedClient::classify(unauthorized),
            Err(FeedError::InvalidCredentials { .. })
        ));

        let server_error = FeedResponse {
            status: 503,
            content_type: None,
            body: "unavailable".to_string(),
        };
        assert!(matches!(
            FeedClient::classify(server_error),
            Err(FeedError::Http { status: 503, .. })
        ));

        let html = FeedResponse {
            status: 200,
            content_type: Some("text/html; charset=UTF-8".to_string()),
            body: "<html>login</html>".to_string(),
        };
        assert!(matches!(
            FeedClient::classify(html),
            Err(FeedError::PrivateSheet { .. })
        ));
    }
}

//! Typed query builders for the list and cells feeds

/// Options for fetching rows from the list feed.
///
/// The first worksheet row is used by the service as column titles and is
/// never part of the results.
#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    /// 1-based index of the first row to return (`start-index`)
    pub start_index: Option<u32>,
    /// Maximum number of rows to return (`max-results`)
    pub max_results: Option<u32>,
    /// Column to sort by (`orderby`)
    pub order_by: Option<String>,
    /// Sort in reverse order (`reverse`)
    pub reverse: bool,
    /// Structured query, e.g. `age > 25` (`sq`)
    pub sq: Option<String>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_index(mut self, index: u32) -> Self {
        self.start_index = Some(index);
        self
    }

    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_query(mut self, sq: impl Into<String>) -> Self {
        self.sq = Some(sq.into());
        self
    }

    /// Service parameter pairs in a stable order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = self.start_index {
            params.push(("start-index", v.to_string()));
        }
        if let Some(v) = self.max_results {
            params.push(("max-results", v.to_string()));
        }
        if let Some(v) = &self.order_by {
            params.push(("orderby", v.clone()));
        }
        if self.reverse {
            params.push(("reverse", "true".to_string()));
        }
        if let Some(v) = &self.sq {
            params.push(("sq", v.clone()));
        }
        params
    }
}

/// Options for fetching cells from the cells feed
#[derive(Debug, Clone, Default)]
pub struct CellQuery {
    /// Lowest row to include, 1-based (`min-row`)
    pub min_row: Option<u32>,
    /// Highest row to include (`max-row`)
    pub max_row: Option<u32>,
    /// Lowest column to include, 1-based (`min-col`)
    pub min_col: Option<u32>,
    /// Highest column to include (`max-col`)
    pub max_col: Option<u32>,
    /// Include empty cells in the results (`return-empty`, default false)
    pub return_empty: bool,
}

impl CellQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_row(mut self, row: u32) -> Self {
        self.min_row = Some(row);
        self
    }

    pub fn with_max_row(mut self, row: u32) -> Self {
        self.max_row = Some(row);
        self
    }

    pub fn with_min_col(mut self, col: u32) -> Self {
        self.min_col = Some(col);
        self
    }

    pub fn with_max_col(mut self, col: u32) -> Self {
        self.max_col = Some(col);
        self
    }

    pub fn with_return_empty(mut self, return_empty: bool) -> Self {
        self.return_empty = return_empty;
        self
    }

    /// Service parameter pairs in a stable order
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = self.min_row {
            params.push(("min-row", v.to_string()));
        }
        if let Some(v) = self.max_row {
            params.push(("max-row", v.to_string()));
        }
        if let Some(v) = self.min_col {
            params.push(("min-col", v.to_string()));
        }
        if let Some(v) = self.max_col {
            params.push(("max-col", v.to_string()));
        }
        if self.return_empty {
            params.push(("return-empty", "true".to_string()));
        }
        params
    }
}

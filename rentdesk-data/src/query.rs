//! Row queries encoded the way the backend's REST layer expects them.
//!
//! Filters become query parameters of the form `column=operator.value`:
//!
//! ```rust
//! use rentdesk_data::Query;
//!
//! let query = Query::table("clients")
//!     .select("id,name")
//!     .is_null("deleted_at")
//!     .lte("strikes", 3)
//!     .order("name", true);
//!
//! assert_eq!(
//!     query.to_params(),
//!     vec![
//!         ("select".to_string(), "id,name".to_string()),
//!         ("deleted_at".to_string(), "is.null".to_string()),
//!         ("strikes".to_string(), "lte.3".to_string()),
//!         ("order".to_string(), "name.asc".to_string()),
//!     ]
//! );
//! ```

use std::fmt::Display;

/// One `column=operator.value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: String,
    condition: String,
}

impl Filter {
    fn new(column: impl Into<String>, operator: &str, value: impl Display) -> Self {
        Self {
            column: column.into(),
            condition: format!("{operator}.{value}"),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, "eq", value)
    }

    pub fn lte(column: impl Into<String>, value: impl Display) -> Self {
        Self::new(column, "lte", value)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, "is", "null")
    }

    pub fn not_null(column: impl Into<String>) -> Self {
        Self::new(column, "not.is", "null")
    }

    /// `column=is.<value>`, used for boolean columns.
    pub fn is(column: impl Into<String>, value: bool) -> Self {
        Self::new(column, "is", value)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }
}

/// A select, update or delete target: a table plus filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    columns: Option<String>,
    filters: Vec<Filter>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Columns to return, including embedded relations such as
    /// `client_type(type_name)`. Defaults to every column.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn neq(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::new(column, "neq", value))
    }

    pub fn gt(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::new(column, "gt", value))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::new(column, "gte", value))
    }

    pub fn lt(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::new(column, "lt", value))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Display) -> Self {
        self.filter(Filter::lte(column, value))
    }

    pub fn is(self, column: impl Into<String>, value: bool) -> Self {
        self.filter(Filter::is(column, value))
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.filter(Filter::is_null(column))
    }

    pub fn not_null(self, column: impl Into<String>) -> Self {
        self.filter(Filter::not_null(column))
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{direction}", column.into()));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Encode as query parameters, in declaration order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(columns) = &self.columns {
            params.push(("select".to_string(), columns.clone()));
        }
        params.extend(
            self.filters
                .iter()
                .map(|f| (f.column.clone(), f.condition.clone())),
        );
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

//! List query options rendered into a URL query string

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Sort direction for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

crate::impl_wire_name!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

/// Filtering, sorting and paging for list endpoints.
///
/// ```
/// use samplify_domain::{QueryOptions, SortOrder};
///
/// let query = QueryOptions::new()
///     .filter("state", "LAUNCHED")
///     .sort_by("createdAt", SortOrder::Desc)
///     .limit(10);
/// assert_eq!(query.to_query_string(), "?state=LAUNCHED&sort=createdAt%3Adesc&limit=10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub filters: Vec<(String, String)>,
    pub sort: Vec<(String, SortOrder)>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl QueryOptions {
    /// Empty query; renders as `""`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `field=value` filter. Repeated fields are all sent.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Append a sort key; keys apply in insertion order.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    /// Maximum number of items per page.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of items to skip.
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// `true` when nothing would be rendered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sort.is_empty() && self.limit.is_none() && self.offset.is_none()
    }

    /// Render as `?a=b&sort=f:asc&limit=N&offset=M`, or `""` when empty.
    pub fn to_query_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (field, value) in &self.filters {
            serializer.append_pair(field, value);
        }
        if !self.sort.is_empty() {
            let sort = self
                .sort
                .iter()
                .map(|(field, order)| format!("{field}:{order}"))
                .collect::<Vec<_>>()
                .join(",");
            serializer.append_pair("sort", &sort);
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            serializer.append_pair("offset", &offset.to_string());
        }
        format!("?{}", serializer.finish())
    }
}

/// Query string for optional options; `None` renders as `""`.
pub fn render_query(options: Option<&QueryOptions>) -> String {
    options.map(QueryOptions::to_query_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_render_nothing() {
        assert_eq!(QueryOptions::new().to_query_string(), "");
        assert_eq!(render_query(None), "");
    }

    #[test]
    fn multiple_sort_fields_are_comma_joined() {
        let query = QueryOptions::new()
            .sort_by("name", SortOrder::Asc)
            .sort_by("createdAt", SortOrder::Desc)
            .offset(20);
        assert_eq!(query.to_query_string(), "?sort=name%3Aasc%2CcreatedAt%3Adesc&offset=20");
    }

    #[test]
    fn filter_values_are_encoded() {
        let query = QueryOptions::new().filter("title", "a b&c");
        assert_eq!(query.to_query_string(), "?title=a+b%26c");
    }
}

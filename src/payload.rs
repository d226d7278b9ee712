//! Request bodies for `reports:batchGet`.
//!
//! A [`ReportPayload`] is an immutable value. Pagination and day-by-day
//! fetching derive new payloads from it with [`ReportPayload::with_page_token`]
//! and [`ReportPayload::with_date_range`].

use serde::Serialize;

use crate::dates::DateRange;
use crate::error::{GaError, Result};

/// Page token of a request that has not been paginated yet.
pub const INITIAL_PAGE_TOKEN: &str = "0";

/// Largest page size the reporting endpoint accepts.
pub const PAGE_SIZE: u32 = 100_000;

/// How the filters of one clause are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterLogicalOperator {
    And,
    #[default]
    Or,
}

/// Match operators available to dimension filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionOperator {
    Regexp,
    BeginsWith,
    EndsWith,
    Partial,
    Exact,
    NumericEqual,
    NumericGreaterThan,
    NumericLessThan,
    InList,
}

/// Comparison operators available to metric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricOperator {
    Equal,
    LessThan,
    GreaterThan,
    IsMissing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    pub dimension_name: String,
    #[serde(rename = "not")]
    pub negate: bool,
    pub operator: DimensionOperator,
    pub expressions: Vec<String>,
    pub case_sensitive: bool,
}

impl DimensionFilter {
    pub fn new<S: Into<String>>(
        dimension_name: impl Into<String>,
        negate: bool,
        operator: DimensionOperator,
        expressions: impl IntoIterator<Item = S>,
        case_sensitive: bool,
    ) -> Self {
        Self {
            dimension_name: dimension_name.into(),
            negate,
            operator,
            expressions: expressions.into_iter().map(Into::into).collect(),
            case_sensitive,
        }
    }
}

/// Metric filters carry no case-sensitivity flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricFilter {
    pub metric_name: String,
    #[serde(rename = "not")]
    pub negate: bool,
    pub operator: MetricOperator,
    pub comparison_value: String,
}

impl MetricFilter {
    pub fn new(
        metric_name: impl Into<String>,
        negate: bool,
        operator: MetricOperator,
        comparison_value: impl Into<String>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            negate,
            operator,
            comparison_value: comparison_value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause<F> {
    pub operator: FilterLogicalOperator,
    pub filters: Vec<F>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub expression: String,
}

/// One entry of `reportRequests`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub page_token: String,
    pub page_size: u32,
    pub dimension_filter_clauses: Vec<FilterClause<DimensionFilter>>,
    pub metric_filter_clauses: Vec<FilterClause<MetricFilter>>,
}

/// Body of a `reports:batchGet` call. Always holds exactly one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    report_requests: [ReportRequest; 1],
}

impl ReportPayload {
    pub fn request(&self) -> &ReportRequest {
        &self.report_requests[0]
    }

    pub fn page_token(&self) -> &str {
        &self.request().page_token
    }

    /// The same payload asking for the page at `token`.
    pub fn with_page_token(&self, token: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.report_requests[0].page_token = token.into();
        next
    }

    /// The same payload over `range`, restarted at the first page.
    pub fn with_date_range(&self, range: DateRange) -> Self {
        let mut next = self.with_page_token(INITIAL_PAGE_TOKEN);
        next.report_requests[0].date_ranges = vec![range];
        next
    }
}

/// Builder for [`ReportPayload`].
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    date_range: DateRange,
    view_id: Option<String>,
    dimensions: Vec<String>,
    metrics: Vec<String>,
    dimension_operator: Option<FilterLogicalOperator>,
    dimension_filters: Vec<DimensionFilter>,
    metric_operator: Option<FilterLogicalOperator>,
    metric_filters: Vec<MetricFilter>,
}

impl PayloadBuilder {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            view_id: None,
            dimensions: Vec::new(),
            metrics: Vec::new(),
            dimension_operator: None,
            dimension_filters: Vec::new(),
            metric_operator: None,
            metric_filters: Vec::new(),
        }
    }

    /// Set the view the report is pulled from. Required.
    pub fn view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    /// Add dimensions, e.g. `ga:date`.
    pub fn dimensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add metrics, e.g. `ga:sessions`.
    pub fn metrics<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn dimension_operator(mut self, operator: FilterLogicalOperator) -> Self {
        self.dimension_operator = Some(operator);
        self
    }

    pub fn dimension_filter(mut self, filter: DimensionFilter) -> Self {
        self.dimension_filters.push(filter);
        self
    }

    pub fn dimension_filters(mut self, filters: impl IntoIterator<Item = DimensionFilter>) -> Self {
        self.dimension_filters.extend(filters);
        self
    }

    pub fn metric_operator(mut self, operator: FilterLogicalOperator) -> Self {
        self.metric_operator = Some(operator);
        self
    }

    pub fn metric_filter(mut self, filter: MetricFilter) -> Self {
        self.metric_filters.push(filter);
        self
    }

    pub fn metric_filters(mut self, filters: impl IntoIterator<Item = MetricFilter>) -> Self {
        self.metric_filters.extend(filters);
        self
    }

    pub fn build(self) -> Result<ReportPayload> {
        let view_id = match self.view_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(GaError::InvalidArgument(
                    "view_id cannot be empty, a GA view id is required".into(),
                ))
            }
        };
        if self.dimensions.is_empty() {
            return Err(GaError::InvalidArgument(
                "at least one dimension is required".into(),
            ));
        }
        if self.metrics.is_empty() {
            return Err(GaError::InvalidArgument(
                "at least one metric is required".into(),
            ));
        }

        let request = ReportRequest {
            view_id,
            date_ranges: vec![self.date_range],
            dimensions: self
                .dimensions
                .into_iter()
                .map(|name| Dimension { name })
                .collect(),
            metrics: self
                .metrics
                .into_iter()
                .map(|expression| Metric { expression })
                .collect(),
            page_token: INITIAL_PAGE_TOKEN.to_string(),
            page_size: PAGE_SIZE,
            dimension_filter_clauses: vec![FilterClause {
                operator: self.dimension_operator.unwrap_or_default(),
                filters: self.dimension_filters,
            }],
            metric_filter_clauses: vec![FilterClause {
                operator: self.metric_operator.unwrap_or_default(),
                filters: self.metric_filters,
            }],
        };

        Ok(ReportPayload {
            report_requests: [request],
        })
    }
}

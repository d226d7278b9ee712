//! Response model of `reports:batchGet`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw response of one `reports:batchGet` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetResponse {
    #[serde(default)]
    pub reports: Vec<ReportPage>,
    pub query_cost: Option<i64>,
    pub resource_quotas_remaining: Option<Value>,
}

impl BatchGetResponse {
    /// Continuation token of the first report, if more pages remain.
    pub fn next_page_token(&self) -> Option<&str> {
        self.reports
            .first()
            .and_then(|report| report.next_page_token.as_deref())
            .filter(|token| !token.is_empty())
    }
}

/// One page of one report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    #[serde(default)]
    pub column_header: ColumnHeader,
    #[serde(default)]
    pub data: ReportData,
    pub next_page_token: Option<String>,
}

impl ReportPage {
    pub fn dimension_names(&self) -> &[String] {
        &self.column_header.dimensions
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.column_header
            .metric_header
            .metric_header_entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metric_header: MetricHeader,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    #[serde(default)]
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricHeaderEntry {
    pub name: String,
    /// INTEGER, FLOAT, CURRENCY, PERCENT or TIME
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

/// `rows` is left out by the API when the report is empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub rows: Vec<ReportRow>,
    #[serde(default)]
    pub totals: Vec<DateRangeValues>,
    pub row_count: Option<i64>,
    #[serde(default)]
    pub minimums: Vec<DateRangeValues>,
    #[serde(default)]
    pub maximums: Vec<DateRangeValues>,
    pub samples_read_counts: Option<Vec<String>>,
    pub sampling_space_sizes: Option<Vec<String>>,
    pub is_data_golden: Option<bool>,
    pub data_last_refreshed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    /// One value set per requested date range.
    #[serde(default)]
    pub metrics: Vec<DateRangeValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeValues {
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pivot_value_regions: Vec<Value>,
}

/// Every report page gathered by one paginated fetch, in page order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportBatch {
    pub reports: Vec<ReportPage>,
}

impl ReportBatch {
    pub fn extend(&mut self, pages: impl IntoIterator<Item = ReportPage>) {
        self.reports.extend(pages);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Rows across all pages.
    pub fn row_count(&self) -> usize {
        self.reports.iter().map(|page| page.data.rows.len()).sum()
    }
}

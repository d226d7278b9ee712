//! Flattening of report batches into one row-oriented table.

use serde_json::{Map, Value};

use crate::error::{GaError, Result};
use crate::report::{ReportBatch, ReportPage};

/// Rows keyed by column name; columns are dimension headers then metric
/// headers, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, or `None` if there is no such column.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row[index].as_deref())
                .collect(),
        )
    }

    /// Rows as JSON objects; absent cells become `null`.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let value = cell.clone().map(Value::String).unwrap_or(Value::Null);
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Append `other` below this table.
    ///
    /// Columns are matched by name; columns only one side has are added and
    /// the other side's cells in them left empty.
    fn append(&mut self, other: Table) {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }

        let mapping: Vec<usize> = other
            .columns
            .into_iter()
            .map(|name| match self.columns.iter().position(|c| *c == name) {
                Some(index) => index,
                None => {
                    self.columns.push(name);
                    for row in &mut self.rows {
                        row.push(None);
                    }
                    self.columns.len() - 1
                }
            })
            .collect();

        let width = self.columns.len();
        for row in other.rows {
            let mut aligned = vec![None; width];
            for (cell, &index) in row.into_iter().zip(&mapping) {
                aligned[index] = cell;
            }
            self.rows.push(aligned);
        }
    }
}

/// Flatten one report page.
pub fn page_to_table(page: &ReportPage) -> Result<Table> {
    let dimension_names = page.dimension_names();
    let metric_names = page.metric_names();

    let mut columns: Vec<String> = dimension_names.to_vec();
    columns.extend(metric_names.iter().map(|name| name.to_string()));

    let mut rows = Vec::with_capacity(page.data.rows.len());
    for (position, row) in page.data.rows.iter().enumerate() {
        if row.dimensions.len() != dimension_names.len() {
            return Err(GaError::SchemaMismatch(format!(
                "row {} has {} dimension values but the header declares {}",
                position,
                row.dimensions.len(),
                dimension_names.len()
            )));
        }

        // The payload asks for a single date range, so only the first
        // value set carries data.
        let values: &[String] = match row.metrics.first() {
            Some(set) => &set.values,
            None if metric_names.is_empty() => &[],
            None => {
                return Err(GaError::SchemaMismatch(format!(
                    "row {} has no metric values but the header declares {}",
                    position,
                    metric_names.len()
                )))
            }
        };
        if values.len() != metric_names.len() {
            return Err(GaError::SchemaMismatch(format!(
                "row {} has {} metric values but the header declares {}",
                position,
                values.len(),
                metric_names.len()
            )));
        }

        rows.push(
            row.dimensions
                .iter()
                .chain(values)
                .map(|value| Some(value.clone()))
                .collect(),
        );
    }

    Ok(Table { columns, rows })
}

/// Flatten every page of every batch into one table, in input order.
pub fn data_to_table(batches: &[ReportBatch]) -> Result<Table> {
    let mut table = Table::default();
    for page in batches.iter().flat_map(|batch| &batch.reports) {
        table.append(page_to_table(page)?);
    }
    Ok(table)
}

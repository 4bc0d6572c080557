use serde_json::Value;

use crate::protocol::Row;

pub const NO_DATA_NOTICE: &str = "No data found for your query.";
pub const EXECUTED_QUERY_LABEL: &str = "Query executed:";
pub const NULL_CELL: &str = "N/A";

/// Query results ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    NoData { query_executed: Option<String> },
    Table(DataTable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub query_executed: Option<String>,
}

impl ResultView {
    /// Columns come from the first row's keys; every row is laid out in that
    /// order.
    pub fn build(rows: Option<&[Row]>, query_executed: Option<&str>, user_query: &str) -> Self {
        let query_executed = query_executed.map(str::to_string);
        let Some(first) = rows.and_then(|rows| rows.first()) else {
            return ResultView::NoData { query_executed };
        };
        let rows = rows.unwrap_or_default();

        let keys: Vec<&String> = first.keys().collect();
        let headers = keys.iter().map(|key| header_label(key)).collect();
        let body = rows
            .iter()
            .map(|row| keys.iter().map(|key| cell_text(row.get(*key))).collect())
            .collect();

        ResultView::Table(DataTable {
            title: format!("Query Results: \"{}\"", user_query),
            headers,
            rows: body,
            query_executed,
        })
    }

    pub fn query_executed(&self) -> Option<&str> {
        match self {
            ResultView::NoData { query_executed } => query_executed.as_deref(),
            ResultView::Table(table) => table.query_executed.as_deref(),
        }
    }
}

/// `employee_id` -> `Employee Id`. Only the first letter of each word is
/// touched.
pub fn header_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut label = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && !prev_is_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        prev_is_word = is_word;
    }
    label
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NULL_CELL.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

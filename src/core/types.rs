//! Core data types shared by the query client and the CSV writer

/// One tabular response from the query service
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct QueryResult {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

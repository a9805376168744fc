//! PSV document representation
//!
//! Rows borrow from the input buffer rather than allocating: a document's
//! lifetime is tied to the `&str` it was parsed from.

use crate::error::{Error, Result};
use crate::schema::BpsvSchema;

/// A single data row: one borrowed `&str` cell per `|`-separated column.
pub type BpsvRow<'a> = Vec<&'a str>;

/// A parsed PSV document.
///
/// Only rows whose leading bytes match the region this document was parsed
/// for are retained; all other rows are dropped silently during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct BpsvDocument<'a> {
    schema: BpsvSchema,
    sequence_number: Option<u32>,
    rows: Vec<BpsvRow<'a>>,
}

impl<'a> BpsvDocument<'a> {
    pub(crate) fn new(schema: BpsvSchema, sequence_number: Option<u32>, rows: Vec<BpsvRow<'a>>) -> Self {
        Self {
            schema,
            sequence_number,
            rows,
        }
    }

    /// Parse a PSV document from string content, keeping only rows whose
    /// leading bytes equal `region`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngdp_bpsv::BpsvDocument;
    ///
    /// let content = "Region!STRING:0|BuildId!DEC:4\n## seqn = 12345\nus|1234\neu|5678";
    /// let doc = BpsvDocument::parse(content, "us")?;
    /// assert_eq!(doc.sequence_number(), Some(12345));
    /// assert_eq!(doc.row_count(), 1);
    /// # Ok::<(), ngdp_bpsv::Error>(())
    /// ```
    pub fn parse(content: &'a str, region: &str) -> Result<Self> {
        crate::parser::BpsvParser::parse(content, region)
    }

    pub fn schema(&self) -> &BpsvSchema {
        &self.schema
    }

    pub fn sequence_number(&self) -> Option<u32> {
        self.sequence_number
    }

    pub fn rows(&self) -> &[BpsvRow<'a>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get_row(&self, index: usize) -> Option<&BpsvRow<'a>> {
        self.rows.get(index)
    }

    /// Get a single cell by row index and field name.
    ///
    /// Cells past the shorter of the row length and the header length are
    /// never reachable through this accessor, matching the column-by-column
    /// delivery rule used while parsing.
    pub fn get_cell(&self, row_index: usize, field_name: &str) -> Result<Option<&'a str>> {
        let field = self
            .schema
            .get_field(field_name)
            .ok_or_else(|| Error::FieldNotFound {
                field: field_name.to_string(),
            })?;

        Ok(self
            .rows
            .get(row_index)
            .and_then(|row| row.get(field.index))
            .copied())
    }

    /// Call `f(field_name, cell)` for every column shared between a row and
    /// the schema, stopping at the shorter of the two.
    pub fn for_each_field<F: FnMut(&str, &'a str)>(&self, row_index: usize, mut f: F) {
        let Some(row) = self.rows.get(row_index) else {
            return;
        };
        for field in self.schema.fields() {
            if let Some(cell) = row.get(field.index) {
                f(&field.name, cell);
            }
        }
    }

    pub fn get_column(&self, field_name: &str) -> Result<Vec<&'a str>> {
        let field = self
            .schema
            .get_field(field_name)
            .ok_or_else(|| Error::FieldNotFound {
                field: field_name.to_string(),
            })?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get(field.index).copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSIONS: &str = "\
Region!STRING:0|BuildConfig!HEX:16|BuildId!DEC:4\n\
## seqn = 12345\n\
us|abcd1234abcd1234abcd1234abcd1234|1234\n\
eu|1234abcd1234abcd1234abcd1234abcd|5678\n\
us|deadbeefdeadbeefdeadbeefdeadbeef|9999";

    #[test]
    fn filters_rows_to_matching_region() {
        let doc = BpsvDocument::parse(VERSIONS, "us").unwrap();
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.sequence_number(), Some(12345));
        assert_eq!(doc.get_cell(0, "BuildId").unwrap(), Some("1234"));
        assert_eq!(doc.get_cell(1, "BuildId").unwrap(), Some("9999"));
    }

    #[test]
    fn unmatched_region_yields_no_rows() {
        let doc = BpsvDocument::parse(VERSIONS, "kr").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn for_each_field_visits_columns_in_schema_order() {
        let doc = BpsvDocument::parse(VERSIONS, "eu").unwrap();
        let mut seen = Vec::new();
        doc.for_each_field(0, |name, cell| seen.push((name.to_string(), cell)));
        assert_eq!(
            seen,
            vec![
                ("Region".to_string(), "eu"),
                ("BuildConfig".to_string(), "1234abcd1234abcd1234abcd1234abcd"),
                ("BuildId".to_string(), "5678"),
            ]
        );
    }

    #[test]
    fn get_column_collects_matching_region_values() {
        let doc = BpsvDocument::parse(VERSIONS, "us").unwrap();
        assert_eq!(doc.get_column("BuildId").unwrap(), vec!["1234", "9999"]);
    }
}

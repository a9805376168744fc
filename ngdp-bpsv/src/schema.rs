//! PSV schema definitions for field structure

use crate::error::{Error, Result};
use crate::field_type::BpsvFieldType;
use std::collections::HashMap;

/// A single field in a PSV schema, as declared by the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct BpsvField {
    /// Field name, with the `!TYPE:len` annotation stripped.
    pub name: String,
    /// The parsed type annotation.
    pub field_type: BpsvFieldType,
    /// Zero-based column index.
    pub index: usize,
}

/// The column structure of a PSV document, parsed from its header row.
#[derive(Debug, Clone, PartialEq)]
pub struct BpsvSchema {
    fields: Vec<BpsvField>,
    field_map: HashMap<String, usize>,
}

impl BpsvSchema {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            field_map: HashMap::new(),
        }
    }

    /// Parse the schema from a header line.
    ///
    /// Each `|`-separated cell is truncated at its first `!`; everything
    /// after the `!` is the type annotation (`NAME!TYPE:len`).
    pub fn parse_header(header_line: &str) -> Result<Self> {
        let mut schema = Self::new();

        for cell in header_line.split('|') {
            let Some((name, type_spec)) = cell.split_once('!') else {
                return Err(Error::InvalidHeader {
                    reason: format!("missing '!' type annotation in header cell: {cell}"),
                });
            };

            let field_type = BpsvFieldType::parse(type_spec)?;
            schema.push_field(name.to_string(), field_type)?;
        }

        if schema.fields.is_empty() {
            return Err(Error::InvalidHeader {
                reason: "no fields found in header".to_string(),
            });
        }

        Ok(schema)
    }

    fn push_field(&mut self, name: String, field_type: BpsvFieldType) -> Result<()> {
        if self.field_map.contains_key(&name) {
            return Err(Error::DuplicateField { field: name });
        }
        let index = self.fields.len();
        self.field_map.insert(name.clone(), index);
        self.fields.push(BpsvField {
            name,
            field_type,
            index,
        });
        Ok(())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_map.contains_key(name)
    }

    pub fn get_field(&self, name: &str) -> Option<&BpsvField> {
        self.field_map.get(name).map(|&index| &self.fields[index])
    }

    pub fn fields(&self) -> &[BpsvField] {
        &self.fields
    }
}

//! PSV field type annotations (the `!TYPE:len` suffix on header cells)

use crate::error::{Error, Result};
use std::fmt;

/// A field's declared type, as carried by the header row.
///
/// The coordinator only ever needs the cleaned-up field *name*; the type
/// annotation is retained so callers that want it (e.g. to sanity-check a
/// `HEX:16` column really looks like a content key) can inspect it, but
/// nothing in this crate enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BpsvFieldType {
    /// String field with maximum length (0 = unlimited)
    String(u32),
    /// Hexadecimal field with byte count (N bytes = N*2 hex characters)
    Hex(u32),
    /// Decimal number field with storage size in bytes
    Decimal(u32),
}

impl BpsvFieldType {
    /// Parse a field type from a string like `"STRING:0"`, `"HEX:16"`, `"DEC:4"`.
    ///
    /// Case-insensitive for the type name.
    pub fn parse(type_spec: &str) -> Result<Self> {
        let (type_name, length_str) =
            type_spec
                .split_once(':')
                .ok_or_else(|| Error::InvalidFieldType {
                    field_type: type_spec.to_string(),
                })?;

        let length: u32 = length_str.parse().map_err(|_| Error::InvalidFieldType {
            field_type: type_spec.to_string(),
        })?;

        match type_name.to_ascii_uppercase().as_str() {
            "STRING" => Ok(BpsvFieldType::String(length)),
            "HEX" => Ok(BpsvFieldType::Hex(length)),
            "DEC" | "DECIMAL" => Ok(BpsvFieldType::Decimal(length)),
            _ => Err(Error::InvalidFieldType {
                field_type: type_spec.to_string(),
            }),
        }
    }

    /// The type name, uppercased.
    pub fn type_name(&self) -> &'static str {
        match self {
            BpsvFieldType::String(_) => "STRING",
            BpsvFieldType::Hex(_) => "HEX",
            BpsvFieldType::Decimal(_) => "DEC",
        }
    }

    /// The length specification that followed the `:`.
    pub fn length(&self) -> u32 {
        match self {
            BpsvFieldType::String(len) | BpsvFieldType::Hex(len) | BpsvFieldType::Decimal(len) => {
                *len
            }
        }
    }
}

impl fmt::Display for BpsvFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name(), self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_case_insensitively() {
        assert_eq!(
            BpsvFieldType::parse("STRING:0").unwrap(),
            BpsvFieldType::String(0)
        );
        assert_eq!(
            BpsvFieldType::parse("hex:16").unwrap(),
            BpsvFieldType::Hex(16)
        );
        assert_eq!(
            BpsvFieldType::parse("Dec:4").unwrap(),
            BpsvFieldType::Decimal(4)
        );
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(BpsvFieldType::parse("INVALID:0").is_err());
        assert!(BpsvFieldType::parse("STRING").is_err());
        assert!(BpsvFieldType::parse("STRING:abc").is_err());
    }
}

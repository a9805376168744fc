//! PSV document parser

use crate::document::BpsvDocument;
use crate::error::{Error, Result};
use crate::schema::BpsvSchema;

/// Parser for PSV documents.
pub struct BpsvParser;

impl BpsvParser {
    /// Parse a complete PSV document, keeping only data rows whose leading
    /// bytes equal `region`. All other rows are dropped silently; a
    /// mismatching row is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngdp_bpsv::BpsvParser;
    ///
    /// let content = "Region!STRING:0|BuildId!DEC:4\n## seqn = 12345\nus|1234\neu|5678";
    /// let doc = BpsvParser::parse(content, "us")?;
    /// assert_eq!(doc.sequence_number(), Some(12345));
    /// assert_eq!(doc.row_count(), 1);
    /// # Ok::<(), ngdp_bpsv::Error>(())
    /// ```
    pub fn parse(content: &str, region: &str) -> Result<BpsvDocument<'_>> {
        if content.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut lines = content.lines();

        let header_line = lines.next().ok_or(Error::EmptyDocument)?;
        let schema = BpsvSchema::parse_header(header_line)?;

        let mut sequence_number = None;
        let mut rows = Vec::new();

        for line in lines {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with("## seqn") {
                sequence_number = Self::parse_sequence_line(trimmed);
                continue;
            }

            if trimmed.starts_with('#') {
                continue;
            }

            if !trimmed.as_bytes().starts_with(region.as_bytes()) {
                continue;
            }

            rows.push(trimmed.split('|').collect());
        }

        Ok(BpsvDocument::new(schema, sequence_number, rows))
    }

    /// Parse a sequence number line (`## seqn = 12345`, `## seqn: 12345` or
    /// `## seqn 12345`). Malformed sequence lines are ignored rather than
    /// failing the whole document.
    fn parse_sequence_line(line: &str) -> Option<u32> {
        let after_seqn = line.strip_prefix("## seqn")?.trim_start();

        let number_str = if let Some(eq_pos) = after_seqn.find('=') {
            after_seqn[eq_pos + 1..].trim()
        } else if let Some(colon_pos) = after_seqn.find(':') {
            after_seqn[colon_pos + 1..].trim()
        } else {
            after_seqn
        };

        number_str.parse::<u32>().ok()
    }

    /// Parse just the header to get schema information, without filtering
    /// rows to any region.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngdp_bpsv::BpsvParser;
    ///
    /// let content = "Region!STRING:0|BuildId!DEC:4\n## seqn = 12345\nus|1234";
    /// let schema = BpsvParser::parse_schema(content)?;
    /// assert_eq!(schema.field_count(), 2);
    /// # Ok::<(), ngdp_bpsv::Error>(())
    /// ```
    pub fn parse_schema(content: &str) -> Result<BpsvSchema> {
        let first_line = content.lines().next().ok_or(Error::EmptyDocument)?;
        BpsvSchema::parse_header(first_line)
    }
}

//! # ngdp-bpsv
//!
//! A parser for the pipe-separated-value manifest format used to bootstrap
//! a content-distribution protocol client: typed header columns, an
//! optional sequence number, and region-filtered data rows.
//!
//! ## Format Structure
//!
//! ```text
//! FieldName!TYPE:length|AnotherField!TYPE:length
//! ## seqn = 12345
//! value1|value2
//! value3|value4
//! ```
//!
//! Rows are filtered at parse time: only rows whose leading bytes equal the
//! caller's region are kept, all others are dropped silently.
//!
//! ## Quick Start
//!
//! ```rust
//! use ngdp_bpsv::BpsvDocument;
//!
//! let data = "Region!STRING:0|BuildId!DEC:4\n## seqn = 12345\nus|1234\neu|5678";
//!
//! let doc = BpsvDocument::parse(data, "us")?;
//! println!("Sequence: {:?}", doc.sequence_number());
//! println!("Rows: {}", doc.row_count());
//! # Ok::<(), ngdp_bpsv::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod field_type;
pub mod parser;
pub mod schema;

pub use document::{BpsvDocument, BpsvRow};
pub use error::{Error, Result};
pub use field_type::BpsvFieldType;
pub use parser::BpsvParser;
pub use schema::{BpsvField, BpsvSchema};

//! CDN-config record
//!
//! Lists of content keys (`archives`, `patch-archives`, `builds`) are
//! decoded into a single owned byte buffer and referenced by `(start, end)`
//! segments, rather than one heap allocation per list — grounded on the
//! buffer-segment discipline used throughout this workspace's substrate.

use crate::error::{Error, Result};
use crate::line_parser;
use ngdp_buffer::Segment;
use ngdp_key::ContentKey;

const KEY_LEN: usize = 16;

/// A parsed `cdn.config` / CDN-config manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CdnConfig {
    key_buffer: Vec<u8>,
    archives: Segment,
    archive_group: Option<ContentKey>,
    patch_archives: Segment,
    patch_archive_group: Option<ContentKey>,
    builds: Segment,
}

impl CdnConfig {
    /// Parse a CDN-config manifest body using the line/equals format.
    /// Unknown keys are ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        let mut error = None;
        line_parser::for_each_pair(content, |key, value| {
            if error.is_some() {
                return;
            }
            if let Err(e) = config.handle_pair(key, value) {
                error = Some(e);
            }
        });

        if let Some(e) = error {
            return Err(e);
        }

        Ok(config)
    }

    fn handle_pair(&mut self, key: &str, value: &str) -> Result<()> {
        match key.to_ascii_lowercase().as_str() {
            "archives" => self.archives = self.append_key_list("archives", value)?,
            "archive-group" => {
                self.archive_group = Some(decode_key("archive-group", value.trim())?)
            }
            "patch-archives" => {
                self.patch_archives = self.append_key_list("patch-archives", value)?
            }
            "patch-archive-group" => {
                self.patch_archive_group = Some(decode_key("patch-archive-group", value.trim())?)
            }
            "builds" => self.builds = self.append_key_list("builds", value)?,
            _ => {
                tracing::debug!(%key, "ignoring unknown cdn-config key");
            }
        }
        Ok(())
    }

    fn append_key_list(&mut self, field: &'static str, value: &str) -> Result<Segment> {
        let start = self.key_buffer.len();
        for token in value.split_whitespace() {
            let key = decode_key(field, token)?;
            self.key_buffer.extend_from_slice(key.as_bytes());
        }
        Ok(Segment::new(start, self.key_buffer.len()))
    }

    fn keys_in(&self, segment: Segment) -> Vec<ContentKey> {
        self.key_buffer[segment.start..segment.end]
            .chunks_exact(KEY_LEN)
            .map(|chunk| {
                let mut bytes = [0u8; KEY_LEN];
                bytes.copy_from_slice(chunk);
                ContentKey::from_bytes(bytes)
            })
            .collect()
    }

    pub fn archives(&self) -> Vec<ContentKey> {
        self.keys_in(self.archives)
    }

    pub fn archive_group(&self) -> Option<ContentKey> {
        self.archive_group
    }

    pub fn patch_archives(&self) -> Vec<ContentKey> {
        self.keys_in(self.patch_archives)
    }

    pub fn patch_archive_group(&self) -> Option<ContentKey> {
        self.patch_archive_group
    }

    pub fn builds(&self) -> Vec<ContentKey> {
        self.keys_in(self.builds)
    }
}

fn decode_key(field: &'static str, hex: &str) -> Result<ContentKey> {
    ContentKey::from_hex(hex).map_err(|source| Error::InvalidKey { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
archives = abcd1234abcd1234abcd1234abcd1234 1234abcd1234abcd1234abcd1234abcd
archive-group = deadbeefdeadbeefdeadbeefdeadbeef
patch-archives = abcd1234abcd1234abcd1234abcd1234
builds = 1234abcd1234abcd1234abcd1234abcd
unknown-key = ignored
";

    #[test]
    fn parses_key_lists_and_group_scalars() {
        let config = CdnConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.archives().len(), 2);
        assert_eq!(config.patch_archives().len(), 1);
        assert_eq!(config.builds().len(), 1);
        assert!(config.archive_group().is_some());
        assert!(config.patch_archive_group().is_none());
    }

    #[test]
    fn unknown_keys_are_ignored_not_fatal() {
        let config = CdnConfig::parse("totally-unknown = value\narchives = abcd1234abcd1234abcd1234abcd1234").unwrap();
        assert_eq!(config.archives().len(), 1);
    }

    #[test]
    fn malformed_key_length_is_an_error() {
        let result = CdnConfig::parse("archive-group = short");
        assert!(matches!(result, Err(Error::InvalidKey { field: "archive-group", .. })));
    }
}

//! Build-config record
//!
//! String-valued fields are stored as zero-terminated segments into a
//! single owned byte buffer rather than one `String` allocation each,
//! mirroring the contiguous-buffer discipline used for [`crate::CdnConfig`]'s
//! key lists.

use crate::error::{Error, Result};
use crate::line_parser;
use ngdp_buffer::{Segment, View};
use ngdp_key::ContentKey;

/// A parsed `build.config` / build-config manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildConfig {
    root: Option<ContentKey>,
    install: Option<ContentKey>,
    download: Option<ContentKey>,
    partial_priority: Option<ContentKey>,
    patch: Option<ContentKey>,
    patch_config: Option<ContentKey>,
    encoding: Option<[ContentKey; 2]>,
    encoding_size: Option<[i32; 2]>,
    install_size: Option<i32>,
    download_size: Option<i32>,
    partial_priority_size: Option<i32>,
    patch_size: Option<i32>,
    string_buffer: Vec<u8>,
    build_name: Option<Segment>,
    build_playbuild_installer: Option<Segment>,
    build_product: Option<Segment>,
    build_uid: Option<Segment>,
}

impl BuildConfig {
    /// Parse a build-config manifest body using the line/equals format.
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
            "root" => self.root = Some(decode_key("root", value.trim())?),
            "install" => self.install = Some(decode_key("install", value.trim())?),
            "download" => self.download = Some(decode_key("download", value.trim())?),
            "partial-priority" => {
                self.partial_priority = Some(decode_key("partial-priority", value.trim())?)
            }
            "patch" => self.patch = Some(decode_key("patch", value.trim())?),
            "patch-config" => self.patch_config = Some(decode_key("patch-config", value.trim())?),
            "encoding" => self.encoding = Some(decode_key_pair("encoding", value)?),
            "encoding-size" => self.encoding_size = Some(decode_int_pair("encoding-size", value)?),
            "install-size" => self.install_size = Some(parse_int(value)),
            "download-size" => self.download_size = Some(parse_int(value)),
            "partial-priority-size" => self.partial_priority_size = Some(parse_int(value)),
            "patch-size" => self.patch_size = Some(parse_int(value)),
            "build-name" => self.build_name = Some(self.append_string(value)),
            "build-playbuild-installer" => {
                self.build_playbuild_installer = Some(self.append_string(value));
            }
            "build-product" => self.build_product = Some(self.append_string(value)),
            "build-uid" => self.build_uid = Some(self.append_string(value)),
            _ => {
                tracing::debug!(%key, "ignoring unknown build-config key");
            }
        }
        Ok(())
    }

    fn append_string(&mut self, value: &str) -> Segment {
        let start = self.string_buffer.len();
        self.string_buffer.extend_from_slice(value.as_bytes());
        let end = self.string_buffer.len();
        self.string_buffer.push(0);
        Segment::new(start, end)
    }

    fn resolve(&self, segment: Option<Segment>) -> Option<&str> {
        let segment = segment?;
        std::str::from_utf8(&self.string_buffer[segment.start..segment.end]).ok()
    }

    pub fn root(&self) -> Option<ContentKey> {
        self.root
    }

    pub fn install(&self) -> Option<ContentKey> {
        self.install
    }

    pub fn download(&self) -> Option<ContentKey> {
        self.download
    }

    pub fn partial_priority(&self) -> Option<ContentKey> {
        self.partial_priority
    }

    pub fn patch(&self) -> Option<ContentKey> {
        self.patch
    }

    pub fn patch_config(&self) -> Option<ContentKey> {
        self.patch_config
    }

    /// Index 0 = content key, index 1 = encoded key.
    pub fn encoding(&self) -> Option<[ContentKey; 2]> {
        self.encoding
    }

    pub fn encoding_size(&self) -> Option<[i32; 2]> {
        self.encoding_size
    }

    pub fn install_size(&self) -> Option<i32> {
        self.install_size
    }

    pub fn download_size(&self) -> Option<i32> {
        self.download_size
    }

    pub fn partial_priority_size(&self) -> Option<i32> {
        self.partial_priority_size
    }

    pub fn patch_size(&self) -> Option<i32> {
        self.patch_size
    }

    pub fn build_name(&self) -> Option<&str> {
        self.resolve(self.build_name)
    }

    pub fn build_playbuild_installer(&self) -> Option<&str> {
        self.resolve(self.build_playbuild_installer)
    }

    pub fn build_product(&self) -> Option<&str> {
        self.resolve(self.build_product)
    }

    pub fn build_uid(&self) -> Option<&str> {
        self.resolve(self.build_uid)
    }
}

fn decode_key(field: &'static str, hex: &str) -> Result<ContentKey> {
    ContentKey::from_hex(hex).map_err(|source| Error::InvalidKey { field, source })
}

fn decode_key_pair(field: &'static str, value: &str) -> Result<[ContentKey; 2]> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(Error::EncodingArity {
            field,
            actual: tokens.len(),
        });
    }
    Ok([decode_key(field, tokens[0])?, decode_key(field, tokens[1])?])
}

fn decode_int_pair(field: &'static str, value: &str) -> Result<[i32; 2]> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(Error::EncodingArity {
            field,
            actual: tokens.len(),
        });
    }
    Ok([parse_int(tokens[0]), parse_int(tokens[1])])
}

fn parse_int(value: &str) -> i32 {
    View::new(value.trim().as_bytes()).parse_int(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
root = abcd1234abcd1234abcd1234abcd1234
install = 1234abcd1234abcd1234abcd1234abcd
encoding = abcd1234abcd1234abcd1234abcd1234 1234abcd1234abcd1234abcd1234abcd
encoding-size = 100 200
install-size = 12345
build-name = WOW-12345patch
build-uid = wow
unknown-key = ignored
";

    #[test]
    fn parses_scalars_pairs_and_strings() {
        let config = BuildConfig::parse(SAMPLE).unwrap();
        assert!(config.root().is_some());
        assert!(config.install().is_some());
        assert_eq!(config.encoding().unwrap().len(), 2);
        assert_eq!(config.encoding_size(), Some([100, 200]));
        assert_eq!(config.install_size(), Some(12345));
        assert_eq!(config.build_name(), Some("WOW-12345patch"));
        assert_eq!(config.build_uid(), Some("wow"));
    }

    #[test]
    fn encoding_requires_exactly_two_tokens() {
        let result = BuildConfig::parse("encoding = onlyonetoken");
        assert!(matches!(
            result,
            Err(Error::EncodingArity {
                field: "encoding",
                actual: 1
            })
        ));
    }

    #[test]
    fn encoding_size_requires_exactly_two_tokens() {
        let result = BuildConfig::parse("encoding-size = 100");
        assert!(matches!(
            result,
            Err(Error::EncodingArity {
                field: "encoding-size",
                actual: 1
            })
        ));
    }

    #[test]
    fn encoding_rejects_three_tokens() {
        let result = BuildConfig::parse(
            "encoding = abcd1234abcd1234abcd1234abcd1234 1234abcd1234abcd1234abcd1234abcd extra",
        );
        assert!(matches!(result, Err(Error::EncodingArity { .. })));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config = BuildConfig::parse("not-a-real-field = x\nbuild-uid = wow").unwrap();
        assert_eq!(config.build_uid(), Some("wow"));
    }
}

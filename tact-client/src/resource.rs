//! Content-addressed resource types served from a CDN host.

/// Which CDN path segment a content-addressed download is served under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Data,
    Config,
    Patch,
    /// Falls back to the bare `cdnPath/` prefix with no type segment.
    Default,
}

impl ResourceType {
    pub(crate) fn segment(self) -> &'static str {
        match self {
            Self::Data => "/data/",
            Self::Config => "/config/",
            Self::Patch => "/patch/",
            Self::Default => "/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_match_the_known_cdn_layout() {
        assert_eq!(ResourceType::Data.segment(), "/data/");
        assert_eq!(ResourceType::Config.segment(), "/config/");
        assert_eq!(ResourceType::Patch.segment(), "/patch/");
        assert_eq!(ResourceType::Default.segment(), "/");
    }
}

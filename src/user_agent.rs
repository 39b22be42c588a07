//! Shared User-Agent string for every request the pipeline sends.
//!
//! The wiki and its image CDN see the same identifier for the document fetch
//! and the icon downloads (good citizenship; RFC 9308).

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/alchemy-dataset";

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("alchemy-dataset/{version} (dataset-scraper; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_project_url_and_version() {
        let ua = default_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
        assert_eq!(
            Some(env!("CARGO_PKG_VERSION")),
            ua.strip_prefix("alchemy-dataset/")
                .and_then(|s| s.split(' ').next()),
            "UA must contain crate version"
        );
    }
}

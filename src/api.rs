//! Helpers shared by the outbound HTTP clients.

use anyhow::{anyhow, Result};
use reqwest::Url;

pub const USER_AGENT: &str = "UnderLand-Bot/2025.1 (Discord Bot)";

/// Appends percent-encoded path segments to `base`.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{} cannot take path segments", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint("https://api.dictionaryapi.dev/api/v2/entries/en/", &["ice cream"]).unwrap();
        assert_eq!(url.as_str(), "https://api.dictionaryapi.dev/api/v2/entries/en/ice%20cream");
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let url = endpoint("https://en.wikipedia.org/api/rest_v1/page/summary", &["Rust_(programming_language)"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Rust_(programming_language)"
        );
    }

    #[test]
    fn test_endpoint_rejects_cannot_be_a_base() {
        assert!(endpoint("mailto:someone@example.com", &["x"]).is_err());
    }
}

use url::{ParseError, Url};

pub fn to_url(host: &str) -> Result<Url, ParseError> {
    Url::parse(host)
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
/// A trailing slash on `base` does not produce an empty segment.
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ParseError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod cfg_tests {
    use crate::utils::urls::{join_segments, to_url};

    #[test]
    pub fn test_join_segments() {
        let base = to_url("http://api.local").unwrap();
        let url = join_segments(&base, &["ai", "analyze", "abc.csv"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/ai/analyze/abc.csv");

        let base = to_url("http://api.local/v1/").unwrap();
        let url = join_segments(&base, &["file", "upload_file"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/v1/file/upload_file");

        let url = join_segments(&base, &["ai", "analyze", "a b/c.csv"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/v1/ai/analyze/a%20b%2Fc.csv");

        let opaque = to_url("mailto:someone@example.com").unwrap();
        assert!(join_segments(&opaque, &["x"]).is_err());
    }
}

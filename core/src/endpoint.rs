//! URL validation and construction.

use url::Url;

use crate::error::RequestError;

/// Parse `input` as an absolute `http` or `https` URL with a host.
pub fn parse_url(input: &str) -> Result<Url, RequestError> {
    let url = Url::parse(input.trim()).map_err(|_| RequestError::InvalidUrl(input.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(RequestError::InvalidUrl(input.to_string())),
    }
}

/// Parse `base` and replace its query string with `query`, in order.
///
/// Names and values are form-urlencoded, so a space becomes `+`. An empty
/// `query` leaves the URL without a query string.
pub fn build_url<I, K, V>(base: &str, query: I) -> Result<Url, RequestError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = parse_url(base)?;
    url.set_query(None);
    let mut pairs = query.into_iter().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_url("http://localhost:3000/data").is_ok());
        assert!(parse_url("https://api.example.com").is_ok());
        assert!(parse_url("  https://api.example.com/x  ").is_ok());
    }

    #[test]
    fn rejects_malformed_and_unsupported() {
        for input in [
            "",
            "not a url",
            "/relative/path",
            "http://",
            "ftp://example.com/file",
            "mailto:someone@example.com",
            "http://exa mple.com",
        ] {
            let err = parse_url(input).unwrap_err();
            assert!(
                matches!(&err, RequestError::InvalidUrl(s) if s == input),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn build_url_encodes_query() {
        let url = build_url(
            "https://api.example.com/search",
            [("query", "rust programming"), ("lang", "en&fr")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/search?query=rust+programming&lang=en%26fr"
        );
    }

    #[test]
    fn build_url_replaces_existing_query() {
        let url = build_url("https://api.example.com/search?old=1", [("new", "2")]).unwrap();
        assert_eq!(url.query(), Some("new=2"));

        let empty: [(&str, &str); 0] = [];
        let url = build_url("https://api.example.com/search?old=1", empty).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/search");
    }

    #[test]
    fn build_url_rejects_bad_base() {
        let err = build_url("::", [("a", "b")]).unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl(_)));
    }
}

use url::Url;

/// Extracts the site host from a URL
///
/// The host is lowercased and a leading `www.` is dropped, so
/// `www.example.com` and `example.com` name the same site.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use qa_harvest::url::site_host;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(site_host(&url), Some("example.com".to_string()));
/// ```
pub fn site_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        }
    })
}

/// Returns true when both URLs belong to the same origin
///
/// Scheme, site host and effective port must all match.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && site_host(a).is_some()
        && site_host(a) == site_host(b)
        && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_site_host_simple() {
        assert_eq!(
            site_host(&url("https://example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_site_host_strips_www() {
        assert_eq!(
            site_host(&url("https://www.example.com/a")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_site_host_keeps_subdomain() {
        assert_eq!(
            site_host(&url("https://blog.example.com/post")),
            Some("blog.example.com".to_string())
        );
    }

    #[test]
    fn test_same_origin() {
        assert!(same_origin(
            &url("https://example.com/faq"),
            &url("https://www.example.com/other?x=1")
        ));
        assert!(same_origin(
            &url("https://example.com/"),
            &url("https://example.com:443/")
        ));
    }

    #[test]
    fn test_different_origin() {
        assert!(!same_origin(
            &url("https://example.com/"),
            &url("https://other.com/")
        ));
        assert!(!same_origin(
            &url("https://example.com/"),
            &url("http://example.com/")
        ));
        assert!(!same_origin(
            &url("http://127.0.0.1:8080/"),
            &url("http://127.0.0.1:9090/")
        ));
        assert!(!same_origin(
            &url("https://example.com/"),
            &url("https://blog.example.com/")
        ));
    }
}

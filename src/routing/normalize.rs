//! Repair of the target URL embedded in the proxy path.

const HTTP: &str = "http://";
const HTTPS: &str = "https://";

/// Turn the path tail (leading `/` already stripped) into an absolute URL.
///
/// Scheme-less input gets `https://`. A collapsed `https:/` is repaired once.
/// Nothing after the scheme is validated.
pub fn normalize(raw: &str) -> String {
    if !raw.starts_with("http") {
        return format!("{HTTPS}{raw}");
    }
    if raw.starts_with(HTTP) || raw.starts_with(HTTPS) {
        return raw.to_string();
    }
    raw.replacen("s:/", "s://", 1)
}

/// Append a raw query string, if any.
pub fn with_query(url: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{url}?{q}"),
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_https_scheme() {
        assert_eq!(normalize("github.com/a/b"), "https://github.com/a/b");
    }

    #[test]
    fn test_repairs_collapsed_scheme() {
        assert_eq!(normalize("https:/github.com/a/b"), "https://github.com/a/b");
    }

    #[test]
    fn test_repairs_first_occurrence_only() {
        assert_eq!(
            normalize("https:/github.com/a/b/blob/x/https:/y"),
            "https://github.com/a/b/blob/x/https:/y"
        );
    }

    #[test]
    fn test_valid_input_unchanged() {
        assert_eq!(normalize("https://github.com/a/b"), "https://github.com/a/b");
        assert_eq!(normalize("http://github.com/a/b"), "http://github.com/a/b");
        let once = normalize("github.com/a/b");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("https://x/y", None), "https://x/y");
        assert_eq!(with_query("https://x/y", Some("")), "https://x/y");
        assert_eq!(with_query("https://x/y", Some("a=1")), "https://x/y?a=1");
    }
}

//! jsDelivr shorthand rewriting for branch files.
//!
//! Only two shapes have a mirror form:
//! - `github.com/{author}/{repo}/blob/{ref}/{path}`
//! - `raw.githubusercontent.com/{author}/{repo}/{ref}/{path}`
//!
//! Both are spliced in place into the `{author}/{repo}@{ref}/{path}`
//! shorthand; scheme and host are kept. The client is redirected to the
//! result; the proxy never fetches the mirror itself.

use crate::routing::classifier::UrlKind;

/// Mirror URL for `url`, or `None` when no mirror form applies.
pub fn rewrite_to_mirror(url: &str) -> Option<String> {
    if UrlKind::Blob.is_match(url) {
        return Some(blob_to_mirror(url));
    }
    if UrlKind::RawContent.is_match(url) {
        return raw_to_mirror(url);
    }
    None
}

/// First `/blob/` becomes `@`. A `/raw/` view has none and is returned as is.
pub fn blob_to_mirror(url: &str) -> String {
    url.replacen("/blob/", "@", 1)
}

/// `host/author/repo/ref/path` → `host/author/repo@ref/path`.
pub fn raw_to_mirror(url: &str) -> Option<String> {
    let (origin, path) = split_origin(url)?;
    let mut parts = path.splitn(3, '/');
    let author = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    let rest = parts.next().filter(|s| !s.is_empty())?;
    Some(format!("{origin}/{author}/{repo}@{rest}"))
}

/// `url` split into scheme plus host, and the path without its leading `/`.
fn split_origin(url: &str) -> Option<(&str, &str)> {
    let host_start = url.find("://").map_or(0, |i| i + 3);
    let slash = host_start + url[host_start..].find('/')?;
    Some((&url[..slash], &url[slash + 1..]))
}

//! Resource classification for upstream URLs.
//!
//! Five URL shapes are recognized, tried in order:
//! 1. release / archive downloads
//! 2. blob / raw file views
//! 3. git smart-http (`info/refs`, `git-upload-pack`, ...)
//! 4. raw content host
//! 5. gists
//!
//! The captured fields form the resource identity checked by the
//! access lists, and a match also marks a redirect target that should be
//! routed back through the proxy.

use std::sync::LazyLock;

use regex::Regex;

/// The recognized URL shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Release,
    Blob,
    GitProtocol,
    RawContent,
    Gist,
}

impl UrlKind {
    pub const ALL: [UrlKind; 5] = [
        UrlKind::Release,
        UrlKind::Blob,
        UrlKind::GitProtocol,
        UrlKind::RawContent,
        UrlKind::Gist,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            UrlKind::Release => &RELEASE,
            UrlKind::Blob => &BLOB,
            UrlKind::GitProtocol => &GIT_PROTOCOL,
            UrlKind::RawContent => &RAW_CONTENT,
            UrlKind::Gist => &GIST,
        }
    }

    /// Returns true if the whole URL has this shape.
    pub fn is_match(&self, url: &str) -> bool {
        self.pattern().is_match(url)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKind::Release => "release",
            UrlKind::Blob => "blob",
            UrlKind::GitProtocol => "git",
            UrlKind::RawContent => "raw",
            UrlKind::Gist => "gist",
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

static RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:releases|archive)/.*$")
});

static BLOB: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:blob|raw)/.*$")
});

static GIT_PROTOCOL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:https?://)?github\.com/(?P<author>.+?)/(?P<repo>.+?)/(?:info|git-).*$")
});

static RAW_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(?:https?://)?raw\.(?:githubusercontent|github)\.com/(?P<author>.+?)/(?P<repo>.+?)/.+?/.+$",
    )
});

static GIST: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:https?://)?gist\.(?:githubusercontent|github)\.com/(?P<author>.+?)/.+?/.+$")
});

/// A URL that matched one of the known shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: UrlKind,
    pub identity: Vec<String>,
}

/// Classify `url`, returning the first matching shape and its captures.
pub fn classify(url: &str) -> Option<Classified> {
    UrlKind::ALL.iter().find_map(|kind| {
        let captures = kind.pattern().captures(url)?;
        let identity = captures
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
        Some(Classified {
            kind: *kind,
            identity,
        })
    })
}

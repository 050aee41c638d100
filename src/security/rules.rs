//! Path-segment rules used by the allow, deny and bypass lists.
//!
//! # Responsibilities
//! - Parse a newline-separated list of `/`-delimited rules
//! - Match a resource identity (`[author, repo, ...]`) against a rule
//!
//! # Design Decisions
//! - `*` accepts any value at its position
//! - Matching is positional; an identity longer than the rule still matches
//!   (trailing identity segments are unconstrained)
//! - Blank lines are skipped so parsing never emits an empty rule

use std::fmt;

/// Token accepting any segment value.
pub const WILDCARD: &str = "*";

/// A single rule: an ordered list of literal or wildcard segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    segments: Vec<String>,
}

impl Rule {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one `/`-delimited line. Segments are trimmed.
    pub fn parse(line: &str) -> Self {
        Self::new(line.split('/').map(str::trim))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if every rule segment is a wildcard or equals the
    /// identity segment at the same index.
    pub fn matches<S: AsRef<str>>(&self, identity: &[S]) -> bool {
        for (i, segment) in self.segments.iter().enumerate() {
            let Some(value) = identity.get(i) else {
                return false;
            };
            if segment != WILDCARD && segment != value.as_ref() {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// An unordered set of rules; any match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse a newline-separated rule list, skipping blank lines.
    pub fn parse(input: &str) -> Self {
        let rules = input
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Rule::parse)
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// First rule matching the identity, if any.
    pub fn find<S: AsRef<str>>(&self, identity: &[S]) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(identity))
    }

    pub fn contains<S: AsRef<str>>(&self, identity: &[S]) -> bool {
        self.find(identity).is_some()
    }
}

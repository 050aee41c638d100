//! Access control over matched resource identities.
//!
//! Evaluation order is fixed:
//! 1. No identity (unrecognized URL) → allow
//! 2. Non-empty allow list without a match → deny
//! 3. Deny list match → deny
//! 4. Bypass list match → bypass
//! 5. Otherwise → allow

use crate::config::RulesConfig;
use crate::security::rules::RuleList;

/// Which list refused the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    WhiteList,
    BlackList,
}

impl DenyReason {
    /// Body returned to the client with the 403.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::WhiteList => "Forbidden by white list.",
            DenyReason::BlackList => "Forbidden by black list.",
        }
    }
}

/// Outcome of access control for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to mirroring or forwarding.
    Allow,
    /// Refuse with 403.
    Deny(DenyReason),
    /// Redirect the client straight to the target.
    Bypass,
}

/// Immutable evaluator built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    allow: RuleList,
    deny: RuleList,
    bypass: RuleList,
}

impl AccessControl {
    pub fn new(allow: RuleList, deny: RuleList, bypass: RuleList) -> Self {
        Self { allow, deny, bypass }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(
            RuleList::parse(&config.white_list),
            RuleList::parse(&config.black_list),
            RuleList::parse(&config.pass_list),
        )
    }

    pub fn authorize<S: AsRef<str>>(&self, identity: Option<&[S]>) -> Decision {
        let Some(identity) = identity else {
            return Decision::Allow;
        };

        if !self.allow.is_empty() && !self.allow.contains(identity) {
            return Decision::Deny(DenyReason::WhiteList);
        }
        if self.deny.contains(identity) {
            return Decision::Deny(DenyReason::BlackList);
        }
        if self.bypass.contains(identity) {
            return Decision::Bypass;
        }
        Decision::Allow
    }

    pub fn rule_counts(&self) -> (usize, usize, usize) {
        (self.allow.len(), self.deny.len(), self.bypass.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(allow: &str, deny: &str, bypass: &str) -> AccessControl {
        AccessControl::new(
            RuleList::parse(allow),
            RuleList::parse(deny),
            RuleList::parse(bypass),
        )
    }

    #[test]
    fn test_unrecognized_url_is_allowed() {
        let ac = control("octo/repo", "*", "*");
        assert_eq!(ac.authorize::<&str>(None), Decision::Allow);
    }

    #[test]
    fn test_empty_lists_allow_everything() {
        let ac = control("", "", "");
        assert_eq!(ac.authorize(Some(&["a", "b"][..])), Decision::Allow);
    }

    #[test]
    fn test_allow_list_gate() {
        let ac = control("octo/*", "", "");
        assert_eq!(ac.authorize(Some(&["octo", "repo"][..])), Decision::Allow);
        assert_eq!(
            ac.authorize(Some(&["other", "repo"][..])),
            Decision::Deny(DenyReason::WhiteList)
        );
    }

    #[test]
    fn test_deny_overrides_allow() {
        let ac = control("octo/*", "octo/secret", "");
        assert_eq!(
            ac.authorize(Some(&["octo", "secret"][..])),
            Decision::Deny(DenyReason::BlackList)
        );
        assert_eq!(ac.authorize(Some(&["octo", "public"][..])), Decision::Allow);
    }

    #[test]
    fn test_deny_wins_over_bypass() {
        let ac = control("", "octo/repo", "octo/*");
        assert_eq!(
            ac.authorize(Some(&["octo", "repo"][..])),
            Decision::Deny(DenyReason::BlackList)
        );
        assert_eq!(ac.authorize(Some(&["octo", "other"][..])), Decision::Bypass);
    }

    #[test]
    fn test_allow_miss_wins_over_bypass() {
        let ac = control("octo/*", "", "*/*");
        assert_eq!(
            ac.authorize(Some(&["other", "repo"][..])),
            Decision::Deny(DenyReason::WhiteList)
        );
    }

    #[test]
    fn test_from_config() {
        let config = RulesConfig {
            white_list: String::new(),
            black_list: "bad/*\n".into(),
            pass_list: "\nfast/lane".into(),
        };
        let ac = AccessControl::from_config(&config);
        assert_eq!(ac.rule_counts(), (0, 1, 1));
        assert_eq!(ac.authorize(Some(&["fast", "lane"][..])), Decision::Bypass);
        assert_eq!(
            ac.authorize(Some(&["bad", "x"][..])),
            Decision::Deny(DenyReason::BlackList)
        );
    }

    #[test]
    fn test_deny_messages() {
        assert_eq!(DenyReason::WhiteList.message(), "Forbidden by white list.");
        assert_eq!(DenyReason::BlackList.message(), "Forbidden by black list.");
    }
}

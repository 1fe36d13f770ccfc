// src/resource.rs
//! Canonical platform keys: the supported allowlist, display labels and the
//! substring-rule normalizer that maps provider identifiers onto them.

use serde::Serialize;

/// Every canonical key the feed will ever surface. Order is display order.
pub const SUPPORTED_RESOURCES: &[&str] = &[
    "leetcode.com",
    "codeforces.com",
    "codechef.com",
    "geeksforgeeks.org",
    "atcoder.jp",
    "kaggle.com",
    "topcoder.com",
    "hackerrank.com",
    "hackerearth.com",
    "interviewbit.com",
    "codingninjas.com",
];

/// Ordered (patterns -> canonical key) rules. First match wins.
const RULES: &[(&[&str], &str)] = &[
    (&["leetcode"], "leetcode.com"),
    (&["codeforces"], "codeforces.com"),
    (&["codechef"], "codechef.com"),
    (&["geeksforgeeks", "gfg"], "geeksforgeeks.org"),
    (&["atcoder"], "atcoder.jp"),
    (&["hackerrank"], "hackerrank.com"),
    (&["hackerearth"], "hackerearth.com"),
    (&["interviewbit"], "interviewbit.com"),
    (&["codingninjas", "codestudio"], "codingninjas.com"),
    (&["kaggle"], "kaggle.com"),
    (&["topcoder"], "topcoder.com"),
];

const LABELS: &[(&str, &str)] = &[
    ("leetcode.com", "LeetCode"),
    ("codeforces.com", "Codeforces"),
    ("codechef.com", "CodeChef"),
    ("geeksforgeeks.org", "GFG"),
    ("atcoder.jp", "AtCoder"),
    ("kaggle.com", "Kaggle"),
    ("topcoder.com", "TopCoder"),
    ("hackerrank.com", "HackerRank"),
    ("hackerearth.com", "HackerEarth"),
    ("interviewbit.com", "InterviewBit"),
    ("codingninjas.com", "CodeStudio"),
];

/// Map an arbitrary provider identifier to its canonical key.
///
/// Unrecognized input comes back lower-cased and trimmed, which the
/// allowlist check downstream then rejects.
pub fn normalize_resource(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase();
    for (patterns, canonical) in RULES {
        if patterns.iter().any(|p| normalized.contains(p)) {
            return (*canonical).to_string();
        }
    }
    normalized
}

pub fn is_supported(resource: &str) -> bool {
    SUPPORTED_RESOURCES.contains(&resource)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlatformOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Allowlist with display labels, in allowlist order.
pub fn platform_options() -> Vec<PlatformOption> {
    SUPPORTED_RESOURCES
        .iter()
        .map(|value| PlatformOption {
            value,
            label: LABELS
                .iter()
                .find(|(k, _)| k == value)
                .map(|(_, l)| *l)
                .unwrap_or(value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_target_is_supported() {
        for (_, canonical) in RULES {
            assert!(is_supported(canonical), "{canonical} missing from allowlist");
        }
    }

    #[test]
    fn first_rule_wins_on_overlap() {
        // contains both "leetcode" and "gfg"; leetcode rule comes first
        assert_eq!(normalize_resource("gfg-leetcode-mirror"), "leetcode.com");
    }

    #[test]
    fn codestudio_alias() {
        assert_eq!(normalize_resource("CodeStudio"), "codingninjas.com");
    }

    #[test]
    fn labels_cover_allowlist() {
        let opts = platform_options();
        assert_eq!(opts.len(), SUPPORTED_RESOURCES.len());
        assert!(opts.iter().all(|o| o.label != o.value));
        assert_eq!(opts[3].label, "GFG");
    }
}

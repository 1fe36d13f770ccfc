// tests/resource_normalize.rs
use contest_feed::resource::{is_supported, normalize_resource, SUPPORTED_RESOURCES};

#[test]
fn decorated_names_map_to_canonical_keys() {
    assert_eq!(normalize_resource("LeetCode.com"), "leetcode.com");
    assert_eq!(normalize_resource("  leetcode  "), "leetcode.com");
    assert_eq!(normalize_resource("some-gfg-portal"), "geeksforgeeks.org");
    assert_eq!(normalize_resource("GeeksForGeeks"), "geeksforgeeks.org");
    assert_eq!(normalize_resource("codeforces.com/gym"), "codeforces.com");
    assert_eq!(normalize_resource("AtCoder"), "atcoder.jp");
}

#[test]
fn unknown_passes_through_and_fails_allowlist() {
    let n = normalize_resource("  UnknownJudge.org ");
    assert_eq!(n, "unknownjudge.org");
    assert!(!is_supported(&n));
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        "LeetCode.com",
        "  leetcode  ",
        "some-gfg-portal",
        "unknownjudge.org",
        "  MiXeD  ",
        "",
        "codestudio",
        "Kaggle Competitions",
        "topcoder.com",
    ];
    for x in inputs
        .iter()
        .copied()
        .chain(SUPPORTED_RESOURCES.iter().copied())
    {
        let once = normalize_resource(x);
        assert_eq!(normalize_resource(&once), once, "not idempotent for {x:?}");
    }
}

#[test]
fn canonical_keys_are_fixed_points() {
    for key in SUPPORTED_RESOURCES {
        assert_eq!(normalize_resource(key), *key);
        assert!(is_supported(key));
    }
}

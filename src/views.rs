// src/views.rs
//! Read-side narrowing of an already aggregated feed: platform / search /
//! upcoming filters and the headline counters.

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::contest::Contest;
use crate::ingest::count_by_platform;
use crate::resource::normalize_resource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    /// Canonical keys; empty means all platforms.
    pub platforms: Vec<String>,
    /// Lower-cased, trimmed search text; empty means no search.
    pub search: String,
    pub upcoming_only: bool,
}

impl FeedQuery {
    pub fn new(platform: Option<&str>, q: Option<&str>, upcoming: Option<&str>) -> Self {
        let platforms = platform
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(normalize_resource)
            .collect();
        let search = q.unwrap_or_default().trim().to_lowercase();
        let upcoming_only = matches!(
            upcoming.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
            Some("1" | "true")
        );
        Self {
            platforms,
            search,
            upcoming_only,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.platforms.is_empty() && self.search.is_empty() && !self.upcoming_only
    }

    pub fn matches(&self, c: &Contest, now: DateTime<FixedOffset>) -> bool {
        if !self.platforms.is_empty() && !self.platforms.iter().any(|p| *p == c.resource) {
            return false;
        }
        if !self.search.is_empty() && !c.event.to_lowercase().contains(&self.search) {
            return false;
        }
        !self.upcoming_only || is_upcoming(c, now)
    }

    /// Keeps feed order.
    pub fn apply(&self, contests: Vec<Contest>, now: DateTime<FixedOffset>) -> Vec<Contest> {
        if self.is_noop() {
            return contests;
        }
        contests
            .into_iter()
            .filter(|c| self.matches(c, now))
            .collect()
    }
}

/// Starts today or later (in `now`'s zone), or is reported live.
pub fn is_upcoming(c: &Contest, now: DateTime<FixedOffset>) -> bool {
    if c.is_live() {
        return true;
    }
    c.start_at(*now.offset())
        .is_some_and(|s| s.date_naive() >= now.date_naive())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedStats {
    /// Every contest in the month feed.
    pub total: usize,
    /// The "Total" headline: contests still to come (see [`is_upcoming`]).
    pub upcoming: usize,
    pub today: usize,
    pub week: usize,
    pub by_platform: BTreeMap<String, usize>,
}

impl FeedStats {
    pub fn compute(contests: &[Contest], now: DateTime<FixedOffset>) -> Self {
        let tz = *now.offset();
        let week_end = now + Duration::days(7);
        let mut upcoming = 0;
        let mut today = 0;
        let mut week = 0;

        for c in contests.iter().filter(|c| is_upcoming(c, now)) {
            upcoming += 1;
            let Some(start) = c.start_at(tz) else { continue };
            if start.date_naive() == now.date_naive() {
                today += 1;
            }
            if start >= now && start <= week_end {
                week += 1;
            }
        }

        Self {
            total: contests.len(),
            upcoming,
            today,
            week,
            by_platform: count_by_platform(contests),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn c(event: &str, start: &str, resource: &str, status: Option<&str>) -> Contest {
        Contest {
            event: event.into(),
            start: start.into(),
            end: start.into(),
            resource: resource.into(),
            href: String::new(),
            status: status.map(Into::into),
        }
    }

    #[test]
    fn query_parsing_normalizes_platforms() {
        let q = FeedQuery::new(Some("LeetCode, gfg,,"), Some("  Weekly "), Some("TRUE"));
        assert_eq!(q.platforms, vec!["leetcode.com", "geeksforgeeks.org"]);
        assert_eq!(q.search, "weekly");
        assert!(q.upcoming_only);
        assert!(FeedQuery::new(None, Some("  "), Some("0")).is_noop());
    }

    #[test]
    fn upcoming_flag_accepts_only_one_or_true() {
        assert!(FeedQuery::new(None, None, Some("1")).upcoming_only);
        assert!(FeedQuery::new(None, None, Some(" True ")).upcoming_only);
        for other in ["yes", "on", "false", ""] {
            assert!(FeedQuery::new(None, None, Some(other)).is_noop(), "{other}");
        }
    }

    #[test]
    fn filters_compose() {
        let now = at("2024-03-10T12:00:00Z");
        let feed = vec![
            c("Weekly Contest 1", "2024-03-09T10:00:00Z", "leetcode.com", None),
            c("Weekly Contest 2", "2024-03-10T08:00:00Z", "leetcode.com", None),
            c("Starters 5", "2024-03-11T08:00:00Z", "codechef.com", None),
            c("GFG Weekly", "2024-03-03T08:00:00Z", "geeksforgeeks.org", Some("Live")),
        ];
        let q = FeedQuery::new(None, None, Some("1"));
        let names: Vec<_> = q.apply(feed.clone(), now).into_iter().map(|c| c.event).collect();
        assert_eq!(names, ["Weekly Contest 2", "Starters 5", "GFG Weekly"]);

        let q = FeedQuery::new(Some("leetcode.com"), Some("contest 1"), None);
        let out = q.apply(feed, now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event, "Weekly Contest 1");
    }

    #[test]
    fn stats_today_and_week() {
        let now = at("2024-03-10T12:00:00Z");
        let feed = vec![
            c("past", "2024-03-01T10:00:00Z", "leetcode.com", None),
            c("this morning", "2024-03-10T08:00:00Z", "leetcode.com", None),
            c("tonight", "2024-03-10T20:00:00Z", "codechef.com", None),
            c("in 5 days", "2024-03-15T08:00:00Z", "atcoder.jp", None),
            c("in 9 days", "2024-03-19T08:00:00Z", "atcoder.jp", None),
        ];
        let s = FeedStats::compute(&feed, now);
        assert_eq!(s.total, 5);
        assert_eq!(s.upcoming, 4);
        assert_eq!(s.today, 2);
        assert_eq!(s.week, 2);
        assert_eq!(s.by_platform.get("atcoder.jp"), Some(&2));
    }
}

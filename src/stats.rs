//! Commit counts per day, for the activity page.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page used when no template is given or found next to the output.
pub const BUILTIN_TEMPLATE: &str = include_str!("../assets/stats.html");

pub const LOADER_BEGIN: &str = "/* stats:load:begin */";
pub const LOADER_END: &str = "/* stats:load:end */";

/// Zero-filled commit counts over the observed span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// `YYYY-MM-DD` → commits on that day, one entry per day of the span.
    pub stats: BTreeMap<String, usize>,
    pub total_commits: usize,
    pub max_commits: usize,
    pub start_date: String,
    pub end_date: String,
    pub days_with_commits: usize,
    pub total_days: usize,
}

/// Parses the leading `YYYY-MM-DD` of a `git log --format=%ai` line.
fn line_date(line: &str) -> Option<NaiveDate> {
    let first = line.split_whitespace().next()?;
    NaiveDate::parse_from_str(first, "%Y-%m-%d").ok()
}

/// Buckets commit timestamps by day and fills the gaps between the first and
/// last day with zeroes. Lines without a leading date are ignored.
pub fn aggregate<S: AsRef<str>>(lines: &[S]) -> Result<DailyStats> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for line in lines {
        if let Some(day) = line_date(line.as_ref()) {
            *by_day.entry(day).or_insert(0) += 1;
        }
    }

    let (start, end) = match (by_day.keys().next(), by_day.keys().next_back()) {
        (Some(s), Some(e)) => (*s, *e),
        _ => return Err(Error::NoCommits),
    };

    let stats: BTreeMap<String, usize> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| (d.to_string(), by_day.get(&d).copied().unwrap_or(0)))
        .collect();

    Ok(DailyStats {
        total_commits: by_day.values().sum(),
        max_commits: by_day.values().copied().max().unwrap_or(0),
        start_date: start.to_string(),
        end_date: end.to_string(),
        days_with_commits: stats.values().filter(|c| **c > 0).count(),
        total_days: stats.len(),
        stats,
    })
}

/// Replaces the loader block of `template` with one that assigns `stats`
/// directly, so the page needs no separate fetch.
///
/// Returns `None` when the template lacks the loader markers. The markers are
/// kept in the output.
pub fn embed(template: &str, stats: &DailyStats) -> Result<Option<String>> {
    let begin = match template.find(LOADER_BEGIN) {
        Some(i) => i,
        None => return Ok(None),
    };
    let end = match template[begin..].find(LOADER_END) {
        Some(i) => begin + i + LOADER_END.len(),
        None => return Ok(None),
    };

    // `</script>` inside a JSON string would end the script element early.
    let json = serde_json::to_string(stats)?.replace("</", "<\\/");
    let loader = format!(
        "{LOADER_BEGIN}
        function loadStats() {{
            try {{
                statsData = {json};
                renderStats();
            }} catch (error) {{
                showError(error.message);
            }}
        }}
        {LOADER_END}"
    );

    let mut out = String::with_capacity(template.len() + loader.len());
    out.push_str(&template[..begin]);
    out.push_str(&loader);
    out.push_str(&template[end..]);
    Ok(Some(out))
}

/// Pretty JSON as written to `stats.json`.
pub fn to_json(stats: &DailyStats) -> Result<String> {
    let mut s = serde_json::to_string_pretty(stats)?;
    s.push('\n');
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<&'static str> {
        vec![
            "2025-01-05 10:00:00 +0100",
            "2025-01-05 09:00:00 +0100",
            "2025-01-01 12:00:00 +0100",
            "garbage",
            "",
            "2025-01-03 23:59:59 -0800",
        ]
    }

    #[test]
    fn fills_every_day_of_the_span() {
        let s = aggregate(&sample()).unwrap();
        assert_eq!(s.start_date, "2025-01-01");
        assert_eq!(s.end_date, "2025-01-05");
        assert_eq!(s.total_days, 5);
        assert_eq!(s.stats.len(), 5);
        assert_eq!(s.stats["2025-01-02"], 0);
        assert_eq!(s.stats["2025-01-04"], 0);
        assert_eq!(s.stats["2025-01-05"], 2);
    }

    #[test]
    fn totals_match_parsed_lines() {
        let s = aggregate(&sample()).unwrap();
        assert_eq!(s.total_commits, 4);
        assert_eq!(s.stats.values().sum::<usize>(), 4);
        assert_eq!(s.max_commits, 2);
        assert_eq!(s.days_with_commits, 3);
    }

    #[test]
    fn span_crosses_year_boundary() {
        let s = aggregate(&["2024-12-30 01:00:00 +0000", "2025-01-02 01:00:00 +0000"]).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(s.total_days as i64, (end - start).num_days() + 1);
    }

    #[test]
    fn no_commits_is_an_error() {
        assert!(matches!(
            aggregate::<&str>(&[]),
            Err(Error::NoCommits)
        ));
        assert!(matches!(aggregate(&["nope"]), Err(Error::NoCommits)));
    }

    #[test]
    fn embed_replaces_fetch_loader() {
        let stats = aggregate(&sample()).unwrap();
        let html = embed(BUILTIN_TEMPLATE, &stats).unwrap().unwrap();
        assert!(!html.contains("fetch('stats.json')"));
        assert!(html.contains("statsData = {\"stats\":{\"2025-01-01\":1"));
        assert!(html.contains(LOADER_BEGIN));
        assert!(html.contains(LOADER_END));
        assert!(html.contains("function renderStats()"));
    }

    #[test]
    fn embed_is_repeatable() {
        let first = aggregate(&["2025-01-01 00:00:00 +0000"]).unwrap();
        let second = aggregate(&sample()).unwrap();
        let once = embed(BUILTIN_TEMPLATE, &first).unwrap().unwrap();
        let twice = embed(&once, &second).unwrap().unwrap();
        assert_eq!(twice, embed(BUILTIN_TEMPLATE, &second).unwrap().unwrap());
    }

    #[test]
    fn embed_without_markers_is_none() {
        let stats = aggregate(&sample()).unwrap();
        assert!(embed("<html></html>", &stats).unwrap().is_none());
    }

    #[test]
    fn json_round_trips() {
        let stats = aggregate(&sample()).unwrap();
        let back: DailyStats = serde_json::from_str(&to_json(&stats).unwrap()).unwrap();
        assert_eq!(back, stats);
    }
}

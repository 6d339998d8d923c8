//! Profile parsing: raw capture JSON → ranked host/time chart records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A performance capture: a flat list of sampled frames plus the capture
/// duration in milliseconds.
///
/// The first frame of every capture is a blank artifact of the capture
/// format and is discarded before counting.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub frames: Vec<Frame>,
    /// Capture length in ms. Some captures omit it; nothing on the parse
    /// path reads it.
    #[serde(default)]
    pub duration: f64,
}

/// One sampled frame. `source` is a URL-like origin when the capture knew
/// where the sampled code came from.
#[derive(Debug, Clone, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub source: Option<String>,
}

/// One ranked entry, ready for display. This is the whole contract between
/// the parser and the chart, and the shape cached in localStorage between
/// visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub value: u32,
    pub display: String,
    pub label: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The input text is not JSON at all.
    #[error("not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// The input is JSON, but not shaped like a profile.
    #[error("not a recognized profile: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Host bucket for a frame source.
///
/// Frames whose source has no parseable host group under the literal source
/// wrapped in parentheses; a missing source becomes `"()"`.
pub fn host_key(source: Option<&str>) -> String {
    let raw = source.unwrap_or("");
    if let Ok(parsed) = url::Url::parse(raw) {
        if let Some(host) = parsed.host_str() {
            return match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
        }
    }
    format!("({raw})")
}

/// Turn a capture into ranked chart records: drop the sentinel first frame,
/// count the remaining frames by host, rank the hosts by count descending.
///
/// Hosts with equal counts come out in unspecified order.
pub fn parse_profile(profile: Profile) -> Vec<ChartRecord> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for frame in profile.frames.iter().skip(1) {
        *counts.entry(host_key(frame.source.as_deref())).or_insert(0) += 1;
    }

    let mut entries: Vec<(String, u32)> = counts.into_iter().collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1));

    if log::log_enabled!(log::Level::Debug) {
        for (host, count) in &entries {
            log::debug!("{count:>6}ms  {host}");
        }
    }

    entries
        .into_iter()
        .map(|(host, count)| ChartRecord {
            value: count,
            display: format!("{count}ms"),
            label: host,
        })
        .collect()
}

/// Parse raw JSON text into chart records.
///
/// Parsing happens in two stages so callers can tell "this is not JSON"
/// apart from "this JSON is not a profile" and show the right message.
pub fn parse_profile_json(text: &str) -> Result<Vec<ChartRecord>, ProfileError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(ProfileError::Json)?;
    let profile: Profile = serde_json::from_value(value).map_err(ProfileError::Shape)?;
    Ok(parse_profile(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_from(sources: &[Option<&str>]) -> Profile {
        Profile {
            frames: sources
                .iter()
                .map(|s| Frame {
                    source: s.map(str::to_string),
                })
                .collect(),
            duration: 0.0,
        }
    }

    #[test]
    fn drops_exactly_one_frame() {
        // The first frame is discarded no matter what it contains.
        let records = parse_profile(profile_from(&[
            Some("http://sentinel.example/x"),
            Some("http://a.com/x"),
        ]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "a.com");
        assert_eq!(records[0].value, 1);
    }

    #[test]
    fn value_sum_matches_remaining_frame_count() {
        let profile = profile_from(&[
            None,
            Some("http://a.com/x"),
            Some("http://a.com/y"),
            Some("http://b.com/z"),
            None,
            Some("not a url"),
        ]);
        let n = profile.frames.len() as u32;
        let records = parse_profile(profile);
        let total: u32 = records.iter().map(|r| r.value).sum();
        assert_eq!(total, n - 1);
    }

    #[test]
    fn ranked_by_count_descending() {
        let records = parse_profile(profile_from(&[
            None,
            Some("http://b.com/1"),
            Some("http://a.com/1"),
            Some("http://a.com/2"),
            Some("http://a.com/3"),
            Some("http://b.com/2"),
        ]));
        assert_eq!(records[0].label, "a.com");
        for pair in records.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
    }

    #[test]
    fn same_host_shares_a_bucket() {
        let records = parse_profile(profile_from(&[
            None,
            Some("http://a.com/x"),
            Some("http://a.com/y"),
        ]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "a.com");
        assert_eq!(records[0].value, 2);
    }

    #[test]
    fn missing_sources_share_the_fallback_bucket() {
        let records = parse_profile(profile_from(&[None, None, None, None]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, "()");
        assert_eq!(records[0].value, 3);
    }

    #[test]
    fn unparseable_source_keeps_its_literal_text() {
        assert_eq!(host_key(Some("eval at <anonymous>")), "(eval at <anonymous>)");
        assert_eq!(host_key(Some("/bundle.js")), "(/bundle.js)");
        assert_eq!(host_key(None), "()");
    }

    #[test]
    fn host_keeps_an_explicit_port() {
        assert_eq!(host_key(Some("http://a.com:8080/x")), "a.com:8080");
        assert_eq!(host_key(Some("https://a.com/x")), "a.com");
    }

    #[test]
    fn display_is_count_with_ms_suffix() {
        let records = parse_profile(profile_from(&[
            None,
            Some("http://a.com/x"),
            Some("http://a.com/y"),
            Some("http://b.com/z"),
        ]));
        for r in &records {
            assert_eq!(r.display, format!("{}ms", r.value));
        }
    }

    #[test]
    fn invalid_json_and_wrong_shape_are_distinct_errors() {
        assert!(matches!(
            parse_profile_json("{not json"),
            Err(ProfileError::Json(_))
        ));
        assert!(matches!(
            parse_profile_json(r#"{"duration": 5}"#),
            Err(ProfileError::Shape(_))
        ));
        assert!(matches!(
            parse_profile_json(r#"{"frames": 5, "duration": 5}"#),
            Err(ProfileError::Shape(_))
        ));
    }

    #[test]
    fn parses_a_full_document() {
        let records = parse_profile_json(
            r#"{
                "frames": [
                    {},
                    {"source": "http://cdn.example.com/app.js"},
                    {"source": "http://cdn.example.com/vendor.js"},
                    {"source": "http://other.example.org/lib.js"}
                ],
                "duration": 123.4
            }"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "cdn.example.com");
        assert_eq!(records[0].display, "2ms");
    }

    #[test]
    fn empty_and_single_frame_captures_yield_nothing() {
        assert!(parse_profile(profile_from(&[])).is_empty());
        assert!(parse_profile(profile_from(&[Some("http://a.com/x")])).is_empty());
    }
}

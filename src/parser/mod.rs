//! Dispatch SMS parsing
//!
//! Dispatch messages list one job per line, with dates, times, floor moves and
//! slot codes mixed in around the pickup and drop-off names. Each line is
//! cleaned, then matched against the registered centers; anything still
//! missing is filled from the remaining words.
//!
//! The result is only a proposal. Nothing here touches the store.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Lines this short (in characters, after trimming) are never jobs
pub(crate) const MAX_NOISE_LINE_CHARS: usize = 5;

/// Header lines added by carrier SMS gateways
const BOILERPLATE_MARKERS: &[&str] = &["Web발신"];

/// Stripped in this order; an earlier pattern can expose text for a later one
static NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "1월 5일"
        r"\d{1,2}월\s*\d{1,2}일",
        // "12/25", "12-25", "12.25"
        r"\d{1,2}[/\-.]\d{1,2}",
        r"배차표|운송장",
        // "2층->1층"
        r"\d+층\s*->\s*\d+층",
        // "09:00"
        r"\d{1,2}:\d{2}",
        // vehicle slot "5T", "11T"
        r"[1-9][0-9]?T",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("noise pattern is valid"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MatchSource {
    /// A registered center name
    Center,
    /// A leftover word; low confidence
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Endpoint {
    pub(crate) name: String,
    pub(crate) source: MatchSource,
}

/// Proposed pickup/drop-off pair for one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Proposal {
    /// 1-based line number in the input text
    pub(crate) line: usize,
    pub(crate) text: String,
    pub(crate) from: Endpoint,
    pub(crate) to: Endpoint,
}

pub(crate) fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() <= MAX_NOISE_LINE_CHARS
        || BOILERPLATE_MARKERS.iter().any(|m| trimmed.contains(m))
}

pub(crate) fn strip_noise(line: &str) -> String {
    NOISE_PATTERNS
        .iter()
        .fold(line.trim().to_string(), |acc, re| {
            re.replace_all(&acc, " ").into_owned()
        })
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Registered centers ready for longest-first matching
#[derive(Debug, Clone)]
pub(crate) struct CenterMatcher<'a> {
    centers: Vec<(&'a str, Vec<char>)>,
}

impl<'a> CenterMatcher<'a> {
    pub(crate) fn new(centers: &'a [String]) -> Self {
        let mut centers: Vec<(&str, Vec<char>)> = centers
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| (c, c.chars().collect()))
            .collect();
        // stable: equal lengths keep registry order
        centers.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        Self { centers }
    }

    /// Claim each center's first occurrence, longest names first.
    /// Claimed characters become `None` so nothing matches them twice.
    fn claim(&self, line: &mut [Option<char>]) -> Vec<(usize, &'a str)> {
        let mut matches = Vec::new();
        for (name, pattern) in &self.centers {
            if let Some(pos) = find(line, pattern) {
                for slot in &mut line[pos..pos + pattern.len()] {
                    *slot = None;
                }
                matches.push((pos, *name));
            }
        }
        matches.sort_by_key(|(pos, _)| *pos);
        matches
    }
}

fn find(haystack: &[Option<char>], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| {
        needle
            .iter()
            .zip(&haystack[start..])
            .all(|(n, h)| h.is_some_and(|h| same_letter(h, *n)))
    })
}

/// Whitespace tokens of `cleaned` untouched by any center claim.
/// A token a center matched even partly is dropped whole.
fn free_tokens(cleaned: &str, claimed: &[Option<char>]) -> Vec<(usize, String)> {
    let mut tokens = Vec::new();
    let mut start = None;
    let mut chars: Vec<char> = cleaned.chars().collect();
    chars.push(' ');
    for (i, c) in chars.iter().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(from)) => {
                start = None;
                if claimed[from..i].iter().all(Option::is_some) {
                    tokens.push((from, chars[from..i].iter().collect::<String>()));
                }
            }
            _ => {}
        }
    }
    tokens.retain(|(_, w)| w.chars().count() >= 2 && w.chars().any(char::is_alphanumeric));
    tokens
}

/// Pickup and drop-off for one line, or `None` when the line doesn't name two places.
///
/// Two or more center hits decide the pair by position. With fewer, the
/// whitespace tokens no center touched join the hits and the first two by
/// position win.
pub(crate) fn parse_line(line: &str, matcher: &CenterMatcher<'_>) -> Option<(Endpoint, Endpoint)> {
    if is_noise_line(line) {
        return None;
    }
    let cleaned = strip_noise(line);
    let mut chars: Vec<Option<char>> = cleaned.chars().map(Some).collect();

    let mut candidates: Vec<(usize, Endpoint)> = matcher
        .claim(&mut chars)
        .into_iter()
        .map(|(pos, name)| {
            let endpoint = Endpoint {
                name: name.to_string(),
                source: MatchSource::Center,
            };
            (pos, endpoint)
        })
        .collect();

    if candidates.len() < 2 {
        candidates.extend(free_tokens(&cleaned, &chars).into_iter().map(|(pos, name)| {
            let endpoint = Endpoint {
                name,
                source: MatchSource::Word,
            };
            (pos, endpoint)
        }));
        candidates.sort_by_key(|(pos, _)| *pos);
    }

    let mut picked = candidates.into_iter().map(|(_, e)| e);
    let from = picked.next()?;
    let to = picked.next()?;
    Some((from, to))
}

/// Proposals for every line of `text` that names a pickup and a drop-off
pub(crate) fn parse_dispatch_text(text: &str, centers: &[String]) -> Vec<Proposal> {
    let matcher = CenterMatcher::new(centers);
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let (from, to) = parse_line(line, &matcher)?;
            Some(Proposal {
                line: i + 1,
                text: line.trim().to_string(),
                from,
                to,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn pair(line: &str, registry: &[String]) -> Option<(String, String)> {
        let matcher = CenterMatcher::new(registry);
        parse_line(line, &matcher).map(|(f, t)| (f.name, t.name))
    }

    #[test]
    fn longest_center_wins_and_remaining_word_fills_destination() {
        let registry = centers(&["서울센터", "서울"]);
        let matcher = CenterMatcher::new(&registry);
        let (from, to) = parse_line("서울센터 -> 부산 09:00", &matcher).unwrap();
        assert_eq!(from.name, "서울센터");
        assert_eq!(from.source, MatchSource::Center);
        assert_eq!(to.name, "부산");
        assert_eq!(to.source, MatchSource::Word);
    }

    #[test]
    fn center_prefix_of_longer_word_leaves_no_tail() {
        let registry = centers(&["평택"]);
        assert_eq!(
            pair("평택센터 -> 이천센터 09:00", &registry),
            Some(("평택".to_string(), "이천센터".to_string()))
        );
    }

    #[test]
    fn shorter_center_cannot_reclaim_longer_match() {
        let registry = centers(&["서울", "서울센터"]);
        assert_eq!(
            pair("서울센터 서울 상차", &registry),
            Some(("서울센터".to_string(), "서울".to_string()))
        );
    }

    #[test]
    fn two_centers_ordered_by_position() {
        let registry = centers(&["이천센터", "평택센터"]);
        assert_eq!(
            pair("12월 5일 평택센터 → 이천센터 5T", &registry),
            Some(("평택센터".to_string(), "이천센터".to_string()))
        );
    }

    #[test]
    fn extra_centers_are_ignored() {
        let registry = centers(&["A센터", "B센터", "C센터"]);
        assert_eq!(
            pair("C센터 A센터 B센터", &registry),
            Some(("C센터".to_string(), "A센터".to_string()))
        );
    }

    #[test]
    fn matching_ignores_case() {
        let registry = centers(&["CJ Hub", "Icheon"]);
        assert_eq!(
            pair("cj hub to ICHEON 10:30", &registry),
            Some(("CJ Hub".to_string(), "Icheon".to_string()))
        );
    }

    #[test]
    fn word_fallback_without_centers() {
        assert_eq!(
            pair("03/14 오산물류 화성 14:00", &[]),
            Some(("오산물류".to_string(), "화성".to_string()))
        );
    }

    #[test]
    fn word_before_single_center_keeps_text_order() {
        let registry = centers(&["서울센터"]);
        assert_eq!(
            pair("부산 -> 서울센터", &registry),
            Some(("부산".to_string(), "서울센터".to_string()))
        );
    }

    #[test]
    fn dates_times_and_slots_are_not_places() {
        assert_eq!(pair("1월 1일 12-25 09:00 11T 배차표", &[]), None);
    }

    #[test]
    fn floor_moves_are_stripped() {
        let cleaned = strip_noise("물류A 2층 -> 1층 물류B");
        assert!(!cleaned.contains('층'));
        assert_eq!(pair("물류A 2층 -> 1층 물류B", &[]), Some(("물류A".into(), "물류B".into())));
    }

    #[test]
    fn short_and_boilerplate_lines_are_noise() {
        assert!(is_noise_line("  A B  "));
        assert!(is_noise_line("서울 부산"));
        assert!(is_noise_line("[Web발신] 배차 안내입니다"));
        assert!(!is_noise_line("서울센터 부산"));
        assert_eq!(pair("서울 부산", &centers(&["서울", "부산"])), None);
    }

    #[test]
    fn single_word_line_yields_nothing() {
        assert_eq!(pair("평택센터 09:00 -> 10:30", &[]), None);
        assert_eq!(pair("평택센터 09:00 ->", &centers(&["평택센터"])), None);
    }

    #[test]
    fn parse_text_reports_line_numbers() {
        let registry = centers(&["평택센터", "이천센터"]);
        let text = "[Web발신]\n평택센터 -> 이천센터 09:00\n\n짧음\n이천센터 -> 오산 13:00\n";
        let proposals = parse_dispatch_text(text, &registry);
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].line, 2);
        assert_eq!(proposals[0].from.name, "평택센터");
        assert_eq!(proposals[1].line, 5);
        assert_eq!(proposals[1].to.name, "오산");
        assert_eq!(proposals[1].to.source, MatchSource::Word);
    }

    #[test]
    fn empty_center_names_never_match() {
        let registry = centers(&["", "  "]);
        assert_eq!(
            pair("오산물류 화성물류", &registry),
            Some(("오산물류".to_string(), "화성물류".to_string()))
        );
    }

    #[test]
    fn parsing_does_not_change_registry() {
        let registry = centers(&["평택센터"]);
        let before = registry.clone();
        let _ = parse_dispatch_text("평택센터 -> 신규센터 09:00", &registry);
        assert_eq!(registry, before);
    }
}

//! Matcher implementations behind [`crate::Pattern`]

use globset::{Glob, GlobMatcher as GlobsetMatcher};
use regex::Regex;

use crate::result::PatternError;

/// Location of a pattern match within a buffer.
#[derive(Debug, Clone)]
pub struct Found {
    /// Start position of the match.
    pub start: usize,
    /// End position of the match (exclusive).
    pub end: usize,
    /// Captured groups (regex only; index 0 is the full match).
    pub captures: Vec<String>,
}

/// Searches a byte buffer for a pattern.
pub trait Matcher: Send + Sync {
    /// Find the first match in the buffer, if any.
    fn find(&self, buffer: &[u8]) -> Option<Found>;
}

/// Exact substring matcher using Boyer-Moore-Horspool.
pub(crate) struct ExactMatcher {
    needle: Vec<u8>,
    skip: [usize; 256],
}

impl ExactMatcher {
    pub(crate) fn new(needle: impl Into<Vec<u8>>) -> Result<Self, PatternError> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(PatternError::EmptyPattern);
        }

        let mut skip = [needle.len(); 256];
        for (i, &byte) in needle.iter().enumerate().take(needle.len() - 1) {
            skip[byte as usize] = needle.len() - 1 - i;
        }

        Ok(Self { needle, skip })
    }
}

impl Matcher for ExactMatcher {
    fn find(&self, buffer: &[u8]) -> Option<Found> {
        let n = self.needle.len();
        if buffer.len() < n {
            return None;
        }

        let mut pos = 0;
        while pos + n <= buffer.len() {
            if buffer[pos..pos + n] == self.needle[..] {
                return Some(Found {
                    start: pos,
                    end: pos + n,
                    captures: vec![],
                });
            }
            let last = buffer[pos + n - 1];
            pos += self.skip[last as usize];
        }

        None
    }
}

/// Regex matcher. Matching runs on the UTF-8 view of the buffer; a buffer
/// that is not valid UTF-8 (yet) simply doesn't match this cycle.
pub(crate) struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub(crate) fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, buffer: &[u8]) -> Option<Found> {
        let text = std::str::from_utf8(buffer).ok()?;
        let captures = self.regex.captures(text)?;
        let whole = captures.get(0)?;

        let groups = (0..captures.len())
            .filter_map(|i| captures.get(i))
            .map(|c| c.as_str().to_string())
            .collect();

        Some(Found {
            start: whole.start(),
            end: whole.end(),
            captures: groups,
        })
    }
}

/// Glob matcher. Scans every substring of the buffer against the compiled
/// glob, so cost is quadratic in buffer length — acceptable for prompt-sized
/// output.
pub(crate) struct GlobMatcher {
    matcher: GlobsetMatcher,
}

impl GlobMatcher {
    pub(crate) fn new(pattern: &str) -> Result<Self, PatternError> {
        let glob = Glob::new(pattern).map_err(|e| PatternError::InvalidGlob(e.to_string()))?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }
}

impl Matcher for GlobMatcher {
    fn find(&self, buffer: &[u8]) -> Option<Found> {
        let text = std::str::from_utf8(buffer).ok()?;

        for start in 0..text.len() {
            for end in start + 1..=text.len() {
                if self.matcher.is_match(&text[start..end]) {
                    return Some(Found {
                        start,
                        end,
                        captures: vec![],
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_finds_in_middle() {
        let matcher = ExactMatcher::new(b"login:").unwrap();
        let found = matcher.find(b"Debian GNU/Linux\nlogin: ").unwrap();
        assert_eq!(found.start, 17);
        assert_eq!(found.end, 23);
    }

    #[test]
    fn exact_finds_at_start_and_end() {
        let matcher = ExactMatcher::new(b"ok").unwrap();
        assert_eq!(matcher.find(b"ok then").unwrap().start, 0);
        assert_eq!(matcher.find(b"all ok").unwrap().start, 4);
    }

    #[test]
    fn exact_reports_first_occurrence() {
        let matcher = ExactMatcher::new(b"$ ").unwrap();
        let found = matcher.find(b"$ ls\n$ pwd\n").unwrap();
        assert_eq!(found.start, 0);
    }

    #[test]
    fn exact_misses_when_absent() {
        let matcher = ExactMatcher::new(b"password:").unwrap();
        assert!(matcher.find(b"login: ").is_none());
    }

    #[test]
    fn exact_handles_buffer_shorter_than_needle() {
        let matcher = ExactMatcher::new(b"password:").unwrap();
        assert!(matcher.find(b"pass").is_none());
    }

    #[test]
    fn exact_rejects_empty_needle() {
        assert!(matches!(
            ExactMatcher::new(b""),
            Err(PatternError::EmptyPattern)
        ));
    }

    #[test]
    fn exact_matches_binary_data() {
        let matcher = ExactMatcher::new([0x1b, 0x5b, 0x41]).unwrap();
        let found = matcher.find(b"head\x1b[Atail").unwrap();
        assert_eq!(found.start, 4);
        assert_eq!(found.end, 7);
    }

    #[test]
    fn regex_finds_with_captures() {
        let matcher = RegexMatcher::from_regex(Regex::new(r"uid=(\d+)\((\w+)\)").unwrap());
        let found = matcher.find(b"uid=1000(alice) gid=1000").unwrap();
        assert_eq!(found.captures[0], "uid=1000(alice)");
        assert_eq!(found.captures[1], "1000");
        assert_eq!(found.captures[2], "alice");
    }

    #[test]
    fn regex_misses_on_invalid_utf8() {
        let matcher = RegexMatcher::from_regex(Regex::new(r"\d+").unwrap());
        assert!(matcher.find(&[0xFF, b'1', b'2']).is_none());
    }

    #[test]
    fn regex_spans_lines() {
        let matcher = RegexMatcher::from_regex(Regex::new(r"(?s)one.*two").unwrap());
        let found = matcher.find(b"one\r\ntwo\r\n").unwrap();
        assert_eq!(found.start, 0);
        assert_eq!(found.end, 8);
    }

    #[test]
    fn glob_matches_wildcard() {
        let matcher = GlobMatcher::new("core.*").unwrap();
        assert!(matcher.find(b"wrote core.1234 to disk").is_some());
    }

    #[test]
    fn glob_misses_when_absent() {
        let matcher = GlobMatcher::new("*.dump").unwrap();
        assert!(matcher.find(b"nothing interesting here").is_none());
    }

    #[test]
    fn glob_rejects_invalid_syntax() {
        assert!(GlobMatcher::new("a{b").is_err());
    }
}

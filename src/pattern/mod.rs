//! Patterns to wait for in child output

mod matcher;

pub use matcher::Matcher;

use regex::Regex;

use crate::result::PatternError;

/// A pattern to wait for in the accumulated output.
///
/// Pattern matching is entirely caller-supplied: the engine never interprets
/// the child's output beyond running the matcher you hand it.
///
/// # Pattern Types
///
/// - **Exact**: fast substring search (Boyer-Moore-Horspool)
/// - **Regex**: full regular expressions with capture groups
/// - **Glob**: shell-style wildcards
///
/// # Examples
///
/// ```
/// use ptydrive::Pattern;
///
/// let prompt = Pattern::exact("login: ");
/// let number = Pattern::regex(r"\d+").unwrap();
/// let file = Pattern::glob("*.txt");
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact byte-for-byte substring match. The fastest option; prefer it
    /// when you know the literal text.
    Exact(String),

    /// Regular expression match. Capture groups are reported back through
    /// [`crate::MatchInfo::captures`].
    Regex(Regex),

    /// Shell-style wildcard match (`*`, `?`). Substring scanning with globs
    /// is quadratic in the buffer length; fine for prompt-sized buffers,
    /// prefer exact or regex when output is large.
    Glob(String),
}

impl Pattern {
    /// Create an exact substring pattern.
    ///
    /// ```
    /// use ptydrive::Pattern;
    ///
    /// let p = Pattern::exact("password: ");
    /// ```
    pub fn exact(s: impl Into<String>) -> Self {
        Pattern::Exact(s.into())
    }

    /// Create a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns the underlying regex error if the syntax is invalid.
    ///
    /// ```
    /// use ptydrive::Pattern;
    ///
    /// let p = Pattern::regex(r"(?i)welcome, (\w+)").unwrap();
    /// assert!(Pattern::regex("[unclosed").is_err());
    /// ```
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Create a glob pattern.
    ///
    /// ```
    /// use ptydrive::Pattern;
    ///
    /// let p = Pattern::glob("*.log");
    /// ```
    pub fn glob(pattern: &str) -> Self {
        Pattern::Glob(pattern.to_string())
    }

    /// Compile this pattern into a matcher.
    pub(crate) fn to_matcher(&self) -> Result<Box<dyn Matcher>, PatternError> {
        use matcher::{ExactMatcher, GlobMatcher, RegexMatcher};

        match self {
            Pattern::Exact(s) => Ok(Box::new(ExactMatcher::new(s.as_bytes())?)),
            Pattern::Regex(r) => Ok(Box::new(RegexMatcher::from_regex(r.clone()))),
            Pattern::Glob(g) => Ok(Box::new(GlobMatcher::new(g)?)),
        }
    }
}

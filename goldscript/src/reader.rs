//! Line-level script reading: conditional directives, blank-line stripping,
//! and the single-slot pushback used for lookahead.

use std::collections::BTreeMap;
use std::io::BufRead;

use crate::{Error, Result};

/// Reads a script line by line, resolving `#+flag#` / `#-flag#` directives
/// against the run configuration's flag map.
///
/// Delivered lines are always trimmed and never blank. Exactly one line can
/// be pushed back; the comparator uses this to peek at the next expectation
/// and to re-deliver a consumed non-expectation line.
pub(crate) struct ScriptReader<R> {
    input: R,
    script: String,
    flags: BTreeMap<String, bool>,
    /// Raw lines consumed from `input`. Pushback does not rewind this, so a
    /// diagnostic recorded after a peek reports the position of the peeked
    /// line, matching the trace a reader sees.
    line: usize,
    pushed_back: Option<String>,
}

impl<R: BufRead> ScriptReader<R> {
    pub(crate) fn new(script: impl Into<String>, input: R, flags: BTreeMap<String, bool>) -> Self {
        Self {
            input,
            script: script.into(),
            flags,
            line: 0,
            pushed_back: None,
        }
    }

    /// Name of the script, as used in diagnostics.
    pub(crate) fn script(&self) -> &str {
        &self.script
    }

    /// Raw line number of the most recently read line.
    pub(crate) fn line_number(&self) -> usize {
        self.line
    }

    /// Build a script-format error at the current position.
    pub(crate) fn error(&self, message: impl Into<String>) -> Error {
        Error::ScriptFormat {
            script: self.script.clone(),
            line: self.line,
            message: message.into(),
        }
    }

    /// Un-consume a line so the next [`Self::next_line`] returns it again.
    pub(crate) fn push_back(&mut self, line: String) {
        debug_assert!(self.pushed_back.is_none(), "pushback slot already occupied");
        self.pushed_back = Some(line);
    }

    /// Look at the next line without consuming it.
    pub(crate) fn peek(&mut self) -> Result<Option<&str>> {
        if self.pushed_back.is_none() {
            if let Some(line) = self.next_line()? {
                self.pushed_back = Some(line);
            }
        }
        Ok(self.pushed_back.as_deref())
    }

    /// Next active, non-blank, trimmed line, or `None` at end of input.
    ///
    /// A directive whose flag value does not match discards its entire line.
    /// A malformed directive or an unknown flag name aborts the script.
    pub(crate) fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(Some(line));
        }
        let mut raw = String::new();
        loop {
            raw.clear();
            if self.input.read_line(&mut raw)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let mut s = raw.strip_suffix('\n').unwrap_or(&raw);
            s = s.strip_suffix('\r').unwrap_or(s);
            if s.starts_with('#') {
                // The closing '#' must leave room for a sign and a one-char
                // flag name, i.e. sit at index 3 or later.
                let end = match s[1..].find('#').map(|i| i + 1) {
                    Some(end) if end >= 3 => end,
                    _ => return Err(self.error(format!("Bad line \"{s}\""))),
                };
                let required = match s.as_bytes()[1] {
                    b'+' => true,
                    b'-' => false,
                    _ => return Err(self.error(format!("Bad line \"{s}\""))),
                };
                let flag = &s[2..end];
                let value = match self.flags.get(flag) {
                    Some(value) => *value,
                    None => return Err(self.error(format!("Unknown flag \"{flag}\""))),
                };
                if value != required {
                    continue;
                }
                s = &s[end + 1..];
            }
            let s = s.trim();
            if !s.is_empty() {
                return Ok(Some(s.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn reader(text: &str, flags: &[(&str, bool)]) -> ScriptReader<Cursor<Vec<u8>>> {
        let flags = flags
            .iter()
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect();
        ScriptReader::new("test.sql", Cursor::new(text.as_bytes().to_vec()), flags)
    }

    /// Blank lines are skipped and delivered lines are trimmed.
    #[test]
    fn trims_and_skips_blank_lines() {
        let mut r = reader("  first  \n\n   \n\tsecond\n", &[]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("second"));
        assert_eq!(r.next_line().unwrap(), None);
        assert_eq!(r.next_line().unwrap(), None);
    }

    /// Line numbers count raw input lines, including skipped ones.
    #[test]
    fn line_numbers_count_raw_lines() {
        let mut r = reader("a\n\n\nb\n", &[]);
        r.next_line().unwrap();
        assert_eq!(r.line_number(), 1);
        r.next_line().unwrap();
        assert_eq!(r.line_number(), 4);
    }

    /// A matching positive directive keeps the remainder of the line.
    #[test]
    fn directive_keeps_remainder_when_flag_matches() {
        let mut r = reader("#+fast#SELECT 1;\n", &[("fast", true)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("SELECT 1;"));
    }

    /// A non-matching directive discards the whole line.
    #[test]
    fn directive_discards_line_when_flag_differs() {
        let mut r = reader("#+fast#SELECT 1;\nnext\n", &[("fast", false)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("next"));
    }

    /// Negative directives require the flag to be false.
    #[test]
    fn negative_directive_inverts_the_check() {
        let mut r = reader("#-fast#SELECT 1;\n", &[("fast", false)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("SELECT 1;"));

        let mut r = reader("#-fast#SELECT 1;\nnext\n", &[("fast", true)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("next"));
    }

    /// A kept directive whose remainder is blank is skipped like a blank line.
    #[test]
    fn directive_with_blank_remainder_is_skipped() {
        let mut r = reader("#+fast#   \nnext\n", &[("fast", true)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("next"));
    }

    /// Missing or too-early closing '#' is a script format error.
    #[test]
    fn malformed_directive_is_fatal() {
        for text in ["#\n", "#+\n", "#+#rest\n", "#nosecondhash\n"] {
            let mut r = reader(text, &[("fast", true)]);
            let err = r.next_line().unwrap_err();
            assert!(
                matches!(err, Error::ScriptFormat { ref message, .. } if message.starts_with("Bad line")),
                "unexpected error for {text:?}: {err}"
            );
        }
    }

    /// A sign other than '+' or '-' is a script format error.
    #[test]
    fn bad_sign_is_fatal() {
        let mut r = reader("#=fast#SELECT 1;\n", &[("fast", true)]);
        let err = r.next_line().unwrap_err();
        assert!(matches!(err, Error::ScriptFormat { ref message, .. } if message.starts_with("Bad line")));
    }

    /// Directives naming an unconfigured flag are fatal.
    #[test]
    fn unknown_flag_is_fatal() {
        let mut r = reader("#+mystery#SELECT 1;\n", &[("fast", true)]);
        let err = r.next_line().unwrap_err();
        assert!(
            matches!(err, Error::ScriptFormat { ref message, .. } if message == "Unknown flag \"mystery\""),
            "unexpected error: {err}"
        );
    }

    /// Pushback re-delivers the line on the next read.
    #[test]
    fn pushback_redelivers_line() {
        let mut r = reader("one\ntwo\n", &[]);
        let one = r.next_line().unwrap().unwrap();
        r.push_back(one);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("two"));
    }

    /// Peek fills the pushback slot without consuming the line.
    #[test]
    fn peek_does_not_consume() {
        let mut r = reader("one\ntwo\n", &[]);
        assert_eq!(r.peek().unwrap(), Some("one"));
        assert_eq!(r.peek().unwrap(), Some("one"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(r.peek().unwrap(), None);
    }

    /// Windows line endings are stripped before processing.
    #[test]
    fn handles_crlf_input() {
        let mut r = reader("SELECT 1;\r\n#+fast#ok;\r\n", &[("fast", true)]);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("SELECT 1;"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("ok;"));
    }
}

// src/links/extract.rs
// =============================================================================
// This module finds candidate links inside fetched text.
//
// We do NOT parse HTML or CSS. Instead we walk the text character by
// character and collect everything between matching quotes:
//
//   <link href="css/a.css">   -> "css/a.css"
//   url('../fonts/x.woff')    -> "../fonts/x.woff"
//
// Then is_link_like() keeps only strings that look like a relative or
// absolute file path. This is intentionally naive: there is no escape
// handling, so `"a\"b"` yields `a\` and a new string starting after `b`.
// That behaviour is part of how the mirror works, not something to fix.
// =============================================================================

use std::str::Chars;
use std::sync::LazyLock;

use regex::Regex;

// optional "../" run or a single leading "/"
// zero or more "segment/" groups
// a file name ending in an extension
// an optional query suffix, raw ("?v=1") or percent-encoded ("%3Fv=1")
static LINK_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\.\./)+|/)?(?:[A-Za-z0-9_.~-]+/)*[A-Za-z0-9_~-][A-Za-z0-9_.~-]*\.[A-Za-z0-9]+(?:[%?][A-Za-z0-9_.~%=&+-]*)?$")
        .unwrap()
});

/// Returns an iterator over every quoted string in `content`
pub fn extract_links(content: &str) -> QuotedStrings<'_> {
    QuotedStrings {
        chars: content.chars(),
        buffer: String::new(),
        open_quote: None,
    }
}

/// Does this quoted string look like a path to a file?
pub fn is_link_like(candidate: &str) -> bool {
    LINK_LIKE.is_match(candidate)
}

// Lazy scanner over quoted strings
//
// State is just "which quote opened the current string, if any" plus the
// characters collected so far.
pub struct QuotedStrings<'a> {
    chars: Chars<'a>,
    buffer: String,
    open_quote: Option<char>,
}

impl Iterator for QuotedStrings<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for c in self.chars.by_ref() {
            match self.open_quote {
                None if c == '"' || c == '\'' => {
                    self.open_quote = Some(c);
                }
                None => {}
                Some(quote) if c == quote => {
                    self.open_quote = None;
                    return Some(std::mem::take(&mut self.buffer));
                }
                Some(_) => self.buffer.push(c),
            }
        }
        // Anything after an unterminated quote is dropped
        None
    }
}

//! Tag grammar
//!
//! A tag is `%` + identifier + `_` + parameters + `%`, where the identifier is
//! one or more ASCII alphanumerics and the parameters are one or more
//! characters other than `%`. Anything that does not fit is plain text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Compiled tag pattern
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?P<identifier>[a-zA-Z0-9]+)_(?P<params>[^%]+)%")
        .expect("tag pattern is a valid regex")
});

/// A tag found while scanning text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'t> {
    identifier: &'t str,
    parameters: &'t str,
    full_match: &'t str,
    span: Range<usize>,
}

impl<'t> Tag<'t> {
    /// Routing key, matched case-sensitively against registered expansions
    pub fn identifier(&self) -> &'t str {
        self.identifier
    }

    /// Raw parameters, not tokenized
    pub fn parameters(&self) -> &'t str {
        self.parameters
    }

    /// The exact tag text including both `%` delimiters
    pub fn full_match(&self) -> &'t str {
        self.full_match
    }

    /// Byte range of the tag within the scanned text
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Scans text for tags, left to right, without overlap
pub fn scan(text: &str) -> impl Iterator<Item = Tag<'_>> {
    TAG_RE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Tag {
            identifier: caps.name("identifier")?.as_str(),
            parameters: caps.name("params")?.as_str(),
            full_match: whole.as_str(),
            span: whole.range(),
        })
    })
}

/// Returns true if `identifier` could appear as the identifier of a tag
pub fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_alphanumeric())
}

//! Case-insensitive, insertion-ordered header fields.
//!
//! [`HeaderCollection`] stores field names lower-cased and merges repeated
//! fields into a single comma-joined value, so `Host: a` followed by
//! `host: b` reads back as `a, b`. The same collection type is used for
//! request headers, response headers and chunked trailers.

use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;
use crate::utils::{CRLF, find_crlf};

/// Separator used when a field name is set more than once.
const MERGE_SEPARATOR: &str = ", ";

/// Bytes allowed in a field name: `ALPHA / DIGIT` and `!#$%&'*+-.^_`|~`.
const TOKEN_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    let mut c = b'0';
    while c <= b'9' {
        table[c as usize] = true;
        c += 1;
    }
    let mut c = b'a';
    while c <= b'z' {
        table[c as usize] = true;
        table[c.to_ascii_uppercase() as usize] = true;
        c += 1;
    }
    let extra = b"!#$%&'*+-.^_`|~";
    let mut i = 0;
    while i < extra.len() {
        table[extra[i] as usize] = true;
        i += 1;
    }
    table
};

/// An ordered set of header fields with case-insensitive names.
///
/// Iteration yields `(name, value)` pairs in first-insertion order; names are
/// always returned lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCollection {
    entries: Vec<(String, String)>,
}

impl HeaderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    /// Stores `value` under `name`.
    ///
    /// An absent name is inserted; a present one has `", " + value` appended
    /// to its stored value. Values are never overwritten.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(index) => {
                let stored = &mut self.entries[index].1;
                stored.push_str(MERGE_SEPARATOR);
                stored.push_str(value);
            }
            None => self.entries.push((name.to_ascii_lowercase(), value.to_owned())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.iter() }
    }

    /// Parses at most one header line from the front of `buf`.
    ///
    /// # Returns
    ///
    /// - `Ok((2, true))` when `buf` starts with the blank line ending the header section
    /// - `Ok((0, false))` when no complete line is available yet
    /// - `Ok((n, false))` when one field line of `n` bytes (CRLF included) was merged into the collection
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeader`] if the line has no `:`, an empty
    /// field name, a space right before the `:`, or a field name byte outside
    /// the token set, or a field value that is not valid UTF-8 (obs-text bytes
    /// are rejected rather than replaced). Nothing is consumed or stored on error.
    pub fn parse(&mut self, buf: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(line_end) = find_crlf(buf) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &buf[..line_end];
        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::invalid_header("header line does not contain ':'"))?;

        ensure!(colon > 0, ParseError::invalid_header("header line contains no field-name"));
        ensure!(
            line[colon - 1] != b' ',
            ParseError::invalid_header("whitespace not allowed between field-name and ':'")
        );

        let name = line[..colon].trim_ascii();
        ensure!(!name.is_empty(), ParseError::invalid_header("header line contains no field-name"));
        ensure!(
            name.iter().all(|b| TOKEN_TABLE[*b as usize]),
            ParseError::invalid_header(format!("invalid character in field-name {:?}", String::from_utf8_lossy(name)))
        );

        let value = std::str::from_utf8(line[colon + 1..].trim_ascii())
            .map_err(|e| ParseError::invalid_header(format!("field-value is not valid utf-8: {e}")))?;

        // the token check above guarantees the name is ASCII
        let name = String::from_utf8_lossy(name);
        trace!(name = %name, value = %value, "parsed header line");
        self.set(&name, &value);

        Ok((line_end + CRLF.len(), false))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(stored, _)| stored.eq_ignore_ascii_case(name))
    }
}

/// Iterator over the `(name, value)` pairs of a [`HeaderCollection`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HeaderCollection {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for HeaderCollection {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = HeaderCollection::new();
        for (name, value) in iter {
            headers.set(name.as_ref(), value.as_ref());
        }
        headers
    }
}

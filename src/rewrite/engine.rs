//! Regex find/replace over byte sequences.
//!
//! # Responsibilities
//! - Compile a pattern + replacement template into an immutable `Substitution`
//! - Apply it to arbitrary byte sequences, binary-safely
//! - Guarantee the output buffer is sized exactly, never over- or under-run
//!
//! The engine runs two passes over the source: a sizing pass that simulates
//! every replacement without writing a byte, then a writing pass into a
//! buffer allocated to exactly the computed length.

use regex::bytes::{Regex, RegexBuilder};

use crate::rewrite::template::{Piece, Template};
use crate::rewrite::RewriteError;

/// Matching flags for a substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Ignore case when matching the pattern.
    pub ignore_case: bool,
    /// Replace every non-overlapping match instead of only the first.
    pub global: bool,
}

/// The outcome of applying a substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The result bytes. An exact copy of the source when nothing matched.
    pub bytes: Vec<u8>,
    /// Whether any match occurred. `false` is not an error.
    pub found: bool,
}

/// A compiled pattern plus parsed replacement template. Stateless after
/// construction; one instance can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Substitution {
    regex: Regex,
    template: Template,
    global: bool,
}

impl Substitution {
    /// Compile a substitution from its pattern, replacement, and flags.
    pub fn new(pattern: &str, replacement: &str, flags: Flags) -> Result<Self, RewriteError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.ignore_case)
            .build()
            .map_err(|source| RewriteError::Compile {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            regex,
            template: Template::parse(replacement),
            global: flags.global,
        })
    }

    /// Apply the substitution to `source`, returning a freshly allocated
    /// result and whether anything matched.
    ///
    /// A source containing an embedded NUL byte is assumed to be binary and
    /// is copied verbatim with `found = false`, regardless of the pattern.
    pub fn apply(&self, source: &[u8]) -> Result<Rewritten, RewriteError> {
        if source.contains(&0) {
            return Ok(Rewritten {
                bytes: source.to_vec(),
                found: false,
            });
        }

        // Sizing pass: no bytes written, exact output length computed.
        let Some(len) = self.pass(source, None)? else {
            return Ok(Rewritten {
                bytes: source.to_vec(),
                found: false,
            });
        };

        let mut bytes = Vec::with_capacity(len);
        self.pass(source, Some(&mut bytes))?;
        debug_assert_eq!(bytes.len(), len);

        Ok(Rewritten { bytes, found: true })
    }

    /// One substitution pass. With `out = None` only the output length is
    /// computed; with `out = Some` the same traversal writes the bytes.
    /// Returns `None` when the pattern matched nowhere.
    fn pass(
        &self,
        source: &[u8],
        mut out: Option<&mut Vec<u8>>,
    ) -> Result<Option<usize>, RewriteError> {
        let mut pos = 0;
        let mut len = 0;
        let mut found = false;

        loop {
            let rest = &source[pos..];
            let Some(caps) = self.regex.captures(rest) else {
                break;
            };
            let (start, end) = match caps.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };
            found = true;

            // Everything before the match is copied through.
            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&rest[..start]);
            }
            len += start;

            for piece in self.template.pieces() {
                match piece {
                    Piece::Literal(bytes) => {
                        if let Some(out) = out.as_deref_mut() {
                            out.extend_from_slice(bytes);
                        }
                        len += bytes.len();
                    }
                    Piece::Group(group) => {
                        let m = caps
                            .get(*group)
                            .ok_or(RewriteError::GroupNotMatched { group: *group })?;
                        if let Some(out) = out.as_deref_mut() {
                            out.extend_from_slice(m.as_bytes());
                        }
                        len += m.len();
                    }
                }
            }

            if end == 0 {
                // Zero-length match: consume one byte so the scan always
                // advances.
                pos += 1;
            } else {
                pos += end;
            }

            if !self.global || pos >= source.len() {
                break;
            }
        }

        if !found {
            return Ok(None);
        }

        let tail = &source[pos.min(source.len())..];
        if let Some(out) = out.as_deref_mut() {
            out.extend_from_slice(tail);
        }
        len += tail.len();

        Ok(Some(len))
    }
}

//! Replacement-template parsing.
//!
//! The template syntax follows classic substitution rules:
//! - `&` and `\0` expand to the whole match
//! - `\1`..`\9` expand to the corresponding capture group
//! - `\&` and `\\` expand to the literal `&` and `\`
//! - any other escaped character passes through with its backslash
//! - a lone trailing backslash passes through literally

/// One element of a parsed replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Literal bytes copied into the output as-is.
    Literal(Vec<u8>),
    /// A capture-group reference; group 0 is the whole match.
    Group(usize),
}

/// A parsed replacement template. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse a replacement string into its pieces.
    ///
    /// Parsing cannot fail: every byte sequence is a valid template. Whether
    /// a referenced group exists is only known at match time.
    pub fn parse(replacement: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal = Vec::new();
        let bytes = replacement.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'&' => {
                    flush(&mut pieces, &mut literal);
                    pieces.push(Piece::Group(0));
                    i += 1;
                }
                b'\\' if i + 1 < bytes.len() => {
                    let next = bytes[i + 1];
                    match next {
                        b'0'..=b'9' => {
                            flush(&mut pieces, &mut literal);
                            pieces.push(Piece::Group((next - b'0') as usize));
                        }
                        b'&' | b'\\' => literal.push(next),
                        // Unknown escape: keep both bytes.
                        _ => {
                            literal.push(b'\\');
                            literal.push(next);
                        }
                    }
                    i += 2;
                }
                other => {
                    literal.push(other);
                    i += 1;
                }
            }
        }
        flush(&mut pieces, &mut literal);

        Self { pieces }
    }

    /// The pieces in output order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

fn flush(pieces: &mut Vec<Piece>, literal: &mut Vec<u8>) {
    if !literal.is_empty() {
        pieces.push(Piece::Literal(std::mem::take(literal)));
    }
}

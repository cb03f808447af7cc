//! Bounded `%s`-only template rendering used to build emulator command lines.
//!
//! Templates are validated once by [`Template::parse`]; rendering never fails.
//! Output is capped at `capacity - 1` bytes (the capacity counts a terminator,
//! like a C buffer) and is truncated on a character boundary when it would not
//! fit.

use std::fmt;

use crate::lib::errors::FormatError;

/// Capacity of the rendered argument string, terminator included.
pub const ARGUMENT_CAPACITY: usize = 4096;

/// Const check usable in `const` assertions on fixed templates.
///
/// Accepts exactly the templates [`Template::parse`] accepts.
pub const fn is_valid_template(source: &str) -> bool {
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        if i + 1 >= bytes.len() || !(bytes[i + 1] == b'%' || bytes[i + 1] == b's') {
            return false;
        }
        i += 2;
    }
    true
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal text with `%%` already collapsed to `%`.
    Literal(String),
    /// A `%s` placeholder starting at `offset` in the source template.
    Placeholder { offset: usize },
}

/// A validated template containing literal text, `%%` escapes and `%s` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Validate `source`, rejecting any conversion other than `%s` and `%%`.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((offset, ch)) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            match chars.next() {
                Some((_, '%')) => literal.push('%'),
                Some((_, 's')) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder { offset });
                }
                Some((_, conversion)) => {
                    return Err(FormatError::UnsupportedConversion { conversion, offset });
                }
                None => return Err(FormatError::DanglingPercent { offset }),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Render into at most `capacity - 1` bytes.
    ///
    /// Arguments fill placeholders in order and surplus arguments are ignored.
    /// Once arguments run out, the rest of the template is copied raw starting
    /// at the first unfilled placeholder.
    pub fn render<S: AsRef<str>>(&self, capacity: usize, args: &[S]) -> String {
        let mut out = BoundedWriter::new(capacity);
        let mut args = args.iter();

        for segment in &self.segments {
            let fits = match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { offset } => match args.next() {
                    Some(arg) => out.push_str(arg.as_ref()),
                    None => {
                        out.push_str(&self.source[*offset..]);
                        break;
                    }
                },
            };
            if !fits {
                break;
            }
        }

        out.finish()
    }
}

/// Rendered output with its capacity carried in the type.
#[derive(Clone, PartialEq, Eq)]
pub struct FormatBuffer<const M: usize> {
    text: String,
}

impl<const M: usize> FormatBuffer<M> {
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Render `template` with `args`, replacing the previous contents.
    pub fn print<S: AsRef<str>>(&mut self, template: &Template, args: &[S]) {
        self.text = template.render(M, args);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl<const M: usize> Default for FormatBuffer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> fmt::Debug for FormatBuffer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatBuffer")
            .field("capacity", &M)
            .field("text", &self.text)
            .finish()
    }
}

impl<const M: usize> fmt::Display for FormatBuffer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct BoundedWriter {
    buf: String,
    limit: usize,
}

impl BoundedWriter {
    fn new(capacity: usize) -> Self {
        let limit = capacity.saturating_sub(1);
        Self {
            buf: String::with_capacity(limit.min(ARGUMENT_CAPACITY)),
            limit,
        }
    }

    /// Append as much of `text` as fits. Returns false once the limit is hit.
    fn push_str(&mut self, text: &str) -> bool {
        for ch in text.chars() {
            if self.buf.len() + ch.len_utf8() > self.limit {
                return false;
            }
            self.buf.push(ch);
        }
        true
    }

    fn finish(self) -> String {
        self.buf
    }
}

//! Indentation-tagged text lines.
//!
//! Input documents arrive as an ordered sequence of [`IndentedLine`]s that
//! were already stripped of page artifacts. A line is a sequence of
//! positioned text parts; the structural parsers slice lines at header
//! boundaries and compare indentation to tell headers, continuations and
//! wrap-up text apart. An empty line is a structural separator.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};

/// A positioned fragment of a line.
///
/// `x` is the horizontal position of the fragment's first character, in the
/// coordinate space of the upstream extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePart {
    pub x: f64,
    pub content: String,
}

impl LinePart {
    /// Create a new part.
    #[must_use]
    pub fn new(x: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            content: content.into(),
        }
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// An immutable line of input text tagged with its horizontal position.
///
/// Lines are constructed once per input line and never mutated. Slicing and
/// concatenation produce new lines that share nothing with the original.
/// The serialized form is delta-encoded: each part stores its horizontal
/// distance from the previous part.
///
/// # Examples
///
/// ```
/// use torvenytar_structure::line::{IndentedLine, LinePart};
///
/// let line = IndentedLine::from_parts(vec![
///     LinePart::new(10.0, "(1) "),
///     LinePart::new(30.0, "Szöveg"),
/// ]);
/// assert_eq!(line.content(), "(1) Szöveg");
/// assert_eq!(line.indent(), 10.0);
///
/// let sliced = line.slice(4, None).unwrap();
/// assert_eq!(sliced.content(), "Szöveg");
/// assert_eq!(sliced.indent(), 30.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(f64, String)>", into = "Vec<(f64, String)>")]
pub struct IndentedLine {
    parts: Vec<LinePart>,
    content: String,
}

impl IndentedLine {
    /// The canonical empty line, used as a structural separator.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a line from positioned parts.
    #[must_use]
    pub fn from_parts(parts: Vec<LinePart>) -> Self {
        let content = parts.iter().map(|p| p.content.as_str()).collect();
        Self { parts, content }
    }

    /// Concatenate several lines into one, keeping part positions.
    #[must_use]
    pub fn from_multiple(lines: &[IndentedLine]) -> Self {
        let parts = lines
            .iter()
            .flat_map(|l| l.parts.iter().cloned())
            .collect();
        Self::from_parts(parts)
    }

    /// The full text content of the line.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Horizontal position of the first part (0.0 for the empty line).
    #[must_use]
    pub fn indent(&self) -> f64 {
        self.parts.first().map_or(0.0, |p| p.x)
    }

    /// Whether this is the empty separator line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of characters in the content.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Slice the line by character range.
    ///
    /// Negative indices count from the end, like the upstream extractor's
    /// convention; `end = None` means "to the end of the line". Slicing at
    /// or past the end yields the empty line.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnalignedSlice`] when a boundary falls
    /// inside a multi-character part, since the position of the remainder
    /// would be unknown.
    pub fn slice(&self, start: isize, end: Option<isize>) -> Result<IndentedLine> {
        let len = self.char_len() as isize;
        let start = if start < 0 { len + start } else { start };
        let end = match end {
            None => len,
            Some(e) if e < 0 => len + e,
            Some(e) => e,
        };

        if start == 0 && end == len {
            return Ok(self.clone());
        }
        if end <= start || start < 0 {
            return Ok(Self::empty());
        }
        let start = start as usize;
        let end = end as usize;

        let mut skipped = 0usize;
        let mut first_part = 0usize;
        while skipped < start && first_part < self.parts.len() {
            skipped += self.parts[first_part].char_len();
            first_part += 1;
        }
        if first_part >= self.parts.len() {
            return Ok(Self::empty());
        }
        if skipped != start {
            return Err(StructureError::UnalignedSlice { index: start });
        }

        let mut included = 0usize;
        let mut last_part = first_part;
        while included < end - start && last_part < self.parts.len() {
            included += self.parts[last_part].char_len();
            last_part += 1;
        }
        if included != end - start {
            return Err(StructureError::UnalignedSlice { index: end });
        }

        Ok(Self::from_parts(self.parts[first_part..last_part].to_vec()))
    }
}

impl From<IndentedLine> for Vec<(f64, String)> {
    fn from(line: IndentedLine) -> Self {
        let mut prev_x = 0.0;
        line.parts
            .into_iter()
            .map(|p| {
                let dx = p.x - prev_x;
                prev_x = p.x;
                (dx, p.content)
            })
            .collect()
    }
}

impl From<Vec<(f64, String)>> for IndentedLine {
    fn from(parts: Vec<(f64, String)>) -> Self {
        let mut x = 0.0;
        let parts = parts
            .into_iter()
            .map(|(dx, content)| {
                x += dx;
                LinePart::new(x, content)
            })
            .collect();
        Self::from_parts(parts)
    }
}

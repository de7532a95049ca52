use std::fmt;
use std::str::FromStr;

use crate::{PathError, PathErrorKind, PathResult};

/// The most segments a parsed field name may have.
///
/// Decoding and encoding recurse once per segment, so names from a request
/// body are bounded here.
pub const MAX_PATH_DEPTH: usize = 128;

/// One component of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// A named field of an object (`content` in `todo[0].content`).
    Field(String),
    /// A position in a list (`0` in `todo[0].content`).
    Index(usize),
}

/// A parsed field name such as `todo[0].content`.
///
/// A path is never empty and always starts with a field segment. Its
/// `Display` output is the canonical field name, so parsing a displayed path
/// yields the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Creates a single-segment path naming a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Path {
            segments: vec![Segment::Field(name.into())],
        }
    }

    /// Parses a field name into a path.
    pub fn parse(name: &str) -> PathResult<Self> {
        let bytes = name.as_bytes();
        match bytes.first() {
            None => return Err(PathError::new(PathErrorKind::Empty, 0)),
            Some(b'[') => return Err(PathError::new(PathErrorKind::LeadingIndex, 0)),
            Some(b']') => return Err(PathError::new(PathErrorKind::UnmatchedBracket, 0)),
            Some(b'.') => return Err(PathError::new(PathErrorKind::EmptySegment, 0)),
            Some(_) => {}
        }

        let end = scan_identifier(name, 0);
        let mut segments = vec![Segment::Field(name[..end].to_string())];
        let mut pos = end;

        while pos < bytes.len() {
            if segments.len() == MAX_PATH_DEPTH {
                return Err(PathError::new(
                    PathErrorKind::TooDeep {
                        max: MAX_PATH_DEPTH,
                    },
                    pos,
                ));
            }
            match bytes[pos] {
                b'.' => {
                    let start = pos + 1;
                    match bytes.get(start) {
                        Some(b'[') => {
                            return Err(PathError::new(PathErrorKind::DotBeforeBracket, pos));
                        }
                        None | Some(b'.') | Some(b']') => {
                            return Err(PathError::new(PathErrorKind::EmptySegment, start));
                        }
                        Some(_) => {}
                    }
                    let end = scan_identifier(name, start);
                    segments.push(Segment::Field(name[start..end].to_string()));
                    pos = end;
                }
                b'[' => {
                    let start = pos + 1;
                    let close = name[start..]
                        .find(']')
                        .ok_or_else(|| PathError::new(PathErrorKind::UnclosedBracket, pos))?;
                    let digits = &name[start..start + close];
                    segments.push(Segment::Index(parse_index(digits, start)?));
                    pos = start + close + 1;

                    if let Some(&next) = bytes.get(pos)
                        && next != b'.'
                        && next != b'['
                    {
                        let kind = if next == b']' {
                            PathErrorKind::UnmatchedBracket
                        } else {
                            // `pos` follows an ASCII ']' so it is a char boundary.
                            let c = name[pos..].chars().next().unwrap_or_default();
                            PathErrorKind::UnexpectedCharacter(c)
                        };
                        return Err(PathError::new(kind, pos));
                    }
                }
                _ => return Err(PathError::new(PathErrorKind::UnmatchedBracket, pos)),
            }
        }

        Ok(Path { segments })
    }

    /// Returns the segments of this path, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments. Always at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns the innermost segment.
    pub fn last(&self) -> &Segment {
        // Never empty: every constructor starts from a field segment.
        &self.segments[self.segments.len() - 1]
    }

    /// Appends a field segment.
    pub fn push_field(&mut self, name: impl Into<String>) {
        self.segments.push(Segment::Field(name.into()));
    }

    /// Appends an index segment.
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    /// Returns a new path naming field `name` beneath this one.
    pub fn join_field(&self, name: impl Into<String>) -> Path {
        let mut path = self.clone();
        path.push_field(name);
        path
    }

    /// Returns a new path naming position `index` beneath this one.
    pub fn join_index(&self, index: usize) -> Path {
        let mut path = self.clone();
        path.push_index(index);
        path
    }

    /// Returns the enclosing path, or `None` for a top-level field.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.len() == 1 {
            return None;
        }
        Some(self.prefix(self.segments.len() - 1))
    }

    /// Returns true if `other` is this path or one of its ancestors.
    pub fn starts_with(&self, other: &Path) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Returns the path made of the first `len` segments.
    pub(crate) fn prefix(&self, len: usize) -> Path {
        debug_assert!(len >= 1 && len <= self.segments.len());
        Path {
            segments: self.segments[..len].to_vec(),
        }
    }

    /// Replaces the segment at `depth`. The first segment must stay a field.
    pub(crate) fn set_segment(&mut self, depth: usize, segment: Segment) {
        debug_assert!(depth > 0 || matches!(segment, Segment::Field(_)));
        self.segments[depth] = segment;
    }
}

/// Returns true if `name` can be written as one field segment of a path.
pub(crate) fn is_field_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '[', ']'])
}

/// Returns the end of the identifier starting at `start`.
fn scan_identifier(name: &str, start: usize) -> usize {
    name[start..]
        .find(['.', '[', ']'])
        .map_or(name.len(), |i| start + i)
}

fn parse_index(digits: &str, position: usize) -> PathResult<usize> {
    let invalid = || PathError::new(PathErrorKind::InvalidIndex(digits.to_string()), position);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    digits.parse().map_err(|_| invalid())
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> PathResult<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

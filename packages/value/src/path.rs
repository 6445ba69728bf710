//! Dotted paths with wildcard and positional segments.

use std::fmt;

use crate::Key;

/// One segment of a [`Path`].
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Segment {
    /// A literal key or field name.
    Key(String),
    /// `*`: every child of the current node.
    Wildcard,
    /// `{first}`: the first key of the current node.
    First,
    /// `{last}`: the last key of the current node.
    Last,
}

impl Segment {
    /// Parse a single segment, unescaping `\*`, `\{first}` and `\{last}`.
    pub fn parse(s: &str) -> Segment {
        match s {
            "*" => Segment::Wildcard,
            "{first}" => Segment::First,
            "{last}" => Segment::Last,
            "\\*" => Segment::Key("*".to_string()),
            "\\{first}" => Segment::Key("{first}".to_string()),
            "\\{last}" => Segment::Key("{last}".to_string()),
            other => Segment::Key(other.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Wildcard => write!(f, "*"),
            Segment::First => write!(f, "{{first}}"),
            Segment::Last => write!(f, "{{last}}"),
            Segment::Key(key) => match key.as_str() {
                "*" | "{first}" | "{last}" => write!(f, "\\{}", key),
                _ => write!(f, "{}", key),
            },
        }
    }
}

/// A parsed dotted path.
///
/// A path with no segments addresses the root value itself.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<Segment>,
}

impl Path {
    /// Parse a dotted path.
    ///
    /// # Path Syntax
    ///
    /// - Segments are separated by `.`
    /// - `*`, `{first}` and `{last}` are tokens; prefix with `\` to use them
    ///   as literal keys
    /// - The empty string is the root path
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nestkit_value::{Path, Segment};
    ///
    /// let path = Path::parse("users.*.name");
    /// assert_eq!(path.len(), 3);
    /// assert!(path.has_wildcard());
    ///
    /// let literal = Path::parse("rates.\\*");
    /// assert_eq!(literal.segments[1], Segment::Key("*".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Path::root();
        }
        Path {
            segments: s.split('.').map(Segment::parse).collect(),
        }
    }

    /// The root path.
    pub fn root() -> Self {
        Path {
            segments: Vec::new(),
        }
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Path { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Segment;

    fn index(&self, i: usize) -> &Self::Output {
        &self.segments[i]
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

/// Anything usable as a path argument.
///
/// `None` is the null path: an identity for reads and rejected by writes.
pub trait IntoPath {
    fn into_path(self) -> Option<Path>;
}

impl IntoPath for Path {
    fn into_path(self) -> Option<Path> {
        Some(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Option<Path> {
        Some(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Option<Path> {
        Some(Path::parse(self))
    }
}

impl IntoPath for String {
    fn into_path(self) -> Option<Path> {
        Some(Path::parse(&self))
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Option<Path> {
        Some(Path::parse(self))
    }
}

/// A key is a single literal segment, never a token.
impl IntoPath for Key {
    fn into_path(self) -> Option<Path> {
        Some(Path::from_segments(vec![Segment::Key(self.to_string())]))
    }
}

impl IntoPath for &Key {
    fn into_path(self) -> Option<Path> {
        self.clone().into_path()
    }
}

impl IntoPath for i64 {
    fn into_path(self) -> Option<Path> {
        Key::Index(self).into_path()
    }
}

impl IntoPath for usize {
    fn into_path(self) -> Option<Path> {
        Key::from(self).into_path()
    }
}

impl<P: IntoPath> IntoPath for Option<P> {
    fn into_path(self) -> Option<Path> {
        self.and_then(IntoPath::into_path)
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use nestkit_value::path;
///
/// let p = path!("users.{first}.name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s)
    };
}

//! Step and path types produced by the tokenizer.

use std::fmt;
use std::str::FromStr;

use super::error::ParseError;
use super::tokenizer::{is_name_char, tokenize};

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Mapping entry (`feed`, `short\.desc`)
    Object(String),
    /// Sequence element (`[0]`, `[-1]`)
    List(isize),
}

impl PathStep {
    /// Name of the container kind this step can be applied to.
    pub fn container_kind(&self) -> &'static str {
        match self {
            PathStep::Object(_) => "mapping",
            PathStep::List(_) => "sequence",
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Creates a path from already parsed steps.
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Tokenizes `expr` into a path.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonxs::{Path, PathStep};
    ///
    /// let path = Path::parse("feed.tags[-1]").unwrap();
    /// assert_eq!(
    ///     path.steps(),
    ///     &[
    ///         PathStep::Object("feed".to_string()),
    ///         PathStep::Object("tags".to_string()),
    ///         PathStep::List(-1),
    ///     ]
    /// );
    /// ```
    pub fn parse(expr: &str) -> Result<Self, ParseError> {
        tokenize(expr).collect::<Result<Vec<_>, _>>().map(Path::new)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathStep> {
        self.steps.iter()
    }

    /// Returns the path made of the first `len` steps.
    pub fn prefix(&self, len: usize) -> Path {
        Path::new(self.steps[..len.min(self.steps.len())].to_vec())
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathStep;
    type IntoIter = std::slice::Iter<'a, PathStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl From<Vec<PathStep>> for Path {
    fn from(steps: Vec<PathStep>) -> Self {
        Path::new(steps)
    }
}

/// Renders the path back as an expression, escaping key characters that
/// would otherwise be read as structure.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Object(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    for ch in key.chars() {
                        if !is_name_char(ch) {
                            f.write_str("\\")?;
                        }
                        write!(f, "{}", ch)?;
                    }
                }
                PathStep::List(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

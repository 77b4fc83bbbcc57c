//! Path expression tokenizer.
//!
//! The tokenizer is a small character state machine:
//!
//! - `Default` between steps, expecting a name, `[` or `.`
//! - `AfterSeparator` right after a `.`
//! - `InName` while collecting the characters of a mapping key
//! - `InEscape` after a `\`, which takes the next character literally
//! - `InIndex` between `[` and `]`
//!
//! Separators produce nothing. Once a step has been read, repeated and
//! trailing `.` are skipped, so `a..b` and `a.` are valid; an expression made
//! only of separators is rejected.
//!
//! Steps are produced lazily. [`Tokenizer`] is `Clone`, so a sequence can be
//! restarted from any point, and it stops for good after the first error.

use std::iter::Peekable;
use std::str::Chars;

use super::ast::PathStep;
use super::error::ParseError;

/// Returns true if `ch` may appear unescaped in a mapping key.
///
/// Letters from any script are accepted; digits, `_` and punctuation must be
/// escaped. Whitespace is kept as part of the key.
pub fn is_name_char(ch: char) -> bool {
    ch.is_alphabetic() || ch.is_whitespace()
}

/// Returns a lazy tokenizer over `expr`.
///
/// # Example
///
/// ```
/// use jsonxs::{tokenize, PathStep};
///
/// let steps: Vec<_> = tokenize(r"feed.short\.desc").collect::<Result<_, _>>().unwrap();
/// assert_eq!(
///     steps,
///     vec![
///         PathStep::Object("feed".to_string()),
///         PathStep::Object("short.desc".to_string()),
///     ]
/// );
/// ```
pub fn tokenize(expr: &str) -> Tokenizer<'_> {
    Tokenizer::new(expr)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    AfterSeparator,
    InName,
    InEscape,
    InIndex,
}

/// Iterator over the steps of a path expression.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
    produced: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `expr`.
    pub fn new(expr: &'a str) -> Self {
        Self {
            chars: expr.chars().peekable(),
            position: 0,
            produced: false,
            finished: false,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Advances past the current character.
    fn bump(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }

    fn unexpected(&self, found: char, expected: &'static str) -> ParseError {
        ParseError::UnexpectedCharacter {
            position: self.position,
            found,
            expected,
        }
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedEnd {
            position: self.position,
            expected,
        }
    }

    /// Scans the next step, or `None` once the input is exhausted.
    fn scan(&mut self) -> Result<Option<PathStep>, ParseError> {
        let mut state = State::Default;
        let mut name = String::new();
        let mut index = String::new();

        loop {
            let ch = self.peek();
            match state {
                State::Default | State::AfterSeparator => match ch {
                    None if state == State::Default || self.produced => return Ok(None),
                    None => return Err(self.unexpected_end("a name or '['")),
                    Some('.') if state == State::Default || self.produced => {
                        self.bump();
                        state = State::AfterSeparator;
                    }
                    Some('[') => {
                        self.bump();
                        state = State::InIndex;
                    }
                    Some('\\') => {
                        self.bump();
                        state = State::InEscape;
                    }
                    Some(c) if is_name_char(c) => state = State::InName,
                    Some(c) if state == State::Default => {
                        return Err(self.unexpected(c, "a name, '.' or '['"))
                    }
                    Some(c) => return Err(self.unexpected(c, "a name or '['")),
                },
                State::InName => match ch {
                    Some('\\') => {
                        self.bump();
                        state = State::InEscape;
                    }
                    Some(c) if is_name_char(c) => {
                        name.push(c);
                        self.bump();
                    }
                    _ => return Ok(Some(PathStep::Object(name))),
                },
                State::InEscape => match ch {
                    Some(c) => {
                        name.push(c);
                        self.bump();
                        state = State::InName;
                    }
                    None => return Err(self.unexpected_end("a character after '\\'")),
                },
                State::InIndex => match ch {
                    Some('-') if index.is_empty() => {
                        index.push('-');
                        self.bump();
                    }
                    Some(c) if c.is_ascii_digit() => {
                        index.push(c);
                        self.bump();
                    }
                    Some(']') if index.ends_with(|c: char| c.is_ascii_digit()) => {
                        let value = index.parse::<isize>().map_err(|_| ParseError::InvalidIndex {
                            position: self.position - index.len(),
                            literal: index.clone(),
                        })?;
                        self.bump();
                        return Ok(Some(PathStep::List(value)));
                    }
                    Some(c) if index.ends_with(|c: char| c.is_ascii_digit()) => {
                        return Err(self.unexpected(c, "a digit or ']'"))
                    }
                    Some(c) => return Err(self.unexpected(c, "an integer index")),
                    None => return Err(self.unexpected_end("an integer index followed by ']'")),
                },
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<PathStep, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.scan() {
            Ok(Some(step)) => {
                self.produced = true;
                Some(Ok(step))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(expr: &str) -> Vec<PathStep> {
        tokenize(expr).collect::<Result<Vec<_>, _>>().unwrap()
    }

    fn object(key: &str) -> PathStep {
        PathStep::Object(key.to_string())
    }

    #[test]
    fn test_object_path() {
        assert_eq!(
            steps("an.object.path"),
            vec![object("an"), object("object"), object("path")]
        );
    }

    #[test]
    fn test_unicode_object_path() {
        assert_eq!(
            steps("an.objéct.path"),
            vec![object("an"), object("objéct"), object("path")]
        );
    }

    #[test]
    fn test_single_letter_keys() {
        assert_eq!(steps("a.b"), vec![object("a"), object("b")]);
    }

    #[test]
    fn test_path_with_escaped_separator() {
        assert_eq!(
            steps(r"an.object\.path"),
            vec![object("an"), object("object.path")]
        );
        assert_eq!(steps(r"a\.b"), vec![object("a.b")]);
    }

    #[test]
    fn test_escape_may_start_a_name() {
        assert_eq!(steps(r"\.hidden"), vec![object(".hidden")]);
        assert_eq!(steps(r"feed.\_id"), vec![object("feed"), object("_id")]);
    }

    #[test]
    fn test_escaped_digits_and_brackets() {
        assert_eq!(steps(r"item\2"), vec![object("item2")]);
        assert_eq!(steps(r"a\[\0\]"), vec![object("a[0]")]);
        assert_eq!(steps(r"back\\slash"), vec![object(r"back\slash")]);
    }

    #[test]
    fn test_whitespace_is_part_of_names() {
        assert_eq!(steps(" my key "), vec![object(" my key ")]);
    }

    #[test]
    fn test_nested_arrays() {
        assert_eq!(steps("[0][1]"), vec![PathStep::List(0), PathStep::List(1)]);
    }

    #[test]
    fn test_negative_index() {
        assert_eq!(steps("[-1]"), vec![PathStep::List(-1)]);
    }

    #[test]
    fn test_combined_paths() {
        assert_eq!(
            steps("start[1].next[2]"),
            vec![
                object("start"),
                PathStep::List(1),
                object("next"),
                PathStep::List(2),
            ]
        );
    }

    #[test]
    fn test_separator_before_index_is_allowed() {
        assert_eq!(steps("tags.[0]"), vec![object("tags"), PathStep::List(0)]);
    }

    #[test]
    fn test_empty_expression_has_no_steps() {
        assert!(steps("").is_empty());
    }

    #[test]
    fn test_tokenizer_is_restartable() {
        let tokenizer = tokenize("feed.tags[-1]");
        let first: Vec<_> = tokenizer.clone().collect();
        let second: Vec<_> = tokenizer.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_tokenizer_is_lazy() {
        let mut tokenizer = tokenize("feed.ta$gs");
        assert_eq!(tokenizer.next(), Some(Ok(object("feed"))));
        assert_eq!(tokenizer.next(), Some(Ok(object("ta"))));
        assert!(matches!(tokenizer.next(), Some(Err(_))));
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_digit_after_name_fails() {
        let err = tokenize("feed1").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                position: 4,
                found: '1',
                expected: "a name, '.' or '['",
            }
        );
    }

    #[test]
    fn test_position_counts_characters() {
        let err = tokenize("héllo_").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedCharacter {
                position: 5,
                found: '_',
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_index_fails() {
        let err = tokenize("tags[1").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { position: 6, .. }));
    }

    #[test]
    fn test_non_integer_index_fails() {
        for expr in ["tags[a]", "tags[]", "tags[-]", "tags[1 ]", "tags[--1]"] {
            let result = tokenize(expr).collect::<Result<Vec<_>, _>>();
            assert!(
                matches!(result, Err(ParseError::UnexpectedCharacter { .. })),
                "{expr} should fail"
            );
        }
    }

    #[test]
    fn test_overflowing_index_fails() {
        let err = tokenize("[99999999999999999999999]")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidIndex { position: 1, .. }));
    }

    #[test]
    fn test_trailing_escape_fails() {
        let err = tokenize(r"feed\").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { position: 5, .. }));
    }

    #[test]
    fn test_repeated_and_trailing_separators_are_skipped() {
        assert_eq!(steps("feed..tags"), vec![object("feed"), object("tags")]);
        assert_eq!(steps("feed."), vec![object("feed")]);
        assert_eq!(steps("tags[0].."), vec![object("tags"), PathStep::List(0)]);
        assert_eq!(steps(".feed"), vec![object("feed")]);
    }

    #[test]
    fn test_separators_without_steps_fail() {
        let err = tokenize(".").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { position: 1, .. }));

        let err = tokenize("..feed").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedCharacter {
                position: 1,
                found: '.',
                ..
            }
        ));
    }

    #[test]
    fn test_stray_closing_bracket_fails() {
        let err = tokenize("tags]").collect::<Result<Vec<_>, _>>().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedCharacter {
                position: 4,
                found: ']',
                ..
            }
        ));
    }
}

//! Path expressions for addressing values inside a document.
//!
//! # Supported Syntax
//!
//! - `name` - mapping entry; names are made of letters (any script) and
//!   whitespace
//! - `.` - separates steps; not needed before `[`, and extra or trailing
//!   separators are ignored
//! - `[index]` - sequence element (supports negative indices)
//! - `\c` - takes `c` literally, so `short\.desc` is the single key
//!   `short.desc` and `item\2` is `item2`
//!
//! # Examples
//!
//! ```
//! // feed.tags[-1]       - last tag of the feed
//! // feed.short\.desc    - key containing a dot
//! // feed.list[0].uuid   - field of the first list entry
//! // [0][1]              - nested sequences at the root
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod tokenizer;

pub use ast::{Path, PathStep};
pub use error::{ParseError, PathError};
pub use evaluator::{evaluate, resolve, Action};
pub use tokenizer::{tokenize, Tokenizer};

use crate::document::node::Value;

/// Tokenizes `expr` and applies `action` at that location in `root`.
///
/// The whole expression is tokenized before the tree is touched, so a
/// malformed expression never leaves a partial mutation behind. See
/// [`evaluate`] for the meaning of `value` and `default`.
///
/// # Example
///
/// ```
/// use jsonxs::{jsonxs, Action, Value};
///
/// let mut doc: Value = serde_json::from_str(r#"{"feed": {"id": "my_feed"}}"#).unwrap();
///
/// jsonxs(&mut doc, "feed.id", Action::Set, Some(Value::from("your_feed")), None).unwrap();
/// let id = jsonxs(&mut doc, "feed.id", Action::Get, None, None).unwrap();
/// assert_eq!(id, Some(Value::from("your_feed")));
///
/// let desc = jsonxs(&mut doc, r"feed.long\.desc", Action::Get, None, Some(Value::from("N/A")));
/// assert_eq!(desc.unwrap(), Some(Value::from("N/A")));
/// ```
pub fn jsonxs(
    root: &mut Value,
    expr: &str,
    action: Action,
    value: Option<Value>,
    default: Option<Value>,
) -> Result<Option<Value>, PathError> {
    let path = Path::parse(expr)?;
    evaluate(root, &path, action, value, default)
}

//! jsonxs - get, set and delete values in JSON and YAML documents.
//!
//! A path expression such as `feed.tags[-1]` or `feed.short\.desc` addresses a
//! single location inside a tree of mappings and sequences. The [`jsonxs`]
//! function tokenizes the expression and applies an [`Action`] at that
//! location, mutating the tree in place.
//!
//! # Example
//!
//! ```
//! use jsonxs::{jsonxs, Action, Value};
//!
//! let mut doc: Value = serde_json::from_str(
//!     r#"{"feed": {"id": "my_feed", "tags": ["devel", "example", "python"]}}"#,
//! )
//! .unwrap();
//!
//! let last = jsonxs(&mut doc, "feed.tags[-1]", Action::Get, None, None).unwrap();
//! assert_eq!(last, Some(Value::from("python")));
//!
//! jsonxs(&mut doc, "feed.tags", Action::Append, Some(Value::from("rust")), None).unwrap();
//! let tags = jsonxs(&mut doc, "feed.tags[3]", Action::Get, None, None).unwrap();
//! assert_eq!(tags, Some(Value::from("rust")));
//! ```

pub mod config;
pub mod document;
pub mod file;
pub mod path;

pub use document::node::{Number, Value};
pub use path::{evaluate, jsonxs, resolve, tokenize, Action, ParseError, Path, PathError, PathStep};

//! Walks a document along a [`Path`] and applies an [`Action`] at its end.
//!
//! All mutation happens in place on the caller's tree. The only copy made is
//! the value returned by [`Action::Get`].

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use super::ast::{Path, PathStep};
use super::error::PathError;
use crate::document::node::Value;

/// What to do at the location a path points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Return a copy of the value.
    Get,
    /// Replace the value, creating missing mappings on the way.
    Set,
    /// Remove the entry from its mapping or sequence.
    Delete,
    /// Push onto the sequence stored at the location.
    Append,
    /// Insert before the sequence element the last index points at.
    Insert,
    /// Store an empty mapping, creating missing mappings on the way.
    MakeMapping,
    /// Store an empty sequence, creating missing mappings on the way.
    MakeSequence,
}

impl Action {
    /// Returns true if the action creates missing intermediate mappings.
    pub fn autocreates(self) -> bool {
        matches!(self, Action::Set | Action::MakeMapping | Action::MakeSequence)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Delete => "del",
            Action::Append => "append",
            Action::Insert => "insert",
            Action::MakeMapping => "mkdict",
            Action::MakeSequence => "mklist",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Action::Get),
            "set" => Ok(Action::Set),
            "del" | "delete" => Ok(Action::Delete),
            "append" => Ok(Action::Append),
            "insert" => Ok(Action::Insert),
            "mkdict" | "make-mapping" => Ok(Action::MakeMapping),
            "mklist" | "make-sequence" => Ok(Action::MakeSequence),
            _ => Err(PathError::Configuration {
                message: format!("Invalid action: {}", s),
            }),
        }
    }
}

/// Resolves `index` against a sequence of `len` elements.
///
/// Negative indices count from the end. Returns `None` when out of range.
fn normalize_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else if (index as usize) < len {
        Some(index as usize)
    } else {
        None
    }
}

fn lookup_error(path: &Path, depth: usize) -> PathError {
    PathError::Lookup {
        path: path.prefix(depth + 1),
    }
}

fn mismatch_error(path: &Path, depth: usize, expected: &'static str, found: &Value) -> PathError {
    PathError::TypeMismatch {
        path: path.prefix(depth + 1),
        expected,
        found: found.kind(),
    }
}

fn child<'v>(
    current: &'v Value,
    step: &PathStep,
    path: &Path,
    depth: usize,
) -> Result<&'v Value, PathError> {
    match (step, current) {
        (PathStep::Object(key), Value::Mapping(map)) => {
            map.get(key).ok_or_else(|| lookup_error(path, depth))
        }
        (PathStep::List(index), Value::Sequence(items)) => normalize_index(*index, items.len())
            .map(|i| &items[i])
            .ok_or_else(|| lookup_error(path, depth)),
        (_, other) => Err(mismatch_error(path, depth, step.container_kind(), other)),
    }
}

fn child_mut<'v>(
    current: &'v mut Value,
    step: &PathStep,
    path: &Path,
    depth: usize,
) -> Result<&'v mut Value, PathError> {
    match (step, current) {
        (PathStep::Object(key), Value::Mapping(map)) => {
            map.get_mut(key).ok_or_else(|| lookup_error(path, depth))
        }
        (PathStep::List(index), Value::Sequence(items)) => {
            match normalize_index(*index, items.len()) {
                Some(i) => Ok(&mut items[i]),
                None => Err(lookup_error(path, depth)),
            }
        }
        (_, other) => Err(mismatch_error(path, depth, step.container_kind(), other)),
    }
}

/// Borrows the value at `path` without copying it.
///
/// A missing key or an out-of-range index is a [`PathError::Lookup`]; a step
/// applied to the wrong kind of container is a [`PathError::TypeMismatch`].
///
/// # Example
///
/// ```
/// use jsonxs::{resolve, Path, Value};
///
/// let doc: Value = serde_json::from_str(r#"{"tags": ["devel", "python"]}"#).unwrap();
/// let path = Path::parse("tags[-1]").unwrap();
/// assert_eq!(resolve(&doc, &path).unwrap(), &Value::from("python"));
/// ```
pub fn resolve<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, PathError> {
    let mut current = root;
    for (depth, step) in path.iter().enumerate() {
        trace!(?step, depth, "resolving step");
        current = child(current, step, path, depth)?;
    }
    Ok(current)
}

/// Walks the first `depth` steps of `path`, returning the container that owns
/// the slot addressed by step `depth`.
///
/// When `action` autocreates, the depth of the first mapping it inserted is
/// written to `created` so a later failure can undo it.
fn walk_to_parent<'v>(
    root: &'v mut Value,
    path: &Path,
    depth: usize,
    action: Action,
    created: &mut Option<usize>,
) -> Result<&'v mut Value, PathError> {
    let mut current = root;
    for (i, step) in path.steps()[..depth].iter().enumerate() {
        trace!(?step, depth = i, "descending");
        if action.autocreates() {
            if let (PathStep::Object(key), Value::Mapping(map)) = (step, &mut *current) {
                if !map.contains_key(key) {
                    debug!(path = %path.prefix(i + 1), "creating missing mapping");
                    map.insert(key.clone(), Value::mapping());
                    created.get_or_insert(i);
                }
            }
        }
        current = child_mut(current, step, path, i)?;
    }
    Ok(current)
}

/// Removes the mapping autocreated at step `depth`, along with everything
/// created beneath it.
fn discard_created(root: &mut Value, path: &Path, depth: usize) {
    let Ok(parent) = walk_to_parent(root, path, depth, Action::Get, &mut None) else {
        return;
    };
    if let (PathStep::Object(key), Value::Mapping(map)) = (&path.steps()[depth], parent) {
        debug!(path = %path.prefix(depth + 1), "removing mappings created by failed action");
        map.shift_remove(key);
    }
}

/// Returns true if `err` means the path does not exist in the document.
///
/// A key looked up in a scalar or a sequence counts as missing, the same as
/// an absent key or an out-of-range index.
fn is_missing(err: &PathError) -> bool {
    match err {
        PathError::Lookup { .. } => true,
        PathError::TypeMismatch { path, .. } => {
            matches!(path.steps().last(), Some(PathStep::Object(_)))
        }
        _ => false,
    }
}

/// Stores `new` in the slot `step` addresses inside `parent`.
fn assign(
    parent: &mut Value,
    step: &PathStep,
    new: Value,
    path: &Path,
    depth: usize,
) -> Result<(), PathError> {
    match (step, parent) {
        (PathStep::Object(key), Value::Mapping(map)) => {
            map.insert(key.clone(), new);
            Ok(())
        }
        (PathStep::List(index), Value::Sequence(items)) => {
            let i = normalize_index(*index, items.len()).ok_or_else(|| lookup_error(path, depth))?;
            items[i] = new;
            Ok(())
        }
        (_, other) => Err(mismatch_error(path, depth, step.container_kind(), other)),
    }
}

fn remove(parent: &mut Value, step: &PathStep, path: &Path, depth: usize) -> Result<Value, PathError> {
    match (step, parent) {
        (PathStep::Object(key), Value::Mapping(map)) => {
            map.shift_remove(key).ok_or_else(|| lookup_error(path, depth))
        }
        (PathStep::List(index), Value::Sequence(items)) => {
            let i = normalize_index(*index, items.len()).ok_or_else(|| lookup_error(path, depth))?;
            Ok(items.remove(i))
        }
        (_, other) => Err(mismatch_error(path, depth, step.container_kind(), other)),
    }
}

/// Applies `action` to the slot `step` addresses inside `parent`.
fn apply(
    parent: &mut Value,
    step: &PathStep,
    action: Action,
    value: Option<Value>,
    path: &Path,
) -> Result<Option<Value>, PathError> {
    let depth = path.len() - 1;
    match action {
        Action::Get => child(parent, step, path, depth).map(|found| Some(found.clone())),
        Action::Set => {
            assign(parent, step, value.unwrap_or_default(), path, depth)?;
            Ok(None)
        }
        Action::Delete => {
            remove(parent, step, path, depth)?;
            Ok(None)
        }
        Action::Append => match child_mut(parent, step, path, depth)? {
            Value::Sequence(items) => {
                items.push(value.unwrap_or_default());
                Ok(None)
            }
            other => Err(mismatch_error(path, depth, "sequence", other)),
        },
        Action::Insert => match (step, parent) {
            (PathStep::List(index), Value::Sequence(items)) => {
                let i = normalize_index(*index, items.len())
                    .ok_or_else(|| lookup_error(path, depth))?;
                items.insert(i, value.unwrap_or_default());
                Ok(None)
            }
            (PathStep::Object(_), _) => Err(PathError::TypeMismatch {
                path: path.clone(),
                expected: "a sequence index",
                found: "a mapping key",
            }),
            (PathStep::List(_), other) => Err(mismatch_error(path, depth, "sequence", other)),
        },
        Action::MakeMapping => {
            assign(parent, step, Value::mapping(), path, depth)?;
            Ok(None)
        }
        Action::MakeSequence => {
            assign(parent, step, Value::sequence(), path, depth)?;
            Ok(None)
        }
    }
}

/// Applies `action` at `path` inside `root`, mutating it in place.
///
/// [`Action::Get`] returns a copy of the value found, or `default` when a key
/// or index along the path is missing. A key step that reaches a scalar or a
/// sequence also counts as missing. Every other action returns `Ok(None)`
/// on success. `value` is the payload for [`Action::Set`], [`Action::Append`]
/// and [`Action::Insert`]; `null` is used when it is absent.
///
/// A failed action leaves `root` as it was: mappings created on the way to the
/// failing step are removed again.
///
/// An empty path addresses the root itself: `Get` returns it, and every other
/// action fails with [`PathError::Configuration`] since the root has no parent
/// to store into.
pub fn evaluate(
    root: &mut Value,
    path: &Path,
    action: Action,
    value: Option<Value>,
    default: Option<Value>,
) -> Result<Option<Value>, PathError> {
    debug!(%path, %action, "evaluating path");

    let Some(last) = path.steps().last() else {
        return match action {
            Action::Get => Ok(Some(root.clone())),
            _ => Err(PathError::Configuration {
                message: format!("Cannot {} the document root: the path has no steps", action),
            }),
        };
    };

    let mut created = None;
    let outcome = walk_to_parent(root, path, path.len() - 1, action, &mut created)
        .and_then(|parent| apply(parent, last, action, value, path));

    if let (Err(_), Some(depth)) = (&outcome, created) {
        discard_created(root, path, depth);
    }

    match (action, outcome, default) {
        (Action::Get, Err(err), Some(default)) if is_missing(&err) => {
            debug!(%path, "path not found, returning default");
            Ok(Some(default))
        }
        (_, outcome, _) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        serde_json::from_str(
            r#"{"feed": {"id": "my_feed", "tags": ["devel", "example", "python"]}}"#,
        )
        .unwrap()
    }

    fn path(expr: &str) -> Path {
        Path::parse(expr).unwrap()
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-3, 3), Some(0));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(0, 0), None);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("get".parse::<Action>().unwrap(), Action::Get);
        assert_eq!("DEL".parse::<Action>().unwrap(), Action::Delete);
        assert_eq!("mkdict".parse::<Action>().unwrap(), Action::MakeMapping);
        assert_eq!("make-sequence".parse::<Action>().unwrap(), Action::MakeSequence);
        let err = "explode".parse::<Action>().unwrap_err();
        assert!(matches!(err, PathError::Configuration { .. }));
        assert_eq!(err.to_string(), "Invalid action: explode");
    }

    #[test]
    fn test_action_display_round_trips() {
        for action in [
            Action::Get,
            Action::Set,
            Action::Delete,
            Action::Append,
            Action::Insert,
            Action::MakeMapping,
            Action::MakeSequence,
        ] {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_resolve_borrows_in_place() {
        let d = doc();
        let tags = resolve(&d, &path("feed.tags")).unwrap();
        assert!(std::ptr::eq(tags, &d.as_mapping().unwrap()["feed"].as_mapping().unwrap()["tags"]));
    }

    #[test]
    fn test_resolve_reports_failing_prefix() {
        let d = doc();
        let err = resolve(&d, &path("feed.missing.deeper")).unwrap_err();
        assert_eq!(err, PathError::Lookup { path: path("feed.missing") });
    }

    #[test]
    fn test_list_step_on_mapping_is_type_mismatch() {
        let mut d = doc();
        let err = evaluate(&mut d, &path("feed[0]"), Action::Get, None, Some(Value::Null))
            .unwrap_err();
        assert_eq!(
            err,
            PathError::TypeMismatch {
                path: path("feed[0]"),
                expected: "sequence",
                found: "mapping",
            }
        );
    }

    #[test]
    fn test_set_does_not_autocreate_through_scalars() {
        let mut d = doc();
        let err = evaluate(&mut d, &path("feed.id.sub"), Action::Set, Some(Value::Null), None)
            .unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { found: "string", .. }));
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(&PathError::Lookup { path: path("feed.x") }));
        assert!(is_missing(&PathError::TypeMismatch {
            path: path("feed.id.x"),
            expected: "mapping",
            found: "string",
        }));
        assert!(!is_missing(&PathError::TypeMismatch {
            path: path("feed[0]"),
            expected: "sequence",
            found: "mapping",
        }));
    }

    #[test]
    fn test_discard_created_removes_outermost_mapping() {
        let mut d = doc();
        let before = d.clone();
        let p = path("feed.new.deeper[0]");
        let mut created = None;
        walk_to_parent(&mut d, &p, 3, Action::Set, &mut created).unwrap();
        assert_eq!(created, Some(1));

        discard_created(&mut d, &p, 1);
        assert_eq!(d, before);
    }

    #[test]
    fn test_failed_walk_leaves_no_partial_containers_for_get() {
        let mut d = doc();
        let before = d.clone();
        let got = evaluate(&mut d, &path("a.b.c"), Action::Get, None, Some(Value::from("x")))
            .unwrap();
        assert_eq!(got, Some(Value::from("x")));
        assert_eq!(d, before);
    }
}

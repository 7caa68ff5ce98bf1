//! Bulk rewrites over every value a path reaches.

use crate::visitor::PathVisitor;
use modelpath_core::{type_name, TraversalError};
use modelpath_dsl::{ListFilter, Path, PathExpression};
use serde_json::Value;
use tracing::{debug, trace};

/// Applies a transform to every existing value at the end of a path.
///
/// Lists met along the way are expanded into their elements, and absent or
/// null values are dropped from the focus. Nothing is created. The
/// transform sees each value and returns `Some(replacement)` to rewrite it
/// or `None` to leave it alone.
pub struct PutAllPathVisitor<'a, F>
where
    F: FnMut(&Value) -> Option<Value>,
{
    focus: Vec<&'a mut Value>,
    prev_key: Option<String>,
    transform: F,
    updated: usize,
}

impl<'a, F> PutAllPathVisitor<'a, F>
where
    F: FnMut(&Value) -> Option<Value>,
{
    pub fn new(root: &'a mut Value, transform: F) -> Self {
        let mut focus = Vec::new();
        push_expanded(&mut focus, root);
        Self {
            focus,
            prev_key: None,
            transform,
            updated: 0,
        }
    }

    /// Number of values the transform rewrote.
    pub fn updated(&self) -> usize {
        self.updated
    }

    fn descend(&mut self) -> Result<(), TraversalError> {
        let Some(key) = self.prev_key.take() else {
            return Ok(());
        };
        let focus = std::mem::take(&mut self.focus);
        let mut next = Vec::with_capacity(focus.len());
        for value in focus {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get_mut(&key) {
                        push_expanded(&mut next, child);
                    }
                }
                other => return Err(expected_map(&key, other)),
            }
        }
        self.focus = next;
        Ok(())
    }
}

impl<F> PathVisitor for PutAllPathVisitor<'_, F>
where
    F: FnMut(&Value) -> Option<Value>,
{
    fn visit_start(&mut self, path: &Path) -> Result<(), TraversalError> {
        let filter = path.iter().find_map(|expression| match expression {
            PathExpression::ListFilter(filter) => Some(filter),
            _ => None,
        });
        match filter {
            Some(filter) => self.visit_list_filter(filter),
            None => Ok(()),
        }
    }

    fn visit_map_key(&mut self, key: &str) -> Result<(), TraversalError> {
        trace!(key, foci = self.focus.len(), "put_all: map key");
        self.descend()?;
        self.prev_key = Some(key.to_string());
        Ok(())
    }

    fn visit_list_filter(&mut self, filter: &ListFilter) -> Result<(), TraversalError> {
        self.focus.clear();
        Err(TraversalError::FilterNotSupported {
            segment: filter.to_string(),
        })
    }

    fn visit_path(&mut self, path: &Path) -> Result<(), TraversalError> {
        let focus = std::mem::take(&mut self.focus);
        let Some(key) = self.prev_key.take() else {
            for value in focus {
                self.apply(value);
            }
            return Ok(());
        };

        // Check every focus before rewriting any so a failure leaves the
        // model untouched.
        if let Some(other) = focus.iter().find(|v| !v.is_object()) {
            return Err(expected_map(&key, other));
        }
        for value in focus {
            if let Value::Object(map) = value {
                if let Some(slot) = map.get_mut(&key) {
                    self.apply(slot);
                }
            }
        }
        debug!(path = %path, updated = self.updated, "put_all: done");
        Ok(())
    }
}

impl<F> PutAllPathVisitor<'_, F>
where
    F: FnMut(&Value) -> Option<Value>,
{
    fn apply(&mut self, slot: &mut Value) {
        if slot.is_null() {
            return;
        }
        if let Some(replacement) = (self.transform)(slot) {
            *slot = replacement;
            self.updated += 1;
        }
    }
}

/// Push `value` onto `out`, flattening lists and skipping nulls.
fn push_expanded<'v>(out: &mut Vec<&'v mut Value>, value: &'v mut Value) {
    if value.is_array() {
        if let Value::Array(items) = value {
            for item in items.iter_mut() {
                push_expanded(out, item);
            }
        }
    } else if !value.is_null() {
        out.push(value);
    }
}

fn expected_map(segment: &str, found: &Value) -> TraversalError {
    TraversalError::ExpectedMap {
        segment: segment.to_string(),
        found: type_name(found).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::walk;
    use serde_json::json;

    fn upper(value: &Value) -> Option<Value> {
        value.as_str().map(|s| Value::String(s.to_uppercase()))
    }

    fn put_all<F>(root: &mut Value, source: &str, transform: F) -> Result<usize, TraversalError>
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        let path = Path::parse(source).unwrap();
        let mut visitor = PutAllPathVisitor::new(root, transform);
        walk(&path, &mut visitor)?;
        Ok(visitor.updated())
    }

    #[test]
    fn test_put_all_single_value() {
        let mut root = json!({"a": {"b": "x"}});
        assert_eq!(put_all(&mut root, "a.b", upper).unwrap(), 1);
        assert_eq!(root, json!({"a": {"b": "X"}}));
    }

    #[test]
    fn test_put_all_expands_lists() {
        let mut root = json!({"links": [
            {"roles": [{"n": "r1"}, {"n": "r2"}]},
            {"roles": [{"n": "r3"}, {"x": 1}]},
            {"other": true},
            null
        ]});
        assert_eq!(put_all(&mut root, "links.roles.n", upper).unwrap(), 3);
        assert_eq!(
            root,
            json!({"links": [
                {"roles": [{"n": "R1"}, {"n": "R2"}]},
                {"roles": [{"n": "R3"}, {"x": 1}]},
                {"other": true},
                null
            ]})
        );
    }

    #[test]
    fn test_put_all_leaves_none_untouched() {
        let mut root = json!({"items": [{"v": 1}, {"v": "a"}, {"v": null}]});
        assert_eq!(put_all(&mut root, "items.v", upper).unwrap(), 1);
        assert_eq!(root, json!({"items": [{"v": 1}, {"v": "A"}, {"v": null}]}));
    }

    #[test]
    fn test_put_all_creates_nothing() {
        let mut root = json!({"a": {}});
        assert_eq!(put_all(&mut root, "a.b.c", |_| Some(json!(1))).unwrap(), 0);
        assert_eq!(root, json!({"a": {}}));
    }

    #[test]
    fn test_put_all_rejects_filters() {
        let mut root = json!({"links": [{"sysName": "AD"}]});
        let err = put_all(&mut root, "links[AD].name", upper).unwrap_err();
        assert_eq!(
            err,
            TraversalError::FilterNotSupported {
                segment: "links[AD]".to_string()
            }
        );
    }

    #[test]
    fn test_put_all_scalar_in_path_fails_without_writes() {
        let mut root = json!({"items": [{"v": "a"}, "loose"]});
        let err = put_all(&mut root, "items.v", upper).unwrap_err();
        assert!(matches!(err, TraversalError::ExpectedMap { ref found, .. } if found == "string"));
        assert_eq!(root, json!({"items": [{"v": "a"}, "loose"]}));
    }
}

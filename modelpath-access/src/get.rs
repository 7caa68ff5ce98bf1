//! Read-only traversal.

use crate::filter::element_matches;
use crate::visitor::PathVisitor;
use modelpath_core::{type_name, PathConfig, TraversalError};
use modelpath_dsl::{ListFilter, Path};
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Narrows a focus over the root value, one expression at a time.
///
/// The focus borrows from the root while it can; projections and
/// non-unique filters build new lists. A null or missing value ends the
/// walk quietly with no focus.
pub struct GetPathVisitor<'a> {
    focus: Option<Cow<'a, Value>>,
    config: &'a PathConfig,
}

impl<'a> GetPathVisitor<'a> {
    pub fn new(root: &'a Value, config: &'a PathConfig) -> Self {
        let focus = if root.is_null() {
            None
        } else {
            Some(Cow::Borrowed(root))
        };
        Self { focus, config }
    }

    /// Current focus, if any.
    pub fn value(&self) -> Option<&Value> {
        self.focus.as_deref()
    }

    /// Consume the visitor, returning an owned copy of the focus.
    pub fn into_value(self) -> Option<Value> {
        self.focus.map(Cow::into_owned)
    }
}

impl PathVisitor for GetPathVisitor<'_> {
    fn visit_map_key(&mut self, key: &str) -> Result<(), TraversalError> {
        trace!(key, "get: map key");
        self.focus = match self.focus.take() {
            None => None,
            Some(Cow::Borrowed(value)) => select_key(value, key)?,
            Some(Cow::Owned(value)) => select_key(&value, key)?.map(|v| Cow::Owned(v.into_owned())),
        };
        Ok(())
    }

    fn visit_list_filter(&mut self, filter: &ListFilter) -> Result<(), TraversalError> {
        trace!(filter = %filter, "get: list filter");
        let config = self.config;
        self.focus = match self.focus.take() {
            None => None,
            Some(Cow::Borrowed(value)) => select_filter(value, filter, config)?,
            Some(Cow::Owned(value)) => {
                select_filter(&value, filter, config)?.map(|v| Cow::Owned(v.into_owned()))
            }
        };
        Ok(())
    }

    fn visit_path(&mut self, path: &Path) -> Result<(), TraversalError> {
        trace!(path = %path, found = self.focus.is_some(), "get: done");
        Ok(())
    }
}

/// `value[key]` for a map; the projection of `key` over a list.
fn select_key<'v>(value: &'v Value, key: &str) -> Result<Option<Cow<'v, Value>>, TraversalError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(map.get(key).filter(|v| !v.is_null()).map(Cow::Borrowed)),
        Value::Array(items) => {
            let mut projected = Vec::new();
            project_key(items, key, &mut projected)?;
            Ok(Some(Cow::Owned(Value::Array(projected))))
        }
        other => Err(TraversalError::ExpectedMap {
            segment: key.to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

fn project_key(items: &[Value], key: &str, out: &mut Vec<Value>) -> Result<(), TraversalError> {
    for item in items {
        match item {
            Value::Null => {}
            Value::Object(map) => {
                if let Some(v) = map.get(key).filter(|v| !v.is_null()) {
                    out.push(v.clone());
                }
            }
            Value::Array(nested) => project_key(nested, key, out)?,
            other => {
                return Err(TraversalError::ExpectedMap {
                    segment: key.to_string(),
                    found: type_name(other).to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Elements of the list at `filter.key()` matching the filter.
fn select_filter<'v>(
    value: &'v Value,
    filter: &ListFilter,
    config: &PathConfig,
) -> Result<Option<Cow<'v, Value>>, TraversalError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => match map.get(filter.key()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => {
                let matches = matching_elements(items, filter, config)?;
                if filter.is_unique() {
                    if matches.len() > 1 {
                        debug!(
                            filter = %filter,
                            matches = matches.len(),
                            "unique filter matched several elements, using the first"
                        );
                    }
                    Ok(matches.first().map(|v| Cow::Borrowed(*v)))
                } else {
                    let owned = matches.into_iter().cloned().collect();
                    Ok(Some(Cow::Owned(Value::Array(owned))))
                }
            }
            Some(other) => Err(TraversalError::ExpectedList {
                segment: filter.to_string(),
                found: type_name(other).to_string(),
            }),
        },
        Value::Array(items) => {
            let mut collected = Vec::new();
            for item in items {
                match item {
                    Value::Null => {}
                    // A nested list always yields a flat list of its own.
                    Value::Array(_) => {
                        if let Some(Value::Array(found)) =
                            select_filter(item, filter, config)?.map(Cow::into_owned)
                        {
                            collected.extend(found);
                        }
                    }
                    Value::Object(_) => {
                        match select_filter(item, filter, config)?.map(Cow::into_owned) {
                            Some(Value::Array(found)) if !filter.is_unique() => {
                                collected.extend(found)
                            }
                            Some(found) => collected.push(found),
                            None => {}
                        }
                    }
                    other => {
                        return Err(TraversalError::ExpectedMap {
                            segment: filter.to_string(),
                            found: type_name(other).to_string(),
                        })
                    }
                }
            }
            Ok(Some(Cow::Owned(Value::Array(collected))))
        }
        other => Err(TraversalError::ExpectedMap {
            segment: filter.to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

fn matching_elements<'v>(
    items: &'v [Value],
    filter: &ListFilter,
    config: &PathConfig,
) -> Result<Vec<&'v Value>, TraversalError> {
    let mut matches = Vec::new();
    for item in items {
        match item {
            Value::Null => {}
            Value::Object(element) => {
                if element_matches(element, filter, config) {
                    matches.push(item);
                }
            }
            other => {
                return Err(TraversalError::ExpectedMap {
                    segment: filter.to_string(),
                    found: type_name(other).to_string(),
                })
            }
        }
    }
    Ok(matches)
}

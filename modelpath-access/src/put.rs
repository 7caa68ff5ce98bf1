//! Single-value writes.

use crate::filter::{creation_property, element_matches};
use crate::visitor::PathVisitor;
use modelpath_core::{is_vacant, type_name, PathConfig, TraversalError};
use modelpath_dsl::{ListFilter, Path, PathExpression};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Writes one value at the end of a path, creating what is missing on the way.
///
/// The visitor keeps the key of the last map expression pending and only
/// descends through it when the next expression arrives, so the terminal
/// step can insert at that key. After a list filter there is no pending key
/// and the terminal step replaces the matched element itself.
pub struct PutPathVisitor<'a> {
    focus: Option<&'a mut Value>,
    prev_key: Option<String>,
    value: Option<Value>,
    config: &'a PathConfig,
}

impl<'a> PutPathVisitor<'a> {
    pub fn new(root: &'a mut Value, value: Value, config: &'a PathConfig) -> Self {
        Self {
            focus: Some(root),
            prev_key: None,
            value: Some(value),
            config,
        }
    }

    /// Move the focus through the pending key, if there is one.
    fn descend(&mut self) -> Result<(), TraversalError> {
        let focus = self.focus.take().ok_or(TraversalError::Exhausted)?;
        let Some(key) = self.prev_key.take() else {
            self.focus = Some(focus);
            return Ok(());
        };
        let map = as_map_mut(focus, &key, self.config)?;
        self.focus = Some(child_map_slot(map, key, self.config)?);
        Ok(())
    }
}

impl PathVisitor for PutPathVisitor<'_> {
    /// A non-unique filter anywhere in the path fails the put before any
    /// intermediate map or list is created.
    fn visit_start(&mut self, path: &Path) -> Result<(), TraversalError> {
        let non_unique = path.iter().find_map(|expression| match expression {
            PathExpression::ListFilter(filter) if !filter.is_unique() => Some(filter),
            _ => None,
        });
        if let Some(filter) = non_unique {
            self.focus = None;
            return Err(TraversalError::NonUniquePut {
                segment: filter.to_string(),
            });
        }
        Ok(())
    }

    fn visit_map_key(&mut self, key: &str) -> Result<(), TraversalError> {
        trace!(key, "put: map key");
        self.descend()?;
        self.prev_key = Some(key.to_string());
        Ok(())
    }

    fn visit_list_filter(&mut self, filter: &ListFilter) -> Result<(), TraversalError> {
        trace!(filter = %filter, "put: list filter");
        self.descend()?;

        let config = self.config;
        let focus = self.focus.take().ok_or(TraversalError::Exhausted)?;
        let map = as_map_mut(focus, filter.key(), config)?;
        let list = list_slot(map, filter, config)?;

        let mut found = None;
        for (index, item) in list.iter().enumerate() {
            match item {
                Value::Null => {}
                Value::Object(element) => {
                    if element_matches(element, filter, config) {
                        found = Some(index);
                        break;
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

        let index = match found {
            Some(index) => index,
            None => {
                if !config.auto_vivify {
                    return Err(TraversalError::MissingIntermediate {
                        segment: filter.to_string(),
                    });
                }
                let property = creation_property(filter, config);
                debug!(filter = %filter, property, "creating list element");
                let mut element = Map::new();
                element.insert(property.to_string(), Value::String(filter.value().to_string()));
                list.push(Value::Object(element));
                list.len() - 1
            }
        };

        self.focus = Some(&mut list[index]);
        Ok(())
    }

    fn visit_path(&mut self, path: &Path) -> Result<(), TraversalError> {
        let focus = self.focus.take().ok_or(TraversalError::Exhausted)?;
        let value = self.value.take().ok_or(TraversalError::Exhausted)?;
        match self.prev_key.take() {
            Some(key) => {
                let map = as_map_mut(focus, &key, self.config)?;
                map.insert(key, value);
            }
            None => *focus = value,
        }
        trace!(path = %path, "put: written");
        Ok(())
    }
}

/// View `value` as a map, turning a vacant slot into an empty one.
fn as_map_mut<'v>(
    value: &'v mut Value,
    segment: &str,
    config: &PathConfig,
) -> Result<&'v mut Map<String, Value>, TraversalError> {
    if is_vacant(value) {
        if !config.auto_vivify {
            return Err(TraversalError::MissingIntermediate {
                segment: segment.to_string(),
            });
        }
        debug!(segment, "auto-vivifying map");
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TraversalError::ExpectedMap {
            segment: segment.to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

/// The map held at `map[key]`, created when absent or vacant.
fn child_map_slot<'v>(
    map: &'v mut Map<String, Value>,
    key: String,
    config: &PathConfig,
) -> Result<&'v mut Value, TraversalError> {
    if !config.auto_vivify && map.get(&key).map_or(true, is_vacant) {
        return Err(TraversalError::MissingIntermediate { segment: key });
    }
    let slot = map.entry(key.clone()).or_insert(Value::Null);
    if is_vacant(slot) {
        debug!(segment = %key, "auto-vivifying map");
        *slot = Value::Object(Map::new());
    } else if !slot.is_object() {
        return Err(TraversalError::ExpectedMap {
            segment: key,
            found: type_name(slot).to_string(),
        });
    }
    Ok(slot)
}

/// The list a filter selects from, created when absent or vacant.
fn list_slot<'v>(
    map: &'v mut Map<String, Value>,
    filter: &ListFilter,
    config: &PathConfig,
) -> Result<&'v mut Vec<Value>, TraversalError> {
    if !config.auto_vivify && map.get(filter.key()).map_or(true, is_vacant) {
        return Err(TraversalError::MissingIntermediate {
            segment: filter.to_string(),
        });
    }
    let slot = map.entry(filter.key()).or_insert(Value::Null);
    if is_vacant(slot) {
        debug!(segment = filter.key(), "auto-vivifying list");
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(TraversalError::ExpectedList {
            segment: filter.to_string(),
            found: type_name(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::walk;
    use serde_json::json;

    fn put_with(
        config: &PathConfig,
        root: &mut Value,
        source: &str,
        value: Value,
    ) -> Result<(), TraversalError> {
        let path = Path::parse(source).unwrap();
        let mut visitor = PutPathVisitor::new(root, value, config);
        walk(&path, &mut visitor)
    }

    fn put(root: &mut Value, source: &str, value: Value) -> Result<(), TraversalError> {
        put_with(&PathConfig::default(), root, source, value)
    }

    #[test]
    fn test_put_creates_intermediate_maps() {
        let mut root = json!({});
        put(&mut root, "a.b", json!(5)).unwrap();
        assert_eq!(root, json!({"a": {"b": 5}}));
    }

    #[test]
    fn test_put_overwrites_existing_leaf() {
        let mut root = json!({"a": {"b": 1, "c": 2}});
        put(&mut root, "a.b", json!("x")).unwrap();
        assert_eq!(root, json!({"a": {"b": "x", "c": 2}}));
    }

    #[test]
    fn test_put_vivifies_null_root_and_empty_string_slots() {
        let mut root = Value::Null;
        put(&mut root, "a", json!(1)).unwrap();
        assert_eq!(root, json!({"a": 1}));

        let mut root = json!({"a": ""});
        put(&mut root, "a.b", json!(1)).unwrap();
        assert_eq!(root, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_put_through_scalar_fails() {
        let mut root = json!({"a": "text"});
        let err = put(&mut root, "a.b", json!(1)).unwrap_err();
        assert_eq!(
            err,
            TraversalError::ExpectedMap {
                segment: "a".to_string(),
                found: "string".to_string()
            }
        );
        assert_eq!(root, json!({"a": "text"}));
    }

    #[test]
    fn test_put_into_existing_filter_match() {
        let mut root = json!({"links": [
            {"sysName": "HR"},
            {"sysName": "AD", "attributes": {"cn": "old"}}
        ]});
        put(&mut root, "links[AD].attributes.cn", json!("new")).unwrap();
        assert_eq!(root["links"][1]["attributes"]["cn"], json!("new"));
        assert_eq!(root["links"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_put_creates_missing_filter_element() {
        let mut root = json!({});
        put(&mut root, "links[AD].attributes.cn", json!("x")).unwrap();
        assert_eq!(
            root,
            json!({"links": [{"sysName": "AD", "attributes": {"cn": "x"}}]})
        );

        let mut root = json!({"items": [{"id": "1"}]});
        put(&mut root, "items{id=2}.n", json!(true)).unwrap();
        assert_eq!(root, json!({"items": [{"id": "1"}, {"id": "2", "n": true}]}));
    }

    #[test]
    fn test_put_ending_in_filter_replaces_element() {
        let mut root = json!({"items": [{"id": 1, "n": 1}, {"id": 2}]});
        put(&mut root, "items[id=1]", json!({"id": 1, "n": 9})).unwrap();
        assert_eq!(root, json!({"items": [{"id": 1, "n": 9}, {"id": 2}]}));
    }

    #[test]
    fn test_put_non_unique_filter_fails() {
        let mut root = json!({"items": [{"id": 1}]});
        let err = put(&mut root, "a.items[id*=1].n", json!(1)).unwrap_err();
        assert_eq!(
            err,
            TraversalError::NonUniquePut {
                segment: "items[id*=1]".to_string()
            }
        );
        assert_eq!(root, json!({"items": [{"id": 1}]}));
    }

    #[test]
    fn test_put_non_unique_filter_creates_nothing() {
        let mut root = json!({});
        let err = put(&mut root, "a.b.items[id*=1].n", json!(1)).unwrap_err();
        assert!(matches!(err, TraversalError::NonUniquePut { .. }));
        assert_eq!(root, json!({}));

        let mut root = Value::Null;
        assert!(put(&mut root, "a.items{id*=1}", json!(1)).is_err());
        assert_eq!(root, Value::Null);
    }

    #[test]
    fn test_put_filter_on_non_list_fails() {
        let mut root = json!({"items": {"id": 1}});
        let err = put(&mut root, "items[id=1].n", json!(1)).unwrap_err();
        assert!(matches!(err, TraversalError::ExpectedList { ref found, .. } if found == "map"));
    }

    #[test]
    fn test_put_without_auto_vivify() {
        let config = PathConfig {
            auto_vivify: false,
            ..PathConfig::default()
        };

        let mut root = json!({"a": {}});
        put_with(&config, &mut root, "a.b", json!(1)).unwrap();
        assert_eq!(root, json!({"a": {"b": 1}}));

        let mut root = json!({});
        let err = put_with(&config, &mut root, "a.b", json!(1)).unwrap_err();
        assert_eq!(
            err,
            TraversalError::MissingIntermediate {
                segment: "a".to_string()
            }
        );
        assert_eq!(root, json!({}));

        let mut root = json!({"items": []});
        let err = put_with(&config, &mut root, "items[id=1].n", json!(1)).unwrap_err();
        assert!(matches!(err, TraversalError::MissingIntermediate { .. }));
    }

    #[test]
    fn test_visitor_is_single_use() {
        let config = PathConfig::default();
        let mut root = json!({});
        let path = Path::parse("a").unwrap();
        let mut visitor = PutPathVisitor::new(&mut root, json!(1), &config);
        walk(&path, &mut visitor).unwrap();
        assert_eq!(walk(&path, &mut visitor), Err(TraversalError::Exhausted));
    }
}

//! Convenience entry points: parse a path string and run one visitor.

use crate::get::GetPathVisitor;
use crate::put::PutPathVisitor;
use crate::put_all::PutAllPathVisitor;
use crate::visitor::walk;
use modelpath_core::{ModelPathResult, PathConfig};
use modelpath_dsl::Path;
use once_cell::sync::Lazy;
use serde_json::Value;

static DEFAULT_PATHS: Lazy<ModelPaths> = Lazy::new(ModelPaths::default);

/// Path operations bound to one [`PathConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPaths {
    config: PathConfig,
}

impl ModelPaths {
    pub fn new(config: PathConfig) -> Self {
        Self { config }
    }

    /// Build from `MODELPATH_*` environment variables. The loaded config is
    /// already validated.
    pub fn from_env() -> ModelPathResult<Self> {
        Ok(Self::new(PathConfig::from_env()?))
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Value at `path`, or `None` when any step lands on nothing.
    pub fn get(&self, root: &Value, path: &str) -> ModelPathResult<Option<Value>> {
        let path = Path::parse(path)?;
        self.get_path(root, &path)
    }

    pub fn get_path(&self, root: &Value, path: &Path) -> ModelPathResult<Option<Value>> {
        let mut visitor = GetPathVisitor::new(root, &self.config);
        walk(path, &mut visitor)?;
        Ok(visitor.into_value())
    }

    /// Write `value` at `path`, creating intermediate maps, lists and list
    /// elements when auto-vivification is on.
    pub fn put(&self, root: &mut Value, path: &str, value: Value) -> ModelPathResult<()> {
        let path = Path::parse(path)?;
        self.put_path(root, &path, value)
    }

    pub fn put_path(&self, root: &mut Value, path: &Path, value: Value) -> ModelPathResult<()> {
        let mut visitor = PutPathVisitor::new(root, value, &self.config);
        walk(path, &mut visitor)?;
        Ok(())
    }

    /// Rewrite every existing value at `path` for which `transform` returns
    /// `Some`. Returns how many values were rewritten.
    pub fn put_all<F>(&self, root: &mut Value, path: &str, transform: F) -> ModelPathResult<usize>
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        let path = Path::parse(path)?;
        self.put_all_path(root, &path, transform)
    }

    pub fn put_all_path<F>(&self, root: &mut Value, path: &Path, transform: F) -> ModelPathResult<usize>
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        let mut visitor = PutAllPathVisitor::new(root, transform);
        walk(path, &mut visitor)?;
        Ok(visitor.updated())
    }
}

/// [`ModelPaths::get`] with the default configuration.
pub fn get(root: &Value, path: &str) -> ModelPathResult<Option<Value>> {
    DEFAULT_PATHS.get(root, path)
}

pub fn get_path(root: &Value, path: &Path) -> ModelPathResult<Option<Value>> {
    DEFAULT_PATHS.get_path(root, path)
}

/// [`ModelPaths::put`] with the default configuration.
pub fn put(root: &mut Value, path: &str, value: Value) -> ModelPathResult<()> {
    DEFAULT_PATHS.put(root, path, value)
}

pub fn put_path(root: &mut Value, path: &Path, value: Value) -> ModelPathResult<()> {
    DEFAULT_PATHS.put_path(root, path, value)
}

/// [`ModelPaths::put_all`] with the default configuration.
pub fn put_all<F>(root: &mut Value, path: &str, transform: F) -> ModelPathResult<usize>
where
    F: FnMut(&Value) -> Option<Value>,
{
    DEFAULT_PATHS.put_all(root, path, transform)
}

pub fn put_all_path<F>(root: &mut Value, path: &Path, transform: F) -> ModelPathResult<usize>
where
    F: FnMut(&Value) -> Option<Value>,
{
    DEFAULT_PATHS.put_all_path(root, path, transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelpath_core::{ModelPathError, ParseError, TraversalError};
    use serde_json::json;

    #[test]
    fn test_facade_get_and_put() {
        let mut model = json!({});
        put(&mut model, "links[AD].attributes.cn", json!("jdoe")).unwrap();
        assert_eq!(
            get(&model, "links[AD].attributes.cn").unwrap(),
            Some(json!("jdoe"))
        );
    }

    #[test]
    fn test_facade_reports_parse_errors() {
        let err = get(&json!({}), "a..b").unwrap_err();
        assert!(matches!(
            err,
            ModelPathError::Parse(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_facade_reports_traversal_errors() {
        let mut model = json!({"items": []});
        let err = put(&mut model, "items[id*=1]", json!(1)).unwrap_err();
        assert!(matches!(
            err,
            ModelPathError::Traversal(TraversalError::NonUniquePut { .. })
        ));
    }

    #[test]
    fn test_custom_filter_properties() {
        let paths = ModelPaths::new(PathConfig {
            default_filter_properties: vec!["id".to_string()],
            ..PathConfig::default()
        });
        let mut model = json!({});
        paths.put(&mut model, "items[7].n", json!(1)).unwrap();
        assert_eq!(model, json!({"items": [{"id": "7", "n": 1}]}));
        assert_eq!(paths.get(&model, "items[7].n").unwrap(), Some(json!(1)));
        assert_eq!(get(&model, "items[7].n").unwrap(), None);
    }

    #[test]
    fn test_put_all_path_counts_rewrites() {
        let mut model = json!({"a": [{"b": 1}, {"b": 2}]});
        let path = Path::parse("a.b").unwrap();
        let count = put_all_path(&mut model, &path, |v| v.as_i64().map(|n| json!(n * 10))).unwrap();
        assert_eq!(count, 2);
        assert_eq!(model, json!({"a": [{"b": 10}, {"b": 20}]}));
    }
}

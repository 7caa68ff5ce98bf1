//! Visitor trait over parsed paths

use modelpath_core::TraversalError;
use modelpath_dsl::{ListFilter, Path, PathExpression};

/// A state machine driven by the expressions of a [`Path`].
///
/// [`walk`] calls `visit_start` with the whole path, then `visit_map_key` /
/// `visit_list_filter` for every expression in order, then `visit_path` once
/// as the terminal step.
pub trait PathVisitor {
    /// Check the path as a whole before any expression is visited. An error
    /// here ends the walk before the model is touched.
    fn visit_start(&mut self, _path: &Path) -> Result<(), TraversalError> {
        Ok(())
    }

    fn visit_map_key(&mut self, key: &str) -> Result<(), TraversalError>;

    fn visit_list_filter(&mut self, filter: &ListFilter) -> Result<(), TraversalError>;

    /// Terminal step, called after every expression has been visited.
    fn visit_path(&mut self, path: &Path) -> Result<(), TraversalError>;
}

/// Drive `visitor` over `path`. Stops at the first failing step.
pub fn walk<V>(path: &Path, visitor: &mut V) -> Result<(), TraversalError>
where
    V: PathVisitor + ?Sized,
{
    visitor.visit_start(path)?;
    for expression in path {
        match expression {
            PathExpression::MapKey { key } => visitor.visit_map_key(key)?,
            PathExpression::ListFilter(filter) => visitor.visit_list_filter(filter)?,
        }
    }
    visitor.visit_path(path)
}

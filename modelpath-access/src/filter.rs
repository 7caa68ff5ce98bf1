//! List filter matching shared by the visitors.

use modelpath_core::{default_property_equals, property_equals, PathConfig};
use modelpath_dsl::ListFilter;
use serde_json::{Map, Value};

/// Whether a list element map satisfies `filter`.
pub(crate) fn element_matches(
    element: &Map<String, Value>,
    filter: &ListFilter,
    config: &PathConfig,
) -> bool {
    match filter.property() {
        Some(property) => property_equals(element, property, filter.value()),
        None => default_property_equals(element, &config.default_filter_properties, filter.value()),
    }
}

/// Property a put writes on an element it creates for `filter`.
pub(crate) fn creation_property<'a>(filter: &'a ListFilter, config: &'a PathConfig) -> &'a str {
    filter
        .property()
        .unwrap_or_else(|| config.primary_filter_property())
}

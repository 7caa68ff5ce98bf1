//! modelpath Test Utilities
//!
//! Shared test infrastructure for the modelpath workspace:
//! - Proptest generators for path ASTs, path strings and JSON models
//! - Identity-model fixtures in the shape paths are usually written against
//! - Assertions over `ModelPathResult` error variants

pub use modelpath_core::{
    LexError, ModelPathError, ModelPathResult, ParseError, PathConfig, TraversalError,
};
pub use modelpath_dsl::{FilterDelimiter, ListFilter, Path, PathExpression};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating paths and models.

    use super::*;
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    /// Generate a key that lexes as a bare identifier.
    pub fn arb_bare_key() -> impl Strategy<Value = String> {
        "[a-zA-Z_][a-zA-Z0-9_-]{0,8}"
    }

    /// Generate a key that needs quoting or escaping when printed.
    pub fn arb_quoted_key() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,4} [a-z]{1,4}",
            "[a-z]{1,4}\\.[a-z]{1,4}",
            "[a-z]{1,3}[\\[\\]{}=*][a-z]{1,3}",
            "[a-z]{1,3}\"[a-z]{1,3}",
        ]
    }

    /// Generate any key the printer can spell.
    pub fn arb_key() -> impl Strategy<Value = String> {
        prop_oneof![4 => arb_bare_key(), 1 => arb_quoted_key()]
    }

    /// Generate a FilterDelimiter variant.
    pub fn arb_delimiter() -> impl Strategy<Value = FilterDelimiter> {
        prop_oneof![Just(FilterDelimiter::Bracket), Just(FilterDelimiter::Brace)]
    }

    /// Generate a ListFilter of any of the three forms.
    pub fn arb_list_filter() -> impl Strategy<Value = ListFilter> {
        let by_default = (arb_key(), arb_key())
            .prop_map(|(key, value)| ListFilter::by_default_property(key, value));
        let unique = (arb_key(), arb_key(), arb_key())
            .prop_map(|(key, property, value)| ListFilter::unique(key, property, value));
        let all = (arb_key(), arb_key(), arb_key())
            .prop_map(|(key, property, value)| ListFilter::all(key, property, value));
        (prop_oneof![by_default, unique, all], arb_delimiter())
            .prop_map(|(filter, delimiter)| filter.with_delimiter(delimiter))
    }

    /// Generate a PathExpression, map keys twice as often as filters.
    pub fn arb_path_expression() -> impl Strategy<Value = PathExpression> {
        prop_oneof![
            2 => arb_key().prop_map(PathExpression::map_key),
            1 => arb_list_filter().prop_map(PathExpression::from),
        ]
    }

    /// Generate a non-empty Path.
    pub fn arb_path() -> impl Strategy<Value = Path> {
        prop::collection::vec(arb_path_expression(), 1..6).prop_map(Path::new)
    }

    /// Generate a Path that a put can write through and a get can read back.
    ///
    /// Only unique filters; keys, filter properties and filter values come
    /// from disjoint alphabets so a later write never clobbers the property
    /// an earlier filter matched on. Always ends on a map key.
    pub fn arb_writable_path() -> impl Strategy<Value = Path> {
        let key = || "k_[a-z0-9]{1,6}";
        let expression = prop_oneof![
            2 => key().prop_map(PathExpression::map_key),
            1 => (key(), "[A-Z][a-z0-9]{0,5}").prop_map(|(key, value)| {
                PathExpression::from(ListFilter::by_default_property(key, value))
            }),
            1 => (key(), "p_[a-z]{1,4}", "[A-Z][a-z0-9]{0,5}").prop_map(
                |(key, property, value)| PathExpression::from(ListFilter::unique(key, property, value))
            ),
        ];
        (prop::collection::vec(expression, 0..5), key()).prop_map(|(mut expressions, last)| {
            expressions.push(PathExpression::map_key(last));
            Path::new(expressions)
        })
    }

    /// Generate a scalar JSON value.
    pub fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{1,12}".prop_map(Value::String),
        ]
    }

    /// Generate a JSON value nested up to a few levels deep.
    pub fn arb_model() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec((arb_bare_key(), inner), 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
            ]
        })
    }

    /// Generate a PathConfig with valid filter properties.
    pub fn arb_valid_config() -> impl Strategy<Value = PathConfig> {
        (prop::collection::vec(arb_bare_key(), 1..3), any::<bool>()).prop_map(
            |(default_filter_properties, auto_vivify)| PathConfig {
                default_filter_properties,
                auto_vivify,
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built models for common testing scenarios.

    use serde_json::{json, Value};

    /// An identity with two application links, keyed by `sysName`.
    pub fn identity_model() -> Value {
        json!({
            "name": "jdoe",
            "attributes": {
                "department": "Engineering",
                "location": "Austin"
            },
            "links": [
                {
                    "sysName": "AD",
                    "name": "Active Directory",
                    "attributes": {
                        "memberOf": ["CN=Admins", "CN=Users"],
                        "title": "Engineer"
                    },
                    "entitlements": [
                        {"type": "group", "value": "CN=Admins"},
                        {"type": "group", "value": "CN=Users"},
                        {"type": "role", "value": "Operator"}
                    ]
                },
                {
                    "sysName": "HR",
                    "name": "Workday",
                    "attributes": {
                        "title": "Senior Engineer"
                    },
                    "entitlements": [
                        {"type": "role", "value": "Employee"}
                    ]
                }
            ]
        })
    }

    /// Links without `sysName`, matched by the `name` fallback.
    pub fn named_links_model() -> Value {
        json!({
            "links": [
                {"name": "Mainframe", "attributes": {"uid": "JD01"}},
                {"name": "LDAP", "attributes": {"uid": "jdoe"}}
            ]
        })
    }

    /// An empty model for write tests.
    pub fn empty_model() -> Value {
        json!({})
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion functions for modelpath error variants.

    use super::*;

    /// Assert that a ModelPathResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &ModelPathResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a ModelPathResult is a Parse error.
    #[track_caller]
    pub fn assert_parse_error<T: std::fmt::Debug>(result: &ModelPathResult<T>) {
        match result {
            Err(ModelPathError::Parse(_)) => {}
            other => panic!("Expected Parse error, got: {:?}", other),
        }
    }

    /// Assert that a ModelPathResult is a lex error at `position`.
    #[track_caller]
    pub fn assert_lex_error_at<T: std::fmt::Debug>(result: &ModelPathResult<T>, position: usize) {
        match result {
            Err(ModelPathError::Parse(ParseError::Lex(e))) => {
                assert_eq!(e.position(), position, "Wrong lex error position");
            }
            other => panic!("Expected Lex error at {}, got: {:?}", position, other),
        }
    }

    /// Assert that a ModelPathResult is a Traversal error.
    #[track_caller]
    pub fn assert_traversal_error<T: std::fmt::Debug>(result: &ModelPathResult<T>) {
        match result {
            Err(ModelPathError::Traversal(_)) => {}
            other => panic!("Expected Traversal error, got: {:?}", other),
        }
    }

    /// Assert that a ModelPathResult is a NonUniquePut traversal error.
    #[track_caller]
    pub fn assert_non_unique_put<T: std::fmt::Debug>(result: &ModelPathResult<T>) {
        match result {
            Err(ModelPathError::Traversal(TraversalError::NonUniquePut { .. })) => {}
            other => panic!("Expected NonUniquePut error, got: {:?}", other),
        }
    }

    /// Assert that a ModelPathResult is an ExpectedMap traversal error.
    #[track_caller]
    pub fn assert_expected_map<T: std::fmt::Debug>(result: &ModelPathResult<T>, found: &str) {
        match result {
            Err(ModelPathError::Traversal(TraversalError::ExpectedMap { found: f, .. })) => {
                assert_eq!(f, found, "Wrong found type in ExpectedMap error");
            }
            other => panic!("Expected ExpectedMap({}), got: {:?}", found, other),
        }
    }
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;

use treemirror_core::{Value, VariableType};

/// A plausible object name: letters, digits, spaces, dots.
pub fn object_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ._-]{0,15}"
}

/// A root-to-leaf name path of 1 to `max_depth` segments.
pub fn name_path(max_depth: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(object_name(), 1..=max_depth.max(1))
}

/// Several distinct leaf paths sharing a common first segment.
pub fn sibling_paths(max_depth: usize, count: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    (
        object_name(),
        prop::collection::btree_set(name_path(max_depth), 1..=count.max(1)),
    )
        .prop_map(|(head, tails)| {
            tails
                .into_iter()
                .map(|tail| std::iter::once(head.clone()).chain(tail).collect())
                .collect()
        })
}

pub fn variable_type() -> impl Strategy<Value = VariableType> {
    prop_oneof![
        Just(VariableType::Boolean),
        Just(VariableType::Integer),
        Just(VariableType::Float),
        Just(VariableType::String),
    ]
}

/// A value of the given type.
pub fn value_of(variable_type: VariableType) -> BoxedStrategy<Value> {
    match variable_type {
        VariableType::Boolean => any::<bool>().prop_map(Value::Bool).boxed(),
        VariableType::Integer => any::<i64>().prop_map(Value::Int).boxed(),
        VariableType::Float => (-1.0e6..1.0e6f64).prop_map(Value::Float).boxed(),
        VariableType::String => "[ -~]{0,32}".prop_map(Value::String).boxed(),
    }
}

/// A variable type together with a matching value.
pub fn typed_value() -> impl Strategy<Value = (VariableType, Value)> {
    variable_type().prop_flat_map(|t| (Just(t), value_of(t)))
}

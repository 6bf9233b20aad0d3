//! Property tests for the depth ceiling, ordering and defaults

use indexmap::IndexSet;
use proptest::prelude::*;
use schemaform_engine::{
    default_value, display_priority, sort_entity_properties, validate_schema, ValidationOptions,
};
use schemaform_node::{ObjectNode, SchemaNode};
use schemaform_registry::SchemaRegistry;
use serde_json::{json, Map, Value};

fn nest_node(levels: usize) -> SchemaNode {
    let mut node = SchemaNode::from(ObjectNode::new().with_required_property("x", SchemaNode::string()));
    for _ in 0..levels {
        node = SchemaNode::array(node);
    }
    node
}

fn nest_data(levels: usize) -> Value {
    let mut value = json!({});
    for _ in 0..levels {
        value = Value::Array(vec![value]);
    }
    value
}

fn primitive() -> impl Strategy<Value = SchemaNode> {
    prop_oneof![
        Just(SchemaNode::string()),
        Just(SchemaNode::integer()),
        Just(SchemaNode::number()),
        Just(SchemaNode::boolean()),
        Just(SchemaNode::nullable(SchemaNode::string())),
        Just(SchemaNode::array(SchemaNode::string())),
    ]
}

proptest! {
    #[test]
    fn invalid_leaf_is_masked_exactly_at_the_ceiling(levels in 0usize..30, max_depth in 1usize..25) {
        let registry = SchemaRegistry::new();
        let options = ValidationOptions::default().with_max_depth(max_depth);

        let result = validate_schema(
            "",
            Some(&nest_data(levels)),
            &nest_node(levels),
            &options,
            &registry,
        )
        .unwrap();

        prop_assert_eq!(result.valid, levels >= max_depth);
        prop_assert_eq!(result.valid, result.errors.is_empty());
    }

    #[test]
    fn sort_is_descending_and_stable(
        flags in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..12)
    ) {
        let mut required = IndexSet::new();
        let mut value = Map::new();
        let mut properties = Vec::new();

        for (i, (is_required, filled, nullable)) in flags.iter().copied().enumerate() {
            let name = format!("p{i}");
            if is_required {
                required.insert(name.clone());
            }
            if filled {
                value.insert(name.clone(), json!("v"));
            }
            let node = if nullable {
                SchemaNode::nullable(SchemaNode::string())
            } else {
                SchemaNode::string()
            };
            properties.push((name, node, i));
        }

        let value = Value::Object(value);
        let pairs: Vec<(String, SchemaNode)> =
            properties.iter().map(|(n, node, _)| (n.clone(), node.clone())).collect();
        let sorted = sort_entity_properties(pairs, Some(&value), &required);

        let ranked: Vec<(i32, usize)> = sorted
            .iter()
            .map(|(name, node)| {
                let index: usize = name[1..].parse().unwrap();
                (display_priority(name, node, Some(&value), &required), index)
            })
            .collect();

        for window in ranked.windows(2) {
            let (p0, i0) = window[0];
            let (p1, i1) = window[1];
            prop_assert!(p0 > p1 || (p0 == p1 && i0 < i1));
        }
    }

    #[test]
    fn default_is_idempotent_and_required_only(
        fields in proptest::collection::vec((primitive(), any::<bool>()), 0..8)
    ) {
        let mut object = ObjectNode::new();
        let mut expected = Vec::new();
        for (i, (node, is_required)) in fields.into_iter().enumerate() {
            let name = format!("f{i}");
            if is_required {
                expected.push(name.clone());
                object = object.with_required_property(name, node);
            } else {
                object = object.with_property(name, node);
            }
        }
        let node = SchemaNode::from(object);

        let first = default_value(&node);
        prop_assert_eq!(&first, &default_value(&node));

        let keys: Vec<String> = first.as_object().unwrap().keys().cloned().collect();
        prop_assert_eq!(keys, expected);
    }
}

//! Depth-limited flattening of nested mappings into dot-joined keys.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use super::error::SetOpError;
use super::hashable::HashableValue;

/// Separator placed between key segments of a flattened key.
pub const SEPARATOR: char = '.';

/// Typed identity of a flattened key, one element per nesting level.
///
/// `80` and `'80'` are different paths even though both render as `80`.
pub type KeyPath = Vec<HashableValue>;

/// A single leaf produced by [`flatten`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Dot-joined key, for logs and error messages.
    pub key: String,
    /// Typed path used for comparisons.
    pub path: KeyPath,
    /// The original key at each nesting level.
    pub segments: Vec<Value>,
    /// The source value at this path, including anything below the depth limit.
    pub value: Value,
}

impl FlatEntry {
    fn new(segments: &[Value], value: &Value) -> Self {
        Self {
            key: join_segments(segments),
            path: segments.iter().map(HashableValue::from_key).collect(),
            segments: segments.to_vec(),
            value: value.clone(),
        }
    }
}

/// Flattened entries in traversal order, indexed by typed path.
#[derive(Debug, Clone, Default)]
pub struct FlatMap {
    entries: Vec<FlatEntry>,
    index: HashMap<KeyPath, usize>,
}

impl FlatMap {
    /// Creates an empty flat map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. A repeated path replaces the earlier value in place.
    pub fn insert(&mut self, entry: FlatEntry) {
        match self.index.get(&entry.path) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Looks up an entry by its typed path.
    pub fn get(&self, path: &[HashableValue]) -> Option<&FlatEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    /// Returns true if `path` was produced by flattening.
    pub fn contains_key(&self, path: &[HashableValue]) -> bool {
        self.index.contains_key(path)
    }

    /// Iterates entries in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlatEntry> {
        self.entries.iter()
    }

    /// Iterates typed paths in traversal order.
    pub fn keys(&self) -> impl Iterator<Item = &KeyPath> {
        self.entries.iter().map(|e| &e.path)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a FlatMap {
    type Item = &'a FlatEntry;
    type IntoIter = std::slice::Iter<'a, FlatEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Flattens `map` to `depth` levels.
///
/// `0` flattens every non-empty nested mapping, `1` keeps the root keys with
/// their values untouched, and `N` joins at most `N` key segments, leaving
/// anything deeper nested inside the leaf value.
pub fn flatten(map: &Mapping, depth: usize) -> FlatMap {
    let mut out = FlatMap::new();
    let mut prefix = Vec::new();
    flatten_into(map, depth, &mut prefix, &mut out);
    out
}

fn flatten_into(map: &Mapping, depth: usize, prefix: &mut Vec<Value>, out: &mut FlatMap) {
    for (key, value) in map {
        prefix.push(key.clone());

        let at_limit = depth > 0 && prefix.len() >= depth;
        match value {
            Value::Mapping(nested) if !at_limit && !nested.is_empty() => {
                flatten_into(nested, depth, prefix, out);
            }
            _ => out.insert(FlatEntry::new(prefix, value)),
        }

        prefix.pop();
    }
}

/// Renders one mapping key as a path segment.
pub fn key_segment(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

/// Joins key segments with [`SEPARATOR`].
pub fn join_segments(segments: &[Value]) -> String {
    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push(SEPARATOR);
        }
        key.push_str(&key_segment(segment));
    }
    key
}

/// Rebuilds a nested mapping from flattened entries, in the order given.
///
/// Fails without producing output if one entry's path is a proper prefix of
/// another's, since that node would have to be a value and a mapping at once.
pub fn unflatten<'a, I>(entries: I) -> Result<Mapping, SetOpError>
where
    I: IntoIterator<Item = &'a FlatEntry>,
{
    let entries: Vec<&FlatEntry> = entries.into_iter().collect();

    let leaves: HashMap<&[HashableValue], &str> = entries
        .iter()
        .map(|e| (e.path.as_slice(), e.key.as_str()))
        .collect();
    for entry in &entries {
        for end in 1..entry.path.len() {
            if let Some(leaf) = leaves.get(&entry.path[..end]) {
                return Err(SetOpError::StructuralConflict {
                    leaf: (*leaf).to_string(),
                    nested: entry.key.clone(),
                });
            }
        }
    }

    let mut result = Mapping::new();
    for entry in entries {
        let Some((last, parents)) = entry.segments.split_last() else {
            continue;
        };

        let mut current = &mut result;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = current
                .entry(segment.clone())
                .or_insert(Value::Mapping(Mapping::new()));
            current = match slot {
                Value::Mapping(nested) => nested,
                _ => {
                    return Err(SetOpError::StructuralConflict {
                        leaf: join_segments(&parents[..=depth]),
                        nested: entry.key.clone(),
                    })
                }
            };
        }
        current.insert(last.clone(), entry.value.clone());
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mapping(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    fn nested() -> Mapping {
        mapping(
            "database:\n  host: localhost\n  port: 5432\napp:\n  name: myapp\n",
        )
    }

    fn path(segments: &[&str]) -> KeyPath {
        segments
            .iter()
            .map(|s| HashableValue::String((*s).to_string()))
            .collect()
    }

    fn keys(flat: &FlatMap) -> Vec<&str> {
        flat.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn depth_one_keeps_root_values() {
        let data = nested();
        let flat = flatten(&data, 1);
        assert_eq!(keys(&flat), vec!["database", "app"]);
        assert_eq!(
            &flat.get(&path(&["database"])).unwrap().value,
            data.get("database").unwrap()
        );
    }

    #[test]
    fn depth_two_joins_two_levels() {
        let flat = flatten(&nested(), 2);
        assert_eq!(keys(&flat), vec!["database.host", "database.port", "app.name"]);
        assert_eq!(
            flat.get(&path(&["database", "port"])).unwrap().value,
            Value::from(5432)
        );
    }

    #[test]
    fn depth_zero_is_unlimited() {
        let flat = flatten(&mapping("level1:\n  level2:\n    level3: value\n"), 0);
        assert_eq!(keys(&flat), vec!["level1.level2.level3"]);
    }

    #[test]
    fn depth_limit_leaves_deeper_mapping_intact() {
        let flat = flatten(&mapping("a:\n  b:\n    c: 1\n    d: 2\n"), 2);
        assert_eq!(keys(&flat), vec!["a.b"]);
        assert_eq!(
            flat.get(&path(&["a", "b"])).unwrap().value,
            Value::Mapping(mapping("c: 1\nd: 2\n"))
        );
    }

    #[test]
    fn sequences_and_empty_mappings_are_leaves() {
        let flat = flatten(&mapping("hosts: [a, b]\nextra: {}\n"), 0);
        assert_eq!(keys(&flat), vec!["hosts", "extra"]);
    }

    #[test]
    fn non_string_keys_keep_their_type() {
        let flat = flatten(&mapping("ports:\n  80: http\n  true: yes\n"), 0);
        assert_eq!(keys(&flat), vec!["ports.80", "ports.true"]);
        let typed = vec![HashableValue::String("ports".into()), HashableValue::Int(80)];
        let entry = flat.get(&typed).unwrap();
        assert_eq!(entry.segments[1], Value::from(80));
        assert!(!flat.contains_key(&path(&["ports", "80"])));
    }

    #[test]
    fn keys_differing_only_in_type_stay_distinct() {
        let data = mapping("80: http\n'80': text\ntrue: a\n'true': b\n");
        for depth in [0, 1] {
            let flat = flatten(&data, depth);
            assert_eq!(flat.len(), 4);
            assert_eq!(unflatten(&flat).unwrap(), data);
        }
    }

    #[test]
    fn dotted_literal_and_nested_path_stay_distinct() {
        let data = mapping("a.b: 1\nz: 0\na:\n  b: 2\n");
        let flat = flatten(&data, 0);
        assert_eq!(keys(&flat), vec!["a.b", "z", "a.b"]);
        assert_eq!(flat.get(&path(&["a.b"])).unwrap().value, Value::from(1));
        assert_eq!(flat.get(&path(&["a", "b"])).unwrap().value, Value::from(2));
        assert_eq!(unflatten(&flat).unwrap(), data);
    }

    #[test]
    fn insert_replaces_value_in_place() {
        let mut flat = flatten(&mapping("a: 1\nz: 0\n"), 0);
        for entry in &flatten(&mapping("a: 2\n"), 0) {
            flat.insert(entry.clone());
        }
        assert_eq!(keys(&flat), vec!["a", "z"]);
        assert_eq!(flat.get(&path(&["a"])).unwrap().value, Value::from(2));
    }

    #[test]
    fn unflatten_rebuilds_nesting() {
        let data = nested();
        let rebuilt = unflatten(&flatten(&data, 0)).unwrap();
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn unflatten_subset() {
        let flat = flatten(&nested(), 2);
        let rebuilt = unflatten(flat.iter().filter(|e| e.key != "database.port")).unwrap();
        assert_eq!(rebuilt, mapping("database:\n  host: localhost\napp:\n  name: myapp\n"));
    }

    #[test]
    fn unflatten_keeps_dotted_literal_keys() {
        let data = mapping("a.b: 1\n");
        let rebuilt = unflatten(&flatten(&data, 0)).unwrap();
        assert_eq!(rebuilt, data);
    }

    #[test]
    fn unflatten_rejects_leaf_that_is_also_a_parent() {
        let mut flat = flatten(&mapping("a: 1\n"), 0);
        for entry in &flatten(&mapping("a:\n  b: 2\n"), 0) {
            flat.insert(entry.clone());
        }
        let err = unflatten(&flat).unwrap_err();
        assert_eq!(
            err,
            SetOpError::StructuralConflict {
                leaf: "a".into(),
                nested: "a.b".into(),
            }
        );
    }

    #[test]
    fn empty_mapping_flattens_to_nothing() {
        let flat = flatten(&Mapping::new(), 0);
        assert!(flat.is_empty());
        assert_eq!(unflatten(&flat).unwrap(), Mapping::new());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        /// Keys mix strings, integers and booleans, including strings that
        /// spell an integer or boolean key.
        fn arb_key() -> impl Strategy<Value = Value> {
            prop_oneof![
                "[a-d]".prop_map(Value::from),
                (0_i64..3).prop_map(Value::from),
                any::<bool>().prop_map(Value::from),
                prop_oneof![Just("0"), Just("1"), Just("true")].prop_map(Value::from),
            ]
        }

        fn arb_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                any::<i64>().prop_map(Value::from),
                "[a-z]{0,4}".prop_map(Value::from),
                any::<bool>().prop_map(Value::from),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop::collection::vec((arb_key(), inner), 1..4)
                    .prop_map(|pairs| Value::Mapping(pairs.into_iter().collect()))
            })
        }

        fn arb_mapping() -> impl Strategy<Value = Mapping> {
            prop::collection::vec((arb_key(), arb_value()), 0..5)
                .prop_map(|pairs| pairs.into_iter().collect::<Mapping>())
        }

        proptest! {
            #[test]
            fn round_trip_at_any_depth(map in arb_mapping(), depth in 0_usize..5) {
                let rebuilt = unflatten(&flatten(&map, depth)).unwrap();
                prop_assert_eq!(rebuilt, map);
            }

            #[test]
            fn keys_never_exceed_depth(map in arb_mapping(), depth in 1_usize..5) {
                for entry in &flatten(&map, depth) {
                    prop_assert!(entry.segments.len() <= depth);
                }
            }

            #[test]
            fn root_level_keeps_every_key(map in arb_mapping()) {
                prop_assert_eq!(flatten(&map, 1).len(), map.len());
            }
        }
    }
}

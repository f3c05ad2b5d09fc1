//! List/dict normalization of entry collections.
//!
//! Callers describe collections as ordered lists of entries; the engine
//! compares identity-keyed objects. Each resource declares its collections
//! once as a static [`CollectionSpec`] table and the same two functions
//! convert in either direction, recursively.

use super::common::get_from_dict_mut;
use crate::modules::{ModuleError, ModuleResult};
use serde_json::{Map, Value};

/// Which field(s) name an entry within its collection.
#[derive(Debug, Clone, Copy)]
pub enum Identity {
    Field(&'static str),
    /// Several fields joined with `_` (e.g. `ipv4_unicast`)
    Composite(&'static [&'static str]),
}

/// Declares one entry collection and the collections nested in its entries.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    /// Dotted path relative to the containing entry; empty for the root
    pub path: &'static str,
    pub identity: Identity,
    pub children: &'static [CollectionSpec],
}

impl CollectionSpec {
    pub const fn new(path: &'static str, identity: Identity) -> Self {
        Self {
            path,
            identity,
            children: &[],
        }
    }

    pub const fn with_children(mut self, children: &'static [CollectionSpec]) -> Self {
        self.children = children;
        self
    }

    fn describe(&self) -> &'static str {
        if self.path.is_empty() {
            "config"
        } else {
            self.path
        }
    }

    fn identity_of(&self, entry: &Value) -> ModuleResult<String> {
        let Value::Object(fields) = entry else {
            return Err(ModuleError::InvalidParameter(format!(
                "entries of '{}' must be objects, got {}",
                self.describe(),
                entry
            )));
        };
        let field = |name: &str| -> ModuleResult<String> {
            match fields.get(name) {
                Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                Some(Value::Bool(b)) => Ok(b.to_string()),
                _ => Err(ModuleError::MissingParameter(format!(
                    "'{}' is required for every entry of '{}'",
                    name,
                    self.describe()
                ))),
            }
        };
        match self.identity {
            Identity::Field(name) => field(name),
            Identity::Composite(names) => Ok(names
                .iter()
                .map(|name| field(name))
                .collect::<ModuleResult<Vec<_>>>()?
                .join("_")),
        }
    }

    fn to_dict(&self, collection: Value) -> ModuleResult<Value> {
        let mut keyed = Map::new();
        match collection {
            Value::Array(entries) => {
                for mut entry in entries {
                    let key = self.identity_of(&entry)?;
                    if keyed.contains_key(&key) {
                        return Err(ModuleError::InvalidParameter(format!(
                            "duplicate entry '{}' in '{}'",
                            key,
                            self.describe()
                        )));
                    }
                    normalize_children(&mut entry, self.children)?;
                    keyed.insert(key, entry);
                }
            }
            Value::Object(entries) => {
                for (key, mut entry) in entries {
                    normalize_children(&mut entry, self.children)?;
                    keyed.insert(key, entry);
                }
            }
            other => {
                return Err(ModuleError::InvalidParameter(format!(
                    "'{}' must be a list, got {}",
                    self.describe(),
                    other
                )))
            }
        }
        Ok(Value::Object(keyed))
    }

    fn to_list(&self, collection: Value) -> Value {
        match collection {
            Value::Object(entries) => Value::Array(
                entries
                    .into_iter()
                    .map(|(_, mut entry)| {
                        listify_children(&mut entry, self.children);
                        entry
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

fn normalize_children(entry: &mut Value, specs: &[CollectionSpec]) -> ModuleResult<()> {
    for spec in specs {
        let Some(slot) = get_from_dict_mut(entry, spec.path) else {
            remove_null(entry, spec.path);
            continue;
        };
        let collection = slot.take();
        *slot = spec.to_dict(collection)?;
    }
    Ok(())
}

fn listify_children(entry: &mut Value, specs: &[CollectionSpec]) {
    for spec in specs {
        if let Some(slot) = get_from_dict_mut(entry, spec.path) {
            let collection = slot.take();
            *slot = spec.to_list(collection);
        }
    }
}

/// Drop a collection explicitly set to `null` so it reads as absent.
fn remove_null(entry: &mut Value, path: &str) {
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (get_from_dict_mut(entry, parent), leaf),
        None => (Some(entry), path),
    };
    if let Some(Value::Object(map)) = parent {
        if map.get(leaf).is_some_and(Value::is_null) {
            map.shift_remove(leaf);
        }
    }
}

/// Convert every list-shaped collection in `tree` into an identity-keyed
/// object.
///
/// A spec with an empty path converts `tree` itself. Missing identities
/// and duplicate identities are validation errors.
pub fn list_to_dict(tree: &Value, specs: &[CollectionSpec]) -> ModuleResult<Value> {
    let mut tree = tree.clone();
    for spec in specs {
        if spec.path.is_empty() {
            tree = match tree {
                Value::Null => Value::Object(Map::new()),
                collection => spec.to_dict(collection)?,
            };
        } else {
            normalize_children(&mut tree, std::slice::from_ref(spec))?;
        }
    }
    Ok(tree)
}

/// Inverse of [`list_to_dict`]: present keyed collections as lists again,
/// in key order.
pub fn dict_to_list(tree: &Value, specs: &[CollectionSpec]) -> Value {
    let mut tree = tree.clone();
    for spec in specs {
        if spec.path.is_empty() {
            tree = spec.to_list(tree);
        } else {
            listify_children(&mut tree, std::slice::from_ref(spec));
        }
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const NEIGHBORS: CollectionSpec = CollectionSpec::new("neighbors", Identity::Field("neighbor"));
    const VRF_CHILDREN: &[CollectionSpec] = &[NEIGHBORS];
    const SPECS: &[CollectionSpec] = &[
        CollectionSpec::new("rpki.servers", Identity::Field("name")),
        NEIGHBORS,
        CollectionSpec::new("vrfs", Identity::Field("vrf")).with_children(VRF_CHILDREN),
    ];

    #[test]
    fn test_list_to_dict_nested() {
        let tree = json!({
            "as_number": "65000",
            "rpki": {"servers": [{"name": "s1", "purge_time": 30}]},
            "neighbors": [{"neighbor": "10.0.0.1", "remote_as": "1"}],
            "vrfs": [{"vrf": "blue", "neighbors": [{"neighbor": "10.1.1.1"}]}]
        });
        let keyed = list_to_dict(&tree, SPECS).unwrap();
        assert_eq!(
            keyed,
            json!({
                "as_number": "65000",
                "rpki": {"servers": {"s1": {"name": "s1", "purge_time": 30}}},
                "neighbors": {"10.0.0.1": {"neighbor": "10.0.0.1", "remote_as": "1"}},
                "vrfs": {"blue": {"vrf": "blue", "neighbors": {"10.1.1.1": {"neighbor": "10.1.1.1"}}}}
            })
        );
        assert_eq!(dict_to_list(&keyed, SPECS), tree);
    }

    #[test]
    fn test_list_to_dict_root_collection() {
        let specs = &[CollectionSpec::new("", Identity::Field("name"))];
        let keyed = list_to_dict(&json!([{"name": "Gi0/0/0/0"}, {"name": "Gi0/0/0/1"}]), specs).unwrap();
        let keys: Vec<&String> = keyed.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Gi0/0/0/0", "Gi0/0/0/1"]);
        assert_eq!(list_to_dict(&Value::Null, specs).unwrap(), json!({}));
    }

    #[test]
    fn test_composite_identity() {
        let specs = &[CollectionSpec::new(
            "address_family",
            Identity::Composite(&["afi", "safi"]),
        )];
        let keyed = list_to_dict(
            &json!({"address_family": [{"afi": "ipv4", "safi": "unicast"}]}),
            specs,
        )
        .unwrap();
        assert!(keyed["address_family"].get("ipv4_unicast").is_some());
    }

    #[test]
    fn test_missing_identity() {
        let err = list_to_dict(&json!({"neighbors": [{"remote_as": "1"}]}), SPECS).unwrap_err();
        assert!(matches!(err, ModuleError::MissingParameter(_)));
    }

    #[test]
    fn test_duplicate_identity() {
        let tree = json!({"neighbors": [{"neighbor": "10.0.0.1"}, {"neighbor": "10.0.0.1"}]});
        let err = list_to_dict(&tree, SPECS).unwrap_err();
        assert!(matches!(err, ModuleError::InvalidParameter(_)));
    }

    #[test]
    fn test_null_collection_is_absent() {
        let keyed = list_to_dict(&json!({"as_number": "1", "neighbors": null}), SPECS).unwrap();
        assert_eq!(keyed, json!({"as_number": "1"}));
    }

    #[test]
    fn test_already_keyed_is_accepted() {
        let tree = json!({"vrfs": {"blue": {"vrf": "blue", "neighbors": [{"neighbor": "1.1.1.1"}]}}});
        let keyed = list_to_dict(&tree, SPECS).unwrap();
        assert_eq!(keyed["vrfs"]["blue"]["neighbors"]["1.1.1.1"], json!({"neighbor": "1.1.1.1"}));
    }
}

//! Directory operation types
//!
//! Entries, attribute sets, search filters, scopes and modifications exchanged
//! with a [`DirectorySession`](crate::traits::DirectorySession).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Multi-valued attributes of a directory entry.
///
/// Attribute names are matched case-insensitively (RFC 4512) but stored with
/// the casing they were first set with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    attributes: BTreeMap<String, Vec<String>>,
}

impl AttributeSet {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all values of an attribute, replacing previous values.
    pub fn set_values<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.key_of(&name) {
            Some(existing) => {
                self.attributes.insert(existing, values);
            }
            None => {
                self.attributes.insert(name, values);
            }
        }
    }

    /// Set a single-valued attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.set_values(name, [value]);
    }

    /// Builder form of [`AttributeSet::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`AttributeSet::set_values`].
    pub fn with_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.set_values(name, values);
        self
    }

    /// Get all values of an attribute.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Get the first value of an attribute.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Check whether the attribute is present with at least one value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Remove an attribute, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.key_of(name)?;
        self.attributes.remove(&key)
    }

    /// Get a mutable handle on the values of an attribute, if present.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Iterate over attribute names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the set holds no attribute.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over `(name, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.attributes.iter()
    }

    fn key_of(&self, name: &str) -> Option<String> {
        self.attributes
            .keys()
            .find(|k| k.eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for (name, value) in iter {
            let name = name.into();
            let value = value.into();
            match set.get_mut(&name) {
                Some(values) => values.push(value),
                None => set.set(name, value),
            }
        }
        set
    }
}

/// A directory entry returned by a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Distinguished name of the entry.
    pub dn: String,

    /// Returned attributes.
    pub attributes: AttributeSet,
}

impl Entry {
    /// Create an entry.
    pub fn new(dn: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            dn: dn.into(),
            attributes,
        }
    }

    /// First value of an attribute.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.attributes.first(name)
    }

    /// All values of an attribute; empty when absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes.get(name).unwrap_or(&[])
    }
}

/// Search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only the base entry itself.
    Base,
    /// Immediate children of the base.
    OneLevel,
    /// The base and all its descendants.
    Subtree,
}

/// Filter for search operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Match entries where attribute equals value.
    Equals { attribute: String, value: String },

    /// Match entries where attribute exists (has any value).
    Present { attribute: String },

    /// Logical AND of multiple filters.
    And { filters: Vec<Filter> },

    /// Logical OR of multiple filters.
    Or { filters: Vec<Filter> },

    /// Logical NOT of a filter.
    Not { filter: Box<Filter> },
}

impl Filter {
    /// Create an equals filter.
    pub fn eq(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a present (attribute exists) filter.
    pub fn present(attribute: impl Into<String>) -> Self {
        Filter::Present {
            attribute: attribute.into(),
        }
    }

    /// Filter matching every entry: `(objectClass=*)`.
    pub fn any() -> Self {
        Filter::present("objectClass")
    }

    /// Create an AND filter.
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    /// Create an OR filter.
    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }

    /// Create a NOT filter (negation).
    pub fn negate(filter: Filter) -> Self {
        Filter::Not {
            filter: Box::new(filter),
        }
    }
}

/// Kind of change applied to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationOp {
    /// Add values to the attribute.
    Add,
    /// Delete the listed values (or the whole attribute when no value is listed).
    Delete,
    /// Replace all values of the attribute.
    Replace,
}

/// A single attribute change within a modify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub op: ModificationOp,
    pub attribute: String,
    pub values: Vec<String>,
}

impl Modification {
    fn new<I, V>(op: ModificationOp, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            op,
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Add values to an attribute.
    pub fn add<I, V>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(ModificationOp::Add, attribute, values)
    }

    /// Delete values from an attribute.
    pub fn delete<I, V>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(ModificationOp::Delete, attribute, values)
    }

    /// Replace all values of an attribute.
    pub fn replace<I, V>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(ModificationOp::Replace, attribute, values)
    }
}

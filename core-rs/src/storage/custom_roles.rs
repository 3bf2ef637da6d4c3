//! Custom role mapping
//!
//! Operator-defined roles, each with its own unlock code. Entries keep the
//! order they were first inserted; code matching walks them in that order, so
//! when two custom roles share a code the earlier entry wins.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered mapping of role name to unlock code
///
/// Serialized as a plain JSON object (`{"betaTester":"123456"}`) with key order
/// preserved in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomRoles {
    entries: Vec<(String, String)>,
}

impl CustomRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping shipped with a fresh install
    pub fn seed() -> Self {
        let mut roles = CustomRoles::new();
        roles.insert("betaTester", "123456");
        roles.insert("partner", "654321");
        roles
    }

    /// Insert or overwrite a role's code
    ///
    /// An existing role keeps its position; a new role is appended.
    pub fn insert(&mut self, role: impl Into<String>, code: impl Into<String>) {
        let role = role.into();
        let code = code.into();
        match self.entries.iter_mut().find(|(name, _)| *name == role) {
            Some(entry) => entry.1 = code,
            None => self.entries.push((role, code)),
        }
    }

    /// Remove a role, returning its code. Missing roles are ignored.
    pub fn remove(&mut self, role: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == role)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, role: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, code)| code.as_str())
    }

    pub fn contains(&self, role: &str) -> bool {
        self.get(role).is_some()
    }

    /// First role (in insertion order) whose code equals `code`
    pub fn role_for_code(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, role_code)| role_code == code)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Union with `other`; entries in `other` overwrite same-named entries here
    pub fn merged(&self, other: &CustomRoles) -> CustomRoles {
        let mut merged = self.clone();
        for (name, code) in other.iter() {
            merged.insert(name, code);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomRoles {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut roles = CustomRoles::new();
        for (name, code) in iter {
            roles.insert(name, code);
        }
        roles
    }
}

impl Serialize for CustomRoles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, code) in &self.entries {
            map.serialize_entry(name, code)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CustomRoles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CustomRolesVisitor;

        impl<'de> Visitor<'de> for CustomRolesVisitor {
            type Value = CustomRoles;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of role name to unlock code")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut roles = CustomRoles::new();
                while let Some((name, code)) = access.next_entry::<String, String>()? {
                    roles.insert(name, code);
                }
                Ok(roles)
            }
        }

        deserializer.deserialize_map(CustomRolesVisitor)
    }
}

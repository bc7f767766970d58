//! Identifier type shared by the tree and the runtime namespaces.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// An identifier.
///
/// Reference counted so that namespaces, attribute maps and the syntax tree
/// can share one allocation per identifier. Equality and hashing are by
/// content, and `Borrow<str>` lets maps keyed by `Name` be queried with `&str`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Rc<str>);

impl Name {
    pub fn new(text: &str) -> Self {
        Name(Rc::from(text))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the form `__x__` are reserved for runtime slots.
    pub fn is_dunder(&self) -> bool {
        self.0.len() > 4 && self.0.starts_with("__") && self.0.ends_with("__")
    }
}

impl Deref for Name {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Name {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Name(Rc::from(text))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "cache")]
impl serde::Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "cache")]
impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize>::deserialize(deserializer).map(Name::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equality_is_by_content() {
        assert_eq!(Name::new("area"), Name::from(String::from("area")));
        assert_ne!(Name::new("area"), Name::new("Area"));
    }

    #[test]
    fn maps_can_be_queried_by_str() {
        let mut map = HashMap::new();
        map.insert(Name::new("x"), 1);
        assert_eq!(map.get("x"), Some(&1));
        assert_eq!(map.get("y"), None);
    }

    #[test]
    fn dunder_detection() {
        assert!(Name::new("__doc__").is_dunder());
        assert!(Name::new("__reload_update__").is_dunder());
        assert!(!Name::new("____").is_dunder());
        assert!(!Name::new("_private").is_dunder());
    }
}

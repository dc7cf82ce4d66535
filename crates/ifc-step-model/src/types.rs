// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared by the codec, the entity graph and schema types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance name (e.g., #123 becomes EntityId(123))
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Three-valued EXPRESS LOGICAL
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logical {
    True,
    False,
    Unknown,
}

impl Logical {
    /// STEP token letter (`T`, `F`, `U`)
    pub fn letter(self) -> char {
        match self {
            Logical::True => 'T',
            Logical::False => 'F',
            Logical::Unknown => 'U',
        }
    }

    /// `None` for `Unknown`
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Logical::True => Some(true),
            Logical::False => Some(false),
            Logical::Unknown => None,
        }
    }
}

impl From<bool> for Logical {
    fn from(value: bool) -> Self {
        if value {
            Logical::True
        } else {
            Logical::False
        }
    }
}

/// A field value that keeps `$` and `*` apart
///
/// Most schema fields collapse both sentinels into `None`. Fields that must
/// round-trip the difference use this instead.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum Decoded<T> {
    /// Explicit null (`$`)
    #[default]
    Null,
    /// Derived, value computed elsewhere (`*`)
    Derived,
    /// Present value
    Value(T),
}

impl<T> Decoded<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Decoded::Null)
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Decoded::Derived)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Reflected attribute value
///
/// The value handle produced by attribute enumeration. It mirrors the STEP
/// lexeme structure so that printers and diff tools need no schema knowledge.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null value ($) or absent optional attribute
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Boolean value
    Bool(bool),
    /// Logical value including unknown
    Logical(Logical),
    /// Integer value
    Integer(i64),
    /// Real value
    Real(f64),
    /// Decoded string value
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Select-wrapped value like IFCLABEL('text')
    Typed(String, Box<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            AttributeValue::Typed(_, inner) => inner.as_entity_ref(),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Typed(_, inner) => inner.as_string(),
            _ => None,
        }
    }

    /// Try to get as real (integers widen)
    pub fn as_real(&self) -> Option<f64> {
        match self {
            AttributeValue::Real(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Typed(_, inner) => inner.as_real(),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::Typed(_, inner) => inner.as_integer(),
            _ => None,
        }
    }

    /// Try to get as enum
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Entity ids held by this value, in order, nested lists flattened
    pub fn entity_refs(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs(&self, out: &mut Vec<EntityId>) {
        match self {
            AttributeValue::EntityRef(id) => out.push(*id),
            AttributeValue::List(items) => items.iter().for_each(|item| item.collect_refs(out)),
            AttributeValue::Typed(_, inner) => inner.collect_refs(out),
            _ => {}
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if value is derived
    pub fn is_derived(&self) -> bool {
        matches!(self, AttributeValue::Derived)
    }
}

/// Ordered `(name, value)` pairs produced by attribute reflection
pub type AttributeList = Vec<(&'static str, AttributeValue)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId(42).to_string(), "#42");
        assert!(EntityId(3) < EntityId(10));
    }

    #[test]
    fn test_logical_from_bool() {
        assert_eq!(Logical::from(true), Logical::True);
        assert_eq!(Logical::Unknown.as_bool(), None);
        assert_eq!(Logical::False.letter(), 'F');
    }

    #[test]
    fn test_decoded_keeps_sentinels_apart() {
        let null: Decoded<i64> = Decoded::Null;
        let derived: Decoded<i64> = Decoded::Derived;
        assert_ne!(null, derived);
        assert!(null.is_null());
        assert!(derived.is_derived());
        assert_eq!(Decoded::Value(3).into_option(), Some(3));
    }

    #[test]
    fn test_entity_refs_flatten() {
        let value = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(1)),
            AttributeValue::Null,
            AttributeValue::List(vec![AttributeValue::EntityRef(EntityId(7))]),
        ]);
        assert_eq!(value.entity_refs(), vec![EntityId(1), EntityId(7)]);
    }

    #[test]
    fn test_typed_accessors_unwrap() {
        let value = AttributeValue::Typed(
            "IFCLABEL".into(),
            Box::new(AttributeValue::String("Foo".into())),
        );
        assert_eq!(value.as_string(), Some("Foo"));
        assert_eq!(value.as_enum(), None);
    }
}

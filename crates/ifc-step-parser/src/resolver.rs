// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity reference resolution
//!
//! References are checked against the id → kind table of the current load.
//! A typed reference also checks that the target is of the declared kind.

use crate::tokenizer::Token;
use crate::value::{decode_value, StepValue};
use ifc_step_model::{AttributeValue, EntityId, EntityKind, EntityLookup, Result, StepError};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// What to do with a reference to an id that no record defines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// `MissingReference` fails the field
    Strict,
    /// Optional fields become "no reference" and the id is recorded
    #[default]
    Lenient,
}

/// Lookup with no entities, for decoding plain values
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyLookup;

impl EntityLookup for EmptyLookup {
    fn kind_of(&self, _id: EntityId) -> Option<EntityKind> {
        None
    }
}

/// Per-load decoding state shared by every field decoder
pub struct ReadContext<'a> {
    lookup: &'a dyn EntityLookup,
    policy: ReferencePolicy,
    unresolved: RefCell<Vec<EntityId>>,
}

impl<'a> ReadContext<'a> {
    pub fn new(lookup: &'a dyn EntityLookup, policy: ReferencePolicy) -> Self {
        Self {
            lookup,
            policy,
            unresolved: RefCell::new(Vec::new()),
        }
    }

    /// Context that fails on any missing reference
    pub fn strict(lookup: &'a dyn EntityLookup) -> Self {
        Self::new(lookup, ReferencePolicy::Strict)
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    pub fn is_lenient(&self) -> bool {
        self.policy == ReferencePolicy::Lenient
    }

    /// Kind of the referenced entity, or `MissingReference`
    pub fn resolve(&self, id: EntityId) -> Result<EntityKind> {
        self.lookup.kind_of(id).ok_or_else(|| StepError::missing(id))
    }

    pub(crate) fn record_unresolved(&self, id: EntityId) {
        self.unresolved.borrow_mut().push(id);
    }

    pub(crate) fn take_unresolved(&self) -> Vec<EntityId> {
        std::mem::take(&mut *self.unresolved.borrow_mut())
    }
}

/// Schema type that can be the target of a typed reference
pub trait EntityType: 'static {
    const KIND: EntityKind;
}

/// Reference to an entity of kind `T` or one of its subtypes
pub struct EntityRef<T> {
    id: EntityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityRef<T> {
    /// Wrap an id without checking its kind
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }
}

impl<T> Clone for EntityRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityRef<T> {}

impl<T> PartialEq for EntityRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityRef<T> {}

impl<T> Hash for EntityRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({})", self.id)
    }
}

impl<T> From<EntityId> for EntityRef<T> {
    fn from(id: EntityId) -> Self {
        Self::new(id)
    }
}

/// Resolve a reference token and return its id and kind
pub fn resolve_token(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<(EntityId, EntityKind)> {
    match token {
        Token::EntityRef(raw) => {
            let id = EntityId(*raw);
            Ok((id, ctx.resolve(id)?))
        }
        other => Err(StepError::malformed(format!(
            "expected entity reference, found {}",
            other.describe()
        ))),
    }
}

impl<T: EntityType> StepValue for EntityRef<T> {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        let (id, kind) = resolve_token(token, ctx)?;
        if !kind.is_a(T::KIND) {
            return Err(StepError::malformed(format!(
                "{id} is {kind}, expected {}",
                T::KIND
            )));
        }
        Ok(Self::new(id))
    }

    fn encode(&self, out: &mut String) {
        self.id.encode(out);
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::EntityRef(self.id)
    }
}

/// Untyped reference, only checked for existence
impl StepValue for EntityId {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        resolve_token(token, ctx).map(|(id, _)| id)
    }

    fn encode(&self, out: &mut String) {
        out.push('#');
        out.push_str(&self.0.to_string());
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::EntityRef(*self)
    }
}

/// Resolve a single reference lexeme: `#5`, `$` or `*`
///
/// # Example
///
/// ```
/// use ifc_step_model::{EntityId, EntityKind};
/// use ifc_step_parser::resolve_reference;
/// use std::collections::HashMap;
///
/// let map = HashMap::from([(EntityId(5), EntityKind::IfcMaterial)]);
/// assert_eq!(resolve_reference("#5", &map).unwrap(), Some(EntityId(5)));
/// assert_eq!(resolve_reference("$", &map).unwrap(), None);
/// assert!(resolve_reference("#9", &map).is_err());
/// ```
pub fn resolve_reference(text: &str, lookup: &dyn EntityLookup) -> Result<Option<EntityId>> {
    decode_value(text, lookup)
}

/// Resolve a reference list, keeping null slots in place
pub fn resolve_reference_list(
    text: &str,
    lookup: &dyn EntityLookup,
) -> Result<Vec<Option<EntityId>>> {
    decode_value(text, lookup)
}

/// Resolve a list of reference lists
pub fn resolve_reference_list_2d(
    text: &str,
    lookup: &dyn EntityLookup,
) -> Result<Vec<Vec<Option<EntityId>>>> {
    decode_value(text, lookup)
}

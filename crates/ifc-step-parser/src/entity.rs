// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity layers and the object-safe entity interface
//!
//! A schema entity is a chain of layers, one struct per EXPRESS supertype,
//! each holding its base layer in a `base` field. Every [`EntityLayer`]
//! method first delegates to the base layer and then handles the layer's
//! own attributes, so inherited attributes are read, written, reflected and
//! linked exactly once and in declaration order.

use crate::arguments::{ArgumentReader, ArgumentWriter};
use crate::value::StepValue;
use ifc_step_model::{AttributeList, AttributeValue, EntityId, EntityKind, InverseRole, Result};
use std::any::Any;
use std::fmt;

/// Non-owning back-references held by the target of a relationship
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InverseSlot {
    /// Inverse attribute of cardinality [0:1]
    Single(Option<EntityId>),
    /// Inverse SET of referencing entities
    Set(Vec<EntityId>),
}

impl Default for InverseSlot {
    fn default() -> Self {
        InverseSlot::Set(Vec::new())
    }
}

impl InverseSlot {
    /// Empty slot shaped for a role
    pub fn for_role(role: InverseRole) -> Self {
        if role.is_single() {
            InverseSlot::Single(None)
        } else {
            InverseSlot::Set(Vec::new())
        }
    }

    /// Add a back-reference; a no-op if already present
    pub fn insert(&mut self, id: EntityId) -> bool {
        match self {
            InverseSlot::Single(slot) => {
                let changed = *slot != Some(id);
                *slot = Some(id);
                changed
            }
            InverseSlot::Set(ids) => {
                if ids.contains(&id) {
                    false
                } else {
                    ids.push(id);
                    true
                }
            }
        }
    }

    /// Remove the back-reference to `id`
    ///
    /// A single slot is only reset when it names `id`.
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self {
            InverseSlot::Single(slot) => {
                if *slot == Some(id) {
                    *slot = None;
                    true
                } else {
                    false
                }
            }
            InverseSlot::Set(ids) => {
                let before = ids.len();
                ids.retain(|existing| *existing != id);
                ids.len() != before
            }
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids().contains(&id)
    }

    pub fn ids(&self) -> &[EntityId] {
        match self {
            InverseSlot::Single(slot) => slot.as_slice(),
            InverseSlot::Set(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    pub fn clear(&mut self) {
        match self {
            InverseSlot::Single(slot) => *slot = None,
            InverseSlot::Set(ids) => ids.clear(),
        }
    }

    /// Reflection handle: a reference for single slots, a list for sets
    pub fn to_attribute(&self) -> AttributeValue {
        match self {
            InverseSlot::Single(slot) => slot.map(AttributeValue::EntityRef).unwrap_or_default(),
            InverseSlot::Set(ids) => {
                AttributeValue::List(ids.iter().copied().map(AttributeValue::EntityRef).collect())
            }
        }
    }
}

/// A populated forward reference that takes part in an inverse relationship
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForwardLink {
    pub role: InverseRole,
    pub target: EntityId,
}

impl ForwardLink {
    pub fn new(role: InverseRole, target: EntityId) -> Self {
        Self { role, target }
    }
}

/// One inheritance layer of a schema entity
///
/// Implementations call the base layer first, then handle their own
/// attributes in declaration order. Layers without own attributes delegate
/// everything with [`impl_passthrough_layer!`](crate::impl_passthrough_layer).
pub trait EntityLayer {
    /// Read this layer's attributes (after the base layer's)
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()>;

    /// Write this layer's attributes (after the base layer's)
    fn write_arguments(&self, args: &mut ArgumentWriter<'_>);

    /// Append `(name, value)` pairs for explicit attributes
    fn attributes(&self, out: &mut AttributeList);

    /// Append `(name_inverse, value)` pairs for non-empty inverse slots
    fn inverse_attributes(&self, _out: &mut AttributeList) {}

    /// Populated forward references with an inverse counterpart
    fn forward_links(&self, _out: &mut Vec<ForwardLink>) {}

    /// Inverse slot for a role declared on this layer or a base layer
    fn inverse_slot(&self, _role: InverseRole) -> Option<&InverseSlot> {
        None
    }

    fn inverse_slot_mut(&mut self, _role: InverseRole) -> Option<&mut InverseSlot> {
        None
    }

    /// Rewrite every forward reference through `remap`
    fn remap_references(&mut self, _remap: &dyn Fn(EntityId) -> EntityId) {}
}

/// Object-safe interface of a concrete entity
///
/// The id is fixed at construction; copies get a new id through
/// [`clone_with_id`](StepEntity::clone_with_id).
pub trait StepEntity: EntityLayer + fmt::Debug + Send + Sync + 'static {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// Copy of this entity's forward attributes under a new id
    fn clone_with_id(&self, id: EntityId) -> Box<dyn StepEntity>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn StepEntity {
    pub fn downcast_ref<T: StepEntity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: StepEntity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Explicit attributes, inherited ones first
    pub fn attribute_list(&self) -> AttributeList {
        let mut out = AttributeList::new();
        self.attributes(&mut out);
        out
    }

    /// Non-empty inverse slots, inherited ones first
    pub fn inverse_attribute_list(&self) -> AttributeList {
        let mut out = AttributeList::new();
        self.inverse_attributes(&mut out);
        out
    }

    pub fn forward_link_list(&self) -> Vec<ForwardLink> {
        let mut out = Vec::new();
        self.forward_links(&mut out);
        out
    }

    /// Empty every inverse slot this entity carries
    pub fn clear_inverse_slots(&mut self) {
        for role in self.kind().inverse_roles() {
            if let Some(slot) = self.inverse_slot_mut(role) {
                slot.clear();
            }
        }
    }
}

/// Creates empty entities for record type names
pub trait EntityFactory {
    /// `None` for abstract kinds or kinds the factory does not know
    fn create(&self, kind: EntityKind, id: EntityId) -> Option<Box<dyn StepEntity>>;
}

/// Reflect one explicit attribute; empty collections are left out
pub fn reflect<T: StepValue>(out: &mut AttributeList, name: &'static str, value: &T) {
    if !value.is_empty_collection() {
        out.push((name, value.to_attribute()));
    }
}

/// Reflect one inverse slot; empty slots are left out
pub fn reflect_inverse(out: &mut AttributeList, role: InverseRole, slot: &InverseSlot) {
    if !slot.is_empty() {
        out.push((role.slot_name(), slot.to_attribute()));
    }
}

/// Delegate every [`EntityLayer`] method to `self.base`
///
/// For abstract supertypes that declare no attributes of their own.
#[macro_export]
macro_rules! impl_passthrough_layer {
    ($layer:ty) => {
        impl $crate::EntityLayer for $layer {
            fn read_arguments(
                &mut self,
                args: &mut $crate::ArgumentReader<'_>,
            ) -> $crate::model::Result<()> {
                $crate::EntityLayer::read_arguments(&mut self.base, args)
            }

            fn write_arguments(&self, args: &mut $crate::ArgumentWriter<'_>) {
                $crate::EntityLayer::write_arguments(&self.base, args)
            }

            fn attributes(&self, out: &mut $crate::model::AttributeList) {
                $crate::EntityLayer::attributes(&self.base, out)
            }

            fn inverse_attributes(&self, out: &mut $crate::model::AttributeList) {
                $crate::EntityLayer::inverse_attributes(&self.base, out)
            }

            fn forward_links(&self, out: &mut ::std::vec::Vec<$crate::ForwardLink>) {
                $crate::EntityLayer::forward_links(&self.base, out)
            }

            fn inverse_slot(
                &self,
                role: $crate::model::InverseRole,
            ) -> ::std::option::Option<&$crate::InverseSlot> {
                $crate::EntityLayer::inverse_slot(&self.base, role)
            }

            fn inverse_slot_mut(
                &mut self,
                role: $crate::model::InverseRole,
            ) -> ::std::option::Option<&mut $crate::InverseSlot> {
                $crate::EntityLayer::inverse_slot_mut(&mut self.base, role)
            }

            fn remap_references(
                &mut self,
                remap: &dyn Fn($crate::model::EntityId) -> $crate::model::EntityId,
            ) {
                $crate::EntityLayer::remap_references(&mut self.base, remap)
            }
        }
    };
}

/// Implement [`EntityType`](crate::EntityType) for a layer
#[macro_export]
macro_rules! impl_entity_type {
    ($layer:ty, $kind:ident) => {
        impl $crate::EntityType for $layer {
            const KIND: $crate::model::EntityKind = $crate::model::EntityKind::$kind;
        }
    };
}

/// Implement [`EntityType`](crate::EntityType) and [`StepEntity`] for a
/// concrete entity struct with an `id: EntityId` field
#[macro_export]
macro_rules! impl_step_entity {
    ($entity:ty, $kind:ident) => {
        $crate::impl_entity_type!($entity, $kind);

        impl $entity {
            pub fn new(id: $crate::model::EntityId) -> Self {
                Self {
                    id,
                    ..::std::default::Default::default()
                }
            }
        }

        impl $crate::StepEntity for $entity {
            fn id(&self) -> $crate::model::EntityId {
                self.id
            }

            fn kind(&self) -> $crate::model::EntityKind {
                $crate::model::EntityKind::$kind
            }

            fn clone_with_id(
                &self,
                id: $crate::model::EntityId,
            ) -> ::std::boxed::Box<dyn $crate::StepEntity> {
                let mut copy = self.clone();
                copy.id = id;
                ::std::boxed::Box::new(copy)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

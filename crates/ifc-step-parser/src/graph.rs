// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph and inverse-link maintenance
//!
//! The graph owns every entity. Forward references and inverse slots are
//! plain ids, so a removed entity leaves ids that simply stop resolving.
//!
//! Linking pushes a back-reference to an entity into the inverse slot of
//! every target it references; unlinking removes them again by id. Both
//! are idempotent.

use crate::entity::{EntityLayer, ForwardLink, StepEntity};
use crate::writer::StepWriter;
use ifc_step_model::{
    AttributeList, AttributeValue, EntityId, EntityKind, EntityLookup, Result, StepError,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Options for [`EntityGraph::copy_entity`]
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyOptions {
    /// Also copy every entity reachable through forward references
    pub deep: bool,
}

impl CopyOptions {
    pub fn shallow() -> Self {
        Self { deep: false }
    }

    pub fn deep() -> Self {
        Self { deep: true }
    }
}

/// Arena of entities keyed by id
#[derive(Debug, Default)]
pub struct EntityGraph {
    entities: FxHashMap<EntityId, Box<dyn StepEntity>>,
    max_id: u32,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Add an entity; its id must be unused
    ///
    /// The entity is not linked; call
    /// [`set_inverse_counterparts`](Self::set_inverse_counterparts) once its
    /// targets are in the graph.
    pub fn insert(&mut self, entity: Box<dyn StepEntity>) -> Result<EntityId> {
        let id = entity.id();
        if id.0 == 0 {
            return Err(StepError::format("entity id must be positive"));
        }
        if self.entities.contains_key(&id) {
            return Err(StepError::DuplicateEntity(id));
        }
        self.max_id = self.max_id.max(id.0);
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Smallest id above every id in use
    pub fn next_unused_id(&self) -> EntityId {
        EntityId(self.max_id + 1)
    }

    /// Build an entity under the next unused id, insert and link it
    pub fn insert_with_next_id(
        &mut self,
        build: impl FnOnce(EntityId) -> Box<dyn StepEntity>,
    ) -> Result<EntityId> {
        let entity = build(self.next_unused_id());
        let id = self.insert(entity)?;
        self.set_inverse_counterparts(id)?;
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn StepEntity> {
        self.entities.get(&id).map(|entity| entity.as_ref())
    }

    pub fn get_as<T: StepEntity>(&self, id: EntityId) -> Option<&T> {
        self.get(id)?.downcast_ref::<T>()
    }

    /// All ids in ascending order
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Entities in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &dyn StepEntity> + '_ {
        self.ids().into_iter().filter_map(move |id| self.get(id))
    }

    /// Ids of all entities of a kind or its subtypes, ascending
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.kind().is_a(kind))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn links_of(&self, id: EntityId) -> Result<(EntityKind, Vec<ForwardLink>)> {
        let entity = self
            .entities
            .get(&id)
            .ok_or_else(|| StepError::missing(id))?;
        let kind = entity.kind();
        let links = entity.forward_link_list();
        for link in &links {
            if !kind.is_a(link.role.source_kind()) {
                return Err(StepError::invariant(format!(
                    "{id}={kind} cannot hold forward role {}, declared on {}",
                    link.role,
                    link.role.source_kind()
                )));
            }
        }
        Ok((kind, links))
    }

    /// Push a back-reference to `id` into every target it references
    ///
    /// Targets missing from the graph are skipped. A target without the
    /// role's inverse slot is an [`StepError::InvariantViolation`].
    pub fn set_inverse_counterparts(&mut self, id: EntityId) -> Result<()> {
        let (kind, links) = self.links_of(id)?;
        for link in links {
            let Some(target) = self.entities.get_mut(&link.target) else {
                log::debug!("{id}={kind}: skipping dangling link to {}", link.target);
                continue;
            };
            let target_kind = target.kind();
            let slot = target.inverse_slot_mut(link.role).ok_or_else(|| {
                StepError::invariant(format!(
                    "{}={target_kind} has no inverse slot {} for {id}={kind}",
                    link.target, link.role
                ))
            })?;
            slot.insert(id);
        }
        Ok(())
    }

    /// Remove every back-reference to `id` from the entities it references
    ///
    /// Calling it on an entity that is not linked does nothing.
    pub fn unlink(&mut self, id: EntityId) -> Result<()> {
        let (kind, links) = self.links_of(id)?;
        for link in links {
            let Some(target) = self.entities.get_mut(&link.target) else {
                log::debug!("{id}={kind}: skipping dangling link to {}", link.target);
                continue;
            };
            let target_kind = target.kind();
            let slot = target.inverse_slot_mut(link.role).ok_or_else(|| {
                StepError::invariant(format!(
                    "{}={target_kind} has no inverse slot {} for {id}={kind}",
                    link.target, link.role
                ))
            })?;
            slot.remove(id);
        }
        Ok(())
    }

    /// Link every entity
    pub fn resolve_inverse_attributes(&mut self) -> Result<()> {
        for id in self.ids() {
            self.set_inverse_counterparts(id)?;
        }
        Ok(())
    }

    /// Empty every inverse slot in the graph
    pub fn unset_inverse_attributes(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_inverse_slots();
        }
    }

    /// Unlink and take an entity out of the graph
    ///
    /// Forward references other entities hold to it are left in place and
    /// no longer resolve.
    pub fn remove(&mut self, id: EntityId) -> Result<Option<Box<dyn StepEntity>>> {
        if !self.entities.contains_key(&id) {
            return Ok(None);
        }
        self.unlink(id)?;
        Ok(self.entities.remove(&id))
    }

    /// Change an entity's forward attributes, keeping inverse slots in sync
    ///
    /// The entity is unlinked, `f` runs, and the entity is linked again.
    pub fn modify<T, R>(&mut self, id: EntityId, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: StepEntity,
    {
        self.unlink(id)?;
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or_else(|| StepError::missing(id))?;
        let kind = entity.kind();
        let result = match entity.downcast_mut::<T>() {
            Some(typed) => Ok(f(typed)),
            None => Err(StepError::invariant(format!(
                "{id}={kind} is not a {}",
                std::any::type_name::<T>()
            ))),
        };
        self.set_inverse_counterparts(id)?;
        result
    }

    /// Explicit attributes of an entity
    pub fn attributes(&self, id: EntityId) -> Option<AttributeList> {
        self.get(id).map(|entity| entity.attribute_list())
    }

    /// Inverse attributes of an entity, without back-references to
    /// entities that are no longer in the graph
    pub fn inverse_attributes(&self, id: EntityId) -> Option<AttributeList> {
        let entity = self.get(id)?;
        let live = |value: &AttributeValue| match value {
            AttributeValue::EntityRef(target) => self.contains(*target),
            _ => true,
        };
        let attributes = entity
            .inverse_attribute_list()
            .into_iter()
            .filter_map(|(name, value)| match value {
                AttributeValue::List(items) => {
                    let items: Vec<AttributeValue> = items.into_iter().filter(live).collect();
                    (!items.is_empty()).then_some((name, AttributeValue::List(items)))
                }
                single => live(&single).then_some((name, single)),
            })
            .collect();
        Some(attributes)
    }

    /// Every entity reachable from `id` through forward references,
    /// excluding `id` itself, in breadth-first order
    pub fn collect_dependencies(&self, id: EntityId) -> Vec<EntityId> {
        let mut seen: FxHashSet<EntityId> = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([id]);
        seen.insert(id);

        while let Some(current) = queue.pop_front() {
            let Some(entity) = self.get(current) else {
                continue;
            };
            for (_, value) in entity.attribute_list() {
                for target in value.entity_refs() {
                    if self.contains(target) && seen.insert(target) {
                        order.push(target);
                        queue.push_back(target);
                    }
                }
            }
        }

        order
    }

    /// Copy an entity under a fresh id and link the copy
    ///
    /// A deep copy also copies every dependency and points the copies at
    /// each other. Inverse slots of copies start empty.
    pub fn copy_entity(&mut self, id: EntityId, options: CopyOptions) -> Result<EntityId> {
        if !self.contains(id) {
            return Err(StepError::missing(id));
        }

        let mut sources = vec![id];
        if options.deep {
            sources.extend(self.collect_dependencies(id));
        }

        let mut remap: FxHashMap<EntityId, EntityId> = FxHashMap::default();
        let mut next = self.next_unused_id().0;
        for source in &sources {
            remap.insert(*source, EntityId(next));
            next += 1;
        }

        let mut copies = Vec::with_capacity(sources.len());
        for source in &sources {
            let Some(entity) = self.get(*source) else {
                continue;
            };
            let new_id = remap[source];
            let mut copy = entity.clone_with_id(new_id);
            copy.clear_inverse_slots();
            if options.deep {
                copy.remap_references(&|old| remap.get(&old).copied().unwrap_or(old));
            }
            copies.push(copy);
        }

        let mut inserted = Vec::with_capacity(copies.len());
        for copy in copies {
            inserted.push(self.insert(copy)?);
        }
        for copy_id in &inserted {
            self.set_inverse_counterparts(*copy_id)?;
        }

        log::debug!(
            "copied {id} as {} ({} entities)",
            remap[&id],
            inserted.len()
        );
        Ok(remap[&id])
    }

    /// Render every record as STEP text, ascending by id
    pub fn to_step(&self) -> String {
        StepWriter::new().write_graph(self)
    }
}

impl EntityLookup for EntityGraph {
    fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(|entity| entity.kind())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits shared between the codec and its callers

use crate::{EntityId, EntityKind};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Progress callback type for loading operations
pub type ProgressCallback = Box<dyn Fn(&str, f32) + Send>;

/// Id → kind lookup used while decoding references
///
/// During a load this is the table of every record seen in the file. It is
/// built fresh for each load and only read while records are decoded.
///
/// # Example
///
/// ```
/// use ifc_step_model::{EntityId, EntityKind, EntityLookup};
/// use std::collections::HashMap;
///
/// let mut map = HashMap::new();
/// map.insert(EntityId(5), EntityKind::IfcClassification);
/// assert_eq!(map.kind_of(EntityId(5)), Some(EntityKind::IfcClassification));
/// assert!(!map.contains(EntityId(9)));
/// ```
pub trait EntityLookup {
    /// Kind of the entity with this id, if any
    fn kind_of(&self, id: EntityId) -> Option<EntityKind>;

    /// Check if the id is known
    fn contains(&self, id: EntityId) -> bool {
        self.kind_of(id).is_some()
    }
}

impl<S: BuildHasher> EntityLookup for HashMap<EntityId, EntityKind, S> {
    fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.get(&id).copied()
    }
}

impl<T: EntityLookup + ?Sized> EntityLookup for &T {
    fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        (**self).kind_of(id)
    }
}

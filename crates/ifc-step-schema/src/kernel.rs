// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rooted entities: property sets and association relationships

use crate::property::IfcProperty;
use crate::selects::{IfcClassificationSelect, IfcDefinitionSelect, IfcMaterialSelect};
use crate::types::*;
use ifc_step_model::{AttributeList, EntityId, InverseRole, Result};
use ifc_step_parser::{
    impl_entity_type, impl_passthrough_layer, impl_step_entity, reflect, reflect_inverse,
    ArgumentReader, ArgumentWriter, EntityLayer, EntityRef, ForwardLink, InverseSlot,
};

// ============================================================================
// IfcRoot (abstract)
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcRoot {
    pub global_id: Option<IfcGloballyUniqueId>,
    /// Owner history record; not part of this schema slice, kept by id
    pub owner_history: Option<EntityId>,
    pub name: Option<IfcLabel>,
    pub description: Option<IfcText>,
}

impl_entity_type!(IfcRoot, IfcRoot);

impl EntityLayer for IfcRoot {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.global_id = args.read("GlobalId")?;
        self.owner_history = args.read("OwnerHistory")?;
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write(&self.global_id);
        args.write(&self.owner_history);
        args.write(&self.name);
        args.write(&self.description);
    }

    fn attributes(&self, out: &mut AttributeList) {
        reflect(out, "GlobalId", &self.global_id);
        reflect(out, "OwnerHistory", &self.owner_history);
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.owner_history = self.owner_history.map(remap);
    }
}

// ============================================================================
// Property definitions
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcPropertyDefinition {
    pub base: IfcRoot,
    pub has_associations: InverseSlot,
}

impl_entity_type!(IfcPropertyDefinition, IfcPropertyDefinition);

impl EntityLayer for IfcPropertyDefinition {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
        reflect_inverse(out, InverseRole::HasAssociations, &self.has_associations);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::HasAssociations => Some(&self.has_associations),
            _ => self.base.inverse_slot(role),
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::HasAssociations => Some(&mut self.has_associations),
            _ => self.base.inverse_slot_mut(role),
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcPropertySetDefinition {
    pub base: IfcPropertyDefinition,
}

impl_entity_type!(IfcPropertySetDefinition, IfcPropertySetDefinition);
impl_passthrough_layer!(IfcPropertySetDefinition);

/// Named set of properties
#[derive(Clone, Debug, Default)]
pub struct IfcPropertySet {
    id: EntityId,
    pub base: IfcPropertySetDefinition,
    pub has_properties: Vec<Option<EntityRef<IfcProperty>>>,
}

impl_step_entity!(IfcPropertySet, IfcPropertySet);

impl IfcPropertySet {
    pub fn property_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.has_properties.iter().flatten().map(|property| property.id())
    }
}

impl EntityLayer for IfcPropertySet {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.has_properties = args.read("HasProperties")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.has_properties);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "HasProperties", &self.has_properties);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        out.extend(
            self.property_ids()
                .map(|property| ForwardLink::new(InverseRole::PartOfPset, property)),
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        self.base.inverse_slot(role)
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        self.base.inverse_slot_mut(role)
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        for property in self.has_properties.iter_mut().flatten() {
            *property = EntityRef::new(remap(property.id()));
        }
    }
}

// ============================================================================
// Relationships
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcRelationship {
    pub base: IfcRoot,
}

impl_entity_type!(IfcRelationship, IfcRelationship);
impl_passthrough_layer!(IfcRelationship);

/// Associates external information with object and property definitions
#[derive(Clone, Debug, Default)]
pub struct IfcRelAssociates {
    pub base: IfcRelationship,
    pub related_objects: Vec<Option<IfcDefinitionSelect>>,
}

impl_entity_type!(IfcRelAssociates, IfcRelAssociates);

impl EntityLayer for IfcRelAssociates {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.related_objects = args.read("RelatedObjects")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.related_objects);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "RelatedObjects", &self.related_objects);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        for object in self.related_objects.iter().flatten() {
            match object {
                IfcDefinitionSelect::PropertyDefinition(definition) => out.push(
                    ForwardLink::new(InverseRole::HasAssociations, definition.id()),
                ),
            }
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        for object in self.related_objects.iter_mut().flatten() {
            *object = object.remapped(remap);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcRelAssociatesClassification {
    id: EntityId,
    pub base: IfcRelAssociates,
    pub relating_classification: Option<IfcClassificationSelect>,
}

impl_step_entity!(IfcRelAssociatesClassification, IfcRelAssociatesClassification);

impl EntityLayer for IfcRelAssociatesClassification {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.relating_classification = args.read("RelatingClassification")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.relating_classification);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "RelatingClassification", &self.relating_classification);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        match self.relating_classification {
            Some(IfcClassificationSelect::Classification(target)) => out.push(ForwardLink::new(
                InverseRole::ClassificationForObjects,
                target.id(),
            )),
            Some(IfcClassificationSelect::ClassificationReference(target)) => out.push(
                ForwardLink::new(InverseRole::ClassificationRefForObjects, target.id()),
            ),
            None => {}
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        self.relating_classification = self
            .relating_classification
            .map(|target| target.remapped(remap));
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcRelAssociatesMaterial {
    id: EntityId,
    pub base: IfcRelAssociates,
    pub relating_material: Option<IfcMaterialSelect>,
}

impl_step_entity!(IfcRelAssociatesMaterial, IfcRelAssociatesMaterial);

impl EntityLayer for IfcRelAssociatesMaterial {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.relating_material = args.read("RelatingMaterial")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.relating_material);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "RelatingMaterial", &self.relating_material);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        if let Some(IfcMaterialSelect::MaterialDefinition(material)) = self.relating_material {
            out.push(ForwardLink::new(
                InverseRole::MaterialAssociatedTo,
                material.id(),
            ));
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        self.relating_material = self.relating_material.map(|target| target.remapped(remap));
    }
}

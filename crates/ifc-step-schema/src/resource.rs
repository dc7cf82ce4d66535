// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External reference resources
//!
//! Actor roles, classifications and their references, and the relationship
//! that attaches external references to other resources.

use crate::selects::{IfcClassificationReferenceSelect, IfcResourceObjectSelect};
use crate::types::*;
use ifc_step_model::{AttributeList, EntityId, InverseRole, Result};
use ifc_step_parser::{
    impl_entity_type, impl_step_entity, reflect, reflect_inverse, ArgumentReader, ArgumentWriter,
    EntityLayer, EntityRef, ForwardLink, InverseSlot,
};

// ============================================================================
// IfcActorRole
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcActorRole {
    id: EntityId,
    pub role: Option<IfcRoleEnum>,
    pub user_defined_role: Option<IfcLabel>,
    pub description: Option<IfcText>,
    pub has_external_reference: InverseSlot,
}

impl_step_entity!(IfcActorRole, IfcActorRole);

impl EntityLayer for IfcActorRole {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.role = args.read("Role")?;
        self.user_defined_role = args.read("UserDefinedRole")?;
        self.description = args.read("Description")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write(&self.role);
        args.write(&self.user_defined_role);
        args.write(&self.description);
    }

    fn attributes(&self, out: &mut AttributeList) {
        reflect(out, "Role", &self.role);
        reflect(out, "UserDefinedRole", &self.user_defined_role);
        reflect(out, "Description", &self.description);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        reflect_inverse(
            out,
            InverseRole::ActorRoleHasExternalReference,
            &self.has_external_reference,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::ActorRoleHasExternalReference => Some(&self.has_external_reference),
            _ => None,
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::ActorRoleHasExternalReference => Some(&mut self.has_external_reference),
            _ => None,
        }
    }
}

// ============================================================================
// IfcExternalReference (abstract)
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcExternalReference {
    pub location: Option<IfcURIReference>,
    pub identification: Option<IfcIdentifier>,
    pub name: Option<IfcLabel>,
    pub external_reference_for_resources: InverseSlot,
}

impl_entity_type!(IfcExternalReference, IfcExternalReference);

impl EntityLayer for IfcExternalReference {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.location = args.read("Location")?;
        self.identification = args.read("Identification")?;
        self.name = args.read("Name")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write(&self.location);
        args.write(&self.identification);
        args.write(&self.name);
    }

    fn attributes(&self, out: &mut AttributeList) {
        reflect(out, "Location", &self.location);
        reflect(out, "Identification", &self.identification);
        reflect(out, "Name", &self.name);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        reflect_inverse(
            out,
            InverseRole::ExternalReferenceForResources,
            &self.external_reference_for_resources,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::ExternalReferenceForResources => {
                Some(&self.external_reference_for_resources)
            }
            _ => None,
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::ExternalReferenceForResources => {
                Some(&mut self.external_reference_for_resources)
            }
            _ => None,
        }
    }
}

// ============================================================================
// IfcClassificationReference
// ============================================================================

/// Reference into a classification system, possibly nested in another
/// reference
#[derive(Clone, Debug, Default)]
pub struct IfcClassificationReference {
    id: EntityId,
    pub base: IfcExternalReference,
    pub referenced_source: Option<IfcClassificationReferenceSelect>,
    pub description: Option<IfcText>,
    pub sort: Option<IfcIdentifier>,
    pub classification_ref_for_objects: InverseSlot,
    pub has_references: InverseSlot,
}

impl_step_entity!(IfcClassificationReference, IfcClassificationReference);

impl EntityLayer for IfcClassificationReference {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.referenced_source = args.read("ReferencedSource")?;
        self.description = args.read("Description")?;
        self.sort = args.read("Sort")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.referenced_source);
        args.write(&self.description);
        args.write(&self.sort);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "ReferencedSource", &self.referenced_source);
        reflect(out, "Description", &self.description);
        reflect(out, "Sort", &self.sort);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
        reflect_inverse(
            out,
            InverseRole::ClassificationRefForObjects,
            &self.classification_ref_for_objects,
        );
        reflect_inverse(
            out,
            InverseRole::ClassificationReferenceHasReferences,
            &self.has_references,
        );
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        match self.referenced_source {
            Some(IfcClassificationReferenceSelect::Classification(source)) => out.push(
                ForwardLink::new(InverseRole::ClassificationHasReferences, source.id()),
            ),
            Some(IfcClassificationReferenceSelect::ClassificationReference(source)) => {
                out.push(ForwardLink::new(
                    InverseRole::ClassificationReferenceHasReferences,
                    source.id(),
                ))
            }
            None => {}
        }
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::ClassificationRefForObjects => Some(&self.classification_ref_for_objects),
            InverseRole::ClassificationReferenceHasReferences => Some(&self.has_references),
            _ => self.base.inverse_slot(role),
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::ClassificationRefForObjects => {
                Some(&mut self.classification_ref_for_objects)
            }
            InverseRole::ClassificationReferenceHasReferences => Some(&mut self.has_references),
            _ => self.base.inverse_slot_mut(role),
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        self.referenced_source = self.referenced_source.map(|source| source.remapped(remap));
    }
}

// ============================================================================
// IfcExternalInformation (abstract)
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcExternalInformation;

impl_entity_type!(IfcExternalInformation, IfcExternalInformation);

impl EntityLayer for IfcExternalInformation {
    fn read_arguments(&mut self, _args: &mut ArgumentReader<'_>) -> Result<()> {
        Ok(())
    }

    fn write_arguments(&self, _args: &mut ArgumentWriter<'_>) {}

    fn attributes(&self, _out: &mut AttributeList) {}
}

// ============================================================================
// IfcClassification
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcClassification {
    id: EntityId,
    pub base: IfcExternalInformation,
    pub source: Option<IfcLabel>,
    pub edition: Option<IfcLabel>,
    pub edition_date: Option<IfcDate>,
    pub name: Option<IfcLabel>,
    pub description: Option<IfcText>,
    pub location: Option<IfcURIReference>,
    pub reference_tokens: Vec<IfcIdentifier>,
    pub classification_for_objects: InverseSlot,
    pub has_references: InverseSlot,
}

impl_step_entity!(IfcClassification, IfcClassification);

impl EntityLayer for IfcClassification {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.source = args.read("Source")?;
        self.edition = args.read("Edition")?;
        self.edition_date = args.read("EditionDate")?;
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        self.location = args.read("Location")?;
        self.reference_tokens = args.read("ReferenceTokens")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.source);
        args.write(&self.edition);
        args.write(&self.edition_date);
        args.write(&self.name);
        args.write(&self.description);
        args.write(&self.location);
        args.write(&self.reference_tokens);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "Source", &self.source);
        reflect(out, "Edition", &self.edition);
        reflect(out, "EditionDate", &self.edition_date);
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
        reflect(out, "Location", &self.location);
        reflect(out, "ReferenceTokens", &self.reference_tokens);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
        reflect_inverse(
            out,
            InverseRole::ClassificationForObjects,
            &self.classification_for_objects,
        );
        reflect_inverse(
            out,
            InverseRole::ClassificationHasReferences,
            &self.has_references,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::ClassificationForObjects => Some(&self.classification_for_objects),
            InverseRole::ClassificationHasReferences => Some(&self.has_references),
            _ => self.base.inverse_slot(role),
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::ClassificationForObjects => Some(&mut self.classification_for_objects),
            InverseRole::ClassificationHasReferences => Some(&mut self.has_references),
            _ => self.base.inverse_slot_mut(role),
        }
    }
}

// ============================================================================
// IfcResourceLevelRelationship (abstract)
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcResourceLevelRelationship {
    pub name: Option<IfcLabel>,
    pub description: Option<IfcText>,
}

impl_entity_type!(IfcResourceLevelRelationship, IfcResourceLevelRelationship);

impl EntityLayer for IfcResourceLevelRelationship {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write(&self.name);
        args.write(&self.description);
    }

    fn attributes(&self, out: &mut AttributeList) {
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
    }
}

// ============================================================================
// IfcExternalReferenceRelationship
// ============================================================================

/// Attaches one external reference to any number of resources
#[derive(Clone, Debug, Default)]
pub struct IfcExternalReferenceRelationship {
    id: EntityId,
    pub base: IfcResourceLevelRelationship,
    pub relating_reference: Option<EntityRef<IfcExternalReference>>,
    pub related_resource_objects: Vec<Option<IfcResourceObjectSelect>>,
}

impl_step_entity!(
    IfcExternalReferenceRelationship,
    IfcExternalReferenceRelationship
);

impl EntityLayer for IfcExternalReferenceRelationship {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.relating_reference = args.read("RelatingReference")?;
        self.related_resource_objects = args.read("RelatedResourceObjects")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.relating_reference);
        args.write(&self.related_resource_objects);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "RelatingReference", &self.relating_reference);
        reflect(out, "RelatedResourceObjects", &self.related_resource_objects);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        self.base.forward_links(out);
        if let Some(reference) = self.relating_reference {
            out.push(ForwardLink::new(
                InverseRole::ExternalReferenceForResources,
                reference.id(),
            ));
        }
        for object in self.related_resource_objects.iter().flatten() {
            let role = match object {
                IfcResourceObjectSelect::ActorRole(_) => InverseRole::ActorRoleHasExternalReference,
                IfcResourceObjectSelect::MaterialDefinition(_) => {
                    InverseRole::MaterialHasExternalReferences
                }
                IfcResourceObjectSelect::PropertyAbstraction(_) => {
                    InverseRole::PropertyHasExternalReferences
                }
                // no inverse declared on these
                IfcResourceObjectSelect::ExternalInformation(_)
                | IfcResourceObjectSelect::ExternalReference(_) => continue,
            };
            out.push(ForwardLink::new(role, object.id()));
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.base.remap_references(remap);
        if let Some(reference) = &mut self.relating_reference {
            *reference = EntityRef::new(remap(reference.id()));
        }
        for object in self.related_resource_objects.iter_mut().flatten() {
            *object = object.remapped(remap);
        }
    }
}

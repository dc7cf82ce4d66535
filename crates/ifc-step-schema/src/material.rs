// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resources

use crate::types::*;
use ifc_step_model::{AttributeList, EntityId, InverseRole, Result};
use ifc_step_parser::{
    impl_entity_type, impl_step_entity, reflect, reflect_inverse, ArgumentReader, ArgumentWriter,
    EntityLayer, EntityRef, ForwardLink, InverseSlot,
};

// ============================================================================
// IfcMaterialDefinition (abstract)
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcMaterialDefinition {
    pub associated_to: InverseSlot,
    pub has_external_references: InverseSlot,
}

impl_entity_type!(IfcMaterialDefinition, IfcMaterialDefinition);

impl EntityLayer for IfcMaterialDefinition {
    fn read_arguments(&mut self, _args: &mut ArgumentReader<'_>) -> Result<()> {
        Ok(())
    }

    fn write_arguments(&self, _args: &mut ArgumentWriter<'_>) {}

    fn attributes(&self, _out: &mut AttributeList) {}

    fn inverse_attributes(&self, out: &mut AttributeList) {
        reflect_inverse(out, InverseRole::MaterialAssociatedTo, &self.associated_to);
        reflect_inverse(
            out,
            InverseRole::MaterialHasExternalReferences,
            &self.has_external_references,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::MaterialAssociatedTo => Some(&self.associated_to),
            InverseRole::MaterialHasExternalReferences => Some(&self.has_external_references),
            _ => None,
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::MaterialAssociatedTo => Some(&mut self.associated_to),
            InverseRole::MaterialHasExternalReferences => Some(&mut self.has_external_references),
            _ => None,
        }
    }
}

// ============================================================================
// IfcMaterial
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcMaterial {
    id: EntityId,
    pub base: IfcMaterialDefinition,
    pub name: Option<IfcLabel>,
    pub description: Option<IfcText>,
    pub category: Option<IfcLabel>,
}

impl_step_entity!(IfcMaterial, IfcMaterial);

impl EntityLayer for IfcMaterial {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        self.category = args.read("Category")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.name);
        args.write(&self.description);
        args.write(&self.category);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
        reflect(out, "Category", &self.category);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        self.base.inverse_slot(role)
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        self.base.inverse_slot_mut(role)
    }
}

// ============================================================================
// IfcMaterialLayer
// ============================================================================

/// One layer of a layered material build-up
#[derive(Clone, Debug)]
pub struct IfcMaterialLayer {
    id: EntityId,
    pub base: IfcMaterialDefinition,
    pub material: Option<EntityRef<IfcMaterial>>,
    pub layer_thickness: Option<IfcNonNegativeLengthMeasure>,
    pub is_ventilated: Option<IfcLogical>,
    pub name: Option<IfcLabel>,
    pub description: Option<IfcText>,
    pub category: Option<IfcLabel>,
    pub priority: Option<IfcInteger>,
    /// The layer set this layer belongs to, at most one
    pub to_material_layer_set: InverseSlot,
}

impl Default for IfcMaterialLayer {
    fn default() -> Self {
        Self {
            id: EntityId::default(),
            base: IfcMaterialDefinition::default(),
            material: None,
            layer_thickness: None,
            is_ventilated: None,
            name: None,
            description: None,
            category: None,
            priority: None,
            to_material_layer_set: InverseSlot::for_role(InverseRole::ToMaterialLayerSet),
        }
    }
}

impl_step_entity!(IfcMaterialLayer, IfcMaterialLayer);

impl EntityLayer for IfcMaterialLayer {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.material = args.read("Material")?;
        self.layer_thickness = args.read("LayerThickness")?;
        self.is_ventilated = args.read("IsVentilated")?;
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        self.category = args.read("Category")?;
        self.priority = args.read("Priority")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.material);
        args.write(&self.layer_thickness);
        args.write(&self.is_ventilated);
        args.write(&self.name);
        args.write(&self.description);
        args.write(&self.category);
        args.write(&self.priority);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "Material", &self.material);
        reflect(out, "LayerThickness", &self.layer_thickness);
        reflect(out, "IsVentilated", &self.is_ventilated);
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
        reflect(out, "Category", &self.category);
        reflect(out, "Priority", &self.priority);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
        reflect_inverse(
            out,
            InverseRole::ToMaterialLayerSet,
            &self.to_material_layer_set,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::ToMaterialLayerSet => Some(&self.to_material_layer_set),
            _ => self.base.inverse_slot(role),
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::ToMaterialLayerSet => Some(&mut self.to_material_layer_set),
            _ => self.base.inverse_slot_mut(role),
        }
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        if let Some(material) = &mut self.material {
            *material = EntityRef::new(remap(material.id()));
        }
    }
}

// ============================================================================
// IfcMaterialLayerSet
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct IfcMaterialLayerSet {
    id: EntityId,
    pub base: IfcMaterialDefinition,
    pub material_layers: Vec<Option<EntityRef<IfcMaterialLayer>>>,
    pub layer_set_name: Option<IfcLabel>,
    pub description: Option<IfcText>,
}

impl_step_entity!(IfcMaterialLayerSet, IfcMaterialLayerSet);

impl IfcMaterialLayerSet {
    /// Ids of the layers, skipping null slots
    pub fn layer_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.material_layers.iter().flatten().map(|layer| layer.id())
    }
}

impl EntityLayer for IfcMaterialLayerSet {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.material_layers = args.read("MaterialLayers")?;
        self.layer_set_name = args.read("LayerSetName")?;
        self.description = args.read("Description")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.material_layers);
        args.write(&self.layer_set_name);
        args.write(&self.description);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "MaterialLayers", &self.material_layers);
        reflect(out, "LayerSetName", &self.layer_set_name);
        reflect(out, "Description", &self.description);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
    }

    fn forward_links(&self, out: &mut Vec<ForwardLink>) {
        out.extend(
            self.layer_ids()
                .map(|layer| ForwardLink::new(InverseRole::ToMaterialLayerSet, layer)),
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        self.base.inverse_slot(role)
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        self.base.inverse_slot_mut(role)
    }

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        for layer in self.material_layers.iter_mut().flatten() {
            *layer = EntityRef::new(remap(layer.id()));
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property resources

use crate::selects::{IfcUnit, IfcValue};
use crate::types::*;
use ifc_step_model::{AttributeList, EntityId, InverseRole, Result};
use ifc_step_parser::{
    impl_entity_type, impl_passthrough_layer, impl_step_entity, reflect, reflect_inverse,
    ArgumentReader, ArgumentWriter, EntityLayer, InverseSlot,
};

#[derive(Clone, Debug, Default)]
pub struct IfcPropertyAbstraction {
    pub has_external_references: InverseSlot,
}

impl_entity_type!(IfcPropertyAbstraction, IfcPropertyAbstraction);

impl EntityLayer for IfcPropertyAbstraction {
    fn read_arguments(&mut self, _args: &mut ArgumentReader<'_>) -> Result<()> {
        Ok(())
    }

    fn write_arguments(&self, _args: &mut ArgumentWriter<'_>) {}

    fn attributes(&self, _out: &mut AttributeList) {}

    fn inverse_attributes(&self, out: &mut AttributeList) {
        reflect_inverse(
            out,
            InverseRole::PropertyHasExternalReferences,
            &self.has_external_references,
        );
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::PropertyHasExternalReferences => Some(&self.has_external_references),
            _ => None,
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::PropertyHasExternalReferences => Some(&mut self.has_external_references),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcProperty {
    pub base: IfcPropertyAbstraction,
    pub name: Option<IfcIdentifier>,
    pub description: Option<IfcText>,
    pub part_of_pset: InverseSlot,
}

impl_entity_type!(IfcProperty, IfcProperty);

impl EntityLayer for IfcProperty {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.name = args.read("Name")?;
        self.description = args.read("Description")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.name);
        args.write(&self.description);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "Name", &self.name);
        reflect(out, "Description", &self.description);
    }

    fn inverse_attributes(&self, out: &mut AttributeList) {
        self.base.inverse_attributes(out);
        reflect_inverse(out, InverseRole::PartOfPset, &self.part_of_pset);
    }

    fn inverse_slot(&self, role: InverseRole) -> Option<&InverseSlot> {
        match role {
            InverseRole::PartOfPset => Some(&self.part_of_pset),
            _ => self.base.inverse_slot(role),
        }
    }

    fn inverse_slot_mut(&mut self, role: InverseRole) -> Option<&mut InverseSlot> {
        match role {
            InverseRole::PartOfPset => Some(&mut self.part_of_pset),
            _ => self.base.inverse_slot_mut(role),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcSimpleProperty {
    pub base: IfcProperty,
}

impl_entity_type!(IfcSimpleProperty, IfcSimpleProperty);
impl_passthrough_layer!(IfcSimpleProperty);

/// Named property with one value and an optional unit
#[derive(Clone, Debug, Default)]
pub struct IfcPropertySingleValue {
    id: EntityId,
    pub base: IfcSimpleProperty,
    pub nominal_value: Option<IfcValue>,
    pub unit: Option<IfcUnit>,
}

impl_step_entity!(IfcPropertySingleValue, IfcPropertySingleValue);

impl IfcPropertySingleValue {
    pub fn name(&self) -> Option<&str> {
        self.base.base.name.as_ref().map(|name| name.0.as_str())
    }
}

impl EntityLayer for IfcPropertySingleValue {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.nominal_value = args.read("NominalValue")?;
        self.unit = args.read("Unit")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.nominal_value);
        args.write(&self.unit);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "NominalValue", &self.nominal_value);
        reflect(out, "Unit", &self.unit);
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

    fn remap_references(&mut self, remap: &dyn Fn(EntityId) -> EntityId) {
        self.unit = self.unit.map(|unit| unit.remapped(remap));
    }
}

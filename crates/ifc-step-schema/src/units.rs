// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Measure resources

use crate::types::*;
use ifc_step_model::{AttributeList, AttributeValue, EntityId, Result};
use ifc_step_parser::{
    impl_entity_type, impl_step_entity, reflect, ArgumentReader, ArgumentWriter, EntityLayer,
    EntityRef,
};

// ============================================================================
// IfcDimensionalExponents
// ============================================================================

/// Exponents of the seven SI base quantities
#[derive(Clone, Debug, Default)]
pub struct IfcDimensionalExponents {
    id: EntityId,
    pub length_exponent: Option<i64>,
    pub mass_exponent: Option<i64>,
    pub time_exponent: Option<i64>,
    pub electric_current_exponent: Option<i64>,
    pub thermodynamic_temperature_exponent: Option<i64>,
    pub amount_of_substance_exponent: Option<i64>,
    pub luminous_intensity_exponent: Option<i64>,
}

impl_step_entity!(IfcDimensionalExponents, IfcDimensionalExponents);

impl EntityLayer for IfcDimensionalExponents {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.length_exponent = args.read("LengthExponent")?;
        self.mass_exponent = args.read("MassExponent")?;
        self.time_exponent = args.read("TimeExponent")?;
        self.electric_current_exponent = args.read("ElectricCurrentExponent")?;
        self.thermodynamic_temperature_exponent =
            args.read("ThermodynamicTemperatureExponent")?;
        self.amount_of_substance_exponent = args.read("AmountOfSubstanceExponent")?;
        self.luminous_intensity_exponent = args.read("LuminousIntensityExponent")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write(&self.length_exponent);
        args.write(&self.mass_exponent);
        args.write(&self.time_exponent);
        args.write(&self.electric_current_exponent);
        args.write(&self.thermodynamic_temperature_exponent);
        args.write(&self.amount_of_substance_exponent);
        args.write(&self.luminous_intensity_exponent);
    }

    fn attributes(&self, out: &mut AttributeList) {
        reflect(out, "LengthExponent", &self.length_exponent);
        reflect(out, "MassExponent", &self.mass_exponent);
        reflect(out, "TimeExponent", &self.time_exponent);
        reflect(out, "ElectricCurrentExponent", &self.electric_current_exponent);
        reflect(
            out,
            "ThermodynamicTemperatureExponent",
            &self.thermodynamic_temperature_exponent,
        );
        reflect(
            out,
            "AmountOfSubstanceExponent",
            &self.amount_of_substance_exponent,
        );
        reflect(
            out,
            "LuminousIntensityExponent",
            &self.luminous_intensity_exponent,
        );
    }
}

// ============================================================================
// IfcNamedUnit (abstract)
// ============================================================================

/// Shared data of named units
///
/// Its only subtype in this schema, `IfcSIUnit`, redeclares `Dimensions`
/// as derived and reads its arguments itself.
#[derive(Clone, Debug, Default)]
pub struct IfcNamedUnit {
    pub dimensions: Option<EntityRef<IfcDimensionalExponents>>,
    pub unit_type: Option<IfcUnitEnum>,
}

impl_entity_type!(IfcNamedUnit, IfcNamedUnit);

// ============================================================================
// IfcSIUnit
// ============================================================================

/// SI unit; `Dimensions` is derived from the unit name and always `*`
#[derive(Clone, Debug, Default)]
pub struct IfcSIUnit {
    id: EntityId,
    pub base: IfcNamedUnit,
    pub prefix: Option<IfcSIPrefix>,
    pub name: Option<IfcSIUnitName>,
}

impl_step_entity!(IfcSIUnit, IfcSIUnit);

impl IfcSIUnit {
    /// Unit symbol such as `mm` or `m2`, if the name has one
    pub fn symbol(&self) -> Option<String> {
        let base = match self.name? {
            IfcSIUnitName::Metre => "m",
            IfcSIUnitName::SquareMetre => "m2",
            IfcSIUnitName::CubicMetre => "m3",
            IfcSIUnitName::Gram => "g",
            IfcSIUnitName::Second => "s",
            IfcSIUnitName::Radian => "rad",
            _ => return None,
        };
        let prefix = match self.prefix {
            Some(IfcSIPrefix::Kilo) => "k",
            Some(IfcSIPrefix::Centi) => "c",
            Some(IfcSIPrefix::Milli) => "m",
            Some(IfcSIPrefix::Micro) => "u",
            None => "",
            Some(_) => return None,
        };
        Some(format!("{prefix}{base}"))
    }
}

impl EntityLayer for IfcSIUnit {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        args.skip("Dimensions")?;
        self.base.dimensions = None;
        self.base.unit_type = args.read("UnitType")?;
        self.prefix = args.read("Prefix")?;
        self.name = args.read("Name")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        args.write_derived();
        args.write(&self.base.unit_type);
        args.write(&self.prefix);
        args.write(&self.name);
    }

    fn attributes(&self, out: &mut AttributeList) {
        out.push(("Dimensions", AttributeValue::Derived));
        reflect(out, "UnitType", &self.base.unit_type);
        reflect(out, "Prefix", &self.prefix);
        reflect(out, "Name", &self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_si_symbol() {
        let mut unit = IfcSIUnit::new(EntityId(1));
        unit.name = Some(IfcSIUnitName::Metre);
        unit.prefix = Some(IfcSIPrefix::Milli);
        assert_eq!(unit.symbol().as_deref(), Some("mm"));

        unit.prefix = Some(IfcSIPrefix::Exa);
        assert_eq!(unit.symbol(), None);
    }

    #[test]
    fn test_dimensions_always_derived() {
        let unit = IfcSIUnit::new(EntityId(1));
        let mut out = AttributeList::new();
        unit.attributes(&mut out);
        assert_eq!(out[0], ("Dimensions", AttributeValue::Derived));
        assert_eq!(out[1], ("UnitType", AttributeValue::Null));
    }
}

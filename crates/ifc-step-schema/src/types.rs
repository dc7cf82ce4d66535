// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defined types and enumerations
//!
//! A defined type is a named wrapper over a simple type. It is written bare
//! in an attribute of its own type and as `TYPENAME(value)` when it fills a
//! SELECT. Enumerations are written `.MEMBER.` and read case-insensitively.

use ifc_step_model::{AttributeValue, Logical, Result, StepError};
use ifc_step_parser::{ReadContext, StepValue, Token};
use std::fmt;

macro_rules! defined_type {
    ($(#[$meta:meta])* $name:ident($inner:ty) = $step:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(pub $inner);

        impl $name {
            /// STEP type name used in SELECT wrappers
            pub const TYPE_NAME: &'static str = $step;
        }

        impl StepValue for $name {
            fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
                match token {
                    Token::TypedValue(name, args) if name.eq_ignore_ascii_case($step) => {
                        match args.as_slice() {
                            [inner] => <$inner>::decode(inner, ctx).map(Self),
                            _ => Err(StepError::malformed(format!(
                                "{} takes one value, found {}",
                                $step,
                                args.len()
                            ))),
                        }
                    }
                    other => <$inner>::decode(other, ctx).map(Self),
                }
            }

            fn encode(&self, out: &mut String) {
                self.0.encode(out);
            }

            fn encode_select(&self, out: &mut String) {
                out.push_str($step);
                out.push('(');
                self.0.encode(out);
                out.push(')');
            }

            fn to_attribute(&self) -> AttributeValue {
                self.0.to_attribute()
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! step_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $member:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Uppercase member name, without dots
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $member,)+
                }
            }

            /// Case-insensitive member lookup
            pub fn parse(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case($member) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl StepValue for $name {
            fn decode(token: &Token<'_>, _ctx: &ReadContext<'_>) -> Result<Self> {
                match token {
                    Token::Enum(text) => Self::parse(text).ok_or_else(|| {
                        StepError::malformed(format!(
                            "unknown {} member .{}.",
                            stringify!($name),
                            text
                        ))
                    }),
                    other => Err(StepError::malformed(format!(
                        "expected {}, found {}",
                        stringify!($name),
                        other.describe()
                    ))),
                }
            }

            fn encode(&self, out: &mut String) {
                out.push('.');
                out.push_str(self.as_str());
                out.push('.');
            }

            fn to_attribute(&self) -> AttributeValue {
                AttributeValue::Enum(self.as_str().to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ============================================================================
// Defined types
// ============================================================================

defined_type!(IfcLabel(String) = "IFCLABEL");
defined_type!(IfcText(String) = "IFCTEXT");
defined_type!(IfcIdentifier(String) = "IFCIDENTIFIER");
defined_type!(IfcURIReference(String) = "IFCURIREFERENCE");
defined_type!(
    /// 22 character base64 GUID
    IfcGloballyUniqueId(String) = "IFCGLOBALLYUNIQUEID"
);
defined_type!(
    /// ISO 8601 date, kept as text
    IfcDate(String) = "IFCDATE"
);
defined_type!(IfcBoolean(bool) = "IFCBOOLEAN");
defined_type!(IfcLogical(Logical) = "IFCLOGICAL");
defined_type!(IfcInteger(i64) = "IFCINTEGER");
defined_type!(IfcReal(f64) = "IFCREAL");
defined_type!(IfcLengthMeasure(f64) = "IFCLENGTHMEASURE");
defined_type!(IfcPositiveLengthMeasure(f64) = "IFCPOSITIVELENGTHMEASURE");
defined_type!(IfcNonNegativeLengthMeasure(f64) = "IFCNONNEGATIVELENGTHMEASURE");

impl From<&str> for IfcLabel {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for IfcText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for IfcIdentifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Enumerations
// ============================================================================

step_enum!(
    /// Role of an actor
    IfcRoleEnum {
        Supplier = "SUPPLIER",
        Manufacturer = "MANUFACTURER",
        Contractor = "CONTRACTOR",
        Subcontractor = "SUBCONTRACTOR",
        Architect = "ARCHITECT",
        StructuralEngineer = "STRUCTURALENGINEER",
        CostEngineer = "COSTENGINEER",
        Client = "CLIENT",
        BuildingOwner = "BUILDINGOWNER",
        BuildingOperator = "BUILDINGOPERATOR",
        MechanicalEngineer = "MECHANICALENGINEER",
        ElectricalEngineer = "ELECTRICALENGINEER",
        ProjectManager = "PROJECTMANAGER",
        FacilitiesManager = "FACILITIESMANAGER",
        CivilEngineer = "CIVILENGINEER",
        CommissioningEngineer = "COMMISSIONINGENGINEER",
        Engineer = "ENGINEER",
        Owner = "OWNER",
        Consultant = "CONSULTANT",
        ConstructionManager = "CONSTRUCTIONMANAGER",
        FieldConstructionManager = "FIELDCONSTRUCTIONMANAGER",
        Reseller = "RESELLER",
        UserDefined = "USERDEFINED",
    }
);

step_enum!(IfcUnitEnum {
    AbsorbedDoseUnit = "ABSORBEDDOSEUNIT",
    AmountOfSubstanceUnit = "AMOUNTOFSUBSTANCEUNIT",
    AreaUnit = "AREAUNIT",
    DoseEquivalentUnit = "DOSEEQUIVALENTUNIT",
    ElectricCapacitanceUnit = "ELECTRICCAPACITANCEUNIT",
    ElectricChargeUnit = "ELECTRICCHARGEUNIT",
    ElectricConductanceUnit = "ELECTRICCONDUCTANCEUNIT",
    ElectricCurrentUnit = "ELECTRICCURRENTUNIT",
    ElectricResistanceUnit = "ELECTRICRESISTANCEUNIT",
    ElectricVoltageUnit = "ELECTRICVOLTAGEUNIT",
    EnergyUnit = "ENERGYUNIT",
    ForceUnit = "FORCEUNIT",
    FrequencyUnit = "FREQUENCYUNIT",
    IlluminanceUnit = "ILLUMINANCEUNIT",
    InductanceUnit = "INDUCTANCEUNIT",
    LengthUnit = "LENGTHUNIT",
    LuminousFluxUnit = "LUMINOUSFLUXUNIT",
    LuminousIntensityUnit = "LUMINOUSINTENSITYUNIT",
    MagneticFluxDensityUnit = "MAGNETICFLUXDENSITYUNIT",
    MagneticFluxUnit = "MAGNETICFLUXUNIT",
    MassUnit = "MASSUNIT",
    PlaneAngleUnit = "PLANEANGLEUNIT",
    PowerUnit = "POWERUNIT",
    PressureUnit = "PRESSUREUNIT",
    RadioactivityUnit = "RADIOACTIVITYUNIT",
    SolidAngleUnit = "SOLIDANGLEUNIT",
    ThermodynamicTemperatureUnit = "THERMODYNAMICTEMPERATUREUNIT",
    TimeUnit = "TIMEUNIT",
    VolumeUnit = "VOLUMEUNIT",
    UserDefined = "USERDEFINED",
});

step_enum!(IfcSIPrefix {
    Exa = "EXA",
    Peta = "PETA",
    Tera = "TERA",
    Giga = "GIGA",
    Mega = "MEGA",
    Kilo = "KILO",
    Hecto = "HECTO",
    Deca = "DECA",
    Deci = "DECI",
    Centi = "CENTI",
    Milli = "MILLI",
    Micro = "MICRO",
    Nano = "NANO",
    Pico = "PICO",
    Femto = "FEMTO",
    Atto = "ATTO",
});

step_enum!(IfcSIUnitName {
    Ampere = "AMPERE",
    Becquerel = "BECQUEREL",
    Candela = "CANDELA",
    Coulomb = "COULOMB",
    CubicMetre = "CUBIC_METRE",
    DegreeCelsius = "DEGREE_CELSIUS",
    Farad = "FARAD",
    Gram = "GRAM",
    Gray = "GRAY",
    Henry = "HENRY",
    Hertz = "HERTZ",
    Joule = "JOULE",
    Kelvin = "KELVIN",
    Lumen = "LUMEN",
    Lux = "LUX",
    Metre = "METRE",
    Mole = "MOLE",
    Newton = "NEWTON",
    Ohm = "OHM",
    Pascal = "PASCAL",
    Radian = "RADIAN",
    Second = "SECOND",
    Siemens = "SIEMENS",
    Sievert = "SIEVERT",
    SquareMetre = "SQUARE_METRE",
    Steradian = "STERADIAN",
    Tesla = "TESLA",
    Volt = "VOLT",
    Watt = "WATT",
    Weber = "WEBER",
});

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_step_parser::{decode_value, encode_value, EmptyLookup};

    #[test]
    fn test_defined_type_bare_and_wrapped() {
        let label: IfcLabel = decode_value("'Brick'", &EmptyLookup).unwrap();
        assert_eq!(label, IfcLabel::from("Brick"));

        let wrapped: IfcLabel = decode_value("IFCLABEL('Brick')", &EmptyLookup).unwrap();
        assert_eq!(wrapped, label);

        assert_eq!(encode_value(&label), "'Brick'");
        let mut out = String::new();
        label.encode_select(&mut out);
        assert_eq!(out, "IFCLABEL('Brick')");
    }

    #[test]
    fn test_defined_type_rejects_other_wrapper() {
        let err = decode_value::<IfcLabel>("IFCTEXT('Brick')", &EmptyLookup).unwrap_err();
        assert!(matches!(err, StepError::MalformedValue { .. }));
    }

    #[test]
    fn test_measure_keeps_decimal_point() {
        let thickness = IfcNonNegativeLengthMeasure(1.0);
        assert_eq!(encode_value(&thickness), "1.");
        let mut out = String::new();
        IfcLengthMeasure(0.25).encode_select(&mut out);
        assert_eq!(out, "IFCLENGTHMEASURE(0.25)");
    }

    #[test]
    fn test_enum_case_insensitive() {
        let role: IfcRoleEnum = decode_value(".architect.", &EmptyLookup).unwrap();
        assert_eq!(role, IfcRoleEnum::Architect);
        assert_eq!(encode_value(&role), ".ARCHITECT.");

        let name: IfcSIUnitName = decode_value(".Square_Metre.", &EmptyLookup).unwrap();
        assert_eq!(name, IfcSIUnitName::SquareMetre);
    }

    #[test]
    fn test_enum_unknown_member_is_malformed() {
        let err = decode_value::<IfcUnitEnum>(".FURLONGUNIT.", &EmptyLookup).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed value: unknown IfcUnitEnum member .FURLONGUNIT."
        );
        assert!(decode_value::<IfcSIPrefix>("'MILLI'", &EmptyLookup).is_err());
    }

    #[test]
    fn test_enum_all_round_trip() {
        for prefix in IfcSIPrefix::ALL {
            assert_eq!(IfcSIPrefix::parse(prefix.as_str()), Some(*prefix));
        }
    }
}

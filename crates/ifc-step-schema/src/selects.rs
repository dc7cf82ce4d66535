// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SELECT unions
//!
//! An entity SELECT is a tagged reference: the variant is picked from the
//! kind of the referenced record, so no common base type is needed. A value
//! SELECT is always written with its `TYPENAME(...)` wrapper.

use crate::kernel::*;
use crate::material::*;
use crate::property::*;
use crate::resource::*;
use crate::types::*;
use crate::units::*;
use ifc_step_model::{AttributeValue, EntityId, Result, StepError};
use ifc_step_parser::{resolve_token, EntityRef, EntityType, ReadContext, StepValue, Token};

macro_rules! entity_select {
    ($(#[$meta:meta])* $name:ident = $step:literal { $($variant:ident($target:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant(EntityRef<$target>),)+
        }

        impl $name {
            /// Id of the referenced entity
            pub fn id(&self) -> EntityId {
                match self {
                    $($name::$variant(target) => target.id(),)+
                }
            }

            /// Same variant, pointing at `remap(id)`
            pub fn remapped(self, remap: &dyn Fn(EntityId) -> EntityId) -> Self {
                match self {
                    $($name::$variant(target) => $name::$variant(EntityRef::new(remap(target.id()))),)+
                }
            }
        }

        impl StepValue for $name {
            fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
                let (id, kind) = resolve_token(token, ctx)?;
                $(
                    if kind.is_a(<$target as EntityType>::KIND) {
                        return Ok($name::$variant(EntityRef::new(id)));
                    }
                )+
                Err(StepError::malformed(format!(
                    "{id} is {kind}, not a member of {}",
                    $step
                )))
            }

            fn encode(&self, out: &mut String) {
                self.id().encode(out);
            }

            fn to_attribute(&self) -> AttributeValue {
                AttributeValue::EntityRef(self.id())
            }
        }
    };
}

entity_select!(IfcClassificationReferenceSelect = "IFCCLASSIFICATIONREFERENCESELECT" {
    Classification(IfcClassification),
    ClassificationReference(IfcClassificationReference),
});

entity_select!(IfcClassificationSelect = "IFCCLASSIFICATIONSELECT" {
    Classification(IfcClassification),
    ClassificationReference(IfcClassificationReference),
});

entity_select!(
    /// Resources that can carry external references
    IfcResourceObjectSelect = "IFCRESOURCEOBJECTSELECT" {
        ActorRole(IfcActorRole),
        ExternalInformation(IfcExternalInformation),
        ExternalReference(IfcExternalReference),
        MaterialDefinition(IfcMaterialDefinition),
        PropertyAbstraction(IfcPropertyAbstraction),
    }
);

entity_select!(IfcDefinitionSelect = "IFCDEFINITIONSELECT" {
    PropertyDefinition(IfcPropertyDefinition),
});

entity_select!(IfcMaterialSelect = "IFCMATERIALSELECT" {
    MaterialDefinition(IfcMaterialDefinition),
});

entity_select!(IfcUnit = "IFCUNIT" {
    NamedUnit(IfcNamedUnit),
});

/// Value SELECT over the simple and measure types
#[derive(Clone, Debug, PartialEq)]
pub enum IfcValue {
    Label(IfcLabel),
    Text(IfcText),
    Identifier(IfcIdentifier),
    Boolean(IfcBoolean),
    Logical(IfcLogical),
    Integer(IfcInteger),
    Real(IfcReal),
    LengthMeasure(IfcLengthMeasure),
    PositiveLengthMeasure(IfcPositiveLengthMeasure),
    NonNegativeLengthMeasure(IfcNonNegativeLengthMeasure),
}

impl IfcValue {
    /// STEP name of the wrapped defined type
    pub fn type_name(&self) -> &'static str {
        match self {
            IfcValue::Label(_) => IfcLabel::TYPE_NAME,
            IfcValue::Text(_) => IfcText::TYPE_NAME,
            IfcValue::Identifier(_) => IfcIdentifier::TYPE_NAME,
            IfcValue::Boolean(_) => IfcBoolean::TYPE_NAME,
            IfcValue::Logical(_) => IfcLogical::TYPE_NAME,
            IfcValue::Integer(_) => IfcInteger::TYPE_NAME,
            IfcValue::Real(_) => IfcReal::TYPE_NAME,
            IfcValue::LengthMeasure(_) => IfcLengthMeasure::TYPE_NAME,
            IfcValue::PositiveLengthMeasure(_) => IfcPositiveLengthMeasure::TYPE_NAME,
            IfcValue::NonNegativeLengthMeasure(_) => IfcNonNegativeLengthMeasure::TYPE_NAME,
        }
    }

    fn inner_attribute(&self) -> AttributeValue {
        match self {
            IfcValue::Label(v) => v.to_attribute(),
            IfcValue::Text(v) => v.to_attribute(),
            IfcValue::Identifier(v) => v.to_attribute(),
            IfcValue::Boolean(v) => v.to_attribute(),
            IfcValue::Logical(v) => v.to_attribute(),
            IfcValue::Integer(v) => v.to_attribute(),
            IfcValue::Real(v) => v.to_attribute(),
            IfcValue::LengthMeasure(v) => v.to_attribute(),
            IfcValue::PositiveLengthMeasure(v) => v.to_attribute(),
            IfcValue::NonNegativeLengthMeasure(v) => v.to_attribute(),
        }
    }
}

impl StepValue for IfcValue {
    fn decode(token: &Token<'_>, ctx: &ReadContext<'_>) -> Result<Self> {
        let Token::TypedValue(name, _) = token else {
            return Err(StepError::malformed(format!(
                "IFCVALUE needs a typed value, found {}",
                token.describe()
            )));
        };
        let value = match name.to_ascii_uppercase().as_str() {
            IfcLabel::TYPE_NAME => IfcValue::Label(IfcLabel::decode(token, ctx)?),
            IfcText::TYPE_NAME => IfcValue::Text(IfcText::decode(token, ctx)?),
            IfcIdentifier::TYPE_NAME => IfcValue::Identifier(IfcIdentifier::decode(token, ctx)?),
            IfcBoolean::TYPE_NAME => IfcValue::Boolean(IfcBoolean::decode(token, ctx)?),
            IfcLogical::TYPE_NAME => IfcValue::Logical(IfcLogical::decode(token, ctx)?),
            IfcInteger::TYPE_NAME => IfcValue::Integer(IfcInteger::decode(token, ctx)?),
            IfcReal::TYPE_NAME => IfcValue::Real(IfcReal::decode(token, ctx)?),
            IfcLengthMeasure::TYPE_NAME => {
                IfcValue::LengthMeasure(IfcLengthMeasure::decode(token, ctx)?)
            }
            IfcPositiveLengthMeasure::TYPE_NAME => {
                IfcValue::PositiveLengthMeasure(IfcPositiveLengthMeasure::decode(token, ctx)?)
            }
            IfcNonNegativeLengthMeasure::TYPE_NAME => IfcValue::NonNegativeLengthMeasure(
                IfcNonNegativeLengthMeasure::decode(token, ctx)?,
            ),
            other => {
                return Err(StepError::malformed(format!(
                    "{other} is not a member of IFCVALUE"
                )))
            }
        };
        Ok(value)
    }

    fn encode(&self, out: &mut String) {
        match self {
            IfcValue::Label(v) => v.encode_select(out),
            IfcValue::Text(v) => v.encode_select(out),
            IfcValue::Identifier(v) => v.encode_select(out),
            IfcValue::Boolean(v) => v.encode_select(out),
            IfcValue::Logical(v) => v.encode_select(out),
            IfcValue::Integer(v) => v.encode_select(out),
            IfcValue::Real(v) => v.encode_select(out),
            IfcValue::LengthMeasure(v) => v.encode_select(out),
            IfcValue::PositiveLengthMeasure(v) => v.encode_select(out),
            IfcValue::NonNegativeLengthMeasure(v) => v.encode_select(out),
        }
    }

    fn to_attribute(&self) -> AttributeValue {
        AttributeValue::Typed(self.type_name().to_string(), Box::new(self.inner_attribute()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_step_model::EntityKind;
    use ifc_step_parser::{decode_value, encode_value, EmptyLookup};
    use std::collections::HashMap;

    fn lookup() -> HashMap<EntityId, EntityKind> {
        HashMap::from([
            (EntityId(1), EntityKind::IfcClassification),
            (EntityId(2), EntityKind::IfcClassificationReference),
            (EntityId(3), EntityKind::IfcMaterialLayer),
        ])
    }

    #[test]
    fn test_entity_select_picks_variant_by_kind() {
        let map = lookup();
        let source: IfcClassificationReferenceSelect = decode_value("#1", &map).unwrap();
        assert_eq!(
            source,
            IfcClassificationReferenceSelect::Classification(EntityRef::new(EntityId(1)))
        );
        let source: IfcClassificationReferenceSelect = decode_value("#2", &map).unwrap();
        assert!(matches!(
            source,
            IfcClassificationReferenceSelect::ClassificationReference(_)
        ));
        assert_eq!(encode_value(&source), "#2");
    }

    #[test]
    fn test_entity_select_subtype_member() {
        let material: IfcMaterialSelect = decode_value("#3", &lookup()).unwrap();
        assert_eq!(material.id(), EntityId(3));
    }

    #[test]
    fn test_entity_select_rejects_foreign_kind() {
        let err = decode_value::<IfcClassificationSelect>("#3", &lookup()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed value: #3 is IFCMATERIALLAYER, not a member of IFCCLASSIFICATIONSELECT"
        );
    }

    #[test]
    fn test_value_select_wraps() {
        let value: IfcValue = decode_value("IFCLENGTHMEASURE(0.2)", &EmptyLookup).unwrap();
        assert_eq!(value, IfcValue::LengthMeasure(IfcLengthMeasure(0.2)));
        assert_eq!(encode_value(&value), "IFCLENGTHMEASURE(0.2)");
        assert_eq!(
            value.to_attribute(),
            AttributeValue::Typed(
                "IFCLENGTHMEASURE".to_string(),
                Box::new(AttributeValue::Real(0.2))
            )
        );

        let flag: IfcValue = decode_value("IFCBOOLEAN(.T.)", &EmptyLookup).unwrap();
        assert_eq!(encode_value(&flag), "IFCBOOLEAN(.T.)");
    }

    #[test]
    fn test_value_select_needs_wrapper() {
        assert!(decode_value::<IfcValue>("0.2", &EmptyLookup).is_err());
        assert!(decode_value::<IfcValue>("IFCWALL(0.2)", &EmptyLookup).is_err());
    }
}

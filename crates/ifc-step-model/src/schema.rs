// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static schema tables
//!
//! [`EntityKind`] tags every ENTITY of the supported IFC4 slice with its STEP
//! name, supertype, abstractness and the number of arguments a record of that
//! type carries. [`InverseRole`] is the fixed mapping from a forward
//! relationship to the inverse slot it populates on the target type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_kinds {
    ($(
        $variant:ident = $name:literal,
        supertype: $supertype:expr,
        abstract: $is_abstract:literal,
        attributes: $count:literal;
    )*) => {
        /// IFC entity type tag
        ///
        /// Used for dispatch in place of runtime type inspection.
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub enum EntityKind {
            $(#[serde(rename = $name)] $variant,)*
        }

        impl EntityKind {
            /// Every kind in declaration order
            pub const ALL: &'static [EntityKind] = &[$(EntityKind::$variant,)*];

            /// Parse a STEP type name, case-insensitive
            pub fn parse(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($name => Some(EntityKind::$variant),)*
                    _ => None,
                }
            }

            /// Uppercase STEP type name
            pub fn name(self) -> &'static str {
                match self {
                    $(EntityKind::$variant => $name,)*
                }
            }

            /// Direct supertype, if any
            pub fn supertype(self) -> Option<EntityKind> {
                match self {
                    $(EntityKind::$variant => $supertype,)*
                }
            }

            /// Abstract kinds never appear as records
            pub fn is_abstract(self) -> bool {
                match self {
                    $(EntityKind::$variant => $is_abstract,)*
                }
            }

            /// Number of explicit attributes, inherited ones included
            pub fn attribute_count(self) -> usize {
                match self {
                    $(EntityKind::$variant => $count,)*
                }
            }
        }
    };
}

entity_kinds! {
    IfcActorRole = "IFCACTORROLE",
        supertype: None, abstract: false, attributes: 3;
    IfcExternalReference = "IFCEXTERNALREFERENCE",
        supertype: None, abstract: true, attributes: 3;
    IfcClassificationReference = "IFCCLASSIFICATIONREFERENCE",
        supertype: Some(EntityKind::IfcExternalReference), abstract: false, attributes: 6;
    IfcExternalInformation = "IFCEXTERNALINFORMATION",
        supertype: None, abstract: true, attributes: 0;
    IfcClassification = "IFCCLASSIFICATION",
        supertype: Some(EntityKind::IfcExternalInformation), abstract: false, attributes: 7;
    IfcResourceLevelRelationship = "IFCRESOURCELEVELRELATIONSHIP",
        supertype: None, abstract: true, attributes: 2;
    IfcExternalReferenceRelationship = "IFCEXTERNALREFERENCERELATIONSHIP",
        supertype: Some(EntityKind::IfcResourceLevelRelationship), abstract: false, attributes: 4;
    IfcMaterialDefinition = "IFCMATERIALDEFINITION",
        supertype: None, abstract: true, attributes: 0;
    IfcMaterial = "IFCMATERIAL",
        supertype: Some(EntityKind::IfcMaterialDefinition), abstract: false, attributes: 3;
    IfcMaterialLayer = "IFCMATERIALLAYER",
        supertype: Some(EntityKind::IfcMaterialDefinition), abstract: false, attributes: 7;
    IfcMaterialLayerSet = "IFCMATERIALLAYERSET",
        supertype: Some(EntityKind::IfcMaterialDefinition), abstract: false, attributes: 3;
    IfcPropertyAbstraction = "IFCPROPERTYABSTRACTION",
        supertype: None, abstract: true, attributes: 0;
    IfcProperty = "IFCPROPERTY",
        supertype: Some(EntityKind::IfcPropertyAbstraction), abstract: true, attributes: 2;
    IfcSimpleProperty = "IFCSIMPLEPROPERTY",
        supertype: Some(EntityKind::IfcProperty), abstract: true, attributes: 2;
    IfcPropertySingleValue = "IFCPROPERTYSINGLEVALUE",
        supertype: Some(EntityKind::IfcSimpleProperty), abstract: false, attributes: 4;
    IfcDimensionalExponents = "IFCDIMENSIONALEXPONENTS",
        supertype: None, abstract: false, attributes: 7;
    IfcNamedUnit = "IFCNAMEDUNIT",
        supertype: None, abstract: true, attributes: 2;
    IfcSIUnit = "IFCSIUNIT",
        supertype: Some(EntityKind::IfcNamedUnit), abstract: false, attributes: 4;
    IfcRoot = "IFCROOT",
        supertype: None, abstract: true, attributes: 4;
    IfcPropertyDefinition = "IFCPROPERTYDEFINITION",
        supertype: Some(EntityKind::IfcRoot), abstract: true, attributes: 4;
    IfcPropertySetDefinition = "IFCPROPERTYSETDEFINITION",
        supertype: Some(EntityKind::IfcPropertyDefinition), abstract: true, attributes: 4;
    IfcPropertySet = "IFCPROPERTYSET",
        supertype: Some(EntityKind::IfcPropertySetDefinition), abstract: false, attributes: 5;
    IfcRelationship = "IFCRELATIONSHIP",
        supertype: Some(EntityKind::IfcRoot), abstract: true, attributes: 4;
    IfcRelAssociates = "IFCRELASSOCIATES",
        supertype: Some(EntityKind::IfcRelationship), abstract: true, attributes: 5;
    IfcRelAssociatesClassification = "IFCRELASSOCIATESCLASSIFICATION",
        supertype: Some(EntityKind::IfcRelAssociates), abstract: false, attributes: 6;
    IfcRelAssociatesMaterial = "IFCRELASSOCIATESMATERIAL",
        supertype: Some(EntityKind::IfcRelAssociates), abstract: false, attributes: 6;
    IfcRepresentationItem = "IFCREPRESENTATIONITEM",
        supertype: None, abstract: true, attributes: 0;
    IfcGeometricRepresentationItem = "IFCGEOMETRICREPRESENTATIONITEM",
        supertype: Some(EntityKind::IfcRepresentationItem), abstract: true, attributes: 0;
    IfcPoint = "IFCPOINT",
        supertype: Some(EntityKind::IfcGeometricRepresentationItem), abstract: true, attributes: 0;
    IfcCartesianPoint = "IFCCARTESIANPOINT",
        supertype: Some(EntityKind::IfcPoint), abstract: false, attributes: 1;
    IfcCartesianPointList = "IFCCARTESIANPOINTLIST",
        supertype: Some(EntityKind::IfcGeometricRepresentationItem), abstract: true, attributes: 0;
    IfcCartesianPointList3D = "IFCCARTESIANPOINTLIST3D",
        supertype: Some(EntityKind::IfcCartesianPointList), abstract: false, attributes: 1;
}

impl EntityKind {
    /// Check if this kind is `other` or one of its subtypes
    pub fn is_a(self, other: EntityKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.supertype();
        }
        false
    }

    /// Supertype chain from the root down to this kind
    pub fn lineage(self) -> Vec<EntityKind> {
        let mut chain = vec![self];
        let mut current = self.supertype();
        while let Some(kind) = current {
            chain.push(kind);
            current = kind.supertype();
        }
        chain.reverse();
        chain
    }

    /// Inverse roles whose slot lives on this kind (declared here or inherited)
    pub fn inverse_roles(self) -> impl Iterator<Item = InverseRole> {
        InverseRole::ALL
            .iter()
            .copied()
            .filter(move |role| self.is_a(role.target_kind()))
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown entity type {s}"))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! inverse_roles {
    ($(
        $variant:ident = $name:literal
            on $target:ident from $source:ident, $cardinality:ident;
    )*) => {
        /// A relationship direction and the inverse slot it fills
        ///
        /// Each forward attribute that takes part in an inverse relationship
        /// names exactly one role. The role fixes which slot on the target
        /// receives the back-reference.
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum InverseRole {
            $($variant,)*
        }

        impl InverseRole {
            pub const ALL: &'static [InverseRole] = &[$(InverseRole::$variant,)*];

            /// Inverse attribute name as declared in the schema
            pub fn name(self) -> &'static str {
                match self {
                    $(InverseRole::$variant => $name,)*
                }
            }

            /// Name used for the slot in inverse attribute reflection
            pub fn slot_name(self) -> &'static str {
                match self {
                    $(InverseRole::$variant => concat!($name, "_inverse"),)*
                }
            }

            /// Kind that declares the inverse slot
            pub fn target_kind(self) -> EntityKind {
                match self {
                    $(InverseRole::$variant => EntityKind::$target,)*
                }
            }

            /// Kind that declares the forward attribute
            pub fn source_kind(self) -> EntityKind {
                match self {
                    $(InverseRole::$variant => EntityKind::$source,)*
                }
            }

            /// Slot holds at most one back-reference
            pub fn is_single(self) -> bool {
                match self {
                    $(InverseRole::$variant => inverse_roles!(@single $cardinality),)*
                }
            }
        }
    };
    (@single single) => { true };
    (@single set) => { false };
}

inverse_roles! {
    ActorRoleHasExternalReference = "HasExternalReference"
        on IfcActorRole from IfcExternalReferenceRelationship, set;
    ExternalReferenceForResources = "ExternalReferenceForResources"
        on IfcExternalReference from IfcExternalReferenceRelationship, set;
    ClassificationRefForObjects = "ClassificationRefForObjects"
        on IfcClassificationReference from IfcRelAssociatesClassification, set;
    ClassificationReferenceHasReferences = "HasReferences"
        on IfcClassificationReference from IfcClassificationReference, set;
    ClassificationForObjects = "ClassificationForObjects"
        on IfcClassification from IfcRelAssociatesClassification, set;
    ClassificationHasReferences = "HasReferences"
        on IfcClassification from IfcClassificationReference, set;
    MaterialAssociatedTo = "AssociatedTo"
        on IfcMaterialDefinition from IfcRelAssociatesMaterial, set;
    MaterialHasExternalReferences = "HasExternalReferences"
        on IfcMaterialDefinition from IfcExternalReferenceRelationship, set;
    ToMaterialLayerSet = "ToMaterialLayerSet"
        on IfcMaterialLayer from IfcMaterialLayerSet, single;
    PropertyHasExternalReferences = "HasExternalReferences"
        on IfcPropertyAbstraction from IfcExternalReferenceRelationship, set;
    PartOfPset = "PartOfPset"
        on IfcProperty from IfcPropertySet, set;
    HasAssociations = "HasAssociations"
        on IfcPropertyDefinition from IfcRelAssociates, set;
}

impl fmt::Display for InverseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target_kind().name(), self.name())
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 schema slice for the STEP record codec
//!
//! Entity layers, defined types, enumerations and SELECTs for a slice of
//! IFC4 covering classification, materials, properties, SI units and point
//! geometry. Every entity is a chain of layers, one per EXPRESS supertype,
//! built on the traits of `ifc-step-parser`.
//!
//! # Example
//!
//! ```
//! use ifc_step_model::EntityId;
//! use ifc_step_schema::{parse, IfcClassificationReference};
//!
//! let model = parse(
//!     "#1=IFCCLASSIFICATION($,$,$,'Uniclass',$,$,$);\n\
//!      #2=IFCCLASSIFICATIONREFERENCE($,'Ss_25',$,#1,$,$);",
//! )
//! .unwrap();
//!
//! let reference = model
//!     .graph
//!     .get_as::<IfcClassificationReference>(EntityId(2))
//!     .unwrap();
//! assert_eq!(reference.referenced_source.unwrap().id(), EntityId(1));
//!
//! let inverse = model.graph.inverse_attributes(EntityId(1)).unwrap();
//! assert_eq!(inverse[0].0, "HasReferences_inverse");
//! ```

mod geometry;
mod kernel;
mod material;
mod property;
mod resource;
mod selects;
mod types;
mod units;

pub use geometry::*;
pub use kernel::*;
pub use material::*;
pub use property::*;
pub use resource::*;
pub use selects::*;
pub use types::*;
pub use units::*;

use ifc_step_model::{EntityId, EntityKind, Result};
use ifc_step_parser::{EntityFactory, ParsedModel, StepEntity, StepReader};

/// Entity factory for the IFC4 slice
#[derive(Clone, Copy, Debug, Default)]
pub struct Ifc4Schema;

impl EntityFactory for Ifc4Schema {
    fn create(&self, kind: EntityKind, id: EntityId) -> Option<Box<dyn StepEntity>> {
        let entity: Box<dyn StepEntity> = match kind {
            EntityKind::IfcActorRole => Box::new(IfcActorRole::new(id)),
            EntityKind::IfcClassificationReference => Box::new(IfcClassificationReference::new(id)),
            EntityKind::IfcClassification => Box::new(IfcClassification::new(id)),
            EntityKind::IfcExternalReferenceRelationship => {
                Box::new(IfcExternalReferenceRelationship::new(id))
            }
            EntityKind::IfcMaterial => Box::new(IfcMaterial::new(id)),
            EntityKind::IfcMaterialLayer => Box::new(IfcMaterialLayer::new(id)),
            EntityKind::IfcMaterialLayerSet => Box::new(IfcMaterialLayerSet::new(id)),
            EntityKind::IfcPropertySingleValue => Box::new(IfcPropertySingleValue::new(id)),
            EntityKind::IfcDimensionalExponents => Box::new(IfcDimensionalExponents::new(id)),
            EntityKind::IfcSIUnit => Box::new(IfcSIUnit::new(id)),
            EntityKind::IfcPropertySet => Box::new(IfcPropertySet::new(id)),
            EntityKind::IfcRelAssociatesClassification => {
                Box::new(IfcRelAssociatesClassification::new(id))
            }
            EntityKind::IfcRelAssociatesMaterial => Box::new(IfcRelAssociatesMaterial::new(id)),
            EntityKind::IfcCartesianPoint => Box::new(IfcCartesianPoint::new(id)),
            EntityKind::IfcCartesianPointList3D => Box::new(IfcCartesianPointList3D::new(id)),
            _ => return None,
        };
        Some(entity)
    }
}

/// Lenient load: bad records are skipped, dangling references left empty
pub fn parse(content: &str) -> Result<ParsedModel> {
    load(&StepReader::new(), content)
}

/// Strict load: the first bad record or dangling reference fails the load
pub fn parse_strict(content: &str) -> Result<ParsedModel> {
    load(&StepReader::strict(), content)
}

fn load(reader: &StepReader, content: &str) -> Result<ParsedModel> {
    let model = reader.read(content, &Ifc4Schema)?;
    log::debug!(
        "loaded {} entities, {} skipped, {} unresolved",
        model.graph.len(),
        model.diagnostics.skipped.len(),
        model.diagnostics.unresolved.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_step_model::{AttributeValue, StepError};
    use ifc_step_parser::{
        CopyOptions, EntityGraph, EntityLayer, EntityRef, ErrorPolicy, ReferencePolicy,
        UnresolvedReference,
    };
    use std::sync::{Arc, Mutex};

    const RECORDS: &str = "\
#1=IFCCLASSIFICATION('CSI',$,$,'Uniclass',$,$,$);
#2=IFCCLASSIFICATIONREFERENCE($,'Ss_25',$,#1,$,$);
#3=IFCCLASSIFICATIONREFERENCE($,'Ss_25_10',$,#2,$,$);
#4=IFCMATERIAL('Brick','Ziegel \\X2\\00FC\\X0\\ber','Masonry');
#5=IFCMATERIALLAYER(#4,0.2,.U.,$,$,$,$);
#6=IFCMATERIALLAYER(#4,0.1,$,'Air',$,$,$);
#7=IFCMATERIALLAYERSET((#5,#6),'Wall',$);
#8=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.3),#11);
#9=IFCPROPERTYSET('2O2Fr4t4X7Zf8NOew3FLOH',$,'Pset_WallCommon',$,(#8));
#10=IFCRELASSOCIATESCLASSIFICATION('1kTvXnbbzCWw8lcMd1dR4o',$,$,$,(#9),#3);
#11=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#12=IFCRELASSOCIATESMATERIAL('0Qa6ASq2H0YPxVqS2gU0aV',$,$,$,(#9),#7);
#13=IFCACTORROLE(.ARCHITECT.,'O''Brien',$);
#14=IFCEXTERNALREFERENCERELATIONSHIP('Docs',$,#2,(#13,#4,#8));
#15=IFCCARTESIANPOINT((0.,1.5,2.));
#16=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.)));
";

    fn wrap(records: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');\n\
             FILE_NAME('test.ifc','2024-01-01T00:00:00',(''),(''),'','','');\n\
             FILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{records}ENDSEC;\nEND-ISO-10303-21;\n"
        )
    }

    fn fixture() -> ParsedModel {
        parse(&wrap(RECORDS)).unwrap()
    }

    fn refs(ids: &[u32]) -> AttributeValue {
        AttributeValue::List(
            ids.iter()
                .map(|id| AttributeValue::EntityRef(EntityId(*id)))
                .collect(),
        )
    }

    fn inverse(graph: &EntityGraph, id: u32) -> Vec<(&'static str, AttributeValue)> {
        graph.inverse_attributes(EntityId(id)).unwrap()
    }

    fn names(graph: &EntityGraph, id: u32) -> Vec<&'static str> {
        graph
            .attributes(EntityId(id))
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn test_classification_reference_resolves_source() {
        let model = parse(
            "#1=IFCCLASSIFICATION($,$,$,'Foo',$,$,$);\n#2=IFCCLASSIFICATIONREFERENCE($,$,$,#1,$,$);",
        )
        .unwrap();

        let reference = model
            .graph
            .get_as::<IfcClassificationReference>(EntityId(2))
            .unwrap();
        assert_eq!(
            reference.referenced_source,
            Some(IfcClassificationReferenceSelect::Classification(
                EntityRef::new(EntityId(1))
            ))
        );
        assert_eq!(
            inverse(&model.graph, 1),
            vec![("HasReferences_inverse", refs(&[2]))]
        );
    }

    #[test]
    fn test_defined_type_record_is_not_an_entity() {
        let model =
            parse("#1=IFCLABEL('Foo');\n#2=IFCCLASSIFICATIONREFERENCE($,$,$,#1,$,$);").unwrap();

        assert_eq!(model.graph.len(), 1);
        assert!(matches!(
            model.diagnostics.skipped[0],
            StepError::UnknownEntity { .. }
        ));
        assert_eq!(
            model.diagnostics.unresolved,
            vec![UnresolvedReference {
                entity: EntityId(2),
                attribute: "ReferencedSource",
                target: EntityId(1),
            }]
        );
    }

    #[test]
    fn test_fixture_loads_clean() {
        let model = fixture();
        assert_eq!(model.graph.len(), 16);
        assert!(model.diagnostics.is_clean(), "{:?}", model.diagnostics);

        let material = model.graph.get_as::<IfcMaterial>(EntityId(4)).unwrap();
        assert_eq!(material.description, Some(IfcText::from("Ziegel über")));

        let role = model.graph.get_as::<IfcActorRole>(EntityId(13)).unwrap();
        assert_eq!(role.role, Some(IfcRoleEnum::Architect));
        assert_eq!(role.user_defined_role, Some(IfcLabel::from("O'Brien")));

        let layer = model.graph.get_as::<IfcMaterialLayer>(EntityId(5)).unwrap();
        assert_eq!(layer.is_ventilated, Some(IfcLogical(ifc_step_model::Logical::Unknown)));

        let point = model.graph.get_as::<IfcCartesianPoint>(EntityId(15)).unwrap();
        assert_eq!(point.to_array(), [0.0, 1.5, 2.0]);

        let unit = model.graph.get_as::<IfcSIUnit>(EntityId(11)).unwrap();
        assert_eq!(unit.symbol().as_deref(), Some("mm"));
    }

    #[test]
    fn test_round_trip_is_identity() {
        let model = fixture();
        assert_eq!(model.graph.to_step(), RECORDS);
    }

    #[test]
    fn test_inverse_links_after_load() {
        let graph = fixture().graph;

        assert_eq!(
            inverse(&graph, 2),
            vec![
                ("ExternalReferenceForResources_inverse", refs(&[14])),
                ("HasReferences_inverse", refs(&[3])),
            ]
        );
        assert_eq!(
            inverse(&graph, 3),
            vec![("ClassificationRefForObjects_inverse", refs(&[10]))]
        );
        assert_eq!(
            inverse(&graph, 4),
            vec![("HasExternalReferences_inverse", refs(&[14]))]
        );
        assert_eq!(
            inverse(&graph, 5),
            vec![(
                "ToMaterialLayerSet_inverse",
                AttributeValue::EntityRef(EntityId(7))
            )]
        );
        assert_eq!(
            inverse(&graph, 7),
            vec![("AssociatedTo_inverse", refs(&[12]))]
        );
        assert_eq!(
            inverse(&graph, 8),
            vec![
                ("HasExternalReferences_inverse", refs(&[14])),
                ("PartOfPset_inverse", refs(&[9])),
            ]
        );
        assert_eq!(
            inverse(&graph, 9),
            vec![("HasAssociations_inverse", refs(&[10, 12]))]
        );
        assert_eq!(
            inverse(&graph, 13),
            vec![("HasExternalReference_inverse", refs(&[14]))]
        );
        assert!(inverse(&graph, 15).is_empty());
    }

    #[test]
    fn test_every_forward_link_has_one_back_reference() {
        let graph = fixture().graph;

        for source in graph.iter() {
            for link in source.forward_link_list() {
                let target = graph.get(link.target).unwrap();
                let slot = target.inverse_slot(link.role).unwrap();
                let hits = slot.ids().iter().filter(|id| **id == source.id()).count();
                assert_eq!(hits, 1, "{} -> {} ({})", source.id(), link.target, link.role);
            }
        }
    }

    #[test]
    fn test_link_and_unlink_are_idempotent() {
        let mut graph = fixture().graph;

        graph.set_inverse_counterparts(EntityId(10)).unwrap();
        graph.set_inverse_counterparts(EntityId(10)).unwrap();
        assert_eq!(
            inverse(&graph, 9),
            vec![("HasAssociations_inverse", refs(&[10, 12]))]
        );

        graph.unlink(EntityId(7)).unwrap();
        assert!(inverse(&graph, 5).is_empty());
        assert!(inverse(&graph, 6).is_empty());
        graph.unlink(EntityId(7)).unwrap();
        assert!(inverse(&graph, 5).is_empty());

        graph.set_inverse_counterparts(EntityId(7)).unwrap();
        assert_eq!(
            inverse(&graph, 6),
            vec![(
                "ToMaterialLayerSet_inverse",
                AttributeValue::EntityRef(EntityId(7))
            )]
        );
    }

    #[test]
    fn test_attribute_composition_order() {
        let graph = fixture().graph;

        assert_eq!(
            names(&graph, 10),
            vec![
                "GlobalId",
                "OwnerHistory",
                "Name",
                "Description",
                "RelatedObjects",
                "RelatingClassification",
            ]
        );
        assert_eq!(
            names(&graph, 8),
            vec!["Name", "Description", "NominalValue", "Unit"]
        );
        assert_eq!(
            names(&graph, 11),
            vec!["Dimensions", "UnitType", "Prefix", "Name"]
        );

        let attributes = graph.attributes(EntityId(10)).unwrap();
        assert_eq!(attributes[1].1, AttributeValue::Null);
        assert_eq!(attributes[4].1, refs(&[9]));
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        let graph = fixture().graph;

        // ReferenceTokens is empty, Description is null
        assert_eq!(
            names(&graph, 1),
            vec!["Source", "Edition", "EditionDate", "Name", "Description", "Location"]
        );
    }

    #[test]
    fn test_remove_unlinks_first() {
        let mut graph = fixture().graph;

        let removed = graph.remove(EntityId(12)).unwrap().unwrap();
        assert_eq!(removed.kind(), EntityKind::IfcRelAssociatesMaterial);
        assert!(inverse(&graph, 7).is_empty());
        assert_eq!(
            inverse(&graph, 9),
            vec![("HasAssociations_inverse", refs(&[10]))]
        );

        assert!(graph.remove(EntityId(12)).unwrap().is_none());
    }

    #[test]
    fn test_modify_keeps_inverses_in_sync() {
        let mut graph = fixture().graph;

        graph
            .modify::<IfcMaterialLayerSet, _>(EntityId(7), |set| set.material_layers.truncate(1))
            .unwrap();
        assert!(inverse(&graph, 6).is_empty());
        assert_eq!(inverse(&graph, 5).len(), 1);

        let err = graph
            .modify::<IfcMaterial, _>(EntityId(7), |_| ())
            .unwrap_err();
        assert!(matches!(err, StepError::InvariantViolation(_)));
        assert_eq!(inverse(&graph, 5).len(), 1);
    }

    #[test]
    fn test_collect_dependencies() {
        let graph = fixture().graph;

        let deps: Vec<u32> = graph
            .collect_dependencies(EntityId(10))
            .into_iter()
            .map(|id| id.0)
            .collect();
        assert_eq!(deps, vec![9, 3, 8, 2, 11, 1]);
        assert!(graph.collect_dependencies(EntityId(1)).is_empty());
    }

    #[test]
    fn test_shallow_copy() {
        let mut graph = fixture().graph;

        let copy = graph.copy_entity(EntityId(5), CopyOptions::shallow()).unwrap();
        assert_eq!(copy, EntityId(17));

        let layer = graph.get_as::<IfcMaterialLayer>(copy).unwrap();
        assert_eq!(layer.material.map(|m| m.id()), Some(EntityId(4)));
        assert!(inverse(&graph, 17).is_empty());
        assert_eq!(inverse(&graph, 5).len(), 1);
    }

    #[test]
    fn test_deep_copy_remaps_references() {
        let mut graph = fixture().graph;

        let copy = graph.copy_entity(EntityId(7), CopyOptions::deep()).unwrap();
        assert_eq!(copy, EntityId(17));
        assert_eq!(graph.len(), 20);

        let set = graph.get_as::<IfcMaterialLayerSet>(copy).unwrap();
        let layers: Vec<EntityId> = set.layer_ids().collect();
        assert_eq!(layers, vec![EntityId(18), EntityId(19)]);

        let layer = graph.get_as::<IfcMaterialLayer>(EntityId(18)).unwrap();
        assert_eq!(layer.material.map(|m| m.id()), Some(EntityId(20)));
        assert_eq!(
            inverse(&graph, 18),
            vec![(
                "ToMaterialLayerSet_inverse",
                AttributeValue::EntityRef(EntityId(17))
            )]
        );

        // originals untouched
        assert_eq!(
            inverse(&graph, 5),
            vec![(
                "ToMaterialLayerSet_inverse",
                AttributeValue::EntityRef(EntityId(7))
            )]
        );
        assert!(inverse(&graph, 20).is_empty());
    }

    #[test]
    fn test_insert_with_next_id_links() {
        let mut graph = fixture().graph;

        let id = graph
            .insert_with_next_id(|id| {
                let mut rel = IfcRelAssociatesMaterial::new(id);
                rel.relating_material = Some(IfcMaterialSelect::MaterialDefinition(
                    EntityRef::new(EntityId(4)),
                ));
                Box::new(rel)
            })
            .unwrap();
        assert_eq!(id, EntityId(17));
        assert_eq!(
            inverse(&graph, 4),
            vec![
                ("AssociatedTo_inverse", refs(&[17])),
                ("HasExternalReferences_inverse", refs(&[14])),
            ]
        );
    }

    #[test]
    fn test_inverse_view_drops_dead_ids() {
        let mut graph = EntityGraph::new();
        let mut classification = IfcClassification::new(EntityId(1));
        classification.has_references.insert(EntityId(99));
        graph.insert(Box::new(classification)).unwrap();

        assert!(inverse(&graph, 1).is_empty());
        let raw = graph.get(EntityId(1)).unwrap().inverse_attribute_list();
        assert_eq!(raw, vec![("HasReferences_inverse", refs(&[99]))]);
    }

    #[test]
    fn test_link_to_kind_without_slot_is_invariant_violation() {
        let mut graph = EntityGraph::new();
        graph.insert(Box::new(IfcMaterial::new(EntityId(1)))).unwrap();
        let mut reference = IfcClassificationReference::new(EntityId(2));
        reference.referenced_source = Some(IfcClassificationReferenceSelect::Classification(
            EntityRef::new(EntityId(1)),
        ));
        graph.insert(Box::new(reference)).unwrap();

        let err = graph.set_inverse_counterparts(EntityId(2)).unwrap_err();
        assert!(matches!(err, StepError::InvariantViolation(_)));
    }

    #[test]
    fn test_lenient_missing_reference() {
        let model = parse(
            "#5=IFCMATERIALLAYER($,0.2,$,$,$,$,$);\n\
             #7=IFCMATERIALLAYERSET((#5,#99),'Wall',$);\n\
             #8=IFCCLASSIFICATIONREFERENCE($,$,$,#9,$,$);",
        )
        .unwrap();

        let set = model.graph.get_as::<IfcMaterialLayerSet>(EntityId(7)).unwrap();
        assert_eq!(
            set.material_layers,
            vec![Some(EntityRef::new(EntityId(5))), None]
        );
        let reference = model
            .graph
            .get_as::<IfcClassificationReference>(EntityId(8))
            .unwrap();
        assert_eq!(reference.referenced_source, None);

        assert_eq!(
            serde_json::to_value(&model.diagnostics.unresolved).unwrap(),
            serde_json::json!([
                {"entity": 7, "attribute": "MaterialLayers", "target": 99},
                {"entity": 8, "attribute": "ReferencedSource", "target": 9},
            ])
        );
    }

    #[test]
    fn test_skipped_record_leaves_no_unresolved_behind() {
        let model = parse(
            "#2=IFCMATERIALLAYERSET((#99,'x'),$,$);\n\
             #3=IFCCLASSIFICATIONREFERENCE('loc',$,$,$,$,$);",
        )
        .unwrap();

        assert_eq!(model.graph.ids(), vec![EntityId(3)]);
        assert_eq!(model.diagnostics.skipped.len(), 1);
        assert!(model.diagnostics.unresolved.is_empty());
    }

    #[test]
    fn test_commented_out_records_are_ignored() {
        let model = parse(
            "DATA;\n/* old\n#9=IFCMATERIAL('ghost',$,$);\n*/\n#1=IFCMATERIAL('A',$,$);\nENDSEC;",
        )
        .unwrap();
        assert_eq!(model.graph.ids(), vec![EntityId(1)]);
        assert!(model.diagnostics.skipped.is_empty());
    }

    #[test]
    fn test_record_after_inline_comment_loads() {
        let model = parse("DATA;\n/* c */ #1=IFCMATERIAL('A',$,$);\nENDSEC;").unwrap();
        assert_eq!(model.graph.ids(), vec![EntityId(1)]);
        let material = model.graph.get_as::<IfcMaterial>(EntityId(1)).unwrap();
        assert_eq!(material.name, Some(IfcLabel::from("A")));
    }

    #[test]
    fn test_strict_missing_reference_fails() {
        let err = parse_strict("#2=IFCCLASSIFICATIONREFERENCE($,$,$,#9,$,$);").unwrap_err();
        assert_eq!(err.missing_reference(), Some(EntityId(9)));
        assert_eq!(
            err.to_string(),
            "#2=IFCCLASSIFICATIONREFERENCE attribute 3 (ReferencedSource): Entity #9 not found"
        );
    }

    #[test]
    fn test_strict_references_with_skip_policy() {
        let reader = StepReader::new().with_reference_policy(ReferencePolicy::Strict);
        let model = reader
            .read(
                "#1=IFCMATERIAL('Brick',$,$);\n#2=IFCCLASSIFICATIONREFERENCE($,$,$,#9,$,$);",
                &Ifc4Schema,
            )
            .unwrap();
        assert_eq!(model.graph.ids(), vec![EntityId(1)]);
        assert_eq!(model.diagnostics.skipped[0].missing_reference(), Some(EntityId(9)));
    }

    #[test]
    fn test_malformed_record_policy() {
        let content = "#1=IFCACTORROLE(.NOPE.,$,$);\n#2=IFCMATERIAL('Brick',$,$);";

        let model = parse(content).unwrap();
        assert_eq!(model.graph.ids(), vec![EntityId(2)]);
        assert!(matches!(
            model.diagnostics.skipped[0].root_cause(),
            StepError::MalformedValue { .. }
        ));

        let reader = StepReader::new().with_error_policy(ErrorPolicy::Abort);
        let err = reader.read(content, &Ifc4Schema).unwrap_err();
        assert_eq!(
            err.to_string(),
            "#1=IFCACTORROLE attribute 0 (Role): Malformed value: unknown IfcRoleEnum member .NOPE."
        );
    }

    #[test]
    fn test_wrong_reference_kind_is_malformed() {
        let model =
            parse("#1=IFCMATERIAL('Brick',$,$);\n#2=IFCCLASSIFICATIONREFERENCE($,$,$,#1,$,$);")
                .unwrap();
        assert!(!model.graph.contains(EntityId(2)));
        assert!(matches!(
            model.diagnostics.skipped[0].root_cause(),
            StepError::MalformedValue { .. }
        ));
    }

    #[test]
    fn test_too_few_arguments() {
        let model = parse("#1=IFCMATERIAL('Brick',$);").unwrap();
        assert!(model.graph.is_empty());
        assert_eq!(
            model.diagnostics.skipped[0].to_string(),
            "Entity #1=IFCMATERIAL has 2 arguments, expected 3"
        );
    }

    #[test]
    fn test_too_many_arguments_tolerated() {
        let model = parse("#1=IFCMATERIAL('Brick',$,$,'extra');").unwrap();
        assert_eq!(model.graph.len(), 1);
        assert!(model.diagnostics.skipped.is_empty());
        assert!(matches!(
            model.diagnostics.warnings[0],
            StepError::ArgumentCountMismatch {
                expected: 3,
                actual: 4,
                ..
            }
        ));
        assert_eq!(
            model.graph.to_step(),
            "#1=IFCMATERIAL('Brick',$,$);\n"
        );
    }

    #[test]
    fn test_unknown_abstract_and_duplicate_records() {
        let model = parse(
            "#1=IFCWALL('x',$,$);\n\
             #2=IFCROOT('x',$,$,$);\n\
             #3=IFCMATERIAL('Brick',$,$);\n\
             #3=IFCMATERIAL('Stone',$,$);",
        )
        .unwrap();

        assert_eq!(model.graph.ids(), vec![EntityId(3)]);
        let material = model.graph.get_as::<IfcMaterial>(EntityId(3)).unwrap();
        assert_eq!(material.name, Some(IfcLabel::from("Brick")));

        let skipped = &model.diagnostics.skipped;
        assert_eq!(skipped.len(), 3);
        assert!(matches!(skipped[0], StepError::UnknownEntity { .. }));
        assert!(matches!(skipped[1], StepError::UnknownEntity { .. }));
        assert!(matches!(skipped[2], StepError::DuplicateEntity(EntityId(3))));
    }

    #[test]
    fn test_inverses_on_demand() {
        let reader = StepReader::new().with_inverses(false);
        let mut graph = reader.read(&wrap(RECORDS), &Ifc4Schema).unwrap().graph;
        assert!(inverse(&graph, 9).is_empty());

        graph.resolve_inverse_attributes().unwrap();
        assert_eq!(inverse(&graph, 9).len(), 1);

        graph.unset_inverse_attributes();
        assert!(inverse(&graph, 9).is_empty());
    }

    #[test]
    fn test_progress_phases() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        StepReader::new()
            .read_with_progress(
                &wrap(RECORDS),
                &Ifc4Schema,
                Box::new(move |phase, percent| {
                    if let Ok(mut phases) = sink.lock() {
                        phases.push((phase.to_string(), percent));
                    }
                }),
            )
            .unwrap();

        let phases = phases.lock().unwrap();
        assert_eq!(phases.len(), 4);
        assert_eq!(phases.last(), Some(&("Complete".to_string(), 100.0)));
    }

    #[test]
    fn test_attributes_serialize() {
        let graph = fixture().graph;
        let json = serde_json::to_value(graph.attributes(EntityId(15)).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                ["Coordinates", {"List": [{"Real": 0.0}, {"Real": 1.5}, {"Real": 2.0}]}]
            ])
        );
    }

    #[test]
    fn test_factory_rejects_abstract_kinds() {
        for kind in EntityKind::ALL {
            let entity = Ifc4Schema.create(*kind, EntityId(1));
            assert_eq!(entity.is_some(), !kind.is_abstract(), "{kind}");
            if let Some(entity) = entity {
                assert_eq!(entity.kind(), *kind);
                assert_eq!(entity.id(), EntityId(1));
            }
        }
    }
}

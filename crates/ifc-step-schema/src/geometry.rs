// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point geometry
//!
//! Only the value side of geometry: coordinates are read and written, never
//! evaluated.

use crate::types::IfcLengthMeasure;
use ifc_step_model::{AttributeList, EntityId, Result};
use ifc_step_parser::{
    impl_entity_type, impl_passthrough_layer, impl_step_entity, reflect, ArgumentReader,
    ArgumentWriter, EntityLayer,
};

#[derive(Clone, Debug, Default)]
pub struct IfcRepresentationItem;

impl_entity_type!(IfcRepresentationItem, IfcRepresentationItem);

impl EntityLayer for IfcRepresentationItem {
    fn read_arguments(&mut self, _args: &mut ArgumentReader<'_>) -> Result<()> {
        Ok(())
    }

    fn write_arguments(&self, _args: &mut ArgumentWriter<'_>) {}

    fn attributes(&self, _out: &mut AttributeList) {}
}

#[derive(Clone, Debug, Default)]
pub struct IfcGeometricRepresentationItem {
    pub base: IfcRepresentationItem,
}

impl_entity_type!(IfcGeometricRepresentationItem, IfcGeometricRepresentationItem);
impl_passthrough_layer!(IfcGeometricRepresentationItem);

#[derive(Clone, Debug, Default)]
pub struct IfcPoint {
    pub base: IfcGeometricRepresentationItem,
}

impl_entity_type!(IfcPoint, IfcPoint);
impl_passthrough_layer!(IfcPoint);

/// Point given by one to three coordinates
#[derive(Clone, Debug, Default)]
pub struct IfcCartesianPoint {
    id: EntityId,
    pub base: IfcPoint,
    pub coordinates: Vec<IfcLengthMeasure>,
}

impl_step_entity!(IfcCartesianPoint, IfcCartesianPoint);

impl IfcCartesianPoint {
    /// Coordinates as `[x, y, z]`, missing ones zero
    pub fn to_array(&self) -> [f64; 3] {
        let mut point = [0.0; 3];
        for (slot, coordinate) in point.iter_mut().zip(&self.coordinates) {
            *slot = coordinate.0;
        }
        point
    }
}

impl EntityLayer for IfcCartesianPoint {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.coordinates = args.read("Coordinates")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.coordinates);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "Coordinates", &self.coordinates);
    }
}

#[derive(Clone, Debug, Default)]
pub struct IfcCartesianPointList {
    pub base: IfcGeometricRepresentationItem,
}

impl_entity_type!(IfcCartesianPointList, IfcCartesianPointList);
impl_passthrough_layer!(IfcCartesianPointList);

/// Point list stored as rows of `x, y, z`
#[derive(Clone, Debug, Default)]
pub struct IfcCartesianPointList3D {
    id: EntityId,
    pub base: IfcCartesianPointList,
    pub coord_list: Vec<Vec<IfcLengthMeasure>>,
}

impl_step_entity!(IfcCartesianPointList3D, IfcCartesianPointList3D);

impl EntityLayer for IfcCartesianPointList3D {
    fn read_arguments(&mut self, args: &mut ArgumentReader<'_>) -> Result<()> {
        self.base.read_arguments(args)?;
        self.coord_list = args.read("CoordList")?;
        Ok(())
    }

    fn write_arguments(&self, args: &mut ArgumentWriter<'_>) {
        self.base.write_arguments(args);
        args.write(&self.coord_list);
    }

    fn attributes(&self, out: &mut AttributeList) {
        self.base.attributes(out);
        reflect(out, "CoordList", &self.coord_list);
    }
}

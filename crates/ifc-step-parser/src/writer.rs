// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record writer
//!
//! Produces the DATA section body only; header framing belongs to callers.

use crate::arguments::ArgumentWriter;
use crate::entity::{EntityLayer, StepEntity};
use crate::graph::EntityGraph;

/// Writes entities as `#id=TYPENAME(args);` records
#[derive(Clone, Debug)]
pub struct StepWriter {
    /// Line terminator after each record
    pub line_ending: &'static str,
}

impl Default for StepWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StepWriter {
    pub fn new() -> Self {
        Self { line_ending: "\n" }
    }

    /// Set the line terminator (e.g. `"\r\n"`)
    pub fn with_line_ending(mut self, line_ending: &'static str) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Append one record, without line terminator
    pub fn write_record(&self, entity: &dyn StepEntity, out: &mut String) {
        out.push('#');
        out.push_str(&entity.id().0.to_string());
        out.push('=');
        out.push_str(entity.kind().name());
        out.push('(');
        let mut args = ArgumentWriter::new(out);
        entity.write_arguments(&mut args);
        out.push_str(");");
    }

    pub fn record_to_string(&self, entity: &dyn StepEntity) -> String {
        let mut out = String::new();
        self.write_record(entity, &mut out);
        out
    }

    /// All records of a graph in ascending id order
    pub fn write_graph(&self, graph: &EntityGraph) -> String {
        let mut out = String::with_capacity(graph.len() * 64);
        for entity in graph.iter() {
            self.write_record(entity, &mut out);
            out.push_str(self.line_ending);
        }
        out
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC STEP parser - record codec and entity graph
//!
//! Reads the DATA section of an IFC (ISO 10303-21) file into an
//! [`EntityGraph`], keeps inverse attributes in sync with forward
//! references, and writes the graph back out as STEP records.
//!
//! # Features
//!
//! - **Fast scanning** using `memchr` to locate record boundaries
//! - **Argument tokenization** using `nom` combinators
//! - **Typed attribute codec** through [`StepValue`]
//! - **Inverse attribute linking** with idempotent link and unlink
//! - **Lenient or strict** handling of dangling references
//!
//! Entity types themselves come from a schema crate that implements
//! [`EntityFactory`].
//!
//! # Example
//!
//! ```ignore
//! use ifc_step_parser::StepReader;
//! use ifc_step_schema::Ifc4Schema;
//!
//! let model = StepReader::new().read(content, &Ifc4Schema)?;
//! for id in model.graph.ids() {
//!     println!("{id}: {:?}", model.graph.attributes(id));
//! }
//! ```

mod arguments;
mod entity;
mod graph;
mod parsed;
mod resolver;
mod scalar;
mod scanner;
mod tokenizer;
mod value;
mod writer;

/// Model crate, re-exported for the entity macros
pub use ifc_step_model as model;

pub use arguments::{ArgumentReader, ArgumentWriter, UnresolvedReference};
pub use entity::{
    reflect, reflect_inverse, EntityFactory, EntityLayer, ForwardLink, InverseSlot, StepEntity,
};
pub use graph::{CopyOptions, EntityGraph};
pub use parsed::{Diagnostics, ParsedModel};
pub use resolver::{
    resolve_reference, resolve_reference_list, resolve_reference_list_2d, resolve_token,
    EmptyLookup, EntityRef, EntityType, ReadContext, ReferencePolicy,
};
pub use scalar::{decode_string, encode_string, format_real};
pub use scanner::{EntityIndex, EntityScanner, ScannedRecord};
pub use tokenizer::{parse_record, parse_value, RawRecord, Token};
pub use value::{decode_value, encode_value, StepValue};
pub use writer::StepWriter;

use ifc_step_model::{ProgressCallback, Result};

/// What to do with a record that fails to load
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole load
    Abort,
    /// Leave the record out and note it in the diagnostics
    #[default]
    SkipRecord,
}

/// STEP data section reader
///
/// Loading runs in three passes: scan record boundaries and types,
/// populate every entity from its arguments, then link inverse attributes.
#[derive(Clone, Debug)]
pub struct StepReader {
    pub error_policy: ErrorPolicy,
    pub reference_policy: ReferencePolicy,
    /// Whether to fill inverse attribute slots after loading
    pub resolve_inverses: bool,
}

impl Default for StepReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StepReader {
    /// Lenient reader: skips bad records, leaves dangling references empty
    pub fn new() -> Self {
        Self {
            error_policy: ErrorPolicy::SkipRecord,
            reference_policy: ReferencePolicy::Lenient,
            resolve_inverses: true,
        }
    }

    /// Reader that fails on the first bad record or dangling reference
    pub fn strict() -> Self {
        Self {
            error_policy: ErrorPolicy::Abort,
            reference_policy: ReferencePolicy::Strict,
            resolve_inverses: true,
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    /// Set whether to link inverse attributes
    pub fn with_inverses(mut self, enabled: bool) -> Self {
        self.resolve_inverses = enabled;
        self
    }

    pub fn read(&self, content: &str, factory: &dyn EntityFactory) -> Result<ParsedModel> {
        ParsedModel::load(self, content, factory, None)
    }

    /// Read with progress reporting
    pub fn read_with_progress(
        &self,
        content: &str,
        factory: &dyn EntityFactory,
        on_progress: ProgressCallback,
    ) -> Result<ParsedModel> {
        ParsedModel::load(self, content, factory, Some(on_progress))
    }
}

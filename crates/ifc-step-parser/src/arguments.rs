// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Positional argument access for entity layers

use crate::resolver::ReadContext;
use crate::tokenizer::Token;
use crate::value::StepValue;
use ifc_step_model::{EntityId, EntityKind, Result, StepError};
use serde::Serialize;

/// A reference left empty because its target id does not exist
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub entity: EntityId,
    pub attribute: &'static str,
    pub target: EntityId,
}

/// Sequential reader over one record's arguments
///
/// Each inheritance layer reads its own attributes in declaration order
/// after its base layer has read the inherited ones.
pub struct ArgumentReader<'a> {
    entity: EntityId,
    kind: EntityKind,
    arguments: &'a [Token<'a>],
    position: usize,
    context: &'a ReadContext<'a>,
    unresolved: Vec<UnresolvedReference>,
}

impl<'a> ArgumentReader<'a> {
    pub fn new(
        entity: EntityId,
        kind: EntityKind,
        arguments: &'a [Token<'a>],
        context: &'a ReadContext<'a>,
    ) -> Self {
        Self {
            entity,
            kind,
            arguments,
            position: 0,
            context,
            unresolved: Vec::new(),
        }
    }

    /// Decode the next argument
    ///
    /// Errors carry the record id, the attribute index and its name.
    pub fn read<T: StepValue>(&mut self, name: &'static str) -> Result<T> {
        let index = self.position;
        let token = self.arguments.get(index).ok_or_else(|| self.missing())?;
        self.position += 1;

        let value = match T::decode(token, self.context) {
            Ok(value) => value,
            Err(e) => {
                // References recorded before the failure belong to no record
                self.context.take_unresolved();
                return Err(StepError::attribute(self.entity, self.kind.name(), index, name, e));
            }
        };

        for target in self.context.take_unresolved() {
            log::warn!(
                "{}={} attribute {} ({}): unresolved reference {}",
                self.entity,
                self.kind.name(),
                index,
                name,
                target
            );
            self.unresolved.push(UnresolvedReference {
                entity: self.entity,
                attribute: name,
                target,
            });
        }

        Ok(value)
    }

    /// Skip an attribute a subtype redeclares as derived
    pub fn skip(&mut self, _name: &'static str) -> Result<()> {
        if self.position >= self.arguments.len() {
            return Err(self.missing());
        }
        self.position += 1;
        Ok(())
    }

    /// Error for a record with fewer arguments than its kind declares
    fn missing(&self) -> StepError {
        StepError::ArgumentCountMismatch {
            entity: self.entity,
            type_name: self.kind.name().to_string(),
            expected: self.kind.attribute_count(),
            actual: self.arguments.len(),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Number of arguments consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn into_unresolved(self) -> Vec<UnresolvedReference> {
        self.unresolved
    }
}

/// Comma separated argument writer
pub struct ArgumentWriter<'a> {
    out: &'a mut String,
    count: usize,
}

impl<'a> ArgumentWriter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        Self { out, count: 0 }
    }

    fn separator(&mut self) {
        if self.count > 0 {
            self.out.push(',');
        }
        self.count += 1;
    }

    pub fn write<T: StepValue>(&mut self, value: &T) {
        self.separator();
        value.encode(self.out);
    }

    /// Write `*` for an attribute redeclared as derived
    pub fn write_derived(&mut self) {
        self.separator();
        self.out.push('*');
    }

    /// Number of arguments written so far
    pub fn count(&self) -> usize {
        self.count
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP record decoding and graph maintenance

use crate::EntityId;
use thiserror::Error;

/// Result type alias for codec and graph operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Errors that can occur while reading, resolving or linking STEP records
#[derive(Error, Debug)]
pub enum StepError {
    /// A lexeme cannot be decoded as the expected value type
    #[error("Malformed value: {message}")]
    MalformedValue { message: String },

    /// A record supplies a different number of arguments than its entity declares
    #[error("Entity {entity}={type_name} has {actual} arguments, expected {expected}")]
    ArgumentCountMismatch {
        entity: EntityId,
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// Reference to an id that no record defines
    #[error("Entity {id} not found")]
    MissingReference { id: EntityId },

    /// Internal consistency failure between schema tables and entity layers
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Record type not known to the schema, or abstract
    #[error("Unknown entity type {type_name} for {entity}")]
    UnknownEntity { entity: EntityId, type_name: String },

    /// Two records share the same id
    #[error("Duplicate entity {0}")]
    DuplicateEntity(EntityId),

    /// Record frame is not `#id=TYPE(...);`
    #[error("Invalid STEP format: {0}")]
    InvalidFormat(String),

    /// Field-level failure with the record and attribute that caused it
    #[error("{entity}={type_name} attribute {index} ({name}): {source}")]
    Attribute {
        entity: EntityId,
        type_name: String,
        index: usize,
        name: &'static str,
        #[source]
        source: Box<StepError>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StepError {
    /// Create a new malformed value error
    pub fn malformed(msg: impl Into<String>) -> Self {
        StepError::MalformedValue {
            message: msg.into(),
        }
    }

    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        StepError::InvalidFormat(msg.into())
    }

    /// Create a new invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        StepError::InvariantViolation(msg.into())
    }

    /// Create a missing reference error
    pub fn missing(id: EntityId) -> Self {
        StepError::MissingReference { id }
    }

    /// Wrap a field-level error with its record and attribute position
    pub fn attribute(
        entity: EntityId,
        type_name: impl Into<String>,
        index: usize,
        name: &'static str,
        source: StepError,
    ) -> Self {
        StepError::Attribute {
            entity,
            type_name: type_name.into(),
            index,
            name,
            source: Box::new(source),
        }
    }

    /// The innermost error, with attribute context stripped
    pub fn root_cause(&self) -> &StepError {
        let mut current = self;
        while let StepError::Attribute { source, .. } = current {
            current = source;
        }
        current
    }

    /// Id named by a `MissingReference` root cause
    pub fn missing_reference(&self) -> Option<EntityId> {
        match self.root_cause() {
            StepError::MissingReference { id } => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_context_display() {
        let err = StepError::attribute(
            EntityId(12),
            "IFCCLASSIFICATIONREFERENCE",
            3,
            "ReferencedSource",
            StepError::missing(EntityId(99)),
        );
        assert_eq!(
            err.to_string(),
            "#12=IFCCLASSIFICATIONREFERENCE attribute 3 (ReferencedSource): Entity #99 not found"
        );
        assert_eq!(err.missing_reference(), Some(EntityId(99)));
    }

    #[test]
    fn test_root_cause_nested() {
        let inner = StepError::malformed("bad enum .FOO.");
        let err = StepError::attribute(EntityId(1), "IFCSIUNIT", 1, "UnitType", inner);
        assert!(matches!(err.root_cause(), StepError::MalformedValue { .. }));
        assert_eq!(err.missing_reference(), None);
    }

    #[test]
    fn test_argument_count_message() {
        let err = StepError::ArgumentCountMismatch {
            entity: EntityId(3),
            type_name: "IFCACTORROLE".into(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Entity #3=IFCACTORROLE has 2 arguments, expected 3"
        );
    }
}

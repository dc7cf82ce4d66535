// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-STEP Model - Shared vocabulary for the STEP record codec
//!
//! This crate holds the types that every other layer agrees on: entity
//! identity, the schema's entity table, inverse relationship roles, decoded
//! value shapes and the error taxonomy.
//!
//! # Architecture
//!
//! - [`EntityId`] - instance name of a record (`#123`)
//! - [`EntityKind`] - schema entity tag with supertype and arity tables
//! - [`InverseRole`] - static forward attribute → inverse slot mapping
//! - [`AttributeValue`] - value handle returned by attribute reflection
//! - [`EntityLookup`] - id → kind map consulted while resolving references
//! - [`StepError`] - error taxonomy shared by decode, resolve and link
//!
//! # Example
//!
//! ```
//! use ifc_step_model::{EntityKind, InverseRole};
//!
//! let kind = EntityKind::parse("IFCCLASSIFICATION").unwrap();
//! let roles: Vec<_> = kind.inverse_roles().map(InverseRole::slot_name).collect();
//! assert!(roles.contains(&"HasReferences_inverse"));
//! ```

pub mod error;
pub mod schema;
pub mod traits;
pub mod types;

// Re-export all public types
pub use error::*;
pub use schema::*;
pub use traits::*;
pub use types::*;

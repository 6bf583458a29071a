//! Registry of emergency actions that can be proposed through the multisig.
//!
//! Raw user input is validated once, at the boundary, into a typed [`EmergencyAction`]; each
//! action then lowers into exactly one [`safe_multisig::Call`].

pub mod action;
pub mod error;
pub mod registry;
pub mod schema;

mod contracts;

pub use action::{ActionKind, EmergencyAction};
pub use error::{ActionError, Result};
pub use registry::{ActionRegistry, ActionSpec};
pub use schema::{Field, FieldType};

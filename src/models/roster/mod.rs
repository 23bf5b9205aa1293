pub mod importer;
pub mod parser;
pub mod queries;
pub mod store;
pub mod types;
pub mod validator;

pub use importer::{ImportError, ImportOutcome, ImportPlan, RosterImporter};
pub use parser::{ParseError, parse};
pub use queries::PgRosterStore;
pub use store::{MemoryRosterStore, RosterStore, StoreError};
pub use types::*;
pub use validator::{ValidationReport, validate, validate_for_year};

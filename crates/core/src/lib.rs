//! # BDSA Core
//!
//! Core logic for synchronizing digital pathology slide metadata between a
//! remote Digital Slide Archive (DSA) and the BDSA case/stain/region protocol
//! mapping conventions.
//!
//! This crate contains pure, synchronous, in-memory transforms:
//! - Item, config, template, and batch validation with structured
//!   error/warning reports
//! - Grouping items into per-patient collections
//! - A filter-and-tally processing pass with partial-failure semantics
//! - Name-based source/target/processed comparison reports
//! - Shallow metadata merging with a recomputed synchronization stamp
//! - Naming conventions: template placeholders and lab filename parsing
//!
//! **No transport concerns**: HTTP calls against the DSA server, folder and
//! item CRUD, and upload live in the API-client collaborator, not here.
//! Everything in this crate can be called repeatedly or concurrently on
//! independent inputs; no shared state exists between calls.

pub mod config;
pub mod constants;
pub mod error;
pub mod grouping;
pub mod item;
pub mod merge;
pub mod naming;
pub mod report;
pub mod sync;
pub mod validation;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use grouping::{group_by_patient, GroupingOutcome, PatientGroup};
pub use item::{BdsaLocal, Item};
pub use merge::{merge_with_sync_stamp, ItemUpdate};
pub use naming::{extract_patient_id, generate_standardized_name, parse_filename, ParsedFilename};
pub use report::{generate_report, ReportSummary, SyncReport};
pub use sync::{process_for_sync, SyncOptions, SyncOutcome, SyncStatistics};
pub use validation::{
    is_bdsa_id, is_valid_case_id, is_valid_institution_id, sanitize_name, validate_batch,
    validate_item, validate_naming_template, validate_sync_config, ValidationReport,
};

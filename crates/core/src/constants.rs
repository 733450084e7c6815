//! Format limits and fixed vocabularies shared across the sync core.

/// Maximum length of an item name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// File size above which a warning is emitted (10 GiB).
pub const LARGE_FILE_BYTES: i64 = 10 * 1024 * 1024 * 1024;

/// Batch size above which a warning is emitted.
pub const BATCH_WARNING_SIZE: usize = 1000;

/// Characters that are risky in file and folder names on common filesystems.
pub const RISKY_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// The full set of variables allowed in a naming template.
pub const TEMPLATE_VARIABLES: [&str; 8] = [
    "patientId",
    "region",
    "stain",
    "slideType",
    "institutionId",
    "index",
    "timestamp",
    "originalName",
];

/// Version tag written into every sync stamp.
pub const SYNC_VERSION: &str = "1.0";

//! Analysis passes that turn a parsed file into an accessor model.
//!
//! `scan` finds marked declarations, `signature` renders field types,
//! `imports` keeps the import block minimal and `model` ties them together.

pub mod imports;
pub mod model;
pub mod scan;
pub mod signature;

pub use imports::{ImportUsageTracker, UsedImport};
pub use model::{
    AccessorField, AccessorModel, AccessorModelBuilder, CollisionPolicy, ExportFn, export_ascii, export_title,
};
pub use scan::{DIRECTIVE, ScanResult, scan};

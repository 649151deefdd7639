//! File system access: cataloging, entry metadata and copy execution.

pub mod catalog;
pub mod copy;
pub mod metadata;

pub use catalog::{catalog, Catalog};
pub use copy::{copy_entry, CopyAction};
pub use metadata::{DestAttrs, Entry, EntryKind};

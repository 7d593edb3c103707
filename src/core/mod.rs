//! Migration engine: keys, inventory, replacement, validation and the per-file driver.

pub mod backup;
pub mod driver;
pub mod extract;
pub mod inventory;
pub mod key;
pub mod replace;
pub mod store;
pub mod template;
pub mod validate;

pub use backup::BackupStore;
pub use driver::{FileReport, FileSelection, FileState, MigrationDriver, MigrationSummary};
pub use inventory::{
    ContextKind, InventoryBuilder, InventoryEntry, InventoryError, KeyLookup, LiteralString,
    Provenance, StringInventory,
};
pub use key::{TranslationKey, generate_key, slugify};
pub use replace::{ContextualReplacer, Replacement};
pub use store::KeyedStringStore;
pub use validate::{StructuralError, StructuralValidator, ValidationOutcome};

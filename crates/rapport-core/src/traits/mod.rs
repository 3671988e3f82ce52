mod pattern_storage;

pub use pattern_storage::{IPatternStorage, StorageHealth};

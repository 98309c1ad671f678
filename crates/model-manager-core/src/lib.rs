pub mod category;
pub mod config;
pub mod error;
pub mod mutation;
pub mod query;
pub mod render;
pub mod scanner;
pub mod selection;

pub use config::{resolve_base_dir, Config, ViewMode, DEFAULT_MODEL_DIRS};
pub use error::{ModelManagerError, Result};
pub use mutation::{delete_models, open_containing_folder, DeleteReport};
pub use query::{filter, sort, unique_categories, CategoryFilter, Query, SortKey, ALL_CATEGORIES};
pub use render::{compact_choices, detailed_html, format_size, Choice, Stats};
pub use scanner::{scan, scan_with, ModelFile, ModelLibrary, MODEL_EXTENSIONS};
pub use selection::Selection;

// Category system
pub use category::{
    classify, Category, CategoryClassifier, CategoryRule, RuleConfigEntry, RuleStore,
    BUILTIN_CATEGORIES, GIB,
};

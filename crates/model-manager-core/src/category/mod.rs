//! # Category Module
//!
//! モデルファイルを命名ヒューリスティックでカテゴリ（LoRA, VAE, Checkpoint等）に分類する。
//!
//! ## 設計目的
//!
//! 分類ロジックをif/elseの連鎖ではなく「順序付きルールのリスト」として表現する。
//! ルール表を独立にテスト・拡張でき、制御フローに手を入れずにルールを追加できる。
//!
//! - 最初にマッチしたルールが採用される
//! - パターンは大文字小文字を区別しないGlob（`*marker*`）
//! - サイズ条件は排他的な上限・下限
//!
//! ## モジュール構成
//!
//! - `builtin`: ビルトインカテゴリとルール定義
//! - `store`: ルールのランタイムストア（設定ファイルのルールをマージ）
//! - `classifier`: 分類器
//!
//! ## 使用例
//!
//! ```rust
//! use std::path::Path;
//! use model_manager_core::category::{classify, GIB};
//!
//! let cat = classify("wan_vae.safetensors", Path::new("/ckpts/wan_vae.safetensors"), GIB);
//! assert_eq!(cat.label, "VAE");
//!
//! let cat = classify("flux1-dev.safetensors", Path::new("/ckpts/flux1-dev.safetensors"), 12 * GIB);
//! assert_eq!(cat.label, "Checkpoint");
//! ```
//!
//! ### ユーザー定義ルール
//!
//! ```rust
//! use std::path::Path;
//! use model_manager_core::category::{CategoryClassifier, RuleConfigEntry, RuleStore};
//!
//! let store = RuleStore::builtin().with_config(&[RuleConfigEntry {
//!     category: "ControlNet".to_string(),
//!     name_patterns: vec!["*controlnet*".to_string()],
//!     ..Default::default()
//! }]);
//! let classifier = CategoryClassifier::new(store).unwrap();
//! let cat = classifier.classify("sdxl_controlnet.safetensors", Path::new("/x/sdxl_controlnet.safetensors"), 1);
//! assert_eq!(cat.label, "ControlNet");
//! ```

mod builtin;
mod classifier;
mod store;

// Re-exports
pub use builtin::{
    BuiltinCategory, BuiltinRule, Category, BUILTIN_CATEGORIES, BUILTIN_RULES,
    DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, FALLBACK_CATEGORY, GIB,
};
pub use classifier::{classify, CategoryClassifier};
pub use store::{CategoryRule, RuleConfigEntry, RuleStore};

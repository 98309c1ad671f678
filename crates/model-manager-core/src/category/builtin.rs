//! Builtin Category Definitions
//!
//! コード内で定義されるビルトインカテゴリと分類ルール。
//! ルールは上から順に評価され、最初にマッチしたものが採用される。

use serde::{Deserialize, Serialize};

/// 1 GiB (2^30 bytes)
pub const GIB: u64 = 1 << 30;

/// どのルールにもマッチしなかった場合のカテゴリ名
pub const FALLBACK_CATEGORY: &str = "Model";

/// ユーザー定義カテゴリのデフォルト色
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

/// ユーザー定義カテゴリのデフォルトアイコン
pub const DEFAULT_CATEGORY_ICON: &str = "📄";

/// ビルトインカテゴリ定義（表示色・アイコンは互換性のため固定）
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        label: "LoRA",
        color: "#22c55e",
        icon: "🎨",
    },
    BuiltinCategory {
        label: "VAE",
        color: "#a855f7",
        icon: "🎭",
    },
    BuiltinCategory {
        label: "Text Encoder",
        color: "#f97316",
        icon: "📝",
    },
    BuiltinCategory {
        label: "LLM",
        color: "#06b6d4",
        icon: "🧠",
    },
    BuiltinCategory {
        label: "Upscaler",
        color: "#ec4899",
        icon: "⬆️",
    },
    BuiltinCategory {
        label: "Depth",
        color: "#8b5cf6",
        icon: "🌊",
    },
    BuiltinCategory {
        label: "Audio",
        color: "#f59e0b",
        icon: "🔊",
    },
    BuiltinCategory {
        label: "Segmentation",
        color: "#84cc16",
        icon: "✂️",
    },
    BuiltinCategory {
        label: "Checkpoint",
        color: "#3b82f6",
        icon: "🔷",
    },
    BuiltinCategory {
        label: "Model",
        color: "#60a5fa",
        icon: "📦",
    },
];

const ARCHITECTURE_MARKERS: &[&str] = &["*wan2*", "*ltx*", "*flux*", "*hunyuan*"];

/// ビルトイン分類ルール（評価順）
pub const BUILTIN_RULES: &[BuiltinRule] = &[
    // `lora`/`loras` はフルパス、`_lora` はファイル名に対して判定する
    BuiltinRule {
        category: "LoRA",
        name_patterns: &["*_lora*"],
        path_patterns: &["*lora*", "*loras*"],
        min_size: None,
        max_size: None,
    },
    BuiltinRule::name("VAE", &["*vae*"]),
    BuiltinRule::name(
        "Text Encoder",
        &[
            "*clip*",
            "*text_encoder*",
            "*t5*",
            "*umt5*",
            "*xlm*",
            "*roberta*",
        ],
    ),
    BuiltinRule::name(
        "LLM",
        &["*llama*", "*qwen*", "*gemma*", "*caption*", "*joycaption*"],
    ),
    BuiltinRule::name(
        "Upscaler",
        &["*upscal*", "*esrgan*", "*swinir*", "*flashvsr*"],
    ),
    BuiltinRule::name("Depth", &["*depth*", "*midas*"]),
    BuiltinRule::name("Audio", &["*audio*", "*mmaudio*", "*roformer*"]),
    BuiltinRule::name("Segmentation", &["*sam*", "*segment*"]),
    BuiltinRule {
        category: "Checkpoint",
        name_patterns: ARCHITECTURE_MARKERS,
        path_patterns: &[],
        min_size: Some(5 * GIB),
        max_size: None,
    },
    BuiltinRule::name("Model", ARCHITECTURE_MARKERS),
    // サイズのみのフォールバック
    BuiltinRule::size("Checkpoint", Some(10 * GIB), None),
    BuiltinRule::size("LoRA", None, Some(GIB / 2)),
    BuiltinRule::size(FALLBACK_CATEGORY, None, None),
];

/// ビルトインカテゴリの静的定義
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// 表示ラベル（一意識別子）
    pub label: &'static str,
    /// バッジ色（CSSカラー）
    pub color: &'static str,
    /// アイコン
    pub icon: &'static str,
}

/// ビルトイン分類ルールの静的定義
#[derive(Debug, Clone)]
pub struct BuiltinRule {
    /// マッチ時のカテゴリ名
    pub category: &'static str,
    /// ファイル名に対するGlobパターン
    pub name_patterns: &'static [&'static str],
    /// フルパスに対するGlobパターン
    pub path_patterns: &'static [&'static str],
    /// サイズ下限（この値より大きい場合のみマッチ）
    pub min_size: Option<u64>,
    /// サイズ上限（この値より小さい場合のみマッチ）
    pub max_size: Option<u64>,
}

impl BuiltinRule {
    const fn name(category: &'static str, patterns: &'static [&'static str]) -> Self {
        Self {
            category,
            name_patterns: patterns,
            path_patterns: &[],
            min_size: None,
            max_size: None,
        }
    }

    const fn size(category: &'static str, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        Self {
            category,
            name_patterns: &[],
            path_patterns: &[],
            min_size,
            max_size,
        }
    }
}

/// ランタイムカテゴリ定義
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// 表示ラベル
    pub label: String,
    /// バッジ色
    pub color: String,
    /// アイコン
    pub icon: String,
}

impl Category {
    /// ラベルからカテゴリを解決（未知のラベルはデフォルト色・アイコン）
    pub fn from_label(label: &str) -> Self {
        match BUILTIN_CATEGORIES.iter().find(|b| b.label == label) {
            Some(builtin) => Self::from(builtin),
            None => Self {
                label: label.to_string(),
                color: DEFAULT_CATEGORY_COLOR.to_string(),
                icon: DEFAULT_CATEGORY_ICON.to_string(),
            },
        }
    }
}

impl From<&BuiltinCategory> for Category {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            label: builtin.label.to_string(),
            color: builtin.color.to_string(),
            icon: builtin.icon.to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon, self.label)
    }
}

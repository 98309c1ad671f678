//! Rule Store
//!
//! 分類ルールのランタイムストア。
//! ユーザー定義ルールをビルトインルールの前に配置して保持する。

use serde::{Deserialize, Serialize};

use super::builtin::{BuiltinRule, Category, BUILTIN_RULES};

/// ランタイム分類ルール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// マッチ時のカテゴリ
    pub category: Category,
    /// ファイル名に対するGlobパターン
    pub name_patterns: Vec<String>,
    /// フルパスに対するGlobパターン
    pub path_patterns: Vec<String>,
    /// サイズ下限（排他的）
    pub min_size: Option<u64>,
    /// サイズ上限（排他的）
    pub max_size: Option<u64>,
}

impl From<&BuiltinRule> for CategoryRule {
    fn from(builtin: &BuiltinRule) -> Self {
        Self {
            category: Category::from_label(builtin.category),
            name_patterns: builtin.name_patterns.iter().map(|s| s.to_string()).collect(),
            path_patterns: builtin.path_patterns.iter().map(|s| s.to_string()).collect(),
            min_size: builtin.min_size,
            max_size: builtin.max_size,
        }
    }
}

/// 分類ルールのランタイムストア（評価順を保持）
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<CategoryRule>,
}

impl RuleStore {
    /// ビルトインルールのみで初期化
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.iter().map(CategoryRule::from).collect(),
        }
    }

    /// 設定ファイルのルールを追加
    ///
    /// - ユーザー定義ルールはビルトインより先に評価される
    /// - 設定ファイル内の順序はそのまま維持される
    pub fn with_config(mut self, entries: &[RuleConfigEntry]) -> Self {
        let mut rules: Vec<CategoryRule> = entries.iter().map(RuleConfigEntry::to_rule).collect();
        rules.append(&mut self.rules);
        self.rules = rules;
        self
    }

    /// 全ルールを取得（評価順）
    pub fn all(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// ルールが参照するカテゴリ一覧（重複なし、初出順）
    pub fn categories(&self) -> Vec<&Category> {
        let mut seen: Vec<&Category> = Vec::new();
        for rule in &self.rules {
            if !seen.iter().any(|c| c.label == rule.category.label) {
                seen.push(&rule.category);
            }
        }
        seen
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `config.toml`の`[[rules]]`エントリ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfigEntry {
    /// カテゴリ名
    pub category: String,
    /// バッジ色（省略時はビルトインまたはデフォルト）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// アイコン（省略時はビルトインまたはデフォルト）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// ファイル名に対するGlobパターン
    #[serde(default)]
    pub name_patterns: Vec<String>,
    /// フルパスに対するGlobパターン
    #[serde(default)]
    pub path_patterns: Vec<String>,
    /// サイズ下限（バイト、排他的）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// サイズ上限（バイト、排他的）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

impl RuleConfigEntry {
    fn to_rule(&self) -> CategoryRule {
        let mut category = Category::from_label(&self.category);
        if let Some(color) = &self.color {
            category.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
        CategoryRule {
            category,
            name_patterns: self.name_patterns.clone(),
            path_patterns: self.path_patterns.clone(),
            min_size: self.min_size,
            max_size: self.max_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_store_builtin_order() {
        let store = RuleStore::builtin();
        let first = &store.all()[0];
        assert_eq!(first.category.label, "LoRA");
        assert_eq!(store.all().len(), BUILTIN_RULES.len());
    }

    #[test]
    fn test_rule_store_custom_rules_come_first() {
        let entries = vec![
            RuleConfigEntry {
                category: "ControlNet".to_string(),
                icon: Some("🕹️".to_string()),
                name_patterns: vec!["*controlnet*".to_string()],
                ..Default::default()
            },
            RuleConfigEntry {
                category: "VAE".to_string(),
                name_patterns: vec!["*autoencoder*".to_string()],
                ..Default::default()
            },
        ];
        let store = RuleStore::builtin().with_config(&entries);
        let rules = store.all();

        assert_eq!(rules.len(), BUILTIN_RULES.len() + 2);
        assert_eq!(rules[0].category.label, "ControlNet");
        assert_eq!(rules[0].category.icon, "🕹️");
        // 既知ラベルはビルトインの色を継承
        assert_eq!(rules[1].category.color, "#a855f7");
        assert_eq!(rules[2].category.label, "LoRA");
    }

    #[test]
    fn test_categories_are_unique() {
        let store = RuleStore::builtin();
        let labels: Vec<&str> = store
            .categories()
            .into_iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "LoRA");
        assert!(labels.contains(&"Segmentation"));
    }
}

//! Category Classifier
//!
//! ファイル名・フルパス・サイズからカテゴリを決定する。
//! RuleStoreのルールを順に評価し、最初にマッチしたルールを採用する。

use std::path::Path;

use glob::{MatchOptions, Pattern};
use once_cell::sync::Lazy;

use crate::error::Result;

use super::builtin::{Category, FALLBACK_CATEGORY};
use super::store::{CategoryRule, RuleStore};

/// 大文字小文字を区別しないマッチオプション
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

static BUILTIN_CLASSIFIER: Lazy<CategoryClassifier> = Lazy::new(|| {
    CategoryClassifier::new(RuleStore::builtin()).expect("builtin patterns are valid globs")
});

/// コンパイル済みルール
struct CompiledRule {
    category: Category,
    name_patterns: Vec<Pattern>,
    path_patterns: Vec<Pattern>,
    min_size: Option<u64>,
    max_size: Option<u64>,
}

impl CompiledRule {
    fn compile(rule: &CategoryRule) -> Result<Self> {
        let compile_all = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| Pattern::new(p))
                .collect::<std::result::Result<Vec<_>, _>>()
        };

        Ok(Self {
            category: rule.category.clone(),
            name_patterns: compile_all(&rule.name_patterns)?,
            path_patterns: compile_all(&rule.path_patterns)?,
            min_size: rule.min_size,
            max_size: rule.max_size,
        })
    }

    fn matches(&self, filename: &str, full_path: &str, size_bytes: u64) -> bool {
        if self.min_size.is_some_and(|min| size_bytes <= min) {
            return false;
        }
        if self.max_size.is_some_and(|max| size_bytes >= max) {
            return false;
        }
        if self.name_patterns.is_empty() && self.path_patterns.is_empty() {
            return true;
        }

        self.name_patterns
            .iter()
            .any(|p| p.matches_with(filename, MATCH_OPTIONS))
            || self
                .path_patterns
                .iter()
                .any(|p| p.matches_with(full_path, MATCH_OPTIONS))
    }
}

/// カテゴリ分類器
pub struct CategoryClassifier {
    rules: Vec<CompiledRule>,
    fallback: Category,
}

impl CategoryClassifier {
    /// RuleStoreから分類器を構築
    pub fn new(store: RuleStore) -> Result<Self> {
        let rules = store
            .all()
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            fallback: Category::from_label(FALLBACK_CATEGORY),
        })
    }

    /// ビルトインルールのみの分類器（プロセス内で共有）
    pub fn builtin() -> &'static CategoryClassifier {
        &BUILTIN_CLASSIFIER
    }

    /// ファイルを分類
    ///
    /// 純粋関数：同じ入力に対して常に同じカテゴリを返す。
    pub fn classify(&self, filename: &str, full_path: &Path, size_bytes: u64) -> &Category {
        let full_path = full_path.to_string_lossy();
        self.rules
            .iter()
            .find(|rule| rule.matches(filename, &full_path, size_bytes))
            .map(|rule| &rule.category)
            .unwrap_or(&self.fallback)
    }

    /// ルール数
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// ビルトインルールでファイルを分類
pub fn classify(filename: &str, full_path: &Path, size_bytes: u64) -> &'static Category {
    CategoryClassifier::builtin().classify(filename, full_path, size_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::builtin::GIB;
    use crate::category::store::RuleConfigEntry;

    fn label(name: &str, path: &str, size: u64) -> String {
        classify(name, Path::new(path), size).label.clone()
    }

    #[test]
    fn test_lora_in_path_wins_over_vae_in_name() {
        assert_eq!(
            label("my_vae.safetensors", "/ckpts/loras/my_vae.safetensors", GIB),
            "LoRA"
        );
    }

    #[test]
    fn test_lora_matching_is_case_insensitive() {
        assert_eq!(
            label("style.safetensors", "/ckpts/LoRAs/style.safetensors", 20 * GIB),
            "LoRA"
        );
        assert_eq!(
            label("detail_LORA.pt", "/ckpts/detail_LORA.pt", 20 * GIB),
            "LoRA"
        );
    }

    #[test]
    fn test_name_markers() {
        let cases = [
            ("wan_vae.safetensors", "VAE"),
            ("umt5-xxl-enc.safetensors", "Text Encoder"),
            ("clip_l.safetensors", "Text Encoder"),
            ("Qwen2.5-7B.safetensors", "LLM"),
            ("RealESRGAN_x4.pth", "Upscaler"),
            ("depth_anything.pth", "Depth"),
            ("mmaudio_large.pth", "Audio"),
            ("sam2_hiera.pt", "Segmentation"),
        ];
        for (name, expected) in cases {
            let path = format!("/ckpts/{}", name);
            assert_eq!(label(name, &path, GIB), expected, "{}", name);
        }
    }

    #[test]
    fn test_markers_only_checked_against_filename() {
        // "vae" はディレクトリ名にあってもファイル名になければマッチしない
        assert_eq!(label("plain.safetensors", "/vae/plain.safetensors", GIB), "Model");
    }

    #[test]
    fn test_rule_order_text_encoder_before_llm() {
        // "t5" と "gemma" の両方を含む場合、先に評価されるText Encoderが勝つ
        assert_eq!(
            label("gemma_t5.safetensors", "/ckpts/gemma_t5.safetensors", GIB),
            "Text Encoder"
        );
    }

    #[test]
    fn test_architecture_depends_on_size() {
        let name = "flux1-dev.safetensors";
        let path = "/ckpts/flux1-dev.safetensors";
        assert_eq!(label(name, path, 12 * GIB), "Checkpoint");
        assert_eq!(label(name, path, 5 * GIB), "Model");
        assert_eq!(label(name, path, 5 * GIB + 1), "Checkpoint");
        assert_eq!(label(name, path, 100), "Model");
    }

    #[test]
    fn test_size_fallback_thresholds() {
        let name = "mystery.ckpt";
        let path = "/ckpts/mystery.ckpt";
        assert_eq!(label(name, path, 10 * GIB + 1), "Checkpoint");
        assert_eq!(label(name, path, 10 * GIB), "Model");
        assert_eq!(label(name, path, GIB / 2), "Model");
        assert_eq!(label(name, path, GIB / 2 - 1), "LoRA");
        assert_eq!(label(name, path, 0), "LoRA");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let path = Path::new("/ckpts/hunyuan_video.safetensors");
        let first = classify("hunyuan_video.safetensors", path, 8 * GIB).clone();
        for _ in 0..5 {
            assert_eq!(classify("hunyuan_video.safetensors", path, 8 * GIB), &first);
        }
        assert_eq!(first.color, "#3b82f6");
        assert_eq!(first.icon, "🔷");
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let store = RuleStore::builtin().with_config(&[RuleConfigEntry {
            category: "ControlNet".to_string(),
            name_patterns: vec!["*controlnet*".to_string()],
            ..Default::default()
        }]);
        let classifier = CategoryClassifier::new(store).unwrap();
        let cat = classifier.classify(
            "flux_controlnet_depth.safetensors",
            Path::new("/ckpts/flux_controlnet_depth.safetensors"),
            GIB,
        );
        assert_eq!(cat.label, "ControlNet");
    }

    #[test]
    fn test_invalid_custom_pattern_is_rejected() {
        let store = RuleStore::builtin().with_config(&[RuleConfigEntry {
            category: "Broken".to_string(),
            name_patterns: vec!["[unclosed".to_string()],
            ..Default::default()
        }]);
        assert!(CategoryClassifier::new(store).is_err());
    }
}

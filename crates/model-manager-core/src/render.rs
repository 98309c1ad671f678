//! Presentation of filtered model lists.
//!
//! Two views over the same filtered and sorted sequence:
//!
//! - **Compact**: `(label, path)` choices for a selectable option list
//! - **Detailed**: an HTML fragment with one row per model
//!
//! plus the aggregate [`Stats`] shown above either view.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::ModelFile;
use crate::selection::Selection;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

const LIST_STYLE: &str = "<style>
.mm-list{max-height:450px;overflow-y:auto;border:1px solid #374151;border-radius:10px;background:#1f2937;}
.mm-item{display:flex;align-items:center;padding:12px 16px;border-bottom:1px solid #374151;gap:12px;}
.mm-item:last-child{border-bottom:none;}
.mm-item:hover{background:#2d3748;}
.mm-item.sel{background:rgba(59,130,246,0.15);}
.mm-cb{width:18px;height:18px;accent-color:#3b82f6;}
.mm-info{flex:1;min-width:0;}
.mm-name{font-weight:600;color:#fff;font-size:0.9em;}
.mm-path{font-size:0.7em;color:#9ca3af;margin-top:2px;}
.mm-type{padding:3px 8px;border-radius:4px;font-size:0.7em;font-weight:600;}
.mm-date{font-size:0.7em;color:#6b7280;min-width:90px;}
.mm-size{font-weight:700;color:#60a5fa;font-size:0.9em;min-width:70px;text-align:right;}
</style>";

/// Placeholder emitted by the detailed view when nothing matches
pub const EMPTY_LIST_HTML: &str =
    "<div style='color:#888;padding:40px;text-align:center;'>📭 No models found</div>";

/// Format a byte count with binary units
///
/// ```
/// use model_manager_core::render::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(2048), "2.0 KB");
/// assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
/// ```
pub fn format_size(size_bytes: u64) -> String {
    if size_bytes < KIB {
        format!("{} B", size_bytes)
    } else if size_bytes < MIB {
        format!("{:.1} KB", size_bytes as f64 / KIB as f64)
    } else if size_bytes < GIB {
        format!("{:.1} MB", size_bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", size_bytes as f64 / GIB as f64)
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One selectable option in the compact view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// `"<icon> <name> | <size>"`
    pub label: String,
    /// Stable identifying value
    pub path: PathBuf,
}

/// Compact view: one choice per model, in the given order
pub fn compact_choices(models: &[&ModelFile]) -> Vec<Choice> {
    models
        .iter()
        .map(|m| Choice {
            label: format!("{} {} | {}", m.category.icon, m.name, m.size_display()),
            path: m.path.clone(),
        })
        .collect()
}

/// Detailed view: styled, scrollable HTML list
///
/// Row checkboxes reflect `selection`; each row carries the model path in a
/// `data-path` attribute for the host to wire up.
pub fn detailed_html(models: &[&ModelFile], selection: &Selection) -> String {
    if models.is_empty() {
        return EMPTY_LIST_HTML.to_string();
    }

    let mut html = String::from(LIST_STYLE);
    html.push_str("<div class=\"mm-list\">");

    for m in models {
        let selected = selection.contains(&m.path);
        let _ = write!(
            html,
            "<div class=\"mm-item{sel}\" data-path=\"{path}\">\
             <input type=\"checkbox\" class=\"mm-cb\"{checked}>\
             <div class=\"mm-info\"><div class=\"mm-name\">{name}</div>\
             <div class=\"mm-path\">📁 {rel}</div></div>\
             <span class=\"mm-type\" style=\"background:{color};color:white;\">{icon} {label}</span>\
             <span class=\"mm-date\">📅 {date}</span>\
             <span class=\"mm-size\">{size}</span>\
             </div>",
            sel = if selected { " sel" } else { "" },
            checked = if selected { " checked" } else { "" },
            path = escape_html(&m.path.to_string_lossy()),
            name = escape_html(&m.name),
            rel = escape_html(&m.relative_path.to_string_lossy()),
            color = escape_html(&m.category.color),
            icon = escape_html(&m.category.icon),
            label = escape_html(&m.category.label),
            date = m.modified_display(),
            size = m.size_display(),
        );
    }

    html.push_str("</div>");
    html
}

/// Aggregate figures for the summary strip
///
/// Selected figures only count selected paths that are part of `models`;
/// a selected path hidden by the current filter adds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of models in the filtered view
    pub count: usize,
    /// Total size of the filtered view
    pub total_size: u64,
    /// Number of selected models within the filtered view
    pub selected_count: usize,
    /// Total size of the selected models within the filtered view
    pub selected_size: u64,
}

impl Stats {
    pub fn compute(models: &[&ModelFile], selection: &Selection) -> Self {
        models.iter().fold(Self::default(), |mut stats, m| {
            stats.count += 1;
            stats.total_size += m.size_bytes;
            if selection.contains(&m.path) {
                stats.selected_count += 1;
                stats.selected_size += m.size_bytes;
            }
            stats
        })
    }

    /// Labeled figures in display order
    pub fn labeled(&self) -> [(&'static str, String); 4] {
        [
            ("Models", format!("📦 {}", self.count)),
            ("Total", format!("💾 {}", format_size(self.total_size))),
            ("Selected", format!("✅ {}", self.selected_count)),
            ("To Delete", format!("🗑️ {}", format_size(self.selected_size))),
        ]
    }

    /// HTML summary strip
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<div style=\"display:flex;gap:30px;padding:12px 20px;\
             background:linear-gradient(135deg,#1e3a5f,#2d4a6f);border-radius:10px;\
             color:white;margin-bottom:10px;\">",
        );
        for (label, value) in self.labeled() {
            let _ = write!(
                html,
                "<div style=\"text-align:center;\">\
                 <div style=\"font-size:1.3em;font-weight:700;\">{}</div>\
                 <div style=\"font-size:0.75em;opacity:0.8;\">{}</div></div>",
                value, label
            );
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::model;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(1024 * 1024 * 1024 + 512 * 1024 * 1024), "1.50 GB");
    }

    #[test]
    fn test_compact_choices_keep_order_and_path() {
        let a = model("a_vae.safetensors", 2048, 0, "VAE");
        let b = model("b.pt", 10, 0, "LoRA");
        let choices = compact_choices(&[&b, &a]);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, "🎨 b.pt | 10 B");
        assert_eq!(choices[1].label, "🎭 a_vae.safetensors | 2.0 KB");
        assert_eq!(choices[1].path, a.path);
    }

    #[test]
    fn test_detailed_html_marks_selection() {
        let a = model("a.pt", 10, 5, "Model");
        let b = model("b.pt", 20, 5, "Model");
        let sel: Selection = [a.path.clone()].into_iter().collect();

        let html = detailed_html(&[&a, &b], &sel);
        assert_eq!(html.matches("class=\"mm-item sel\"").count(), 1);
        assert_eq!(html.matches(" checked>").count(), 1);
        assert!(html.contains("📅 2025-03-01 12:05"));
        assert!(html.contains("background:#60a5fa"));
        assert!(html.contains("📦 Model"));
    }

    #[test]
    fn test_detailed_html_escapes_names() {
        let m = model("<script>.pt", 1, 0, "Model");
        let html = detailed_html(&[&m], &Selection::new());
        assert!(html.contains("&lt;script&gt;.pt"));
        assert!(!html.contains("<script>.pt"));
    }

    #[test]
    fn test_detailed_html_empty_placeholder() {
        assert_eq!(detailed_html(&[], &Selection::new()), EMPTY_LIST_HTML);
    }

    #[test]
    fn test_stats_ignore_selection_hidden_by_filter() {
        let a = model("a.pt", 100, 0, "Model");
        let b = model("b.pt", 50, 0, "LoRA");
        let sel: Selection = [a.path.clone(), b.path.clone()].into_iter().collect();

        let stats = Stats::compute(&[&a], &sel);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.selected_count, 1);
        assert_eq!(stats.selected_size, 100);
    }

    #[test]
    fn test_stats_compute() {
        let a = model("a.pt", 100, 0, "Model");
        let b = model("b.pt", 50, 0, "Model");
        let c = model("c.pt", 25, 0, "Model");
        let sel: Selection = [a.path.clone(), c.path.clone(), PathBuf::from("/elsewhere.pt")]
            .into_iter()
            .collect();

        let stats = Stats::compute(&[&a, &b, &c], &sel);
        assert_eq!(
            stats,
            Stats {
                count: 3,
                total_size: 175,
                selected_count: 2,
                selected_size: 125,
            }
        );

        let html = stats.to_html();
        assert!(html.contains("📦 3"));
        assert!(html.contains("🗑️ 125 B"));
    }
}

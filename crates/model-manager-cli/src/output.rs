//! Terminal rendering of model lists.

use colored::{ColoredString, Colorize};

use model_manager_core::{Category, ModelFile, Selection, Stats};

/// Colorize a category badge according to its label
fn badge(category: &Category) -> ColoredString {
    let text = format!("{} {}", category.icon, category.label);
    match category.label.as_str() {
        "LoRA" | "Segmentation" => text.green(),
        "VAE" | "Depth" => text.magenta(),
        "Text Encoder" | "Audio" => text.yellow(),
        "LLM" => text.cyan(),
        "Upscaler" => text.bright_red(),
        "Checkpoint" => text.blue().bold(),
        "Model" => text.bright_blue(),
        _ => text.normal(),
    }
}

pub fn print_table(models: &[&ModelFile], selection: &Selection) {
    if models.is_empty() {
        println!("{}", "📭 No models found".dimmed());
        return;
    }

    let name_width = models
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(60);

    for m in models {
        let marker = if selection.contains(&m.path) {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        println!(
            "{} {:<width$}  {:>10}  {}  {}",
            marker,
            m.name,
            m.size_display().bold(),
            m.modified_display().dimmed(),
            badge(&m.category),
            width = name_width
        );
        println!("    {}", format!("📁 {}", m.relative_path.display()).dimmed());
    }
}

pub fn print_stats(stats: &Stats) {
    let line = stats
        .labeled()
        .iter()
        .map(|(label, value)| format!("{} {}", value.bold(), label.dimmed()))
        .collect::<Vec<_>>()
        .join("   ");
    println!("{}", line);
}

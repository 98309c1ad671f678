use std::path::PathBuf;

use eframe::egui;

use model_manager_core::{
    compact_choices, delete_models, format_size, open_containing_folder, unique_categories,
    CategoryFilter, Config, ModelFile, ModelLibrary, ModelManagerError,
    Query, Result, Selection, SortKey, Stats, ViewMode, ALL_CATEGORIES,
};

pub fn run(base_dir: PathBuf, cli_roots: Vec<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([520.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Model Manager",
        options,
        Box::new(move |cc| Ok(Box::new(ModelManagerApp::new(cc, base_dir, cli_roots)))),
    )
    .map_err(|e| ModelManagerError::Gui(e.to_string()))?;

    Ok(())
}

enum MessageType {
    Success,
    Error,
    Info,
}

/// Deferred user action, run after the frame's borrows of the scan cache end
enum Action {
    Refresh,
    ConfirmDelete,
    Delete,
    CancelDelete,
    OpenFolder,
    AddRoot,
}

struct ModelManagerApp {
    roots: Vec<PathBuf>,
    library: ModelLibrary,
    category_choices: Vec<String>,
    search: String,
    category: String,
    sort: SortKey,
    view: ViewMode,
    selection: Selection,
    confirm_delete: bool,
    status_message: Option<(String, MessageType)>,
}

impl ModelManagerApp {
    fn new(_cc: &eframe::CreationContext<'_>, base_dir: PathBuf, cli_roots: Vec<PathBuf>) -> Self {
        let mut status_message = None;

        let config = Config::load(&base_dir).unwrap_or_else(|e| {
            status_message = Some((format!("Config error: {e}"), MessageType::Error));
            Config::default()
        });
        let library = match config.classifier() {
            Ok(classifier) => ModelLibrary::with_classifier(classifier),
            Err(e) => {
                status_message = Some((format!("Rule error: {e}"), MessageType::Error));
                ModelLibrary::new()
            }
        };
        let roots = if cli_roots.is_empty() {
            config.model_dirs()
        } else {
            cli_roots
        };

        let mut app = Self {
            roots,
            library,
            category_choices: vec![ALL_CATEGORIES.to_string()],
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort: config.display.sort,
            view: config.display.view,
            selection: Selection::new(),
            confirm_delete: false,
            status_message: None,
        };
        app.refresh();
        app.status_message = status_message;
        app
    }

    fn refresh(&mut self) {
        self.library.refresh(&self.roots);
        self.category_choices = unique_categories(self.library.models());
        if !self.category_choices.contains(&self.category) {
            self.category = ALL_CATEGORIES.to_string();
        }
        self.selection.clear();
        self.status_message = None;
    }

    fn query(&self) -> Query {
        Query::new()
            .search(self.search.as_str())
            .category(self.category.parse::<CategoryFilter>().unwrap_or_default())
            .sort(self.sort)
    }

    fn delete_selected(&mut self) {
        let paths = self.selection.to_vec();
        let (message, kind) = match delete_models(&paths) {
            Ok(report) if report.has_errors() => (report.to_string(), MessageType::Error),
            Ok(report) => (report.to_string(), MessageType::Success),
            Err(e) => (format!("❌ {e}"), MessageType::Error),
        };
        self.refresh();
        self.status_message = Some((message, kind));
    }

    /// Reveal the first selected model, in path order
    fn open_selected(&mut self) {
        self.status_message = Some(match self.selection.first() {
            None => ("❌ Select a model first".to_string(), MessageType::Error),
            Some(path) => match open_containing_folder(path) {
                Ok(folder) => (format!("✅ Opened: {}", folder.display()), MessageType::Success),
                Err(e) => (format!("❌ {e}"), MessageType::Error),
            },
        });
    }

    fn add_root(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            if !self.roots.contains(&path) {
                self.roots.push(path.clone());
            }
            self.refresh();
            self.status_message = Some((
                format!("Added scan folder {}", path.display()),
                MessageType::Info,
            ));
        }
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::Refresh => {
                self.refresh();
                self.status_message = Some((
                    format!("Found {} models", self.library.len()),
                    MessageType::Info,
                ));
            }
            Action::ConfirmDelete => self.confirm_delete = true,
            Action::Delete => {
                self.confirm_delete = false;
                self.delete_selected();
            }
            Action::CancelDelete => self.confirm_delete = false,
            Action::OpenFolder => self.open_selected(),
            Action::AddRoot => self.add_root(),
        }
    }
}

fn badge_color(hex: &str) -> egui::Color32 {
    egui::Color32::from_hex(hex).unwrap_or(egui::Color32::GRAY)
}

fn category_badge(ui: &mut egui::Ui, model: &ModelFile) {
    let text = format!(" {} {} ", model.category.icon, model.category.label);
    ui.label(
        egui::RichText::new(text)
            .small()
            .strong()
            .color(egui::Color32::WHITE)
            .background_color(badge_color(&model.category.color)),
    );
}

fn compact_view(ui: &mut egui::Ui, models: &[&ModelFile], selection: &mut Selection) {
    for choice in compact_choices(models) {
        let mut checked = selection.contains(&choice.path);
        if ui.checkbox(&mut checked, &choice.label).changed() {
            selection.set(&choice.path, checked);
        }
    }
}

fn detailed_view(ui: &mut egui::Ui, models: &[&ModelFile], selection: &mut Selection) {
    egui::Grid::new("model_list")
        .striped(true)
        .num_columns(5)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for model in models {
                let mut checked = selection.contains(&model.path);
                if ui.checkbox(&mut checked, "").changed() {
                    selection.set(&model.path, checked);
                }
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&model.name).strong());
                    ui.label(
                        egui::RichText::new(format!("📁 {}", model.relative_path.display()))
                            .small()
                            .weak(),
                    );
                });
                category_badge(ui, model);
                ui.label(egui::RichText::new(format!("📅 {}", model.modified_display())).small());
                ui.label(
                    egui::RichText::new(model.size_display())
                        .strong()
                        .color(egui::Color32::from_rgb(0x60, 0xa5, 0xfa)),
                );
                ui.end_row();
            }
        });
}

impl eframe::App for ModelManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action: Option<Action> = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("📦 Model Manager");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🔄").on_hover_text("Rescan").clicked() {
                        action = Some(Action::Refresh);
                    }
                    if ui.button("Add folder…").clicked() {
                        action = Some(Action::AddRoot);
                    }
                });
            });
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("🔍");
                ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Filter by name...")
                        .desired_width(220.0),
                );

                egui::ComboBox::from_id_salt("category")
                    .selected_text(format!("🏷️ {}", self.category))
                    .show_ui(ui, |ui| {
                        for choice in &self.category_choices {
                            ui.selectable_value(&mut self.category, choice.clone(), choice);
                        }
                    });

                egui::ComboBox::from_id_salt("sort")
                    .selected_text(self.sort.label())
                    .show_ui(ui, |ui| {
                        for key in SortKey::all() {
                            ui.selectable_value(&mut self.sort, *key, key.label());
                        }
                    });

                ui.selectable_value(&mut self.view, ViewMode::Compact, "📊 Grid");
                ui.selectable_value(&mut self.view, ViewMode::Detailed, "📋 List");
            });
            ui.add_space(8.0);
        });

        let query = self.query();
        let visible = query.apply(self.library.models());
        self.selection.retain_visible(&visible);
        let stats = Stats::compute(&visible, &self.selection);

        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("📂 Open Folder").clicked() {
                    action = Some(Action::OpenFolder);
                }
                let delete = ui.add_enabled(
                    !self.selection.is_empty(),
                    egui::Button::new("🗑️ Delete Selected"),
                );
                if delete.clicked() {
                    action = Some(Action::ConfirmDelete);
                }
                ui.label(
                    egui::RichText::new("Deletion is permanent: files do NOT go to the recycle bin.")
                        .small()
                        .weak(),
                );
            });

            let mut clear_status = false;
            if let Some((msg, msg_type)) = &self.status_message {
                let color = match msg_type {
                    MessageType::Success => egui::Color32::GREEN,
                    MessageType::Error => egui::Color32::RED,
                    MessageType::Info => egui::Color32::LIGHT_BLUE,
                };
                ui.separator();
                ui.horizontal(|ui| {
                    ui.colored_label(color, msg.clone());
                    if ui.small_button("x").clicked() {
                        clear_status = true;
                    }
                });
            }
            if clear_status {
                self.status_message = None;
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (label, value) in stats.labeled() {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(value).size(18.0).strong());
                        ui.label(egui::RichText::new(label).small().weak());
                    });
                    ui.add_space(24.0);
                }
            });
            ui.separator();

            if visible.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(80.0);
                    ui.heading("📭 No models found");
                    if self.roots.is_empty() {
                        ui.label("No scan folders exist. Use \"Add folder…\" or set scan.roots:");
                        ui.code("model-manager config set scan.roots /path/to/ckpts");
                    }
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.view {
                    ViewMode::Compact => compact_view(ui, &visible, &mut self.selection),
                    ViewMode::Detailed => detailed_view(ui, &visible, &mut self.selection),
                });
        });

        if self.confirm_delete {
            egui::Window::new("Confirm delete")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!(
                        "Permanently delete {} files ({})?",
                        stats.selected_count,
                        format_size(stats.selected_size)
                    ));
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui
                            .button(egui::RichText::new("Delete").color(egui::Color32::RED))
                            .clicked()
                        {
                            action = Some(Action::Delete);
                        }
                        if ui.button("Cancel").clicked() {
                            action = Some(Action::CancelDelete);
                        }
                    });
                });
        }

        if let Some(action) = action {
            self.run(action);
        }
    }
}

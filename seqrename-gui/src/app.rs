use crate::picker::RfdPicker;
use crate::session::Session;
use eframe::egui;
use seqrename_core::{RenameConfig, FILTERS};

pub struct SeqRenameApp {
    session: Session,
    picker: RfdPicker,
}

impl SeqRenameApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: Session::new(RenameConfig::default()),
            picker: RfdPicker,
        }
    }

    fn render_source_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Directory:");
            ui.add_enabled(
                !self.session.is_busy(),
                egui::TextEdit::singleline(&mut self.session.directory).desired_width(420.0),
            );

            let selected = FILTERS[self.session.filter_index].name;
            ui.add_enabled_ui(!self.session.is_busy(), |ui| {
                egui::ComboBox::from_label("File type")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for (i, filter) in FILTERS.iter().enumerate() {
                            ui.selectable_value(
                                &mut self.session.filter_index,
                                i,
                                format!("{} ({})", filter.name, filter.pattern()),
                            );
                        }
                    });
            });

            if ui
                .add_enabled(!self.session.is_busy(), egui::Button::new("📁 Load Files"))
                .on_hover_text("Choose the files to rename")
                .clicked()
            {
                self.session.load(&self.picker);
            }

            ui.separator();
            ui.label("Extension:");
            ui.strong(self.session.extension_label());
        });
    }

    fn render_rename_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Prefix:");
            ui.add_enabled(
                !self.session.is_busy(),
                egui::TextEdit::singleline(&mut self.session.prefix)
                    .hint_text("e.g. holiday_")
                    .desired_width(240.0),
            );

            let rename_button =
                egui::Button::new(format!("✅ Rename {} Files", self.session.pending().len()));
            if ui
                .add_enabled(self.session.can_rename(), rename_button)
                .on_hover_text("Rename the pending files to <prefix><number>.<extension>")
                .clicked()
            {
                self.session.rename();
            }

            if ui
                .add_enabled(self.session.is_busy(), egui::Button::new("⏹ Cancel"))
                .clicked()
            {
                self.session.cancel();
            }
        });
    }

    fn render_dual_panes(&self, ui: &mut egui::Ui) {
        let pending = self.session.pending_names();
        // The preview is only meaningful while nothing is moving
        let preview = if self.session.is_busy() {
            Vec::new()
        } else {
            self.session.preview()
        };

        ui.columns(2, |columns| {
            columns[0].strong(format!("Files to rename ({})", pending.len()));
            columns[0].push_id("pending_list", |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (i, name) in pending.iter().enumerate() {
                        ui.horizontal(|ui| {
                            ui.label(name.as_str());
                            if let Some(new_name) = preview.get(i) {
                                ui.colored_label(egui::Color32::LIGHT_BLUE, format!("→ {}", new_name));
                            }
                        });
                    }
                });
            });

            columns[1].strong(format!("Renamed files ({})", self.session.renamed().len()));
            columns[1].push_id("renamed_list", |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for path in self.session.renamed() {
                        ui.colored_label(egui::Color32::GREEN, path.as_str());
                    }
                });
            });
        });
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            if self.session.is_busy() {
                ui.spinner();
            }
            if let Some(error) = self.session.error_message() {
                ui.colored_label(egui::Color32::RED, format!("❌ {}", error));
            } else if let Some(status) = self.session.status_message() {
                ui.label(format!("ℹ️ {}", status));
            }
        });

        let fraction = f32::from(self.session.progress()) / 100.0;
        ui.add(egui::ProgressBar::new(fraction).show_percentage());
    }
}

impl eframe::App for SeqRenameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up what the worker reported since the last frame
        self.session.poll();
        if self.session.is_busy() {
            ctx.request_repaint(); // Keep refreshing while renaming
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("seqrename - Sequential File Renamer");
            ui.add_space(10.0);

            self.render_source_controls(ui);
            ui.add_space(6.0);
            self.render_rename_controls(ui);
            ui.add_space(10.0);

            if self.session.pending().is_empty() && self.session.renamed().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Load some files to begin");
                });
            } else {
                self.render_dual_panes(ui);
            }
        });
    }
}

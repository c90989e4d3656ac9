use crate::app::{BseDashApp, SnapshotSource};

pub fn render(ui: &mut egui::Ui, app: &mut BseDashApp) {
    ui.vertical(|ui| {
        ui.add_space(10.0);

        ui.heading("Snapshots");

        ui.add_space(10.0);
        ui.separator();

        let mut sources: Vec<SnapshotSource> = app
            .snapshots
            .iter()
            .cloned()
            .map(SnapshotSource::Dated)
            .collect();
        sources.push(SnapshotSource::Sample(app.config.sample_file()));

        let mut to_load: Option<SnapshotSource> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for source in sources {
                ui.add_space(5.0);

                let selected = source == app.source;
                if ui.selectable_label(selected, source.label()).clicked() && !selected {
                    to_load = Some(source);
                }
            }
        });

        if let Some(source) = to_load {
            app.load_snapshot(source);
        }

        if app.snapshots.is_empty() {
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(format!("No dated files in {}", app.config.data_dir.display()))
                    .small()
                    .color(egui::Color32::GRAY),
            );
        }
    });
}

use crate::app::BseDashApp;
use crate::ui::{change_color, price_chart};
use bsedash_data::metrics::{format_percent, format_signed_percent};
use bsedash_data::BhavCopy;

const PREVIEW_ROWS: usize = 5;

pub fn render(ui: &mut egui::Ui, app: &mut BseDashApp) {
    ui.heading("📂 Bhav Copy");
    ui.label(
        egui::RichText::new(format!(
            "{} ({})",
            app.source.label(),
            app.source.path().display()
        ))
        .small()
        .color(egui::Color32::GRAY),
    );
    ui.add_space(10.0);

    let table = match &app.table {
        Some(Ok(table)) => table,
        Some(Err(e)) => {
            ui.colored_label(
                egui::Color32::RED,
                format!("⚠ Could not load Bhav Copy: {}", e),
            );
            return;
        }
        None => {
            ui.label("No snapshot loaded.");
            return;
        }
    };

    ui.strong(format!("Raw Data (Top {} Rows)", PREVIEW_ROWS));
    ui.push_id("bhav_preview", |ui| {
        egui::ScrollArea::horizontal().show(ui, |ui| {
            render_preview(ui, table);
        });
    });
    ui.add_space(10.0);

    let missing = table.missing_columns();
    if !missing.is_empty() {
        ui.colored_label(
            egui::Color32::YELLOW,
            format!("⚠ Required columns not found: {}", missing.join(", ")),
        );
        return;
    }

    let mut selected = app.selected_instrument.clone();
    egui::ComboBox::from_id_salt("bhav_instrument")
        .selected_text(selected.clone().unwrap_or_else(|| "Select a stock".to_string()))
        .width(350.0)
        .show_ui(ui, |ui| {
            for name in &app.instruments {
                ui.selectable_value(&mut selected, Some(name.clone()), name.as_str());
            }
        });

    if let Some(name) = selected.as_deref() {
        ui.add_space(10.0);
        render_metric(ui, table, name);
    }

    app.selected_instrument = selected;
}

fn render_preview(ui: &mut egui::Ui, table: &BhavCopy) {
    use egui_extras::{Column, TableBuilder};

    let headers = table.headers();
    let rows = table.head(PREVIEW_ROWS);

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), headers.len())
        .header(24.0, |mut header| {
            for h in &headers {
                header.col(|ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|body| {
            body.rows(22.0, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}

fn render_metric(ui: &mut egui::Ui, table: &BhavCopy, name: &str) {
    let row = match table.find(name) {
        Ok(row) => row,
        Err(e) => {
            ui.colored_label(egui::Color32::YELLOW, format!("⚠ {}", e));
            return;
        }
    };

    ui.heading(format!("📊 {} (Bhav Copy Data)", row.name));

    match row.change_percent() {
        Ok(change) => {
            ui.horizontal(|ui| {
                ui.label("Percentage Change");
                ui.strong(format_percent(change));
                ui.colored_label(change_color(ui, change), format_signed_percent(change));
            });
        }
        Err(e) => {
            ui.colored_label(
                egui::Color32::YELLOW,
                format!("⚠ Invalid row for {}: {}", row.name, e),
            );
        }
    }

    price_chart(ui, "bhav_chart", &[("Open", row.open), ("Close", row.close)]);
}

use egui::{Color32, ComboBox, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use stintview::{
    stints::format_lap_time,
    summary::{GridLine, compare_drivers, podium, race_date, race_title, starting_grid},
};

use super::state::SessionSnapshot;

const ROW_HEIGHT: f32 = 18.;

/// Drivers picked for the head-to-head table.
#[derive(Default)]
pub(crate) struct HeadToHead {
    first: String,
    second: String,
}

fn grid_table(ui: &mut Ui, id: &str, title: &str, lines: &[GridLine]) {
    ui.label(RichText::new(title).color(Color32::WHITE).strong());
    if lines.is_empty() {
        ui.label(RichText::new("No classification data").color(Color32::GRAY).small());
        return;
    }
    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .body(|mut body| {
            for line in lines {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(line.slot.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{} ({})", line.full_name, line.abbreviation));
                    });
                });
            }
        });
}

pub(crate) fn show_summary(ui: &mut Ui, snapshot: &SessionSnapshot, head_to_head: &mut HeadToHead) {
    let session = &snapshot.session;
    ui.heading(RichText::new(race_title(&session.event)).color(Color32::WHITE));
    if let Some(date) = race_date(&session.event) {
        ui.label(RichText::new(date).color(Color32::YELLOW));
    }
    match &snapshot.weather {
        Some(weather) => {
            ui.label(RichText::new(weather.line()).color(Color32::YELLOW));
        }
        None => {
            ui.label(RichText::new("ℹ No weather data").color(Color32::GRAY));
        }
    }
    ui.separator();

    grid_table(
        ui,
        "starting_grid",
        "Starting Grid",
        &starting_grid(&session.results, &session.drivers),
    );
    ui.separator();
    grid_table(
        ui,
        "podium",
        "Podium",
        &podium(&session.results, &session.drivers),
    );
    ui.separator();

    show_head_to_head(ui, snapshot, head_to_head);
}

fn driver_combo(ui: &mut Ui, id: &str, selected: &mut String, drivers: &[String]) {
    ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui| {
            for driver in drivers {
                ui.selectable_value(selected, driver.clone(), driver.as_str());
            }
        });
}

fn show_head_to_head(ui: &mut Ui, snapshot: &SessionSnapshot, head_to_head: &mut HeadToHead) {
    ui.label(RichText::new("Head to head").color(Color32::WHITE).strong());
    ui.horizontal(|ui| {
        driver_combo(ui, "h2h_first", &mut head_to_head.first, &snapshot.available_drivers);
        ui.label("vs");
        driver_combo(ui, "h2h_second", &mut head_to_head.second, &snapshot.available_drivers);
    });
    if head_to_head.first.is_empty() || head_to_head.second.is_empty() {
        return;
    }

    let deltas = compare_drivers(
        &snapshot.session.laps,
        &head_to_head.first,
        &head_to_head.second,
    );
    if deltas.is_empty() {
        ui.label(RichText::new("ℹ No overlapping laps").color(Color32::GRAY));
        return;
    }
    let mean = deltas.iter().map(|d| d.delta_s()).sum::<f64>() / deltas.len() as f64;
    ui.label(format!(
        "{} laps compared, mean delta {:+.3}s",
        deltas.len(),
        mean
    ));

    egui::ScrollArea::vertical()
        .id_salt("h2h_scroll")
        .max_height(240.)
        .show(ui, |ui| {
            TableBuilder::new(ui)
                .id_salt("h2h_table")
                .striped(true)
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::remainder())
                .header(ROW_HEIGHT, |mut header| {
                    header.col(|ui| {
                        ui.strong("Lap");
                    });
                    header.col(|ui| {
                        ui.strong(head_to_head.first.as_str());
                    });
                    header.col(|ui| {
                        ui.strong(head_to_head.second.as_str());
                    });
                    header.col(|ui| {
                        ui.strong("Δ");
                    });
                })
                .body(|mut body| {
                    for delta in &deltas {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui| {
                                ui.label(delta.lap_number.to_string());
                            });
                            row.col(|ui| {
                                ui.label(format_lap_time(delta.first_s));
                            });
                            row.col(|ui| {
                                ui.label(format_lap_time(delta.second_s));
                            });
                            row.col(|ui| {
                                let color = if delta.delta_s() <= 0. {
                                    Color32::GREEN
                                } else {
                                    Color32::RED
                                };
                                ui.label(
                                    RichText::new(format!("{:+.3}", delta.delta_s())).color(color),
                                );
                            });
                        });
                    }
                });
        });
}

mod plot_sink;
mod state;
mod summary_panel;

use egui::{Color32, ComboBox, DragValue, Frame, Layout, Margin, RichText, Slider, Ui};
use egui_dropdown::DropDownBox;
use log::{error, info};

use stintview::{
    AppConfig, CachedSessionProvider, SessionProvider, SessionRequest, StintviewError,
    build_chart,
    session::{Circuit, MAX_YEAR, MIN_YEAR, SessionKind},
};

use crate::ui::{PALETTE_ORANGE, dark_visuals};

use plot_sink::PlotSink;
use state::{DashboardState, Notice, SessionSnapshot};
use summary_panel::HeadToHead;

/// `DashboardApp` lets the user pick a session, extract it from the provider and
/// browse its tyre stints.
///
/// * `provider` - Source of session data, rebuilt when the cache directory changes.
/// * `app_config` - Selections and toggles, saved on exit.
/// * `state` - The session-scoped snapshot and the derivation currently drawn.
pub struct DashboardApp {
    provider: CachedSessionProvider,
    app_config: AppConfig,
    circuit_input: String,
    state: DashboardState,
    head_to_head: HeadToHead,
    pinned_hover: Option<String>,
}

impl DashboardApp {
    pub fn new(
        provider: CachedSessionProvider,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        cc.egui_ctx.set_visuals(dark_visuals());
        let circuit_input = app_config.circuit.label();
        Self {
            provider,
            app_config,
            circuit_input,
            state: DashboardState::default(),
            head_to_head: HeadToHead::default(),
            pinned_hover: None,
        }
    }

    fn selected_request(&self) -> Result<SessionRequest, StintviewError> {
        SessionRequest::new(
            self.app_config.year,
            self.app_config.circuit.name(),
            self.app_config.session_kind,
        )
    }

    fn extract(&mut self) {
        let result = self.selected_request().and_then(|request| {
            self.provider
                .load(&request)
                .map(|session| SessionSnapshot::new(request, session))
        });
        match result {
            Ok(snapshot) => {
                info!(
                    "Extracted {} with {} laps",
                    snapshot.request,
                    snapshot.session.laps.len()
                );
                self.pinned_hover = None;
                self.state.replace_snapshot(snapshot);
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                self.state.extraction_failed(e.user_message());
            }
        }
    }

    fn show_session_selectors(&mut self, ui: &mut Ui) {
        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            ui.label(RichText::new("Year 📆").color(Color32::WHITE));
            ui.add(DragValue::new(&mut self.app_config.year).range(MIN_YEAR..=MAX_YEAR));
            ui.separator();

            ui.label(RichText::new("Circuit 🚥").color(Color32::WHITE));
            let labels = Circuit::ALL.iter().map(Circuit::label).collect::<Vec<_>>();
            ui.add(
                DropDownBox::from_iter(
                    labels.iter(),
                    "circuit_dropbox",
                    &mut self.circuit_input,
                    |ui, text| ui.selectable_label(false, text),
                )
                .filter_by_input(true),
            );
            if let Some(circuit) = Circuit::from_label(&self.circuit_input) {
                self.app_config.circuit = circuit;
            }
            ui.separator();

            ui.label(RichText::new("Session").color(Color32::WHITE));
            ComboBox::from_id_salt("session_kind")
                .selected_text(self.app_config.session_kind.name())
                .show_ui(ui, |ui| {
                    for kind in SessionKind::ALL {
                        ui.selectable_value(&mut self.app_config.session_kind, kind, kind.name());
                    }
                });
            ui.separator();

            if ui
                .button(RichText::new("Extract Data 📊").color(PALETTE_ORANGE).strong())
                .clicked()
            {
                self.extract();
            }
            if let Ok(request) = self.selected_request() {
                let (hint, color) = if self.provider.is_cached(&request) {
                    ("💾 cached", Color32::GREEN)
                } else {
                    ("not in cache", Color32::GRAY)
                };
                ui.label(RichText::new(hint).color(color).small());
            }
            if ui.button("📂 Cache directory").clicked()
                && let Some(dir) = rfd::FileDialog::new()
                    .set_directory(self.provider.cache_dir())
                    .pick_folder()
            {
                info!("Using session cache at {:?}", dir);
                self.provider = CachedSessionProvider::new(dir.clone());
                self.app_config.cache_dir = Some(dir);
            }
        });
    }

    fn show_toggles(&mut self, ui: &mut Ui) {
        let options = &mut self.app_config.chart_options;
        ui.horizontal_wrapped(|ui| {
            ui.checkbox(&mut options.show_pit_stops, "Show Pit Stops");
            ui.checkbox(&mut options.color_by_compound, "Show Tyre Compound Colors");
            ui.checkbox(&mut options.highlight_fastest_lap, "Highlight Fastest Lap");
            ui.checkbox(&mut options.show_safety_car, "Show Safety Car");
        });
    }

    fn show_filters(&mut self, ui: &mut Ui) {
        let (Some(snapshot), Some(filter)) = (self.state.snapshot(), self.state.filter()) else {
            return;
        };
        let mut filter = filter.clone();
        let max_lap = snapshot.max_lap.max(1);

        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("Drivers").color(Color32::WHITE));
            if ui.small_button("All").clicked() {
                filter.selected_drivers = snapshot.available_drivers.iter().cloned().collect();
            }
            if ui.small_button("None").clicked() {
                filter.selected_drivers.clear();
            }
            for driver in &snapshot.available_drivers {
                let mut selected = filter.selected_drivers.contains(driver);
                if ui.checkbox(&mut selected, driver.as_str()).changed() {
                    if selected {
                        filter.selected_drivers.insert(driver.clone());
                    } else {
                        filter.selected_drivers.remove(driver);
                    }
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label(RichText::new("Lap range").color(Color32::WHITE));
            ui.add(Slider::new(&mut filter.first_lap, 1..=max_lap).text("from"));
            ui.add(Slider::new(&mut filter.last_lap, 1..=max_lap).text("to"));
        });
        if filter.first_lap > filter.last_lap {
            std::mem::swap(&mut filter.first_lap, &mut filter.last_lap);
        }
        self.state.set_filter(filter);
    }

    fn show_notices(&self, ui: &mut Ui) {
        for notice in self.state.notices(&self.app_config.chart_options) {
            match notice {
                Notice::Error(message) => {
                    ui.label(RichText::new(message).color(Color32::RED).strong());
                }
                Notice::Info(message) => {
                    ui.label(RichText::new(format!("ℹ {}", message)).color(Color32::GRAY));
                }
            }
        }
    }

    fn show_chart(&mut self, ui: &mut Ui) {
        let Some(snapshot) = self.state.snapshot() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Pick a session and press Extract Data")
                        .color(Color32::WHITE)
                        .strong(),
                );
            });
            return;
        };

        let mut sink = PlotSink::default();
        build_chart(
            self.state.derivation(),
            &snapshot.session,
            &self.app_config.chart_options,
            &mut sink,
        );
        if let Some(pinned) = &self.pinned_hover {
            ui.label(RichText::new(pinned).color(Color32::WHITE).monospace());
        }
        let hovered = sink.show(ui, snapshot.max_lap);
        if ui.input(|i| i.pointer.primary_clicked()) && hovered.is_some() {
            self.pinned_hover = hovered;
        }
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("SessionSelector")
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(RichText::new("🏎️ F1 Statistics Dashboard 🏁").color(Color32::WHITE));
                self.show_session_selectors(ui);
                self.show_toggles(ui);
                self.show_filters(ui);
                self.show_notices(ui);
            });

        if let Some(snapshot) = self.state.snapshot() {
            egui::SidePanel::right("SessionSummary")
                .frame(
                    Frame::default()
                        .fill(Color32::TRANSPARENT)
                        .inner_margin(Margin::same(5)),
                )
                .resizable(true)
                .min_width(220.)
                .max_width(420.)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        summary_panel::show_summary(ui, snapshot, &mut self.head_to_head);
                    });
                });
        }

        egui::CentralPanel::default()
            .frame(
                Frame::default()
                    .fill(Color32::TRANSPARENT)
                    .inner_margin(Margin::same(5)),
            )
            .show(ctx, |ui| self.show_chart(ui));
    }
}

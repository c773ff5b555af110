use egui::{Button, Color32, ComboBox, Response, Slider, Ui};

use crate::command::Command;
use crate::crop::AspectRatio;
use crate::drawing::{ToolKind, ViewSnapshot};
use crate::state::{SettingsPatch, PERCENT_RANGE};
use crate::AnnotatorApp;

pub fn tools_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            tool_buttons(app, ui);
            tool_style(app, ui);

            ui.separator();
            ui.heading("Image");
            image_settings(app, ui);

            ui.separator();
            crop_controls(app, ui);

            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_enabled(app.history.can_undo(), Button::new("Undo")).clicked() {
                    app.undo();
                }
                let has_drawings = !app.state.drawings().is_empty();
                if ui.add_enabled(has_drawings, Button::new("Clear")).clicked() {
                    app.run(Command::ClearDrawings);
                }
            });
            ui.label(format!("Undo stack size: {}", app.history.len()));

            if let Some(status) = &app.status {
                ui.separator();
                ui.colored_label(Color32::YELLOW, status);
            }
        });
}

fn tool_buttons(app: &mut AnnotatorApp, ui: &mut Ui) {
    let active = app.tools.active_kind();
    let kinds: Vec<ToolKind> = app.tools.tools().map(|tool| tool.kind()).collect();
    for kind in kinds {
        if ui.selectable_label(active == Some(kind), kind.as_str()).clicked() {
            log::info!("Tool selected from UI: {}", kind);
            app.tools.activate(kind);
        }
    }
}

fn tool_style(app: &mut AnnotatorApp, ui: &mut Ui) {
    let Some(tool) = app.tools.active_tool() else {
        return;
    };
    let kind = tool.kind();
    let mut color = tool.color();
    let mut width = tool.line_width();

    ui.add_space(4.0);
    if kind == ToolKind::Eraser {
        let eraser = &app.config.eraser;
        let mut radius = width / 2.0;
        if ui
            .add(Slider::new(&mut radius, eraser.min_radius..=eraser.max_radius).text("Radius"))
            .changed()
        {
            app.tools.set_active_line_width(radius * 2.0);
        }
        return;
    }

    ui.horizontal(|ui| {
        ui.label("Color");
        if ui.color_edit_button_srgba(&mut color).changed() {
            app.tools.set_active_color(color);
        }
    });
    if ui.add(Slider::new(&mut width, 0.5..=30.0).text("Width")).changed() {
        app.tools.set_active_line_width(width);
    }
}

fn image_settings(app: &mut AnnotatorApp, ui: &mut Ui) {
    let settings = app.state.settings().clone();

    let mut brightness = settings.brightness();
    let response = ui.add(Slider::new(&mut brightness, PERCENT_RANGE).text("Brightness"));
    let patch = SettingsPatch {
        brightness: Some(brightness),
        ..SettingsPatch::default()
    };
    record_slider(app, &response, patch);

    let mut contrast = settings.contrast();
    let response = ui.add(Slider::new(&mut contrast, PERCENT_RANGE).text("Contrast"));
    let patch = SettingsPatch {
        contrast: Some(contrast),
        ..SettingsPatch::default()
    };
    record_slider(app, &response, patch);

    let mut saturation = settings.saturation();
    let response = ui.add(Slider::new(&mut saturation, PERCENT_RANGE).text("Saturation"));
    let patch = SettingsPatch {
        saturation: Some(saturation),
        ..SettingsPatch::default()
    };
    record_slider(app, &response, patch);

    let mut grayscale = settings.grayscale();
    if ui.checkbox(&mut grayscale, "Grayscale").changed() {
        app.run(Command::ToggleGrayscale);
    }

    ui.horizontal(|ui| {
        if ui.button("−").clicked() {
            app.run(Command::ZoomOut);
        }
        ui.label(format!("{:.0}%", settings.zoom() * 100.0));
        if ui.button("+").clicked() {
            app.run(Command::ZoomIn);
        }
        if ui.button("Reset").clicked() {
            app.run(Command::SetView(ViewSnapshot::default()));
        }
    });
}

/// Every change made during one slider drag folds into a single history entry
fn record_slider(app: &mut AnnotatorApp, response: &Response, patch: SettingsPatch) {
    if response.drag_started() {
        app.history.begin_merge();
    }
    if response.changed() {
        app.update_settings(patch);
    }
    if response.drag_stopped() {
        app.history.end_merge();
    }
}

fn crop_controls(app: &mut AnnotatorApp, ui: &mut Ui) {
    if !app.crop.is_active() {
        if ui.button("Crop").clicked() {
            app.enter_crop();
        }
        if app.state.settings().crop().is_some() && ui.button("Forget crop").clicked() {
            app.run(Command::RemoveCrop);
        }
        return;
    }

    let current = app.crop.aspect();
    ComboBox::from_label("Aspect")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for aspect in AspectRatio::ALL {
                if ui.selectable_label(current == aspect, aspect.label()).clicked() {
                    app.crop.set_aspect(aspect);
                }
            }
        });
    ui.horizontal(|ui| {
        if ui.button("Apply").clicked() {
            app.apply_crop();
        }
        if ui.button("Cancel").clicked() {
            app.cancel_crop();
        }
    });
}

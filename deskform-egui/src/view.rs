//! Egui rendering of a deskform `Form`.

use std::time::Duration;

use deskform::{
    ErrorLine, FieldKind, FieldView, Form, LayoutDirection, RenderItem, SubmitAffordance,
    SubmitOutcome, TextInput,
};
use eframe::egui;
use thiserror::Error;
use tracing::warn;

/// Error type for the egui renderer.
#[derive(Debug, Error)]
pub enum EguiError {
    /// The native window could not be created or crashed.
    #[error("Egui error: {0}")]
    Window(String),
}

/// What a custom element asks the form to do after it was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    None,
    /// Run the form's submit path (validation, then the submit handler).
    Submit,
}

/// Custom items and children for egui forms: a draw closure.
pub type EguiElement = Box<dyn Fn(&mut egui::Ui) -> ElementAction>;

/// What the window does with the form after the hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowControl {
    Continue,
    /// Draw the form read-only and ignore submit requests this frame.
    Lock,
    Close,
}

/// Window configuration for `run_window`.
#[derive(Debug, Clone)]
pub struct EguiOptions {
    /// Window title.
    title: String,
    /// Window size [width, height].
    window_size: [f32; 2],
    /// How often the window repaints without input, so hooks can poll.
    poll_interval: Duration,
}

impl Default for EguiOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            title: "rentdesk".to_string(),
            window_size: [640.0, 560.0],
            poll_interval: Duration::from_millis(200),
        }
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the window size.
    pub fn with_window_size(mut self, size: [f32; 2]) -> Self {
        self.window_size = size;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Draws a form and feeds edits and submit requests back into it.
pub struct FormView;

impl FormView {
    /// Draw one frame of `form` into `ui`.
    ///
    /// Edits are applied after the frame is drawn. Returns the outcome if the
    /// submit button, or a custom element returning `ElementAction::Submit`,
    /// was triggered during this frame.
    pub fn show(form: &mut Form<EguiElement>, ui: &mut egui::Ui) -> Option<SubmitOutcome> {
        Self::show_with(form, ui, true)
    }

    /// Like `show`, but a form that is not `enabled` is drawn disabled and
    /// never submits.
    pub fn show_with(
        form: &mut Form<EguiElement>,
        ui: &mut egui::Ui,
        enabled: bool,
    ) -> Option<SubmitOutcome> {
        if !enabled {
            ui.disable();
        }
        let mut edits: Vec<(String, String)> = Vec::new();
        let mut submit_requested = false;

        {
            let rendered = form.render();

            if let Some(hint) = rendered.required_hint {
                ui.weak(hint);
                ui.add_space(8.0);
            }

            for item in &rendered.items {
                match item {
                    RenderItem::Field(view) => {
                        if let Some(value) = draw_field(ui, view, rendered.direction) {
                            edits.push((view.name().to_string(), value));
                        }
                    }
                    RenderItem::Custom(element) => {
                        submit_requested |= element(ui) == ElementAction::Submit;
                    }
                }
            }

            ui.separator();

            match rendered.submit {
                SubmitAffordance::Default { label } => {
                    submit_requested |= ui.button(label).clicked();
                }
                SubmitAffordance::Children(children) => {
                    for child in children {
                        submit_requested |= child(ui) == ElementAction::Submit;
                    }
                }
            }
        }

        for (name, value) in edits {
            if let Err(err) = form.set_value(&name, value) {
                warn!(field = %name, error = %err, "edit refused");
            }
        }

        (enabled && submit_requested).then(|| form.submit())
    }

    /// One-line summary of the form's current errors, if it has any.
    pub fn error_summary(form: &Form<EguiElement>) -> Option<String> {
        match form.errors().len() {
            0 => None,
            1 => Some("1 validation error".to_string()),
            n => Some(format!("{n} validation errors")),
        }
    }
}

/// Format a label, adding a colon only if it doesn't end with punctuation.
fn format_label(label: &str) -> String {
    let trimmed = label.trim();
    match trimmed.chars().last() {
        None => String::new(),
        Some(':' | '?' | '!' | '.') => trimmed.to_string(),
        Some(_) => format!("{trimmed}:"),
    }
}

fn draw_field(
    ui: &mut egui::Ui,
    view: &FieldView<'_>,
    direction: LayoutDirection,
) -> Option<String> {
    let mut edited = None;

    match direction {
        LayoutDirection::Row => {
            ui.horizontal(|ui| {
                draw_label(ui, view);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    ui.vertical(|ui| {
                        ui.set_max_width(350.0);
                        edited = draw_input(ui, view);
                        draw_error(ui, view.error());
                    });
                });
            });
        }
        LayoutDirection::Column => {
            draw_label(ui, view);
            edited = draw_input(ui, view);
            draw_error(ui, view.error());
        }
    }

    ui.add_space(8.0);
    edited
}

fn draw_label(ui: &mut egui::Ui, view: &FieldView<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        ui.label(format_label(&view.label()));
        if view.is_required() {
            ui.colored_label(egui::Color32::RED, deskform::REQUIRED_MARKER);
        }
    });
}

fn draw_error(ui: &mut egui::Ui, error: &ErrorLine<'_>) {
    let text = egui::RichText::new(error.text()).small();
    if error.is_message() {
        ui.colored_label(egui::Color32::RED, text);
    } else {
        ui.label(text.color(egui::Color32::TRANSPARENT));
    }
}

/// Draw the input widget. Returns the new value if the user changed it.
fn draw_input(ui: &mut egui::Ui, view: &FieldView<'_>) -> Option<String> {
    let id = view.name().as_str();
    let mut value = view.value().to_string();

    let changed = match view.kind() {
        FieldKind::Text { input, placeholder } => {
            let mut edit = egui::TextEdit::singleline(&mut value)
                .id_salt(id)
                .password(*input == TextInput::Password)
                .desired_width(f32::INFINITY);
            if let Some(hint) = placeholder {
                edit = edit.hint_text(hint.as_str());
            }
            ui.add(edit).changed()
        }
        FieldKind::TextArea { placeholder, rows } => {
            let mut edit = egui::TextEdit::multiline(&mut value)
                .id_salt(id)
                .desired_rows(*rows)
                .desired_width(f32::INFINITY);
            if let Some(hint) = placeholder {
                edit = edit.hint_text(hint.as_str());
            }
            ui.add(edit).changed()
        }
        FieldKind::Select {
            options,
            placeholder,
        } => {
            let before = value.clone();
            let selected = options
                .iter()
                .find(|option| option.value == before)
                .map(|option| option.label.as_str())
                .or(placeholder.as_deref())
                .unwrap_or("--");
            egui::ComboBox::from_id_salt(id)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for option in options {
                        ui.selectable_value(&mut value, option.value.clone(), &option.label);
                    }
                });
            value != before
        }
        FieldKind::Checkbox => {
            let mut checked = value == "true";
            let changed = ui.checkbox(&mut checked, "").changed();
            if changed {
                value = checked.to_string();
            }
            changed
        }
        FieldKind::File { .. } => {
            let edit = egui::TextEdit::singleline(&mut value)
                .id_salt(id)
                .hint_text("path/to/file")
                .desired_width(f32::INFINITY);
            ui.add(edit).changed()
        }
    };

    changed.then_some(value)
}

/// The eframe application hosting one form.
struct FormApp<H> {
    form: Form<EguiElement>,
    hook: H,
    poll_interval: Duration,
}

impl<H> eframe::App for FormApp<H>
where
    H: FnMut(&mut Form<EguiElement>, &mut egui::Ui) -> WindowControl,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let control = (self.hook)(&mut self.form, ui);
            if control == WindowControl::Close {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                FormView::show_with(&mut self.form, ui, control != WindowControl::Lock);
                if let Some(summary) = FormView::error_summary(&self.form) {
                    ui.colored_label(egui::Color32::RED, summary);
                }
            });
        });

        ctx.request_repaint_after(self.poll_interval);
    }
}

/// Open a native window showing `form` until it is closed.
///
/// `hook` runs at the top of every frame with the form and the panel's `Ui`;
/// use it to show status lines and to close the window once the submit
/// handler's work has finished. Blocks until the window closes.
pub fn run_window<H>(form: Form<EguiElement>, options: EguiOptions, hook: H) -> Result<(), EguiError>
where
    H: FnMut(&mut Form<EguiElement>, &mut egui::Ui) -> WindowControl + 'static,
{
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(options.title.clone())
            .with_inner_size(options.window_size),
        ..Default::default()
    };

    let poll_interval = options.poll_interval;
    eframe::run_native(
        &options.title,
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(FormApp {
                form,
                hook,
                poll_interval,
            }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| EguiError::Window(e.to_string()))
}

//! Runs a page's form in a native window and saves its submissions.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use deskform::{Form, FormValues};
use deskform_egui::{EguiElement, EguiOptions, WindowControl, run_window};
use tracing::{error, info};

use crate::bridge::SubmitBridge;

/// A line of text a page shows above its form, updated by its callbacks.
pub type Banner = Rc<RefCell<Option<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SaveStatus {
    Idle,
    Saved(String),
    Failed(String),
}

/// Show `form` until a submission was saved or the window is closed.
///
/// `save` runs on the runtime behind `bridge` for every submitted payload.
/// A failed save keeps the window open with the error shown. Returns the
/// message of the successful save, if there was one.
pub fn run<F, Fut>(
    form: Form<EguiElement>,
    title: &str,
    mut bridge: SubmitBridge<String>,
    mut save: F,
    banner: Option<Banner>,
) -> anyhow::Result<Option<String>>
where
    F: FnMut(FormValues) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    let outcome: Rc<RefCell<Option<String>>> = Rc::default();
    let saved = Rc::clone(&outcome);
    let mut status = SaveStatus::Idle;

    run_window(form, EguiOptions::new().with_title(title), move |form, ui| {
        bridge.dispatch(&form.mount_token(), &mut save);

        if let Some(result) = bridge.poll() {
            status = match result {
                Ok(message) => {
                    info!(%message, "saved");
                    SaveStatus::Saved(message)
                }
                Err(err) => {
                    error!(error = %format!("{err:#}"), "save failed");
                    SaveStatus::Failed(format!("{err:#}"))
                }
            };
        }

        if let Some(text) = banner.as_ref().and_then(|b| b.borrow().clone()) {
            ui.strong(text);
            ui.add_space(4.0);
        }
        let busy = bridge.is_busy();
        if busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Saving...");
            });
        }

        match &status {
            SaveStatus::Failed(message) => {
                ui.colored_label(egui::Color32::RED, message);
            }
            SaveStatus::Saved(message) => {
                *saved.borrow_mut() = Some(message.clone());
            }
            SaveStatus::Idle => {}
        }
        frame_control(&status, busy)
    })?;

    Ok(outcome.take())
}

/// Close once saved; keep the form locked while a save is pending so a
/// second click cannot submit the same payload again.
fn frame_control(status: &SaveStatus, busy: bool) -> WindowControl {
    match status {
        SaveStatus::Saved(_) => WindowControl::Close,
        _ if busy => WindowControl::Lock,
        SaveStatus::Idle | SaveStatus::Failed(_) => WindowControl::Continue,
    }
}

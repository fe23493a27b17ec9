//! # deskform-egui
//!
//! An egui renderer for deskform that draws forms in a native window.
//!
//! Custom items and children are draw closures (`EguiElement`). A closure
//! returning `ElementAction::Submit` triggers the form's submit path, so a
//! custom button goes through the same validation gate as the default one.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deskform::{FieldDescriptor, FormBuilder, FormItem, Rule, Schema};
//! use deskform_egui::{EguiElement, EguiOptions, WindowControl, run_window};
//!
//! fn main() -> anyhow::Result<()> {
//!     let items: Vec<FormItem<EguiElement>> =
//!         vec![FieldDescriptor::text("name", "Name").required().into()];
//!     let schema = Schema::new().field("name", Rule::string().required("Name is required"));
//!     let form = FormBuilder::new(items, schema, |payload| println!("{payload:?}")).build()?;
//!
//!     run_window(
//!         form,
//!         EguiOptions::new().with_title("New client"),
//!         |_form, _ui| WindowControl::Continue,
//!     )?;
//!     Ok(())
//! }
//! ```

mod view;

pub use view::{
    EguiElement, EguiError, EguiOptions, ElementAction, FormView, WindowControl, run_window,
};

//! Client form example
//!
//! Demonstrates:
//! - A two-column client form drawn with egui
//! - Schema validation gating the submit handler
//! - Closing the window from the frame hook once a submission arrived
//!
//! Run with: cargo run -p deskform-egui --example client_form

use std::cell::RefCell;
use std::rc::Rc;

use deskform::{FieldDescriptor, FormBuilder, FormItem, FormValues, Rule, Schema, TextInput};
use deskform_egui::{EguiElement, EguiOptions, WindowControl, run_window};

fn main() -> anyhow::Result<()> {
    let items: Vec<FormItem<EguiElement>> = vec![
        FieldDescriptor::text("name", "First name").required().into(),
        FieldDescriptor::text("last_name", "Last name").required().into(),
        FieldDescriptor::input("email", "Email", TextInput::Email).into(),
        FieldDescriptor::input("phone", "Phone", TextInput::Tel).into(),
        FieldDescriptor::checkbox("is_foreign", "Foreign resident").into(),
        FieldDescriptor::textarea("notes", "Notes").into(),
    ];
    let schema = Schema::new()
        .field("name", Rule::string().required("First name is required"))
        .field("last_name", Rule::string().required("Last name is required"))
        .field("email", Rule::string().email("Enter a valid email"))
        .field("is_foreign", Rule::boolean());

    let submitted: Rc<RefCell<Option<FormValues>>> = Rc::default();
    let sink = Rc::clone(&submitted);

    let form = FormBuilder::new(items, schema, move |values| {
        *sink.borrow_mut() = Some(values);
    })
    .submit_label("Save client")
    .build()?;

    let seen = Rc::clone(&submitted);
    run_window(
        form,
        EguiOptions::new().with_title("New client"),
        move |_form, _ui| {
            if seen.borrow().is_some() {
                WindowControl::Close
            } else {
                WindowControl::Continue
            }
        },
    )?;

    println!("{:#?}", submitted.borrow());
    Ok(())
}

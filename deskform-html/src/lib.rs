//! # deskform-html
//!
//! Renders a deskform `Form` as HTML.
//!
//! Custom elements (`FormItem::Custom`) and children are raw HTML and are
//! inserted as-is; everything taken from descriptors and values is escaped.
//!
//! ## Usage
//!
//! ```rust
//! use deskform::{FieldDescriptor, FormBuilder, FormItem};
//! use deskform_html::{HtmlOptions, to_html};
//!
//! let items: Vec<FormItem<String>> = vec![FieldDescriptor::text("name", "Name").into()];
//! let form = FormBuilder::without_validation(items, |_| {}).build().unwrap();
//!
//! let html = to_html(&form, &HtmlOptions::new().full_document(false));
//! assert!(html.contains("id=\"name\""));
//! ```

mod generator;

pub use generator::{HtmlOptions, to_html};

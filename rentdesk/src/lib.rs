//! # rentdesk
//!
//! The rental desk application: form pages for inventory, clients and
//! rentals, backed by `rentdesk-data` repositories and drawn with
//! `deskform-egui`.
//!
//! Form callbacks run on the UI thread and never block. Saving happens on a
//! tokio runtime through `SubmitBridge`; results are applied on a later frame
//! and only while the form still exists.

pub mod bridge;
pub mod pages;
pub mod window;

pub use bridge::SubmitBridge;

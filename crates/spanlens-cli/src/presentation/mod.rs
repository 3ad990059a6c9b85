//! Presentation layer.
//!
//! Handlers build a view model (plain serializable data), wrap it in a
//! [`CommandResultViewModel`] and hand it to the [`ConsoleRenderer`]. The
//! renderer prints JSON directly from the view model, or asks the view model
//! for its text view through [`CreateView`].

pub mod formatters;
pub mod renderer;
pub mod view_models;
pub mod views;

pub use formatters::Palette;
pub use renderer::ConsoleRenderer;
pub use view_models::{CommandResultViewModel, CreateView, Guidance, StatusBadge, StatusLevel};

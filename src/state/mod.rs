// State management module.
// Handles data loading and UI state for tabs.

pub mod catalog;
pub mod console;

pub use catalog::{CatalogViewState, IconRow, LoadingState};
pub use console::{ConsoleLevel, ConsoleState};

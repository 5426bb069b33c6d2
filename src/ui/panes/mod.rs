//! TUI pane rendering modules
//!
//! Each pane is a stateless render function over borrowed application
//! state.
//!
//! - [`tabs`]: title and view switcher
//! - [`form`]: entry form with inline errors and the submit button
//! - [`records`]: search box, records table or cards, counter
//! - [`config`]: field list of the schema editor and the add-field dialog
//! - [`status`]: status bar with keybindings for the active view

pub mod config;
pub mod form;
pub mod records;
pub mod status;
pub mod tabs;

pub use config::{render_add_field_dialog, render_config_pane};
pub use form::render_form_pane;
pub use records::render_records_pane;
pub use status::render_status_bar;
pub use tabs::render_tabs;

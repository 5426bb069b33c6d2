//! # Introduction
//!
//! Registro is an employee registration tool driven by a declarative form
//! schema. Operators fill in a form, browse and export the records
//! registered during the session, and reshape the form itself at runtime.
//! Everything is kept in memory; nothing survives a restart except the CSV
//! export.
//!
//! ## Data flow
//!
//! ```text
//! schema editor ─┐
//!                ├─> FormConfig ─> form ─(submit)─> RecordBook ─> viewer / CSV
//! departments  ──┘
//! ```
//!
//! 1. [`schema`] — field definitions, the default schema, and the
//!    [`schema::editor`] operations that replace it.
//! 2. [`form`] — input state, the tel sanitizer, submit-time validation and
//!    the delayed submission.
//! 3. [`records`] — the append-only record list plus column, label, search
//!    and CSV derivations.
//! 4. [`departments`] — one-time remote lookup for the department options.
//! 5. [`config`] — command-line options and schema files.
//! 6. [`ui`] — ratatui-based TUI; not part of the stable library API.

pub mod config;
pub mod departments;
pub mod errors;
pub mod form;
pub mod records;
pub mod schema;
pub mod ui;

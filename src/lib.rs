//! Core library for the sheet-normalizer command line application.
//!
//! The library normalizes folders of loosely structured `.xlsx` files into a
//! fixed column vocabulary. Responsibilities are split into narrow modules:
//! the in-memory grid lives in [`model`], the canonical column names in
//! [`vocabulary`], label reconciliation in [`matcher`], header discovery in
//! [`header`], per-sheet cleanup in [`normalize`], workbook verdicts in
//! [`classify`], Excel adapters under [`io`], and the folder run in
//! [`pipeline`].

pub mod classify;
pub mod config;
pub mod error;
pub mod header;
pub mod io;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod vocabulary;

pub use error::{Result, ToolError};

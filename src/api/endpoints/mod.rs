//! Endpoint handlers.
//!
//! HTML pages for the browser, JSON under `/api/`. Handlers only adapt
//! HTTP to the view, prediction and asset modules.

pub mod data;
pub mod health;
pub mod media;
pub mod pages;
pub mod predict;

//! HTTP surface for the shelf: JSON API, browser pages and metrics.

pub mod api;
pub mod metrics;
pub mod pages;
pub mod state;

//! Server-rendered P/L dashboard for the Dongtan logistics centers.

pub mod api;
pub mod app;
pub mod components;
pub mod pages;
pub mod state;

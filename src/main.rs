//! Lia Task Board Frontend Entry Point

mod app;
mod commands;
mod components;
mod config;
mod context;
mod logging;
mod mobile;
mod models;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Debug);
    mount_to_body(App);
}

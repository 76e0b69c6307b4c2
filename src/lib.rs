//! Galactatec: a terminal space shooter behind a small account shell.

pub mod account;
pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod game;
pub mod notify;
pub mod screens;
pub mod ui;

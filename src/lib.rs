pub mod api;
pub mod cli;
pub mod config;
pub mod forms;
pub mod models;
pub mod owners;
pub mod pager;

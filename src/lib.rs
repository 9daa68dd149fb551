pub mod core;
pub mod db;
pub mod diagnostics;
pub mod models;
pub mod output;

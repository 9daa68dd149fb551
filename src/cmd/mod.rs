pub mod coach;
pub mod config;
pub mod definitions;
pub mod delete;
pub mod export;
pub mod init;
pub mod log;
pub mod views;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::Value;
use std::rc::Rc;

use liftlog::core::store::Store;
use liftlog::db::Database;
use liftlog::models::config::Config;
use liftlog::output;

pub fn open_store() -> Result<Store> {
    let db = Database::open(&Config::db_path())?;
    Store::open(Rc::new(db))
}

pub fn print_ok(command: &str, data: Value) -> Result<()> {
    let out = output::success(command, data);
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

/// The current instant, or the end of `today` when the date was overridden.
pub fn now_for(today: NaiveDate) -> DateTime<Local> {
    let now = Local::now();
    if now.date_naive() == today {
        return now;
    }
    today
        .and_hms_opt(23, 59, 59)
        .and_then(|dt| Local.from_local_datetime(&dt).earliest())
        .unwrap_or(now)
}

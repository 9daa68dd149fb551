use anyhow::Result;
use std::io::{self, Write};

use liftlog::db::Database;
use liftlog::models::config::Config;

pub fn run(skip: bool) -> Result<()> {
    let mut config = Config::load().unwrap_or_default();

    if !skip {
        println!("liftlog: initial setup\n");

        let name = prompt_string("Name (optional)")?;
        if !name.is_empty() {
            config.profile.name = Some(name);
        }
        config.profile.body_weight_kg = Some(prompt_f64("Body weight (kg)")?);

        let coach = prompt_string("Coach command (optional, e.g. `llm -m gpt-4o-mini`)")?;
        if !coach.is_empty() {
            config.coach.command = Some(coach);
        }

        config.save()?;
        Database::open(&Config::db_path())?;
        println!("\nSetup complete. Data stored in {:?}", Config::data_dir());
    } else {
        config.save()?;
        Database::open(&Config::db_path())?;
        println!("Config initialized with defaults at {:?}", Config::path());
    }

    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        anyhow::bail!("unexpected end of input (use --skip for non-interactive setup)");
    }
    Ok(buf.trim().to_string())
}

fn prompt_f64(label: &str) -> Result<f64> {
    loop {
        let s = prompt_string(label)?;
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => return Ok(v),
            _ => println!("Please enter a positive number."),
        }
    }
}

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use wayfare_config::AppConfig;
use wayfare_core::ImageOptimizer;

pub mod completions;
pub mod content;
pub mod countries;
pub mod image;
pub mod phone;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
    pub optimizer: &'a ImageOptimizer,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

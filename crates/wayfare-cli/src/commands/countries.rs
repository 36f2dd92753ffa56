use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CountriesArgs {
    /// Filter by country name or dial code
    #[arg(long)]
    pub search: Option<String>,
}

pub fn list_countries(ctx: &Context<'_>, args: CountriesArgs) -> Result<()> {
    let catalog = ctx.config.phone.catalog();
    let entries = catalog.search(args.search.as_deref().unwrap_or(""));

    if ctx.json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("no countries");
        return Ok(());
    }

    let default_code = ctx.config.phone.default_code();
    for entry in entries {
        let marker = if entry.dial_prefix == default_code {
            " (default)"
        } else {
            ""
        };
        println!("{} {}{}", entry.dial_prefix, entry.display_name, marker);
    }
    Ok(())
}

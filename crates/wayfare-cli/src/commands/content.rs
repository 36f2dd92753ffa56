use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use wayfare_core::content::{split_content, ContentBlock};

#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Split blog HTML into text and image blocks
    Split(SplitArgs),
}

#[derive(Debug, Args)]
pub struct SplitArgs {
    /// HTML file to read; stdin when omitted
    pub file: Option<PathBuf>,
}

pub fn split(ctx: &Context<'_>, args: SplitArgs) -> Result<()> {
    let html = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read content file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .with_context(|| "read content from stdin")?;
            buf
        }
    };

    let blocks = split_content(&html, ctx.optimizer);

    if ctx.json {
        print_json(&blocks)?;
        return Ok(());
    }

    if blocks.is_empty() {
        println!("no content");
        return Ok(());
    }

    for block in blocks {
        match block {
            ContentBlock::Text { html } => println!("text: {}", html),
            ContentBlock::Image { src, alt } if alt.is_empty() => println!("image: {}", src),
            ContentBlock::Image { src, alt } => println!("image: {} ({})", src, alt),
        }
    }
    Ok(())
}

//! # Sales Dashboard
//!
//! Command-line front end for the `sales_forecast` library. Every
//! subcommand is one dashboard tab: it loads the uploads it needs,
//! computes its view and renders it as text or JSON, then exits.

pub mod cli;
pub mod logging;
pub mod messages;
pub mod render;
pub mod sample;
pub mod tabs;

use crate::cli::{Cli, Commands};
use crate::tabs::TabContext;
use anyhow::Result;
use std::io::Write;

/// Run the selected tab, writing its output to `out`
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let ctx = TabContext::new(cli.config.as_deref(), cli.json)?;

    match &cli.command {
        Commands::Overview(args) => tabs::overview(args, &ctx, out),
        Commands::Sales(args) => tabs::sales(args, &ctx, out),
        Commands::Inventory(args) => tabs::inventory(args, &ctx, out),
        Commands::Forecast(args) => tabs::forecast(args, &ctx, out),
        Commands::Sample(args) => tabs::sample(args, &ctx, out),
    }
}

use clap::Parser;
use sales_dashboard::cli::Cli;
use sales_dashboard::logging::init_tracing;
use sales_dashboard::messages::describe_error;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = sales_dashboard::run(&cli, &mut out);
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe_error(&err));
            ExitCode::FAILURE
        }
    }
}

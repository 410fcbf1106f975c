use std::process::ExitCode;

use clap::Parser;

mod args;
mod cmd;
mod config;
mod io;
mod logging;
mod output;

fn main() -> ExitCode {
    let cli = args::Cli::parse();
    output::init(cli.json);
    logging::init(cli.verbose);

    match cmd::dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::report_error(&e);
            ExitCode::from(output::exit_code(&e))
        }
    }
}

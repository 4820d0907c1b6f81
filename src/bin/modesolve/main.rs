use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;
mod logging;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();
    logging::init(cli.verbose);

    let quiet = match &cli.command {
        cli::Command::Solve(args) => args.output.quiet,
        cli::Command::Init(args) => args.quiet,
    };
    let ctx = display::Context::new(quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

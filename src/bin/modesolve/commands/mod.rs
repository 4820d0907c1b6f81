mod init;
mod solve;

use init::run_init;
use solve::run_solve;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Solve(args) => run_solve(args, ctx),
        Command::Init(args) => run_init(args, ctx),
    }
}

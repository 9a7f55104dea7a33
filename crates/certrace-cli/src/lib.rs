pub mod args;
mod handlers;

pub use args::{Cli, Command};

use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render { reports, out } => handlers::render::handle(&reports, &out),
        Command::Suites { reports } => handlers::suites::handle(&reports),
    }
}

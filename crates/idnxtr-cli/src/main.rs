mod cli;
mod extract_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    shared::init_logging(cli.silent);

    if let Err(code) = extract_cmd::run(&cli) {
        std::process::exit(code);
    }
}

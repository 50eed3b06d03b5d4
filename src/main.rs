use clap::Parser;

use bandpipe::cli::{self, Cli};

fn main() {
    bandpipe::logging::init();

    if let Err(error) = cli::run(Cli::parse()) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

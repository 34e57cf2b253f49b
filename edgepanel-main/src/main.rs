use clap::Parser;
use edgepanel_logging::error;
use edgepanel_main::{args::Args, EdgePanel};

fn main() {
    if let Err(err) = EdgePanel::main(Args::parse()) {
        error!("{:?}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

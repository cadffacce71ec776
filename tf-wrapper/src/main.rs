use clap::Parser;

use tf_wrapper::cli::{Cli, normalize_args};
use tf_wrapper::exit_codes;
use tf_wrapper::logging;
use tf_wrapper::session::run_session;

fn main() {
    logging::init();
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    if let Err(err) = run_session(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::FATAL);
    }
}

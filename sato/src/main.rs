use std::process::exit;

use sato::cli::init_logging;
use sato::cli::parse_args;
use sato::cli::run;

fn main() {
    let args = parse_args();
    if let Err(e) = init_logging(&args).and_then(|_| run(&args)) {
        eprintln!("{e:#}");
        exit(1);
    }
}

#![forbid(unsafe_code)]

//! `bitpaint` binary entry point.

use bitpaint_tty::cli::Opts;

fn main() {
    let opts = Opts::parse();

    if let Some(path) = &opts.log_path
        && let Err(e) = bitpaint_tty::logging::init(path)
    {
        eprintln!("Failed to start logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = bitpaint_tty::run(opts) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

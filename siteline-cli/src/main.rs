//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = siteline_cli::run() {
        eprintln!("siteline: {err}");
        std::process::exit(1);
    }
}

//! Standalone entrypoint that boots a host registry with the example module.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    mia_example::run(std::env::args_os(), &mut stderr)
}

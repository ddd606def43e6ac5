use std::process::ExitCode;
use std::{env, io};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    cli::run(env::args_os(), &mut stdout, &mut stderr)
}

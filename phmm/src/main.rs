mod args;
mod extension_traits;
mod run;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use args::Cli;
use run::run;

use clap::Parser;
use env_logger::Env;

fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    run(&args)?;
    Ok(())
}

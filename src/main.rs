//! concatfs main program entry

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use clap::Parser;
use concatfs::adapter::fuse::{self, MountOptions};
use concatfs::config::{Args, MountConfig};
use concatfs::mount::{StartupError, StartupResult};
use std::process::ExitCode;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(config: MountConfig) -> StartupResult<()> {
    if config.print_table {
        println!("{}", config.table_json()?);
        return Ok(());
    }

    let adapter = config.prepare()?;
    let options = MountOptions {
        allow_other: config.allow_other,
    };
    let reason =
        fuse::mount(adapter, &config.mount_point, &options).map_err(StartupError::Mount)?;
    log::debug!("stopped: {:?}", reason);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let result = MountConfig::try_from(args).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

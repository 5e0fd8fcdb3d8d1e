//! wsync-setup CLI - prepares the environment and builds wsync

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wsync_setup::ops::{run_setup, HostEnvironment, SystemRunner};
use wsync_setup::util::{ColorChoice, Shell, Verbosity};

mod cli;

use cli::Cli;

fn main() {
    // Usage errors exit with 1 like every other fatal error; help and
    // version still exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("wsync_setup=debug")
    } else {
        EnvFilter::new("wsync_setup=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::new(
        if cli.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        },
        if cli.no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        },
    );

    let options = cli.resolve_options();
    let host = HostEnvironment::from_process().context("failed to get current directory")?;

    let summary = run_setup(options, host, &mut SystemRunner, &shell)?;

    shell.println("");
    shell.println("========================================================");
    shell.println("For ease of use, add the directory with the produced executables to the PATH!");
    shell.println(format!(
        "e.g. PATH=\"{}:$PATH\"",
        summary.executables_dir.display()
    ));

    Ok(())
}

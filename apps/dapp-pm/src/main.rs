use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dapp_pm_vendor::Config;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "dapp-pm")]
#[command(about = "Vendor Solidity files and their imports from GitHub releases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the source files of a dependency and what each one imports
    List(Config),
    /// Copy the selected files and everything they import into the project
    Install(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::List(cfg) => {
            let json = cfg.json;
            let result = dapp_pm_vendor::run_list(cfg)?;
            debug!("Listed {} files", result.files.len());

            if json {
                dapp_pm_vendor::print_json(&mut stdout, &result)?;
            } else {
                dapp_pm_vendor::print_file_list(&mut stdout, &result)?;
            }
        }
        Commands::Install(cfg) => {
            info!(
                "Installing {} ({} selections, using {} threads)",
                cfg.dependency,
                cfg.select.len(),
                rayon::current_num_threads()
            );
            let json = cfg.json;
            let result = dapp_pm_vendor::run_install(cfg)?;

            if json {
                dapp_pm_vendor::print_json(&mut stdout, &result)?;
            } else {
                dapp_pm_vendor::print_install_summary(&mut stdout, &result)?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms.",
                    "●".bright_blue(),
                    start.elapsed().as_millis().to_string().cyan()
                )?;
            }
        }
    }

    stdout.flush()?;
    Ok(())
}

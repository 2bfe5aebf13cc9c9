// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{crate_version, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use kitexport::classify::DrumKitClassifier;
use kitexport::config::ExportConfig;
use kitexport::export::{print_plan, print_report, ConsoleObserver, Exporter};
use kitexport::source;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Exports the samples used by Bitwig drum kit presets, sorted by velocity."
)]
struct Cli {
    /// The path to a YAML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// The directory to export samples into. Defaults to ./export.
    #[arg(short, long, global = true)]
    export_dir: Option<PathBuf>,
    /// The root of the sample library. Defaults to the Bitwig install.
    #[arg(long, global = true)]
    sample_root: Option<PathBuf>,
    /// A glob matching the presets to export. Defaults to the Bitwig install.
    #[arg(long, global = true)]
    preset_glob: Option<String>,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copies the samples of every preset into the export directory. This is the default.
    Export {
        /// Prints where each sample would be copied without copying anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Lists the presets and the samples each one uses.
    List {},
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(err = e.as_ref(), "Export failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = ExportConfig::load(cli.config.as_deref())?.with_overrides(
        cli.export_dir,
        cli.sample_root,
        cli.preset_glob,
    );

    let provider = source::resolve_provider(
        config.preset_glob().map(String::from),
        config.sample_root().map(Path::to_path_buf),
    )?;
    let classifier = DrumKitClassifier::new()?;
    let observer = ConsoleObserver;
    let exporter = Exporter::new(&classifier, &observer, config.export_dir().to_path_buf())?;

    match cli.command.unwrap_or(Commands::Export { dry_run: false }) {
        Commands::Export { dry_run: false } => {
            let report = exporter.run(provider.as_ref())?;
            print_report(&report);
        }
        Commands::Export { dry_run: true } => {
            print_plan(&exporter.plan(provider.as_ref())?, true)?;
        }
        Commands::List {} => {
            print_plan(&exporter.plan(provider.as_ref())?, false)?;
        }
    }

    Ok(())
}

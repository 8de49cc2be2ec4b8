//! `tractsurf` command-line entry point.
//!
//! Usage:
//!   `tractsurf field-import <tractogram.vtk> <field.bin> <POINT|STREAMLINE> <float|int> <dimension> <name>`
//!   `tractsurf track2surf <tractogram> <surface.vtk> <output.vtk> <name> --feature <token>`

use std::process;

use clap::Parser;
use tracing::error;

use tractsurf_cli::logging::init_logging;
use tractsurf_cli::{run_field_import, run_track2surf, Cli, Command, CommandError, Outcome};

fn run(cli: &Cli) -> Result<Outcome, CommandError> {
    let config = cli.command.common().run_config()?;
    init_logging(config.verbosity);
    match &cli.command {
        Command::FieldImport(args) => run_field_import(&args.request(), &config),
        Command::Track2Surf(args) => run_track2surf(&args.request(), &config),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        // Configuration errors happen before the subscriber exists.
        init_logging(cli.command.common().verbose);
        error!("{e}");
        process::exit(e.exit_code());
    }
}

//! Command-line definitions.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tractsurf_engine::{RunConfig, Verbosity};

use crate::error::CommandError;
use crate::import::FieldImportRequest;
use crate::track2surf::Track2SurfRequest;

/// Streamline field import and tractogram-to-surface mapping.
#[derive(Parser, Debug)]
#[command(name = "tractsurf", version)]
#[command(about = "Map streamline tractograms onto triangle surfaces")]
pub struct Cli {
    /// The tool to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available tools.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Attach a raw binary field to a VTK tractogram, rewriting it in place
    #[command(name = "field-import")]
    FieldImport(FieldImportArgs),
    /// Compute a streamline feature on a surface and write it as face and vertex fields
    #[command(name = "track2surf")]
    Track2Surf(Track2SurfArgs),
}

impl Command {
    /// Options shared by every tool.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Self::FieldImport(a) => &a.common,
            Self::Track2Surf(a) => &a.common,
        }
    }
}

/// Options shared by every tool.
#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    /// Worker threads (0 = all available cores)
    #[arg(short = 'n', long = "number-of-threads")]
    pub threads: Option<usize>,

    /// quiet, fatal, error, warn, info or debug (debug runs single-threaded)
    #[arg(short = 'v', long = "verbose", default_value = "info")]
    pub verbose: Verbosity,

    /// Overwrite existing fields and output files
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Wall-clock budget in seconds
    #[arg(long = "time-limit")]
    pub time_limit: Option<f64>,
}

impl CommonArgs {
    /// Build and validate the run configuration.
    pub fn run_config(&self) -> Result<RunConfig, CommandError> {
        let time_limit = self
            .time_limit
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    CommandError::validation(format!("invalid time limit {secs}"))
                })
            })
            .transpose()?;
        let config = RunConfig {
            threads: self.threads,
            verbosity: self.verbose,
            time_limit,
        };
        config.validate()?;
        Ok(config)
    }
}

/// `field-import` arguments.
#[derive(Args, Debug)]
pub struct FieldImportArgs {
    /// Input tractogram (.vtk), rewritten with the new field
    pub tractogram: PathBuf,
    /// Raw little-endian field values
    pub field_file: PathBuf,
    /// POINT or STREAMLINE
    pub owner: String,
    /// float or int
    pub datatype: String,
    /// Components per element
    pub dimension: usize,
    /// Name of the new field
    pub name: String,
    #[allow(missing_docs)]
    #[command(flatten)]
    pub common: CommonArgs,
}

impl FieldImportArgs {
    /// The pipeline request.
    pub fn request(&self) -> FieldImportRequest {
        FieldImportRequest {
            tractogram: self.tractogram.clone(),
            field_file: self.field_file.clone(),
            owner: self.owner.clone(),
            datatype: self.datatype.clone(),
            dimension: self.dimension,
            name: self.name.clone(),
            force: self.common.force,
        }
    }
}

/// `track2surf` arguments.
#[derive(Args, Debug)]
pub struct Track2SurfArgs {
    /// Input tractogram (.vtk or .tck)
    pub tractogram: PathBuf,
    /// Input surface (.vtk)
    pub surface: PathBuf,
    /// Output surface (.vtk)
    pub output: PathBuf,
    /// Base name of the face_<name> and vertex_<name> fields
    pub name: String,
    /// streamlineDensity, streamlineCount, contactAngle or contactDirection
    #[arg(long = "feature")]
    pub feature: String,
    #[allow(missing_docs)]
    #[command(flatten)]
    pub common: CommonArgs,
}

impl Track2SurfArgs {
    /// The pipeline request.
    pub fn request(&self) -> Track2SurfRequest {
        Track2SurfRequest {
            tractogram: self.tractogram.clone(),
            surface: self.surface.clone(),
            output: self.output.clone(),
            name: self.name.clone(),
            feature: self.feature.clone(),
            force: self.common.force,
        }
    }
}

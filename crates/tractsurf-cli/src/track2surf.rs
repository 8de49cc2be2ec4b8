//! `track2surf`: map a tractogram onto a surface and store one feature.

use std::path::PathBuf;

use tractsurf_core::FieldHost;
use tractsurf_engine::{Mapper, MapperConfig, RunConfig, TaskPool};
use tractsurf_features::{
    compute, face_field_name, vertex_field_name, AggregateContext, FeatureKind,
};
use tractsurf_io::{read_surface, read_tractogram, write_surface, Format};

use crate::error::CommandError;
use crate::{check_field_name, check_readable, release_fields, Outcome};

/// Inputs to [`run_track2surf`], as given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track2SurfRequest {
    /// Tractogram (`.vtk` or `.tck`).
    pub tractogram: PathBuf,
    /// Input surface (`.vtk`).
    pub surface: PathBuf,
    /// Output surface (`.vtk`).
    pub output: PathBuf,
    /// Base field name.
    pub name: String,
    /// Feature token.
    pub feature: String,
    /// Replace existing fields and an existing output file.
    pub force: bool,
}

fn validate(req: &Track2SurfRequest) -> Result<FeatureKind, CommandError> {
    if Format::from_path(&req.output).ok() != Some(Format::Vtk) {
        return Err(CommandError::validation(format!(
            "output surface {} must be a .vtk file",
            req.output.display()
        )));
    }
    if req.output.exists() && !req.force {
        return Err(CommandError::conflict(format!(
            "{} exists (use --force to overwrite it)",
            req.output.display()
        )));
    }
    let kind: FeatureKind = req
        .feature
        .parse()
        .map_err(|e| CommandError::validation(format!("{e}")))?;
    check_field_name(&req.name)?;
    check_readable(&req.tractogram)?;
    check_readable(&req.surface)?;
    Ok(kind)
}

/// Compute `feature` for `tractogram` on `surface` and write the surface
/// with `face_<name>` and `vertex_<name>` to `output`.
///
/// An empty tractogram is reported and returns [`Outcome::NoWork`]
/// without writing anything.
pub fn run_track2surf(
    req: &Track2SurfRequest,
    config: &RunConfig,
) -> Result<Outcome, CommandError> {
    let kind = validate(req)?;
    let deadline = config.start_deadline();

    let tractogram = read_tractogram(&req.tractogram)?;
    if tractogram.is_empty() {
        tracing::info!("Empty tractogram");
        tracing::info!("0 streamlines are written.");
        return Ok(Outcome::NoWork);
    }

    let mut surface = read_surface(&req.surface)?;
    let names = [face_field_name(&req.name), vertex_field_name(&req.name)];
    for name in &names {
        if surface.fields().contains(name) && !req.force {
            return Err(CommandError::conflict(format!(
                "field \"{name}\" already exists in {} (use --force to replace it)",
                req.surface.display()
            )));
        }
    }
    for name in &names {
        if surface.fields_mut().release(name) {
            tracing::debug!(field = %name, "released existing field");
        }
    }
    deadline.check("loading")?;

    let pool = TaskPool::from_config(config);
    tracing::info!(
        streamlines = tractogram.streamline_count(),
        faces = surface.face_count(),
        threads = pool.threads(),
        feature = %kind,
        "mapping"
    );
    let mapping = Mapper::new(MapperConfig::default()).map(&pool, &tractogram, &surface)?;
    deadline.check("mapping")?;

    let fields = {
        let ctx = AggregateContext::new(&pool, &surface, &mapping)?;
        compute(kind, &ctx, &req.name)?
    };
    deadline.check("aggregation")?;

    fields.attach(&mut surface)?;
    write_surface(&req.output, &surface)?;
    tracing::info!(
        contacts = mapping.total_contacts(),
        path = %req.output.display(),
        "surface written"
    );
    release_fields(surface.fields_mut());
    Ok(Outcome::Written {
        path: req.output.clone(),
    })
}

//! `field-import`: attach a raw binary field to a tractogram.

use std::fs;
use std::path::PathBuf;

use tractsurf_core::{DataType, FieldDomain, FieldHost, FieldOwner};
use tractsurf_engine::RunConfig;
use tractsurf_io::{read_tractogram, write_tractogram, Format};

use crate::error::CommandError;
use crate::{check_field_name, check_readable, release_fields, Outcome};

/// Inputs to [`run_field_import`], as given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldImportRequest {
    /// Tractogram to extend; rewritten in place.
    pub tractogram: PathBuf,
    /// Raw little-endian values, `cardinality × dimension × 4` bytes.
    pub field_file: PathBuf,
    /// Owner token (`POINT` or `STREAMLINE`).
    pub owner: String,
    /// Datatype token (`float` or `int`).
    pub datatype: String,
    /// Components per element.
    pub dimension: usize,
    /// Field name.
    pub name: String,
    /// Replace an existing field of the same name.
    pub force: bool,
}

struct Validated {
    owner: FieldOwner,
    datatype: DataType,
}

fn validate(req: &FieldImportRequest) -> Result<Validated, CommandError> {
    let owner: FieldOwner = req.owner.parse().map_err(|_| {
        CommandError::validation(format!(
            "unknown field owner \"{}\" (expected POINT or STREAMLINE)",
            req.owner
        ))
    })?;
    if owner.domain() != FieldDomain::Tractogram {
        return Err(CommandError::validation(format!(
            "field owner {owner} does not apply to tractograms (expected POINT or STREAMLINE)"
        )));
    }
    let datatype: DataType = req.datatype.parse().map_err(|_| {
        CommandError::validation(format!(
            "unknown datatype \"{}\" (expected float or int)",
            req.datatype
        ))
    })?;
    if req.dimension == 0 {
        return Err(CommandError::validation("field dimension must be positive"));
    }
    if req.name.to_ascii_lowercase().ends_with(".csv") {
        return Err(CommandError::validation(format!(
            "\"{}\" looks like a CSV file; only raw binary fields can be imported",
            req.name
        )));
    }
    check_field_name(&req.name)?;
    if !Format::from_path(&req.tractogram)?.stores_fields() {
        return Err(CommandError::validation(format!(
            "{} cannot store fields; use a .vtk tractogram",
            req.tractogram.display()
        )));
    }
    check_readable(&req.tractogram)?;
    check_readable(&req.field_file)?;
    Ok(Validated { owner, datatype })
}

/// Load the tractogram, attach the field read from `field_file`, and
/// rewrite the tractogram with all its fields.
///
/// Nothing is written unless every check passes; the rewrite goes
/// through a temporary file so the input survives a failed write.
pub fn run_field_import(
    req: &FieldImportRequest,
    config: &RunConfig,
) -> Result<Outcome, CommandError> {
    let v = validate(req)?;
    let deadline = config.start_deadline();

    let mut tractogram = read_tractogram(&req.tractogram)?;
    if tractogram.fields().contains(&req.name) {
        if !req.force {
            return Err(CommandError::conflict(format!(
                "field \"{}\" already exists in {} (use --force to replace it)",
                req.name,
                req.tractogram.display()
            )));
        }
        tractogram.fields_mut().release(&req.name);
        tracing::debug!(field = %req.name, "released existing field");
    }

    let bytes = fs::read(&req.field_file).map_err(|source| CommandError::Io {
        path: req.field_file.clone(),
        source,
    })?;
    tractogram.import_field(&req.name, v.owner, v.datatype, req.dimension, &bytes)?;
    deadline.check("loading")?;

    write_tractogram(&req.tractogram, &tractogram)?;
    tracing::info!(
        field = %req.name,
        owner = %v.owner,
        datatype = %v.datatype,
        dimension = req.dimension,
        path = %req.tractogram.display(),
        "field imported"
    );
    release_fields(tractogram.fields_mut());
    Ok(Outcome::Written {
        path: req.tractogram.clone(),
    })
}

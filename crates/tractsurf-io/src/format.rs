//! Extension-based format selection and path-level entry points.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use tractsurf_core::FieldHost;
use tractsurf_space::{Surface, Tractogram};

use crate::error::FormatError;
use crate::tck;
use crate::vtk::{self, PolyData};

/// A file format, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Legacy VTK polydata (`.vtk`).
    Vtk,
    /// MRtrix tracks (`.tck`).
    Tck,
    /// GIfTI surfaces (`.gii`). Recognised, never decoded.
    Gifti,
}

impl Format {
    /// Detect the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("vtk") => Ok(Self::Vtk),
            Some("tck") => Ok(Self::Tck),
            Some("gii") => Ok(Self::Gifti),
            _ => Err(FormatError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vtk => "VTK",
            Self::Tck => "TCK",
            Self::Gifti => "GIfTI",
        }
    }

    /// True if files of this format can carry field arrays.
    pub fn stores_fields(self) -> bool {
        matches!(self, Self::Vtk)
    }

    fn unsupported(self, what: &str) -> FormatError {
        FormatError::UnsupportedFormat {
            format: self.name().into(),
            reason: format!("{what} are not supported in this format"),
        }
    }
}

// ── Reading ─────────────────────────────────────────────────────

fn open(path: &Path) -> Result<BufReader<File>, FormatError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Read a tractogram (`.vtk` with all fields, or `.tck`).
pub fn read_tractogram(path: &Path) -> Result<Tractogram, FormatError> {
    let format = Format::from_path(path)?;
    let t = match format {
        Format::Vtk => vtk::read_polydata(&mut open(path)?)?.into_tractogram()?,
        Format::Tck => tck::read_tck(&mut open(path)?)?,
        Format::Gifti => return Err(format.unsupported("tractograms")),
    };
    tracing::debug!(
        path = %path.display(),
        streamlines = t.streamline_count(),
        fields = t.fields().len(),
        "loaded tractogram"
    );
    Ok(t)
}

/// Read a triangle surface (`.vtk` with all fields).
pub fn read_surface(path: &Path) -> Result<Surface, FormatError> {
    let format = Format::from_path(path)?;
    let s = match format {
        Format::Vtk => vtk::read_polydata(&mut open(path)?)?.into_surface()?,
        Format::Gifti => {
            return Err(FormatError::UnsupportedFormat {
                format: format.name().into(),
                reason: "GIfTI surfaces cannot be decoded; convert to VTK".into(),
            })
        }
        Format::Tck => return Err(format.unsupported("surfaces")),
    };
    tracing::debug!(
        path = %path.display(),
        vertices = s.vertex_count(),
        faces = s.face_count(),
        fields = s.fields().len(),
        "loaded surface"
    );
    Ok(s)
}

// ── Writing ─────────────────────────────────────────────────────

/// Write to a uniquely named temporary file in `path`'s directory,
/// then persist it over `path`. On failure the temporary file is dropped
/// and `path` is untouched.
fn write_atomic(
    path: &Path,
    encode: impl FnOnce(&mut dyn Write) -> Result<(), FormatError>,
) -> Result<(), FormatError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        encode(&mut w)?;
        w.flush()?;
    }
    tmp.persist(path).map_err(|e| FormatError::from(e.error))?;
    Ok(())
}

/// Write a tractogram (`.vtk` with all fields, or `.tck` without).
pub fn write_tractogram(path: &Path, t: &Tractogram) -> Result<(), FormatError> {
    let format = Format::from_path(path)?;
    match format {
        Format::Vtk => {
            let pd = PolyData::from_tractogram(t)?;
            write_atomic(path, |w| vtk::write_polydata(w, &pd))?;
        }
        Format::Tck => write_atomic(path, |w| tck::write_tck(w, t))?,
        Format::Gifti => return Err(format.unsupported("tractograms")),
    }
    tracing::debug!(path = %path.display(), streamlines = t.streamline_count(), "wrote tractogram");
    Ok(())
}

/// Write a surface (`.vtk` only) with all its fields.
pub fn write_surface(path: &Path, s: &Surface) -> Result<(), FormatError> {
    let format = Format::from_path(path)?;
    if format != Format::Vtk {
        return Err(format.unsupported("surface outputs"));
    }
    let pd = PolyData::from_surface(s)?;
    write_atomic(path, |w| vtk::write_polydata(w, &pd))?;
    tracing::debug!(path = %path.display(), faces = s.face_count(), "wrote surface");
    Ok(())
}

//! Legacy VTK binary polydata.
//!
//! Reading accepts format versions up to 5.1 (classic and
//! `OFFSETS`/`CONNECTIVITY` cell layouts), `POINT_DATA` / `CELL_DATA`
//! sections with `FIELD`, `SCALARS`, `VECTORS` and `NORMALS` arrays, and
//! skips `METADATA` blocks and lookup tables. Writing emits version 3.0
//! with classic cells and `FIELD` arrays only.
//!
//! [`PolyData`] is the format-level view. Conversions map it onto
//! tractograms (`LINES`; point data → `POINT`, cell data → `STREAMLINE`)
//! and surfaces (`POLYGONS`; point data → `VERTEX`, cell data → `FACE`).

use std::io::{Read, Write};
use std::ops::Range;

use tractsurf_core::{Field, FieldData, FieldHost, FieldOwner, Point3};
use tractsurf_space::{Surface, Tractogram};

use crate::codec::{self, byte_len, parse_count, Scanner};
use crate::error::FormatError;

const SIGNATURE: &str = "# vtk DataFile Version";

/// A named array from a `POINT_DATA` or `CELL_DATA` section.
#[derive(Clone, Debug, PartialEq)]
pub struct VtkArray {
    /// Array name.
    pub name: String,
    /// Components per tuple.
    pub components: usize,
    /// `tuples × components` values.
    pub data: FieldData,
}

/// The contents of a polydata file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PolyData {
    /// Second header line.
    pub title: String,
    /// Point coordinates.
    pub points: Vec<Point3>,
    /// `VERTICES` cells.
    pub vertices: Vec<Vec<u32>>,
    /// `LINES` cells.
    pub lines: Vec<Vec<u32>>,
    /// `POLYGONS` cells.
    pub polygons: Vec<Vec<u32>>,
    /// `TRIANGLE_STRIPS` cells.
    pub strips: Vec<Vec<u32>>,
    /// Arrays with one tuple per point.
    pub point_data: Vec<VtkArray>,
    /// Arrays with one tuple per cell, over vertices, lines, polygons
    /// and strips in that order.
    pub cell_data: Vec<VtkArray>,
}

impl PolyData {
    fn cell_count(&self) -> usize {
        self.vertices.len() + self.lines.len() + self.polygons.len() + self.strips.len()
    }

    /// Every array must cover its section exactly.
    fn check_arrays(&self) -> Result<(), FormatError> {
        let sections = [
            (&self.point_data, self.points.len(), "points"),
            (&self.cell_data, self.cell_count(), "cells"),
        ];
        for (arrays, tuples, what) in sections {
            for a in arrays {
                if a.components == 0 || a.data.len() != tuples * a.components {
                    return Err(FormatError::malformed(format!(
                        "array \"{}\" holds {} values for {tuples} {what}",
                        a.name,
                        a.data.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn line_cells(&self) -> Range<usize> {
        let start = self.vertices.len();
        start..start + self.lines.len()
    }

    fn polygon_cells(&self) -> Range<usize> {
        let start = self.vertices.len() + self.lines.len();
        start..start + self.polygons.len()
    }
}

// ── Element types ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScalarType {
    F32,
    F64,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl ScalarType {
    fn parse(token: &str) -> Result<Self, FormatError> {
        Ok(match token.to_ascii_lowercase().as_str() {
            "float" => Self::F32,
            "double" => Self::F64,
            "char" => Self::I8,
            "unsigned_char" => Self::U8,
            "short" => Self::I16,
            "unsigned_short" => Self::U16,
            "int" | "vtkidtype" => Self::I32,
            "unsigned_int" => Self::U32,
            "long" | "vtktypeint64" => Self::I64,
            "unsigned_long" | "vtktypeuint64" => Self::U64,
            other => {
                return Err(FormatError::UnsupportedFormat {
                    format: "VTK".into(),
                    reason: format!("element type \"{other}\""),
                })
            }
        })
    }

    fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F64 | Self::I64 | Self::U64 => 8,
        }
    }

    fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Decode `count` big-endian values of type `ty`.
fn read_values(s: &mut Scanner<'_>, ty: ScalarType, count: usize) -> Result<FieldData, FormatError> {
    let bytes = s.take(byte_len(count, ty.size())?)?;
    let chunks = bytes.chunks_exact(ty.size());
    if ty.is_float() {
        let values = chunks
            .map(|c| match ty {
                ScalarType::F64 => f64::from_be_bytes(c.try_into().unwrap_or([0; 8])) as f32,
                _ => f32::from_be_bytes(c.try_into().unwrap_or([0; 4])),
            })
            .collect();
        return Ok(FieldData::Float(values));
    }
    let values = chunks
        .map(|c| {
            let wide: i64 = match ty {
                ScalarType::I8 => i64::from(c[0] as i8),
                ScalarType::U8 => i64::from(c[0]),
                ScalarType::I16 => i64::from(i16::from_be_bytes([c[0], c[1]])),
                ScalarType::U16 => i64::from(u16::from_be_bytes([c[0], c[1]])),
                ScalarType::I32 => i64::from(i32::from_be_bytes([c[0], c[1], c[2], c[3]])),
                ScalarType::U32 => i64::from(u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
                ScalarType::I64 => i64::from_be_bytes(c.try_into().unwrap_or([0; 8])),
                ScalarType::U64 => {
                    let v = u64::from_be_bytes(c.try_into().unwrap_or([0; 8]));
                    i64::try_from(v).unwrap_or(i64::MAX)
                }
                ScalarType::F32 | ScalarType::F64 => 0,
            };
            i32::try_from(wide)
                .map_err(|_| FormatError::malformed(format!("integer value {wide} does not fit in 32 bits")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FieldData::Int(values))
}

/// Decode `count` values as non-negative indices.
fn read_indices(s: &mut Scanner<'_>, ty: ScalarType, count: usize) -> Result<Vec<u32>, FormatError> {
    if ty.is_float() {
        return Err(FormatError::malformed("cell indices must be integers"));
    }
    match read_values(s, ty, count)? {
        FieldData::Int(v) => v
            .into_iter()
            .map(|i| u32::try_from(i).map_err(|_| FormatError::malformed(format!("negative index {i}"))))
            .collect(),
        FieldData::Float(_) => Err(FormatError::malformed("cell indices must be integers")),
    }
}

// ── Reader ──────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Point(usize),
    Cell(usize),
}

/// Read a binary polydata file.
pub fn read_polydata(r: &mut dyn Read) -> Result<PolyData, FormatError> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    let mut s = Scanner::new(&bytes);

    let signature = s.raw_line()?;
    if !signature.starts_with(SIGNATURE) {
        return Err(FormatError::malformed("missing \"# vtk DataFile Version\" signature"));
    }
    let mut pd = PolyData {
        title: s.raw_line()?.trim().to_string(),
        ..PolyData::default()
    };
    match s.next_line()?.map(str::to_ascii_uppercase).as_deref() {
        Some("BINARY") => {}
        Some("ASCII") => {
            return Err(FormatError::UnsupportedFormat {
                format: "ASCII VTK".into(),
                reason: "only binary legacy files are supported".into(),
            })
        }
        other => {
            return Err(FormatError::malformed(format!(
                "expected BINARY or ASCII, found {other:?}"
            )))
        }
    }
    let dataset = s.next_line()?.unwrap_or_default();
    if !dataset.eq_ignore_ascii_case("DATASET POLYDATA") {
        return Err(FormatError::UnsupportedFormat {
            format: "VTK".into(),
            reason: format!("\"{dataset}\" (only POLYDATA is supported)"),
        });
    }

    let mut section = Section::None;
    while let Some(line) = s.next_line()? {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default().to_ascii_uppercase();
        match keyword.as_str() {
            "POINTS" => {
                let n = parse_count(tokens.next(), "point count")?;
                let ty = ScalarType::parse(tokens.next().unwrap_or("float"))?;
                if !ty.is_float() {
                    return Err(FormatError::malformed("POINTS must be float or double"));
                }
                let coords = read_values(&mut s, ty, byte_len(n, 3)?)?;
                let coords = coords.as_float().unwrap_or_default();
                pd.points = coords.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
            }
            "VERTICES" | "LINES" | "POLYGONS" | "TRIANGLE_STRIPS" => {
                let n = parse_count(tokens.next(), "cell count")?;
                let size = parse_count(tokens.next(), "cell list size")?;
                let cells = read_cells(&mut s, n, size, pd.points.len())?;
                match keyword.as_str() {
                    "VERTICES" => pd.vertices = cells,
                    "LINES" => pd.lines = cells,
                    "POLYGONS" => pd.polygons = cells,
                    _ => pd.strips = cells,
                }
            }
            "POINT_DATA" => section = Section::Point(parse_count(tokens.next(), "POINT_DATA count")?),
            "CELL_DATA" => section = Section::Cell(parse_count(tokens.next(), "CELL_DATA count")?),
            "FIELD" => {
                tokens.next();
                let arrays = parse_count(tokens.next(), "FIELD array count")?;
                for _ in 0..arrays {
                    let header = next_array_header(&mut s)?;
                    let mut t = header.split_whitespace();
                    let name = t.next().unwrap_or_default().to_string();
                    let components = parse_count(t.next(), "component count")?;
                    let tuples = parse_count(t.next(), "tuple count")?;
                    let ty = ScalarType::parse(t.next().unwrap_or_default())?;
                    let data = read_values(&mut s, ty, byte_len(tuples, components)?)?;
                    push_array(&mut pd, section, tuples, VtkArray { name, components, data })?;
                }
            }
            "SCALARS" => {
                let name = tokens.next().unwrap_or_default().to_string();
                let ty = ScalarType::parse(tokens.next().unwrap_or_default())?;
                let components = tokens.next().map_or(Ok(1), |t| parse_count(Some(t), "component count"))?;
                if peek_keyword(&s, "LOOKUP_TABLE") {
                    s.next_line()?;
                }
                let tuples = section_len(section)?;
                let data = read_values(&mut s, ty, byte_len(tuples, components)?)?;
                push_array(&mut pd, section, tuples, VtkArray { name, components, data })?;
            }
            "VECTORS" | "NORMALS" => {
                let name = tokens.next().unwrap_or_default().to_string();
                let ty = ScalarType::parse(tokens.next().unwrap_or_default())?;
                let tuples = section_len(section)?;
                let data = read_values(&mut s, ty, byte_len(tuples, 3)?)?;
                push_array(&mut pd, section, tuples, VtkArray { name, components: 3, data })?;
            }
            "LOOKUP_TABLE" => {
                tokens.next();
                let size = parse_count(tokens.next(), "lookup table size")?;
                s.take(byte_len(size, 4)?)?;
            }
            "METADATA" => skip_metadata(&mut s)?,
            other => {
                return Err(FormatError::UnsupportedFormat {
                    format: "VTK".into(),
                    reason: format!("keyword \"{other}\""),
                })
            }
        }
    }
    tracing::debug!(
        points = pd.points.len(),
        lines = pd.lines.len(),
        polygons = pd.polygons.len(),
        point_arrays = pd.point_data.len(),
        cell_arrays = pd.cell_data.len(),
        "read VTK polydata"
    );
    Ok(pd)
}

/// True if the next line starts with `keyword`. Binary data that is not
/// valid text counts as no match.
fn peek_keyword(s: &Scanner<'_>, keyword: &str) -> bool {
    s.peek_line()
        .ok()
        .flatten()
        .and_then(|l| l.split_whitespace().next())
        .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
}

fn section_len(section: Section) -> Result<usize, FormatError> {
    match section {
        Section::Point(n) | Section::Cell(n) => Ok(n),
        Section::None => Err(FormatError::malformed(
            "attribute array outside POINT_DATA or CELL_DATA",
        )),
    }
}

fn push_array(
    pd: &mut PolyData,
    section: Section,
    tuples: usize,
    array: VtkArray,
) -> Result<(), FormatError> {
    let expected = section_len(section)?;
    if tuples != expected {
        return Err(FormatError::malformed(format!(
            "array \"{}\" has {tuples} tuples, section has {expected}",
            array.name
        )));
    }
    match section {
        Section::Point(_) => pd.point_data.push(array),
        _ => pd.cell_data.push(array),
    }
    Ok(())
}

/// The next array header inside a `FIELD` block, skipping `METADATA`.
fn next_array_header<'a>(s: &mut Scanner<'a>) -> Result<&'a str, FormatError> {
    loop {
        match s.next_line()? {
            Some(l) if l.eq_ignore_ascii_case("METADATA") => skip_metadata(s)?,
            Some(l) => return Ok(l),
            None => return Err(FormatError::malformed("FIELD block ends early")),
        }
    }
}

/// Skip a `METADATA` block, which runs to the next blank line.
fn skip_metadata(s: &mut Scanner<'_>) -> Result<(), FormatError> {
    while !s.remaining().is_empty() {
        if s.raw_line()?.trim().is_empty() {
            break;
        }
    }
    Ok(())
}

fn read_cells(
    s: &mut Scanner<'_>,
    n: usize,
    size: usize,
    point_count: usize,
) -> Result<Vec<Vec<u32>>, FormatError> {
    let cells = if peek_keyword(s, "OFFSETS") {
        // Version 5.x: `n` offsets then `size` connectivity entries.
        let offsets_ty = cell_array_type(s, "OFFSETS")?;
        let offsets = read_indices(s, offsets_ty, n)?;
        let conn_ty = cell_array_type(s, "CONNECTIVITY")?;
        let conn = read_indices(s, conn_ty, size)?;
        let mut cells = Vec::with_capacity(n.saturating_sub(1));
        for w in offsets.windows(2) {
            let (a, b) = (w[0] as usize, w[1] as usize);
            if a > b || b > conn.len() {
                return Err(FormatError::malformed("cell offsets out of range"));
            }
            cells.push(conn[a..b].to_vec());
        }
        cells
    } else {
        let raw = s.i32_be(size)?;
        let mut cells = Vec::with_capacity(n);
        let mut i = 0;
        for _ in 0..n {
            let len = raw
                .get(i)
                .and_then(|&l| usize::try_from(l).ok())
                .ok_or_else(|| FormatError::malformed("cell list is truncated"))?;
            let ids = raw
                .get(i + 1..i + 1 + len)
                .ok_or_else(|| FormatError::malformed("cell list is truncated"))?;
            cells.push(
                ids.iter()
                    .map(|&v| u32::try_from(v).map_err(|_| FormatError::malformed(format!("negative index {v}"))))
                    .collect::<Result<Vec<_>, _>>()?,
            );
            i += 1 + len;
        }
        if i != size {
            return Err(FormatError::malformed(format!(
                "cell list size {size} does not match its contents ({i})"
            )));
        }
        cells
    };
    if let Some(&bad) = cells.iter().flatten().find(|&&v| v as usize >= point_count) {
        return Err(FormatError::malformed(format!(
            "cell references point {bad}, file has {point_count} points"
        )));
    }
    Ok(cells)
}

fn cell_array_type(s: &mut Scanner<'_>, keyword: &str) -> Result<ScalarType, FormatError> {
    let line = s.next_line()?.unwrap_or_default();
    let mut t = line.split_whitespace();
    if !t.next().is_some_and(|k| k.eq_ignore_ascii_case(keyword)) {
        return Err(FormatError::malformed(format!("expected {keyword}, found \"{line}\"")));
    }
    ScalarType::parse(t.next().unwrap_or("vtktypeint64"))
}

// ── Writer ──────────────────────────────────────────────────────

/// Write a binary polydata file (version 3.0, classic cells, `FIELD`
/// arrays).
pub fn write_polydata(w: &mut dyn Write, pd: &PolyData) -> Result<(), FormatError> {
    codec::write_line(w, &format!("{SIGNATURE} 3.0"))?;
    codec::write_line(w, pd.title.lines().next().unwrap_or_default())?;
    codec::write_line(w, "BINARY")?;
    codec::write_line(w, "DATASET POLYDATA")?;
    codec::write_line(w, &format!("POINTS {} float", pd.points.len()))?;
    for p in &pd.points {
        for &c in p {
            codec::write_f32_be(w, c)?;
        }
    }
    w.write_all(b"\n")?;

    for (keyword, cells) in [
        ("VERTICES", &pd.vertices),
        ("LINES", &pd.lines),
        ("POLYGONS", &pd.polygons),
        ("TRIANGLE_STRIPS", &pd.strips),
    ] {
        if cells.is_empty() {
            continue;
        }
        let size: usize = cells.iter().map(|c| c.len() + 1).sum();
        codec::write_line(w, &format!("{keyword} {} {size}", cells.len()))?;
        for cell in cells {
            codec::write_i32_be(w, to_i32(cell.len())?)?;
            for &v in cell {
                codec::write_i32_be(w, to_i32(v as usize)?)?;
            }
        }
        w.write_all(b"\n")?;
    }

    write_section(w, "POINT_DATA", pd.points.len(), &pd.point_data)?;
    write_section(w, "CELL_DATA", pd.cell_count(), &pd.cell_data)?;
    w.flush()?;
    Ok(())
}

fn write_section(
    w: &mut dyn Write,
    keyword: &str,
    tuples: usize,
    arrays: &[VtkArray],
) -> Result<(), FormatError> {
    if arrays.is_empty() {
        return Ok(());
    }
    codec::write_line(w, &format!("{keyword} {tuples}"))?;
    codec::write_line(w, &format!("FIELD FieldData {}", arrays.len()))?;
    for a in arrays {
        check_name(&a.name)?;
        if a.data.len() != tuples * a.components {
            return Err(FormatError::malformed(format!(
                "array \"{}\" holds {} values, expected {}",
                a.name,
                a.data.len(),
                tuples * a.components
            )));
        }
        codec::write_line(
            w,
            &format!("{} {} {tuples} {}", a.name, a.components, a.data.datatype()),
        )?;
        match &a.data {
            FieldData::Float(v) => {
                for &x in v {
                    codec::write_f32_be(w, x)?;
                }
            }
            FieldData::Int(v) => {
                for &x in v {
                    codec::write_i32_be(w, x)?;
                }
            }
        }
        w.write_all(b"\n")?;
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), FormatError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(FormatError::InvalidFieldName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn to_i32(v: usize) -> Result<i32, FormatError> {
    i32::try_from(v).map_err(|_| FormatError::malformed(format!("{v} exceeds the 32-bit index range")))
}

// ── Conversions ─────────────────────────────────────────────────

/// Pick the tuples at `indices`.
fn gather(data: &FieldData, components: usize, indices: impl Iterator<Item = usize>) -> FieldData {
    fn pick<T: Copy>(v: &[T], components: usize, indices: impl Iterator<Item = usize>) -> Vec<T> {
        indices
            .flat_map(|i| v[i * components..(i + 1) * components].iter().copied())
            .collect()
    }
    match data {
        FieldData::Float(v) => FieldData::Float(pick(v, components, indices)),
        FieldData::Int(v) => FieldData::Int(pick(v, components, indices)),
    }
}

fn attach_arrays<H: FieldHost>(
    host: &mut H,
    owner: FieldOwner,
    cardinality: usize,
    arrays: Vec<(String, usize, FieldData)>,
) -> Result<(), FormatError> {
    if cardinality == 0 {
        return Ok(());
    }
    for (name, components, data) in arrays {
        let field = Field::from_data(name, owner, components, cardinality, data)?;
        host.attach_field(field)?;
    }
    Ok(())
}

fn arrays_for<H: FieldHost>(host: &H, owner: FieldOwner) -> Result<Vec<VtkArray>, FormatError> {
    host.fields()
        .iter()
        .filter(|f| f.owner() == owner)
        .map(|f| {
            check_name(f.name())?;
            Ok(VtkArray {
                name: f.name().to_string(),
                components: f.dimension(),
                data: f.data().clone(),
            })
        })
        .collect()
}

impl PolyData {
    /// Build a tractogram from the `LINES` cells.
    ///
    /// Lines that do not walk the point list in order are gathered into
    /// order, carrying their point arrays along; points no line uses are
    /// dropped.
    pub fn into_tractogram(self) -> Result<Tractogram, FormatError> {
        self.check_arrays()?;
        let cells = self.line_cells();
        let sequential = self
            .lines
            .iter()
            .flatten()
            .enumerate()
            .all(|(k, &v)| v as usize == k)
            && self.lines.iter().map(Vec::len).sum::<usize>() == self.points.len();

        let mut offsets = Vec::with_capacity(self.lines.len() + 1);
        offsets.push(0);
        for line in &self.lines {
            let last = offsets.last().copied().unwrap_or(0);
            offsets.push(last + line.len());
        }

        let (points, point_arrays) = if sequential {
            let arrays = self
                .point_data
                .into_iter()
                .map(|a| (a.name, a.components, a.data))
                .collect();
            (self.points, arrays)
        } else {
            tracing::debug!("gathering non-sequential lines");
            let order: Vec<usize> = self.lines.iter().flatten().map(|&v| v as usize).collect();
            let points = order.iter().map(|&i| self.points[i]).collect();
            let arrays = self
                .point_data
                .into_iter()
                .map(|a| {
                    let data = gather(&a.data, a.components, order.iter().copied());
                    (a.name, a.components, data)
                })
                .collect();
            (points, arrays)
        };

        let cell_arrays = self
            .cell_data
            .into_iter()
            .map(|a| {
                let data = gather(&a.data, a.components, cells.clone());
                (a.name, a.components, data)
            })
            .collect();

        let mut t = Tractogram::from_parts(points, offsets)?;
        let (np, ns) = (t.point_count(), t.streamline_count());
        attach_arrays(&mut t, FieldOwner::Point, np, point_arrays)?;
        attach_arrays(&mut t, FieldOwner::Streamline, ns, cell_arrays)?;
        Ok(t)
    }

    /// Build a surface from the `POLYGONS` cells, which must all be
    /// triangles.
    pub fn into_surface(self) -> Result<Surface, FormatError> {
        self.check_arrays()?;
        let cells = self.polygon_cells();
        if !self.lines.is_empty() {
            tracing::warn!(lines = self.lines.len(), "ignoring LINES in surface file");
        }
        let faces = self
            .polygons
            .iter()
            .map(|p| match p.as_slice() {
                &[a, b, c] => Ok([a, b, c]),
                other => Err(FormatError::UnsupportedFormat {
                    format: "VTK".into(),
                    reason: format!("polygon with {} vertices (only triangles are supported)", other.len()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cell_arrays = self
            .cell_data
            .into_iter()
            .map(|a| {
                let data = gather(&a.data, a.components, cells.clone());
                (a.name, a.components, data)
            })
            .collect();
        let point_arrays = self
            .point_data
            .into_iter()
            .map(|a| (a.name, a.components, a.data))
            .collect();

        let mut s = Surface::new(self.points, faces)?;
        let (nv, nf) = (s.vertex_count(), s.face_count());
        attach_arrays(&mut s, FieldOwner::Vertex, nv, point_arrays)?;
        attach_arrays(&mut s, FieldOwner::Face, nf, cell_arrays)?;
        Ok(s)
    }

    /// Polydata for a tractogram and all its fields.
    pub fn from_tractogram(t: &Tractogram) -> Result<Self, FormatError> {
        let lines = t
            .offsets()
            .windows(2)
            .map(|w| (w[0]..w[1]).map(index_u32).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: "tractsurf tractogram".into(),
            points: t.points().to_vec(),
            lines,
            point_data: arrays_for(t, FieldOwner::Point)?,
            cell_data: arrays_for(t, FieldOwner::Streamline)?,
            ..Self::default()
        })
    }

    /// Polydata for a surface and all its fields.
    pub fn from_surface(s: &Surface) -> Result<Self, FormatError> {
        Ok(Self {
            title: "tractsurf surface".into(),
            points: s.vertices().to_vec(),
            polygons: s.faces().iter().map(|f| f.to_vec()).collect(),
            point_data: arrays_for(s, FieldOwner::Vertex)?,
            cell_data: arrays_for(s, FieldOwner::Face)?,
            ..Self::default()
        })
    }
}

fn index_u32(i: usize) -> Result<u32, FormatError> {
    u32::try_from(i).map_err(|_| FormatError::malformed(format!("point index {i} exceeds 32 bits")))
}

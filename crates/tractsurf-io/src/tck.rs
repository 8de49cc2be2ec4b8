//! MRtrix `.tck` track files.
//!
//! A text header (`mrtrix tracks`, `key: value` lines, `END`) is
//! followed at the byte offset named by `file: . <offset>` by a stream
//! of xyz triplets. A NaN triplet closes a streamline and an infinite
//! triplet ends the data. The format has no field arrays.

use std::io::{Read, Write};

use tractsurf_core::{FieldHost, Point3};
use tractsurf_space::Tractogram;

use crate::codec::{self, Scanner};
use crate::error::FormatError;

const MAGIC: &str = "mrtrix tracks";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Encoding {
    F32Le,
    F32Be,
    F64Le,
    F64Be,
}

impl Encoding {
    fn parse(token: &str) -> Result<Self, FormatError> {
        match token {
            "Float32LE" => Ok(Self::F32Le),
            "Float32BE" => Ok(Self::F32Be),
            "Float64LE" => Ok(Self::F64Le),
            "Float64BE" => Ok(Self::F64Be),
            other => Err(FormatError::UnsupportedFormat {
                format: "TCK".into(),
                reason: format!("datatype \"{other}\""),
            }),
        }
    }

    fn size(self) -> usize {
        match self {
            Self::F32Le | Self::F32Be => 4,
            Self::F64Le | Self::F64Be => 8,
        }
    }

    fn decode(self, b: &[u8]) -> f32 {
        let mut w4 = [0u8; 4];
        let mut w8 = [0u8; 8];
        match self {
            Self::F32Le | Self::F32Be => w4.copy_from_slice(&b[..4]),
            Self::F64Le | Self::F64Be => w8.copy_from_slice(&b[..8]),
        }
        match self {
            Self::F32Le => f32::from_le_bytes(w4),
            Self::F32Be => f32::from_be_bytes(w4),
            Self::F64Le => f64::from_le_bytes(w8) as f32,
            Self::F64Be => f64::from_be_bytes(w8) as f32,
        }
    }
}

/// Read a track file.
pub fn read_tck(r: &mut dyn Read) -> Result<Tractogram, FormatError> {
    let mut bytes = Vec::new();
    r.read_to_end(&mut bytes)?;
    let mut s = Scanner::new(&bytes);

    if s.raw_line()?.trim() != MAGIC {
        return Err(FormatError::malformed("missing \"mrtrix tracks\" signature"));
    }
    let mut encoding = None;
    let mut offset = None;
    loop {
        let line = s.raw_line()?.trim();
        if line == "END" {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "datatype" => encoding = Some(Encoding::parse(value.trim())?),
            "file" => {
                let mut parts = value.split_whitespace();
                if parts.next() != Some(".") {
                    return Err(FormatError::UnsupportedFormat {
                        format: "TCK".into(),
                        reason: "track data in a separate file".into(),
                    });
                }
                offset = Some(codec::parse_count(parts.next(), "data offset")?);
            }
            _ => {}
        }
    }
    let encoding = encoding.ok_or_else(|| FormatError::malformed("header has no datatype"))?;
    let offset = offset.ok_or_else(|| FormatError::malformed("header has no file offset"))?;
    let data = bytes
        .get(offset..)
        .ok_or_else(|| FormatError::malformed(format!("data offset {offset} is past end of file")))?;

    let mut points = Vec::new();
    let mut offsets = vec![0];
    let mut current: Vec<Point3> = Vec::new();
    for triplet in data.chunks_exact(3 * encoding.size()) {
        let p = [
            encoding.decode(triplet),
            encoding.decode(&triplet[encoding.size()..]),
            encoding.decode(&triplet[2 * encoding.size()..]),
        ];
        if p.iter().any(|c| c.is_infinite()) {
            break;
        }
        if p.iter().any(|c| c.is_nan()) {
            points.append(&mut current);
            offsets.push(points.len());
            continue;
        }
        current.push(p);
    }
    if !current.is_empty() {
        tracing::warn!(points = current.len(), "track file ends inside a streamline");
        points.append(&mut current);
        offsets.push(points.len());
    }
    let t = Tractogram::from_parts(points, offsets)?;
    tracing::debug!(
        streamlines = t.streamline_count(),
        points = t.point_count(),
        ?encoding,
        "read TCK"
    );
    Ok(t)
}

/// The header for `count` streamlines with the data at `offset`.
fn header(count: usize, offset: usize) -> String {
    format!("{MAGIC}\ndatatype: Float32LE\ncount: {count}\nfile: . {offset}\nEND\n")
}

/// Write a track file (`Float32LE`). Fields are not representable and
/// are dropped with a warning.
pub fn write_tck(w: &mut dyn Write, t: &Tractogram) -> Result<(), FormatError> {
    if !t.fields().is_empty() {
        tracing::warn!(
            fields = t.fields().len(),
            "TCK cannot store fields; they are not written"
        );
    }
    // The offset is part of the header, so grow it until it covers itself.
    let mut offset = 0;
    loop {
        let len = header(t.streamline_count(), offset).len();
        if len <= offset {
            break;
        }
        offset = len;
    }
    let text = header(t.streamline_count(), offset);
    w.write_all(text.as_bytes())?;
    w.write_all(&vec![0u8; offset - text.len()])?;

    for line in t.iter() {
        for p in line {
            for &c in p {
                codec::write_f32_le(w, c)?;
            }
        }
        for _ in 0..3 {
            codec::write_f32_le(w, f32::NAN)?;
        }
    }
    for _ in 0..3 {
        codec::write_f32_le(w, f32::INFINITY)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tractsurf_core::{DataType, FieldOwner, StreamlineId};

    #[test]
    fn written_file_reads_back() {
        let lines: Vec<Vec<Point3>> = vec![
            vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]],
            vec![[-1.5, 0.25, 9.0]],
        ];
        let t = Tractogram::from_streamlines(lines);
        let mut buf = Vec::new();
        write_tck(&mut buf, &t).unwrap();
        let back = read_tck(&mut buf.as_slice()).unwrap();
        assert_eq!(back.points(), t.points());
        assert_eq!(back.offsets(), t.offsets());
    }

    #[test]
    fn header_offset_points_at_data() {
        let t = Tractogram::from_streamlines([[[7.0, 8.0, 9.0]]]);
        let mut buf = Vec::new();
        write_tck(&mut buf, &t).unwrap();
        let text = String::from_utf8_lossy(&buf);
        let offset: usize = text
            .lines()
            .find_map(|l| l.strip_prefix("file: . "))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(&buf[offset..offset + 4], &7.0f32.to_le_bytes());
    }

    #[test]
    fn reads_big_endian_doubles() {
        let mut f = b"mrtrix tracks\ndatatype: Float64BE\nfile: . 64\nEND\n".to_vec();
        f.resize(64, 0);
        for v in [1.0f64, 2.0, 3.0, f64::NAN, f64::NAN, f64::NAN] {
            f.extend(v.to_be_bytes());
        }
        for _ in 0..3 {
            f.extend(f64::INFINITY.to_be_bytes());
        }
        let t = read_tck(&mut f.as_slice()).unwrap();
        assert_eq!(t.streamline_count(), 1);
        assert_eq!(t.streamline(StreamlineId(0)), &[[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn unknown_datatype_is_unsupported() {
        let f = b"mrtrix tracks\ndatatype: Int16LE\nfile: . 40\nEND\n";
        assert!(matches!(
            read_tck(&mut f.as_slice()),
            Err(FormatError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_end_is_malformed() {
        let f = b"mrtrix tracks\ndatatype: Float32LE\n";
        assert!(matches!(
            read_tck(&mut f.as_slice()),
            Err(FormatError::Malformed { .. })
        ));
    }

    #[test]
    fn fields_are_dropped_not_rejected() {
        let mut t = Tractogram::from_streamlines([[[0.0; 3]]]);
        t.create_field("fa", FieldOwner::Point, DataType::Float, 1)
            .unwrap();
        let mut buf = Vec::new();
        write_tck(&mut buf, &t).unwrap();
        assert!(read_tck(&mut buf.as_slice()).unwrap().fields().is_empty());
    }
}

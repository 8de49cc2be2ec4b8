//! Byte-level helpers shared by the codecs.
//!
//! Both formats mix ASCII header lines with raw binary blocks. Readers
//! load the whole file and walk it with a [`Scanner`]; writers stream
//! through the `write_*` primitives. VTK binary data is big-endian.

use std::io::Write;

use crate::error::FormatError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a big-endian f32.
pub fn write_f32_be(w: &mut dyn Write, v: f32) -> Result<(), FormatError> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Write a big-endian i32.
pub fn write_i32_be(w: &mut dyn Write, v: i32) -> Result<(), FormatError> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), FormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write one ASCII line terminated by `\n`.
pub fn write_line(w: &mut dyn Write, line: &str) -> Result<(), FormatError> {
    w.write_all(line.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

// ── Scanner ─────────────────────────────────────────────────────

/// A cursor over an in-memory file.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Start at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// The next line exactly as stored (without its `\n` or `\r\n`).
    /// Fails at end of data.
    pub fn raw_line(&mut self) -> Result<&'a str, FormatError> {
        if self.pos >= self.data.len() {
            return Err(FormatError::malformed("unexpected end of file"));
        }
        let rest = &self.data[self.pos..];
        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        std::str::from_utf8(line)
            .map_err(|_| FormatError::malformed(format!("non-text header line at byte {}", self.pos)))
    }

    /// Skip blank space, then return the next non-empty line trimmed,
    /// or `None` at end of data.
    pub fn next_line(&mut self) -> Result<Option<&'a str>, FormatError> {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        self.raw_line().map(|l| Some(l.trim()))
    }

    /// Like [`next_line`](Self::next_line) but without consuming.
    pub fn peek_line(&self) -> Result<Option<&'a str>, FormatError> {
        self.clone().next_line()
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                FormatError::malformed(format!(
                    "expected {n} bytes at offset {}, file has {} left",
                    self.pos,
                    self.data.len() - self.pos
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Consume `count` big-endian i32 values.
    pub fn i32_be(&mut self, count: usize) -> Result<Vec<i32>, FormatError> {
        let bytes = self.take(byte_len(count, 4)?)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

/// `count × size`, failing on overflow.
pub fn byte_len(count: usize, size: usize) -> Result<usize, FormatError> {
    count
        .checked_mul(size)
        .ok_or_else(|| FormatError::malformed(format!("{count} elements overflow the address space")))
}

/// Parse a count token.
pub fn parse_count(token: Option<&str>, what: &str) -> Result<usize, FormatError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| FormatError::malformed(format!("missing or invalid {what}")))
}

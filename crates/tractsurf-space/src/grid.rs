//! Uniform-grid spatial index over mesh faces.

use tractsurf_core::geometry::{self, Point3};

/// Upper bound on grid resolution along any axis.
const MAX_CELLS_PER_AXIS: usize = 128;

/// A uniform grid over the mesh bounding box.
///
/// Every face is bucketed into each cell its bounding box overlaps.
/// Buckets are stored CSR-style: the faces of cell `c` are
/// `entries[cell_start[c]..cell_start[c + 1]]`.
#[derive(Clone, Debug)]
pub struct FaceGrid {
    origin: Point3,
    cell_size: f32,
    dims: [usize; 3],
    cell_start: Vec<u32>,
    entries: Vec<u32>,
}

impl FaceGrid {
    /// Build the index for a mesh.
    ///
    /// Cell size is twice the mean edge length, coarsened if needed so
    /// that no axis exceeds 128 cells.
    pub fn build(vertices: &[Point3], faces: &[[u32; 3]]) -> Self {
        let Some((lo, hi)) = geometry::bounding_box(vertices.iter()) else {
            return Self::empty();
        };
        if faces.is_empty() {
            return Self::empty();
        }

        let extent = geometry::sub(hi, lo);
        let longest = extent[0].max(extent[1]).max(extent[2]);
        let cell_size = (2.0 * mean_edge_length(vertices, faces))
            .max(longest / MAX_CELLS_PER_AXIS as f32)
            .max(f32::EPSILON);

        let mut dims = [1usize; 3];
        for (axis, dim) in dims.iter_mut().enumerate() {
            *dim = ((extent[axis] / cell_size) as usize + 1).min(MAX_CELLS_PER_AXIS);
        }

        let mut grid = Self {
            origin: lo,
            cell_size,
            dims,
            cell_start: Vec::new(),
            entries: Vec::new(),
        };

        // Counting sort: sizes, prefix sums, then fill.
        let cell_count = dims[0] * dims[1] * dims[2];
        let mut counts = vec![0u32; cell_count + 1];
        let ranges: Vec<([usize; 3], [usize; 3])> = faces
            .iter()
            .map(|f| {
                let tri = f.map(|v| vertices[v as usize]);
                let (flo, fhi) = geometry::bounding_box(tri.iter()).unwrap_or((lo, lo));
                (grid.cell_of(flo), grid.cell_of(fhi))
            })
            .collect();
        for (a, b) in &ranges {
            grid.for_each_cell(*a, *b, |c| counts[c + 1] += 1);
        }
        for c in 0..cell_count {
            counts[c + 1] += counts[c];
        }
        let mut cursor = counts.clone();
        let mut entries = vec![0u32; counts[cell_count] as usize];
        for (face, (a, b)) in ranges.iter().enumerate() {
            grid.for_each_cell(*a, *b, |c| {
                entries[cursor[c] as usize] = face as u32;
                cursor[c] += 1;
            });
        }
        grid.cell_start = counts;
        grid.entries = entries;
        grid
    }

    fn empty() -> Self {
        Self {
            origin: geometry::ZERO,
            cell_size: 1.0,
            dims: [0; 3],
            cell_start: vec![0],
            entries: Vec::new(),
        }
    }

    /// Grid resolution along each axis.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Edge length of one cubic cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Collect the faces whose cells overlap the box `[lo, hi]` into
    /// `out` (cleared first), sorted ascending and deduplicated.
    pub fn query(&self, lo: Point3, hi: Point3, out: &mut Vec<u32>) {
        out.clear();
        if self.dims[0] == 0 {
            return;
        }
        for axis in 0..3 {
            let far = self.origin[axis] + self.cell_size * self.dims[axis] as f32;
            if hi[axis] < self.origin[axis] || lo[axis] > far {
                return;
            }
        }
        let (a, b) = (self.cell_of(lo), self.cell_of(hi));
        self.for_each_cell(a, b, |c| {
            let span = self.cell_start[c] as usize..self.cell_start[c + 1] as usize;
            out.extend_from_slice(&self.entries[span]);
        });
        out.sort_unstable();
        out.dedup();
    }

    fn cell_of(&self, p: Point3) -> [usize; 3] {
        let mut cell = [0usize; 3];
        for axis in 0..3 {
            let k = ((p[axis] - self.origin[axis]) / self.cell_size).floor();
            // NaN and negatives saturate to 0.
            cell[axis] = (k as usize).min(self.dims[axis].saturating_sub(1));
        }
        cell
    }

    fn for_each_cell(&self, a: [usize; 3], b: [usize; 3], mut f: impl FnMut(usize)) {
        for z in a[2]..=b[2] {
            for y in a[1]..=b[1] {
                for x in a[0]..=b[0] {
                    f((z * self.dims[1] + y) * self.dims[0] + x);
                }
            }
        }
    }
}

fn mean_edge_length(vertices: &[Point3], faces: &[[u32; 3]]) -> f32 {
    let mut total = 0.0f64;
    for f in faces {
        let [a, b, c] = f.map(|v| vertices[v as usize]);
        total += f64::from(geometry::distance(a, b));
        total += f64::from(geometry::distance(b, c));
        total += f64::from(geometry::distance(c, a));
    }
    (total / (3 * faces.len()) as f64) as f32
}

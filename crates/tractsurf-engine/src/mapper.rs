//! Streamline-to-surface mapping.
//!
//! Every segment `p[k] → p[k + 1]` of every streamline is tested
//! against the faces near it. A segment that crosses a face's plane
//! inside the triangle produces one [`Contact`], filed under that face.
//! Segments are half-open: a crossing exactly at `p[k + 1]` is held
//! back and dropped if the next non-degenerate segment records a contact
//! of its own. Otherwise, including at the end of the streamline, it is
//! kept, so a streamline touching the surface at a point counts once.
//!
//! Streamlines are processed in parallel, each worker producing only
//! its own streamline's contacts. The per-face lists are then filled
//! sequentially in streamline order, so every list is ordered by
//! `(streamline, segment)` whatever the thread count.

use tractsurf_core::geometry::{self, Point3, ZERO};
use tractsurf_core::{FaceId, StreamlineId, TaskError};
use tractsurf_space::{Surface, SurfaceGeometry, Tractogram};

use crate::pool::TaskPool;

/// One segment's association with one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// The streamline the segment belongs to.
    pub streamline: StreamlineId,
    /// Index of the segment within its streamline (`k` for `p[k] → p[k + 1]`).
    pub segment: u32,
    /// Angle in radians between the segment direction and the face
    /// normal, in `[0, π]`.
    pub angle: f32,
    /// Unit direction of the segment.
    pub direction: Point3,
}

/// Per-face contact lists for one (tractogram, surface) pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mapping {
    faces: Vec<Vec<Contact>>,
}

impl Mapping {
    /// A mapping with `face_count` empty lists.
    pub fn empty(face_count: usize) -> Self {
        Self {
            faces: vec![Vec::new(); face_count],
        }
    }

    /// Append a contact to a face's list.
    ///
    /// # Panics
    ///
    /// Panics if `face` is out of range.
    pub fn push(&mut self, face: FaceId, contact: Contact) {
        self.faces[face.index()].push(contact);
    }

    /// Number of faces covered.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Contacts filed under a face; empty for an out-of-range id.
    pub fn contacts(&self, face: FaceId) -> &[Contact] {
        self.faces.get(face.index()).map_or(&[], Vec::as_slice)
    }

    /// Length of a face's contact list.
    pub fn contact_count(&self, face: FaceId) -> usize {
        self.contacts(face).len()
    }

    /// Total contacts across all faces.
    pub fn total_contacts(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Faces and their contact lists, in face order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (FaceId, &[Contact])> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(|(f, list)| (FaceId(f as u32), list.as_slice()))
    }
}

/// Geometric tolerances of the contact test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapperConfig {
    /// Signed distance to a face plane below which a point counts as
    /// lying on the plane. Default: `1e-4`.
    pub plane_tolerance: f32,
    /// Slack on barycentric coordinates when testing whether the
    /// crossing point is inside the triangle. Default: `1e-5`.
    pub barycentric_tolerance: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            plane_tolerance: 1e-4,
            barycentric_tolerance: 1e-5,
        }
    }
}

/// The winning face of one segment's contact test.
struct Crossing {
    face: FaceId,
    normal: Point3,
    /// The crossing lies on the segment's end point.
    at_end: bool,
}

/// Maps streamline segments to surface faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    /// A mapper with the given tolerances.
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// The tolerances in use.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Compute the mapping of `tractogram` onto `surface`.
    ///
    /// An empty tractogram yields a mapping with every list empty.
    pub fn map(
        &self,
        pool: &TaskPool,
        tractogram: &Tractogram,
        surface: &Surface,
    ) -> Result<Mapping, TaskError> {
        let mut mapping = Mapping::empty(surface.face_count());
        let n = tractogram.streamline_count();
        if n == 0 || surface.face_count() == 0 {
            tracing::info!(streamlines = n, faces = surface.face_count(), "nothing to map");
            return Ok(mapping);
        }

        let geo = surface.geometry();
        let per_streamline = pool.run(n, "map streamlines", |s| {
            let id = u32::try_from(s)
                .map_err(|_| TaskError::failed("map streamlines", s, "streamline index overflows u32"))?;
            let points = tractogram.streamline(StreamlineId(id));
            self.map_streamline(StreamlineId(id), points, surface, geo)
        })?;

        for (face, contact) in per_streamline.into_iter().flatten() {
            mapping.push(face, contact);
        }
        tracing::info!(
            streamlines = n,
            faces = surface.face_count(),
            contacts = mapping.total_contacts(),
            "mapping complete"
        );
        Ok(mapping)
    }

    fn map_streamline(
        &self,
        streamline: StreamlineId,
        points: &[Point3],
        surface: &Surface,
        geo: &SurfaceGeometry,
    ) -> Result<Vec<(FaceId, Contact)>, TaskError> {
        let mut found = Vec::new();
        let mut candidates = Vec::new();
        // An end-point crossing waiting on the next non-degenerate segment.
        let mut pending: Option<(FaceId, Contact)> = None;
        for (k, pair) in points.windows(2).enumerate() {
            let (p0, p1) = (pair[0], pair[1]);
            let Some(direction) = geometry::normalize(geometry::sub(p1, p0)) else {
                tracing::trace!(%streamline, segment = k, "skipping zero-length segment");
                continue;
            };
            let segment = u32::try_from(k).map_err(|_| {
                TaskError::failed(
                    "map streamlines",
                    streamline.0 as usize,
                    "segment index overflows u32",
                )
            })?;
            let Some(crossing) = self.nearest_crossing(p0, p1, surface, geo, &mut candidates)
            else {
                found.extend(pending.take());
                continue;
            };
            let contact = Contact {
                streamline,
                segment,
                angle: geometry::angle(direction, crossing.normal),
                direction,
            };
            // This segment's own contact supersedes the held one.
            if pending.take().is_some() {
                tracing::trace!(%streamline, segment, "end-point crossing taken over");
            }
            if crossing.at_end {
                pending = Some((crossing.face, contact));
            } else {
                found.push((crossing.face, contact));
            }
        }
        found.extend(pending);
        Ok(found)
    }

    /// The face crossed earliest along `p0 → p1`.
    fn nearest_crossing(
        &self,
        p0: Point3,
        p1: Point3,
        surface: &Surface,
        geo: &SurfaceGeometry,
        candidates: &mut Vec<u32>,
    ) -> Option<Crossing> {
        let tol = self.config.plane_tolerance;
        let pad = [tol; 3];
        let lo = geometry::sub(geometry::min(p0, p1), pad);
        let hi = geometry::add(geometry::max(p0, p1), pad);
        geo.grid().query(lo, hi, candidates);

        let mid = geometry::lerp(p0, p1, 0.5);
        let half_length = 0.5 * geometry::distance(p0, p1);
        let mut best: Option<(f32, u32, bool)> = None;

        for &f in candidates.iter() {
            let fi = f as usize;
            let normal = geo.normal(fi);
            if normal == ZERO {
                continue;
            }
            if geometry::distance(mid, geo.center(fi)) > half_length + geo.radius(fi) + tol {
                continue;
            }
            let v0 = surface.vertices()[surface.faces()[fi][0] as usize];
            let d0 = geometry::dot(geometry::sub(p0, v0), normal);
            let d1 = geometry::dot(geometry::sub(p1, v0), normal);
            if (d0 > tol && d1 > tol) || (d0 < -tol && d1 < -tol) {
                continue;
            }
            // Coplanar segments never cross.
            if d0.abs() <= tol && d1.abs() <= tol {
                continue;
            }
            let t = (d0 / (d0 - d1)).clamp(0.0, 1.0);
            let x = geometry::lerp(p0, p1, t);
            if !self.inside(x, v0, geo.edges(fi)) {
                continue;
            }
            // Candidates are ascending, so ties keep the lower face.
            if best.is_none_or(|(bt, _, _)| t < bt) {
                best = Some((t, f, d1.abs() <= tol));
            }
        }
        best.map(|(_, f, at_end)| Crossing {
            face: FaceId(f),
            normal: geo.normal(f as usize),
            at_end,
        })
    }

    /// Barycentric inside test of an on-plane point.
    fn inside(&self, x: Point3, v0: Point3, [e1, e2]: [Point3; 2]) -> bool {
        let eps = self.config.barycentric_tolerance;
        let w = geometry::sub(x, v0);
        let d00 = geometry::dot(e1, e1);
        let d01 = geometry::dot(e1, e2);
        let d11 = geometry::dot(e2, e2);
        let d20 = geometry::dot(w, e1);
        let d21 = geometry::dot(w, e2);
        let den = d00 * d11 - d01 * d01;
        if den <= 0.0 {
            return false;
        }
        let b1 = (d11 * d20 - d01 * d21) / den;
        let b2 = (d00 * d21 - d01 * d20) / den;
        b1 >= -eps && b2 >= -eps && b1 + b2 <= 1.0 + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Surface {
        Surface::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    fn map(lines: &[&[Point3]], surface: &Surface) -> Mapping {
        let t = Tractogram::from_streamlines(lines);
        Mapper::default()
            .map(&TaskPool::new(1), &t, surface)
            .unwrap()
    }

    #[test]
    fn crossing_segment_contacts_face() {
        let s = triangle();
        let m = map(&[&[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]], &s);
        assert_eq!(m.total_contacts(), 1);
        let c = m.contacts(FaceId(0))[0];
        assert_eq!(c.streamline, StreamlineId(0));
        assert_eq!(c.segment, 0);
        assert_eq!(c.direction, [0.0, 0.0, 1.0]);
        assert!(c.angle.abs() < 1e-6);
    }

    #[test]
    fn reversed_segment_has_angle_pi() {
        let s = triangle();
        let m = map(&[&[[0.5, 0.5, 1.0], [0.5, 0.5, -1.0]]], &s);
        let c = m.contacts(FaceId(0))[0];
        assert!((c.angle - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn miss_outside_triangle() {
        let s = triangle();
        let m = map(&[&[[1.5, 1.5, -1.0], [1.5, 1.5, 1.0]]], &s);
        assert_eq!(m.total_contacts(), 0);
        assert_eq!(m.face_count(), 1);
    }

    #[test]
    fn segment_short_of_plane_does_not_contact() {
        let s = triangle();
        let m = map(&[&[[0.5, 0.5, -2.0], [0.5, 0.5, -1.0]]], &s);
        assert_eq!(m.total_contacts(), 0);
    }

    #[test]
    fn coplanar_segment_does_not_contact() {
        let s = triangle();
        let m = map(&[&[[0.1, 0.1, 0.0], [0.5, 0.5, 0.0]]], &s);
        assert_eq!(m.total_contacts(), 0);
    }

    #[test]
    fn vertex_on_plane_counts_once() {
        let s = triangle();
        let m = map(
            &[&[[0.5, 0.5, -1.0], [0.5, 0.5, 0.0], [0.5, 0.5, 1.0]]],
            &s,
        );
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contacts(FaceId(0))[0].segment, 1);
    }

    #[test]
    fn repeated_end_point_on_plane_counts_once() {
        let s = triangle();
        let m = map(
            &[&[[0.5, 0.5, -1.0], [0.5, 0.5, 0.0], [0.5, 0.5, 0.0]]],
            &s,
        );
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contacts(FaceId(0))[0].segment, 0);
    }

    #[test]
    fn arrival_followed_by_coplanar_tail_counts_once() {
        let s = triangle();
        let m = map(
            &[&[[0.5, 0.5, -1.0], [0.5, 0.5, 0.0], [0.6, 0.6, 0.0]]],
            &s,
        );
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contacts(FaceId(0))[0].segment, 0);
    }

    #[test]
    fn arrival_then_departure_counts_once() {
        let s = triangle();
        // The second segment's crossing at its start replaces the held one.
        let m = map(
            &[&[[0.5, 0.5, -1.0], [0.5, 0.5, 0.0], [0.5, 0.5, -1.0]]],
            &s,
        );
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contacts(FaceId(0))[0].segment, 1);
    }

    #[test]
    fn final_point_on_plane_counts() {
        let s = triangle();
        let m = map(&[&[[0.5, 0.5, -1.0], [0.5, 0.5, 0.0]]], &s);
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contacts(FaceId(0))[0].segment, 0);
    }

    #[test]
    fn degenerate_streamlines_are_skipped() {
        let s = triangle();
        let m = map(
            &[&[], &[[0.5, 0.5, 0.0]], &[[0.5, 0.5, 0.0], [0.5, 0.5, 0.0]]],
            &s,
        );
        assert_eq!(m.total_contacts(), 0);
    }

    #[test]
    fn empty_tractogram_gives_empty_lists() {
        let s = triangle();
        let m = Mapper::default()
            .map(&TaskPool::new(4), &Tractogram::empty(), &s)
            .unwrap();
        assert_eq!(m.face_count(), 1);
        assert_eq!(m.total_contacts(), 0);
    }

    #[test]
    fn nearest_face_wins() {
        // Two parallel triangles at z = 0 and z = 1.
        let s = Surface::new(
            vec![
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
                [0.0, 0.0, 1.0],
                [2.0, 0.0, 1.0],
                [0.0, 2.0, 1.0],
            ],
            vec![[3, 4, 5], [0, 1, 2]],
        )
        .unwrap();
        let up = map(&[&[[0.5, 0.5, -1.0], [0.5, 0.5, 2.0]]], &s);
        assert_eq!(up.contact_count(FaceId(1)), 1);
        assert_eq!(up.contact_count(FaceId(0)), 0);
        let down = map(&[&[[0.5, 0.5, 2.0], [0.5, 0.5, -1.0]]], &s);
        assert_eq!(down.contact_count(FaceId(0)), 1);
        assert_eq!(down.contact_count(FaceId(1)), 0);
    }

    #[test]
    fn shared_edge_goes_to_lower_face() {
        let s = Surface::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        )
        .unwrap();
        // Crosses the diagonal shared by both faces.
        let m = map(&[&[[0.5, 0.5, -1.0], [0.5, 0.5, 1.0]]], &s);
        assert_eq!(m.total_contacts(), 1);
        assert_eq!(m.contact_count(FaceId(0)), 1);
    }

    #[test]
    fn out_of_range_face_has_no_contacts() {
        let m = Mapping::empty(2);
        assert!(m.contacts(FaceId(9)).is_empty());
        assert_eq!(m.iter().len(), 2);
    }
}

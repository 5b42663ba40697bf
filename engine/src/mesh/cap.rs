//! Cap triangulation
//!
//! Turns the unordered cut segments left behind by a slice into closed loops
//! on the plane and triangulates each loop by ear clipping.
//!
//! Loops are treated independently: a loop nested inside another is capped
//! as a separate solid polygon, not as a hole. Chains that do not close are
//! dropped. Collinear loop points are kept so cap edges line up with the
//! sliced triangles around them.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};

use super::plane::SlicePlane;

/// Points closer than this are welded into one loop vertex.
pub const WELD_TOLERANCE: f32 = 1e-4;

const AREA_EPSILON: f32 = 1e-10;

/// Triangulated cap polygon.
///
/// Triangles wind counter-clockwise around the plane normal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapGeometry {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub loop_count: usize,
}

impl CapGeometry {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

type CellKey = (i64, i64, i64);

/// Merges points closer than [`WELD_TOLERANCE`].
///
/// Points are binned into cells one tolerance wide; a lookup scans the 27
/// cells around the query so neighbours across a cell boundary are found.
#[derive(Default)]
struct Welder {
    points: Vec<Vec3>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl Welder {
    fn cell(p: Vec3) -> CellKey {
        let q = (p / WELD_TOLERANCE).floor();
        (q.x as i64, q.y as i64, q.z as i64)
    }

    fn find(&self, p: Vec3) -> Option<usize> {
        let (cx, cy, cz) = Self::cell(p);
        let tolerance_sq = WELD_TOLERANCE * WELD_TOLERANCE;
        let mut best: Option<(usize, f32)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &index in bucket {
                        let d = self.points[index].distance_squared(p);
                        if d <= tolerance_sq && best.is_none_or(|(_, bd)| d < bd) {
                            best = Some((index, d));
                        }
                    }
                }
            }
        }
        best.map(|(index, _)| index)
    }

    fn weld(&mut self, p: Vec3) -> usize {
        if let Some(index) = self.find(p) {
            return index;
        }
        let index = self.points.len();
        self.points.push(p);
        self.cells.entry(Self::cell(p)).or_default().push(index);
        index
    }
}

/// Build cap triangles from cut segments lying on `plane`.
pub fn build_cap(segments: &[[Vec3; 2]], plane: &SlicePlane) -> CapGeometry {
    let mut welder = Welder::default();
    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    for [a, b] in segments {
        let (a, b) = (welder.weld(*a), welder.weld(*b));
        if a != b && seen.insert((a.min(b), a.max(b))) {
            edges.push((a, b));
        }
    }

    let points = welder.points;
    let loops = chain_loops(points.len(), &edges);

    let mut cap = CapGeometry::default();
    for lp in loops {
        let mut projected: Vec<Vec2> = lp.iter().map(|&i| plane.project(points[i])).collect();
        let mut ring = lp;
        if signed_area(&projected) < 0.0 {
            ring.reverse();
            projected.reverse();
        }

        let base = cap.positions.len() as u32;
        cap.positions.extend(ring.iter().map(|&i| points[i]));
        for [a, b, c] in triangulate_ear_clipping(&projected) {
            cap.triangles
                .extend_from_slice(&[base + a as u32, base + b as u32, base + c as u32]);
        }
        cap.loop_count += 1;
    }
    cap
}

/// Walk the undirected edge graph into closed loops of at least three points.
fn chain_loops(point_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); point_count];
    for (edge_index, &(a, b)) in edges.iter().enumerate() {
        adjacency[a].push(edge_index);
        adjacency[b].push(edge_index);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for start_edge in 0..edges.len() {
        if used[start_edge] {
            continue;
        }
        used[start_edge] = true;
        let (start, mut current) = edges[start_edge];
        let mut ring = vec![start];

        let closed = loop {
            if current == start {
                break true;
            }
            ring.push(current);
            let next_edge = adjacency[current].iter().copied().find(|&e| !used[e]);
            let Some(edge) = next_edge else {
                break false;
            };
            used[edge] = true;
            let (a, b) = edges[edge];
            current = if a == current { b } else { a };
        };

        if closed && ring.len() >= 3 {
            loops.push(ring);
        } else {
            log::debug!("dropping open cut chain of {} point(s)", ring.len());
        }
    }
    loops
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn strictly_inside(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross(a, b, p) > AREA_EPSILON && cross(b, c, p) > AREA_EPSILON && cross(c, a, p) > AREA_EPSILON
}

fn on_open_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= AREA_EPSILON || cross(a, b, p).abs() > AREA_EPSILON.sqrt() * len_sq.sqrt() {
        return false;
    }
    let t = (p - a).dot(ab) / len_sq;
    t > 0.0 && t < 1.0
}

/// Ear clipping over a counter-clockwise simple polygon.
///
/// Among the valid ears the pointiest one is clipped first. A candidate ear
/// is rejected when another remaining point lies inside it or on its closing
/// diagonal, which keeps collinear runs from collapsing into slivers. If no
/// ear can be found the remainder is fanned.
pub fn triangulate_ear_clipping(points: &[Vec2]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let m = remaining.len();
        let mut best: Option<(usize, f32)> = None;

        for i in 0..m {
            let prev = remaining[(i + m - 1) % m];
            let cur = remaining[i];
            let next = remaining[(i + 1) % m];
            let (a, b, c) = (points[prev], points[cur], points[next]);

            if cross(a, b, c) <= AREA_EPSILON {
                continue;
            }
            let blocked = remaining
                .iter()
                .filter(|&&j| j != prev && j != cur && j != next)
                .any(|&j| strictly_inside(points[j], a, b, c) || on_open_segment(points[j], c, a));
            if blocked {
                continue;
            }

            let pointiness = (a - b).normalize_or_zero().dot((c - b).normalize_or_zero());
            if best.is_none_or(|(_, p)| pointiness > p) {
                best = Some((i, pointiness));
            }
        }

        let Some((i, _)) = best else {
            log::debug!("ear clipping stalled with {m} point(s) left, fanning remainder");
            break;
        };
        let prev = remaining[(i + m - 1) % m];
        let next = remaining[(i + 1) % m];
        triangles.push([prev, remaining[i], next]);
        remaining.remove(i);
    }

    if remaining.len() >= 3 {
        for k in 1..remaining.len() - 1 {
            triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_area(points: &[Vec2], t: [usize; 3]) -> f32 {
        cross(points[t[0]], points[t[1]], points[t[2]]) * 0.5
    }

    #[test]
    fn test_square_with_midpoints() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let tris = triangulate_ear_clipping(&points);
        assert_eq!(tris.len(), 3);
        let total: f32 = tris.iter().map(|&t| triangle_area(&points, t)).sum();
        assert_relative_eq!(total, 4.0, epsilon = 1e-5);
        for &t in &tris {
            assert!(triangle_area(&points, t) > 0.0);
        }
    }

    #[test]
    fn test_concave_polygon() {
        // L shape
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let tris = triangulate_ear_clipping(&points);
        assert_eq!(tris.len(), 4);
        let total: f32 = tris.iter().map(|&t| triangle_area(&points, t)).sum();
        assert_relative_eq!(total, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_build_cap_from_unordered_segments() {
        let plane = SlicePlane::new(Vec3::ZERO, Vec3::Y);
        let a = Vec3::new(-1.0, 0.0, -1.0);
        let b = Vec3::new(1.0, 0.0, -1.0);
        let c = Vec3::new(1.0, 0.0, 1.0);
        let d = Vec3::new(-1.0, 0.0, 1.0);
        // Shuffled, reversed and duplicated
        let segments = [[c, b], [a, d], [a, b], [d, c], [b, a]];

        let cap = build_cap(&segments, &plane);
        assert_eq!(cap.loop_count, 1);
        assert_eq!(cap.positions.len(), 4);
        assert_eq!(cap.triangle_count(), 2);
        for t in cap.triangles.chunks_exact(3) {
            let [p0, p1, p2] = [0, 1, 2].map(|k| cap.positions[t[k] as usize]);
            let normal = (p1 - p0).cross(p2 - p0);
            assert!(normal.dot(plane.normal) > 0.0);
        }
    }

    #[test]
    fn test_near_duplicate_endpoints_across_cell_boundaries_weld() {
        let plane = SlicePlane::new(Vec3::ZERO, Vec3::Y);
        let a = Vec3::ZERO;
        let d = Vec3::new(0.0, 0.0, 2.0);
        // Each corner arrives twice, a micrometre apart on either side of a grid line.
        let b1 = Vec3::new(1.000249, 0.0, 0.0);
        let b2 = Vec3::new(1.000251, 0.0, 0.0);
        let c1 = Vec3::new(1.00025, 0.0, 1.999999);
        let c2 = Vec3::new(1.00025, 0.0, 2.000001);
        let segments = [[a, b1], [b2, c1], [c2, d], [d, a]];

        let cap = build_cap(&segments, &plane);
        assert_eq!(cap.loop_count, 1);
        assert_eq!(cap.positions.len(), 4);
        assert_eq!(cap.triangle_count(), 2);
    }

    #[test]
    fn test_open_chain_is_dropped() {
        let plane = SlicePlane::new(Vec3::ZERO, Vec3::Y);
        let segments = [
            [Vec3::ZERO, Vec3::X],
            [Vec3::X, Vec3::new(1.0, 0.0, 1.0)],
        ];
        let cap = build_cap(&segments, &plane);
        assert!(cap.is_empty());
        assert_eq!(cap.loop_count, 0);
    }

    #[test]
    fn test_two_loops_are_capped_separately() {
        let plane = SlicePlane::new(Vec3::ZERO, Vec3::Y);
        let square = |offset: f32| {
            let p = [
                Vec3::new(offset, 0.0, 0.0),
                Vec3::new(offset + 1.0, 0.0, 0.0),
                Vec3::new(offset + 1.0, 0.0, 1.0),
                Vec3::new(offset, 0.0, 1.0),
            ];
            [[p[0], p[1]], [p[1], p[2]], [p[2], p[3]], [p[3], p[0]]]
        };
        let mut segments = square(0.0).to_vec();
        segments.extend(square(5.0));
        let cap = build_cap(&segments, &plane);
        assert_eq!(cap.loop_count, 2);
        assert_eq!(cap.triangle_count(), 4);
    }
}

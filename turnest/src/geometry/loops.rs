use std::collections::HashMap;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::geometry::primitives::{Edge, Point};

/// Vertices are matched by coordinate, rounded to 3 decimals.
const KEY_SCALE: f32 = 1000.0;

type VertexKey = (i64, i64);

fn vertex_key(p: Point) -> VertexKey {
    (
        (p.0 * KEY_SCALE).round() as i64,
        (p.1 * KEY_SCALE).round() as i64,
    )
}

/// Decomposes an unordered segment soup into closed loops.
///
/// Builds a point-adjacency multigraph keyed by rounded coordinates, flood
/// fills its connected components, and accepts a component as a closed loop
/// only if every vertex has even degree. Returns the segment-index sets of
/// the accepted loops. Open chains and dangling segments are discarded.
pub fn find_closed_loops(segments: &[Edge]) -> Vec<Vec<usize>> {
    //multigraph: vertex -> indices of incident segments
    let mut adjacency: HashMap<VertexKey, Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        adjacency.entry(vertex_key(seg.start)).or_default().push(i);
        adjacency.entry(vertex_key(seg.end)).or_default().push(i);
    }

    let mut visited = vec![false; segments.len()];
    let mut loops = Vec::new();

    for start in 0..segments.len() {
        if visited[start] {
            continue;
        }
        //flood fill the connected component containing `start`
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(i) = stack.pop() {
            component.push(i);
            let seg = &segments[i];
            for key in [vertex_key(seg.start), vertex_key(seg.end)] {
                for &j in &adjacency[&key] {
                    if !visited[j] {
                        visited[j] = true;
                        stack.push(j);
                    }
                }
            }
        }

        //a component is a closed loop iff every vertex it touches has even degree
        let closed = component
            .iter()
            .flat_map(|&i| {
                let seg = &segments[i];
                [vertex_key(seg.start), vertex_key(seg.end)]
            })
            .unique()
            .all(|key| adjacency[&key].len() % 2 == 0);

        if closed {
            component.sort_unstable();
            loops.push(component);
        }
    }

    loops
}

/// Returns the segment-index set of the outer silhouette: the closed loop
/// with the maximum absolute signed area (shoelace formula over a traced
/// traversal). Interior hole loops always enclose less area than the outline
/// that surrounds them. Returns `None` when no closed loop exists.
pub fn outer_loop_indices(segments: &[Edge]) -> Option<Vec<usize>> {
    let loops = find_closed_loops(segments);
    loops
        .into_iter()
        .max_by_key(|lp| OrderedFloat(loop_area(segments, lp).abs()))
}

/// Signed shoelace area of a loop, traced by walking the adjacency from an
/// arbitrary starting segment. For components containing several vertex-joined
/// cycles the trace follows one of them, which is sufficient for ranking.
fn loop_area(segments: &[Edge], loop_indices: &[usize]) -> f32 {
    let mut used = vec![false; loop_indices.len()];
    let first = loop_indices[0];
    used[0] = true;

    let mut area = shoelace_term(&segments[first].start, &segments[first].end);
    let mut cursor = vertex_key(segments[first].end);
    let stop = vertex_key(segments[first].start);

    while cursor != stop {
        let next = loop_indices.iter().enumerate().find(|&(pos, &i)| {
            !used[pos]
                && (vertex_key(segments[i].start) == cursor || vertex_key(segments[i].end) == cursor)
        });
        let Some((pos, &i)) = next else {
            break; //trace exhausted without closing, partial area is kept
        };
        used[pos] = true;
        let seg = &segments[i];
        let (from, to) = if vertex_key(seg.start) == cursor {
            (seg.start, seg.end)
        } else {
            (seg.end, seg.start)
        };
        area += shoelace_term(&from, &to);
        cursor = vertex_key(to);
    }

    area / 2.0
}

fn shoelace_term(from: &Point, to: &Point) -> f32 {
    from.0 * to.1 - to.0 * from.1
}

//! Segment isolation and path ordering.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::graph::VesselGraph;

/// Components of the subgraph induced by vertices with degree below
/// `degree_limit` (3 for centerline graphs, 2 for branch graphs)
pub fn isolate_segments(graph: &VesselGraph, degree_limit: usize) -> Vec<Vec<usize>> {
    let mask: Vec<bool> = (0..graph.vertex_count())
        .map(|v| graph.degree(v) < degree_limit)
        .collect();
    graph.induced_components(&mask)
}

/// Ordered path of a dangling segment, or `None` if `segment` is not one.
///
/// A dangling segment has exactly one member of degree 1. The path starts
/// at that endpoint, follows the chain and ends on the vertex the chain
/// attaches to (normally a branch point).
pub fn dangling_path(graph: &VesselGraph, segment: &[usize]) -> Result<Option<Vec<usize>>> {
    let mut ends = segment.iter().copied().filter(|&v| graph.degree(v) == 1);
    let (Some(end), None) = (ends.next(), ends.next()) else {
        return Ok(None);
    };

    let members: BTreeSet<usize> = segment.iter().copied().collect();
    let mut path = walk_chain(graph, &members, end)?;
    if path.len() != members.len() {
        return Err(Error::Partition {
            stage: "prune",
            reason: format!(
                "segment at vertex {} is not a simple chain ({} of {} reached)",
                end,
                path.len(),
                members.len()
            ),
        });
    }

    let tail = path[path.len() - 1];
    if let Some(attach) = graph.neighbors(tail).find(|u| !members.contains(u)) {
        path.push(attach);
    }
    Ok(Some(path))
}

/// Ordered path of an isolated chain component, or `None` if the component
/// is not a simple path (exactly two degree-1 vertices, all others degree 2)
pub fn isolated_path(graph: &VesselGraph, component: &[usize]) -> Result<Option<Vec<usize>>> {
    let mut ends = Vec::with_capacity(2);
    for &v in component {
        match graph.degree(v) {
            1 => ends.push(v),
            2 => {}
            _ => return Ok(None),
        }
    }
    if ends.len() != 2 {
        return Ok(None);
    }

    let members: BTreeSet<usize> = component.iter().copied().collect();
    let path = walk_chain(graph, &members, ends[0])?;
    if path.len() != members.len() || path.last() != Some(&ends[1]) {
        return Err(Error::Partition {
            stage: "filter",
            reason: format!("component at vertex {} did not walk end to end", ends[0]),
        });
    }
    Ok(Some(path))
}

/// Follow a chain inside `members` from `start` until it stops
pub fn walk_chain(
    graph: &VesselGraph,
    members: &BTreeSet<usize>,
    start: usize,
) -> Result<Vec<usize>> {
    if !members.contains(&start) {
        return Err(Error::UnknownVertex(start));
    }
    let mut path = vec![start];
    let mut visited = BTreeSet::from([start]);
    let mut current = start;
    while let Some(next) = graph
        .neighbors(current)
        .find(|u| members.contains(u) && !visited.contains(u))
    {
        visited.insert(next);
        path.push(next);
        current = next;
    }
    Ok(path)
}

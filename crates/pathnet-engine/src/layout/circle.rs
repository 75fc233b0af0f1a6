use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use super::{LayoutParams, Placement, Point};
use crate::engine::PathwayGraph;

/// Evenly spaced on a circle, first node at angle 0. A single node sits on
/// the centre.
pub fn circular(names: &[String], center: Point, radius: f64) -> Vec<Placement> {
    if names.len() == 1 {
        return vec![Placement::new(&names[0], center)];
    }
    let n = names.len() as f64;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let angle = TAU * i as f64 / n;
            Placement::new(name, on_circle(center, radius, angle))
        })
        .collect()
}

/// Square-ish grid, `floor(sqrt(n)) + 1` columns wide.
pub fn grid(names: &[String], origin: Point, spacing: f64) -> Vec<Placement> {
    let width = (names.len() as f64).sqrt() as usize + 1;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (row, col) = (i / width, i % width);
            let at = Point::new(
                origin.x + col as f64 * spacing,
                origin.y + row as f64 * spacing,
            );
            Placement::new(name, at)
        })
        .collect()
}

/// Cycle on a circle of radius `cycle_spacing * len`, each non-cycle node
/// hung on a ring around one adjacent cycle node, everything else on a grid.
///
/// A node touching several cycle nodes goes to the one with the most
/// non-cycle neighbours (first in cycle order on ties).
pub fn cycle_with_branches(
    graph: &PathwayGraph,
    cycle: &[String],
    center: Point,
    params: &LayoutParams,
) -> Vec<Placement> {
    let radius = params.cycle_spacing * cycle.len() as f64;
    let mut placements = circular(cycle, center, radius);
    let anchor_at: HashMap<String, Point> = placements
        .iter()
        .map(|p| (p.name.clone(), p.point()))
        .collect();

    let on_cycle: HashSet<&str> = cycle.iter().map(String::as_str).collect();
    let outside: Vec<&str> = graph
        .node_names()
        .into_iter()
        .filter(|n| !on_cycle.contains(n))
        .collect();

    let branch_count = |anchor: &str| {
        graph
            .neighbors_undirected(anchor)
            .into_iter()
            .filter(|n| !on_cycle.contains(n))
            .count()
    };

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut leftover = Vec::new();
    for &node in &outside {
        let mut parent: Option<(&str, usize)> = None;
        for anchor in cycle {
            let anchor = anchor.as_str();
            if !graph.has_edge(node, anchor) && !graph.has_edge(anchor, node) {
                continue;
            }
            let count = branch_count(anchor);
            if parent.is_none_or(|(_, best)| count > best) {
                parent = Some((anchor, count));
            }
        }
        match parent {
            Some((anchor, _)) => children.entry(anchor).or_default().push(node),
            None => leftover.push(node.to_string()),
        }
    }

    for anchor in cycle {
        let Some(kids) = children.get(anchor.as_str()) else {
            continue;
        };
        let Some(&at) = anchor_at.get(anchor.as_str()) else {
            continue;
        };
        let n = kids.len() as f64;
        for (i, kid) in kids.iter().enumerate() {
            let angle = if kids.len() == 1 { 0.0 } else { TAU * i as f64 / n };
            placements.push(Placement::new(kid, on_circle(at, params.child_radius, angle)));
        }
    }

    placements.extend(leftover_grid(&leftover, center, params));
    placements
}

/// Grid for nodes no anchor reached. The grid moves with the pathway centre
/// so later pathways do not pile onto the first one's grid.
pub(super) fn leftover_grid(names: &[String], center: Point, params: &LayoutParams) -> Vec<Placement> {
    if names.is_empty() {
        return Vec::new();
    }
    let origin = Point::new(
        params.grid_origin.x + center.x - params.origin.x,
        params.grid_origin.y + center.y - params.origin.y,
    );
    grid(names, origin, params.grid_spacing)
}

pub(super) fn on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

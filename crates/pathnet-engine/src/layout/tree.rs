use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use super::circle::{circular, leftover_grid, on_circle};
use super::{LayoutParams, Placement, Point};
use crate::engine::PathwayGraph;

/// Top-down tree following edge direction.
///
/// The root is the first node with no incoming edge (or the first node).
/// Depth is assigned in depth-first preorder, so a node reachable along two
/// paths takes the depth of whichever path is walked first. Each level is
/// sorted by name and centred on `origin.x`. Nodes the walk never reached
/// go on a ring to the right of the tree.
pub fn level_tree(graph: &PathwayGraph, origin: Point, params: &LayoutParams) -> Vec<Placement> {
    let names = graph.node_names();
    let Some(root) = names
        .iter()
        .find(|n| graph.in_degree(n) == 0)
        .or(names.first())
        .copied()
    else {
        return Vec::new();
    };

    let mut levels: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, level)) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        levels.entry(level).or_default().push(node);
        // reversed so the first successor is walked first
        for next in graph.successors(node).into_iter().rev() {
            if !visited.contains(next) {
                stack.push((next, level + 1));
            }
        }
    }

    let mut placements = Vec::with_capacity(names.len());
    for (level, nodes) in &mut levels {
        nodes.sort_unstable();
        let y = origin.y + *level as f64 * params.level_height;
        let start_x = origin.x - nodes.len() as f64 * params.node_width / 2.0;
        for (i, node) in nodes.iter().enumerate() {
            let x = start_x + i as f64 * params.node_width;
            placements.push(Placement::new(node, Point::new(x, y)));
        }
    }

    let unvisited: Vec<String> = names
        .iter()
        .filter(|n| !visited.contains(*n))
        .map(|n| n.to_string())
        .collect();
    if !unvisited.is_empty() {
        let max_level = levels.keys().next_back().copied().unwrap_or(0);
        let ring_center = Point::new(
            origin.x + (max_level + 1) as f64 * params.node_width,
            origin.y,
        );
        placements.extend(circular(&unvisited, ring_center, params.ring_radius));
    }
    placements
}

/// Concentric rings ignoring direction.
///
/// Per connected component, BFS from the highest-degree node; level `l`
/// lies on a circle of radius `main_radius * (l + 1)`. Components are laid
/// side by side along x.
pub fn radial_tree(graph: &PathwayGraph, center: Point, params: &LayoutParams) -> Vec<Placement> {
    let names = graph.node_names();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut placements = Vec::with_capacity(names.len());
    let mut cursor = center;
    let mut first = true;

    loop {
        let mut root: Option<&str> = None;
        for &name in &names {
            if seen.contains(name) {
                continue;
            }
            if root.is_none_or(|r| graph.degree(name) > graph.degree(r)) {
                root = Some(name);
            }
        }
        let Some(root) = root else {
            break;
        };

        let levels = bfs_levels(graph, root, &mut seen);
        let outer = params.main_radius * levels.len() as f64;
        if !first {
            cursor.x += outer;
        }
        for (level, nodes) in levels.iter().enumerate() {
            let radius = params.main_radius * (level + 1) as f64;
            let step = std::f64::consts::TAU / nodes.len() as f64;
            for (i, node) in nodes.iter().enumerate() {
                placements.push(Placement::new(node, on_circle(cursor, radius, i as f64 * step)));
            }
        }
        cursor.x += outer + params.main_radius;
        first = false;
    }
    placements
}

fn bfs_levels<'a>(
    graph: &'a PathwayGraph,
    root: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Vec<Vec<&'a str>> {
    let mut levels: Vec<Vec<&str>> = Vec::new();
    let mut queue = VecDeque::from([(root, 0usize)]);
    seen.insert(root);
    while let Some((node, level)) = queue.pop_front() {
        if levels.len() <= level {
            levels.push(Vec::new());
        }
        levels[level].push(node);
        for next in graph.neighbors_undirected(node) {
            if seen.insert(next) {
                queue.push_back((next, level + 1));
            }
        }
    }
    levels
}

/// Longest undirected cycle on a circle of `main_radius`, every other node
/// on a spoke pointing away from the centre through its nearest cycle node.
///
/// A node `d` hops from the cycle sits `branch_radius * d` past its anchor.
/// Nodes sharing an anchor and a distance fan out by `spoke_fan` radians.
/// Nodes with no path to the cycle go on a grid.
pub fn cycle_with_spokes(
    graph: &PathwayGraph,
    cycle: &[String],
    center: Point,
    params: &LayoutParams,
) -> Vec<Placement> {
    let mut placements = circular(cycle, center, params.main_radius);
    let anchor_at: HashMap<String, Point> = placements
        .iter()
        .map(|p| (p.name.clone(), p.point()))
        .collect();

    // multi-source BFS; sources queued in cycle order decide ties
    let mut reach: HashMap<&str, (&str, usize)> = HashMap::new();
    let mut queue = VecDeque::new();
    for node in cycle {
        if let Some(name) = graph.node_names().into_iter().find(|n| *n == node.as_str()) {
            reach.insert(name, (name, 0));
            queue.push_back(name);
        }
    }
    let mut order: Vec<&str> = Vec::new();
    while let Some(node) = queue.pop_front() {
        let (anchor, dist) = reach[node];
        for next in graph.neighbors_undirected(node) {
            if reach.contains_key(next) {
                continue;
            }
            reach.insert(next, (anchor, dist + 1));
            order.push(next);
            queue.push_back(next);
        }
    }

    let mut groups: Vec<((&str, usize), Vec<&str>)> = Vec::new();
    for node in order {
        let key = reach[node];
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(node),
            None => groups.push((key, vec![node])),
        }
    }

    for ((anchor, dist), members) in groups {
        let Some(&at) = anchor_at.get(anchor) else {
            continue;
        };
        let direction = (at.y - center.y).atan2(at.x - center.x);
        let mid = (members.len() as f64 - 1.0) / 2.0;
        for (i, node) in members.iter().enumerate() {
            let angle = direction + (i as f64 - mid) * params.spoke_fan;
            let radius = params.branch_radius * dist as f64;
            placements.push(Placement::new(node, on_circle(at, radius, angle)));
        }
    }

    let unreached: Vec<String> = graph
        .node_names()
        .into_iter()
        .filter(|n| !reach.contains_key(n))
        .map(str::to_string)
        .collect();
    placements.extend(leftover_grid(&unreached, center, params));
    placements
}

//! Node placement for pathway subnetworks.
//!
//! Every function here is pure: a graph and parameters in, a list of
//! [`Placement`]s out. Pushing the coordinates to a visualization tool is
//! somebody else's job.

mod circle;
mod tree;

pub use circle::{circular, cycle_with_branches, grid};
pub use tree::{cycle_with_spokes, level_tree, radial_tree};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::{CycleLimits, PathwayGraph, largest_basis_cycle, largest_directed_cycle};

/// A point on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// `self + k * step`, used to shift each pathway onto its own patch.
    pub fn offset(self, step: Point, k: usize) -> Point {
        Point::new(self.x + step.x * k as f64, self.y + step.y * k as f64)
    }
}

/// Position of one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    pub fn new(name: &str, at: Point) -> Placement {
        Placement {
            name: name.to_string(),
            x: at.x,
            y: at.y,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// How a pathway subnetwork is arranged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Every node on one circle.
    Circle,
    /// Longest directed cycle on a circle with children around it, or a
    /// top-down level tree when there is no cycle.
    #[default]
    Tree,
    /// Undirected: longest basis cycle with outward spokes, or concentric
    /// BFS rings when there is no cycle.
    Radial,
}

impl FromStr for LayoutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(LayoutStrategy::Circle),
            "tree" => Ok(LayoutStrategy::Tree),
            "radial" => Ok(LayoutStrategy::Radial),
            other => Err(format!("Unknown layout strategy: {}", other)),
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutStrategy::Circle => "circle",
            LayoutStrategy::Tree => "tree",
            LayoutStrategy::Radial => "radial",
        };
        f.write_str(name)
    }
}

/// Geometry knobs. Defaults reproduce the hand-tuned values the curated
/// networks were drawn with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutParams {
    /// Centre (or tree origin) of the first pathway.
    pub origin: Point,
    /// Added once per pathway so pathways do not overlap.
    pub pathway_offset: Point,
    /// Cycle radius per cycle node.
    pub cycle_spacing: f64,
    /// Radius of the circle a cycle node's children sit on.
    pub child_radius: f64,
    /// Spacing and origin of the grid for nodes attached to nothing.
    pub grid_spacing: f64,
    pub grid_origin: Point,
    pub level_height: f64,
    pub node_width: f64,
    /// Radius of the ring for nodes a tree walk never reached.
    pub ring_radius: f64,
    pub main_radius: f64,
    pub branch_radius: f64,
    /// Angle (radians) between spokes that share an anchor and distance.
    pub spoke_fan: f64,
    /// Shorter cycles are ignored.
    pub min_cycle_len: usize,
    pub max_cycles: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        LayoutParams {
            origin: Point::new(1000.0, 1000.0),
            pathway_offset: Point::new(1000.0, 1000.0),
            cycle_spacing: 20.0,
            child_radius: 150.0,
            grid_spacing: 200.0,
            grid_origin: Point::new(-1000.0, -1000.0),
            level_height: 100.0,
            node_width: 100.0,
            ring_radius: 100.0,
            main_radius: 300.0,
            branch_radius: 150.0,
            spoke_fan: 0.25,
            min_cycle_len: 3,
            max_cycles: 20_000,
        }
    }
}

impl LayoutParams {
    pub fn cycle_limits(&self) -> CycleLimits {
        CycleLimits {
            max_cycles: self.max_cycles.max(1),
            ..CycleLimits::default()
        }
    }
}

/// Result of laying out one graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutOutcome {
    pub placements: Vec<Placement>,
    /// The cycle the layout was built around, if any.
    pub cycle: Option<Vec<String>>,
}

/// Lay out `graph` around `center` with the chosen strategy.
pub fn arrange(
    graph: &PathwayGraph,
    strategy: LayoutStrategy,
    center: Point,
    params: &LayoutParams,
) -> LayoutOutcome {
    if graph.is_empty() {
        return LayoutOutcome::default();
    }

    let min_len = params.min_cycle_len.max(3);
    match strategy {
        LayoutStrategy::Circle => {
            let names: Vec<String> = graph.node_names().iter().map(|s| s.to_string()).collect();
            LayoutOutcome {
                placements: circular(&names, center, params.main_radius),
                cycle: None,
            }
        }
        LayoutStrategy::Tree => {
            let cycle = largest_directed_cycle(graph, params.cycle_limits())
                .filter(|c| c.len() >= min_len);
            match cycle {
                Some(cycle) => LayoutOutcome {
                    placements: cycle_with_branches(graph, &cycle, center, params),
                    cycle: Some(cycle),
                },
                None => LayoutOutcome {
                    placements: level_tree(graph, center, params),
                    cycle: None,
                },
            }
        }
        LayoutStrategy::Radial => {
            let cycle = largest_basis_cycle(graph).filter(|c| c.len() >= min_len);
            match cycle {
                Some(cycle) => LayoutOutcome {
                    placements: cycle_with_spokes(graph, &cycle, center, params),
                    cycle: Some(cycle),
                },
                None => LayoutOutcome {
                    placements: radial_tree(graph, center, params),
                    cycle: None,
                },
            }
        }
    }
}

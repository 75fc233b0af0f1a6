//! Pathway planning: picks the nodes of each pathway out of the node
//! table, builds their graph from the edge table, and turns layouts and
//! style rules into plan files.

pub mod export;
pub mod membership;
pub mod pathway;
pub mod plan;
pub mod styling;

pub use export::{PlanFormat, render_bypasses, render_layouts, write_bypasses, write_layouts};
pub use membership::{MembershipReport, mark_pathway_membership};
pub use pathway::{Selection, SelectedNode, edge_pairs, select_pathway_nodes};
pub use plan::{PathwayLayout, plan_all_pathways, plan_pathway_layout};
pub use styling::plan_styles;

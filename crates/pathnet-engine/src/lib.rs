//! pathnet_engine - Graph, layout, and style primitives for pathway networks.

pub mod engine;
pub mod layout;
pub mod style;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use crate::layout::*;

    fn cell(s: &str) -> Option<CellRef> {
        s.parse().ok()
    }

    #[test]
    fn test_parse_single_letter_columns() {
        let a1 = cell("A1").unwrap();
        assert_eq!((a1.row, a1.col), (0, 0));
        assert_eq!(cell("Z1").unwrap().col, 25);
    }

    #[test]
    fn test_parse_multi_letter_columns() {
        assert_eq!(cell("AA1").unwrap().col, 26);
        assert_eq!(cell("BA1").unwrap().col, 52);
        assert_eq!(cell("c12"), Some(CellRef::new(2, 11)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(cell("").is_none());
        assert!(cell("A0").is_none());
        assert!(cell("1A").is_none());
    }

    #[test]
    fn test_tca_cycle_layout_end_to_end() {
        // Citric acid cycle with acetyl-CoA feeding in and NADH leaving.
        let ring = [
            "oxaloacetate",
            "citrate",
            "isocitrate",
            "alpha-ketoglutarate",
            "succinyl-CoA",
            "succinate",
            "fumarate",
            "malate",
        ];
        let mut edges: Vec<(&str, &str)> = ring
            .iter()
            .copied()
            .zip(ring.iter().copied().cycle().skip(1))
            .collect();
        edges.push(("acetyl-CoA", "citrate"));
        edges.push(("malate", "NADH"));
        let graph = PathwayGraph::from_edges(edges);

        let params = LayoutParams::default();
        let out = arrange(&graph, LayoutStrategy::Tree, params.origin, &params);
        let cycle = out.cycle.expect("tca ring");
        assert_eq!(cycle.len(), 8);
        assert_eq!(out.placements.len(), 10);

        let mut names: Vec<&str> = out.placements.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }
}

use crate::error::{PathnetError, Result};
use crate::sheet::Sheet;
use pathnet_engine::style::{Bypass, EdgeFacts, NodeFacts, StyleRules, edge_bypasses, node_bypasses};
use tracing::debug;

const EDGE_ID_COLUMNS: [&str; 3] = ["SUID", "shared name", "name"];
const RELATIONSHIP_COLUMNS: [&str; 2] = ["relationship", "interaction"];
const EDGE_PATHWAY_COLUMNS: [&str; 3] = ["pathway", "通路", "代谢通路"];

fn text_at(row: &[pathnet_engine::engine::Cell], col: Option<usize>) -> String {
    col.and_then(|c| row.get(c)).map(|c| c.as_key()).unwrap_or_default()
}

fn node_facts(nodes: &Sheet) -> Vec<NodeFacts> {
    let id_col = nodes.column_index("SUID").unwrap_or(0);
    let type_col = nodes.column_index("TYPE");
    nodes
        .rows
        .iter()
        .map(|row| NodeFacts {
            id: text_at(row, Some(id_col)),
            node_type: text_at(row, type_col),
        })
        .collect()
}

fn edge_facts(edges: &Sheet) -> Result<Vec<EdgeFacts>> {
    let id_col = edges
        .first_column_of(&EDGE_ID_COLUMNS)
        .ok_or_else(|| PathnetError::MissingColumn("SUID".to_string()))?;
    let rel_col = edges.first_column_of(&RELATIONSHIP_COLUMNS);
    let pathway_col = edges.first_column_of(&EDGE_PATHWAY_COLUMNS);
    Ok(edges
        .rows
        .iter()
        .map(|row| EdgeFacts {
            id: text_at(row, Some(id_col)),
            relationship: text_at(row, rel_col),
            pathway: text_at(row, pathway_col),
        })
        .collect())
}

/// Every node bypass followed by every edge bypass, in application order.
pub fn plan_styles(nodes: &Sheet, edges: &Sheet, rules: &StyleRules) -> Result<Vec<Bypass>> {
    let mut out = node_bypasses(rules, &node_facts(nodes));
    let node_count = out.len();
    out.extend(edge_bypasses(rules, &edge_facts(edges)?));
    debug!(node_count, edge_count = out.len() - node_count, "planned style bypasses");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathnet_engine::style::{Element, effective};

    fn find<'a>(out: &'a [Bypass], id: &str, property: &str) -> Vec<&'a str> {
        out.iter()
            .filter(|b| b.id == id && b.property == property)
            .map(|b| b.value.as_str())
            .collect()
    }

    #[test]
    fn test_node_shape_from_type_column() {
        let nodes = Sheet::from_csv_str("SUID,name,TYPE\n7,HK,Enzyme\n8,glc,\n", true).unwrap();
        let edges = Sheet::from_csv_str("SUID,relationship\n", true).unwrap();
        let out = plan_styles(&nodes, &edges, &StyleRules::default()).unwrap();
        assert_eq!(find(&out, "7", "NODE_SHAPE"), vec!["ROUND_RECTANGLE"]);
        assert!(find(&out, "8", "NODE_SHAPE").is_empty());
        assert!(out.iter().all(|b| b.element == Element::Node));
    }

    #[test]
    fn test_inhibit_colour_wins_over_pathway_colour() {
        let nodes = Sheet::from_csv_str("SUID\n1\n", true).unwrap();
        let edges = Sheet::from_csv_str(
            "SUID,relationship,pathway\n20,inhibit,Glycolysis\n",
            true,
        )
        .unwrap();
        let out = effective(&plan_styles(&nodes, &edges, &StyleRules::default()).unwrap());
        assert_eq!(find(&out, "20", "EDGE_STROKE_UNSELECTED_PAINT"), vec!["#FF0000"]);
        assert_eq!(find(&out, "20", "EDGE_TARGET_ARROW_SHAPE"), vec!["T"]);
    }

    #[test]
    fn test_edge_ids_fall_back_to_shared_name() {
        let nodes = Sheet::from_csv_str("name\nx\n", true).unwrap();
        let edges = Sheet::from_csv_str("shared name,interaction\na (pp) b,activate\n", true).unwrap();
        let out = plan_styles(&nodes, &edges, &StyleRules::default()).unwrap();
        assert!(!find(&out, "a (pp) b", "EDGE_TARGET_ARROW_SHAPE").is_empty());
    }

    #[test]
    fn test_edges_without_id_column() {
        let nodes = Sheet::from_csv_str("name\nx\n", true).unwrap();
        let edges = Sheet::from_csv_str("SOURCE,TARGET\na,b\n", true).unwrap();
        assert!(matches!(
            plan_styles(&nodes, &edges, &StyleRules::default()),
            Err(PathnetError::MissingColumn(_))
        ));
    }
}

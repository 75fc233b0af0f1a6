//! Visual style rules for pathway networks.
//!
//! Rules map table facts (node `TYPE`, edge `relationship`, edge pathway
//! text) to visual property overrides ("bypasses"). The property names are
//! those of the visualization tool the tables are loaded into.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which table a bypass applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Node,
    Edge,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Node => f.write_str("node"),
            Element::Edge => f.write_str("edge"),
        }
    }
}

/// One visual property override for one node or edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bypass {
    pub element: Element,
    pub id: String,
    pub property: String,
    pub value: String,
}

impl Bypass {
    fn node(id: &str, property: &str, value: impl ToString) -> Bypass {
        Bypass {
            element: Element::Node,
            id: id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    fn edge(id: &str, property: &str, value: impl ToString) -> Bypass {
        Bypass {
            element: Element::Edge,
            id: id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Facts about a node row that style rules look at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeFacts {
    pub id: String,
    pub node_type: String,
}

/// Facts about an edge row that style rules look at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeFacts {
    pub id: String,
    pub relationship: String,
    pub pathway: String,
}

/// Look shared by every node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeLook {
    pub fill: String,
    pub border_paint: String,
    pub label_color: String,
    pub border_width: f64,
    pub font_size: f64,
    pub height: f64,
    pub width: f64,
    pub label_width: f64,
}

impl Default for NodeLook {
    fn default() -> Self {
        NodeLook {
            fill: "#F5F5F5".to_string(),
            border_paint: "#9E9E9E".to_string(),
            label_color: "#424242".to_string(),
            border_width: 2.0,
            font_size: 12.0,
            height: 50.0,
            width: 120.0,
            label_width: 100.0,
        }
    }
}

/// Per-type size changes applied after [`NodeLook`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeOverride {
    pub size: Option<f64>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub label_width: Option<f64>,
}

/// Arrow heads, and optionally a colour for the line and the target arrow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrowStyle {
    pub target_shape: String,
    pub source_shape: String,
    pub color: Option<String>,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        ArrowStyle {
            target_shape: "ARROW".to_string(),
            source_shape: "NONE".to_string(),
            color: None,
        }
    }
}

/// Edge colour for edges whose pathway text contains `name`
/// (case-insensitive) and does not contain `exclude`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathwayColor {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl PathwayColor {
    fn new(name: &str, color: &str) -> PathwayColor {
        PathwayColor {
            name: name.to_string(),
            color: color.to_string(),
            exclude: None,
        }
    }

    pub fn matches(&self, pathway: &str) -> bool {
        let text = pathway.to_lowercase();
        if !text.contains(&self.name.to_lowercase()) {
            return false;
        }
        match &self.exclude {
            Some(ex) => !text.contains(&ex.to_lowercase()),
            None => true,
        }
    }
}

/// Complete rule set. Keys of the maps are compared case-insensitively
/// against trimmed table values.
///
/// When deserialized, each keyed table is laid over the built-in one, so a
/// config naming one node type keeps the shapes of all the others.
/// `pathway_colors` is ordered and is replaced as a whole.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleRules {
    #[serde(deserialize_with = "shapes_over_defaults")]
    pub node_shapes: BTreeMap<String, String>,
    pub node_look: NodeLook,
    #[serde(deserialize_with = "sizes_over_defaults")]
    pub size_overrides: BTreeMap<String, SizeOverride>,
    #[serde(deserialize_with = "line_types_over_defaults")]
    pub line_types: BTreeMap<String, String>,
    pub default_arrow: ArrowStyle,
    #[serde(deserialize_with = "arrows_over_defaults")]
    pub arrows: BTreeMap<String, ArrowStyle>,
    pub pathway_colors: Vec<PathwayColor>,
}

/// `user` entries replace `base` entries whose key matches ignoring case
/// and surrounding space.
fn merge_keyed<V>(
    mut base: BTreeMap<String, V>,
    user: BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    for (key, value) in user {
        let wanted = key.trim();
        base.retain(|k, _| !k.trim().eq_ignore_ascii_case(wanted));
        base.insert(key, value);
    }
    base
}

fn shapes_over_defaults<'de, D>(d: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(merge_keyed(default_node_shapes(), BTreeMap::deserialize(d)?))
}

fn sizes_over_defaults<'de, D>(d: D) -> Result<BTreeMap<String, SizeOverride>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(merge_keyed(default_size_overrides(), BTreeMap::deserialize(d)?))
}

fn line_types_over_defaults<'de, D>(d: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(merge_keyed(default_line_types(), BTreeMap::deserialize(d)?))
}

fn arrows_over_defaults<'de, D>(d: D) -> Result<BTreeMap<String, ArrowStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(merge_keyed(default_arrows(), BTreeMap::deserialize(d)?))
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_node_shapes() -> BTreeMap<String, String> {
    table(&[
        ("metabolite", "RECTANGLE"),
        ("state", "RECTANGLE"),
        ("enzyme", "ROUND_RECTANGLE"),
        ("hormone", "OCTAGON"),
        ("drug", "HEXAGON"),
        ("inhibitor", "PARALLELOGRAM"),
        ("photon", "ELLIPSE"),
        ("condition", "ELLIPSE"),
        ("cofactor", "DIAMOND"),
        ("reaction", "VEE"),
    ])
}

fn default_line_types() -> BTreeMap<String, String> {
    table(&[
        ("reaction", "SOLID"),
        ("reaction(s)", "SEPARATE_ARROW"),
        ("transport", "DOT"),
        ("activate", "DASH_DOT"),
        ("inhibit", "SOLID"),
        ("electron flow", "LONG_DASH"),
        ("photon flow", "ZIGZAG"),
    ])
}

fn default_size_overrides() -> BTreeMap<String, SizeOverride> {
    BTreeMap::from([(
        "enzyme".to_string(),
        SizeOverride {
            size: Some(40.0),
            height: Some(80.0),
            width: Some(80.0),
            label_width: Some(70.0),
        },
    )])
}

fn default_arrows() -> BTreeMap<String, ArrowStyle> {
    BTreeMap::from([
        (
            "activate".to_string(),
            ArrowStyle {
                color: Some("#00FF00".to_string()),
                ..ArrowStyle::default()
            },
        ),
        (
            "inhibit".to_string(),
            ArrowStyle {
                target_shape: "T".to_string(),
                color: Some("#FF0000".to_string()),
                ..ArrowStyle::default()
            },
        ),
    ])
}

impl Default for StyleRules {
    fn default() -> Self {
        let mut pathway_colors: Vec<PathwayColor> = [
            ("glycolysis", "#8B7355"),
            ("gluconeogenesis", "#A1887F"),
            ("citric acid cycle", "#6D4C41"),
            ("fermentation", "#BCAAA4"),
            ("pentose phosphate pathway", "#9E9D24"),
            ("oxidative phosphorylation", "#546E7A"),
            ("malate-aspartate shuttle", "#78909C"),
            ("glycerophosphate shuttle", "#90A4AE"),
            ("glycogen synthesis", "#D7CCC8"),
            ("glycogen catabolism", "#BCAAA4"),
            ("other carbohydrate metabolism", "#A1887F"),
            ("fatty acid synthesis", "#81C784"),
            ("β-oxidation", "#4CAF50"),
            ("cholesterol synthesis", "#66BB6A"),
            ("lipid metabolism", "#A5D6A7"),
            ("glyoxylate cycle", "#C8E6C9"),
            ("ketobody metabolism", "#388E3C"),
            ("amino acid synthesis", "#64B5F6"),
            ("amino acid catabolism", "#2196F3"),
            ("urea cycle", "#1976D2"),
            ("nitrogen fixation", "#90CAF9"),
            ("nucleotide synthesis", "#BA68C8"),
            ("nucleotide catabolism", "#9C27B0"),
            ("calvin cycle", "#FFB74D"),
            ("calvin cycle（C4）", "#FF9800"),
            ("photophosphorylation", "#FFD54F"),
        ]
        .iter()
        .map(|(name, color)| PathwayColor::new(name, color))
        .collect();
        if let Some(calvin) = pathway_colors.iter_mut().find(|p| p.name == "calvin cycle") {
            calvin.exclude = Some("C4".to_string());
        }

        StyleRules {
            node_shapes: default_node_shapes(),
            node_look: NodeLook::default(),
            size_overrides: default_size_overrides(),
            line_types: default_line_types(),
            default_arrow: ArrowStyle::default(),
            arrows: default_arrows(),
            pathway_colors,
        }
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    map.get(key)
        .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}

/// Node overrides in application order: shape, shared look, per-type sizes.
pub fn node_bypasses(rules: &StyleRules, nodes: &[NodeFacts]) -> Vec<Bypass> {
    let look = &rules.node_look;
    let mut out = Vec::new();
    for node in nodes {
        let id = node.id.as_str();
        if id.trim().is_empty() {
            continue;
        }
        if let Some(shape) = lookup(&rules.node_shapes, &node.node_type) {
            out.push(Bypass::node(id, "NODE_SHAPE", shape));
        }
        out.push(Bypass::node(id, "NODE_FILL_COLOR", &look.fill));
        out.push(Bypass::node(id, "NODE_BORDER_PAINT", &look.border_paint));
        out.push(Bypass::node(id, "NODE_LABEL_COLOR", &look.label_color));
        out.push(Bypass::node(id, "NODE_BORDER_WIDTH", look.border_width));
        out.push(Bypass::node(id, "NODE_LABEL_FONT_SIZE", look.font_size));
        out.push(Bypass::node(id, "NODE_HEIGHT", look.height));
        out.push(Bypass::node(id, "NODE_WIDTH", look.width));
        out.push(Bypass::node(id, "NODE_LABEL_WIDTH", look.label_width));

        if let Some(sizes) = lookup(&rules.size_overrides, &node.node_type) {
            let props = [
                ("NODE_SIZE", sizes.size),
                ("NODE_HEIGHT", sizes.height),
                ("NODE_WIDTH", sizes.width),
                ("NODE_LABEL_WIDTH", sizes.label_width),
            ];
            for (prop, value) in props {
                if let Some(v) = value {
                    out.push(Bypass::node(id, prop, v));
                }
            }
        }
    }
    out
}

/// Edge overrides in application order: line type, default arrows, pathway
/// colours (every matching entry, later ones win), then relationship
/// arrows. Activation and inhibition colours therefore win over pathway
/// colours.
pub fn edge_bypasses(rules: &StyleRules, edges: &[EdgeFacts]) -> Vec<Bypass> {
    let mut out = Vec::new();
    for edge in edges {
        let id = edge.id.as_str();
        if id.trim().is_empty() {
            continue;
        }
        if let Some(line) = lookup(&rules.line_types, &edge.relationship) {
            out.push(Bypass::edge(id, "EDGE_LINE_TYPE", line));
        }
        push_arrow(&mut out, id, &rules.default_arrow);

        for pc in rules.pathway_colors.iter().filter(|pc| pc.matches(&edge.pathway)) {
            out.push(Bypass::edge(id, "EDGE_STROKE_UNSELECTED_PAINT", &pc.color));
            out.push(Bypass::edge(id, "EDGE_TARGET_ARROW_UNSELECTED_PAINT", &pc.color));
        }

        if let Some(arrow) = lookup(&rules.arrows, &edge.relationship) {
            push_arrow(&mut out, id, arrow);
        }
    }
    out
}

fn push_arrow(out: &mut Vec<Bypass>, id: &str, arrow: &ArrowStyle) {
    out.push(Bypass::edge(id, "EDGE_TARGET_ARROW_SHAPE", &arrow.target_shape));
    out.push(Bypass::edge(id, "EDGE_SOURCE_ARROW_SHAPE", &arrow.source_shape));
    if let Some(color) = &arrow.color {
        out.push(Bypass::edge(id, "EDGE_STROKE_UNSELECTED_PAINT", color));
        out.push(Bypass::edge(id, "EDGE_TARGET_ARROW_UNSELECTED_PAINT", color));
    }
}

/// Collapse a bypass list to the value that wins for each (element, id,
/// property), keeping the position of the first occurrence.
pub fn effective(bypasses: &[Bypass]) -> Vec<Bypass> {
    let mut out: Vec<Bypass> = Vec::new();
    let mut at: BTreeMap<(Element, &str, &str), usize> = BTreeMap::new();
    for b in bypasses {
        let key = (b.element, b.id.as_str(), b.property.as_str());
        match at.get(&key) {
            Some(&i) => out[i].value = b.value.clone(),
            None => {
                at.insert(key, out.len());
                out.push(b.clone());
            }
        }
    }
    out
}

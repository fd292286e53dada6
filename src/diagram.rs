//! Named diagrams that posts can embed with a `<!-- diagram:NAME -->` marker.
//! A diagram is a left-to-right chain of labelled nodes joined by labelled
//! edges.

/// The accent color of a diagram node. Rendered as a class name; the colors
/// themselves belong to the stylesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Purple,
    Yellow,
    Green,
}

impl Accent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::Blue => "blue",
            Accent::Purple => "purple",
            Accent::Yellow => "yellow",
            Accent::Green => "green",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagramNode {
    pub label: &'static str,
    pub accent: Accent,
}

/// A chain diagram. `edges[i]` labels the arrow from `nodes[i]` to
/// `nodes[i + 1]`, so there is always one edge fewer than there are nodes.
#[derive(Debug, PartialEq, Eq)]
pub struct Diagram {
    pub name: &'static str,
    pub nodes: &'static [DiagramNode],
    pub edges: &'static [&'static str],
}

impl Diagram {
    /// Iterates over the diagram's nodes, each paired with the label of the
    /// edge leaving it (`None` for the last node).
    pub fn segments(&self) -> impl Iterator<Item = (&DiagramNode, Option<&'static str>)> {
        let edges = self.edges;
        self.nodes
            .iter()
            .enumerate()
            .map(move |(i, node)| (node, edges.get(i).copied()))
    }
}

/// How knowledge flows through a Lattice graph.
pub static LATTICE_FLOW: Diagram = Diagram {
    name: "lattice-flow",
    nodes: &[
        DiagramNode {
            label: "Sources",
            accent: Accent::Blue,
        },
        DiagramNode {
            label: "Theses",
            accent: Accent::Purple,
        },
        DiagramNode {
            label: "Requirements",
            accent: Accent::Yellow,
        },
        DiagramNode {
            label: "Implementations",
            accent: Accent::Green,
        },
    ],
    edges: &["supports", "derives", "satisfies"],
};

static DIAGRAMS: &[&Diagram] = &[&LATTICE_FLOW];

/// Looks up a diagram by the name used in its marker.
pub fn lookup(name: &str) -> Option<&'static Diagram> {
    DIAGRAMS.iter().copied().find(|diagram| diagram.name == name)
}

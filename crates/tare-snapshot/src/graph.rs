//! Heap graph model and the portable snapshot document.
//!
//! The graph is a flat node/edge table with an interned string table,
//! in the manner of browser heap-snapshot formats: nodes appear in
//! creation order, each node's outgoing edges are grouped and counted
//! on the node, and every display string is an index into `strings`.
//! Construction from a population is fully deterministic, so two
//! captures of identical populations produce identical documents.

use std::mem;

use indexmap::IndexSet;
use serde::Serialize;
use smallvec::SmallVec;

use tare_core::Instance;
use tare_population::Population;

/// Snapshot format identifier embedded in every document.
pub const FORMAT: &str = "tare-heap-v1";

/// What a node in the heap graph represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Synthetic root anchoring the graph.
    Synthetic,
    /// The retention collection of one measurement run.
    Population,
    /// One constructed instance (its dispatch machinery).
    Instance,
    /// The state record payload of an instance.
    State,
    /// A heap-held value buffer.
    Buffer,
    /// A heap-held string.
    Str,
}

/// How an edge connects two nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Indexed element of an ordered container; `name_or_index` is the
    /// element index.
    Element,
    /// Named property; `name_or_index` is a string-table index.
    Property,
}

/// One node of the heap graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeapNode {
    /// Node classification.
    pub kind: NodeKind,
    /// String-table index of the display name.
    pub name: u32,
    /// Stable node identifier, assigned sequentially from 1.
    pub id: u32,
    /// Bytes attributed to the node itself.
    pub self_size: u64,
    /// Number of outgoing edges; edges are grouped by source node in
    /// the edge table, so this count delimits each node's span.
    pub edge_count: u32,
}

/// One edge of the heap graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeapEdge {
    /// Edge classification.
    pub kind: EdgeKind,
    /// Element index or string-table index, by kind.
    pub name_or_index: u32,
    /// Index of the target node in the node table.
    pub to_node: u32,
}

/// Incremental builder keeping per-node edge lists until
/// [`finish`](GraphBuilder::finish) flattens them into grouped order.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<(HeapNode, SmallVec<[HeapEdge; 4]>)>,
    strings: IndexSet<String>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable table index.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(index) = self.strings.get_index_of(s) {
            return index as u32;
        }
        let (index, _) = self.strings.insert_full(s.to_string());
        index as u32
    }

    /// Append a node, returning its index in the node table.
    pub fn add_node(&mut self, kind: NodeKind, name: &str, self_size: u64) -> u32 {
        let name = self.intern(name);
        let index = self.nodes.len() as u32;
        let node = HeapNode {
            kind,
            name,
            id: index + 1,
            self_size,
            edge_count: 0,
        };
        self.nodes.push((node, SmallVec::new()));
        index
    }

    /// Add a named property edge.
    pub fn add_property(&mut self, from: u32, name: &str, to: u32) {
        let name_or_index = self.intern(name);
        self.nodes[from as usize].1.push(HeapEdge {
            kind: EdgeKind::Property,
            name_or_index,
            to_node: to,
        });
    }

    /// Add an indexed element edge.
    pub fn add_element(&mut self, from: u32, index: u32, to: u32) {
        self.nodes[from as usize].1.push(HeapEdge {
            kind: EdgeKind::Element,
            name_or_index: index,
            to_node: to,
        });
    }

    /// Flatten into a [`HeapGraph`], grouping edges by source node.
    pub fn finish(self, strategy: &str) -> HeapGraph {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut edges = Vec::new();
        for (mut node, node_edges) in self.nodes {
            node.edge_count = node_edges.len() as u32;
            nodes.push(node);
            edges.extend(node_edges);
        }
        HeapGraph {
            strategy: strategy.to_string(),
            nodes,
            edges,
            strings: self.strings,
        }
    }
}

/// A complete heap graph ready for serialization.
pub struct HeapGraph {
    strategy: String,
    nodes: Vec<HeapNode>,
    edges: Vec<HeapEdge>,
    strings: IndexSet<String>,
}

#[derive(Serialize)]
struct SnapshotMeta<'a> {
    format: &'static str,
    strategy: &'a str,
    node_count: usize,
    edge_count: usize,
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    snapshot: SnapshotMeta<'a>,
    nodes: &'a [HeapNode],
    edges: &'a [HeapEdge],
    strings: Vec<&'a str>,
}

impl HeapGraph {
    /// Walk a population into a heap graph.
    ///
    /// Shape: a synthetic root owns the population node; the population
    /// holds one element edge per instance; each instance owns its
    /// state record; the state owns its value buffer and name string.
    /// Self-sizes come from the instances' layout descriptors, so the
    /// per-strategy dispatch cost is visible in the snapshot.
    pub fn from_population(population: &Population) -> Self {
        let mut builder = GraphBuilder::new();

        let root = builder.add_node(NodeKind::Synthetic, "(root)", 0);
        let slot_bytes = mem::size_of::<Box<dyn Instance>>();
        let population_bytes =
            mem::size_of::<Population>() + population.len() * slot_bytes;
        let population_node = builder.add_node(
            NodeKind::Population,
            &format!("population-{}", population.strategy().label()),
            population_bytes as u64,
        );
        builder.add_property(root, "population", population_node);

        for (i, layout) in population.layouts().iter().enumerate() {
            let instance = builder.add_node(
                NodeKind::Instance,
                &layout.name,
                (layout.dispatch_bytes + slot_bytes) as u64,
            );
            builder.add_element(population_node, i as u32, instance);

            let state = builder.add_node(NodeKind::State, "state", layout.state_bytes as u64);
            builder.add_property(instance, "state", state);

            let buffer =
                builder.add_node(NodeKind::Buffer, "values", layout.buffer_bytes as u64);
            builder.add_property(state, "values", buffer);

            let name = builder.add_node(NodeKind::Str, &layout.name, layout.name_bytes as u64);
            builder.add_property(state, "name", name);
        }

        builder.finish(population.strategy().label())
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The strategy label the graph was captured under.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> &[HeapNode] {
        &self.nodes
    }

    /// Edges grouped by source node.
    pub fn edges(&self) -> &[HeapEdge] {
        &self.edges
    }

    /// Serialize to the portable JSON snapshot document.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let document = SnapshotDocument {
            snapshot: SnapshotMeta {
                format: FORMAT,
                strategy: &self.strategy,
                node_count: self.nodes.len(),
                edge_count: self.edges.len(),
            },
            nodes: &self.nodes,
            edges: &self.edges,
            strings: self.strings.iter().map(|s| s.as_str()).collect(),
        };
        serde_json::to_vec(&document)
    }
}

//! The read-only network graph.

use std::collections::HashMap;

use crate::domain::{LineId, StationId};

/// Fallback duration for a ride hop with missing or invalid time (minutes).
pub const DEFAULT_HOP_MINUTES: f64 = 2.0;

/// Fallback duration for a transfer with missing or invalid time (minutes).
pub const DEFAULT_TRANSFER_MINUTES: f64 = 4.0;

/// Error raised when graph data is structurally corrupt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge references a station that is not a node
    #[error("edge {from} -> {to} references unknown station {missing}")]
    DanglingEdge {
        from: StationId,
        to: StationId,
        missing: StationId,
    },

    /// Two nodes share an id
    #[error("duplicate station node {0}")]
    DuplicateStation(StationId),

    /// A search state references an edge id this graph does not have
    #[error("unknown edge {0}")]
    UnknownEdge(usize),
}

/// A graph vertex: one line-specific instance of a physical station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationNode {
    pub id: StationId,
    pub name: String,
    pub lines: Vec<LineId>,
    /// Whether passengers can change line here.
    pub is_transfer: bool,
}

impl StationNode {
    pub fn new(id: StationId, name: impl Into<String>, lines: Vec<LineId>) -> Self {
        Self {
            id,
            name: name.into(),
            lines,
            is_transfer: false,
        }
    }

    /// The line a passenger arriving here by transfer boards.
    pub fn primary_line(&self) -> Option<&LineId> {
        self.lines.first()
    }
}

/// Index of an edge within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// A directed connection between two station nodes.
///
/// Ride edges carry `travel_minutes`; transfer edges carry
/// `transfer_minutes`. Either may be malformed in hand-built data, so
/// consumers read durations through [`Edge::duration_minutes`].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: StationId,
    pub to: StationId,
    pub line: LineId,
    pub travel_minutes: f64,
    pub is_transfer: bool,
    pub transfer_minutes: Option<f64>,
}

impl Edge {
    /// A ride between adjacent stations on `line`.
    pub fn ride(from: StationId, to: StationId, line: LineId, minutes: f64) -> Self {
        Self {
            from,
            to,
            line,
            travel_minutes: minutes,
            is_transfer: false,
            transfer_minutes: None,
        }
    }

    /// A transfer onto `line` between same-name stations.
    pub fn transfer(from: StationId, to: StationId, line: LineId, minutes: f64) -> Self {
        Self {
            from,
            to,
            line,
            travel_minutes: 0.0,
            is_transfer: true,
            transfer_minutes: Some(minutes),
        }
    }

    /// The same edge in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            ..self.clone()
        }
    }

    /// Traversal time in minutes, always finite and positive.
    ///
    /// Missing, zero, negative or non-finite values fall back to
    /// [`DEFAULT_HOP_MINUTES`] or [`DEFAULT_TRANSFER_MINUTES`].
    pub fn duration_minutes(&self) -> f64 {
        let (raw, fallback) = if self.is_transfer {
            (
                self.transfer_minutes.unwrap_or(f64::NAN),
                DEFAULT_TRANSFER_MINUTES,
            )
        } else {
            (self.travel_minutes, DEFAULT_HOP_MINUTES)
        };

        if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            fallback
        }
    }
}

/// Immutable directed graph of station nodes and edges.
///
/// Built once (see [`super::GraphBuilder`]) and shared read-only between
/// searches.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<StationNode>,
    index: HashMap<StationId, usize>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
}

impl Graph {
    /// Construct a graph from nodes and directed edges.
    ///
    /// Edges are taken as given; callers wanting bidirectional travel supply
    /// both directions.
    ///
    /// # Errors
    ///
    /// Returns `Err` if two nodes share an id or an edge references a
    /// station that is not a node.
    pub fn new(nodes: Vec<StationNode>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), i).is_some() {
                return Err(GraphError::DuplicateStation(node.id.clone()));
            }
        }

        for edge in &edges {
            for end in [&edge.from, &edge.to] {
                if !index.contains_key(end) {
                    return Err(GraphError::DanglingEdge {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }

        Ok(Self::from_validated(nodes, index, edges))
    }

    /// Assemble a graph whose edges are known to reference existing nodes.
    pub(super) fn from_validated(
        nodes: Vec<StationNode>,
        index: HashMap<StationId, usize>,
        edges: Vec<Edge>,
    ) -> Self {
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for (i, edge) in edges.iter().enumerate() {
            if let Some(&from) = index.get(&edge.from) {
                adjacency[from].push(EdgeId(i));
            }
        }

        Self {
            nodes,
            index,
            edges,
            adjacency,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a node by id.
    pub fn node(&self, id: &StationId) -> Option<&StationNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// All edges in build order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Look up an edge. `None` only for ids from a different graph.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Edges leaving a station (empty for unknown stations).
    pub fn outgoing(&self, id: &StationId) -> &[EdgeId] {
        self.index
            .get(id)
            .map(|&i| self.adjacency[i].as_slice())
            .unwrap_or(&[])
    }

    /// Every edge joining `a` and `b`, in either direction.
    pub fn edges_between(&self, a: &StationId, b: &StationId) -> Vec<EdgeId> {
        let forward = self.outgoing(a).iter().filter(|&&e| &self.edges[e.0].to == b);
        let backward = self.outgoing(b).iter().filter(|&&e| &self.edges[e.0].to == a);
        forward.chain(backward).copied().collect()
    }

    /// Display name of a station, falling back to its id.
    pub fn station_name(&self, id: &StationId) -> String {
        self.node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.as_str().to_string())
    }

    /// Ids of all nodes with exactly this name, in build order.
    pub fn station_ids_named(&self, name: &str) -> Vec<&StationId> {
        self.nodes
            .iter()
            .filter(|n| n.name == name)
            .map(|n| &n.id)
            .collect()
    }
}

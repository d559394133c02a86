//! Builds the network graph from catalog data.
//!
//! Consecutive stations on every line sequence become bidirectional ride
//! edges; stations sharing a name become an interchange joined pairwise by
//! bidirectional transfer edges.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{info, warn};

use super::config::GraphConfig;
use super::model::{Edge, Graph, StationNode};
use crate::catalog::Catalog;
use crate::domain::{Coordinates, Line, LineId, StationId};

/// Key used to insert each directed edge once.
type EdgeKey = (StationId, StationId, LineId, bool);

/// Converts a validated catalog into a [`Graph`].
///
/// Building is pure: the same catalog always yields the same nodes and edges
/// in the same order.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Build the graph.
    ///
    /// Stations referenced by a line but absent from the catalog are skipped
    /// with a warning; the stations on either side of the gap are joined.
    pub fn build(&self, catalog: &Catalog) -> Graph {
        let mut nodes: Vec<StationNode> = Vec::with_capacity(catalog.stations.len());
        let mut coordinates: Vec<Option<Coordinates>> = Vec::with_capacity(catalog.stations.len());
        let mut index: HashMap<StationId, usize> = HashMap::with_capacity(catalog.stations.len());

        for station in &catalog.stations {
            if index.contains_key(&station.id) {
                warn!(station = %station.id, "Duplicate station in catalog, keeping first");
                continue;
            }
            index.insert(station.id.clone(), nodes.len());
            nodes.push(StationNode::new(
                station.id.clone(),
                station.name.clone(),
                station.lines.clone(),
            ));
            coordinates.push(station.coordinates);
        }

        let mut edges = EdgeSet::default();

        for line in &catalog.lines {
            self.add_line(line, &index, &mut nodes, &coordinates, &mut edges);
        }

        self.add_transfers(&mut nodes, &mut edges);

        for node in &mut nodes {
            if node.lines.len() > 1 {
                node.is_transfer = true;
            }
        }

        let graph = Graph::from_validated(nodes, index, edges.edges);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            lines = catalog.lines.len(),
            "Built network graph"
        );
        graph
    }

    fn add_line(
        &self,
        line: &Line,
        index: &HashMap<StationId, usize>,
        nodes: &mut [StationNode],
        coordinates: &[Option<Coordinates>],
        edges: &mut EdgeSet,
    ) {
        for (seq_idx, sequence) in line.sequences().enumerate() {
            let resolved: Vec<usize> = sequence
                .iter()
                .filter_map(|id| match index.get(id) {
                    Some(&i) => Some(i),
                    None => {
                        warn!(line = %line.id, station = %id, "Line references unknown station, skipping");
                        None
                    }
                })
                .collect();

            for &i in &resolved {
                if !nodes[i].lines.contains(&line.id) {
                    nodes[i].lines.push(line.id.clone());
                }
            }

            for pair in resolved.windows(2) {
                self.add_hop(line, pair[0], pair[1], nodes, coordinates, edges);
            }

            // Only the main sequence of a circular line closes the loop
            if seq_idx == 0
                && line.circular
                && resolved.len() > 2
                && let (Some(&last), Some(&first)) = (resolved.last(), resolved.first())
            {
                self.add_hop(line, last, first, nodes, coordinates, edges);
            }
        }
    }

    fn add_hop(
        &self,
        line: &Line,
        a: usize,
        b: usize,
        nodes: &[StationNode],
        coordinates: &[Option<Coordinates>],
        edges: &mut EdgeSet,
    ) {
        if a == b {
            return;
        }

        let distance = match (coordinates[a], coordinates[b]) {
            (Some(ca), Some(cb)) => ca.distance_km(&cb),
            _ => self.config.default_distance_km,
        };
        let minutes = self.config.hop_minutes(distance);

        edges.insert_both(Edge::ride(
            nodes[a].id.clone(),
            nodes[b].id.clone(),
            line.id.clone(),
            minutes,
        ));
    }

    fn add_transfers(&self, nodes: &mut [StationNode], edges: &mut EdgeSet) {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, node) in nodes.iter().enumerate() {
            groups.entry(node.name.clone()).or_default().push(i);
        }

        for (name, members) in groups {
            if members.len() < 2 {
                continue;
            }

            let lines: BTreeSet<&LineId> = members.iter().flat_map(|&i| nodes[i].lines.iter()).collect();
            let minutes = self.config.transfer_minutes(lines.len());

            for (pos, &a) in members.iter().enumerate() {
                for &b in &members[pos + 1..] {
                    self.add_transfer_pair(&name, &nodes[a], &nodes[b], minutes, edges);
                }
            }

            for &i in &members {
                nodes[i].is_transfer = true;
            }
        }
    }

    fn add_transfer_pair(
        &self,
        name: &str,
        a: &StationNode,
        b: &StationNode,
        minutes: f64,
        edges: &mut EdgeSet,
    ) {
        let (Some(line_a), Some(line_b)) = (a.primary_line(), b.primary_line()) else {
            warn!(station = name, "Interchange member serves no line, no transfer added");
            return;
        };

        edges.insert(Edge::transfer(a.id.clone(), b.id.clone(), line_b.clone(), minutes));
        edges.insert(Edge::transfer(b.id.clone(), a.id.clone(), line_a.clone(), minutes));
    }
}

/// Ordered edge list that ignores repeated insertions.
#[derive(Default)]
struct EdgeSet {
    edges: Vec<Edge>,
    seen: HashSet<EdgeKey>,
}

impl EdgeSet {
    fn insert(&mut self, edge: Edge) {
        let key = (
            edge.from.clone(),
            edge.to.clone(),
            edge.line.clone(),
            edge.is_transfer,
        );
        if self.seen.insert(key) {
            self.edges.push(edge);
        }
    }

    fn insert_both(&mut self, edge: Edge) {
        let reversed = edge.reversed();
        self.insert(edge);
        self.insert(reversed);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Station;
    use proptest::prelude::*;

    /// Random catalogs: `n` stations with names drawn from a small pool so
    /// interchanges occur, and lines over random station subsequences.
    fn catalog_strategy() -> impl Strategy<Value = Catalog> {
        (2usize..12).prop_flat_map(|n| {
            let names = prop::collection::vec(0u8..5, n);
            let lines = prop::collection::vec(prop::collection::vec(0..n + 2, 0..6), 0..4);
            (names, lines).prop_map(move |(names, lines)| {
                let stations = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        Station::new(
                            StationId::parse(&format!("S{i}")).unwrap(),
                            format!("N{name}"),
                            vec![LineId::parse(&format!("L{}", i % 3)).unwrap()],
                        )
                    })
                    .collect();
                let lines = lines
                    .iter()
                    .enumerate()
                    .map(|(l, seq)| {
                        Line::new(
                            LineId::parse(&format!("L{l}")).unwrap(),
                            seq.iter()
                                .map(|i| StationId::parse(&format!("S{i}")).unwrap())
                                .collect(),
                        )
                    })
                    .collect();
                Catalog::new(stations, lines)
            })
        })
    }

    proptest! {
        /// Building twice yields identical node and edge counts
        #[test]
        fn build_is_idempotent(catalog in catalog_strategy()) {
            let builder = GraphBuilder::default();
            let a = builder.build(&catalog);
            let b = builder.build(&catalog);
            prop_assert_eq!(a.node_count(), b.node_count());
            prop_assert_eq!(a.edge_count(), b.edge_count());
        }

        /// Every edge has a reverse twin with the same kind and duration
        #[test]
        fn edges_are_bidirectional(catalog in catalog_strategy()) {
            let graph = GraphBuilder::default().build(&catalog);
            for (_, edge) in graph.edges() {
                let twin = graph
                    .outgoing(&edge.to)
                    .iter()
                    .filter_map(|&id| graph.edge(id))
                    .any(|e| {
                        e.to == edge.from
                            && e.is_transfer == edge.is_transfer
                            && (e.duration_minutes() - edge.duration_minutes()).abs() < 1e-9
                    });
                prop_assert!(twin, "no reverse for {:?}", edge);
            }
        }

        /// Every edge duration is finite and positive
        #[test]
        fn durations_positive(catalog in catalog_strategy()) {
            let graph = GraphBuilder::default().build(&catalog);
            for (_, edge) in graph.edges() {
                let d = edge.duration_minutes();
                prop_assert!(d.is_finite() && d > 0.0);
            }
        }
    }
}

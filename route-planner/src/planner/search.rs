//! Shortest-path search over the network graph.
//!
//! One best-first expansion loop serves all three route criteria; the
//! variants differ only in how they price an edge and how they rank a state.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use super::config::SearchConfig;
use super::cost::EdgeCostModel;
use crate::congestion::CongestionProvider;
use crate::domain::{LineId, RouteKind, StationId};
use crate::graph::{Edge, EdgeId, Graph};

/// Which criterion a search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchVariant {
    /// Minimum travel time.
    Fastest,
    /// Minimum travel time plus a large per-transfer penalty.
    LeastTransfer,
    /// Minimum congestion-weighted travel time.
    LeastCrowded,
}

impl SearchVariant {
    pub const ALL: [SearchVariant; 3] = [
        SearchVariant::Fastest,
        SearchVariant::LeastTransfer,
        SearchVariant::LeastCrowded,
    ];

    /// The result kind produced by this variant.
    pub fn kind(self) -> RouteKind {
        match self {
            SearchVariant::Fastest => RouteKind::Fastest,
            SearchVariant::LeastTransfer => RouteKind::LeastTransfer,
            SearchVariant::LeastCrowded => RouteKind::LeastCrowded,
        }
    }

    /// Queue priority of a state (lower is expanded first).
    fn priority(self, state: &SearchState, transfer_penalty: f64) -> f64 {
        match self {
            SearchVariant::Fastest | SearchVariant::LeastCrowded => state.cost,
            SearchVariant::LeastTransfer => state.cost + state.transfers as f64 * transfer_penalty,
        }
    }
}

impl fmt::Display for SearchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Why a search produced no route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchFailure {
    /// Start or end station is not in the graph
    #[error("station {0} not found")]
    StationNotFound(StationId),

    /// Queue drained without reaching the destination
    #[error("no {variant} path found after exploring {explored} stations")]
    NoPathFound {
        variant: SearchVariant,
        explored: usize,
        origin_neighbors: usize,
    },

    /// Iteration cap hit before the search converged
    #[error("{variant} search stopped after {iterations} iterations ({queue_len} states queued)")]
    IterationCapExceeded {
        variant: SearchVariant,
        iterations: usize,
        queue_len: usize,
        explored: usize,
    },
}

/// Edges hidden from a single search.
///
/// Masking never touches the graph; dropping the mask is the restore.
#[derive(Debug, Clone, Default)]
pub struct EdgeMask {
    hidden: HashSet<EdgeId>,
}

impl EdgeMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(&mut self, edges: impl IntoIterator<Item = EdgeId>) {
        self.hidden.extend(edges);
    }

    pub fn contains(&self, edge: EdgeId) -> bool {
        self.hidden.contains(&edge)
    }
}

/// A partial route ending at `station`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub station: StationId,
    /// Variant-specific accumulated cost.
    pub cost: f64,
    /// Accumulated raw travel time (minutes).
    pub time: f64,
    pub transfers: usize,
    /// Stations visited so far; `path[0]` is the origin.
    pub path: Vec<StationId>,
    pub edges: Vec<EdgeId>,
    /// Lines ridden, in first-ridden order.
    pub lines_used: Vec<LineId>,
    /// Line currently being ridden; `None` at the origin and right after a
    /// transfer, when any line may be boarded without another transfer.
    pub current_line: Option<LineId>,
}

impl SearchState {
    /// The zero-length state at the origin.
    fn initial(origin: &StationId) -> Self {
        Self {
            station: origin.clone(),
            cost: 0.0,
            time: 0.0,
            transfers: 0,
            path: vec![origin.clone()],
            edges: Vec::new(),
            lines_used: Vec::new(),
            current_line: None,
        }
    }

    /// Extend this state along `edge`.
    fn extend(&self, id: EdgeId, edge: &Edge, edge_cost: f64) -> Self {
        let mut next = self.clone();
        next.station = edge.to.clone();
        next.cost += edge_cost;
        next.time += edge.duration_minutes();
        next.path.push(edge.to.clone());
        next.edges.push(id);

        if edge.is_transfer {
            next.transfers += 1;
            next.current_line = None;
        } else {
            if let Some(line) = &self.current_line
                && line != &edge.line
            {
                next.transfers += 1;
            }
            if !next.lines_used.contains(&edge.line) {
                next.lines_used.push(edge.line.clone());
            }
            next.current_line = Some(edge.line.clone());
        }

        next
    }

    /// Whether the path already passes through `station`.
    pub fn visits(&self, station: &StationId) -> bool {
        self.path.contains(station)
    }
}

/// Best label recorded for a station.
struct Label {
    priority: f64,
    transfers: usize,
    line: Option<LineId>,
}

impl Label {
    fn dominates(&self, priority: f64, candidate: &SearchState) -> bool {
        self.priority <= priority
            && self.transfers <= candidate.transfers
            && self.line == candidate.current_line
    }
}

/// Queue entry; ordered so `BinaryHeap` pops the lowest priority first and
/// equal priorities in insertion order.
struct Queued {
    priority: f64,
    seq: u64,
    state: SearchState,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

/// Route search over a read-only graph.
///
/// Each call to [`PathFinder::find`] owns its queue and dominance table, so a
/// finder can be shared freely between searches.
#[derive(Clone, Copy)]
pub struct PathFinder<'a> {
    graph: &'a Graph,
    config: &'a SearchConfig,
    costs: EdgeCostModel<'a>,
}

impl<'a> PathFinder<'a> {
    /// Create a new path finder.
    pub fn new(
        graph: &'a Graph,
        config: &'a SearchConfig,
        congestion: Option<&'a dyn CongestionProvider>,
        departure: NaiveDateTime,
    ) -> Self {
        Self {
            graph,
            config,
            costs: EdgeCostModel::new(config.weighting, congestion, departure),
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Search for a route from `start` to `end`.
    pub fn find(
        &self,
        variant: SearchVariant,
        start: &StationId,
        end: &StationId,
        mask: &EdgeMask,
    ) -> Result<SearchState, SearchFailure> {
        for station in [start, end] {
            if !self.graph.contains(station) {
                return Err(SearchFailure::StationNotFound(station.clone()));
            }
        }

        let initial = SearchState::initial(start);
        if start == end {
            return Ok(initial);
        }

        let mut queue = BinaryHeap::new();
        let mut visited: HashMap<StationId, Label> = HashMap::new();
        let mut seq: u64 = 0;
        let mut iterations = 0;
        let mut explored = 0;

        visited.insert(
            start.clone(),
            Label {
                priority: 0.0,
                transfers: 0,
                line: None,
            },
        );
        queue.push(Queued {
            priority: 0.0,
            seq,
            state: initial,
        });

        while let Some(Queued { state, .. }) = queue.pop() {
            if iterations >= self.config.iteration_cap {
                let failure = SearchFailure::IterationCapExceeded {
                    variant,
                    iterations,
                    queue_len: queue.len() + 1,
                    explored,
                };
                warn!(
                    %variant,
                    from = %start,
                    to = %end,
                    iterations,
                    queue_len = queue.len() + 1,
                    explored,
                    "Search hit iteration cap"
                );
                return Err(failure);
            }
            iterations += 1;

            if state.transfers > self.config.max_transfers {
                trace!(station = %state.station, transfers = state.transfers, "Pruned over transfer budget");
                continue;
            }

            if &state.station == end {
                debug!(
                    %variant,
                    from = %start,
                    to = %end,
                    minutes = state.time,
                    transfers = state.transfers,
                    iterations,
                    "Route found"
                );
                return Ok(state);
            }

            explored += 1;

            for &edge_id in self.graph.outgoing(&state.station) {
                if mask.contains(edge_id) {
                    continue;
                }
                let Some(edge) = self.graph.edge(edge_id) else {
                    continue;
                };
                if state.visits(&edge.to) {
                    continue;
                }

                let edge_cost = match variant {
                    SearchVariant::LeastCrowded => self.costs.weighted_cost(edge, state.time),
                    _ => EdgeCostModel::fast_path_cost(edge),
                };
                let candidate = state.extend(edge_id, edge, edge_cost);
                let priority = variant.priority(&candidate, self.config.transfer_penalty);

                if visited
                    .get(&candidate.station)
                    .is_some_and(|best| best.dominates(priority, &candidate))
                {
                    continue;
                }

                visited.insert(
                    candidate.station.clone(),
                    Label {
                        priority,
                        transfers: candidate.transfers,
                        line: candidate.current_line.clone(),
                    },
                );
                seq += 1;
                queue.push(Queued {
                    priority,
                    seq,
                    state: candidate,
                });
            }
        }

        let origin_neighbors = self.graph.outgoing(start).len();
        debug!(
            %variant,
            from = %start,
            to = %end,
            explored,
            visited = visited.len(),
            origin_neighbors,
            destination_neighbors = self.graph.outgoing(end).len(),
            "No path found"
        );
        Err(SearchFailure::NoPathFound {
            variant,
            explored,
            origin_neighbors,
        })
    }
}

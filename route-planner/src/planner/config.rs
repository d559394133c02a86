//! Search configuration for the route planner.

/// How the least-crowded search weights edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CongestionWeighting {
    /// Multiplier 1.0 everywhere; no congestion lookups during search.
    #[default]
    Neutral,
    /// Look up each entered edge's crowding level and scale its cost.
    Live,
}

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of transfers allowed.
    /// States over this budget are pruned when dequeued.
    pub max_transfers: usize,

    /// Maximum number of routes to return.
    pub max_routes: usize,

    /// Hard bound on search-loop iterations per search.
    pub iteration_cap: usize,

    /// Cost added per transfer by the least-transfer search (minutes).
    pub transfer_penalty: f64,

    /// Edge weighting used by the least-crowded search.
    pub weighting: CongestionWeighting,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        max_transfers: usize,
        max_routes: usize,
        iteration_cap: usize,
        transfer_penalty: f64,
        weighting: CongestionWeighting,
    ) -> Self {
        Self {
            max_transfers,
            max_routes,
            iteration_cap,
            transfer_penalty,
            weighting,
        }
    }

    pub fn with_max_transfers(mut self, max_transfers: usize) -> Self {
        self.max_transfers = max_transfers;
        self
    }

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }

    pub fn with_weighting(mut self, weighting: CongestionWeighting) -> Self {
        self.weighting = weighting;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers: 5,
            max_routes: 3,
            iteration_cap: 10_000,
            transfer_penalty: 1000.0,
            weighting: CongestionWeighting::Neutral,
        }
    }
}

//! Route engine: owns the network graph and answers route requests.
//!
//! The graph is built from the catalog source on first use and replaced only
//! by an explicit [`RouteEngine::reload`]. Searches take a shared handle to
//! the current graph, so a reload never disturbs a search in progress.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::catalog::{CatalogError, CatalogSource};
use crate::congestion::CongestionProvider;
use crate::domain::{RouteResult, StationId};
use crate::graph::{Graph, GraphBuilder, GraphConfig, GraphError};
use crate::planner::{AlternativeRouteSearch, FareConfig, PathFinder, RouteResultBuilder, SearchConfig};

/// Errors from the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Per-request overrides of the engine's search configuration.
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    pub max_transfers: Option<usize>,
    pub max_routes: Option<usize>,
}

impl RouteOptions {
    pub fn with_max_transfers(mut self, max_transfers: usize) -> Self {
        self.max_transfers = Some(max_transfers);
        self
    }

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = Some(max_routes);
        self
    }

    fn apply(&self, base: &SearchConfig) -> SearchConfig {
        let mut config = base.clone();
        if let Some(max_transfers) = self.max_transfers {
            config.max_transfers = max_transfers;
        }
        if let Some(max_routes) = self.max_routes {
            config.max_routes = max_routes;
        }
        config
    }
}

/// Multi-criteria route search over a lazily built network graph.
pub struct RouteEngine {
    source: Box<dyn CatalogSource>,
    builder: GraphBuilder,
    search: SearchConfig,
    fare: FareConfig,
    congestion: Option<Arc<dyn CongestionProvider>>,
    graph: RwLock<Option<Arc<Graph>>>,
}

impl RouteEngine {
    /// Create an engine reading its network from `source`.
    ///
    /// Nothing is loaded until the first search or [`RouteEngine::reload`].
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            builder: GraphBuilder::default(),
            search: SearchConfig::default(),
            fare: FareConfig::default(),
            congestion: None,
            graph: RwLock::new(None),
        }
    }

    pub fn with_graph_config(mut self, config: GraphConfig) -> Self {
        self.builder = GraphBuilder::new(config);
        self
    }

    pub fn with_search_config(mut self, config: SearchConfig) -> Self {
        self.search = config;
        self
    }

    pub fn with_fare_config(mut self, config: FareConfig) -> Self {
        self.fare = config;
        self
    }

    /// Use `provider` for segment crowding levels and, under live
    /// weighting, for least-crowded edge costs.
    pub fn with_congestion(mut self, provider: impl CongestionProvider + 'static) -> Self {
        self.congestion = Some(Arc::new(provider));
        self
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Whether a graph has been built yet.
    pub fn is_loaded(&self) -> bool {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The current graph, building it on first use.
    pub fn graph(&self) -> Result<Arc<Graph>, EngineError> {
        if let Some(graph) = self.graph.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(graph));
        }

        let mut guard = self.graph.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built it while we waited
        if let Some(graph) = guard.as_ref() {
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(self.build_graph()?);
        *guard = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// Rebuild the graph from the catalog source.
    ///
    /// On success the new graph serves all later searches. On failure the
    /// previous graph (if any) is kept and the error is returned.
    pub fn reload(&self) -> Result<Arc<Graph>, EngineError> {
        let graph = match self.build_graph() {
            Ok(graph) => Arc::new(graph),
            Err(e) => {
                warn!(error = %e, "Graph reload failed, keeping previous graph");
                return Err(e);
            }
        };

        *self.graph.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&graph));
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Reloaded network graph"
        );
        Ok(graph)
    }

    /// Resolve a station query to an id: an exact id first, then an exact
    /// station name (first match in catalog order).
    pub fn resolve_station(&self, query: &str) -> Result<Option<StationId>, EngineError> {
        let graph = self.graph()?;
        let query = query.trim();

        if let Ok(id) = StationId::parse(query)
            && graph.contains(&id)
        {
            return Ok(Some(id));
        }
        Ok(graph.station_ids_named(query).first().map(|&id| id.clone()))
    }

    /// Find up to `max_routes` routes from `start` to `end`.
    ///
    /// `departure` defaults to the current local time. Unknown stations and
    /// unreachable destinations give an empty list.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the graph cannot be built.
    pub fn find_routes(
        &self,
        start: &StationId,
        end: &StationId,
        departure: Option<NaiveDateTime>,
        options: &RouteOptions,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let graph = self.graph()?;
        let config = options.apply(&self.search);
        let departure = departure.unwrap_or_else(|| Local::now().naive_local());
        let congestion = self.congestion.as_deref();

        let finder = PathFinder::new(&graph, &config, congestion, departure);
        let builder = RouteResultBuilder::new(&graph, &self.fare, congestion);
        let routes = AlternativeRouteSearch::new(finder, builder, departure).find_routes(
            start,
            end,
            config.max_routes,
        )?;
        Ok(routes)
    }

    fn build_graph(&self) -> Result<Graph, EngineError> {
        let catalog = self.source.load()?;
        if catalog.is_empty() {
            return Err(CatalogError::Empty.into());
        }
        Ok(self.builder.build(&catalog))
    }
}

use std::sync::Arc;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    customer::Customer,
    define_id_newtype,
    delivery_backend::DeliveryBackend,
    entity_cache::{CacheLoadReport, EntityCache},
    fleet_params::FleetParams,
    lat_lng::LatLng,
    map_view::{MapView, RenderedMap},
    optimization_request::OptimizationRequest,
    optimization_result::OptimizationResult,
    optimizer_api::OptimizerApiError,
    request_builder::build_optimization_request,
    result_projector::{RouteStop, project_route},
    selection_model::SelectionModel,
    storage::Storage,
};

define_id_newtype!(SubmissionId);

/// Completion of a spawned unit of work, waiting to be applied.
#[derive(Debug)]
pub enum SessionEvent {
    CustomersLoaded(Result<Vec<Customer>, OptimizerApiError>),
    StoragesLoaded(Result<Vec<Storage>, OptimizerApiError>),
    OptimizationFinished {
        submission: SubmissionId,
        result: Result<OptimizationResult, OptimizerApiError>,
    },
}

/// What [`Session::apply`] did with an event.
#[derive(Debug)]
pub enum Applied {
    /// Number of cached customers, or why the list was kept
    Customers(Result<usize, OptimizerApiError>),
    Storages(Result<usize, OptimizerApiError>),
    Optimization {
        submission: SubmissionId,
        /// Number of stops on the displayed route, or why the previous result was kept
        outcome: Result<usize, OptimizerApiError>,
    },
}

/// A spawned load or submission. Dropping it does not cancel the work.
pub struct PendingTask {
    handle: JoinHandle<()>,
}

impl PendingTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Returns false if the task was cancelled before it finished.
    pub async fn wait(self) -> bool {
        self.handle.await.is_ok()
    }
}

/// Owns all client state for one operator session.
///
/// Loads and submissions run as spawned tasks that never touch this state;
/// they report back through [`SessionEvent`]s which are folded in one at a
/// time by [`Session::apply`].
pub struct Session<B> {
    backend: Arc<B>,
    cache: EntityCache,
    selection: SelectionModel,
    fleet: FleetParams,
    result: Option<OptimizationResult>,
    map_view: MapView,
    next_submission: u64,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
}

impl<B: DeliveryBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        let (events_tx, events_rx) = unbounded_channel();

        Self {
            backend: Arc::new(backend),
            cache: EntityCache::default(),
            selection: SelectionModel::default(),
            fleet: FleetParams::default(),
            result: None,
            map_view: MapView::default(),
            next_submission: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn fleet(&self) -> &FleetParams {
        &self.fleet
    }

    pub fn set_fleet(&mut self, fleet: FleetParams) {
        self.fleet = fleet;
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Loads both lists and waits for them, then picks the default depot.
    pub async fn load(&mut self) -> CacheLoadReport {
        let report = self.cache.load(self.backend.as_ref()).await;

        if report.storages.is_ok() {
            self.selection.adopt_default_storage(&self.cache);
        }

        report
    }

    /// Starts the customer and storage fetches; their results arrive as events.
    pub fn spawn_load(&self) -> [PendingTask; 2] {
        let backend = Arc::clone(&self.backend);
        let events_tx = self.events_tx.clone();
        let customers = tokio::spawn(async move {
            let result = backend.fetch_customers().await;
            let _ = events_tx.send(SessionEvent::CustomersLoaded(result));
        });

        let backend = Arc::clone(&self.backend);
        let events_tx = self.events_tx.clone();
        let storages = tokio::spawn(async move {
            let result = backend.fetch_storages().await;
            let _ = events_tx.send(SessionEvent::StoragesLoaded(result));
        });

        [
            PendingTask { handle: customers },
            PendingTask { handle: storages },
        ]
    }

    pub fn build_request(&self) -> OptimizationRequest {
        build_optimization_request(&self.selection, &self.cache, &self.fleet)
    }

    /// Builds a request from the current selection and sends it once.
    /// Earlier submissions still in flight are neither cancelled nor ordered:
    /// whichever finishes last is what gets displayed.
    pub fn spawn_submit(&mut self) -> (SubmissionId, PendingTask) {
        self.next_submission += 1;
        let submission = SubmissionId::new(self.next_submission);
        let request = self.build_request();

        if request.depot().is_none() {
            warn!(
                "Submission {}: no depot resolved, sending without one",
                submission
            );
        }

        info!(
            "Submission {}: {} locations, {} vehicles",
            submission,
            request.locations().len(),
            request.num_vehicles()
        );

        let backend = Arc::clone(&self.backend);
        let events_tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let result = backend.optimize(&request).await;
            let _ = events_tx.send(SessionEvent::OptimizationFinished { submission, result });
        });

        (submission, PendingTask { handle })
    }

    /// Next completed unit of work, in arrival order.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// The only place where asynchronous results change session state.
    pub fn apply(&mut self, event: SessionEvent) -> Applied {
        match event {
            SessionEvent::CustomersLoaded(result) => {
                Applied::Customers(self.cache.apply_customers(result))
            }
            SessionEvent::StoragesLoaded(result) => {
                let applied = self.cache.apply_storages(result);
                if applied.is_ok() {
                    self.selection.adopt_default_storage(&self.cache);
                }
                Applied::Storages(applied)
            }
            SessionEvent::OptimizationFinished { submission, result } => {
                let outcome = match result {
                    Ok(result) => {
                        self.result = Some(result);
                        let stops = self.route_stops().len();
                        debug!("Submission {}: route with {} stops", submission, stops);
                        Ok(stops)
                    }
                    Err(err) => {
                        error!("Error optimizing routes (submission {}): {}", submission, err);
                        Err(err)
                    }
                };

                Applied::Optimization {
                    submission,
                    outcome,
                }
            }
        }
    }

    pub fn route_stops(&self) -> Vec<RouteStop> {
        project_route(self.result.as_ref())
    }

    /// Active depot location, or the origin when there is none.
    pub fn fallback_center(&self) -> LatLng {
        self.selection
            .active_storage_in(&self.cache)
            .map(Storage::location)
            .unwrap_or(LatLng::new(0.0, 0.0))
    }

    pub fn render_map(&self) -> RenderedMap {
        self.map_view
            .render(&self.route_stops(), self.fallback_center())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        customer::CustomerId,
        storage::StorageId,
        test_utils::{FakeBackend, customer, storage},
    };

    fn backend() -> FakeBackend {
        FakeBackend::new(
            vec![
                customer(1, "A", "a street", 1.0, 1.5),
                customer(2, "B", "b street", 2.0, 2.5),
            ],
            vec![
                storage(10, "North", "Dock 4", 9.0, 9.5),
                storage(11, "South", "Dock 9", 8.0, 8.5),
            ],
        )
        .with_optimize_response(json!({
            "routes": [ { "route": [[9.0, 9.5], [1.0, 1.5], [2.0, 2.5], [9.0, 9.5]] } ]
        }))
    }

    fn finished(submission: u64, value: serde_json::Value) -> SessionEvent {
        SessionEvent::OptimizationFinished {
            submission: SubmissionId::new(submission),
            result: Ok(OptimizationResult::from_value(value)),
        }
    }

    fn failed(submission: u64) -> SessionEvent {
        SessionEvent::OptimizationFinished {
            submission: SubmissionId::new(submission),
            result: Err(OptimizerApiError::Api {
                status: 500,
                message: String::from("No solution found!"),
            }),
        }
    }

    #[tokio::test]
    async fn test_load_adopts_first_storage() {
        let mut session = Session::new(backend());
        let report = session.load().await;

        assert_eq!(report.customers.unwrap(), 2);
        assert_eq!(
            session.selection().active_storage(),
            Some(StorageId::new(10))
        );
        assert_eq!(session.fallback_center(), LatLng::new(9.0, 9.5));
    }

    #[tokio::test]
    async fn test_load_keeps_chosen_storage() {
        let mut session = Session::new(backend());
        session
            .selection_mut()
            .set_active_storage(StorageId::new(11));

        session.load().await;

        assert_eq!(
            session.selection().active_storage(),
            Some(StorageId::new(11))
        );
    }

    #[tokio::test]
    async fn test_reload_replaces_depot_missing_from_storages() {
        let mut session = Session::new(backend());
        session
            .selection_mut()
            .set_active_storage(StorageId::new(404));

        session.load().await;

        assert_eq!(
            session.selection().active_storage(),
            Some(StorageId::new(10))
        );
        assert_eq!(session.build_request().depot(), Some(LatLng::new(9.0, 9.5)));
    }

    #[tokio::test]
    async fn test_failed_storage_load_leaves_depot_unset() {
        let mut session = Session::new(backend().with_storages_failure(503));
        let report = session.load().await;

        assert!(report.storages.is_err());
        assert_eq!(report.customers.unwrap(), 2);
        assert_eq!(session.selection().active_storage(), None);
        assert_eq!(session.fallback_center(), LatLng::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn test_spawned_load_applies_through_events() {
        let mut session = Session::new(backend());
        let tasks = session.spawn_load();

        for _ in 0..tasks.len() {
            let event = session.next_event().await.unwrap();
            match session.apply(event) {
                Applied::Customers(count) => assert_eq!(count.unwrap(), 2),
                Applied::Storages(count) => assert_eq!(count.unwrap(), 2),
                other => panic!("unexpected {:?}", other),
            }
        }

        for task in tasks {
            assert!(task.wait().await);
        }
        assert_eq!(session.cache().customers().len(), 2);
        assert_eq!(
            session.selection().active_storage(),
            Some(StorageId::new(10))
        );
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let mut session = Session::new(backend());
        session.load().await;
        session.selection_mut().toggle_customer(CustomerId::new(2));
        session.selection_mut().toggle_customer(CustomerId::new(1));
        session.set_fleet(FleetParams {
            num_vehicles: 1,
            total_weight: 80.0,
            daily_customers: 2,
        });

        let (submission, task) = session.spawn_submit();
        assert_eq!(submission, SubmissionId::new(1));
        assert!(task.wait().await);

        let event = session.next_event().await.unwrap();
        match session.apply(event) {
            Applied::Optimization {
                submission: applied,
                outcome,
            } => {
                assert_eq!(applied, submission);
                assert_eq!(outcome.unwrap(), 4);
            }
            other => panic!("unexpected {:?}", other),
        }

        let sent = session.backend.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].locations(),
            &[LatLng::new(1.0, 1.5), LatLng::new(2.0, 2.5)]
        );
        assert_eq!(sent[0].depot(), Some(LatLng::new(9.0, 9.5)));

        let map = session.render_map();
        assert_eq!(map.markers().len(), 4);
        assert!(map.path().is_some());
    }

    #[tokio::test]
    async fn test_submission_ids_increase() {
        let mut session = Session::new(backend());
        let (first, _) = session.spawn_submit();
        let (second, _) = session.spawn_submit();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_last_applied_result_wins() {
        let mut session = Session::new(backend());

        session.apply(finished(2, json!({ "routes": [ { "route": [[2, 2]] } ] })));
        session.apply(finished(1, json!({ "routes": [ { "route": [[1, 1], [1, 2]] } ] })));

        let stops = session.route_stops();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].location(), LatLng::new(1.0, 1.0));
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_previous_result() {
        let mut session = Session::new(backend());
        session.apply(finished(1, json!({ "routes": [ { "route": [[3, 4]] } ] })));

        let applied = session.apply(failed(2));

        assert!(matches!(
            applied,
            Applied::Optimization {
                outcome: Err(OptimizerApiError::Api { status: 500, .. }),
                ..
            }
        ));
        assert_eq!(
            session.route_stops(),
            vec![RouteStop::new(1, LatLng::new(3.0, 4.0))]
        );
    }

    #[tokio::test]
    async fn test_failure_before_any_result_renders_empty_map() {
        let mut session = Session::new(backend());
        session.apply(failed(1));

        assert!(session.result().is_none());
        let map = session.render_map();
        assert!(map.markers().is_empty());
        assert!(map.path().is_none());
    }

    #[tokio::test]
    async fn test_malformed_result_renders_empty_map() {
        let mut session = Session::new(backend());
        let applied = session.apply(finished(1, json!({ "routes": [ { "route": "n/a" } ] })));

        assert!(matches!(
            applied,
            Applied::Optimization { outcome: Ok(0), .. }
        ));
        assert!(session.result().is_some());
        assert!(session.render_map().markers().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_submission_never_reports() {
        let mut session = Session::new(backend().with_optimize_delay(60_000));
        let (_, task) = session.spawn_submit();
        task.cancel();

        assert!(!task.wait().await);
        assert!(session.events_rx.try_recv().is_err());
        assert!(session.result().is_none());
    }
}

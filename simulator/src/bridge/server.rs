use crate::bridge::model::BridgeModel;
use crate::workflow::runner::{Runner, WorkflowResult};
use log::{error, info, warn};
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, reply::Response, Filter, Reply};

type SharedModel = Arc<RwLock<BridgeModel>>;

fn read(state: &SharedModel) -> RwLockReadGuard<'_, BridgeModel> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(state: &SharedModel) -> RwLockWriteGuard<'_, BridgeModel> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn status(code: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), code).into_response()
}

async fn list_races(state: SharedModel) -> Result<Response, Infallible> {
    let listing = read(&state).listing();
    Ok(warp::reply::json(&listing).into_response())
}

/// Serves a cached analysis, or runs the race on first request.
async fn race_detail(id: String, state: SharedModel, runner: Arc<Runner>) -> Result<Response, Infallible> {
    if let Some(result) = read(&state).results.get(&id) {
        return Ok(warp::reply::json(result).into_response());
    }

    let entry = read(&state).index.find(&id).cloned();
    let Some(entry) = entry else {
        return Ok(status(StatusCode::NOT_FOUND, &format!("unknown race {}", id)));
    };

    match runner.execute_entry(&entry) {
        Ok(result) => {
            let reply = warp::reply::json(&result).into_response();
            write(&state).results.insert(id, result);
            Ok(reply)
        }
        Err(err) => {
            warn!("race {} failed: {:#}", id, err);
            Ok(status(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", err)))
        }
    }
}

pub fn routes(
    state: SharedModel,
    runner: Arc<Runner>,
) -> impl Filter<Extract = (Response,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let list_route = warp::path("races")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(list_races);

    let detail_route = warp::path!("races" / String)
        .and(warp::get())
        .and(state_filter)
        .and(runner_filter)
        .and_then(race_detail);

    list_route.or(detail_route).unify()
}

/// Read-only JSON view over analyzed races.
pub struct RaceBridge {
    state: SharedModel,
}

impl RaceBridge {
    pub fn new(model: BridgeModel) -> Self {
        Self {
            state: Arc::new(RwLock::new(model)),
        }
    }

    /// Serves the routes from a background thread with its own runtime.
    pub fn spawn(&self, runner: Arc<Runner>, addr: SocketAddr) {
        let routes = routes(self.state.clone(), runner);
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("bridge runtime failed to start: {}", err);
                    return;
                }
            };
            info!("bridge listening on http://{}", addr);
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, result: WorkflowResult) {
        info!("bridge publishing {}", result.summary());
        write(&self.state).results.insert(result.race.clone(), result);
    }

    #[cfg(test)]
    pub fn published(&self) -> Vec<String> {
        read(&self.state).results.keys().cloned().collect()
    }
}

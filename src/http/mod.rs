//! HTTP surface for an agent.
//!
//! [`router`] maps every route onto an [`AgentService`] operation and wraps
//! each response in [`ApiEnvelope`]. [`AxumHttpSurface`] serves that router
//! and implements the [`crate::agent::ports::HttpSurface`] port.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/health` | liveness |
//! | GET | `/status` | [`AgentService::status`] |
//! | GET | `/capabilities` | [`AgentService::capabilities`] |
//! | POST | `/receive` | [`AgentService::process_message`] |
//! | POST | `/send` | compose, then [`AgentService::process_message`] |
//! | GET | `/improvers` | active and registered improvers |
//! | PUT | `/improvers/active` | select the active improver |
//! | DELETE | `/improvers/{name}` | remove an improver |
//! | POST | `/improvers/{name}/improve` | improve text with a named improver |
//! | GET, POST | `/conversations` | list, create |
//! | GET, DELETE | `/conversations/{id}` | fetch, delete |

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use mockable::Clock;
use tower_http::trace::TraceLayer;

use crate::agent::services::AgentService;
use crate::conversation::ports::ConversationRepository;

mod envelope;
mod handlers;
mod server;

pub use envelope::{ApiEnvelope, ApiError, ApiJson, ApiResult, success};
pub use handlers::{
    CreateConversationRequest, Deleted, HealthReport, ImproveRequest, ImproverListing,
    ReceiveRequest, SendRequest, SendResponse, SetActiveRequest,
};
pub use server::AxumHttpSurface;

/// Builds the agent's route table.
#[must_use]
pub fn router<R, C>(service: Arc<AgentService<R, C>>) -> Router
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health::<R, C>))
        .route("/status", get(handlers::status::<R, C>))
        .route("/capabilities", get(handlers::capabilities::<R, C>))
        .route("/receive", post(handlers::receive::<R, C>))
        .route("/send", post(handlers::send::<R, C>))
        .route("/improvers", get(handlers::list_improvers::<R, C>))
        .route("/improvers/active", put(handlers::set_active_improver::<R, C>))
        .route("/improvers/{name}", delete(handlers::remove_improver::<R, C>))
        .route("/improvers/{name}/improve", post(handlers::improve::<R, C>))
        .route(
            "/conversations",
            get(handlers::list_conversations::<R, C>).post(handlers::create_conversation::<R, C>),
        )
        .route(
            "/conversations/{id}",
            get(handlers::get_conversation::<R, C>).delete(handlers::delete_conversation::<R, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

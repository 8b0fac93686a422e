//! Route handlers over [`AgentService`] operations.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::envelope::{ApiError, ApiJson, ApiResult, success};
use crate::agent::{
    domain::{AgentCapabilities, AgentStatus, ProcessOptions},
    services::AgentService,
};
use crate::conversation::{
    domain::{Conversation, ConversationId, Message, Metadata, Role},
    ports::ConversationRepository,
};
use crate::improvement::domain::MessageImprovementResult;

type Service<R, C> = State<Arc<AgentService<R, C>>>;

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Always `"healthy"`.
    pub status: String,
    /// Agent identifier.
    pub agent_id: String,
    /// Agent version.
    pub version: String,
}

/// Body of `POST /receive`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveRequest {
    /// The inbound message.
    pub message: Message,
    /// Processing options.
    #[serde(default)]
    pub options: ProcessOptions,
}

/// Body of `POST /send`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// Message text.
    pub content: String,
    /// Conversation to append to; a new one is started when absent.
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    /// Author role; defaults to `user`.
    #[serde(default)]
    pub role: Option<Role>,
    /// Processing options.
    #[serde(default)]
    pub options: ProcessOptions,
}

/// Response of `POST /send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    /// The message that was stored.
    pub message: Message,
    /// Improvement outcome.
    pub result: MessageImprovementResult,
}

/// Registered improvers and the active selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImproverListing {
    /// Active improver name.
    pub active: String,
    /// Every registered name, sorted.
    pub available: Vec<String>,
}

/// Body of `PUT /improvers/active`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveRequest {
    /// Improver to activate.
    pub name: String,
}

/// Body of `POST /improvers/{name}/improve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImproveRequest {
    /// Text to improve.
    pub text: String,
    /// Context handed to the improver.
    #[serde(default)]
    pub context: Option<Metadata>,
}

/// Body of `POST /conversations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConversationRequest {
    /// Conversation metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Identifier of a deleted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Identifier that was removed.
    pub deleted: String,
}

pub(super) async fn health<R, C>(State(service): Service<R, C>) -> ApiJson<HealthReport>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    success(HealthReport {
        status: "healthy".to_owned(),
        agent_id: service.config().agent_id.clone(),
        version: service.config().version.clone(),
    })
}

pub(super) async fn status<R, C>(State(service): Service<R, C>) -> ApiJson<AgentStatus>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    success(service.status())
}

pub(super) async fn capabilities<R, C>(
    State(service): Service<R, C>,
) -> ApiJson<AgentCapabilities>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    success(service.capabilities())
}

pub(super) async fn receive<R, C>(
    State(service): Service<R, C>,
    payload: Result<Json<ReceiveRequest>, JsonRejection>,
) -> ApiResult<MessageImprovementResult>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let result = service
        .process_message(request.message, &request.options)
        .await?;
    Ok(success(result))
}

pub(super) async fn send<R, C>(
    State(service): Service<R, C>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResult<SendResponse>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let message = service.compose_message(
        request.conversation_id,
        request.role.unwrap_or(Role::User),
        request.content,
    );
    let result = service
        .process_message(message.clone(), &request.options)
        .await?;
    Ok(success(SendResponse { message, result }))
}

pub(super) async fn list_improvers<R, C>(
    State(service): Service<R, C>,
) -> ApiJson<ImproverListing>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let registry = service.improvers();
    success(ImproverListing {
        active: registry.active(),
        available: registry.list(),
    })
}

pub(super) async fn set_active_improver<R, C>(
    State(service): Service<R, C>,
    payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> ApiResult<ImproverListing>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let registry = service.improvers();
    if !registry.set_active(&request.name) {
        return Err(ApiError::not_found("improver", &request.name));
    }
    info!(improver = %request.name, "active improver changed over HTTP");
    Ok(success(ImproverListing {
        active: registry.active(),
        available: registry.list(),
    }))
}

pub(super) async fn remove_improver<R, C>(
    State(service): Service<R, C>,
    Path(name): Path<String>,
) -> ApiResult<ImproverListing>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let registry = service.improvers();
    if !registry.unregister(&name) {
        return Err(ApiError::bad_request(format!(
            "improver '{name}' cannot be removed"
        )));
    }
    Ok(success(ImproverListing {
        active: registry.active(),
        available: registry.list(),
    }))
}

pub(super) async fn improve<R, C>(
    State(service): Service<R, C>,
    Path(name): Path<String>,
    payload: Result<Json<ImproveRequest>, JsonRejection>,
) -> ApiResult<MessageImprovementResult>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = payload?;
    let context = request.context.unwrap_or_default();
    let result = service
        .improvers()
        .improve_with(&name, &request.text, &context)
        .await;
    Ok(success(result))
}

pub(super) async fn list_conversations<R, C>(
    State(service): Service<R, C>,
) -> ApiResult<Vec<Conversation>>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(success(service.conversations().await?))
}

pub(super) async fn create_conversation<R, C>(
    State(service): Service<R, C>,
    payload: Result<Option<Json<CreateConversationRequest>>, JsonRejection>,
) -> ApiResult<Conversation>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let request = payload?.map(|Json(body)| body).unwrap_or_default();
    Ok(success(service.create_conversation(request.metadata).await?))
}

pub(super) async fn get_conversation<R, C>(
    State(service): Service<R, C>,
    Path(id): Path<String>,
) -> ApiResult<Conversation>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    service
        .conversation(&ConversationId::new(id.as_str()))
        .await?
        .map(success)
        .ok_or_else(|| ApiError::not_found("conversation", &id))
}

pub(super) async fn delete_conversation<R, C>(
    State(service): Service<R, C>,
    Path(id): Path<String>,
) -> ApiResult<Deleted>
where
    R: ConversationRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    if service
        .delete_conversation(&ConversationId::new(id.as_str()))
        .await?
    {
        Ok(success(Deleted { deleted: id }))
    } else {
        Err(ApiError::not_found("conversation", &id))
    }
}

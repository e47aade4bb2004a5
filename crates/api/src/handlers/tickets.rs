//! Handlers for the `/tickets` helpdesk resource.
//!
//! Visibility follows [`TicketScope`]: `LIDER_TI` sees all tickets, `TI` and
//! `DIRECTOR` their org unit, everyone else the tickets they opened.
//!
//! [`TicketScope`]: gemelli_core::scope::TicketScope

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemelli_core::audit::action_types;
use gemelli_core::error::CoreError;
use gemelli_core::ticket::{TicketPriority, TicketStatus};
use gemelli_core::types::DbId;
use gemelli_db::models::ticket::{
    CreateTicket, Ticket, TicketDetail, TicketFilter, UpdateTicket,
};
use gemelli_db::models::ticket_comment::{
    CreateTicketComment, TicketComment, TicketCommentEntry,
};
use gemelli_db::repositories::{TicketCommentRepo, TicketRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit_log::record_audit_event_in;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireItStaff;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TicketListParams {
    pub estado: Option<TicketStatus>,
}

/// Request body for `POST /tickets`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: TicketPriority,
    pub device_id: Option<DbId>,
}

/// Request body for `PUT /tickets/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTicketRequest {
    pub estado: Option<TicketStatus>,
    pub prioridad: Option<TicketPriority>,
    pub asignado_a: Option<DbId>,
}

/// Request body for `POST /tickets/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub comentario: String,
    pub adjunto_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketWithComments {
    pub ticket: TicketDetail,
    pub comments: Vec<TicketCommentEntry>,
}

fn ticket_not_found() -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Ticket" })
}

/// Load a ticket the caller may read.
async fn visible_ticket(
    state: &AppState,
    user: &CurrentUser,
    id: DbId,
) -> AppResult<TicketDetail> {
    let detail = TicketRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(ticket_not_found)?;

    if !user.role.reads_all_tickets() && detail.ticket.solicitante_id != user.id {
        return Err(AppError::Core(CoreError::Forbidden("Acceso denegado".into())));
    }
    Ok(detail)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /tickets?estado
pub async fn list_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<DataResponse<Vec<TicketDetail>>>> {
    let filter = TicketFilter {
        scope: user.ticket_scope(),
        estado: params.estado,
    };
    let tickets = TicketRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<Ticket>>)> {
    if input.titulo.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "El título es requerido".into(),
        )));
    }

    let ticket = TicketRepo::create(
        &state.pool,
        &CreateTicket {
            titulo: input.titulo,
            descripcion: input.descripcion,
            prioridad: input.prioridad,
            device_id: input.device_id,
            solicitante_id: user.id,
            org_unit_id: user.org_unit_id(),
        },
    )
    .await?;

    tracing::info!(ticket_id = %ticket.id, user_id = %user.id, "Ticket opened");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: ticket,
            message: "Ticket creado exitosamente",
        }),
    ))
}

/// GET /tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TicketWithComments>> {
    let ticket = visible_ticket(&state, &user, id).await?;
    let comments = TicketCommentRepo::list_for_ticket(&state.pool, id).await?;
    Ok(Json(TicketWithComments { ticket, comments }))
}

/// PUT /tickets/{id}
///
/// Moving a ticket to `RESUELTO` or `CERRADO` seals a `CLOSE_TICKET` block.
pub async fn update_ticket(
    State(state): State<AppState>,
    RequireItStaff(user): RequireItStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketRequest>,
) -> AppResult<Json<MessageResponse<Ticket>>> {
    let update = UpdateTicket {
        estado: input.estado,
        prioridad: input.prioridad,
        asignado_a: input.asignado_a,
    };
    let mut tx = state.pool.begin().await?;
    let ticket = TicketRepo::update(&mut *tx, id, &update)
        .await?
        .ok_or_else(ticket_not_found)?;

    if let Some(estado) = input.estado.filter(|e| e.is_closing()) {
        record_audit_event_in(
            &mut tx,
            &state,
            action_types::CLOSE_TICKET,
            id,
            user.id,
            json!({ "final_status": estado }),
        )
        .await?;
    }
    tx.commit().await?;

    tracing::info!(ticket_id = %id, user_id = %user.id, "Ticket updated");
    Ok(Json(MessageResponse {
        data: ticket,
        message: "Ticket actualizado",
    }))
}

/// POST /tickets/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<TicketComment>>)> {
    if input.comentario.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "El comentario no puede estar vacío".into(),
        )));
    }
    visible_ticket(&state, &user, id).await?;

    let comment = TicketCommentRepo::create(
        &state.pool,
        &CreateTicketComment {
            ticket_id: id,
            usuario_id: user.id,
            comentario: input.comentario,
            adjunto_url: input.adjunto_url,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: comment,
            message: "Comentario agregado",
        }),
    ))
}

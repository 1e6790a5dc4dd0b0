//! §4.7 / §6 thin REST facade: room lifecycle management plus the two
//! websocket upgrade endpoints. Everything here is glue — the engine lives
//! entirely in `domain::room`; these handlers only decode input, call the
//! registry/Room, and translate `RoomError` into an `AppError` at the edge.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::table_config::TableConfig;
use crate::errors::AppError;
use crate::hub::Hub;
use crate::protocol::RoomSummary;
use crate::ws::{lobby_session, session};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .route("", web::get().to(list_rooms))
            .route("", web::post().to(create_room))
            .route("/{roomId}/join", web::post().to(join_room))
            .route("/{roomId}/start", web::post().to(start_room))
            .route("/{roomId}/state", web::get().to(room_state)),
    )
    .route("/room/{roomId}", web::get().to(session::upgrade))
    .route("/lobby", web::get().to(lobby_session::upgrade));
}

#[derive(Deserialize)]
struct CreateRoomRequest {
    room_name: String,
    variant_key: Option<String>,
    config: Option<TableConfig>,
    creator_id: String,
    creator_display_name: String,
    creator_avatar: Option<String>,
}

#[derive(Serialize)]
struct CreateRoomResponse {
    room_id: String,
}

async fn create_room(hub: web::Data<Arc<Hub>>, body: web::Json<CreateRoomRequest>) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let config = body.config.unwrap_or_default().validated()?;
    let room_id = Uuid::new_v4().to_string();

    let room = hub.registry.create_room(room_id.clone(), body.room_name, config);
    {
        let mut room = room.lock();
        room.variant_key = body.variant_key;
        room.add_player(body.creator_id, body.creator_display_name, body.creator_avatar)?;
    }
    hub.broadcast_lobby();

    Ok(HttpResponse::Ok().json(CreateRoomResponse { room_id }))
}

#[derive(Deserialize)]
struct JoinRoomRequest {
    player_id: String,
    display_name: String,
    avatar: Option<String>,
}

async fn join_room(
    hub: web::Data<Arc<Hub>>,
    path: web::Path<String>,
    body: web::Json<JoinRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let room = hub.registry.get(&room_id).ok_or_else(|| AppError::room_not_found(room_id.clone()))?;
    let body = body.into_inner();
    room.lock().add_player(body.player_id, body.display_name, body.avatar)?;
    hub.broadcast_room(&room_id);
    hub.broadcast_lobby();
    Ok(HttpResponse::Ok().finish())
}

async fn start_room(hub: web::Data<Arc<Hub>>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let room = hub.registry.get(&room_id).ok_or_else(|| AppError::room_not_found(room_id.clone()))?;
    room.lock().start(crate::time::now_ms())?;
    hub.broadcast_room(&room_id);
    hub.broadcast_lobby();
    Ok(HttpResponse::Ok().finish())
}

#[derive(Deserialize)]
struct StateQuery {
    #[serde(rename = "viewerId")]
    viewer_id: Option<String>,
}

async fn room_state(
    hub: web::Data<Arc<Hub>>,
    path: web::Path<String>,
    query: web::Query<StateQuery>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let room = hub.registry.get(&room_id).ok_or_else(|| AppError::room_not_found(room_id.clone()))?;
    let viewer_id = query.into_inner().viewer_id.unwrap_or_default();
    let snapshot = room.lock().to_state(&viewer_id, crate::time::now_ms());
    Ok(HttpResponse::Ok().json(snapshot))
}

async fn list_rooms(hub: web::Data<Arc<Hub>>) -> HttpResponse {
    let summaries: Vec<RoomSummary> = hub
        .registry
        .list_ids()
        .into_iter()
        .filter_map(|id| hub.registry.get(&id))
        .map(|room| {
            let room = room.lock();
            RoomSummary {
                room_id: room.room_id.clone(),
                name: room.name.clone(),
                variant_key: room.variant_key.clone(),
                player_count: room.player_count(),
                players_max: room.config.max_players,
                started: room.started,
                config: room.config,
            }
        })
        .collect();
    HttpResponse::Ok().json(summaries)
}

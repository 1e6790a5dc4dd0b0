//! The `/room/{roomId}?playerId=…` duplex endpoint (§6), grounded on the
//! reference backend's `WsSession` actor: heartbeat ping/pong, a `Shutdown`
//! message for graceful eviction, and `started`/`stopped` lifecycle hooks
//! that (un)register with the fan-out layer — here the Session Hub instead
//! of a raw connection registry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{info, info_span, warn};

use crate::hub::{Hub, PushRoomMsg};
use crate::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

#[derive(Deserialize)]
pub struct RoomQuery {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<String>,
    query: web::Query<RoomQuery>,
    hub: web::Data<Arc<Hub>>,
) -> Result<HttpResponse, Error> {
    let room_id = path.into_inner();
    let player_id = query.into_inner().player_id;
    let session = RoomSession::new(room_id, player_id, hub.get_ref().clone());
    ws::start(session, &req, stream)
}

pub struct RoomSession {
    room_id: String,
    player_id: String,
    hub: Arc<Hub>,
    last_heartbeat: Instant,
    heartbeat_handle: Option<actix::SpawnHandle>,
}

impl RoomSession {
    fn new(room_id: String, player_id: String, hub: Arc<Hub>) -> Self {
        RoomSession {
            room_id,
            player_id,
            hub,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[ROOM SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(room_id = %actor.room_id, player_id = %actor.player_id, "[ROOM SESSION] heartbeat timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }
}

impl Actor for RoomSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let _span = info_span!("room_session", room_id = %self.room_id, player_id = %self.player_id).entered();

        if self.hub.registry.get(&self.room_id).is_none() {
            warn!("attach to unknown room");
            ctx.close(Some(ws::CloseReason {
                code: ws::CloseCode::Other(1008),
                description: Some("room_not_found".into()),
            }));
            ctx.stop();
            return;
        }

        self.hub.attach_room(&self.room_id, &self.player_id, ctx.address().recipient::<PushRoomMsg>());
        self.start_heartbeat(ctx);
        info!("session started");
        self.hub.broadcast_room(&self.room_id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.hub.detach_room(&self.room_id, &self.player_id);
        info!(room_id = %self.room_id, player_id = %self.player_id, "session stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for RoomSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let cmd = match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => cmd,
                    Err(err) => {
                        // An unrecognized `type` also lands here, since serde
                        // can't distinguish "unknown variant" from "malformed
                        // known variant" once tagging fails. Spec allows
                        // closing either case at the dispatcher's discretion.
                        warn!(room_id = %self.room_id, error = %err, "malformed or unrecognized frame");
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Unsupported)));
                        ctx.stop();
                        return;
                    }
                };

                let Some(room) = self.hub.registry.get(&self.room_id) else {
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                    ctx.stop();
                    return;
                };

                let now_ms = crate::time::now_ms();
                if let Some(err_frame) = crate::hub::dispatch_intent(&self.hub, &self.room_id, &room, cmd, now_ms) {
                    Self::send_json(ctx, &err_frame);
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(error = %err, "[ROOM SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<PushRoomMsg> for RoomSession {
    type Result = ();

    fn handle(&mut self, msg: PushRoomMsg, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

impl Handler<Shutdown> for RoomSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
        ctx.stop();
    }
}

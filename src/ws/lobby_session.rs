//! The `/lobby` duplex endpoint (§6): outbound-only `{type:"rooms"}`
//! broadcasts, inbound frames are ignored and serve only as a keep-alive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::hub::{Hub, PushLobbyMsg};
use crate::protocol::LobbyRooms;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(req: HttpRequest, stream: web::Payload, hub: web::Data<Arc<Hub>>) -> Result<HttpResponse, Error> {
    let session = LobbySession::new(hub.get_ref().clone());
    ws::start(session, &req, stream)
}

pub struct LobbySession {
    conn_id: Uuid,
    hub: Arc<Hub>,
    last_heartbeat: Instant,
}

impl LobbySession {
    fn new(hub: Arc<Hub>) -> Self {
        LobbySession { conn_id: Uuid::new_v4(), hub, last_heartbeat: Instant::now() }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &LobbyRooms) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[LOBBY SESSION] failed to serialize outbound message"),
        }
    }
}

impl Actor for LobbySession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hub.attach_lobby(self.conn_id, ctx.address().recipient::<PushLobbyMsg>());
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        info!(conn_id = %self.conn_id, "lobby session started");
        self.hub.broadcast_lobby();
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.hub.detach_lobby(&self.conn_id);
        info!(conn_id = %self.conn_id, "lobby session stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for LobbySession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => self.last_heartbeat = Instant::now(),
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                // Inbound frames are keep-alive only; content is ignored.
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
                warn!(error = %err, "[LOBBY SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<PushLobbyMsg> for LobbySession {
    type Result = ();

    fn handle(&mut self, msg: PushLobbyMsg, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

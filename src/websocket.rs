/// WebSocket session driving one dashboard view
use actix::prelude::*;
use actix_web::web;
use actix_web_actors::ws;
use log::{debug, warn};
use std::time::{Duration, Instant};

use crate::dashboard::Dashboard;
use crate::messages::{ClientMessage, ServerMessage};
use crate::server::{AppState, LOAD_FAILURE_MESSAGE};
use crate::state::DashboardState;

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Advance `state` by one client message and build the reply.
pub fn respond(
    dashboard: &Dashboard,
    state: &DashboardState,
    msg: ClientMessage,
) -> (DashboardState, ServerMessage) {
    let next = match msg.into_event() {
        Some(event) => {
            let rows = dashboard.filtered_len(&state.selection);
            state.apply(&event, rows)
        }
        None => state.clone(),
    };
    let snapshot = dashboard.snapshot(&next);
    (next, ServerMessage::Snapshot(Box::new(snapshot)))
}

/// WebSocket connection actor; owns its dashboard state exclusively
pub struct DashboardSession {
    hb: Instant,
    app: web::Data<AppState>,
    state: DashboardState,
}

impl DashboardSession {
    pub fn new(app: web::Data<AppState>) -> Self {
        Self {
            hb: Instant::now(),
            app,
            state: DashboardState::new(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                warn!("WebSocket client heartbeat failed, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn handle_client_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        debug!("WebSocket message: {:?}", msg);

        let dashboard = match self.app.dashboard() {
            Ok(dashboard) => dashboard,
            Err(_) => {
                ctx.text(ServerMessage::error(LOAD_FAILURE_MESSAGE).to_json());
                return;
            }
        };

        let (next, reply) = respond(&dashboard, &self.state, msg);
        self.state = next;
        ctx.text(reply.to_json());
    }
}

impl Actor for DashboardSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.hb(ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for DashboardSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => self.handle_client_message(client_msg, ctx),
                Err(e) => {
                    ctx.text(ServerMessage::error(format!("Invalid message format: {}", e)).to_json());
                }
            },
            Ok(ws::Message::Binary(_)) => {
                warn!("Unexpected binary message");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => ctx.stop(),
        }
    }
}

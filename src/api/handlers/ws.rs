// src/api/handlers/ws.rs
use actix::{Actor, ActorContext, AsyncContext, Handler, Message, StreamHandler};
use actix_web::{web, HttpRequest, HttpResponse, Error};
use actix_web_actors::ws;
use tokio::sync::watch;

use crate::api::AppState;
use crate::models::{EvaluationState, StateSnapshot};

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct StateUpdate(pub StateSnapshot);

/// Pushes a snapshot on connect and another on every state change.
pub struct WsConnection {
    updates: watch::Receiver<EvaluationState>,
}

impl WsConnection {
    pub fn new(updates: watch::Receiver<EvaluationState>) -> Self {
        Self { updates }
    }
}

impl Actor for WsConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let current = StateSnapshot::from(self.updates.borrow_and_update().clone());
        ctx.address().do_send(StateUpdate(current));

        let addr = ctx.address();
        let mut updates = self.updates.clone();
        actix::spawn(async move {
            while updates.changed().await.is_ok() {
                if !addr.connected() {
                    break;
                }
                let snapshot = StateSnapshot::from(updates.borrow_and_update().clone());
                addr.do_send(StateUpdate(snapshot));
            }
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                log::warn!("WebSocket protocol error: {}", e);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<StateUpdate> for WsConnection {
    type Result = ();

    fn handle(&mut self, msg: StateUpdate, ctx: &mut Self::Context) {
        if let Ok(json) = serde_json::to_string(&msg.0) {
            ctx.text(json);
        }
    }
}

/// GET /api/v1/ws
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let conn = WsConnection::new(state.controller.subscribe());
    ws::start(conn, &req, stream)
}

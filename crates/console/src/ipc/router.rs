use serde_json::Value;

use super::error::err;
use super::handlers;
use super::types::Request;
use crate::state::ConsoleState;

pub async fn handle_request(state: &ConsoleState, req: Request) -> Value {
    if let Some(resp) = handlers::table::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::form::try_handle(state, &req).await {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}

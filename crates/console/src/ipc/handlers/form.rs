use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_params, to_value};
use crate::form::SubmitOutcome;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::Request;
use crate::state::ConsoleState;

#[derive(Debug, Deserialize)]
struct SetFieldParams {
    path: String,
    value: String,
}

pub async fn try_handle(state: &ConsoleState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "form.state" => to_value(&state.form.view()),
        "form.setField" => handle_set_field(state, &req.params),
        "form.submit" => handle_submit(state).await,
        "form.teachers" => to_value(&state.form.teachers()),
        _ => return None,
    };
    Some(respond(&req.id, result))
}

fn handle_set_field(state: &ConsoleState, params: &Value) -> Result<Value, HandlerErr> {
    let p: SetFieldParams = parse_params(params)?;
    state.form.set_field(&p.path, p.value)?;
    to_value(&state.form.view())
}

async fn handle_submit(state: &ConsoleState) -> Result<Value, HandlerErr> {
    let outcome = state.form.submit().await;
    let mut result = match outcome {
        SubmitOutcome::Created => json!({ "status": "created" }),
        SubmitOutcome::Invalid(errors) => json!({
            "status": "invalid",
            "errors": to_value(&errors)?,
        }),
        SubmitOutcome::Failed(e) => json!({
            "status": "failed",
            "message": e.to_string(),
        }),
        SubmitOutcome::Rejected => json!({ "status": "rejected" }),
    };
    result["form"] = to_value(&state.form.view())?;
    Ok(result)
}

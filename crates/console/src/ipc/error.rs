use campus_core::error::CoreError;
use serde_json::{json, Value};

pub fn ok(id: &str, result: Value) -> Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Failure of one handler, carrying its wire error code.
#[derive(Debug)]
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<CoreError> for HandlerErr {
    fn from(e: CoreError) -> Self {
        let code = match &e {
            CoreError::NotFound { .. } => "not_found",
            CoreError::Validation(_) => "bad_params",
            CoreError::Conflict(_) => "conflict",
            CoreError::Internal(_) => "internal",
        };
        Self {
            code,
            message: e.to_string(),
            details: None,
        }
    }
}

/// Turn a handler result into a response line.
pub fn respond(id: &str, result: Result<Value, HandlerErr>) -> Value {
    match result {
        Ok(value) => ok(id, value),
        Err(e) => e.response(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_follow_core_errors() {
        let not_found: HandlerErr = CoreError::NotFound { entity: "Record", id: 7 }.into();
        assert_eq!(not_found.code, "not_found");
        let conflict: HandlerErr = CoreError::Conflict("dup".into()).into();
        assert_eq!(conflict.code, "conflict");
        let invalid: HandlerErr = CoreError::Validation("bad".into()).into();
        assert_eq!(invalid.code, "bad_params");
    }

    #[test]
    fn details_are_omitted_unless_given() {
        let resp = err("1", "bad_params", "nope", None);
        assert!(resp["error"].get("details").is_none());
        let resp = HandlerErr::bad_params("nope")
            .with_details(json!({ "field": "x" }))
            .response("1");
        assert_eq!(resp["error"]["details"]["field"], "x");
        assert_eq!(resp["ok"], false);
    }
}

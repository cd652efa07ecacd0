pub mod form;
pub mod table;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::HandlerErr;

/// Deserialize request params into a typed struct.
pub(crate) fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, HandlerErr> {
    serde_json::from_value(params.clone()).map_err(|e| {
        HandlerErr::bad_params(format!("invalid params: {e}")).with_details(json!({ "params": params }))
    })
}

/// Serialize a view or result value for the wire.
pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, HandlerErr> {
    serde_json::to_value(value).map_err(|e| HandlerErr {
        code: "internal",
        message: format!("failed to encode result: {e}"),
        details: None,
    })
}

use campus_core::record::EditableField;
use campus_core::types::RecordId;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_params, to_value};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::Request;
use crate::state::ConsoleState;

#[derive(Debug, Deserialize)]
struct PageParams {
    page: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageSizeParams {
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct RowParams {
    id: RecordId,
}

#[derive(Debug, Deserialize)]
struct EditCellParams {
    id: RecordId,
    field: EditableField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ReviewerParams {
    id: RecordId,
    reviewer: String,
}

pub fn try_handle(state: &ConsoleState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "table.view" => view(state),
        "table.goToPage" => handle_go_to_page(state, &req.params),
        "table.firstPage" => navigate(state, |s| s.first_page()),
        "table.previousPage" => navigate(state, |s| s.previous_page()),
        "table.nextPage" => navigate(state, |s| s.next_page()),
        "table.lastPage" => navigate(state, |s| s.last_page()),
        "table.setPageSize" => handle_set_page_size(state, &req.params),
        "table.selectRow" => handle_row(state, &req.params, |s, id| s.select_row(id)),
        "table.deselectRow" => handle_row(state, &req.params, |s, id| s.deselect_row(id)),
        "table.toggleRow" => handle_row(state, &req.params, |s, id| s.toggle_row(id)),
        "table.toggleAllVisible" => handle_toggle_all(state),
        "table.editCell" => handle_edit_cell(state, &req.params),
        "table.assignReviewer" => handle_assign_reviewer(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}

fn view(state: &ConsoleState) -> Result<Value, HandlerErr> {
    to_value(&state.table.view())
}

fn navigate(
    state: &ConsoleState,
    f: impl FnOnce(&mut campus_core::table::TableStore) -> usize,
) -> Result<Value, HandlerErr> {
    state.table.with_store(f);
    view(state)
}

fn handle_go_to_page(state: &ConsoleState, params: &Value) -> Result<Value, HandlerErr> {
    let p: PageParams = parse_params(params)?;
    navigate(state, |s| s.go_to_page(p.page))
}

fn handle_set_page_size(state: &ConsoleState, params: &Value) -> Result<Value, HandlerErr> {
    let p: PageSizeParams = parse_params(params)?;
    state.table.with_store(|s| s.set_page_size(p.page_size))?;
    view(state)
}

fn handle_row(
    state: &ConsoleState,
    params: &Value,
    f: impl FnOnce(&mut campus_core::table::TableStore, RecordId) -> bool,
) -> Result<Value, HandlerErr> {
    let p: RowParams = parse_params(params)?;
    let changed = state.table.with_store(|s| f(s, p.id));
    Ok(json!({
        "changed": changed,
        "view": view(state)?,
    }))
}

fn handle_toggle_all(state: &ConsoleState) -> Result<Value, HandlerErr> {
    let header = state.table.with_store(|s| s.select_all_visible());
    Ok(json!({
        "headerSelection": to_value(&header)?,
        "view": view(state)?,
    }))
}

/// Applies the edit optimistically; the commit result arrives as a
/// notification.
fn handle_edit_cell(state: &ConsoleState, params: &Value) -> Result<Value, HandlerErr> {
    let p: EditCellParams = parse_params(params)?;
    let dispatched = state
        .table
        .dispatch_cell_edit(p.id, p.field, p.value)
        .is_some();
    Ok(json!({
        "dispatched": dispatched,
        "view": view(state)?,
    }))
}

fn handle_assign_reviewer(state: &ConsoleState, params: &Value) -> Result<Value, HandlerErr> {
    let p: ReviewerParams = parse_params(params)?;
    state
        .table
        .with_store(|s| s.assign_reviewer(p.id, &p.reviewer))?;
    view(state)
}

//! Line protocol driven through `serve` with in-memory input.

mod common;

use std::time::Duration;

use campus_console::ipc;
use serde_json::{json, Value};
use tokio::io::BufReader;
use tokio::sync::mpsc;

use common::{records, state, Gate};

/// Feed `requests` through a fresh console and collect every response line.
async fn run(requests: &[Value]) -> Vec<Value> {
    let (state, _rx) = state(records(23), Gate::open(), Gate::open());
    run_raw(state, requests.iter().map(Value::to_string).collect()).await
}

async fn run_raw(state: campus_console::state::ConsoleState, lines: Vec<String>) -> Vec<Value> {
    let input = lines.join("\n");
    let (tx, mut rx) = mpsc::unbounded_channel();
    ipc::serve(state, BufReader::new(input.as_bytes()), tx)
        .await
        .unwrap();

    let mut out = Vec::new();
    while let Ok(Some(line)) = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
        out.push(serde_json::from_str(&line).unwrap());
    }
    out
}

fn request(id: &str, method: &str, params: Value) -> Value {
    json!({ "id": id, "method": method, "params": params })
}

#[tokio::test]
async fn table_navigation_round_trip() {
    let out = run(&[
        request("1", "table.view", Value::Null),
        request("2", "table.goToPage", json!({ "page": 3 })),
        request("3", "table.setPageSize", json!({ "pageSize": 20 })),
    ])
    .await;

    assert_eq!(out.len(), 3);
    assert_eq!(out[0]["id"], "1");
    assert_eq!(out[0]["ok"], true);
    assert_eq!(out[0]["result"]["pageLabel"], "Page 1 of 3");
    assert_eq!(out[1]["result"]["rows"].as_array().unwrap().len(), 3);
    assert_eq!(out[1]["result"]["rows"][0]["id"], 21);
    assert_eq!(out[2]["result"]["page"], 1);
    assert_eq!(out[2]["result"]["totalPages"], 2);
}

#[tokio::test]
async fn selection_and_header_checkbox() {
    let out = run(&[
        request("1", "table.selectRow", json!({ "id": 2 })),
        request("2", "table.selectRow", json!({ "id": 2 })),
        request("3", "table.toggleAllVisible", Value::Null),
        request("4", "table.toggleAllVisible", Value::Null),
        request("5", "table.toggleRow", json!({ "id": 999 })),
    ])
    .await;

    assert_eq!(out[0]["result"]["changed"], true);
    assert_eq!(out[1]["result"]["changed"], false);
    assert_eq!(out[2]["result"]["headerSelection"], "all");
    assert_eq!(out[2]["result"]["view"]["selectedCount"], 10);
    assert_eq!(out[3]["result"]["view"]["selectedCount"], 1);
    assert_eq!(out[4]["result"]["changed"], false);
}

#[tokio::test]
async fn errors_carry_stable_codes() {
    let (state, _rx) = state(records(5), Gate::open(), Gate::open());
    let out = run_raw(
        state,
        vec![
            "{not json".to_string(),
            request("1", "table.fly", Value::Null).to_string(),
            request("2", "table.goToPage", json!({ "page": "two" })).to_string(),
            request("3", "table.setPageSize", json!({ "pageSize": 7 })).to_string(),
            request(
                "4",
                "table.assignReviewer",
                json!({ "id": 99, "reviewer": "Eddie Lake" }),
            )
            .to_string(),
            request("5", "form.setField", json!({ "path": "role", "value": "admin" })).to_string(),
        ],
    )
    .await;

    let codes: Vec<_> = out.iter().map(|r| r["error"]["code"].clone()).collect();
    assert_eq!(
        codes,
        vec![
            json!("bad_json"),
            json!("not_implemented"),
            json!("bad_params"),
            json!("bad_params"),
            json!("not_found"),
            json!("bad_params"),
        ]
    );
    assert!(out.iter().all(|r| r["ok"] == false));
}

#[tokio::test]
async fn edit_cell_returns_the_optimistic_view() {
    let out = run(&[
        request(
            "1",
            "table.editCell",
            json!({ "id": 1, "field": "target", "value": "30" }),
        ),
        request("2", "table.assignReviewer", json!({ "id": 1, "reviewer": "Jamik Tashpulatov" })),
    ])
    .await;

    assert_eq!(out[0]["result"]["dispatched"], true);
    assert_eq!(out[0]["result"]["view"]["rows"][0]["target"], "30");
    assert_eq!(out[1]["result"]["rows"][0]["reviewer"], "Jamik Tashpulatov");
    assert_eq!(out[1]["result"]["rows"][0]["reviewerAssigned"], true);
}

#[tokio::test]
async fn form_requests() {
    let out = run(&[
        request("1", "form.teachers", Value::Null),
        request("2", "form.setField", json!({ "path": "guardian.phone", "value": "12" })),
        request("3", "form.submit", Value::Null),
    ])
    .await;

    let by_id = |id: &str| out.iter().find(|r| r["id"] == id).unwrap().clone();
    assert_eq!(by_id("1")["result"][0]["name"], "Mr. Smith");
    assert_eq!(by_id("2")["result"]["draft"]["guardian"]["phone"], "12");
    let submit = by_id("3");
    assert_eq!(submit["result"]["status"], "invalid");
    assert_eq!(
        submit["result"]["errors"]["guardian.phone"],
        "Guardian phone is too short"
    );
    assert_eq!(submit["result"]["form"]["submitLabel"], "Save Student");
}

#[tokio::test]
async fn notifications_are_forwarded_as_event_lines() {
    let (state, rx) = state(records(3), Gate::open(), Gate::open());
    let (tx, mut out) = mpsc::unbounded_channel();
    let forwarder = tokio::spawn(ipc::forward_notifications(rx, tx));

    let outcome = state
        .table
        .commit_cell_edit(2, campus_core::record::EditableField::Limit, "6")
        .await;
    assert!(outcome.is_some());

    let mut lines = Vec::new();
    for _ in 0..2 {
        let line = tokio::time::timeout(Duration::from_secs(1), out.recv())
            .await
            .unwrap()
            .unwrap();
        lines.push(serde_json::from_str::<Value>(&line).unwrap());
    }
    assert_eq!(lines[0]["event"], "notification");
    assert_eq!(lines[0]["kind"], "pending");
    assert_eq!(lines[0]["message"], "Saving Section 2");
    assert_eq!(lines[1]["kind"], "success");
    assert_eq!(lines[1]["operationId"], lines[0]["operationId"]);

    drop(state);
    tokio::time::timeout(Duration::from_secs(1), forwarder)
        .await
        .unwrap()
        .unwrap();
}

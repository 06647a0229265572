// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneytrail::api::{ApiClient, ApiError};
use moneytrail::models::{NewExpense, NewIncome, amount_value};
use moneytrail::month::YearMonth;
use moneytrail::session::Session;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Serve one canned response per expected request and hand back the raw
/// request heads (request line + headers, lowercased) and bodies.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&lower);
            }
            let mut req_body = vec![0u8; content_length];
            reader.read_exact(&mut req_body).unwrap();
            tx.send((head, String::from_utf8(req_body).unwrap())).unwrap();

            let reply = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let mut stream = reader.into_inner();
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });
    (format!("http://{}", addr), rx)
}

fn session_with_token() -> Session {
    let mut s = Session::default();
    s.login("secret-token");
    s
}

#[test]
fn bearer_token_sent_except_on_login() {
    let (base, rx) = serve(vec![
        (200, r#"[{"id":1,"name":"Food","is_default":true}]"#),
        (200, r#"{"token":"fresh-token"}"#),
    ]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();

    let cats = api.categories().unwrap();
    assert_eq!(cats[0].name, "Food");
    let (head, _) = rx.recv().unwrap();
    assert!(head.starts_with("get /categories "));
    assert!(head.contains("authorization: bearer secret-token"));

    let token = api.login("me@example.com", "pw").unwrap();
    assert_eq!(token, "fresh-token");
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("post /login "));
    assert!(!head.contains("authorization:"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["email"], "me@example.com");
}

#[test]
fn month_filter_goes_in_query_string() {
    let (base, rx) = serve(vec![(
        200,
        r#"[{"id":3,"description":"Tea","amount":"2.5","category_id":1,"occurred_on":"2025-07-02"}]"#,
    )]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();
    let exps = api.expenses(YearMonth::new(2025, 7)).unwrap();
    assert_eq!(exps.len(), 1);
    let (head, _) = rx.recv().unwrap();
    assert!(head.starts_with("get /expenses?month=7&year=2025 "));
}

#[test]
fn error_bodies_become_status_errors() {
    let (base, _rx) = serve(vec![
        (422, r#"{"errors":["Name has already been taken"]}"#),
        (401, r#"{"error":"Not Authorized"}"#),
    ]);
    let api = ApiClient::new(&base, &Session::default()).unwrap();

    match api.create_category("Food", false) {
        Err(ApiError::Status { status, message, .. }) => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(message, "Name has already been taken");
        }
        other => panic!("unexpected: {:?}", other.map(|c| c.id)),
    }
    let err = api.incomes().unwrap_err();
    assert!(err.is_unauthorized());
}

#[test]
fn login_without_token_is_an_error() {
    let (base, _rx) = serve(vec![(200, r#"{"errors":["Invalid email or password"]}"#)]);
    let api = ApiClient::new(&base, &Session::default()).unwrap();
    assert!(matches!(
        api.login("me@example.com", "bad"),
        Err(ApiError::MissingToken(_))
    ));
}

#[test]
fn edits_are_patches_wrapped_by_resource() {
    let (base, rx) = serve(vec![
        (200, r#"{"id":5,"description":"Tea","amount":"3","category_id":1,"occurred_on":"2025-07-02"}"#),
        (200, r#"{"id":8,"source":"Salary","amount":"3100","received_on":"2025-07-01","is_work_income":true}"#),
    ]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();

    let saved = api
        .update_expense(
            5,
            &NewExpense {
                description: "Tea".into(),
                amount: "3".into(),
                category_id: 1,
                occurred_on: "2025-07-02".into(),
            },
        )
        .unwrap();
    assert_eq!(saved.id, 5);
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("patch /expenses/5 "));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["expense"]["amount"], "3");

    api.update_income(
        8,
        &NewIncome {
            source: "Salary".into(),
            amount: "3100".into(),
            received_on: "2025-07-01".into(),
            is_work_income: true,
            notes: None,
        },
    )
    .unwrap();
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("patch /incomes/8 "));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["income"]["is_work_income"], true);
}

#[test]
fn profile_and_hourly_wage() {
    let (base, rx) = serve(vec![
        (200, r#"{"id":42,"email":"me@example.com","hourly_wage":null}"#),
        (200, r#"{"id":42,"email":"me@example.com","hourly_wage":"27.5"}"#),
    ]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();

    let user = api.user(42).unwrap();
    assert_eq!(user.email, "me@example.com");
    assert!(user.hourly_wage.is_none());
    let (head, _) = rx.recv().unwrap();
    assert!(head.starts_with("get /users/42 "));

    let user = api.update_hourly_wage(42, "27.5").unwrap();
    assert_eq!(amount_value(user.hourly_wage.as_ref()), 27.5);
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("patch /users/42 "));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["hourly_wage"], "27.5");
}

#[test]
fn password_flows() {
    let (base, rx) = serve(vec![
        (200, r#"{}"#),
        (200, r#"{"message":"Check your inbox"}"#),
        (200, r#"{"message":"Password reset","token":"new-token"}"#),
    ]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();

    let msg = api.change_password("Old1!pass", "New1!pass", "New1!pass").unwrap();
    assert_eq!(msg, "Password changed successfully!");
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("patch /change_password "));
    assert!(head.contains("authorization: bearer secret-token"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["current_password"], "Old1!pass");
    assert_eq!(body["password_confirmation"], "New1!pass");

    assert_eq!(api.forgot_password("me@example.com").unwrap(), "Check your inbox");
    let (head, _) = rx.recv().unwrap();
    assert!(head.starts_with("post /forgot_password "));
    assert!(!head.contains("authorization:"));

    let reset = api.reset_password("reset-tok", "New1!pass", "New1!pass").unwrap();
    assert_eq!(reset.message, "Password reset");
    assert_eq!(reset.token.as_deref(), Some("new-token"));
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("post /reset_password "));
    assert!(!head.contains("authorization:"));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["token"], "reset-tok");
}

#[test]
fn review_can_be_reopened() {
    let (base, rx) = serve(vec![(200, r#"{"id":4,"month_code":"072025","completed":false}"#)]);
    let api = ApiClient::new(&base, &session_with_token()).unwrap();
    let review = api.update_review(4, Some("done for now"), Some(false)).unwrap();
    assert!(!review.completed);
    let (head, body) = rx.recv().unwrap();
    assert!(head.starts_with("patch /monthly_reviews/4 "));
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["completed"], false);
    assert_eq!(body["notes"], "done for now");
}

use std::net::TcpListener;

use serde_json::json;
use serde_json::Value;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;
use crate::helpers::spawn_smtp_app;
use crate::helpers::test_configuration;
use crate::helpers::Outbox;

async fn error_of(resp: reqwest::Response) -> String {
    let body: Value = resp.json().await.expect("json body");
    body["error"].as_str().expect("error field").to_string()
}

/// A guest who is coming gets a confirmation with the invite attached
#[tokio::test]
async fn coming() {
    let app = spawn_app().await;
    let resp = app
        .post_rsvp(&json!({
            "name": "Layla",
            "email": "layla@example.com",
            "status": "coming",
            "message": "So happy for you!",
        }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.recipient.as_ref(), "layla@example.com");
    assert!(email.text_body.contains("Layla"));
    assert!(email.html_body.contains("Layla"));
    assert!(email.html_body.contains("So happy for you!"));

    let invite = email.attachment.as_ref().expect("invite attached");
    assert_eq!(invite.filename, "wedding.ics");
    assert!(invite.content_type.starts_with("text/calendar"));
    assert!(invite.content.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(invite.content.ends_with("\r\nEND:VCALENDAR"));
    assert!(invite
        .content
        .contains("ATTENDEE;CN=Layla;RSVP=TRUE:mailto:layla@example.com"));
}

/// A guest who declines gets a thank-you without attachment
#[tokio::test]
async fn declining() {
    let app = spawn_app().await;
    let resp = app
        .post_rsvp(&json!({
            "name": "Omar",
            "email": "omar@example.com",
            "status": "have_fun",
            "message": "",
        }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);

    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].attachment.is_none());
    assert!(sent[0].text_body.contains("Omar"));
    assert!(sent[0].html_body.contains("No message provided."));
}

#[tokio::test]
async fn message_is_optional() {
    let app = spawn_app().await;
    let resp = app
        .post_rsvp(&json!({
            "name": "Omar",
            "email": "omar@example.com",
            "status": "coming",
        }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].attachment.is_some());
    assert!(sent[0].html_body.contains("No message provided."));
}

/// Missing/invalid required fields are rejected before anything is sent
#[tokio::test]
async fn invalid() {
    let app = spawn_app().await;

    for (body, msg) in [
        (json!({}), "empty"),
        (
            json!({ "name": "Layla", "status": "coming", "message": "hi" }),
            "no email",
        ),
        (
            json!({ "email": "layla@example.com", "status": "coming" }),
            "no name",
        ),
        (
            json!({ "name": "Layla", "email": "layla@example.com" }),
            "no status",
        ),
        (
            json!({ "name": " ", "email": "layla@example.com", "status": "coming" }),
            "blank name",
        ),
        (
            json!({ "name": "Layla", "email": "layla", "status": "coming" }),
            "invalid email",
        ),
        (
            json!({ "name": "Layla", "email": "a..b@example.com", "status": "coming" }),
            "email the relay would refuse",
        ),
        (
            json!({ "name": "Layla", "email": "layla@example.com", "status": "maybe" }),
            "unknown status",
        ),
        (
            json!({ "name": "Layla", "email": "layla@example.com", "status": 1 }),
            "status of wrong type",
        ),
    ] {
        let resp = app.post_rsvp(&body).await;
        assert_eq!(resp.status().as_u16(), 400, "{msg}");
        assert_eq!(error_of(resp).await, "Invalid data", "{msg}");
    }

    assert!(app.outbox.sent().is_empty());
}

/// Names have no length limit
#[tokio::test]
async fn long_name() {
    let app = spawn_app().await;
    let name = "A".repeat(300);
    let resp = app
        .post_rsvp(&json!({
            "name": name,
            "email": "layla@example.com",
            "status": "coming",
        }))
        .await;

    assert_eq!(resp.status().as_u16(), 200);
    let sent = app.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text_body.contains(&name));
}

#[tokio::test]
async fn not_json() {
    let app = spawn_app().await;

    let resp = app.post_rsvp_raw("name=Layla&email=layla%40example.com").await;
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(error_of(resp).await, "Invalid data");

    assert!(app.outbox.sent().is_empty());
}

/// Relay failures are reported without detail
#[tokio::test]
async fn relay_rejects() {
    let app = spawn_app_with(Outbox::rejecting()).await;
    let resp = app
        .post_rsvp(&json!({
            "name": "Layla",
            "email": "layla@example.com",
            "status": "coming",
            "message": "So happy for you!",
        }))
        .await;

    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(error_of(resp).await, "Server error");
}

/// Same, with the real SMTP relay pointed at a port nobody listens on
#[tokio::test]
async fn smtp_relay_unreachable() {
    let mut cfg = test_configuration();
    cfg.email_client.host = "127.0.0.1".to_string();
    cfg.email_client.port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    cfg.email_client.require_tls = false;
    cfg.email_client.timeout_milliseconds = 1000;
    let addr = spawn_smtp_app(cfg).await;

    let resp = reqwest::Client::new()
        .post(format!("{addr}/api/rsvp"))
        .json(&json!({
            "name": "Omar",
            "email": "omar@example.com",
            "status": "have_fun",
            "message": "",
        }))
        .send()
        .await
        .expect("execute request");

    assert_eq!(resp.status().as_u16(), 500);
    assert_eq!(error_of(resp).await, "Server error");
}

/// Each attending RSVP gets its own calendar UID
#[tokio::test]
async fn invites_have_distinct_uids() {
    let app = spawn_app().await;
    let body = json!({
        "name": "Layla",
        "email": "layla@example.com",
        "status": "coming",
        "message": "",
    });
    app.post_rsvp(&body).await.error_for_status().unwrap();
    app.post_rsvp(&body).await.error_for_status().unwrap();

    let uids: Vec<String> = app
        .outbox
        .sent()
        .iter()
        .map(|e| {
            let ics = &e.attachment.as_ref().unwrap().content;
            ics.split("\r\n")
                .find(|l| l.starts_with("UID:"))
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(uids.len(), 2);
    assert_ne!(uids[0], uids[1]);
}

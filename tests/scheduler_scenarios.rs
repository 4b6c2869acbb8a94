//! Scheduler Scenario Tests
//!
//! End-to-end request handling through the route table, without a socket:
//! request parsing, handler behaviour, status mapping and notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use axum::http::{Method, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use viewdb::router::{Request, Response, Router};
use viewdb::scheduler::{App, FixedClock, RecordingNotifier, ViewingHoursPolicy};
use viewdb::store::Reservation;

struct Harness {
    app: App,
    routes: Router<App>,
    notifier: RecordingNotifier,
}

impl Harness {
    /// Wednesday 2019-11-20 09:00, so the bookable week is 25 Nov - 1 Dec.
    fn new() -> Self {
        let now: NaiveDateTime = NaiveDate::from_ymd_opt(2019, 11, 20)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let notifier = RecordingNotifier::new();
        let app = App::new(Box::new(ViewingHoursPolicy::default()))
            .with_clock(FixedClock(now))
            .with_notifier(notifier.clone());
        Self {
            app,
            routes: App::routes().unwrap(),
            notifier,
        }
    }

    fn send(&self, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::new(method, uri.parse().unwrap(), body.to_string());
        self.routes.dispatch(&self.app, &request)
    }

    fn get(&self, uri: &str) -> Response {
        self.send(Method::GET, uri, "")
    }

    fn post(&self, uri: &str, body: &str) -> Response {
        self.send(Method::POST, uri, body)
    }

    /// John Dow (1), Anna Lee (2), 10 Downing Street (1) owned by Anna.
    fn seeded() -> Self {
        let h = Self::new();
        assert_eq!(h.post("/tenants", r#"{"name": "John Dow"}"#).body_str(), "1");
        assert_eq!(h.post("/tenants", r#"{"name": "Anna Lee"}"#).body_str(), "2");
        assert_eq!(
            h.post(
                "/flats",
                r#"{"address": "10 Downing Street", "currentTenantId": 2}"#
            )
            .body_str(),
            "1"
        );
        h
    }

    fn reserve(&self, date_time: &str, tenant: u64) -> Response {
        self.post(
            "/reservations",
            &format!(
                r#"{{"flatId": 1, "dateTime": "{}", "prospectiveTenantId": {}}}"#,
                date_time, tenant
            ),
        )
    }
}

// =============================================================================
// Tenants and Flats
// =============================================================================

#[test]
fn test_get_flats_scenario() {
    let h = Harness::seeded();
    let response = h.get("/flats");

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, Some("application/json"));
    assert_eq!(
        response.body_str(),
        r#"[{"id":1,"address":"10 Downing Street","currentTenantId":2}]"#
    );
}

#[test]
fn test_get_tenants() {
    let h = Harness::seeded();
    assert_eq!(
        h.get("/tenants").body_str(),
        r#"[{"id":1,"name":"John Dow"},{"id":2,"name":"Anna Lee"}]"#
    );
}

#[test]
fn test_get_flat_by_id() {
    let h = Harness::seeded();
    assert_eq!(
        h.get("/flats/1").body_str(),
        r#"{"id":1,"address":"10 Downing Street","currentTenantId":2}"#
    );

    let missing = h.get("/flats/100500");
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.content_type, None);
    assert!(missing.body.is_empty());
}

#[test]
fn test_create_tenant_errors() {
    let h = Harness::seeded();
    assert_eq!(
        h.post("/tenants", r#"{"name": "John Dow"}"#).status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(h.post("/tenants", "{}").status, StatusCode::BAD_REQUEST);
    assert_eq!(h.post("/tenants", "not json").status, StatusCode::BAD_REQUEST);
    assert_eq!(
        h.post("/tenants", r#"{"name": 5}"#).status,
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_create_flat_for_unknown_tenant() {
    let h = Harness::seeded();
    let response = h.post(
        "/flats",
        r#"{"address": "32 Windsor Gardens", "currentTenantId": 42}"#,
    );
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(h.get("/flats").body_str().matches("\"id\"").count(), 1);
}

#[test]
fn test_names_are_escaped() {
    let h = Harness::new();
    h.post("/tenants", "{\"name\": \"Zo\\u00a0\\\"Q\\\"\"}");
    assert_eq!(
        h.get("/tenants").body_str(),
        r#"[{"id":1,"name":"Zo\u00a0\"Q\""}]"#
    );
}

#[test]
fn test_unknown_route_and_method() {
    let h = Harness::seeded();
    assert_eq!(h.get("/owners").status, StatusCode::NOT_FOUND);
    assert_eq!(
        h.send(Method::DELETE, "/tenants", "").status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(h.get("/flats/1/extra").status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Reservations
// =============================================================================

#[test]
fn test_create_and_query_reservations() {
    let h = Harness::seeded();
    assert_eq!(h.reserve("2019-11-25T10:00", 1).body_str(), "1");
    assert_eq!(h.reserve("2019-11-27T12:20", 1).body_str(), "2");
    assert_eq!(h.reserve("2019-11-29T19:40", 1).body_str(), "3");

    let response =
        h.get("/reservations?flatId=1&from=2019-11-25T10:00&to=2019-11-27T12:20");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body_str(),
        concat!(
            r#"[{"id":1,"flatId":1,"dateTime":"2019-11-25T10:00","prospectiveTenantId":1,"approved":null},"#,
            r#"{"id":2,"flatId":1,"dateTime":"2019-11-27T12:20","prospectiveTenantId":1,"approved":null}]"#
        )
    );

    let messages = h.notifier.received();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].tenant_id, 2);
    assert_eq!(
        messages[0].text,
        "Please, approve or reject reservation at \"10 Downing Street\" on 2019-11-25T10:00."
    );
}

#[test]
fn test_reservation_query_requires_parameters() {
    let h = Harness::seeded();
    assert_eq!(
        h.get("/reservations?flatId=1&from=2019-11-25T10:00").status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        h.get("/reservations?flatId=x&from=2019-11-25T10:00&to=2019-11-26T10:00")
            .status,
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_reservation_slot_rules() {
    let h = Harness::seeded();
    // Outside the upcoming week
    assert_eq!(h.reserve("2019-11-22T10:00", 1).status, StatusCode::BAD_REQUEST);
    assert_eq!(h.reserve("2019-12-02T10:00", 1).status, StatusCode::BAD_REQUEST);
    // Off the 20 minute grid
    assert_eq!(h.reserve("2019-11-26T10:10", 1).status, StatusCode::BAD_REQUEST);
    assert_eq!(h.reserve("2019-11-26T10:00:30", 1).status, StatusCode::BAD_REQUEST);
    // Outside viewing hours
    assert_eq!(h.reserve("2019-11-26T20:00", 1).status, StatusCode::BAD_REQUEST);
    // Malformed
    assert_eq!(h.reserve("tomorrow", 1).status, StatusCode::BAD_REQUEST);

    assert!(h.notifier.received().is_empty());
    assert!(h
        .app
        .database()
        .transactional(|tx| tx.find_all::<Reservation>())
        .unwrap()
        .is_empty());
}

#[test]
fn test_double_booking_rejected() {
    let h = Harness::seeded();
    assert_eq!(h.reserve("2019-11-25T10:00", 1).status, StatusCode::OK);
    assert_eq!(h.reserve("2019-11-25T10:00", 2).status, StatusCode::BAD_REQUEST);
}

#[test]
fn test_same_approval_twice_fails() {
    let h = Harness::seeded();
    h.reserve("2019-11-25T10:00", 1);

    let first = h.send(Method::PUT, "/reservations/1", r#"{"approved": true}"#);
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert!(first.body.is_empty());
    assert_eq!(first.content_type, Some("application/json"));

    let second = h.send(Method::PUT, "/reservations/1", r#"{"approved": true}"#);
    assert_eq!(second.status, StatusCode::BAD_REQUEST);

    let messages = h.notifier.received();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].tenant_id, 1);
    assert_eq!(
        messages[1].text,
        "Your reservation at 10 Downing Street on 2019-11-25T10:00 has been approved."
    );
}

#[test]
fn test_rejected_reservation_cannot_be_cancelled() {
    let h = Harness::seeded();
    h.reserve("2019-11-25T10:00", 1);

    assert_eq!(
        h.send(Method::PUT, "/reservations/1", r#"{"approved": false}"#)
            .status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        h.send(Method::DELETE, "/reservations/1", "").status,
        StatusCode::BAD_REQUEST
    );
    // The slot stays taken
    assert_eq!(h.reserve("2019-11-25T10:00", 2).status, StatusCode::BAD_REQUEST);

    // Approval after rejection is still allowed
    assert_eq!(
        h.send(Method::PUT, "/reservations/1", r#"{"approved": true}"#)
            .status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        h.send(Method::DELETE, "/reservations/1", "").status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(h.reserve("2019-11-25T10:00", 2).status, StatusCode::OK);
}

#[test]
fn test_unknown_reservation_is_400() {
    let h = Harness::seeded();
    assert_eq!(
        h.send(Method::PUT, "/reservations/9", r#"{"approved": true}"#)
            .status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        h.send(Method::DELETE, "/reservations/9", "").status,
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_put_requires_boolean() {
    let h = Harness::seeded();
    h.reserve("2019-11-25T10:00", 1);
    assert_eq!(
        h.send(Method::PUT, "/reservations/1", r#"{"approved": "yes"}"#)
            .status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        h.send(Method::PUT, "/reservations/1", "").status,
        StatusCode::BAD_REQUEST
    );
}

// =============================================================================
// Concurrency
// =============================================================================

/// 100 parallel POSTs for one slot: one 200, 99 400s, one stored row.
#[test]
fn test_racing_requests_single_winner() {
    let h = Harness::seeded();
    let ok = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..100 {
            let h = &h;
            let ok = &ok;
            let rejected = &rejected;
            s.spawn(move || {
                let status = h.reserve("2019-11-25T10:00", 1 + (i % 2)).status;
                if status == StatusCode::OK {
                    ok.fetch_add(1, Ordering::SeqCst);
                } else if status == StatusCode::BAD_REQUEST {
                    rejected.fetch_add(1, Ordering::SeqCst);
                } else {
                    panic!("unexpected status {}", status);
                }
            });
        }
    });

    assert_eq!(ok.load(Ordering::SeqCst), 1);
    assert_eq!(rejected.load(Ordering::SeqCst), 99);
    assert_eq!(
        h.app
            .database()
            .transactional(|tx| tx.find_all::<Reservation>())
            .unwrap()
            .len(),
        1
    );
}

mod common;
use common::{memory_pool, utc};
use qrattend::api::Service;
use qrattend::core::business_day::BusinessClock;
use qrattend::core::calendar::WeekdayCalendar;
use qrattend::db::pool::DbPool;
use qrattend::errors::{AppError, AppResult};
use qrattend::notify::{CheckInNotice, Notifier, Outbox};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn lima() -> BusinessClock {
    BusinessClock::new(-5).expect("valid offset")
}

/// Send one request through a fresh service and return (status, body).
fn call(pool: &mut DbPool, outbox: &Outbox, request: Value, now: &str) -> (u16, Value) {
    let calendar = WeekdayCalendar::default();
    let mut service = Service::new(pool, lima(), &calendar, outbox);
    let resp = service.handle_json(&request.to_string(), utc(now));
    (resp.status, resp.body)
}

fn create(pool: &mut DbPool, outbox: &Outbox, name: &str) -> Value {
    let (status, body) = call(
        pool,
        outbox,
        json!({ "action": "createMember", "fullName": name, "communityNumber": "3" }),
        "2026-01-01T12:00:00Z",
    );
    assert_eq!(status, 200);
    body
}

struct FailingNotifier {
    calls: Arc<AtomicUsize>,
}

impl Notifier for FailingNotifier {
    fn send(&self, _notice: &CheckInNotice) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Notify("endpoint unreachable".into()))
    }
}

struct RecordingNotifier {
    seen: Arc<Mutex<Vec<CheckInNotice>>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, notice: &CheckInNotice) -> AppResult<()> {
        self.seen.lock().expect("lock").push(notice.clone());
        Ok(())
    }
}

#[test]
fn test_checkin_success_and_rescan() {
    let mut pool = memory_pool();
    let outbox = Outbox::disabled();
    let ana = create(&mut pool, &outbox, "Ana");
    let qr = ana["qrCode"].as_str().unwrap().to_string();

    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": qr }),
        "2026-01-10T15:00:00Z",
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["updated"], false);
    assert_eq!(body["user"], "Ana");
    assert_eq!(body["time"], "2026-01-10T15:00:00.000Z");

    let (_, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": qr }),
        "2026-01-10T20:00:00Z",
    );
    assert_eq!(body["updated"], true);

    let (_, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": qr, "date": "06/01/2026" }),
        "2026-01-10T20:00:00Z",
    );
    assert_eq!(body["updated"], false);
    assert_eq!(body["time"], "2026-01-06T17:00:00.000Z");
}

#[test]
fn test_client_errors_map_to_4xx() {
    let mut pool = memory_pool();
    let outbox = Outbox::disabled();
    let now = "2026-01-10T15:00:00Z";

    let (status, body) = call(&mut pool, &outbox, json!({ "action": "checkIn" }), now);
    assert_eq!(status, 400);
    assert_eq!(body["error"], "QR Code required");

    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": "nope" }),
        now,
    );
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Usuario no encontrado");

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "createMember", "fullName": "   " }),
        now,
    );
    assert_eq!(status, 400);

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "updateMember", "id": 42, "fullName": "X" }),
        now,
    );
    assert_eq!(status, 404);

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "deleteMember", "id": "abc" }),
        now,
    );
    assert_eq!(status, 400);

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "attendanceMatrix", "year": 2026, "month": 12 }),
        now,
    );
    assert_eq!(status, 400);

    let (status, _) = call(&mut pool, &outbox, json!({ "action": "launchRocket" }), now);
    assert_eq!(status, 400);

    let calendar = WeekdayCalendar::default();
    let mut service = Service::new(&mut pool, lima(), &calendar, &outbox);
    let resp = service.handle_json("{not json", utc(now));
    assert_eq!(resp.status, 400);
    assert!(!resp.is_success());
}

#[test]
fn test_delete_attendance_validates_date_and_member() {
    let mut pool = memory_pool();
    let outbox = Outbox::disabled();
    let ana = create(&mut pool, &outbox, "Ana");
    let id = ana["id"].as_i64().unwrap();
    let now = "2026-01-10T15:00:00Z";

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "deleteAttendance", "userId": id, "date": "31/04/2026" }),
        now,
    );
    assert_eq!(status, 400);

    let (status, _) = call(
        &mut pool,
        &outbox,
        json!({ "action": "deleteAttendance", "userId": 999, "date": "10/01/2026" }),
        now,
    );
    assert_eq!(status, 404);

    call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": ana["qrCode"] }),
        now,
    );

    // ids may arrive as strings
    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "deleteAttendance", "userId": id.to_string(), "date": "10/01/2026" }),
        now,
    );
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
}

#[test]
fn test_store_failure_maps_to_generic_500() {
    let mut pool = memory_pool();
    let outbox = Outbox::disabled();
    let ana = create(&mut pool, &outbox, "Ana");

    pool.conn
        .execute_batch("DROP TABLE attendance;")
        .expect("drop table");

    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": ana["qrCode"] }),
        "2026-01-10T15:00:00Z",
    );
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Error logging attendance");
}

#[test]
fn test_directory_and_reports() {
    let mut pool = memory_pool();
    let outbox = Outbox::disabled();
    let now = "2026-01-10T15:00:00Z";
    let beto = create(&mut pool, &outbox, "Beto");
    let ana = create(&mut pool, &outbox, "Ana");

    call(&mut pool, &outbox, json!({ "action": "checkIn", "qrCode": ana["qrCode"] }), now);

    let (status, list) = call(&mut pool, &outbox, json!({ "action": "listMembers" }), now);
    assert_eq!(status, 200);
    assert_eq!(list[0]["fullName"], "Ana");
    assert_eq!(list[1]["fullName"], "Beto");

    let (_, rows) = call(&mut pool, &outbox, json!({ "action": "attendanceReport" }), now);
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["Nombre"], "Ana");
    assert_eq!(rows[0]["Fecha"], "10/01/2026");
    assert_eq!(rows[0]["Hora"], "10:00:00");

    let (status, matrix) = call(
        &mut pool,
        &outbox,
        json!({ "action": "attendanceMatrix", "year": 2026, "month": 0, "today": "10/01/2026" }),
        now,
    );
    assert_eq!(status, 200);
    assert_eq!(matrix["dates"][2], "10/01/2026");
    assert_eq!(matrix["rows"][0]["cells"][2], "A");
    assert_eq!(matrix["rows"][1]["cells"][2], "F");
    assert_eq!(matrix["rows"][1]["cells"][3], "");

    let (status, updated) = call(
        &mut pool,
        &outbox,
        json!({ "action": "updateMember", "id": beto["id"], "fullName": "Alberto" }),
        now,
    );
    assert_eq!(status, 200);
    assert_eq!(updated["fullName"], "Alberto");
    assert_eq!(updated["qrCode"], beto["qrCode"]);

    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "deleteMember", "id": ana["id"] }),
        now,
    );
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let (_, rows) = call(&mut pool, &outbox, json!({ "action": "attendanceReport" }), now);
    assert!(rows.as_array().unwrap().is_empty());
}

#[test]
fn test_failing_notifier_does_not_affect_checkin() {
    let mut pool = memory_pool();
    let calls = Arc::new(AtomicUsize::new(0));
    let outbox = Outbox::spawn(FailingNotifier {
        calls: Arc::clone(&calls),
    });
    assert!(outbox.is_enabled());

    let ana = create(&mut pool, &outbox, "Ana");
    let (status, body) = call(
        &mut pool,
        &outbox,
        json!({ "action": "checkIn", "qrCode": ana["qrCode"] }),
        "2026-01-10T15:00:00Z",
    );

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    assert!(outbox.shutdown(Duration::from_secs(5)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let events: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .unwrap();
    assert_eq!(events, 1);
}

#[test]
fn test_notice_carries_local_fields() {
    let mut pool = memory_pool();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let outbox = Outbox::spawn(RecordingNotifier {
        seen: Arc::clone(&seen),
    });

    let ana = create(&mut pool, &outbox, "Ana");
    let qr = ana["qrCode"].clone();
    call(&mut pool, &outbox, json!({ "action": "checkIn", "qrCode": qr }), "2026-01-11T03:30:15Z");
    call(&mut pool, &outbox, json!({ "action": "checkIn", "qrCode": qr }), "2026-01-11T03:45:00Z");

    assert!(outbox.shutdown(Duration::from_secs(5)));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].id, "0001");
    assert_eq!(seen[0].name, "Ana");
    assert_eq!(seen[0].community, "3");
    assert_eq!(seen[0].date, "10/01/2026");
    assert_eq!(seen[0].time, "22:30:15");
    assert!(!seen[0].updated);
    assert!(seen[1].updated);

    let payload = serde_json::to_value(&seen[1]).unwrap();
    assert_eq!(payload["Nombre"], "Ana");
    assert_eq!(payload["actualizado"], true);
}

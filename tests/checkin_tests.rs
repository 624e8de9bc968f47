mod common;
use common::{memory_pool, setup_test_db, utc, ymd};
use qrattend::core::attendance::AttendanceLogic;
use qrattend::core::business_day::BusinessClock;
use qrattend::core::checkin::CheckInLogic;
use qrattend::core::member::MemberLogic;
use qrattend::db::initialize::init_db;
use qrattend::db::pool::DbPool;
use qrattend::db::queries;
use qrattend::errors::AppError;
use qrattend::models::member::{Member, MemberFilter, MemberInput};
use std::sync::{Arc, Barrier};
use std::thread;

fn lima() -> BusinessClock {
    BusinessClock::new(-5).expect("valid offset")
}

fn register(pool: &mut DbPool, name: &str) -> Member {
    MemberLogic::add(
        pool,
        &MemberInput::new(name, Some("3".to_string())),
        utc("2026-01-01T12:00:00Z"),
    )
    .expect("member registered")
}

fn total_events(pool: &DbPool) -> i64 {
    pool.conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .expect("count attendance")
}

#[test]
fn test_rescan_same_day_replaces_previous_event() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");

    let first =
        CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc("2026-01-10T15:00:00Z"))
            .unwrap();
    assert!(!first.updated);
    assert_eq!(first.business_day, ymd(2026, 1, 10));

    // 22:00 local, same business day although UTC already moved on
    let second =
        CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc("2026-01-11T03:00:00Z"))
            .unwrap();
    assert!(second.updated);
    assert_eq!(second.business_day, ymd(2026, 1, 10));

    let day = AttendanceLogic::for_day(&mut pool, &clock, ana.id, ymd(2026, 1, 10)).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].timestamp, utc("2026-01-11T03:00:00Z"));
}

#[test]
fn test_scan_after_local_midnight_is_a_new_day() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");

    CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc("2026-01-10T04:59:59.999Z"))
        .unwrap();
    let next =
        CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc("2026-01-10T05:00:00Z"))
            .unwrap();

    assert!(!next.updated);
    assert_eq!(next.business_day, ymd(2026, 1, 10));
    assert_eq!(queries::count_member_events(&pool.conn, ana.id).unwrap(), 2);
}

#[test]
fn test_scans_of_other_members_do_not_interfere() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");
    let beto = register(&mut pool, "Beto");

    let now = utc("2026-01-10T15:00:00Z");
    CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, now).unwrap();
    let b = CheckInLogic::apply(&mut pool, &clock, &beto.qr_code, None, now).unwrap();

    assert!(!b.updated);
    assert_eq!(total_events(&pool), 2);
}

#[test]
fn test_retroactive_checkin_lands_on_local_noon_and_is_replaced() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");
    let now = utc("2026-01-10T15:00:00Z");

    let past = CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, Some(ymd(2026, 1, 6)), now)
        .unwrap();
    assert!(!past.updated);
    assert_eq!(past.recorded_at, utc("2026-01-06T17:00:00Z"));
    assert_eq!(past.business_day, ymd(2026, 1, 6));

    let again = CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, Some(ymd(2026, 1, 6)), now)
        .unwrap();
    assert!(again.updated);

    // a live scan late that evening replaces the noon entry
    let live =
        CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc("2026-01-06T23:00:00Z"))
            .unwrap();
    assert!(live.updated);

    let day = AttendanceLogic::for_day(&mut pool, &clock, ana.id, ymd(2026, 1, 6)).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].timestamp, utc("2026-01-06T23:00:00Z"));
}

#[test]
fn test_rescan_after_offset_change_replaces_stored_day() {
    let mut pool = memory_pool();
    let ana = register(&mut pool, "Ana");

    // 21:00 on the 10th at UTC-5; stored as business day 2026-01-10
    let first = CheckInLogic::apply(
        &mut pool,
        &lima(),
        &ana.qr_code,
        None,
        utc("2026-01-11T02:00:00Z"),
    )
    .unwrap();
    assert_eq!(first.business_day, ymd(2026, 1, 10));

    // same local date under UTC+0, but the old instant lies outside its window
    let utc_clock = BusinessClock::new(0).expect("valid offset");
    let second = CheckInLogic::apply(
        &mut pool,
        &utc_clock,
        &ana.qr_code,
        None,
        utc("2026-01-10T15:00:00Z"),
    )
    .unwrap();
    assert!(second.updated);
    assert_eq!(second.business_day, ymd(2026, 1, 10));
    assert_eq!(total_events(&pool), 1);

    let n = AttendanceLogic::delete_for_day(&mut pool, &lima(), ana.id, ymd(2026, 1, 10)).unwrap();
    assert_eq!(n, 1);
    assert_eq!(total_events(&pool), 0);
}

#[test]
fn test_concurrent_scans_keep_one_event_per_day() {
    let db_path = setup_test_db("checkin_concurrent");
    let qr_code = {
        let mut pool = DbPool::new(&db_path).expect("open db");
        init_db(&pool.conn).expect("init schema");
        register(&mut pool, "Ana").qr_code
    };

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["2026-01-10T15:00:00Z", "2026-01-10T15:00:01Z"]
        .into_iter()
        .map(|at| {
            let db_path = db_path.clone();
            let qr_code = qr_code.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut pool = DbPool::new(&db_path).expect("open db");
                barrier.wait();
                CheckInLogic::apply(&mut pool, &lima(), &qr_code, None, utc(at))
            })
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("scan thread").expect("check-in succeeds"))
        .collect();

    let updated = outcomes.iter().filter(|o| o.updated).count();
    assert_eq!(updated, 1);

    let pool = DbPool::new(&db_path).expect("open db");
    assert_eq!(total_events(&pool), 1);
}

#[test]
fn test_blank_and_unknown_tokens_do_not_mutate() {
    let mut pool = memory_pool();
    let clock = lima();
    register(&mut pool, "Ana");
    let now = utc("2026-01-10T15:00:00Z");

    let blank = CheckInLogic::apply(&mut pool, &clock, "   ", None, now);
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let unknown = CheckInLogic::apply(&mut pool, &clock, "no-such-token", None, now);
    assert!(matches!(unknown, Err(AppError::MemberNotFound(_))));

    assert_eq!(total_events(&pool), 0);
}

#[test]
fn test_store_rejects_two_events_on_one_business_day() {
    let mut pool = memory_pool();
    let ana = register(&mut pool, "Ana");

    queries::insert_event(&pool.conn, ana.id, utc("2026-01-10T15:00:00Z"), ymd(2026, 1, 10))
        .unwrap();
    let dup =
        queries::insert_event(&pool.conn, ana.id, utc("2026-01-10T20:00:00Z"), ymd(2026, 1, 10));

    assert!(matches!(dup, Err(AppError::Db(_))));
}

#[test]
fn test_delete_member_cascades_to_attendance() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");
    let beto = register(&mut pool, "Beto");

    let scans = [
        (&ana, "2026-01-06T15:00:00Z"),
        (&ana, "2026-01-10T15:00:00Z"),
        (&beto, "2026-01-10T15:00:00Z"),
    ];
    for (member, at) in scans {
        CheckInLogic::apply(&mut pool, &clock, &member.qr_code, None, utc(at)).unwrap();
    }

    let deleted = MemberLogic::delete(&mut pool, ana.id).unwrap();
    assert_eq!(deleted.full_name, "Ana");

    assert_eq!(queries::count_member_events(&pool.conn, ana.id).unwrap(), 0);
    assert_eq!(total_events(&pool), 1);
    assert!(matches!(
        MemberLogic::get(&mut pool, ana.id),
        Err(AppError::MemberNotFound(_))
    ));
}

#[test]
fn test_delete_attendance_for_one_day() {
    let mut pool = memory_pool();
    let clock = lima();
    let ana = register(&mut pool, "Ana");

    for at in ["2026-01-06T15:00:00Z", "2026-01-11T03:00:00Z"] {
        CheckInLogic::apply(&mut pool, &clock, &ana.qr_code, None, utc(at)).unwrap();
    }

    let n = AttendanceLogic::delete_for_day(&mut pool, &clock, ana.id, ymd(2026, 1, 10)).unwrap();
    assert_eq!(n, 1);
    let again =
        AttendanceLogic::delete_for_day(&mut pool, &clock, ana.id, ymd(2026, 1, 10)).unwrap();
    assert_eq!(again, 0);

    // the 6th is untouched
    assert_eq!(queries::count_member_events(&pool.conn, ana.id).unwrap(), 1);

    let missing = AttendanceLogic::delete_for_day(&mut pool, &clock, 999, ymd(2026, 1, 10));
    assert!(matches!(missing, Err(AppError::MemberNotFound(_))));
}

#[test]
fn test_member_validation_and_filters() {
    let mut pool = memory_pool();
    let now = utc("2026-01-01T12:00:00Z");

    let blank = MemberLogic::add(&mut pool, &MemberInput::new("  ", None), now);
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let ana_input = MemberInput::new(" Ana Torres ", Some("3".into()));
    let ana = MemberLogic::add(&mut pool, &ana_input, now).unwrap();
    assert_eq!(ana.full_name, "Ana Torres");
    MemberLogic::add(&mut pool, &MemberInput::new("Beto Ruiz", Some("  ".into())), now).unwrap();
    MemberLogic::add(&mut pool, &MemberInput::new("Carla Ruiz", Some("5".into())), now).unwrap();

    let all = MemberLogic::list(&mut pool, &MemberFilter::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].community_number, None);
    assert_ne!(all[0].qr_code, all[1].qr_code);

    let ruiz = MemberFilter {
        search: Some("ruiz".into()),
        ..Default::default()
    };
    assert_eq!(MemberLogic::list(&mut pool, &ruiz).unwrap().len(), 2);

    let five = MemberFilter {
        community: Some("5".into()),
        ..Default::default()
    };
    let found = MemberLogic::list(&mut pool, &five).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "Carla Ruiz");

    let edited =
        MemberLogic::update(&mut pool, ana.id, &MemberInput::new("Ana T.", None)).unwrap();
    assert_eq!(edited.full_name, "Ana T.");
    assert_eq!(edited.community_number, None);
    assert_eq!(edited.qr_code, ana.qr_code);

    let missing = MemberLogic::update(&mut pool, 999, &MemberInput::new("X", None));
    assert!(matches!(missing, Err(AppError::MemberNotFound(_))));
}

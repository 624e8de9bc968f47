#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, Utc};
use qrattend::db::initialize::init_db;
use qrattend::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn qra() -> Command {
    cargo_bin_cmd!("qrattend")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_qrattend.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `init` a fresh database through the CLI.
pub fn init_test_db(db_path: &str) {
    qra()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Register a member through the CLI and return their QR token.
pub fn add_member(db_path: &str, name: &str, community: Option<&str>) -> String {
    let mut args = vec!["--db", db_path, "member", "add", name];
    if let Some(c) = community {
        args.extend(["--community", c]);
    }
    qra().args(&args).assert().success();

    let out = qra()
        .args(["--db", db_path, "member", "list", "--json"])
        .output()
        .expect("run member list");
    let members: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("member list is JSON");

    members
        .as_array()
        .expect("array of members")
        .iter()
        .find(|m| m["fullName"] == name)
        .and_then(|m| m["qrCode"].as_str())
        .expect("member registered")
        .to_string()
}

/// Fresh in-memory database with the full schema.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init schema");
    pool
}

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 instant")
        .with_timezone(&Utc)
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

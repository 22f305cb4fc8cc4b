//! Madang fixture database for session tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use madang_app::{Notification, TableBrowser};
use madang_core::{parse_datetime, ConnectionConfig};
use madang_drivers::sqlite::{SqliteConnection, SqliteDriver};
use madang_forms::FormBuilder;
use madang_services::{ErrorLog, TableGateway};
use tempfile::TempDir;

pub const MADANG_SCHEMA: &str = "
    CREATE TABLE Book (
        bookid INTEGER PRIMARY KEY,
        bookname VARCHAR(40),
        publisher VARCHAR(40),
        price INTEGER
    );
    CREATE TABLE Customer (
        custid INTEGER PRIMARY KEY,
        name VARCHAR(40),
        address VARCHAR(50),
        phone VARCHAR(20)
    );
    CREATE TABLE Orders (
        orderid INTEGER PRIMARY KEY,
        custid INTEGER REFERENCES Customer(custid),
        bookid INTEGER REFERENCES Book(bookid),
        saleprice INTEGER,
        orderdate DATE
    );
    INSERT INTO Book VALUES (1, 'Football History', 'Good Sports', 7000);
    INSERT INTO Book VALUES (2, 'Football Guide', 'Nabook', 13000);
    INSERT INTO Customer VALUES (1, 'Park Ji-sung', 'Manchester', '000-5000-0001');
    INSERT INTO Orders VALUES (1, 1, 1, 6000, '2014-07-01');
";

pub type Browser = TableBrowser<Vec<Notification>>;

/// A browser over a fresh Madang database; the directory also receives error logs
pub fn madang_browser() -> (TempDir, Browser) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("madang.db");
    let conn = SqliteConnection::open(path.to_str().unwrap(), Duration::from_secs(5)).unwrap();
    conn.execute_batch(MADANG_SCHEMA).unwrap();
    drop(conn);

    let gateway = TableGateway::new(
        Arc::new(SqliteDriver::new()),
        ConnectionConfig::new("sqlite", path.to_str().unwrap()),
    )
    .with_error_log(ErrorLog::new(dir.path()));
    let forms =
        FormBuilder::new().with_default_date(parse_datetime("2024-07-01 09:00:00").unwrap());

    (dir, TableBrowser::new(gateway, Vec::new()).with_form_builder(forms))
}

pub fn last(browser: &Browser) -> &Notification {
    browser.notifier().last().expect("a notification")
}

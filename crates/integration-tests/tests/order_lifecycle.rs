//! End-to-end tests of the order orchestration flow: load, classify,
//! check new orders, discard, mark returned.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::Utc;

use parceldeck_core::{Bucket, EngineError, OrderNumber, Snapshot, Urgency};
use parceldeck_dashboard::board::OrderBoard;
use parceldeck_dashboard::error::AppError;
use parceldeck_dashboard::scanner::NewOrders;
use parceldeck_dashboard::services::orders as service;
use parceldeck_integration_tests::{MockScanner, raw_order, test_email};

#[tokio::test]
async fn initial_load_classifies_into_buckets() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("FRESH", now, 3), raw_order("OLD", now, 8)],
        failed_delivery: vec![raw_order("FAILED", now, 12)],
        returned: vec![raw_order("BACK", now, 1)],
    });

    let classification = service::load_board(&scanner, &board, &email)
        .await
        .expect("load should succeed");

    assert_eq!(classification.bucket(Bucket::ReadyForPickup).len(), 1);
    assert_eq!(classification.bucket(Bucket::Lost).len(), 1);
    assert_eq!(classification.bucket(Bucket::FailedDelivery).len(), 1);
    assert_eq!(classification.bucket(Bucket::Returned).len(), 1);

    // Failed Delivery never ages into Lost, no matter how old.
    assert_eq!(
        classification.bucket(Bucket::FailedDelivery)[0]
            .order_number
            .as_str(),
        "FAILED"
    );
}

#[tokio::test]
async fn bucket_view_loads_lazily_then_reuses_board() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 6), raw_order("B", now, 2)],
        ..Snapshot::default()
    });

    let rows = service::bucket_view(&scanner, &board, &email, Bucket::ReadyForPickup)
        .await
        .expect("first view loads the board");
    assert_eq!(rows.len(), 2);
    // Oldest first, with the urgency the engine derived at reconcile time.
    assert_eq!(rows[0].order_number.as_str(), "A");
    assert_eq!(rows[0].urgency, Some(Urgency::Critical));
    assert_eq!(rows[1].urgency, Some(Urgency::Fresh));

    // A second view must reuse the committed board; the mock has no more
    // scripted snapshots, so another fetch would panic.
    let lost = service::bucket_view(&scanner, &board, &email, Bucket::Lost)
        .await
        .expect("second view reads the board");
    assert!(lost.is_empty());
    assert_eq!(scanner.calls().len(), 1);
}

#[tokio::test]
async fn check_new_orders_merges_and_counts_only_genuinely_new() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("KNOWN", now, 2)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    // The re-scan rediscovers KNOWN and finds one genuinely new order.
    let discovered = Snapshot {
        ready_for_pickup: vec![raw_order("KNOWN", now, 2), raw_order("NEW", now, 0)],
        ..Snapshot::default()
    };
    let all_orders = discovered.clone();
    scanner.push_rescan(NewOrders {
        discovered,
        all_orders,
    });

    let summary = service::check_new_orders(&scanner, &board, &email)
        .await
        .expect("re-scan should succeed");
    assert_eq!(summary.new_orders, 1);

    let classification = board.classification().expect("board committed");
    assert_eq!(classification.bucket(Bucket::ReadyForPickup).len(), 2);
}

#[tokio::test]
async fn discard_removes_locally_after_backend_accepts() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("KEEP", now, 1), raw_order("DROP", now, 2)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    let target = OrderNumber::new("DROP").unwrap();
    service::discard_order(&scanner, &board, &email, &target)
        .await
        .expect("discard should succeed");

    let classification = board.classification().expect("board still loaded");
    assert!(classification.bucket_of(&target).is_none());
    assert_eq!(classification.len(), 1);
    assert!(
        scanner
            .calls()
            .iter()
            .any(|c| c.starts_with("discard:DROP"))
    );
}

#[tokio::test]
async fn discard_unknown_order_never_reaches_backend() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 1)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    let unknown = OrderNumber::new("GHOST").unwrap();
    let err = service::discard_order(&scanner, &board, &email, &unknown)
        .await
        .expect_err("unknown order must be rejected");
    assert!(matches!(
        err,
        AppError::Engine(EngineError::NotFound(_))
    ));

    // The scanner saw the load, but no discard call.
    assert_eq!(scanner.calls().len(), 1);
    assert_eq!(board.classification().unwrap().len(), 1);
}

#[tokio::test]
async fn discard_backend_failure_leaves_board_untouched() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 1)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    scanner.fail_next_mutation();
    let target = OrderNumber::new("A").unwrap();
    let err = service::discard_order(&scanner, &board, &email, &target)
        .await
        .expect_err("backend failure must propagate");
    assert!(matches!(err, AppError::Backend(_)));

    // The order is still on the board.
    let classification = board.classification().unwrap();
    assert!(classification.bucket_of(&target).is_some());
}

#[tokio::test]
async fn mark_returned_triggers_full_refresh() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 1)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    // After the mutation, the scanner reports the order as Returned.
    scanner.push_snapshot(Snapshot {
        returned: vec![raw_order("A", now, 1)],
        ..Snapshot::default()
    });

    let target = OrderNumber::new("A").unwrap();
    let classification = service::mark_returned(&scanner, &board, &email, &target)
        .await
        .expect("mark-returned should succeed");

    // No local guessing: the new bucket comes from the fresh snapshot.
    assert_eq!(classification.bucket_of(&target), Some(Bucket::Returned));
    assert_eq!(
        scanner.calls(),
        vec![
            format!("fetch_all_orders:{email}"),
            format!("mark_returned:A"),
            format!("fetch_all_orders:{email}"),
        ]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_state() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 1)],
        ..Snapshot::default()
    });
    service::load_board(&scanner, &board, &email)
        .await
        .expect("initial load");

    scanner.push_snapshot_failure();
    let err = service::load_board(&scanner, &board, &email)
        .await
        .expect_err("refresh failure must propagate");
    assert!(matches!(err, AppError::Backend(_)));

    // The previously displayed data survives.
    assert_eq!(board.classification().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_snapshot_aborts_without_partial_state() {
    let now = Utc::now();
    let scanner = MockScanner::new();
    let board = OrderBoard::new();
    let email = test_email();

    let mut bad = raw_order("B", now, 2);
    bad.date = None;
    scanner.push_snapshot(Snapshot {
        ready_for_pickup: vec![raw_order("A", now, 1), bad],
        ..Snapshot::default()
    });

    let err = service::load_board(&scanner, &board, &email)
        .await
        .expect_err("malformed record must abort the reconcile");
    assert!(matches!(
        err,
        AppError::Engine(EngineError::Validation { .. })
    ));

    // No partial classification was committed.
    assert!(board.classification().is_none());
}

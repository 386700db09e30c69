//! Concurrent checkouts and voids against a file database with a real pool.

use std::time::Duration;

use tally_core::{CheckoutItem, CheckoutRequest, ErrorKind, NewProduct};
use tally_db::{Database, DbConfig};
use tempfile::TempDir;

async fn open(dir: &TempDir) -> Database {
    let config = DbConfig::new(dir.path().join("tally.db"))
        .max_connections(5)
        .busy_timeout(Duration::from_secs(10));
    Database::new(config).await.unwrap()
}

async fn product_with_stock(db: &Database, stock: i64) -> i64 {
    db.products()
        .insert(&NewProduct {
            name: "Last Croissant".to_string(),
            price: 15_000,
            stock,
            category_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let product_id = product_with_stock(&db, 5).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.orders()
                .checkout(CheckoutRequest::new(vec![CheckoutItem::new(product_id, 1)]))
                .await
        }));
    }

    let (mut sold, mut out_of_stock, mut storage) = (0i64, 0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.details[0].quantity, 1);
                sold += 1;
            }
            Err(e) => match e.kind() {
                ErrorKind::InsufficientStock => out_of_stock += 1,
                ErrorKind::Storage => storage += 1,
                other => panic!("unexpected error kind {other:?}: {e}"),
            },
        }
    }

    assert!(sold <= 5, "sold {sold} units out of 5");
    assert_eq!(sold + out_of_stock + storage, 20);
    if storage == 0 {
        assert_eq!(sold, 5);
    }

    let left = db.products().stock_level(product_id).await.unwrap().stock;
    assert_eq!(left, 5 - sold);

    let report = db.reports().today().await.unwrap();
    assert_eq!(report.total_transactions, sold);
    assert_eq!(report.total_revenue, sold * 15_000);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn voids_and_checkouts_interleave_consistently() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    let product_id = product_with_stock(&db, 5).await;

    let mut order_ids = Vec::new();
    for _ in 0..5 {
        let order = db
            .orders()
            .checkout(CheckoutRequest::new(vec![CheckoutItem::new(product_id, 1)]))
            .await
            .unwrap();
        order_ids.push(order.id);
    }
    assert_eq!(db.products().stock_level(product_id).await.unwrap().stock, 0);

    let mut voids = Vec::new();
    for order_id in order_ids.iter().copied() {
        let db = db.clone();
        voids.push(tokio::spawn(async move { db.orders().void(order_id).await }));
    }
    // Every order is voided twice; exactly one of each pair may win.
    for order_id in order_ids.iter().copied() {
        let db = db.clone();
        voids.push(tokio::spawn(async move { db.orders().void(order_id).await }));
    }

    let mut checkouts = Vec::new();
    for _ in 0..10 {
        let db = db.clone();
        checkouts.push(tokio::spawn(async move {
            db.orders()
                .checkout(CheckoutRequest::new(vec![CheckoutItem::new(product_id, 1)]))
                .await
        }));
    }

    let mut voided = 0i64;
    for handle in voids {
        match handle.await.unwrap() {
            Ok(_) => voided += 1,
            Err(e) => assert!(
                matches!(e.kind(), ErrorKind::Conflict | ErrorKind::Storage),
                "unexpected void error: {e}"
            ),
        }
    }
    assert!(voided <= 5);

    let mut sold = 0i64;
    for handle in checkouts {
        match handle.await.unwrap() {
            Ok(_) => sold += 1,
            Err(e) => assert!(
                matches!(e.kind(), ErrorKind::InsufficientStock | ErrorKind::Storage),
                "unexpected checkout error: {e}"
            ),
        }
    }

    // Every unit is either on the shelf or on exactly one active order.
    let left = db.products().stock_level(product_id).await.unwrap().stock;
    let active = db.reports().today().await.unwrap().total_transactions;
    assert!(left >= 0);
    assert_eq!(active, 5 - voided + sold);
    assert_eq!(left + active, 5);

    db.close().await;
}

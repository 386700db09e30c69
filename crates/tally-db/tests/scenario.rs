//! End-to-end scenarios through the public `Database` handle.

use tally_core::{
    CheckoutItem, CheckoutRequest, CoreError, DateRange, ErrorKind, NewCategory, NewProduct,
    OrderStatus, ReportSummary,
};
use tally_db::{Database, DbConfig, DbError};

async fn open() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn stock(db: &Database, id: i64) -> i64 {
    db.products().stock_level(id).await.unwrap().stock
}

fn today() -> DateRange {
    DateRange::single_day(chrono::Utc::now().date_naive())
}

#[tokio::test]
async fn sell_out_fail_void_and_void_again() {
    let db = open().await;
    let product = db
        .products()
        .insert(&NewProduct {
            name: "Nasi Goreng".to_string(),
            price: 25_000,
            stock: 5,
            category_id: None,
        })
        .await
        .unwrap();

    // Checkout 3 of 5.
    let order = db
        .orders()
        .checkout(CheckoutRequest::new(vec![CheckoutItem::new(product.id, 3)]))
        .await
        .unwrap();
    assert_eq!(order.total_amount, 75_000);
    assert_eq!(stock(&db, product.id).await, 2);

    // A second checkout of 3 sees only 2.
    let err = db
        .orders()
        .checkout(CheckoutRequest::new(vec![CheckoutItem::new(product.id, 3)]))
        .await
        .unwrap_err();
    match &err {
        DbError::Core(CoreError::InsufficientStock {
            product_name,
            available,
            requested,
            ..
        }) => {
            assert_eq!(product_name, "Nasi Goreng");
            assert_eq!(*available, 2);
            assert_eq!(*requested, 3);
        }
        other => panic!("expected insufficient stock, got {other:?}"),
    }
    assert_eq!(stock(&db, product.id).await, 2);

    // Void gives all 3 back.
    db.orders().void(order.id).await.unwrap();
    assert_eq!(stock(&db, product.id).await, 5);
    assert_eq!(
        db.orders().get_by_id(order.id).await.unwrap().status,
        OrderStatus::Void
    );

    // Second void is a conflict and changes nothing.
    let err = db.orders().void(order.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(stock(&db, product.id).await, 5);

    // Nothing active remains to report.
    let report = db.reports().today().await.unwrap();
    assert_eq!(report.total_transactions, 0);
    assert_eq!(report.total_revenue, 0);
    assert!(report.best_selling_product.is_none());

    db.close().await;
}

#[tokio::test]
async fn category_revenue_sorted_descending() {
    let db = open().await;

    // B gets the lower id, so only revenue can put A first.
    let b = db
        .categories()
        .insert(&NewCategory {
            name: "B".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let a = db
        .categories()
        .insert(&NewCategory {
            name: "A".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    let from_b = db
        .products()
        .insert(&NewProduct {
            name: "Item B".to_string(),
            price: 50,
            stock: 10,
            category_id: Some(b.id),
        })
        .await
        .unwrap();
    let from_a = db
        .products()
        .insert(&NewProduct {
            name: "Item A".to_string(),
            price: 100,
            stock: 10,
            category_id: Some(a.id),
        })
        .await
        .unwrap();

    db.orders()
        .checkout(CheckoutRequest::new(vec![
            CheckoutItem::new(from_b.id, 1),
            CheckoutItem::new(from_a.id, 1),
        ]))
        .await
        .unwrap();

    let summary = db.reports().summary(today()).await.unwrap();
    let breakdown: Vec<(&str, i64)> = summary
        .category_breakdown
        .iter()
        .map(|c| (c.category_name.as_str(), c.revenue))
        .collect();
    assert_eq!(breakdown, vec![("A", 100), ("B", 50)]);
    assert_eq!(summary.total_revenue, 150);
    assert_eq!(summary.total_transactions, 1);
}

#[tokio::test]
async fn empty_range_reports_nothing() {
    let db = open().await;
    let summary = db
        .reports()
        .summary_between(Some("2020-01-01"), Some("2020-01-31"))
        .await
        .unwrap();

    assert_eq!(summary, ReportSummary::default());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "total_revenue": 0,
            "total_transactions": 0,
            "best_selling_product": null,
            "category_breakdown": []
        })
    );
}

#[tokio::test]
async fn checkout_request_from_json() {
    let db = open().await;
    let product = db
        .products()
        .insert(&NewProduct {
            name: "Es Jeruk".to_string(),
            price: 8_000,
            stock: 20,
            category_id: None,
        })
        .await
        .unwrap();

    let body = format!(
        r#"{{"items":[{{"product_id":{},"quantity":2}}],"payment_method":"","discount":1000,"notes":"no ice"}}"#,
        product.id
    );
    let request: CheckoutRequest = serde_json::from_str(&body).unwrap();
    let order = db.orders().checkout(request).await.unwrap();

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["payment_method"], "cash");
    assert_eq!(json["total_amount"], 15_000);
    assert_eq!(json["status"], "active");
    assert_eq!(json["details"][0]["product_name"], "Es Jeruk");
    assert_eq!(json["details"][0]["subtotal"], 16_000);
}

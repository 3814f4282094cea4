use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Currency, Engine, SendPaymentCmd, TransactionStatus};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Creates the sender (with a funded wallet) and a recipient, returning both
/// ids and the recipient email.
async fn seed_companies(engine: &Engine) -> (String, String, String) {
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    let recipient = engine
        .new_company("Partner Inc", "accounting@partner.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&sender, 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();
    (sender, recipient, "accounting@partner.com".to_string())
}

fn scheduled_cmd(from: &str, to_email: &str, amount: f64, due_in_hours: i64) -> SendPaymentCmd {
    SendPaymentCmd {
        from_company_id: from.to_string(),
        to_email: to_email.to_string(),
        amount,
        currency: Currency::Usdc,
        exchange_rate: None,
        description: Some("Scheduled payment".to_string()),
        scheduled_for: Some(Utc::now() + Duration::hours(due_in_hours)),
    }
}

#[tokio::test]
async fn due_scheduled_payment_settles_into_the_balance() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, -24), Utc::now())
        .await
        .unwrap();

    let balance = engine.balance(&sender, true, Utc::now()).await.unwrap();
    assert_eq!(balance, 9_000.0);

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].status, TransactionStatus::Completed);
}

#[tokio::test]
async fn future_scheduled_payment_stays_pending() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, 24), Utc::now())
        .await
        .unwrap();

    let balance = engine.balance(&sender, true, Utc::now()).await.unwrap();
    assert_eq!(balance, 10_000.0);

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert_eq!(transactions[0].status, TransactionStatus::Pending);
}

#[tokio::test]
async fn sweep_settles_only_what_is_due() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    let due_id = engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, -24), Utc::now())
        .await
        .unwrap();
    let future_id = engine
        .send_payment(scheduled_cmd(&sender, &email, 500.0, 24), Utc::now())
        .await
        .unwrap();

    let processed = engine.process_scheduled_payments(Utc::now()).await.unwrap();
    assert_eq!(processed, vec![due_id]);

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    let future = transactions.iter().find(|tx| tx.id == future_id).unwrap();
    assert_eq!(future.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, -48), Utc::now())
        .await
        .unwrap();
    engine
        .send_payment(scheduled_cmd(&sender, &email, 500.0, -24), Utc::now())
        .await
        .unwrap();

    let first = engine.process_scheduled_payments(Utc::now()).await.unwrap();
    assert_eq!(first.len(), 2);

    let second = engine.process_scheduled_payments(Utc::now()).await.unwrap();
    assert!(second.is_empty());
}

#[tokio::test]
async fn sweep_only_rewrites_the_status() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, -24), Utc::now())
        .await
        .unwrap();

    let before = engine.transactions_for_company(&sender).await.unwrap();
    engine.process_scheduled_payments(Utc::now()).await.unwrap();
    let after = engine.transactions_for_company(&sender).await.unwrap();

    let (before, after) = (&before[0], &after[0]);
    assert_eq!(before.status, TransactionStatus::Pending);
    assert_eq!(after.status, TransactionStatus::Completed);

    assert_eq!(after.id, before.id);
    assert_eq!(after.kind, before.kind);
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.currency, before.currency);
    assert_eq!(after.from_company_id, before.from_company_id);
    assert_eq!(after.to_company_id, before.to_company_id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.scheduled_for, before.scheduled_for);
    assert_eq!(after.description, before.description);
}

#[tokio::test]
async fn sweep_ignores_unscheduled_pending_rows() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, _email) = seed_companies(&engine).await;

    // A withdrawal is pending but has no scheduled_for; the sweep must leave
    // it alone.
    engine
        .withdraw(&sender, 1_000.0, "0xabcdef123456", Utc::now())
        .await
        .unwrap();

    let processed = engine.process_scheduled_payments(Utc::now()).await.unwrap();
    assert!(processed.is_empty());

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert_eq!(transactions[0].status, TransactionStatus::Pending);
    assert_eq!(engine.balance(&sender, true, Utc::now()).await.unwrap(), 10_000.0);
}

#[tokio::test]
async fn foreign_scheduled_payment_settles_at_the_stored_rate() {
    let (engine, _db) = engine_with_db().await;
    let (sender, _recipient, email) = seed_companies(&engine).await;

    let mut cmd = scheduled_cmd(&sender, &email, 1.0, -24);
    cmd.currency = Currency::Eth;
    cmd.exchange_rate = Some(3_000.0);
    engine.send_payment(cmd, Utc::now()).await.unwrap();

    let balance = engine.balance(&sender, true, Utc::now()).await.unwrap();
    assert_eq!(balance, 7_000.0);
}

#[tokio::test]
async fn due_listing_covers_both_directions() {
    let (engine, _db) = engine_with_db().await;
    let (sender, recipient, email) = seed_companies(&engine).await;

    // Outgoing due payment for the sender.
    let outgoing_id = engine
        .send_payment(scheduled_cmd(&sender, &email, 1_000.0, -24), Utc::now())
        .await
        .unwrap();
    // Incoming due payment: the recipient schedules one back to the sender.
    let incoming_id = engine
        .send_payment(
            scheduled_cmd(&recipient, "finance@mycompany.com", 500.0, -12),
            Utc::now(),
        )
        .await
        .unwrap();
    // A future one must not show up.
    engine
        .send_payment(scheduled_cmd(&sender, &email, 250.0, 24), Utc::now())
        .await
        .unwrap();

    let due = engine
        .due_scheduled_payments(&sender, Utc::now())
        .await
        .unwrap();
    let mut ids: Vec<_> = due.iter().map(|tx| tx.id).collect();
    ids.sort();
    let mut expected = vec![outgoing_id, incoming_id];
    expected.sort();
    assert_eq!(ids, expected);
}

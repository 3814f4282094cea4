use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Currency, Engine, EngineError, PaymentRequestCmd, RequestStatus, SendPaymentCmd,
    TransactionKind, TransactionStatus, WITHDRAWAL_NETWORK_FEE,
};
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

fn immediate_cmd(from: &str, to_email: &str, amount: f64) -> SendPaymentCmd {
    SendPaymentCmd {
        from_company_id: from.to_string(),
        to_email: to_email.to_string(),
        amount,
        currency: Currency::Usd,
        exchange_rate: None,
        description: Some("Invoice 42".to_string()),
        scheduled_for: None,
    }
}

#[tokio::test]
async fn immediate_send_writes_both_halves() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&sender, 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();
    engine
        .new_company("Partner Inc", "accounting@partner.com", None)
        .await
        .unwrap();

    engine
        .send_payment(
            immediate_cmd(&sender, "accounting@partner.com", 1_000.0),
            Utc::now(),
        )
        .await
        .unwrap();

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert_eq!(transactions.len(), 2);
    assert!(
        transactions
            .iter()
            .all(|tx| tx.status == TransactionStatus::Completed)
    );
    assert!(
        transactions
            .iter()
            .any(|tx| matches!(tx.kind, TransactionKind::PaymentSent { .. }))
    );
    assert!(
        transactions
            .iter()
            .any(|tx| matches!(tx.kind, TransactionKind::PaymentReceived { .. }))
    );
}

#[tokio::test]
async fn immediate_send_needs_funds() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&sender, 100.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let err = engine
        .send_payment(
            immediate_cmd(&sender, "accounting@partner.com", 1_000.0),
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientFunds(sender.clone()));

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn scheduled_send_skips_the_funds_check() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&sender, 100.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let mut cmd = immediate_cmd(&sender, "accounting@partner.com", 1_000.0);
    cmd.scheduled_for = Some(Utc::now() + Duration::days(3));
    engine.send_payment(cmd, Utc::now()).await.unwrap();

    let transactions = engine.transactions_for_company(&sender).await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].status, TransactionStatus::Pending);
    assert!(transactions[0].scheduled_for.is_some());
}

#[tokio::test]
async fn sending_to_an_unknown_email_creates_a_stub_company() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&sender, 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    engine
        .send_payment(immediate_cmd(&sender, "billing@vendor.com", 100.0), Utc::now())
        .await
        .unwrap();

    let stub = engine
        .company_by_email("billing@vendor.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stub.name, "New Company");
}

#[tokio::test]
async fn self_payment_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();

    let err = engine
        .send_payment(
            immediate_cmd(&sender, "finance@mycompany.com", 100.0),
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let sender = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();

    for amount in [0.0, -5.0, f64::NAN] {
        let err = engine
            .send_payment(
                immediate_cmd(&sender, "accounting@partner.com", amount),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn duplicate_company_email_conflicts() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap();

    let err = engine
        .new_company("Impostor Ltd", "finance@mycompany.com", None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("finance@mycompany.com".to_string())
    );
}

#[tokio::test]
async fn one_wallet_per_company() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_wallet("company-1", 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let err = engine
        .new_wallet("company-1", 0.0, Currency::Usdc, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("company-1".to_string()));
}

#[tokio::test]
async fn withdrawal_is_written_pending_with_the_flat_fee() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_wallet("company-1", 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    engine
        .withdraw("company-1", 1_000.0, "0xabcdef123456", Utc::now())
        .await
        .unwrap();

    let transactions = engine.transactions_for_company("company-1").await.unwrap();
    assert_eq!(transactions.len(), 1);
    let tx = &transactions[0];
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert!(matches!(
        tx.kind,
        TransactionKind::Withdrawal { network_fee: Some(fee), .. } if fee == WITHDRAWAL_NETWORK_FEE
    ));

    // Pending withdrawals do not touch the balance yet.
    let balance = engine.balance("company-1", true, Utc::now()).await.unwrap();
    assert_eq!(balance, 10_000.0);
}

#[tokio::test]
async fn withdrawal_over_balance_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .new_wallet("company-1", 100.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let err = engine
        .withdraw("company-1", 1_000.0, "0xabcdef123456", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientFunds("company-1".to_string()));
}

async fn seed_request(engine: &Engine) -> (String, String, uuid::Uuid) {
    let requester = engine
        .new_company("Partner Inc", "accounting@partner.com", None)
        .await
        .unwrap()
        .to_string();
    let payer = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&payer, 10_000.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let request_id = engine
        .create_payment_request(
            PaymentRequestCmd {
                from_company_id: requester.clone(),
                to_email: "finance@mycompany.com".to_string(),
                to_company_name: None,
                amount: 3_000.0,
                currency: Currency::Usdc,
                due_date: Utc::now() + Duration::days(7),
            },
            Utc::now(),
        )
        .await
        .unwrap();

    (requester, payer, request_id)
}

#[tokio::test]
async fn accepting_a_request_pays_it() {
    let (engine, _db) = engine_with_db().await;
    let (_requester, payer, request_id) = seed_request(&engine).await;

    engine
        .accept_payment_request(request_id, &payer, Utc::now())
        .await
        .unwrap();

    let request = engine.payment_request(request_id, &payer).await.unwrap();
    assert_eq!(request.status, RequestStatus::Paid);

    // Both halves of the settlement carry the request id.
    let transactions = engine.transactions_for_company(&payer).await.unwrap();
    let tagged: Vec<_> = transactions
        .iter()
        .filter(|tx| tx.kind.request_id() == Some(request_id))
        .collect();
    assert_eq!(tagged.len(), 2);
    assert!(
        tagged
            .iter()
            .all(|tx| tx.status == TransactionStatus::Completed)
    );
}

#[tokio::test]
async fn accepting_twice_fails() {
    let (engine, _db) = engine_with_db().await;
    let (_requester, payer, request_id) = seed_request(&engine).await;

    engine
        .accept_payment_request(request_id, &payer, Utc::now())
        .await
        .unwrap();
    let err = engine
        .accept_payment_request(request_id, &payer, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
}

#[tokio::test]
async fn accepting_needs_funds() {
    let (engine, _db) = engine_with_db().await;
    let requester = engine
        .new_company("Partner Inc", "accounting@partner.com", None)
        .await
        .unwrap()
        .to_string();
    let payer = engine
        .new_company("My Company LLC", "finance@mycompany.com", None)
        .await
        .unwrap()
        .to_string();
    engine
        .new_wallet(&payer, 100.0, Currency::Usdc, Utc::now())
        .await
        .unwrap();

    let request_id = engine
        .create_payment_request(
            PaymentRequestCmd {
                from_company_id: requester,
                to_email: "finance@mycompany.com".to_string(),
                to_company_name: None,
                amount: 3_000.0,
                currency: Currency::Usdc,
                due_date: Utc::now() + Duration::days(7),
            },
            Utc::now(),
        )
        .await
        .unwrap();

    let err = engine
        .accept_payment_request(request_id, &payer, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientFunds(payer.clone()));

    let request = engine.payment_request(request_id, &payer).await.unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn rejecting_works_only_from_pending() {
    let (engine, _db) = engine_with_db().await;
    let (_requester, payer, request_id) = seed_request(&engine).await;

    engine
        .reject_payment_request(request_id, &payer)
        .await
        .unwrap();
    let request = engine.payment_request(request_id, &payer).await.unwrap();
    assert_eq!(request.status, RequestStatus::Rejected);

    let err = engine
        .reject_payment_request(request_id, &payer)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidStatus(_)));
}

#[tokio::test]
async fn requests_are_scoped_to_their_companies() {
    let (engine, _db) = engine_with_db().await;
    let (_requester, _payer, request_id) = seed_request(&engine).await;
    let outsider = engine
        .new_company("Vendor Corp", "billing@vendor.com", None)
        .await
        .unwrap()
        .to_string();

    let err = engine
        .payment_request(request_id, &outsider)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .accept_payment_request(request_id, &outsider, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn requests_list_covers_both_directions() {
    let (engine, _db) = engine_with_db().await;
    let (requester, payer, request_id) = seed_request(&engine).await;

    let for_requester = engine
        .payment_requests_for_company(&requester)
        .await
        .unwrap();
    let for_payer = engine.payment_requests_for_company(&payer).await.unwrap();

    assert_eq!(for_requester.len(), 1);
    assert_eq!(for_payer.len(), 1);
    assert_eq!(for_requester[0].id, request_id);
    assert_eq!(for_payer[0].id, request_id);
}

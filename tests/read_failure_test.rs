use common::{FaultyStore, id};
use wallet_ledger::application::service::WalletService;
use wallet_ledger::domain::ports::LedgerStore;
use wallet_ledger::domain::operation::{PublishRequest, TransferRequest};
use wallet_ledger::domain::wallet::{AccountId, Amount, MovementCode};
use wallet_ledger::error::ErrorKind;

mod common;

async fn funded_pair(store: &FaultyStore) -> WalletService {
    let service = WalletService::new(Box::new(store.clone()));
    service.init_wallet(id("1")).await.unwrap();
    service.init_wallet(id("2")).await.unwrap();
    service
        .publish(PublishRequest {
            target: id("1"),
            issuer: id("admin"),
            amount: Amount::new(100),
            occurred_on: "20181212".to_string(),
        })
        .await
        .unwrap();
    service
}

async fn versions(store: &FaultyStore, key: &AccountId) -> usize {
    store.inner.history(key).await.unwrap().count()
}

#[tokio::test]
async fn test_read_failure_is_storage_not_missing() {
    let store = FaultyStore::new();
    let service = funded_pair(&store).await;
    store.fail_reads(true);

    let err = service.get_account(&id("1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    // A wallet that was never created fails the same way while reads are down.
    let err = service.get_account(&id("9")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    store.fail_reads(false);
    assert_eq!(service.get_account(&id("1")).await.unwrap(), "100");
}

#[tokio::test]
async fn test_publish_read_failure_writes_nothing() {
    let store = FaultyStore::new();
    let service = funded_pair(&store).await;
    store.fail_reads(true);

    let err = service
        .publish(PublishRequest {
            target: id("1"),
            issuer: id("admin"),
            amount: Amount::new(50),
            occurred_on: "20181213".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    store.fail_reads(false);
    assert_eq!(versions(&store, &id("1")).await, 2);
    assert_eq!(service.get_account(&id("1")).await.unwrap(), "100");
}

#[tokio::test]
async fn test_transfer_read_failure_writes_nothing() {
    let store = FaultyStore::new();
    let service = funded_pair(&store).await;
    store.fail_reads(true);

    let err = service
        .transfer(TransferRequest {
            source: id("1"),
            destination: id("2"),
            amount: Amount::new(30),
            code: MovementCode::new(5),
            occurred_on: "20181212".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);

    store.fail_reads(false);
    assert_eq!(versions(&store, &id("1")).await, 2);
    assert_eq!(versions(&store, &id("2")).await, 1);
    assert_eq!(service.get_account(&id("1")).await.unwrap(), "100");
    assert_eq!(service.get_account(&id("2")).await.unwrap(), "0");
}

#[tokio::test]
async fn test_history_failure_is_storage() {
    let store = FaultyStore::new();
    let service = funded_pair(&store).await;
    store.fail_history(true);

    let err = service.get_tx_list(&id("1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    // Point reads are unaffected.
    assert_eq!(service.get_account(&id("1")).await.unwrap(), "100");

    store.fail_history(false);
    assert_eq!(service.get_tx_list(&id("1")).await.unwrap().len(), 2);
}

use common::id;
use wallet_ledger::application::service::WalletService;
use wallet_ledger::domain::codec;
use wallet_ledger::domain::engine;
use wallet_ledger::domain::operation::TransferRequest;
use wallet_ledger::domain::ports::{LedgerStore, LedgerStoreBox, LedgerStoreFactory};
use wallet_ledger::domain::wallet::{Account, Amount, MovementCode};
use wallet_ledger::infrastructure::in_memory::InMemoryLedgerStore;

mod common;

fn transfer(source: &str, destination: &str, amount: u64) -> TransferRequest {
    TransferRequest {
        source: id(source),
        destination: id(destination),
        amount: Amount::new(amount),
        code: MovementCode::new(1),
        occurred_on: "20181212".to_string(),
    }
}

async fn read(store: &InMemoryLedgerStore, key: &str) -> Account {
    let bytes = store.get(&id(key)).await.unwrap().unwrap();
    codec::decode_account(&bytes).unwrap()
}

/// Two transfers planned from the same snapshot of a shared source both commit, and the
/// second blind write erases the first debit. Writes are overwrites, not compare-and-swap.
#[tokio::test]
async fn test_interleaved_transfers_lose_an_update() {
    let store = InMemoryLedgerStore::new();
    let service = WalletService::new(Box::new(store.clone()));
    for key in ["1", "2", "3"] {
        service.init_wallet(id(key)).await.unwrap();
    }
    let funded = Account {
        balance: 100,
        last_movement: None,
    };
    store
        .put(&id("1"), codec::encode_account(&funded).unwrap())
        .await
        .unwrap();

    let snapshot = read(&store, "1").await;
    let first = engine::transfer(
        &transfer("1", "2", 60),
        Some(snapshot.clone()),
        Some(read(&store, "2").await),
    )
    .unwrap();
    let second = engine::transfer(
        &transfer("1", "3", 60),
        Some(snapshot),
        Some(read(&store, "3").await),
    )
    .unwrap();

    for write in [first.debit, first.credit, second.debit, second.credit] {
        store
            .put(&write.key, codec::encode_account(&write.account).unwrap())
            .await
            .unwrap();
    }

    let total = read(&store, "1").await.balance
        + read(&store, "2").await.balance
        + read(&store, "3").await.balance;
    assert_eq!(read(&store, "1").await.balance, 40);
    assert_eq!(total, 160);
}

#[tokio::test]
async fn test_serialized_transfers_conserve() {
    let store = InMemoryLedgerStore::new();
    let service = WalletService::new(Box::new(store.clone()));
    for key in ["1", "2", "3"] {
        service.init_wallet(id(key)).await.unwrap();
    }
    let funded = Account {
        balance: 100,
        last_movement: None,
    };
    store
        .put(&id("1"), codec::encode_account(&funded).unwrap())
        .await
        .unwrap();

    service.transfer(transfer("1", "2", 60)).await.unwrap();
    assert!(service.transfer(transfer("1", "3", 60)).await.is_err());

    assert_eq!(read(&store, "1").await.balance, 40);
    assert_eq!(read(&store, "2").await.balance, 60);
    assert_eq!(read(&store, "3").await.balance, 0);
}

#[tokio::test]
async fn test_store_as_trait_object_across_tasks() {
    let factory: LedgerStoreFactory =
        Box::new(|| Box::new(InMemoryLedgerStore::new()) as LedgerStoreBox);

    let handle = tokio::spawn(async move {
        let service = WalletService::new(factory());
        service.init_wallet(id("1")).await.unwrap();
        service.get_account(&id("1")).await.unwrap()
    });

    assert_eq!(handle.await.unwrap(), "0");
}

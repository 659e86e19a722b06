//! Field-tagged JSON encoding of wallet records.
//!
//! The field names are a compatibility contract with data already held in the store:
//!
//! ```json
//! {"value":9000,"Transfer":{"fromOrTo":"2","value":1000,"date":"20181212","type":"4"}}
//! ```
//!
//! The movement is keyed `Transfer` (capitalised) because that is what existing deployments
//! persisted. The movement code travels as a decimal string, and an empty string marks a wallet
//! that has not moved yet. Missing fields decode to zero values.

use super::wallet::{Account, AccountId, Amount, HistoryEntry, MovementCode, MovementRecord};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct WalletRecord {
    value: u64,
    #[serde(rename = "Transfer", alias = "transfer")]
    transfer: TransferRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TransferRecord {
    #[serde(rename = "fromOrTo")]
    from_or_to: String,
    value: u64,
    date: String,
    #[serde(rename = "type", with = "code_text")]
    code: Option<MovementCode>,
}

#[derive(Debug, Serialize)]
struct HistoryRecord<'a> {
    #[serde(rename = "txId")]
    tx_id: &'a str,
    value: WalletRecord,
}

mod code_text {
    use super::MovementCode;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(code: &Option<MovementCode>, s: S) -> Result<S::Ok, S::Error> {
        match code {
            Some(code) => s.collect_str(code),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MovementCode>, D::Error> {
        let text = String::deserialize(d)?;
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<u32>()
            .map(|code| Some(MovementCode::new(code)))
            .map_err(|_| de::Error::custom(format!("invalid movement code '{text}'")))
    }
}

impl From<&Account> for WalletRecord {
    fn from(account: &Account) -> Self {
        let transfer = match &account.last_movement {
            Some(movement) => TransferRecord {
                from_or_to: movement.counterparty.to_string(),
                value: movement.amount.value(),
                date: movement.occurred_on.clone(),
                code: Some(movement.code),
            },
            None => TransferRecord::default(),
        };
        Self {
            value: account.balance,
            transfer,
        }
    }
}

impl From<WalletRecord> for Account {
    fn from(record: WalletRecord) -> Self {
        let TransferRecord {
            from_or_to,
            value,
            date,
            code,
        } = record.transfer;
        Self {
            balance: record.value,
            last_movement: code.map(|code| MovementRecord {
                counterparty: AccountId::from_stored(from_or_to),
                amount: Amount::new(value),
                occurred_on: date,
                code,
            }),
        }
    }
}

pub fn encode_account(account: &Account) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&WalletRecord::from(account))?)
}

pub fn decode_account(bytes: &[u8]) -> Result<Account> {
    let record: WalletRecord = serde_json::from_slice(bytes)?;
    Ok(record.into())
}

pub fn account_to_string(account: &Account) -> Result<String> {
    Ok(serde_json::to_string(&WalletRecord::from(account))?)
}

pub fn history_to_string(entries: &[HistoryEntry]) -> Result<String> {
    let records: Vec<HistoryRecord<'_>> = entries
        .iter()
        .map(|entry| HistoryRecord {
            tx_id: entry.tx_id.as_str(),
            value: WalletRecord::from(&entry.account),
        })
        .collect();
    Ok(serde_json::to_string(&records)?)
}

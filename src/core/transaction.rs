use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

// Fields are declared in name-sorted order because the block digest covers the
// serialized form and identical field sets must always hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    doctor: String,
    patient: String,
    permission: i64,
}

impl Transaction {
    pub fn new(patient: &str, doctor: &str, permission: i64) -> Transaction {
        Transaction {
            doctor: doctor.to_string(),
            patient: patient.to_string(),
            permission,
        }
    }

    pub fn get_patient(&self) -> &str {
        self.patient.as_str()
    }

    pub fn get_doctor(&self) -> &str {
        self.doctor.as_str()
    }

    pub fn get_permission(&self) -> i64 {
        self.permission
    }
}

/// Raw transaction record as supplied by a caller, before validation.
///
/// Every field is optional at this stage; `into_transaction` is the only way
/// to turn a payload into a usable `Transaction`, so a record with missing
/// fields can never reach the ledger.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionPayload {
    pub patient: Option<String>,
    pub doctor: Option<String>,
    pub permission: Option<i64>,
}

impl TransactionPayload {
    pub fn into_transaction(self) -> Result<Transaction> {
        let patient = self
            .patient
            .ok_or_else(|| LedgerError::Validation("Missing transaction field: patient".to_string()))?;
        let doctor = self
            .doctor
            .ok_or_else(|| LedgerError::Validation("Missing transaction field: doctor".to_string()))?;
        let permission = self.permission.ok_or_else(|| {
            LedgerError::Validation("Missing transaction field: permission".to_string())
        })?;
        Ok(Transaction::new(&patient, &doctor, permission))
    }
}

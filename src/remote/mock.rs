//! Scripted inventory service for tests.
//!
//! Records every call and answers mutations from per-call scripts or
//! per-item failure rules, falling back to success.

use super::service::{EquipRequest, InventoryService, TransferRequest};
use crate::core::error::RemoteError;
use crate::items::profile::Profile;
use crate::items::types::Account;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    CurrentAccount,
    FetchProfile(Account),
    Transfer(TransferRequest),
    Equip(EquipRequest),
}

pub struct MockInventoryService {
    profile: Profile,
    transfer_script: Mutex<VecDeque<Result<(), RemoteError>>>,
    equip_script: Mutex<VecDeque<Result<(), RemoteError>>>,
    transfer_failures: Mutex<HashMap<String, RemoteError>>,
    equip_failures: Mutex<HashMap<String, RemoteError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockInventoryService {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            transfer_script: Mutex::new(VecDeque::new()),
            equip_script: Mutex::new(VecDeque::new()),
            transfer_failures: Mutex::new(HashMap::new()),
            equip_failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues responses for the next transfer calls, in order.
    pub fn script_transfers(
        self,
        responses: impl IntoIterator<Item = Result<(), RemoteError>>,
    ) -> Self {
        lock(&self.transfer_script).extend(responses);
        self
    }

    /// Queues responses for the next equip calls, in order.
    pub fn script_equips(
        self,
        responses: impl IntoIterator<Item = Result<(), RemoteError>>,
    ) -> Self {
        lock(&self.equip_script).extend(responses);
        self
    }

    /// Every transfer of `item_id` fails with `error`.
    pub fn fail_transfers_of(self, item_id: &str, error: RemoteError) -> Self {
        lock(&self.transfer_failures).insert(item_id.to_string(), error);
        self
    }

    /// Every equip of `item_id` fails with `error`.
    pub fn fail_equips_of(self, item_id: &str, error: RemoteError) -> Self {
        lock(&self.equip_failures).insert(item_id.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn transfers(&self) -> Vec<TransferRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Transfer(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn equips(&self) -> Vec<EquipRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Equip(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }

    fn respond(
        script: &Mutex<VecDeque<Result<(), RemoteError>>>,
        failures: &Mutex<HashMap<String, RemoteError>>,
        item_id: &str,
    ) -> Result<(), RemoteError> {
        if let Some(error) = lock(failures).get(item_id) {
            return Err(error.clone());
        }
        lock(script).pop_front().unwrap_or(Ok(()))
    }
}

impl InventoryService for MockInventoryService {
    fn current_account(&self) -> Result<Account, RemoteError> {
        self.record(RecordedCall::CurrentAccount);
        Ok(self.profile.account().clone())
    }

    fn fetch_profile(&self, account: &Account) -> Result<Profile, RemoteError> {
        self.record(RecordedCall::FetchProfile(account.clone()));
        Ok(self.profile.clone())
    }

    fn transfer_item(&self, request: &TransferRequest) -> Result<(), RemoteError> {
        self.record(RecordedCall::Transfer(request.clone()));
        Self::respond(&self.transfer_script, &self.transfer_failures, &request.item_id)
    }

    fn equip_item(&self, request: &EquipRequest) -> Result<(), RemoteError> {
        self.record(RecordedCall::Equip(request.clone()));
        Self::respond(&self.equip_script, &self.equip_failures, &request.item_id)
    }
}

use super::pool::ClientPool;
use super::service::{EquipRequest, InventoryService, TransferRequest};
use super::wire::{Envelope, MembershipsResponse, ProfileResponse};
use crate::core::config::Config;
use crate::core::constants::{API_KEY_HEADER, DEFAULT_BASE_URL, PROFILE_COMPONENTS};
use crate::core::error::{ConfigError, RemoteError};
use crate::items::profile::Profile;
use crate::items::types::Account;
use crate::lookup::ItemLookup;
use reqwest::blocking::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// HTTP implementation of [`InventoryService`] over a shared client pool.
///
/// Each call takes the next pooled client and carries the API key and the
/// player's bearer token.
pub struct BungieClient {
    pool: Arc<ClientPool>,
    api_key: String,
    access_token: String,
    base_url: String,
    lookup: Arc<dyn ItemLookup>,
}

impl BungieClient {
    pub fn new(
        pool: Arc<ClientPool>,
        api_key: impl Into<String>,
        access_token: impl Into<String>,
        lookup: Arc<dyn ItemLookup>,
    ) -> Self {
        Self {
            pool,
            api_key: api_key.into(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lookup,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fails when the configuration carries no API key.
    pub fn from_config(
        config: &Config,
        pool: Arc<ClientPool>,
        access_token: impl Into<String>,
        lookup: Arc<dyn ItemLookup>,
    ) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("api_key"))?;
        Ok(Self::new(pool, api_key, access_token, lookup).with_base_url(config.base_url.as_str()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let request = self.pool.acquire().get(self.url(path));
        self.send::<T>(request)?.into_result()
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        let request = self.pool.acquire().post(self.url(path)).json(body);
        self.send::<serde_json::Value>(request)?.into_unit()
    }

    fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, RemoteError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(&self.access_token)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(%status, bytes = body.len(), "response received");

        // Error statuses usually still carry an envelope; fall back to the HTTP status.
        serde_json::from_str(&body).map_err(|err| {
            if status.is_success() {
                RemoteError::Decode(err.to_string())
            } else {
                RemoteError::Transport(format!("HTTP {}", status))
            }
        })
    }
}

impl InventoryService for BungieClient {
    #[instrument(skip(self))]
    fn current_account(&self) -> Result<Account, RemoteError> {
        self.get::<MembershipsResponse>("/User/GetMembershipsForCurrentUser/")?
            .into_account()
    }

    #[instrument(skip(self), fields(membership_id = %account.membership_id))]
    fn fetch_profile(&self, account: &Account) -> Result<Profile, RemoteError> {
        let path = format!(
            "/Destiny2/{}/Profile/{}/?components={}",
            account.membership_type, account.membership_id, PROFILE_COMPONENTS
        );
        self.get::<ProfileResponse>(&path)?
            .into_profile(account, self.lookup.as_ref())
    }

    #[instrument(
        skip(self, request),
        fields(item_id = %request.item_id, to_vault = request.transfer_to_vault)
    )]
    fn transfer_item(&self, request: &TransferRequest) -> Result<(), RemoteError> {
        self.post("/Destiny2/Actions/Items/TransferItem/", request)
    }

    #[instrument(
        skip(self, request),
        fields(item_id = %request.item_id, character_id = %request.character_id)
    )]
    fn equip_item(&self, request: &EquipRequest) -> Result<(), RemoteError> {
        self.post("/Destiny2/Actions/Items/EquipItem/", request)
    }
}

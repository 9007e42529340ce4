//! Recording mock for the engine port, used by console and dispatch tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use url::Url;

use super::engine::*;

/// Mock engine that records every call and serves canned data.
#[derive(Debug, Default)]
pub struct MockEngine {
    calls: Arc<Mutex<Vec<String>>>,
    games: Vec<GameInfo>,
    licenses: Vec<LicenseInfo>,
    offers: Vec<TradeOffer>,
    items: Vec<InventoryItem>,
    cloud: Vec<CloudApp>,
    playing: Vec<AppId>,
    logged_in: bool,
    fail_trades: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            logged_in: true,
            ..Self::default()
        }
    }

    /// Handle to the recorded calls; clone before moving the engine into a worker.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    pub fn with_game(mut self, app_id: u32, name: &str) -> Self {
        self.games.push(GameInfo {
            app_id: AppId(app_id),
            name: name.to_string(),
            playtime_minutes: 0,
            last_played: None,
            is_dlc: false,
            adult: false,
            early_access: false,
            cards_remaining: 0,
        });
        self
    }

    pub fn with_license(mut self, package_id: u32, apps: Vec<u32>) -> Self {
        self.licenses.push(LicenseInfo {
            package_id: PackageId(package_id),
            apps: apps.into_iter().map(AppId).collect(),
            purchased: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            payment_method: None,
        });
        self
    }

    pub fn with_offer(mut self, id: u64, direction: TradeDirection) -> Self {
        self.offers.push(TradeOffer {
            id: TradeOfferId(id),
            direction,
            partner: "partner".to_string(),
            items_to_give: 1,
            items_to_receive: 1,
        });
        self
    }

    pub fn with_item(mut self, name: &str, tradable: bool) -> Self {
        self.items.push(InventoryItem {
            class_id: self.items.len() as u64 + 1,
            name: name.to_string(),
            item_type: "Trading Card".to_string(),
            amount: 1,
            tradable,
        });
        self
    }

    pub fn failing_trades(mut self) -> Self {
        self.fail_trades = true;
        self
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl BotEngine for MockEngine {
    fn login_status(&self) -> LoginStatus {
        if self.logged_in {
            LoginStatus::LoggedIn
        } else {
            LoginStatus::LoggedOut
        }
    }

    fn playing(&self) -> Vec<AppId> {
        self.playing.clone()
    }

    async fn owned_games(&self) -> Vec<GameInfo> {
        self.record("owned_games");
        self.games.clone()
    }

    async fn licenses(&self) -> Vec<LicenseInfo> {
        self.record("licenses");
        self.licenses.clone()
    }

    async fn add_license(&mut self, package: PackageId) -> Result<(), EngineError> {
        self.record(format!("add_license {package}"));
        Ok(())
    }

    async fn add_app(&mut self, app: AppId) -> Result<Vec<PackageId>, EngineError> {
        self.record(format!("add_app {app}"));
        Ok(vec![PackageId(app.0)])
    }

    async fn play_game(&mut self, app: AppId) -> Result<(), EngineError> {
        self.record(format!("play_game {app}"));
        self.playing.push(app);
        Ok(())
    }

    async fn stop_game(&mut self, app: AppId) -> Result<(), EngineError> {
        self.record(format!("stop_game {app}"));
        self.playing.retain(|playing| *playing != app);
        Ok(())
    }

    async fn trade_offers(&self) -> Vec<TradeOffer> {
        self.record("trade_offers");
        self.offers.clone()
    }

    async fn respond_trade(
        &mut self,
        offer: TradeOfferId,
        action: TradeAction,
    ) -> Result<(), EngineError> {
        self.record(format!("respond_trade {offer} {action}"));
        if self.fail_trades {
            return Err(EngineError::TradeFailed {
                action,
                id: offer,
                reason: "mock failure".into(),
            });
        }
        Ok(())
    }

    async fn inventory(&self) -> Vec<InventoryItem> {
        self.record("inventory");
        self.items.clone()
    }

    async fn send_inventory(&mut self, recipient: &str) -> Result<u32, EngineError> {
        self.record(format!("send_inventory {recipient}"));
        Ok(self.items.iter().filter(|item| item.tradable).count() as u32)
    }

    async fn cloud_apps(&self) -> Vec<CloudApp> {
        self.record("cloud_apps");
        self.cloud.clone()
    }

    async fn cloud_files(&self, app: AppId) -> Result<Vec<CloudFile>, EngineError> {
        self.record(format!("cloud_files {app}"));
        Ok(Vec::new())
    }

    async fn clear_discovery_queue(&mut self) -> Result<u32, EngineError> {
        self.record("clear_discovery_queue");
        Ok(12)
    }

    async fn view_stream(&mut self, url: Option<&Url>) -> Result<(), EngineError> {
        match url {
            Some(url) => self.record(format!("view_stream {url}")),
            None => self.record("view_stream"),
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        self.record("shutdown");
        self.logged_in = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mut mock = MockEngine::new().with_game(440, "Team Fortress 2");
        let calls = mock.calls_handle();

        let games = mock.owned_games().await;
        assert_eq!(games.len(), 1);
        mock.add_license(PackageId(303386)).await.unwrap();

        let recorded = calls.lock().unwrap().clone();
        assert_eq!(recorded, vec!["owned_games", "add_license 303386"]);
    }

    #[tokio::test]
    async fn test_mock_trade_failure() {
        let mut mock = MockEngine::new().failing_trades();
        let result = mock.respond_trade(TradeOfferId(7), TradeAction::Accept).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_play_updates_playing() {
        let mut mock = MockEngine::new();
        mock.play_game(AppId(440)).await.unwrap();
        assert_eq!(mock.playing(), vec![AppId(440)]);
        mock.stop_game(AppId(440)).await.unwrap();
        assert!(mock.playing().is_empty());
    }
}

//! Simulated engine
//!
//! Stand-in for the real protocol engine so the console can be exercised
//! end to end without network access. Every account gets a small fake
//! library; mutating calls log what a real engine would have done.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use url::Url;

use crate::ports::engine::*;

/// Deterministic per-account fake engine. Accounts with the same name get
/// the same library, which makes interactive behavior reproducible.
pub struct SimEngine {
    account: String,
    games: Vec<GameInfo>,
    licenses: Vec<LicenseInfo>,
    offers: Vec<TradeOffer>,
    items: Vec<InventoryItem>,
    cloud: Vec<CloudApp>,
    playing: Vec<AppId>,
    logged_in: bool,
}

impl SimEngine {
    pub fn new(account: &str) -> Self {
        let seed = account.bytes().fold(0u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64));
        let mut rng = StdRng::seed_from_u64(seed);

        let catalog: [(u32, &str, bool, bool); 6] = [
            (440, "Team Fortress 2", false, false),
            (570, "Dota 2", false, false),
            (620, "Portal 2", false, false),
            (632_470, "Disco Elysium", true, false),
            (1_245_620, "Elden Ring", true, false),
            (250_900, "The Binding of Isaac: Rebirth", false, true),
        ];

        let now = Utc::now();
        let mut games = Vec::new();
        let mut licenses = Vec::new();
        for (app_id, name, adult, early_access) in catalog {
            if rng.gen_bool(0.7) {
                let playtime_minutes = rng.gen_range(0..9_000);
                games.push(GameInfo {
                    app_id: AppId(app_id),
                    name: name.to_string(),
                    playtime_minutes,
                    last_played: (playtime_minutes > 0)
                        .then(|| now - ChronoDuration::days(rng.gen_range(1..400))),
                    is_dlc: false,
                    adult,
                    early_access,
                    cards_remaining: rng.gen_range(0..4),
                });
                licenses.push(LicenseInfo {
                    package_id: PackageId(app_id / 2),
                    apps: vec![AppId(app_id)],
                    purchased: now - ChronoDuration::days(rng.gen_range(30..2_000)),
                    payment_method: rng.gen_bool(0.5).then(|| "ActivationCode".to_string()),
                });
            }
        }

        let items = (0..rng.gen_range(2..8))
            .map(|index| InventoryItem {
                class_id: rng.gen_range(1_000_000..9_999_999),
                name: format!("Trading Card #{index}"),
                item_type: "Trading Card".to_string(),
                amount: 1,
                tradable: rng.gen_bool(0.8),
            })
            .collect();

        let cloud = games
            .iter()
            .filter_map(|game| {
                rng.gen_bool(0.5).then(|| CloudApp {
                    app_id: game.app_id,
                    name: game.name.clone(),
                    file_count: rng.gen_range(1..40),
                    total_bytes: rng.gen_range(10_000..5_000_000),
                })
            })
            .collect();

        Self {
            account: account.to_string(),
            games,
            licenses,
            offers: Vec::new(),
            items,
            cloud,
            playing: Vec::new(),
            logged_in: true,
        }
    }

    fn owned(&self, app: AppId) -> bool {
        self.games.iter().any(|game| game.app_id == app)
    }
}

#[async_trait]
impl BotEngine for SimEngine {
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
        self.games.clone()
    }

    async fn licenses(&self) -> Vec<LicenseInfo> {
        self.licenses.clone()
    }

    async fn add_license(&mut self, package: PackageId) -> Result<(), EngineError> {
        tracing::info!(account = %self.account, %package, "adding license package");
        if self.licenses.iter().any(|license| license.package_id == package) {
            return Err(EngineError::Rejected(format!("package {package} already owned")));
        }
        self.licenses.push(LicenseInfo {
            package_id: package,
            apps: Vec::new(),
            purchased: Utc::now(),
            payment_method: None,
        });
        Ok(())
    }

    async fn add_app(&mut self, app: AppId) -> Result<Vec<PackageId>, EngineError> {
        tracing::info!(account = %self.account, %app, "requesting app license");
        let package = PackageId(app.0);
        self.licenses.push(LicenseInfo {
            package_id: package,
            apps: vec![app],
            purchased: Utc::now(),
            payment_method: None,
        });
        Ok(vec![package])
    }

    async fn play_game(&mut self, app: AppId) -> Result<(), EngineError> {
        if !self.owned(app) {
            return Err(EngineError::UnknownApp(app));
        }
        if !self.playing.contains(&app) {
            self.playing.push(app);
        }
        tracing::info!(account = %self.account, %app, "now playing");
        Ok(())
    }

    async fn stop_game(&mut self, app: AppId) -> Result<(), EngineError> {
        self.playing.retain(|playing| *playing != app);
        tracing::info!(account = %self.account, %app, "stopped playing");
        Ok(())
    }

    async fn trade_offers(&self) -> Vec<TradeOffer> {
        self.offers.clone()
    }

    async fn respond_trade(
        &mut self,
        offer: TradeOfferId,
        action: TradeAction,
    ) -> Result<(), EngineError> {
        let index = self
            .offers
            .iter()
            .position(|pending| pending.id == offer)
            .ok_or(EngineError::UnknownTradeOffer(offer))?;
        self.offers.remove(index);
        tracing::info!(account = %self.account, %offer, %action, "trade offer handled");
        Ok(())
    }

    async fn inventory(&self) -> Vec<InventoryItem> {
        self.items.clone()
    }

    async fn send_inventory(&mut self, recipient: &str) -> Result<u32, EngineError> {
        let sent = self.items.iter().filter(|item| item.tradable).count() as u32;
        self.items.retain(|item| !item.tradable);
        tracing::info!(account = %self.account, recipient, sent, "sent tradable inventory");
        Ok(sent)
    }

    async fn cloud_apps(&self) -> Vec<CloudApp> {
        self.cloud.clone()
    }

    async fn cloud_files(&self, app: AppId) -> Result<Vec<CloudFile>, EngineError> {
        let entry = self
            .cloud
            .iter()
            .find(|cloud| cloud.app_id == app)
            .ok_or(EngineError::UnknownApp(app))?;
        let per_file = entry.total_bytes / entry.file_count.max(1) as u64;
        Ok((0..entry.file_count)
            .map(|index| CloudFile {
                name: format!("save/slot{index}.dat"),
                size: per_file,
                modified: Utc::now(),
            })
            .collect())
    }

    async fn clear_discovery_queue(&mut self) -> Result<u32, EngineError> {
        tracing::info!(account = %self.account, "cleared discovery queue");
        Ok(12)
    }

    async fn view_stream(&mut self, url: Option<&Url>) -> Result<(), EngineError> {
        match url {
            Some(url) => tracing::info!(account = %self.account, %url, "viewing stream"),
            None => tracing::info!(account = %self.account, "viewing default stream page"),
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        self.logged_in = false;
        self.playing.clear();
        tracing::info!(account = %self.account, "engine logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_account_gets_same_library() {
        let first = SimEngine::new("alpha");
        let second = SimEngine::new("alpha");
        let names = |engine: &SimEngine| {
            engine.games.iter().map(|game| game.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
    }

    #[tokio::test]
    async fn test_play_unknown_app_fails() {
        let mut engine = SimEngine::new("alpha");
        let result = engine.play_game(AppId(1)).await;
        assert!(matches!(result, Err(EngineError::UnknownApp(AppId(1)))));
    }

    #[tokio::test]
    async fn test_send_inventory_drains_tradable_items() {
        let mut engine = SimEngine::new("alpha");
        let tradable = engine.items.iter().filter(|item| item.tradable).count() as u32;
        let sent = engine.send_inventory("bravo").await.unwrap();
        assert_eq!(sent, tradable);
        assert!(engine.inventory().await.iter().all(|item| !item.tradable));
    }
}

//! Engine port
//!
//! The console never talks to the account platform directly; everything it
//! needs from a running session goes through [`BotEngine`]. One engine
//! instance belongs to exactly one account worker, which is why mutating
//! operations take `&mut self` without further locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId(pub u32);

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageId(pub u32);

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeOfferId(pub u64);

impl std::fmt::Display for TradeOfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    LoggedIn,
    LoggedOut,
}

impl std::fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoggedIn => write!(f, "logged in"),
            Self::LoggedOut => write!(f, "logged out"),
        }
    }
}

/// One entry of the account's game library.
#[derive(Debug, Clone)]
pub struct GameInfo {
    pub app_id: AppId,
    pub name: String,
    pub playtime_minutes: u32,
    pub last_played: Option<DateTime<Utc>>,
    pub is_dlc: bool,
    pub adult: bool,
    pub early_access: bool,
    /// Trading cards still droppable for this game.
    pub cards_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct LicenseInfo {
    pub package_id: PackageId,
    /// Apps this license grants access to.
    pub apps: Vec<AppId>,
    pub purchased: DateTime<Utc>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Incoming,
    Outgoing,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incoming => write!(f, "incoming"),
            Self::Outgoing => write!(f, "outgoing"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TradeOffer {
    pub id: TradeOfferId,
    pub direction: TradeDirection,
    pub partner: String,
    pub items_to_give: u32,
    pub items_to_receive: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Accept,
    Decline,
    Cancel,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Decline => write!(f, "decline"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub class_id: u64,
    pub name: String,
    pub item_type: String,
    pub amount: u32,
    pub tradable: bool,
}

/// Per-app cloud storage summary.
#[derive(Debug, Clone)]
pub struct CloudApp {
    pub app_id: AppId,
    pub name: String,
    pub file_count: u32,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct CloudFile {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("unknown app {0}")]
    UnknownApp(AppId),
    #[error("unknown trade offer {0}")]
    UnknownTradeOffer(TradeOfferId),
    #[error("failed to {action} trade offer {id}: {reason}")]
    TradeFailed {
        action: TradeAction,
        id: TradeOfferId,
        reason: String,
    },
    #[error("not logged in")]
    NotLoggedIn,
}

/// Operations a live account session offers to the console. Implementations
/// live behind an account worker, one instance per running account.
#[async_trait]
pub trait BotEngine: Send {
    /// Current login state; cheap, answered from cached session state.
    fn login_status(&self) -> LoginStatus;

    /// Apps currently being played.
    fn playing(&self) -> Vec<AppId>;

    async fn owned_games(&self) -> Vec<GameInfo>;

    async fn licenses(&self) -> Vec<LicenseInfo>;

    /// Activate one license package.
    async fn add_license(&mut self, package: PackageId) -> Result<(), EngineError>;

    /// Request a free-on-demand license for an app; returns the granted
    /// packages.
    async fn add_app(&mut self, app: AppId) -> Result<Vec<PackageId>, EngineError>;

    async fn play_game(&mut self, app: AppId) -> Result<(), EngineError>;

    async fn stop_game(&mut self, app: AppId) -> Result<(), EngineError>;

    async fn trade_offers(&self) -> Vec<TradeOffer>;

    async fn respond_trade(
        &mut self,
        offer: TradeOfferId,
        action: TradeAction,
    ) -> Result<(), EngineError>;

    async fn inventory(&self) -> Vec<InventoryItem>;

    /// Offer every tradable item to `recipient`; returns how many were sent.
    async fn send_inventory(&mut self, recipient: &str) -> Result<u32, EngineError>;

    async fn cloud_apps(&self) -> Vec<CloudApp>;

    async fn cloud_files(&self, app: AppId) -> Result<Vec<CloudFile>, EngineError>;

    /// Dismiss the store discovery queue; returns how many entries were
    /// cleared.
    async fn clear_discovery_queue(&mut self) -> Result<u32, EngineError>;

    /// Register a stream view, optionally for a specific broadcast URL.
    async fn view_stream(&mut self, url: Option<&Url>) -> Result<(), EngineError>;

    /// Log out and release session resources. Called once by the worker on
    /// the way out.
    async fn shutdown(&mut self);
}

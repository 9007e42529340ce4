//! Trait abstractions between the console core and the account engine.

pub mod engine;
pub mod mocks;

pub use engine::{
    AppId, BotEngine, CloudApp, CloudFile, EngineError, GameInfo, InventoryItem, LicenseInfo,
    LoginStatus, PackageId, TradeAction, TradeDirection, TradeOffer, TradeOfferId,
};

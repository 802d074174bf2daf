//! Application settings cached from the backend's key/value store.
//!
//! Values are loaded once at startup and written through on change, so
//! reads never block on the backend.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::backend::Backend;
use crate::error::AppResult;

const TIER_KEY: &str = "tier";
const THEME_KEY: &str = "theme";
const HOURLY_RATE_KEY: &str = "default_hourly_rate";

fn default_hourly_rate() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// Subscription tier of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Premium => "premium",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "pro" => Tier::Pro,
            "premium" => Tier::Premium,
            _ => Tier::Free,
        }
    }
}

/// UI color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

#[derive(Debug, Clone)]
struct SettingsState {
    tier: Tier,
    theme: Theme,
    default_hourly_rate: Decimal,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            tier: Tier::default(),
            theme: Theme::default(),
            default_hourly_rate: default_hourly_rate(),
        }
    }
}

/// Write-through cache over the backend settings table.
pub struct SettingsStore {
    backend: Arc<dyn Backend>,
    state: Mutex<SettingsState>,
}

impl SettingsStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SettingsState::default()),
        }
    }

    /// Replace every cached value with what the backend has persisted.
    ///
    /// Unknown keys are ignored and unparseable values fall back to the
    /// defaults instead of failing the load.
    #[instrument(skip(self))]
    pub async fn load(&self) -> AppResult<()> {
        let settings = self.backend.get_all_settings().await?;

        let mut state = self.state.lock().await;
        *state = SettingsState::default();
        for setting in settings {
            match setting.key.as_str() {
                TIER_KEY => state.tier = Tier::from_string(&setting.value),
                THEME_KEY => state.theme = Theme::from_string(&setting.value),
                HOURLY_RATE_KEY => {
                    state.default_hourly_rate = setting
                        .value
                        .parse()
                        .unwrap_or_else(|_| default_hourly_rate());
                }
                _ => {}
            }
        }
        tracing::debug!(
            tier = state.tier.as_str(),
            theme = state.theme.as_str(),
            "settings loaded"
        );
        Ok(())
    }

    pub async fn tier(&self) -> Tier {
        self.state.lock().await.tier
    }

    pub async fn theme(&self) -> Theme {
        self.state.lock().await.theme
    }

    /// Hourly rate applied when a client has none of its own.
    pub async fn default_hourly_rate(&self) -> Decimal {
        self.state.lock().await.default_hourly_rate
    }

    #[instrument(skip(self))]
    pub async fn set_tier(&self, tier: Tier) -> AppResult<()> {
        self.backend.set_setting(TIER_KEY, tier.as_str()).await?;
        self.state.lock().await.tier = tier;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_theme(&self, theme: Theme) -> AppResult<()> {
        self.backend.set_setting(THEME_KEY, theme.as_str()).await?;
        self.state.lock().await.theme = theme;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_default_hourly_rate(&self, rate: Decimal) -> AppResult<()> {
        self.backend
            .set_setting(HOURLY_RATE_KEY, &rate.to_string())
            .await?;
        self.state.lock().await.default_hourly_rate = rate;
        Ok(())
    }
}

//! The check-in service and its settings.
//!
//! Issuance lives in [`crate::issuer`], validation in [`crate::validator`]; both
//! are `impl` blocks on [`CheckinService`] so they share repositories, clock and
//! signing settings.

use crate::codec::TokenSigner;
use catalyst_common::Clock;
use catalyst_config::{AppConfig, CheckinConfig};
use catalyst_db::CatalystRepositories;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use tracing::info;

/// Runtime settings derived from the `[checkin]` config section.
#[derive(Debug, Clone)]
pub struct CheckinSettings {
    /// Added to the event end to obtain a record's `expires_at`.
    pub grace_window: Duration,
    pub signer: Option<TokenSigner>,
    pub reject_cancelled_registrations: bool,
}

impl CheckinSettings {
    pub fn from_config(config: &CheckinConfig) -> Self {
        let signer = config
            .signing_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(TokenSigner::new);

        Self {
            grace_window: Duration::minutes(config.grace_window_minutes),
            signer,
            reject_cancelled_registrations: config.reject_cancelled_registrations,
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::from_config(&config.checkin.clone().unwrap_or_default())
    }
}

impl Default for CheckinSettings {
    fn default() -> Self {
        Self::from_config(&CheckinConfig::default())
    }
}

pub struct CheckinService {
    pub(crate) repos: CatalystRepositories,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) settings: CheckinSettings,
}

impl CheckinService {
    pub fn new(repos: CatalystRepositories, clock: Arc<dyn Clock>, settings: CheckinSettings) -> Self {
        info!(
            "Check-in service ready (grace window {} min, signed tokens: {})",
            settings.grace_window.num_minutes(),
            settings.signer.is_some()
        );
        Self {
            repos,
            clock,
            settings,
        }
    }

    pub fn repositories(&self) -> &CatalystRepositories {
        &self.repos
    }

    pub fn settings(&self) -> &CheckinSettings {
        &self.settings
    }

    /// The current instant at the millisecond precision storage keeps, so a
    /// value returned now equals the one read back later.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_common::FixedClock;
    use catalyst_db::{CatalystRepositoryFactory, DbClient, RepositoryFactory};
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_now_is_truncated_to_millis() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("service.db").display());
        let client = DbClient::from_url(&url).await.unwrap();
        let repos = CatalystRepositoryFactory::new().create_repository(client);

        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let service = CheckinService::new(
            repos,
            Arc::new(FixedClock::new(instant)),
            CheckinSettings::default(),
        );

        assert_eq!(
            service.now(),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap() + Duration::milliseconds(123)
        );
    }

    #[test]
    fn test_settings_from_config() {
        let defaults = CheckinSettings::default();
        assert_eq!(defaults.grace_window, Duration::minutes(120));
        assert!(defaults.signer.is_none());
        assert!(defaults.reject_cancelled_registrations);

        let configured = CheckinSettings::from_config(&CheckinConfig {
            grace_window_minutes: 30,
            signing_secret: Some("k".into()),
            reject_cancelled_registrations: false,
        });
        assert_eq!(configured.grace_window, Duration::minutes(30));
        assert!(configured.signer.is_some());
        assert!(!configured.reject_cancelled_registrations);

        let blank_secret = CheckinSettings::from_config(&CheckinConfig {
            signing_secret: Some(String::new()),
            ..CheckinConfig::default()
        });
        assert!(blank_secret.signer.is_none());
    }
}

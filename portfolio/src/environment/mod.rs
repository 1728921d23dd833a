use std::sync::Arc;

use anyhow::Context;
use chrono::TimeDelta;
use portfolio_api_rest::{RealIpConfig, RestServerConfig};
use portfolio_config::{Config, Duration};
use portfolio_core_contact_impl::{rate_limit::ContactRateLimitConfig, ContactFeatureConfig};
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_di::provider;
use types::{Email, RateLimitStore};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        rate_limit_store: RateLimitStore,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Core
            ContactFeatureConfig,
            ContactRateLimitConfig,
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email, rate_limit_store: RateLimitStore) -> Self {
        Self {
            _cache: Default::default(),
            email,
            rate_limit_store,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        contact_rate_limit_config: ContactRateLimitConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            addr: (config.http.host, config.http.port).into(),
            allowed_origin: config
                .http
                .allowed_origin
                .parse()
                .context("Invalid allowed origin")?,
            body_limit: config.http.body_limit,
            static_dir: config.http.static_dir.clone(),
            real_ip_config: config
                .http
                .real_ip
                .as_ref()
                .map(|real_ip| {
                    anyhow::Ok(Arc::new(RealIpConfig {
                        header: real_ip.header.parse().context("Invalid real ip header")?,
                        trusted_proxies: real_ip.trusted_proxies.clone(),
                    }))
                })
                .transpose()?,
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            recipient: config
                .contact
                .email
                .clone()
                .unwrap_or_else(|| config.email.from.clone())
                .into(),
            subject_prefix: config.contact.subject_prefix.as_str().into(),
        };

        let contact_rate_limit_config = ContactRateLimitConfig {
            window: time_delta(config.contact.rate_limit.window)
                .context("Invalid contact rate limit window")?,
            max_requests: config.contact.rate_limit.max_requests,
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: time_delta(config.health.cache_ttl)
                .context("Invalid health cache ttl")?,
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Core
            contact_feature_config,
            contact_rate_limit_config,
            health_feature_config,
        })
    }
}

fn time_delta(duration: Duration) -> anyhow::Result<TimeDelta> {
    TimeDelta::from_std(duration.into()).context("Duration out of range")
}

use anyhow::Context;
use chrono::TimeDelta;
use portfolio_core_contact_contracts::rate_limit::ContactRateLimitService;
use portfolio_di::Build;
use portfolio_models::client::ClientAddress;
use portfolio_rate_limit_contracts::RateLimitStore;
use portfolio_shared_contracts::time::TimeService;
use portfolio_utils::trace_instrument;

#[derive(Debug, Clone, Build)]
pub struct ContactRateLimitServiceImpl<Time, Store> {
    time: Time,
    store: Store,
    config: ContactRateLimitConfig,
}

#[derive(Debug, Clone)]
pub struct ContactRateLimitConfig {
    pub window: TimeDelta,
    pub max_requests: usize,
}

impl<Time, Store> ContactRateLimitService for ContactRateLimitServiceImpl<Time, Store>
where
    Time: TimeService,
    Store: RateLimitStore,
{
    #[trace_instrument(skip(self))]
    async fn check_and_record(&self, client: &ClientAddress) -> anyhow::Result<bool> {
        let now = self.time.now();
        self.store
            .hit(
                &rate_limit_key(client),
                now,
                now - self.config.window,
                self.config.max_requests,
            )
            .await
            .context("Failed to record contact request")
    }
}

fn rate_limit_key(client: &ClientAddress) -> String {
    format!("contact:{client}")
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use portfolio_rate_limit_contracts::MockRateLimitStore;
    use portfolio_rate_limit_memory::MemoryRateLimitStore;
    use portfolio_shared_contracts::time::MockTimeService;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn config() -> ContactRateLimitConfig {
        ContactRateLimitConfig {
            window: TimeDelta::minutes(10),
            max_requests: 5,
        }
    }

    #[tokio::test]
    async fn allowed() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let store = MockRateLimitStore::new().with_hit(
            "contact:203.0.113.7".into(),
            now(),
            now() - TimeDelta::minutes(10),
            5,
            true,
        );

        let sut = ContactRateLimitServiceImpl {
            time,
            store,
            config: config(),
        };

        // Act
        let result = sut
            .check_and_record(&ClientAddress::Ip("203.0.113.7".parse().unwrap()))
            .await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn limited() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let store = MockRateLimitStore::new().with_hit(
            "contact:2001:db8::1".into(),
            now(),
            now() - TimeDelta::minutes(10),
            5,
            false,
        );

        let sut = ContactRateLimitServiceImpl {
            time,
            store,
            config: config(),
        };

        // Act
        let result = sut
            .check_and_record(&ClientAddress::Ip("2001:db8::1".parse().unwrap()))
            .await;

        // Assert
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn unknown_clients_share_a_key() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let store = MockRateLimitStore::new().with_hit(
            "contact:unknown".into(),
            now(),
            now() - TimeDelta::minutes(10),
            5,
            true,
        );

        let sut = ContactRateLimitServiceImpl {
            time,
            store,
            config: config(),
        };

        // Act
        let result = sut.check_and_record(&ClientAddress::Unknown).await;

        // Assert
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn store_error() {
        // Arrange
        let time = MockTimeService::new().with_now(now());
        let mut store = MockRateLimitStore::new();
        store.expect_hit().once().return_once(|_, _, _, _| {
            Box::pin(std::future::ready(Err(anyhow::anyhow!("store unavailable"))))
        });

        let sut = ContactRateLimitServiceImpl {
            time,
            store,
            config: config(),
        };

        // Act
        let result = sut.check_and_record(&ClientAddress::Unknown).await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn six_rapid_requests() {
        // Arrange
        let mut time = MockTimeService::new();
        let mut seconds = 0;
        time.expect_now().times(7).returning(move || {
            seconds += 10;
            now() + TimeDelta::seconds(seconds)
        });

        let sut = ContactRateLimitServiceImpl {
            time,
            store: MemoryRateLimitStore::default(),
            config: config(),
        };
        let client = ClientAddress::Ip("203.0.113.7".parse().unwrap());
        let other = ClientAddress::Ip("203.0.113.8".parse().unwrap());

        // Act
        let mut results = Vec::new();
        for _ in 0..6 {
            results.push(sut.check_and_record(&client).await.unwrap());
        }
        let other_result = sut.check_and_record(&other).await.unwrap();

        // Assert
        assert_eq!(results, [true, true, true, true, true, false]);
        assert!(other_result);
    }
}

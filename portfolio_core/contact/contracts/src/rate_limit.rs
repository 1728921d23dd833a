use std::future::Future;

use portfolio_models::client::ClientAddress;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRateLimitService: Send + Sync + 'static {
    /// Count a contact request of the given client.
    ///
    /// Returns `false` without counting the request if the client has already
    /// reached the limit within the current window.
    fn check_and_record(
        &self,
        client: &ClientAddress,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[cfg(feature = "mock")]
impl MockContactRateLimitService {
    pub fn with_check_and_record(mut self, client: ClientAddress, result: bool) -> Self {
        self.expect_check_and_record()
            .once()
            .with(mockall::predicate::eq(client))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }
}

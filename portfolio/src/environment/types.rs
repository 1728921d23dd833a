use portfolio_core_contact_impl::{
    rate_limit::ContactRateLimitServiceImpl, ContactFeatureServiceImpl,
};
use portfolio_core_health_impl::HealthFeatureServiceImpl;
use portfolio_email_impl::EmailServiceImpl;
use portfolio_rate_limit_memory::MemoryRateLimitStore;
use portfolio_shared_impl::time::TimeServiceImpl;
use portfolio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = portfolio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Rate limiting
pub type RateLimitStore = MemoryRateLimitStore;

// Templates
pub type Template = TemplateServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;

pub type ContactFeature = ContactFeatureServiceImpl<Template, Email, ContactRateLimit>;
pub type ContactRateLimit = ContactRateLimitServiceImpl<Time, RateLimitStore>;

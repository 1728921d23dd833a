pub mod check_config;
pub mod email;
pub mod serve;

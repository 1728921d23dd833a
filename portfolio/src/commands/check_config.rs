use portfolio_config::Config;

use crate::environment::ConfigProvider;

/// Make sure the config can be loaded and converted into service configs.
pub fn check_config(config: Config, verbose: bool) -> anyhow::Result<()> {
    ConfigProvider::new(&config)?;
    if verbose {
        println!("{config:#?}");
    }
    Ok(())
}

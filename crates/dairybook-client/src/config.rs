use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::billing::pricing::{
    DEFAULT_CYCLE_LENGTH_DAYS, DEFAULT_PRICE_PER_UNIT, MAX_WINDOW_DAYS, PriceBook, window_length,
};
use crate::{ClientError, ClientResult};

pub const HOME_ENV: &str = "DAIRYBOOK_HOME";
pub const PRICE_ENV: &str = "DAIRYBOOK_PRICE_PER_UNIT";
pub const CYCLE_LENGTH_ENV: &str = "DAIRYBOOK_CYCLE_LENGTH_DAYS";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Billing defaults after every configuration layer has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingConfig {
    pub price_per_unit: f64,
    pub cycle_length_days: NonZeroU32,
    pub customer_prices: BTreeMap<String, f64>,
    /// The config file that contributed, if one existed.
    pub config_path: Option<PathBuf>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            price_per_unit: DEFAULT_PRICE_PER_UNIT,
            cycle_length_days: DEFAULT_CYCLE_LENGTH_DAYS,
            customer_prices: BTreeMap::new(),
            config_path: None,
        }
    }
}

impl BillingConfig {
    pub fn price_book(&self) -> PriceBook {
        self.customer_prices
            .iter()
            .fold(PriceBook::new(self.price_per_unit), |book, (customer_id, price)| {
                book.with_override(customer_id, *price)
            })
    }

    /// Prices for one invocation: an explicit `--price` applies to every
    /// customer, otherwise the configured book with its overrides.
    pub fn price_book_for(&self, explicit_price: Option<f64>) -> PriceBook {
        match explicit_price {
            Some(price) => PriceBook::new(price),
            None => self.price_book(),
        }
    }

    /// Applies per-invocation flags on top of the resolved configuration.
    pub fn with_flags(
        mut self,
        price_per_unit: Option<f64>,
        cycle_length_days: Option<u32>,
        command: &str,
    ) -> ClientResult<Self> {
        if let Some(price) = price_per_unit {
            if !is_valid_price(price) {
                return Err(ClientError::invalid_argument_for_command(
                    "`--price` must be a finite number greater than or equal to 0.",
                    Some(command),
                ));
            }
            self.price_per_unit = price;
        }
        if let Some(days) = cycle_length_days {
            self.cycle_length_days = window_length(days).ok_or_else(|| {
                ClientError::invalid_argument_for_command(
                    &format!("`--days` must be between 1 and {MAX_WINDOW_DAYS}."),
                    Some(command),
                )
            })?;
        }
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    price_per_unit: Option<f64>,
    cycle_length_days: Option<u32>,
    customer_prices: BTreeMap<String, f64>,
}

pub fn resolve_dairybook_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".dairybook")
            } else {
                return Err(ClientError::config_home_unresolved(
                    "no home directory is available and DAIRYBOOK_HOME is unset",
                ));
            }
        }
    };

    absolutize(&candidate)
}

/// Defaults, then `config.json` in the dairybook home, then environment
/// overrides.
pub fn load_billing_config(home_override: Option<&Path>) -> ClientResult<BillingConfig> {
    let home = resolve_dairybook_home(home_override)?;
    load_billing_config_with_env(&home, |name| std::env::var(name).ok())
}

pub fn load_billing_config_with_env(
    home: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientResult<BillingConfig> {
    let mut config = BillingConfig::default();

    let config_path = home.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        let file = read_config_file(&config_path)?;
        if let Some(price) = file.price_per_unit {
            if !is_valid_price(price) {
                return Err(ClientError::invalid_config(
                    &config_path,
                    "`price_per_unit` must be a finite number >= 0",
                ));
            }
            config.price_per_unit = price;
        }
        if let Some(days) = file.cycle_length_days {
            config.cycle_length_days = window_length(days).ok_or_else(|| {
                ClientError::invalid_config(
                    &config_path,
                    &format!("`cycle_length_days` must be between 1 and {MAX_WINDOW_DAYS}"),
                )
            })?;
        }
        for (customer_id, price) in &file.customer_prices {
            if !is_valid_price(*price) {
                return Err(ClientError::invalid_config(
                    &config_path,
                    &format!("price for `{customer_id}` must be a finite number >= 0"),
                ));
            }
        }
        config.customer_prices = file.customer_prices;
        debug!(path = %config_path.display(), "loaded billing config");
        config.config_path = Some(config_path);
    }

    if let Some(raw) = lookup(PRICE_ENV) {
        let price = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| is_valid_price(*value))
            .ok_or_else(|| {
                ClientError::invalid_config_env(PRICE_ENV, &raw, "expected a finite number >= 0")
            })?;
        config.price_per_unit = price;
    }
    if let Some(raw) = lookup(CYCLE_LENGTH_ENV) {
        let days = raw
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(window_length)
            .ok_or_else(|| {
                ClientError::invalid_config_env(
                    CYCLE_LENGTH_ENV,
                    &raw,
                    &format!("expected a whole number from 1 to {MAX_WINDOW_DAYS}"),
                )
            })?;
        config.cycle_length_days = days;
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> ClientResult<ConfigFile> {
    let body = fs::read_to_string(path)
        .map_err(|error| ClientError::invalid_config(path, &error.to_string()))?;
    serde_json::from_str::<ConfigFile>(&body)
        .map_err(|error| ClientError::invalid_config(path, &error.to_string()))
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|error| ClientError::config_home_unresolved(&error.to_string()))
}

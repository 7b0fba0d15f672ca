use std::fs;

use serde::Deserialize;
use shared::domain::{Payee, PriceTable};
use tracing::warn;
use url::Url;

/// Static configuration for one booking form: where submissions go, what the
/// two bundles cost, and who can receive the payment. Passed to
/// [`crate::BookingClient::new`] so the controller owns no global state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingConfig {
    pub backend_url: String,
    pub qr_endpoint: String,
    pub prices: PriceTable,
    pub payees: Vec<Payee>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:4001".into(),
            qr_endpoint: "https://api.qrserver.com/v1/create-qr-code/".into(),
            prices: PriceTable {
                standard: 40,
                with_rosemilk: 57,
            },
            payees: vec![
                Payee {
                    name: "Santhosh Nagaraj .m".into(),
                    vpa: "msanthoshnagaraj-2@okhdfcbank".into(),
                },
                Payee {
                    name: "ARVIND M".into(),
                    vpa: "arvindms2017-2@okaxis".into(),
                },
            ],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    backend_url: Option<String>,
    qr_endpoint: Option<String>,
    prices: Option<PriceTable>,
    payees: Option<Vec<Payee>>,
}

/// Loads configuration in layers: built-in defaults, then an optional
/// `booking.toml` in the working directory, then environment overrides.
pub fn load_config() -> BookingConfig {
    let mut config = BookingConfig::default();

    if let Ok(raw) = fs::read_to_string("booking.toml") {
        match toml::from_str::<ConfigFile>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.backend_url {
                    apply_backend_url(&mut config, &v);
                }
                if let Some(v) = file_cfg.qr_endpoint {
                    config.qr_endpoint = v;
                }
                if let Some(v) = file_cfg.prices {
                    config.prices = v;
                }
                if let Some(v) = file_cfg.payees {
                    if v.is_empty() {
                        warn!("booking.toml lists no payees; keeping defaults");
                    } else {
                        config.payees = v;
                    }
                }
            }
            Err(err) => warn!("ignoring malformed booking.toml: {err}"),
        }
    }

    if let Ok(v) = std::env::var("BACKEND_URL") {
        apply_backend_url(&mut config, &v);
    }
    if let Ok(v) = std::env::var("APP__BACKEND_URL") {
        apply_backend_url(&mut config, &v);
    }

    config
}

fn apply_backend_url(config: &mut BookingConfig, raw: &str) {
    match normalize_backend_url(raw) {
        Some(url) => config.backend_url = url,
        None => warn!("ignoring invalid backend url override: {raw}"),
    }
}

fn normalize_backend_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    Some(raw.trim_end_matches('/').to_string())
}

use chrono::{DateTime, TimeZone, Utc};
use const_format::formatcp;
use once_cell::sync::Lazy;

pub const BOT_TOKEN_ENV_VAR: &str = "EXAM_COUNTDOWN_BOT_TOKEN";
pub const DB_URL_ENV_VAR: &str = "EXAM_COUNTDOWN_DATABASE_URL";
pub const ADMIN_ID_ENV_VAR: &str = "EXAM_COUNTDOWN_ADMIN_ID";
pub const FONTS_DIR_ENV_VAR: &str = "EXAM_COUNTDOWN_FONTS_DIR";

pub const DEFAULT_FONTS_DIR: &str = "assets/fonts";

pub const QUOTES_URL: &str =
    "https://raw.githubusercontent.com/itzfew/Eduhub-KMR/master/quotes.json";

pub const USER_AGENT: &str = formatcp!(
    "{}/{}",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION")
);

/// Target of the `/gen` card.
pub static GEN_TARGET: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(2026, 5, 3, 0, 0, 0)
        .single()
        .unwrap_or_default()
});

pub const WARN_BAN_THRESHOLD: u32 = 3;

pub struct Package {
    pub name: &'static str,
    pub version: &'static str,
}

pub const PACKAGE: Package = Package {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

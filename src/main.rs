use core::config;
use std::{env, process::exit};

use anyhow::anyhow;
use spdlog::prelude::*;
use teloxide::types::UserId;

#[tokio::main]
async fn main() {
    setup_logger();

    info!("{} startup!", config::PACKAGE.name);
    info!("current version: {}", config::PACKAGE.version);

    if let Err(err) = run().await {
        error!("exited with err: {err}");
        exit(1);
    }
}

fn setup_logger() {
    if cfg!(debug_assertions) {
        spdlog::default_logger().set_level_filter(LevelFilter::All)
    }
}

fn read_env(name: &str, what: &str) -> anyhow::Result<String> {
    env::var(name)
        .map_err(|err| anyhow!("failed to read {what} from env var `{name}`. err: '{err}'"))
}

async fn run() -> anyhow::Result<()> {
    let bot_token = read_env(config::BOT_TOKEN_ENV_VAR, "bot token")?;
    let db_url = read_env(config::DB_URL_ENV_VAR, "database url")?;

    let admin = read_env(config::ADMIN_ID_ENV_VAR, "admin user id")?;
    let admin = admin.trim().parse::<u64>().map(UserId).map_err(|err| {
        anyhow!(
            "env var `{}` is not a valid user id. err: '{err}'",
            config::ADMIN_ID_ENV_VAR
        )
    })?;

    let fonts_dir =
        env::var(config::FONTS_DIR_ENV_VAR).unwrap_or_else(|_| config::DEFAULT_FONTS_DIR.into());
    info!("loading fonts from '{fonts_dir}'");

    core::run(bot_token, db_url, fonts_dir, admin).await
}

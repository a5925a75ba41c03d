mod cmd;
pub mod config;
pub mod countdown;
mod db;
mod handler;
pub mod ledger;
pub mod quote;
pub mod render;
pub mod store;
mod util;

use std::{path::Path, sync::Arc};

use cmd::Command;
use spdlog::prelude::*;
use teloxide::{
    prelude::*,
    types::{Me, Update},
    utils::command::BotCommands,
};

use crate::{
    ledger::WarningLedger,
    quote::QuoteSource,
    render::{FontCatalog, Renderer},
};

pub struct InstanceState {
    pub db: db::Pool,
    pub renderer: Arc<Renderer>,
    pub ledger: WarningLedger,
    pub quotes: QuoteSource,
    /// The only user allowed to change countdown targets.
    pub admin: UserId,
}

impl InstanceState {
    async fn new(
        db_url: impl AsRef<str>,
        fonts_dir: impl AsRef<Path>,
        admin: UserId,
    ) -> anyhow::Result<Arc<Self>> {
        let fonts = FontCatalog::load(fonts_dir);
        if fonts.is_empty() {
            warn!("no decorative fonts loaded, cards will use the fallback family");
        } else {
            info!(
                "font families: {}",
                fonts.names().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(Arc::new(Self {
            db: db::Pool::connect(db_url).await?,
            renderer: Arc::new(Renderer::new(fonts)),
            ledger: WarningLedger::new(config::WARN_BAN_THRESHOLD),
            quotes: QuoteSource::new(config::QUOTES_URL)?,
            admin,
        }))
    }
}

pub async fn run(
    bot_token: impl Into<String>,
    db_url: impl AsRef<str>,
    fonts_dir: impl AsRef<Path>,
    admin: UserId,
) -> anyhow::Result<()> {
    let bot = Bot::new(bot_token);
    let inst_state = InstanceState::new(db_url, fonts_dir, admin).await?;

    bot.set_my_commands(Command::bot_commands()).await?;

    let handler = dptree::entry().branch(
        Update::filter_message()
            .filter_map(|me: Me, msg: Message| {
                msg.text().and_then(|text| cmd::parse(text, me.username()))
            })
            .endpoint(
                |state: Arc<InstanceState>,
                 bot: Bot,
                 me: Me,
                 msg: Message,
                 cmd: Command| async move {
                    let req = handler::Request::new_command(state, bot, me, msg, cmd);
                    handler::handle(req).await
                },
            ),
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![inst_state])
        .default_handler(|upd| async move {
            trace!("unhandled update: {upd:?}");
        })
        .error_handler(Arc::new(
            |err| async move { error!("dispatcher error: {err}") },
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

mod countdown;
mod me;
mod moderation;
mod ping;
mod quote;
mod start;

use std::sync::Arc;

use spdlog::prelude::*;
use teloxide::{
    prelude::*,
    types::{ChatKind, InputFile, Me, User},
};

use crate::{cmd::Command, store::Category, util::text::*, InstanceState};

const RENDER_FAILED: &str = "Could not generate countdown image. Please try again.";

struct RequestMeta {
    state: Arc<InstanceState>,
    bot: Bot,
    me: Me,
    msg: Message,
}

pub struct Request {
    meta: RequestMeta,
    cmd: Command,
}

impl Request {
    pub fn new_command(
        state: Arc<InstanceState>,
        bot: Bot,
        me: Me,
        msg: Message,
        cmd: Command,
    ) -> Self {
        Self {
            meta: RequestMeta {
                state,
                bot,
                me,
                msg,
            },
            cmd,
        }
    }

    pub fn state(&self) -> &Arc<InstanceState> {
        &self.meta.state
    }

    pub fn bot(&self) -> &Bot {
        &self.meta.bot
    }

    pub fn me(&self) -> &Me {
        &self.meta.me
    }

    pub fn msg(&self) -> &Message {
        &self.meta.msg
    }

    pub fn chat_id(&self) -> ChatId {
        self.meta.msg.chat.id
    }

    pub fn from(&self) -> Result<&User, Response<'_>> {
        self.msg()
            .from()
            .ok_or_else(|| Response::reply_to("Could not identify your user information."))
    }
}

pub enum ResponseKind<'a> {
    ReplyTo(MessageText<'a>),
    Photo {
        image: Vec<u8>,
        caption: MessageText<'a>,
    },
}

pub struct Response<'a> {
    kind: ResponseKind<'a>,
    disable_preview: bool,
}

impl<'a> Response<'a> {
    pub fn reply_to(text: impl Into<MessageText<'a>>) -> Self {
        Self {
            kind: ResponseKind::ReplyTo(text.into()),
            disable_preview: false,
        }
    }

    pub fn photo(image: Vec<u8>, caption: impl Into<MessageText<'a>>) -> Self {
        Self {
            kind: ResponseKind::Photo {
                image,
                caption: caption.into(),
            },
            disable_preview: false,
        }
    }

    pub fn disable_preview(mut self) -> Self {
        self.disable_preview = true;
        self
    }
}

pub async fn handle(req: Request) -> Result<(), teloxide::RequestError> {
    let req = &req;
    let (bot, msg) = (req.bot(), req.msg());

    trace!(
        "command {:?}. chat id '{}', msg id '{}'",
        req.cmd,
        msg.chat.id,
        msg.id
    );

    let res = handle_command(req).await;
    let (succeeded, Ok(resp) | Err(resp)) = (res.is_ok(), res);

    let decorate = |text: MessageText<'_>| {
        if succeeded {
            text.into_parts()
        } else {
            warning(text).into_parts()
        }
    };

    match resp.kind {
        ResponseKind::ReplyTo(text) => {
            let (text, entities) = decorate(text);

            let mut send = bot
                .send_message(msg.chat.id, text)
                .entities(entities)
                .reply_to_message_id(msg.id);
            if resp.disable_preview {
                send = send.disable_web_page_preview(true);
            }
            send.await?;
        }
        ResponseKind::Photo { image, caption } => {
            let (caption, entities) = decorate(caption);

            let sent = bot
                .send_photo(msg.chat.id, InputFile::memory(image))
                .caption(caption)
                .caption_entities(entities)
                .reply_to_message_id(msg.id)
                .await;

            // The photo can be rejected while plain text still goes through.
            if let Err(err) = sent {
                error!("failed to send photo to chat '{}': {err}", msg.chat.id);

                let (text, entities) = warning(RENDER_FAILED.into()).into_parts();
                bot.send_message(msg.chat.id, text)
                    .entities(entities)
                    .reply_to_message_id(msg.id)
                    .await?;
            }
        }
    }

    Ok(())
}

async fn handle_command(req: &Request) -> Result<Response<'_>, Response<'_>> {
    match &req.cmd {
        Command::Start | Command::Help => start::handle(req).await,
        Command::Ping => ping::handle(req).await,
        Command::Gen => countdown::generate(req).await,
        Command::Neet => countdown::dashboard(req, Category::Neet).await,
        Command::Jee => countdown::dashboard(req, Category::Jee).await,
        Command::SetNeet(arg) => countdown::set_date(req, Category::Neet, arg).await,
        Command::SetJee(arg) => countdown::set_date(req, Category::Jee, arg).await,
        Command::Quote => quote::handle(req).await,
        Command::Me => me::handle(req).await,
        Command::Info => moderation::info(req).await,
        Command::Ban(arg) => moderation::ban(req, arg).await,
        Command::Unban(arg) => moderation::unban(req, arg).await,
        Command::Kick(arg) => moderation::kick(req, arg).await,
        Command::Mute(arg) => moderation::mute(req, arg).await,
        Command::Unmute(arg) => moderation::unmute(req, arg).await,
        Command::Warn(arg) => moderation::warn(req, arg).await,
        Command::Promote(arg) => moderation::promote(req, arg).await,
        Command::Demote(arg) => moderation::demote(req, arg).await,
    }
}

fn require_group(req: &Request) -> Result<(), Response<'_>> {
    match req.msg().chat.kind {
        ChatKind::Public(_) => Ok(()),
        ChatKind::Private(_) => Err(Response::reply_to(
            "This command is only available in groups.",
        )),
    }
}

fn warning(mut text: MessageText<'_>) -> MessageText<'_> {
    text.prepend_text("⚠️ ");
    text
}

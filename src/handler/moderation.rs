use spdlog::prelude::*;
use teloxide::{
    prelude::*,
    types::{ChatPermissions, User},
};

use crate::{
    handler::{require_group, Request, Response},
    ledger::WarnOutcome,
    util::text::*,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Ban,
    Unban,
    Kick,
    Mute,
    Unmute,
    Warn,
    Promote,
    Demote,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Kick => "kick",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::Warn => "warn",
            Self::Promote => "promote",
            Self::Demote => "demote",
        }
    }

    fn done(&self) -> (&'static str, &'static str) {
        match self {
            Self::Ban => ("✅", "has been banned"),
            Self::Unban => ("✅", "has been unbanned"),
            Self::Kick => ("👢", "was kicked"),
            Self::Mute => ("🔇", "has been muted"),
            Self::Unmute => ("🔊", "has been unmuted"),
            Self::Warn => ("❗", "has been warned"),
            Self::Promote => ("⭐", "was promoted to admin"),
            Self::Demote => ("⚙️", "was demoted"),
        }
    }
}

fn unmuted_permissions() -> ChatPermissions {
    ChatPermissions::SEND_MESSAGES
        | ChatPermissions::SEND_MEDIA_MESSAGES
        | ChatPermissions::SEND_OTHER_MESSAGES
        | ChatPermissions::ADD_WEB_PAGE_PREVIEWS
}

pub async fn ban<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Ban).await
}

pub async fn unban<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Unban).await
}

pub async fn kick<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Kick).await
}

pub async fn mute<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Mute).await
}

pub async fn unmute<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Unmute).await
}

pub async fn promote<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Promote).await
}

pub async fn demote<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    moderate(req, arg, Action::Demote).await
}

pub async fn warn<'a>(req: &'a Request, arg: &str) -> Result<Response<'a>, Response<'a>> {
    let target = prepare(req, arg, Action::Warn).await?;
    let (state, chat_id) = (req.state(), req.chat_id());

    match state.ledger.warn(chat_id, target.id).await {
        WarnOutcome::Warned { count } => {
            info!("user '{}' warned in chat '{chat_id}' ({count})", target.id);

            let (emoji, done) = Action::Warn.done();
            Ok(Response::reply_to(
                mtb()
                    .plain(format!("{emoji} "))
                    .user(&target)
                    .plain(format!(
                        " {done}. Warnings: {count}/{}",
                        state.ledger.threshold()
                    ))
                    .build(),
            ))
        }
        WarnOutcome::Ban { count } => {
            perform(req.bot(), chat_id, target.id, Action::Ban)
                .await
                .map_err(|err| failed(Action::Ban, &target, err))?;
            state.ledger.reset(chat_id, target.id).await;

            info!(
                "user '{}' banned in chat '{chat_id}' after {count} warnings",
                target.id
            );

            Ok(Response::reply_to(
                mtb()
                    .plain("⛔ ")
                    .user(&target)
                    .plain(" was ")
                    .bold("banned")
                    .plain(format!(" after {count} warnings."))
                    .build(),
            ))
        }
    }
}

pub async fn info(req: &Request) -> Result<Response<'_>, Response<'_>> {
    require_admin(req, "inspect").await?;

    let user = req
        .msg()
        .reply_to_message()
        .and_then(|msg| msg.from())
        .ok_or_else(|| Response::reply_to("Reply to a user to get their info."))?;

    Ok(Response::reply_to(user_info(user)))
}

fn user_info(user: &User) -> MessageText<'static> {
    mtb()
        .bold("👤 User Info:\n")
        .plain("ID: ")
        .code(user.id.to_string())
        .plain(format!(
            "\nUsername: @{}",
            user.username.as_deref().unwrap_or("N/A")
        ))
        .plain(format!("\nFirst Name: {}", user.first_name))
        .plain(format!(
            "\nIs Bot: {}",
            if user.is_bot { "Yes" } else { "No" }
        ))
        .build()
}

async fn moderate<'a>(
    req: &'a Request,
    arg: &str,
    action: Action,
) -> Result<Response<'a>, Response<'a>> {
    let target = prepare(req, arg, action).await?;
    let chat_id = req.chat_id();

    perform(req.bot(), chat_id, target.id, action)
        .await
        .map_err(|err| failed(action, &target, err))?;

    info!("{} user '{}' in chat '{chat_id}'", action.verb(), target.id);

    if action == Action::Unban {
        req.state().ledger.reset(chat_id, target.id).await;
    }

    let (emoji, done) = action.done();
    Ok(Response::reply_to(
        mtb()
            .plain(format!("{emoji} "))
            .user(&target)
            .plain(format!(" {done}."))
            .build(),
    ))
}

async fn perform(
    bot: &Bot,
    chat_id: ChatId,
    user_id: UserId,
    action: Action,
) -> Result<(), teloxide::RequestError> {
    match action {
        Action::Ban => {
            bot.ban_chat_member(chat_id, user_id).await?;
        }
        Action::Unban => {
            bot.unban_chat_member(chat_id, user_id).await?;
        }
        Action::Kick => {
            bot.ban_chat_member(chat_id, user_id).await?;
            bot.unban_chat_member(chat_id, user_id).await?;
        }
        Action::Mute => {
            bot.restrict_chat_member(chat_id, user_id, ChatPermissions::empty())
                .await?;
        }
        Action::Unmute => {
            bot.restrict_chat_member(chat_id, user_id, unmuted_permissions())
                .await?;
        }
        Action::Promote | Action::Demote => {
            let grant = action == Action::Promote;
            bot.promote_chat_member(chat_id, user_id)
                .can_change_info(grant)
                .can_delete_messages(grant)
                .can_invite_users(grant)
                .can_restrict_members(grant)
                .can_pin_messages(grant)
                .can_promote_members(false)
                .await?;
        }
        Action::Warn => {}
    }
    Ok(())
}

fn failed<'a>(action: Action, target: &User, err: teloxide::RequestError) -> Response<'a> {
    error!(
        "failed to {} user '{}': {err}",
        action.verb(),
        target.id
    );
    Response::reply_to(format!("Failed to {} user. Please try again.", action.verb()))
}

/// Checks the caller is a group admin and resolves the target user.
async fn prepare<'a>(req: &'a Request, arg: &str, action: Action) -> Result<User, Response<'a>> {
    let admins = require_admin(req, action.verb()).await?;

    if let Some(user) = req.msg().reply_to_message().and_then(|msg| msg.from()) {
        return Ok(user.clone());
    }

    let username = username_arg(arg).ok_or_else(|| {
        Response::reply_to(
            mtb()
                .plain("Reply to a user or pass their username, e.g. ")
                .code(format!("/{} @username", action.verb()))
                .build(),
        )
    })?;

    find_by_username(admins, username).ok_or_else(|| Response::reply_to("User not found."))
}

/// Returns the chat administrators once the caller is known to be one of
/// them.
async fn require_admin<'a>(req: &'a Request, verb: &str) -> Result<Vec<User>, Response<'a>> {
    require_group(req)?;
    let caller = req.from()?;
    let chat_id = req.chat_id();

    let admins = req
        .bot()
        .get_chat_administrators(chat_id)
        .await
        .map_err(|err| {
            error!("failed to get administrators of chat '{chat_id}': {err}");
            Response::reply_to("Something went wrong. Please try again later.")
        })?
        .into_iter()
        .map(|member| member.user)
        .collect::<Vec<_>>();

    if admins.iter().any(|admin| admin.id == caller.id) {
        Ok(admins)
    } else {
        warn!(
            "non-admin user '{}' tried to {verb} in chat '{chat_id}'",
            caller.id
        );
        Err(Response::reply_to(format!("Only admins can {verb} users.")))
    }
}

fn username_arg(arg: &str) -> Option<&str> {
    arg.split_whitespace()
        .next()
        .map(|word| word.trim_start_matches('@'))
        .filter(|name| !name.is_empty())
}

fn find_by_username(users: impl IntoIterator<Item = User>, username: &str) -> Option<User> {
    users.into_iter().find(|user| {
        user.username
            .as_deref()
            .map_or(false, |name| name.eq_ignore_ascii_case(username))
    })
}

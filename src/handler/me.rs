use chrono::{DateTime, Duration, TimeZone, Utc};
use spdlog::prelude::*;
use teloxide::{
    prelude::*,
    types::{ChatMemberStatus, User},
};

use crate::{
    handler::{Request, Response},
    util::text::*,
};

/// User ids are not timestamps, but older accounts tend to have smaller ids.
/// The estimate maps an id onto milliseconds after 2015-01-01.
const ID_EPOCH_MILLIS: i64 = 1_420_070_400_000;
const ID_MILLIS_SHIFT: u32 = 22;

pub async fn handle(req: &Request) -> Result<Response<'_>, Response<'_>> {
    let user = req.from()?;
    let age = account_age_days(user.id, Utc::now());

    if req.msg().chat.is_private() {
        return Ok(Response::reply_to(private_info(user, age)));
    }

    let status = match req.bot().get_chat_member(req.chat_id(), user.id).await {
        Ok(member) => Some(member.status()),
        Err(err) => {
            warn!(
                "failed to get member '{}' of chat '{}': {err}",
                user.id,
                req.chat_id()
            );
            None
        }
    };

    Ok(Response::reply_to(group_info(user, status, age)))
}

pub fn estimated_creation(id: UserId) -> DateTime<Utc> {
    let millis = ID_EPOCH_MILLIS + (id.0 >> ID_MILLIS_SHIFT) as i64;
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}

pub fn account_age_days(id: UserId, now: DateTime<Utc>) -> i64 {
    (now - estimated_creation(id))
        .max(Duration::zero())
        .num_days()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn username(user: &User) -> String {
    match &user.username {
        Some(username) => format!("@{username}"),
        None => "None".into(),
    }
}

fn private_info(user: &User, age: i64) -> MessageText<'static> {
    mtb()
        .bold("👤 Your Information 👤\n\n")
        .bold("🆔 ID: ")
        .code(user.id.to_string())
        .bold("\n📛 Name: ")
        .plain(user.full_name())
        .bold("\n🔖 Username: ")
        .plain(username(user))
        .bold("\n🤖 Bot: ")
        .plain(yes_no(user.is_bot))
        .bold("\n💎 Premium: ")
        .plain(yes_no(user.is_premium))
        .bold("\n🌐 Language: ")
        .plain(user.language_code.as_deref().unwrap_or("Unknown"))
        .bold("\n📆 Account Age: ")
        .plain(format!("~{age} days\n\n"))
        .italic("This information is only visible to you.")
        .build()
}

fn status_label(status: Option<ChatMemberStatus>) -> (&'static str, &'static str) {
    match status {
        Some(ChatMemberStatus::Owner) => ("👑", "CREATOR"),
        Some(ChatMemberStatus::Administrator) => ("🛡", "ADMINISTRATOR"),
        Some(ChatMemberStatus::Member) => ("👤", "MEMBER"),
        Some(ChatMemberStatus::Restricted) => ("⏳", "RESTRICTED"),
        Some(ChatMemberStatus::Left) => ("🚪", "LEFT"),
        Some(ChatMemberStatus::Banned) => ("❌", "KICKED"),
        None => ("❓", "UNKNOWN"),
    }
}

fn group_info(user: &User, status: Option<ChatMemberStatus>, age: i64) -> MessageText<'static> {
    let (emoji, label) = status_label(status);

    mtb()
        .plain("👤 Your Information 👤\n\n")
        .bold(format!("{emoji} {label} {emoji}"))
        .plain(format!("\n\n📛 Name: {}", user.full_name()))
        .plain(format!("\n🔖 Username: {}", username(user)))
        .plain(format!("\n📆 Account Age: ~{age} days\n\n"))
        .italic("This information is visible to everyone in the group.")
        .build()
}

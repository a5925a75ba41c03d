use std::sync::Arc;

use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use spdlog::prelude::*;
use teloxide::{prelude::*, types::ChatAction};

use crate::{
    config,
    countdown,
    handler::{Request, Response, RENDER_FAILED},
    render::{DashboardRequest, RenderRequest, RenderResult},
    store::{self, Category, SetTargetError},
    util::text::*,
    InstanceState,
};

const TRY_AGAIN: &str = "Something went wrong. Please try again later.";

pub async fn generate(req: &Request) -> Result<Response<'_>, Response<'_>> {
    let target = *config::GEN_TARGET;
    let text = countdown::breakdown(target, Utc::now()).to_string();

    let result = render(req, RenderRequest::Plain { text }).await?;

    Ok(Response::photo(
        result.image,
        mtb()
            .bold(format!(
                "🖼️ Time until {}!\n",
                countdown::format_long_date(target)
            ))
            .plain("Font: ")
            .code(result.font)
            .build(),
    ))
}

pub async fn dashboard(req: &Request, category: Category) -> Result<Response<'_>, Response<'_>> {
    let state = req.state();
    let tag = category.as_str().to_uppercase();

    let target = store::load_target(&state.db, category)
        .await
        .map_err(|err| {
            error!("failed to load {category} target: {err}");
            Response::reply_to(TRY_AGAIN)
        })?
        .ok_or_else(|| {
            Response::reply_to(
                mtb()
                    .plain(format!(
                        "The {tag} exam date is not set yet. Ask the admin to set it with "
                    ))
                    .code(format!("/set{category} dd-mm-yyyy"))
                    .build(),
            )
        })?;

    let days = countdown::days_left(target, Utc::now()).to_string();
    let quote = random_quote(state).await;

    let result = render(
        req,
        RenderRequest::Dashboard(DashboardRequest {
            days: days.clone(),
            category: category.to_string(),
            quote,
            until: target,
        }),
    )
    .await?;

    let mut caption = mtb()
        .bold(format!("🖼️ {tag} countdown: {days}\n"))
        .plain(format!("Until: {}\n", countdown::format_long_date(target)))
        .plain("Font: ")
        .code(result.font);
    if let Some(quote) = result.quote {
        caption = caption.plain("\n\n").italic(quote);
    }

    Ok(Response::photo(result.image, caption.build()))
}

pub async fn set_date<'a>(
    req: &'a Request,
    category: Category,
    arg: &str,
) -> Result<Response<'a>, Response<'a>> {
    let state = req.state();
    let user = req.from()?;

    match store::set_target(&state.db, state.admin, user.id, category, arg).await {
        Ok(target) => {
            info!("user '{}' set the {category} target to '{target}'", user.id);

            Ok(Response::reply_to(
                mtb()
                    .plain("✅ ")
                    .bold(category.as_str().to_uppercase())
                    .plain(" exam date set to ")
                    .bold(countdown::format_long_date(target))
                    .build(),
            ))
        }
        Err(SetTargetError::Unauthorized) => {
            warn!("user '{}' tried to set the {category} target", user.id);
            Err(Response::reply_to("Only the bot admin can change exam dates."))
        }
        Err(SetTargetError::Date(err)) => Err(Response::reply_to(
            mtb()
                .plain(format!("{err}\n\nformat: "))
                .code(format!("/set{category} dd-mm-yyyy"))
                .build(),
        )),
        Err(SetTargetError::Store(err)) => {
            error!("failed to store the {category} target: {err}");
            Err(Response::reply_to(TRY_AGAIN))
        }
    }
}

async fn random_quote(state: &InstanceState) -> Option<String> {
    let mut rng = StdRng::from_entropy();

    match state.quotes.fetch_random(&mut rng).await {
        Ok(quote) => Some(quote.to_string()),
        Err(err) => {
            warn!("failed to fetch a quote, falling back to built-in ones: {err}");
            None
        }
    }
}

async fn render(req: &Request, request: RenderRequest) -> Result<RenderResult, Response<'_>> {
    let chat_id = req.chat_id();

    if let Err(err) = req
        .bot()
        .send_chat_action(chat_id, ChatAction::UploadPhoto)
        .await
    {
        warn!("failed to send chat action to '{chat_id}': {err}");
    }

    let renderer = Arc::clone(&req.state().renderer);
    let result = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        renderer.render(&request, &mut rng)
    })
    .await;

    match result {
        Ok(Ok(result)) => {
            info!(
                "rendered a countdown card with font '{}' for chat '{chat_id}'",
                result.font
            );
            Ok(result)
        }
        Ok(Err(err)) => {
            error!("failed to render a countdown card: {err}");
            Err(Response::reply_to(RENDER_FAILED))
        }
        Err(err) => {
            error!("render task failed: {err}");
            Err(Response::reply_to(RENDER_FAILED))
        }
    }
}

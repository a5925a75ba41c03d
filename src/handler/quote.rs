use rand::{rngs::StdRng, SeedableRng};
use spdlog::prelude::*;

use crate::{
    handler::{Request, Response},
    util::text::*,
};

pub async fn handle(req: &Request) -> Result<Response<'_>, Response<'_>> {
    let mut rng = StdRng::from_entropy();

    let quote = req
        .state()
        .quotes
        .fetch_random(&mut rng)
        .await
        .map_err(|err| {
            error!("failed to fetch a quote: {err}");
            Response::reply_to("Failed to fetch quote. Try again later.")
        })?;

    Ok(Response::reply_to(
        mtb()
            .italic(format!("\"{}\"", quote.text.trim()))
            .plain("\n\n— ")
            .bold(quote.author())
            .build(),
    ))
}

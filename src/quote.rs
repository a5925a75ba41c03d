use std::fmt;

use anyhow::bail;
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use serde_json as json;
use spdlog::prelude::*;

use crate::config;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Quote {
    #[serde(rename = "quoteText")]
    pub text: String,
    #[serde(rename = "quoteAuthor", default)]
    pub author: Option<String>,
}

impl Quote {
    pub fn author(&self) -> &str {
        match self.author.as_deref().map(str::trim) {
            Some(author) if !author.is_empty() => author,
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — {}", self.text.trim(), self.author())
    }
}

pub struct QuoteSource {
    client: reqwest::Client,
    url: String,
}

impl QuoteSource {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(config::USER_AGENT)
                .build()?,
            url: url.into(),
        })
    }

    pub async fn fetch_all(&self) -> anyhow::Result<Vec<Quote>> {
        trace!("fetching quotes from '{}'", self.url);

        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_quotes(&body)
    }

    pub async fn fetch_random<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<Quote> {
        let quotes = self.fetch_all().await?;
        pick(&quotes, rng)
    }
}

pub fn parse_quotes(body: &str) -> anyhow::Result<Vec<Quote>> {
    let quotes: Vec<Quote> = json::from_str(body)?;
    Ok(quotes
        .into_iter()
        .filter(|q| !q.text.trim().is_empty())
        .collect())
}

pub fn pick<R: Rng + ?Sized>(quotes: &[Quote], rng: &mut R) -> anyhow::Result<Quote> {
    match quotes.choose(rng) {
        Some(quote) => Ok(quote.clone()),
        None => bail!("no quotes found"),
    }
}

mod dashboard;
mod draw;
pub mod font;
pub mod layout;
mod palette;
mod plain;

use chrono::{DateTime, Utc};
use rand::Rng;
use spdlog::prelude::*;
use thiserror::Error;

pub use dashboard::DEFAULT_QUOTES;
pub use font::{FontCatalog, FontFamily};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("no font face available for family '{0}'")]
    NoFace(String),
    #[error("failed to encode png: {0}")]
    Encode(String),
}

/// Inputs of the stopwatch-style card.
#[derive(Clone, Debug)]
pub struct DashboardRequest {
    /// Day count shown inside the ring.
    pub days: String,
    /// Exam tag shown in the headline.
    pub category: String,
    /// Falls back to a built-in quote when `None`.
    pub quote: Option<String>,
    pub until: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub enum RenderRequest {
    /// Two centered lines on a dark card.
    Plain { text: String },
    Dashboard(DashboardRequest),
}

pub struct RenderResult {
    pub image: Vec<u8>,
    pub font: String,
    pub quote: Option<String>,
}

pub struct Renderer {
    fonts: FontCatalog,
}

impl Renderer {
    pub fn new(fonts: FontCatalog) -> Self {
        Self { fonts }
    }

    pub fn render<R: Rng + ?Sized>(
        &self,
        req: &RenderRequest,
        rng: &mut R,
    ) -> Result<RenderResult, RenderError> {
        let family = self.fonts.pick_random(rng);
        let face = family
            .face()
            .ok_or_else(|| RenderError::NoFace(family.name().into()))?;

        trace!("rendering with font '{}'", family.name());

        let (pixmap, quote) = match req {
            RenderRequest::Plain { text } => (plain::render(face, text, rng)?, None),
            RenderRequest::Dashboard(req) => {
                let dashboard = dashboard::render(face, req, rng)?;
                (dashboard.pixmap, Some(dashboard.quote))
            }
        };

        Ok(RenderResult {
            image: draw::encode(&pixmap)?,
            font: family.name().into(),
            quote,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::render::font::tests::test_face;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn renderer() -> Renderer {
        let face = test_face();
        Renderer::new(FontCatalog::from_families(vec![
            FontFamily::new("First", face.clone()),
            FontFamily::new("Second", face),
        ]))
    }

    #[test]
    fn plain_card_is_png() {
        let renderer = renderer();

        let mut rng = StdRng::seed_from_u64(1);
        let result = renderer
            .render(
                &RenderRequest::Plain {
                    text: "6 Months 13 Days 4 Hours 20 Minutes".into(),
                },
                &mut rng,
            )
            .unwrap();

        assert!(result.image.starts_with(PNG_MAGIC));
        assert!(result.font == "First" || result.font == "Second");
        assert!(result.quote.is_none());
    }

    #[test]
    fn dashboard_card_reports_quote() {
        let renderer = renderer();

        let mut rng = StdRng::seed_from_u64(2);
        let req = RenderRequest::Dashboard(DashboardRequest {
            days: "42".into(),
            category: "jee".into(),
            quote: None,
            until: Utc.with_ymd_and_hms(2026, 1, 22, 0, 0, 0).unwrap(),
        });
        let result = renderer.render(&req, &mut rng).unwrap();

        assert!(result.image.starts_with(PNG_MAGIC));
        let quote = result.quote.unwrap();
        assert!(DEFAULT_QUOTES.contains(&quote.as_str()));
    }

    #[test]
    fn empty_catalog_uses_fallback_family() {
        let catalog = FontCatalog::from_families(vec![]);
        let renderer = Renderer::new(catalog);
        let req = RenderRequest::Plain { text: "x".into() };

        match renderer.render(&req, &mut StdRng::seed_from_u64(0)) {
            Ok(result) => {
                // A system font stood in for the generic family.
                assert_eq!(result.font, font::FALLBACK_FAMILY);
            }
            Err(err) => assert!(
                matches!(err, RenderError::NoFace(name) if name == font::FALLBACK_FAMILY)
            ),
        }
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont};
use rand::{seq::SliceRandom, Rng};
use spdlog::prelude::*;

use crate::render::layout::Measure;

pub const FALLBACK_FAMILY: &str = "sans-serif";

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub struct FontFamily {
    name: String,
    face: Option<FontArc>,
}

impl FontFamily {
    pub fn new(name: impl Into<String>, face: FontArc) -> Self {
        Self {
            name: name.into(),
            face: Some(face),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn face(&self) -> Option<&FontArc> {
        self.face.as_ref()
    }
}

/// Decorative fonts registered at startup. Never mutated afterwards.
pub struct FontCatalog {
    families: Vec<FontFamily>,
    fallback: FontFamily,
}

impl FontCatalog {
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let mut paths = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && has_font_extension(path))
                .collect::<Vec<_>>(),
            Err(err) => {
                warn!("failed to read fonts dir '{}'. err: '{err}'", dir.display());
                vec![]
            }
        };
        paths.sort();

        let families = paths
            .iter()
            .filter_map(|path| match register(path) {
                Ok(family) => {
                    debug!("registered font '{}' from '{}'", family.name, path.display());
                    Some(family)
                }
                Err(err) => {
                    warn!("font registration failed for '{}'. err: '{err}'", path.display());
                    None
                }
            })
            .collect::<Vec<_>>();

        info!(
            "{} font families loaded from '{}'",
            families.len(),
            dir.display()
        );

        Self::from_families(families)
    }

    pub fn from_families(families: Vec<FontFamily>) -> Self {
        Self {
            families,
            fallback: load_fallback(),
        }
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(FontFamily::name)
    }

    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> &FontFamily {
        self.families.choose(rng).unwrap_or(&self.fallback)
    }
}

/// Derives a family name from a font file name, e.g. `Great_Vibes-Regular.ttf`
/// becomes `GreatVibesRegular`.
pub fn family_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem
        .chars()
        .filter(|ch| !(*ch == '-' || *ch == '_' || ch.is_whitespace()))
        .collect::<String>();
    (!name.is_empty()).then_some(name)
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn register(path: &Path) -> anyhow::Result<FontFamily> {
    let name = family_name(path)
        .ok_or_else(|| anyhow::anyhow!("cannot derive a family name from the file name"))?;
    let face = FontArc::try_from_vec(fs::read(path)?)?;
    Ok(FontFamily::new(name, face))
}

fn load_fallback() -> FontFamily {
    let face = FALLBACK_FONT_PATHS
        .iter()
        .map(PathBuf::from)
        .find_map(|path| fs::read(&path).ok().and_then(|data| FontArc::try_from_vec(data).ok()));

    if face.is_none() {
        warn!("no system font found for fallback family '{FALLBACK_FAMILY}'");
    }

    FontFamily {
        name: FALLBACK_FAMILY.into(),
        face,
    }
}

impl Measure for FontArc {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.as_scaled(size);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        width
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    pub(crate) const FIXTURE_FONT: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSans-Bold.ttf"
    ));

    pub(crate) fn test_face() -> FontArc {
        FontArc::try_from_slice(FIXTURE_FONT).unwrap()
    }

    #[test]
    fn family_names() {
        let name = |s: &str| family_name(Path::new(s));

        assert_eq!(name("fonts/Great_Vibes-Regular.ttf"), Some("GreatVibesRegular".into()));
        assert_eq!(name("Open Sans Bold.OTF"), Some("OpenSansBold".into()));
        assert_eq!(name("plain.ttf"), Some("plain".into()));
        assert_eq!(name("-_ .ttf"), None);
    }

    #[test]
    fn extensions() {
        assert!(has_font_extension(Path::new("a.ttf")));
        assert!(has_font_extension(Path::new("a.OTF")));
        assert!(!has_font_extension(Path::new("a.woff")));
        assert!(!has_font_extension(Path::new("ttf")));
    }

    #[test]
    fn broken_fonts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();

        let mut broken = fs::File::create(dir.path().join("Broken-Font.ttf")).unwrap();
        broken.write_all(b"definitely not a font").unwrap();
        fs::write(dir.path().join("readme.txt"), "fonts go here").unwrap();
        fs::create_dir(dir.path().join("nested.ttf")).unwrap();

        let catalog = FontCatalog::load(dir.path());
        assert!(catalog.is_empty());

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(catalog.pick_random(&mut rng).name(), FALLBACK_FAMILY);
    }

    #[test]
    fn missing_dir_is_empty() {
        let catalog = FontCatalog::load("/this/path/does/not/exist");
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn picks_registered_families() {
        let face = test_face();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Alpha_One.ttf"), FIXTURE_FONT).unwrap();
        fs::write(dir.path().join("Beta Two.TTF"), FIXTURE_FONT).unwrap();

        let catalog = FontCatalog::load(dir.path());
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["AlphaOne", "BetaTwo"]);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let picked = catalog.pick_random(&mut rng);
            assert!(picked.name() == "AlphaOne" || picked.name() == "BetaTwo");
            assert!(picked.face().is_some());
        }

        assert!(face.measure_width("WIDE TEXT", 40.0) > face.measure_width("WIDE", 40.0));
        assert!(face.measure_width("WIDE", 80.0) > face.measure_width("WIDE", 40.0));
    }
}

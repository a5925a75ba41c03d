use rand::{seq::SliceRandom, Rng};
use tiny_skia::Color;

pub const BACKGROUND: u32 = 0x0f172a;

/// Text colors of the plain card.
pub const TEXT_COLORS: [u32; 10] = [
    0xfacc15, 0x34d399, 0x60a5fa, 0xf472b6, 0xc084fc, 0xf87171, 0xfcd34d, 0x38bdf8, 0x4ade80,
    0xe879f9,
];

/// Primary/secondary accents of the dashboard card.
pub const ACCENT_PAIRS: [(u32, u32); 5] = [
    (0x38bdf8, 0x6366f1),
    (0xf472b6, 0xa855f7),
    (0x34d399, 0x0ea5e9),
    (0xfacc15, 0xf97316),
    (0xf87171, 0xfb7185),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorProfile {
    Solid(Color),
    Pair { primary: Color, secondary: Color },
}

impl ColorProfile {
    /// Coin flip between a flat color and a gradient pair, both drawn from
    /// [`TEXT_COLORS`].
    pub fn random_text<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gradient = rng.gen_bool(0.5);
        let mut pick = || rgb(*TEXT_COLORS.choose(&mut *rng).unwrap_or(&TEXT_COLORS[0]));

        if gradient {
            Self::Pair {
                primary: pick(),
                secondary: pick(),
            }
        } else {
            Self::Solid(pick())
        }
    }

    pub fn random_accent<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (primary, secondary) = *ACCENT_PAIRS.choose(rng).unwrap_or(&ACCENT_PAIRS[0]);
        Self::Pair {
            primary: rgb(primary),
            secondary: rgb(secondary),
        }
    }

    pub fn primary(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Pair { primary, .. } => *primary,
        }
    }

    pub fn secondary(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Pair { secondary, .. } => *secondary,
        }
    }
}

pub fn rgb(hex: u32) -> Color {
    rgba(hex, 1.0)
}

pub fn rgba(hex: u32, alpha: f32) -> Color {
    Color::from_rgba8(
        (hex >> 16) as u8,
        (hex >> 8) as u8,
        hex as u8,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

pub fn with_alpha(mut color: Color, alpha: f32) -> Color {
    color.apply_opacity(alpha);
    color
}

/// Text measuring capability of a concrete font.
pub trait Measure {
    /// Advance width of `text` set at `size` pixels.
    fn measure_width(&self, text: &str, size: f32) -> f32;
}

impl<M: Measure + ?Sized> Measure for &M {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        (**self).measure_width(text, size)
    }
}

/// Splits `text` into two balanced lines, the first one getting the extra
/// word. Two words or less stay on the first line.
pub fn split_two_lines(text: impl AsRef<str>) -> (String, String) {
    let words = text.as_ref().split_whitespace().collect::<Vec<_>>();

    if words.len() <= 2 {
        return (words.join(" "), String::new());
    }

    let mid = (words.len() + 1) / 2;
    (words[..mid].join(" "), words[mid..].join(" "))
}

/// Greedily packs words into lines no wider than `max_width`.
///
/// A single word wider than the budget still gets a line of its own.
pub fn wrap_words<'w>(
    words: impl IntoIterator<Item = &'w str>,
    measure: &impl Measure,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();

    for word in words {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let candidate = format!("{line} {word}");
        if measure.measure_width(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Smallest shrink applied per fitting step.
const MIN_FIT_STEP: f32 = 0.5;

#[derive(Clone, Copy, Debug)]
pub struct FitParams {
    pub start: f32,
    pub step: f32,
    pub floor: f32,
    pub max_width: f32,
}

/// Shrinks from `params.start` by `params.step` until the widest line fits
/// in `params.max_width`, stopping at `params.floor`. Steps below half a
/// point are raised to it.
pub fn fit_font_size<S: AsRef<str>>(
    measure: &impl Measure,
    lines: &[S],
    params: FitParams,
) -> f32 {
    let widest = |size: f32| {
        lines
            .iter()
            .map(|line| measure.measure_width(line.as_ref(), size))
            .fold(0.0, f32::max)
    };

    let step = params.step.max(MIN_FIT_STEP);
    let mut size = params.start.max(params.floor);
    while size > params.floor && widest(size) > params.max_width {
        size = (size - step).max(params.floor);
    }
    size
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every char is `ratio * size` wide.
    pub(crate) struct Monospace(pub f32);

    impl Measure for Monospace {
        fn measure_width(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * self.0
        }
    }

    #[test]
    fn split_short_text() {
        assert_eq!(split_two_lines(""), ("".into(), "".into()));
        assert_eq!(split_two_lines("hello"), ("hello".into(), "".into()));
        assert_eq!(
            split_two_lines("  hello \t world "),
            ("hello world".into(), "".into())
        );
    }

    #[test]
    fn split_long_text() {
        assert_eq!(
            split_two_lines("1 Months 2 Days 3 Hours 4 Minutes"),
            ("1 Months 2 Days".into(), "3 Hours 4 Minutes".into())
        );

        for n in 3..12 {
            let words = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>();
            let (first, second) = split_two_lines(words.join(" "));

            let first = first.split(' ').collect::<Vec<_>>();
            let second = second.split(' ').collect::<Vec<_>>();
            assert_eq!(first.len(), (n + 1) / 2);
            assert_eq!(
                first.iter().chain(second.iter()).copied().collect::<Vec<_>>(),
                words.iter().map(String::as_str).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn wrap_greedy() {
        let measure = Monospace(1.0);
        let words = "the quick brown fox jumps over the lazy dog";

        let lines = wrap_words(words.split_whitespace(), &measure, 1.0, 10.0);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert!(lines.iter().all(|l| measure.measure_width(l, 1.0) <= 10.0));

        assert_eq!(
            wrap_words(["incomprehensibilities", "ok"], &measure, 1.0, 10.0),
            vec!["incomprehensibilities", "ok"]
        );
        assert!(wrap_words([], &measure, 1.0, 10.0).is_empty());
    }

    #[test]
    fn fit_respects_floor() {
        let measure = Monospace(0.6);
        let params = FitParams {
            start: 100.0,
            step: 2.0,
            floor: 10.0,
            max_width: 850.0,
        };

        assert_eq!(fit_font_size(&measure, &["HI"], params), 100.0);

        let huge = "X".repeat(10_000);
        assert_eq!(fit_font_size(&measure, &[huge.as_str()], params), 10.0);

        let odd = FitParams { step: 7.0, ..params };
        assert_eq!(fit_font_size(&measure, &[huge.as_str()], odd), 10.0);
    }

    #[test]
    fn fit_terminates_with_degenerate_step() {
        let measure = Monospace(0.6);
        let huge = "X".repeat(10_000);

        for step in [0.0, -3.0, f32::NAN] {
            let params = FitParams {
                start: 100.0,
                step,
                floor: 10.0,
                max_width: 850.0,
            };
            assert_eq!(fit_font_size(&measure, &[huge.as_str()], params), 10.0);
        }

        // A zero step shrinks by half a point, 20 chars fit at 85.
        let params = FitParams {
            start: 100.0,
            step: 0.0,
            floor: 10.0,
            max_width: 850.0,
        };
        let line = "A".repeat(20);
        assert_eq!(fit_font_size(&Monospace(0.5), &[line.as_str()], params), 85.0);
    }

    #[test]
    fn fit_picks_largest_fitting_size() {
        let measure = Monospace(0.5);
        let params = FitParams {
            start: 100.0,
            step: 2.0,
            floor: 10.0,
            max_width: 850.0,
        };

        // 20 chars * 0.5 = 10 px per size unit, fits at 84 but not at 86.
        let line = "A".repeat(20);
        assert_eq!(fit_font_size(&measure, &[line.as_str(), ""], params), 84.0);
    }

    #[test]
    fn fit_is_monotonic() {
        let measure = Monospace(0.55);
        let params = FitParams {
            start: 100.0,
            step: 2.0,
            floor: 10.0,
            max_width: 850.0,
        };

        let mut last = f32::MAX;
        for len in 1..200 {
            let text = "M".repeat(len);
            let size = fit_font_size(&measure, &[text], params);
            assert!(size <= last, "len {len}: {size} > {last}");
            assert!(size >= params.floor);
            last = size;
        }
    }
}

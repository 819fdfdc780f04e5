//! Glyph labels for mosaic tiles.

use serde::{Deserialize, Serialize};

/// Returned when no glyph of a table is usable.
pub const SENTINEL_LABEL: &str = "?";
/// Emphasized tiles with `|hash|` below this pick an emoji.
pub const EMOJI_THRESHOLD: f64 = 0.15;

/// One section: plain glyphs, optionally followed by emoji from `emoji_start`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelSection {
    pub glyphs: Vec<String>,
    pub emoji_start: Option<usize>,
}

impl LabelSection {
    pub fn new(glyphs: &[&str], emoji_start: Option<usize>) -> Self {
        Self {
            glyphs: glyphs.iter().map(|g| (*g).to_owned()).collect(),
            emoji_start,
        }
    }

    fn usable(&self, index: usize) -> Option<&str> {
        self.glyphs
            .get(index)
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    pub sections: Vec<LabelSection>,
}

impl Default for LabelTable {
    fn default() -> Self {
        Self {
            sections: vec![
                LabelSection::new(
                    &["a", "r", "t", "e", "c", "h", "🖌️", "🎨", "🧵", "📱", "🖥️", "📡", "🤖"],
                    Some(6),
                ),
                LabelSection::new(
                    &["c", "r", "e", "a", "t", "i", "o", "n", "🪄", "🔮", "🧬", "✨", "💡"],
                    Some(8),
                ),
                LabelSection::new(
                    &[
                        "h", "u", "m", "a", "n", "👨", "👩", "🧓", "👵", "🧑‍🦱", "✋🏻", "✋🏼", "✋🏽",
                        "✋🏾", "✋🏿",
                    ],
                    Some(5),
                ),
                LabelSection::new(
                    &[
                        "m", "o", "r", "e", "t", "h", "a", "n", "🐦", "🐋", "🐇", "🦋", "🌱", "🌳",
                        "🌍", "🌈", "🔥", "⛰️",
                    ],
                    Some(8),
                ),
            ],
        }
    }
}

impl LabelTable {
    pub fn single(glyphs: &[&str]) -> Self {
        Self {
            sections: vec![LabelSection::new(glyphs, None)],
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Label for a cell with `hash` in `section`. Never empty.
    ///
    /// An out-of-range section reads section 0, a non-finite hash counts as
    /// 0.5. `emphasize` lets low hashes pick from the section's emoji.
    /// Unusable (blank) glyphs are skipped cyclically; a table with nothing
    /// usable yields [`SENTINEL_LABEL`].
    pub fn resolve(&self, hash: f64, section: usize, emphasize: bool) -> &str {
        let Some(section) = self.sections.get(section).or_else(|| self.sections.first()) else {
            return SENTINEL_LABEL;
        };
        let len = section.glyphs.len();
        if len == 0 {
            return SENTINEL_LABEL;
        }
        let hash = if hash.is_finite() { hash.abs() } else { 0.5 };

        if emphasize && hash < EMOJI_THRESHOLD {
            if let Some(start) = section.emoji_start.filter(|&s| s < len) {
                let spread = (hash / EMOJI_THRESHOLD * 1000.0).floor() as usize;
                if let Some(glyph) = section.usable(start + spread % (len - start)) {
                    return glyph;
                }
            }
        }

        let first = (hash * len as f64).floor() as usize % len;
        (0..len)
            .find_map(|k| section.usable((first + k) % len))
            .unwrap_or(SENTINEL_LABEL)
    }
}

/// True for glyphs that need the system emoji font.
pub fn is_emoji(glyph: &str) -> bool {
    let Some(c) = glyph.chars().next() else {
        return false;
    };
    matches!(
        c as u32,
        0x1F300..=0x1F9FF
            | 0x2600..=0x26FF
            | 0x2700..=0x27BF
            | 0xFE00..=0xFE0F
            | 0x1F1E0..=0x1F1FF
    )
}

/// Cycles through label sections on a fixed period of host time.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionClock {
    period_ms: f64,
    count: usize,
    current: usize,
    started_ms: Option<f64>,
}

impl SectionClock {
    pub fn new(period_ms: f64, count: usize) -> Self {
        Self {
            period_ms,
            count: count.max(1),
            current: 0,
            started_ms: None,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Moves to the next section once a full period has passed since the
    /// last change. Returns true when the section changed.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let started = *self.started_ms.get_or_insert(now_ms);
        let elapsed = now_ms - started;
        if self.count < 2 || elapsed.is_nan() || elapsed < self.period_ms {
            return false;
        }
        self.current = (self.current + 1) % self.count;
        self.started_ms = Some(now_ms);
        log::info!("label section -> {}", self.current);
        true
    }
}

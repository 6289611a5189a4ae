use palette::Srgb;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub type Rgb = Srgb<u8>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("The wheel palette needs at least one color")]
    Empty,
}

/// Distinct slice colors, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl TryFrom<Vec<[u8; 3]>> for Palette {
    type Error = PaletteError;

    fn try_from(raw: Vec<[u8; 3]>) -> Result<Self, Self::Error> {
        Self::new(raw.into_iter().map(|[r, g, b]| Rgb::new(r, g, b)))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb::new(230, 57, 70),
                Rgb::new(241, 250, 238),
                Rgb::new(168, 218, 220),
                Rgb::new(69, 123, 157),
                Rgb::new(29, 53, 87),
                Rgb::new(255, 183, 3),
            ],
        }
    }
}

impl Palette {
    pub fn new(colors: impl IntoIterator<Item = Rgb>) -> Result<Self, PaletteError> {
        let mut distinct: Vec<Rgb> = Vec::new();
        for color in colors {
            if !distinct.contains(&color) {
                distinct.push(color);
            }
        }

        if distinct.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors: distinct })
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors `count` slices laid out in a ring so that neighbours differ,
    /// including last against first. A constraint that would leave nothing to
    /// pick from is dropped instead.
    pub fn assign<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Rgb> {
        let mut assigned: Vec<Rgb> = Vec::with_capacity(count);

        for i in 0..count {
            let mut candidates = self.colors.clone();

            if let Some(prev) = assigned.last() {
                exclude(&mut candidates, prev);
            }

            let closing = count > 1 && i == count - 1;
            if closing && candidates.len() >= 2 {
                exclude(&mut candidates, &assigned[0]);
            }

            let color = candidates.choose(rng).copied().unwrap_or(self.colors[0]);
            assigned.push(color);
        }

        assigned
    }
}

fn exclude(candidates: &mut Vec<Rgb>, color: &Rgb) {
    if candidates.iter().any(|c| c != color) {
        candidates.retain(|c| c != color);
    }
}

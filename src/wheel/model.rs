use super::geometry::{self, Slice, normalize};
use super::ingest::{self, IngestError};
use crate::config::Config;
use crate::source::Table;
use rand::Rng;

/// The slices on screen plus how far they have turned.
#[derive(Debug, Clone)]
pub struct Wheel {
    slices: Vec<Slice>,
    origin: f64,
    rotation: f64,
    idle: bool,
    selected: Option<usize>,
}

impl Wheel {
    /// Runs a fetched table through ingestion, coloring and layout.
    pub fn build<R: Rng + ?Sized>(
        table: &Table,
        config: &Config,
        rng: &mut R,
    ) -> Result<Self, IngestError> {
        let candidates = ingest::ingest(
            table,
            &config.source.layout(),
            config.wheel.duplicate_policy(),
        )?;
        let colors = config.wheel.colors.assign(candidates.len(), rng);
        let origin = config.wheel.start_angle;

        Ok(Self::from_slices(
            geometry::layout(candidates, colors, origin),
            origin,
        ))
    }

    pub fn from_slices(slices: Vec<Slice>, origin: f64) -> Self {
        Self {
            slices,
            origin,
            rotation: 0.0,
            idle: true,
            selected: None,
        }
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rotate(&mut self, velocity: f64) {
        self.rotation = normalize(self.rotation + velocity);
    }

    /// Still showing the ambient drift of a wheel nobody has spun yet.
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn wake(&mut self) {
        self.idle = false;
    }

    /// Index of the slice covering the pointer at the current rotation.
    ///
    /// Walks cumulative spans from the layout origin instead of testing each
    /// slice, so float noise at a boundary still yields exactly one answer.
    pub fn slice_under_pointer(&self) -> Option<usize> {
        if self.slices.is_empty() {
            return None;
        }

        let pointer = normalize(-(self.rotation + self.origin));
        let mut end = 0.0;
        for (i, slice) in self.slices.iter().enumerate() {
            end += slice.angle;
            if pointer < end {
                return Some(i);
            }
        }
        Some(self.slices.len() - 1)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Slice> {
        self.selected.and_then(|i| self.slices.get(i))
    }

    /// Returns whether the selection moved to a different slice.
    pub fn select(&mut self, index: usize) -> bool {
        let changed = self.selected != Some(index);
        self.selected = Some(index);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::color::Rgb;
    use crate::wheel::ingest::EntryName;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn slice(name: &str, start_angle: f64, angle: f64) -> Slice {
        Slice {
            name: EntryName::new(name),
            sub: None,
            extras: Vec::new(),
            start_angle,
            angle,
            color: Rgb::new(0, 0, 0),
            units: 1,
        }
    }

    fn abc() -> Wheel {
        Wheel::from_slices(
            vec![
                slice("A", 0.0, 90.0),
                slice("B", 90.0, 180.0),
                slice("C", 270.0, 90.0),
            ],
            0.0,
        )
    }

    fn name_under_pointer(wheel: &Wheel) -> &str {
        let idx = wheel.slice_under_pointer().unwrap();
        wheel.slices()[idx].name.as_str()
    }

    #[test]
    fn test_selection_follows_rotation() {
        let mut wheel = abc();
        assert_eq!(name_under_pointer(&wheel), "A");
        wheel.rotate(95.0);
        assert_eq!(name_under_pointer(&wheel), "B");
        wheel.rotate(275.0);
        assert_eq!(name_under_pointer(&wheel), "C");
        wheel.rotate(-20.0);
        assert_eq!(name_under_pointer(&wheel), "A");
    }

    #[test]
    fn test_walk_agrees_with_span_test() {
        let mut wheel = abc();
        for _ in 0..1000 {
            wheel.rotate(0.37);
            let idx = wheel.slice_under_pointer().unwrap();
            let matching: Vec<_> = wheel
                .slices()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_under_pointer(wheel.rotation()))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(matching, vec![idx]);
        }
    }

    #[test]
    fn test_select_reports_change() {
        let mut wheel = abc();
        assert!(wheel.selected().is_none());
        assert!(wheel.select(1));
        assert!(!wheel.select(1));
        assert_eq!(wheel.selected().unwrap().name.as_str(), "B");
    }

    #[test]
    fn test_build_from_rows() {
        let table = Table::from_column(&["Cat", "Dog", "Cat", "Fish"]);
        let config = Config::default();
        let mut rng = StdRng::seed_from_u64(11);
        let wheel = Wheel::build(&table, &config, &mut rng).unwrap();

        let names: Vec<_> = wheel.slices().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cat", "Dog", "Fish"]);
        assert!(wheel.slices().iter().all(|s| (s.angle - 120.0).abs() < 1e-9));
        let total: f64 = wheel.slices().iter().map(|s| s.angle).sum();
        assert!((total - 360.0).abs() < 1e-9);
        assert!(wheel.is_idle());
    }

    #[test]
    fn test_build_rejects_empty_table() {
        let mut rng = StdRng::seed_from_u64(11);
        let err = Wheel::build(&Table::default(), &Config::default(), &mut rng).unwrap_err();
        assert_eq!(err, IngestError::NoData);
    }
}

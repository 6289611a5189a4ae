use super::color::Rgb;
use super::ingest::{Candidate, EntryName};
use super::FULL_TURN;

/// Folds any angle into `[0, 360)`.
pub fn normalize(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(FULL_TURN);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if r >= FULL_TURN { 0.0 } else { r }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: EntryName,
    pub sub: Option<String>,
    pub extras: Vec<String>,
    /// Wheel-local start, normalized to `[0, 360)`.
    pub start_angle: f64,
    pub angle: f64,
    pub color: Rgb,
    pub units: u32,
}

impl Slice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.angle
    }

    /// Middle of the span; labels are drawn along this ray so they stay
    /// centered on widened slices too.
    pub fn label_angle(&self) -> f64 {
        normalize(self.start_angle + self.angle / 2.0)
    }

    /// True when the span, turned by `rotation`, covers the pointer at screen
    /// angle 0. Spans are half-open, `[start, start + angle)`.
    pub fn is_under_pointer(&self, rotation: f64) -> bool {
        normalize(-(self.start_angle + rotation)) < self.angle
    }
}

/// Lays slices end to end from `origin`, one base span per unit.
///
/// Starts are derived from the running unit count rather than by summing
/// floats, and the last slice takes whatever is left of the turn so the wheel
/// always closes at `origin + 360`.
pub fn layout(candidates: Vec<Candidate>, colors: Vec<Rgb>, origin: f64) -> Vec<Slice> {
    let total_units: u32 = candidates.iter().map(|c| c.units).sum();
    if total_units == 0 {
        return Vec::new();
    }

    let base = FULL_TURN / total_units as f64;
    let count = candidates.len();
    let mut offset_units = 0u32;

    candidates
        .into_iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (candidate, color))| {
            let offset = offset_units as f64 * base;
            offset_units += candidate.units;

            let angle = if i + 1 == count {
                FULL_TURN - offset
            } else {
                candidate.units as f64 * base
            };

            Slice {
                name: candidate.entry.name,
                sub: candidate.entry.sub,
                extras: candidate.entry.extras,
                start_angle: normalize(origin + offset),
                angle,
                color,
                units: candidate.units,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::ingest::Entry;

    fn candidate(name: &str, units: u32) -> Candidate {
        Candidate {
            entry: Entry {
                name: EntryName::new(name),
                sub: None,
                extras: Vec::new(),
            },
            units,
        }
    }

    fn grey(n: usize) -> Vec<Rgb> {
        vec![Rgb::new(128, 128, 128); n]
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(455.0), 95.0);
        assert!(normalize(-1e-20) < FULL_TURN);
    }

    #[test]
    fn test_angles_close_the_turn() {
        for n in 1..200 {
            let candidates: Vec<_> = (0..n).map(|i| candidate(&i.to_string(), 1)).collect();
            let slices = layout(candidates, grey(n), 0.0);
            let sum: f64 = slices.iter().map(|s| s.angle).sum();
            assert!((sum - 360.0).abs() < 1e-9, "{} slices sum to {}", n, sum);
            assert!(slices.iter().all(|s| s.angle > 0.0));
        }
    }

    #[test]
    fn test_combined_units_widen_slice() {
        let slices = layout(
            vec![candidate("A", 2), candidate("B", 1), candidate("C", 1)],
            grey(3),
            0.0,
        );
        let spans: Vec<_> = slices
            .iter()
            .map(|s| (s.name.as_str(), s.start_angle, s.angle))
            .collect();
        assert_eq!(spans, vec![("A", 0.0, 180.0), ("B", 180.0, 90.0), ("C", 270.0, 90.0)]);
        assert_eq!(slices[0].label_angle(), 90.0);
    }

    #[test]
    fn test_origin_offsets_every_slice() {
        let slices = layout(
            vec![candidate("A", 1), candidate("B", 1), candidate("C", 1), candidate("D", 1)],
            grey(4),
            -90.0,
        );
        let starts: Vec<_> = slices.iter().map(|s| s.start_angle).collect();
        assert_eq!(starts, vec![270.0, 0.0, 90.0, 180.0]);
        assert_eq!(normalize(slices[3].end_angle()), 270.0);
    }

    #[test]
    fn test_pointer_wraps_across_zero() {
        let slices = layout(
            vec![candidate("A", 1), candidate("B", 2), candidate("C", 1)],
            grey(3),
            0.0,
        );
        let under = |rotation: f64| {
            slices
                .iter()
                .filter(|s| s.is_under_pointer(rotation))
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(under(0.0), vec!["A"]);
        // B turned by 95 spans 185..365, which covers 360 == 0
        assert_eq!(under(95.0), vec!["B"]);
        assert_eq!(under(-10.0), vec!["A"]);
        assert_eq!(under(10.0), vec!["C"]);
        assert_eq!(under(720.0 + 45.0), vec!["C"]);
    }
}

use super::model::Wheel;
use crate::config::SpinConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

/// Below this speed the exponential policy switches to a fixed linear
/// decrement, so the wheel crawls over the last few degrees and then stops.
pub const VELOCITY_FLOOR: f64 = 0.003;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Deceleration {
    /// Lose `decel_rate` percent of the current speed every frame.
    #[default]
    Exponential,
    /// Fixed decrements picked by speed band, coarse when fast and fine near rest.
    Stepped,
}

/// (lower speed bound, decrement) pairs, fastest band first.
const STEPPED_BANDS: &[(f64, f64)] = &[
    (10.0, 0.25),
    (3.0, 0.1),
    (1.0, 0.03),
    (0.2, 0.01),
    (0.0, VELOCITY_FLOOR),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinPhase {
    Idle,
    Spinning { velocity: f64 },
    Resolved,
}

/// What one frame of motion did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinStep {
    pub ticked: bool,
    pub resolved: bool,
}

#[derive(Debug, Clone)]
pub struct SpinController {
    settings: SpinConfig,
    phase: SpinPhase,
}

impl SpinController {
    pub fn new(settings: SpinConfig) -> Self {
        Self {
            settings,
            phase: SpinPhase::Idle,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, SpinPhase::Spinning { .. })
    }

    pub fn reset(&mut self) {
        self.phase = SpinPhase::Idle;
    }

    /// Kicks off a spin with a randomized starting speed and latches the slice
    /// currently under the pointer without reporting it as a tick.
    pub fn start<R: Rng + ?Sized>(&mut self, wheel: &mut Wheel, rng: &mut R) -> f64 {
        let extra = rng.gen_range(self.settings.extra_min..=self.settings.extra_max);
        let velocity = self.settings.base_velocity + extra as f64;
        self.start_with(wheel, velocity);
        velocity
    }

    pub fn start_with(&mut self, wheel: &mut Wheel, velocity: f64) {
        wheel.wake();
        if let Some(idx) = wheel.slice_under_pointer() {
            wheel.select(idx);
        }
        self.phase = SpinPhase::Spinning { velocity };
    }

    /// Advances one frame.
    pub fn step(&mut self, wheel: &mut Wheel) -> SpinStep {
        let SpinPhase::Spinning { velocity } = self.phase else {
            if wheel.is_idle() {
                wheel.rotate(self.settings.idle_velocity);
            }
            return SpinStep::default();
        };

        wheel.rotate(velocity);
        let ticked = wheel
            .slice_under_pointer()
            .is_some_and(|idx| wheel.select(idx));

        let next = self.decay(velocity);
        if next < 0.0 {
            self.phase = SpinPhase::Resolved;
            return SpinStep {
                ticked,
                resolved: true,
            };
        }

        self.phase = SpinPhase::Spinning { velocity: next };
        SpinStep {
            ticked,
            resolved: false,
        }
    }

    pub fn decay(&self, velocity: f64) -> f64 {
        match self.settings.deceleration {
            Deceleration::Exponential if velocity < VELOCITY_FLOOR => velocity - VELOCITY_FLOOR,
            Deceleration::Exponential => velocity - velocity * (self.settings.decel_rate / 100.0),
            Deceleration::Stepped => {
                let step = STEPPED_BANDS
                    .iter()
                    .find(|(bound, _)| velocity >= *bound)
                    .map_or(VELOCITY_FLOOR, |(_, step)| *step);
                velocity - step
            }
        }
    }
}

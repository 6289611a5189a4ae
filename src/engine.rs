use crate::config::Config;
use crate::control::{CommandSource, ResultSink};
use crate::events::{WheelEvent, Winner};
use crate::source::{RowSource, SourceError, Table};
use crate::wheel::{IngestError, SpinController, SpinPhase, Wheel};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Frame-driven wheel: polls commands, moves the wheel, resolves spins.
///
/// Everything happens inside [`Engine::frame`]; collaborators react to the
/// returned events.
pub struct Engine {
    config: Config,
    wheel: Wheel,
    spin: SpinController,
    commands: Box<dyn CommandSource>,
    results: Box<dyn ResultSink>,
    fetching: bool,
    winner: Option<Winner>,
    rng: StdRng,
}

impl Engine {
    pub fn new(
        config: Config,
        wheel: Wheel,
        mut commands: Box<dyn CommandSource>,
        results: Box<dyn ResultSink>,
    ) -> Self {
        commands.clear();
        let spin = SpinController::new(config.spin.clone());
        Self {
            config,
            wheel,
            spin,
            commands,
            results,
            fetching: false,
            winner: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Builds the first wheel synchronously; nothing is shown until this works.
    pub fn start(
        config: Config,
        source: &dyn RowSource,
        commands: Box<dyn CommandSource>,
        results: Box<dyn ResultSink>,
    ) -> Result<Self, ImportError> {
        let table = source.fetch()?;
        let wheel = Wheel::build(&table, &config, &mut StdRng::from_entropy())?;
        log::info!("Loaded wheel with {} slices", wheel.slices().len());
        Ok(Self::new(config, wheel, commands, results))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_spinning()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Winner on display, if the banner is not suppressed.
    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    /// One rendered frame.
    pub fn frame(&mut self) -> Vec<WheelEvent> {
        let mut events = Vec::new();

        let step = self.spin.step(&mut self.wheel);
        if step.ticked {
            log::debug!("Tick at {:.2} deg", self.wheel.rotation());
            events.push(WheelEvent::Tick);
        }
        if step.resolved {
            self.resolve(&mut events);
            return events;
        }

        // markers wait while the wheel moves or a table is on its way
        if self.spin.is_spinning() || self.fetching {
            return events;
        }

        if self.commands.poll_import() {
            self.fetching = true;
            self.winner = None;
            events.push(WheelEvent::ImportRequested);
        } else if self.commands.poll_spin() {
            self.winner = None;
            let velocity = self.spin.start(&mut self.wheel, &mut self.rng);
            log::info!("Spin started at {:.2} deg/frame", velocity);
            events.push(WheelEvent::SpinStarted);
        }

        events
    }

    fn resolve(&mut self, events: &mut Vec<WheelEvent>) {
        match self.wheel.selected().map(Winner::from) {
            Some(winner) => {
                log::info!("Wheel stopped on '{}'", winner.name);
                if let Err(e) = self.results.write_result(&winner) {
                    log::error!("Failed to write result files: {}", e);
                }
                if !self.config.wheel.suppress_win {
                    self.winner = Some(winner.clone());
                    events.push(WheelEvent::Finished(winner));
                }
            }
            None => log::warn!("Spin resolved without a selected slice"),
        }

        self.commands.clear();
    }

    /// Hands back the table an `ImportRequested` asked for. On failure the
    /// current wheel stays up.
    pub fn complete_import(
        &mut self,
        fetched: Result<Table, SourceError>,
    ) -> Result<(), ImportError> {
        self.fetching = false;

        let wheel = Wheel::build(&fetched?, &self.config, &mut self.rng)?;
        log::info!("Imported wheel with {} slices", wheel.slices().len());

        self.wheel = wheel;
        self.spin.reset();
        self.winner = None;
        Ok(())
    }
}

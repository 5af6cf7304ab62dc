//! Deterministic host harness around the charger application

use crate::peripherals::{SimConverter, SimPin, SimSystem, VecSink};
use crate::script::Script;
use crate::simulator::AdcSimulator;
use charger_adc::{AdcControlBlock, Reading};
use charger_app::{AppResult, ChargerApp, ChargerConfig, ChargerState, Peripherals, Resources, TIMER_SLOTS};
use charger_tick::{TickScheduler, TickTimerConfig};

/// Scheduler ticks kicked per harness step
pub const DEFAULT_TICKS_PER_STEP: u32 = 50;

/// Charger application wired to simulated hardware
pub type SimApp = ChargerApp<SimPin, SimPin, SimConverter, VecSink, TIMER_SLOTS>;

/// Runs the application against a scripted reading sequence
///
/// Each harness owns its own scheduler, timer and control block, so harnesses
/// do not interfere with each other. Trace records are the exception: they
/// pass through the process-wide trace buffer, and every step drains that
/// buffer into this harness's sink. Harnesses running concurrently in one
/// process can therefore capture each other's records, so replay
/// comparisons use [`Harness::readings`] and [`Harness::trajectory`].
pub struct Harness {
    app: SimApp,
    simulator: AdcSimulator,
    system: SimSystem,
    ticks_per_step: u32,
    steps: usize,
    readings: Vec<Reading>,
    trajectory: Vec<(Reading, ChargerState)>,
}

impl Harness {
    pub fn new(script: &Script, config: ChargerConfig) -> AppResult<Self> {
        let resources = Resources {
            scheduler: Box::leak(Box::new(TickScheduler::<TIMER_SLOTS>::new())),
            timer: Box::leak(Box::new(TickTimerConfig::new(config.tick_reload()))),
            adc: Box::leak(Box::new(AdcControlBlock::new(config.channel))),
        };
        let peripherals = Peripherals {
            charge: SimPin::new(),
            led: SimPin::new(),
            adc: SimConverter::new(),
            debug: VecSink::new(),
        };
        let mut system = SimSystem::new();
        let app = ChargerApp::new(peripherals, resources, &mut system, config)?;

        Ok(Self {
            app,
            simulator: AdcSimulator::new(script),
            system,
            ticks_per_step: DEFAULT_TICKS_PER_STEP,
            steps: 0,
            readings: Vec::new(),
            trajectory: Vec::new(),
        })
    }

    /// Change how many scheduler ticks elapse per step
    pub fn with_ticks_per_step(mut self, ticks: u32) -> Self {
        self.ticks_per_step = ticks;
        self
    }

    /// One pass of the simulated main loop
    ///
    /// Completes a pending conversion with the next scripted reading, kicks
    /// the scheduler, polls the application and flushes its trace records.
    /// Returns the reading delivered in this step, if any.
    pub fn step(&mut self) -> AppResult<Option<Reading>> {
        let adc = self.app.resources().adc;
        let delivered = if adc.is_busy() {
            self.simulator.deliver(adc)
        } else {
            None
        };

        self.app.resources().scheduler.kick(self.ticks_per_step);
        self.system.advance(self.ticks_per_step);
        self.app.poll()?;
        self.app.flush_trace()?;
        self.steps += 1;

        if let Some(reading) = delivered {
            self.readings.push(reading);
            self.trajectory.push((reading, self.app.state()));
        }
        Ok(delivered)
    }

    /// Step until every scripted reading has been delivered and consumed
    pub fn run_to_end(&mut self) -> AppResult<()> {
        while !self.simulator.is_exhausted() {
            self.step()?;
        }
        Ok(())
    }

    pub fn app(&self) -> &SimApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut SimApp {
        &mut self.app
    }

    pub fn state(&self) -> ChargerState {
        self.app.state()
    }

    pub fn system(&self) -> &SimSystem {
        &self.system
    }

    pub fn simulator(&self) -> &AdcSimulator {
        &self.simulator
    }

    /// Framed trace bytes flushed so far
    pub fn trace_bytes(&self) -> &[u8] {
        self.app.peripherals().debug.bytes()
    }

    /// Steps run so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Readings delivered, in order
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// State after each delivered reading was handled
    pub fn trajectory(&self) -> &[(Reading, ChargerState)] {
        &self.trajectory
    }

    /// Trajectory with consecutive repeats of the same state collapsed
    pub fn state_changes(&self) -> Vec<ChargerState> {
        let mut states: Vec<ChargerState> = self.trajectory.iter().map(|&(_, state)| state).collect();
        states.dedup();
        states
    }
}

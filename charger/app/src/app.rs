//! Main loop of the charger
//!
//! Two interrupts feed the loop: the tick interrupt expires the application
//! timer, and the ADC interrupt delivers conversions through the control
//! block. `poll` consumes both, in that order: ADC completion first, then the
//! application tick.

use crate::config::ChargerConfig;
use crate::error::{AppError, AppResult};
use crate::machine::{definition, Charger, ChargerEvent, ChargerState};
use charger_adc::AdcControlBlock;
use charger_core::{EventId, MachineId};
use charger_hal::adc::{AdcConfig, AdcConverter};
use charger_hal::debug::ByteSink;
use charger_hal::gpio::{DigitalOutput, IoControl};
use charger_hal::interrupt::InterruptControl;
use charger_hal::timer::TimeBase;
use charger_hal::watchdog::Watchdog;
use charger_sm::{MachineManager, Outcome};
use charger_tick::{TickScheduler, TickTimerConfig, TICK_PERIOD_MS};

/// Hardware the application drives
pub struct Peripherals<C, L, A, D> {
    /// Charge enable output
    pub charge: C,
    /// Charge status LED
    pub led: L,
    /// Battery sense converter
    pub adc: A,
    /// Trace output
    pub debug: D,
}

/// Interrupt-shared records, living in statics next to the handlers
pub struct Resources<const T: usize> {
    pub scheduler: &'static TickScheduler<T>,
    pub timer: &'static TickTimerConfig,
    pub adc: &'static AdcControlBlock,
}

/// Clock, interrupt and watchdog control used once at startup
pub trait System: TimeBase + InterruptControl + Watchdog {}

impl<S: TimeBase + InterruptControl + Watchdog> System for S {}

/// The battery charger: one state machine, its context and its hardware
pub struct ChargerApp<C, L, A, D, const T: usize> {
    peripherals: Peripherals<C, L, A, D>,
    resources: Resources<T>,
    machines: MachineManager<Charger, 1>,
    machine: MachineId,
    charger: Charger,
    overruns: u32,
}

impl<C, L, A, D, const T: usize> ChargerApp<C, L, A, D, T>
where
    C: DigitalOutput,
    L: DigitalOutput,
    A: AdcConverter,
    D: ByteSink,
{
    /// Bring the charger up
    ///
    /// Rejects an invalid `config` before touching any hardware. Then
    /// switches both outputs off, configures the converter, starts the tick
    /// interrupt, registers and starts the application timer, registers and
    /// activates the machine in `WaitForBattery`, enables interrupts,
    /// disables the watchdog and emits the target info trace record.
    pub fn new(
        mut peripherals: Peripherals<C, L, A, D>,
        resources: Resources<T>,
        system: &mut impl System,
        config: ChargerConfig,
    ) -> AppResult<Self> {
        config.validate()?;

        peripherals.charge.control(IoControl::Off)?;
        peripherals.led.control(IoControl::Off)?;
        peripherals.adc.configure(&AdcConfig::default())?;

        system.start_periodic(TICK_PERIOD_MS)?;
        resources.timer.set_reload(config.tick_reload());
        resources.scheduler.add_timer_config(resources.timer)?;
        resources.timer.set_active(true);

        let mut machines = MachineManager::new();
        let machine = machines.init(definition()?, ChargerState::WaitForBattery.id())?;
        machines.set_active(machine, true)?;

        let mut charger = Charger::new(config);
        charger.set_machine(machine);

        system.enable_global();
        system.disable()?;
        charger_trace::target_info(config.target_name);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "charger up: tick {} ms, timeout {} ticks, threshold {}",
            config.tick_ms,
            config.timeout_counts(),
            config.negative_delta_v
        );

        Ok(Self {
            peripherals,
            resources,
            machines,
            machine,
            charger,
            overruns: 0,
        })
    }

    /// Like [`Self::new`], but a startup failure is fatal
    pub fn start(
        peripherals: Peripherals<C, L, A, D>,
        resources: Resources<T>,
        system: &mut impl System,
        config: ChargerConfig,
    ) -> Self {
        match Self::new(peripherals, resources, system, config) {
            Ok(app) => app,
            Err(err) => panic!("charger startup failed: {}", err),
        }
    }

    /// One pass of the main loop
    pub fn poll(&mut self) -> AppResult<()> {
        charger_trace::set_time(self.resources.scheduler.now());

        if self.resources.adc.test_and_clear() {
            self.on_conversion()?;
        }

        if self.resources.timer.test_and_clear() {
            self.on_tick()?;
        }

        Ok(())
    }

    /// Poll forever, sleeping between passes
    pub fn run(mut self) -> ! {
        loop {
            if let Err(_err) = self.poll() {
                #[cfg(feature = "defmt")]
                defmt::warn!("poll failed: {}", _err);
            }
            let _ = self.flush_trace();
            Self::on_idle();
        }
    }

    /// Move queued trace records into the debug output
    pub fn flush_trace(&mut self) -> AppResult<usize> {
        charger_trace::drain(&mut self.peripherals.debug).map_err(AppError::from)
    }

    /// Current charger state
    pub fn state(&self) -> ChargerState {
        self.machines
            .state(self.machine)
            .ok()
            .and_then(ChargerState::from_id)
            .unwrap_or(ChargerState::WaitForBattery)
    }

    /// Machine context
    pub fn charger(&self) -> &Charger {
        &self.charger
    }

    pub fn peripherals(&self) -> &Peripherals<C, L, A, D> {
        &self.peripherals
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<C, L, A, D> {
        &mut self.peripherals
    }

    pub fn resources(&self) -> &Resources<T> {
        &self.resources
    }

    fn on_conversion(&mut self) -> AppResult<()> {
        let adc = self.resources.adc;
        let reading = adc.reading();
        charger_trace::adc_reading(adc.channel().number(), reading);

        let overruns = adc.overruns();
        if overruns != self.overruns {
            self.overruns = overruns;
            charger_trace::adc_overrun(overruns);

            #[cfg(feature = "defmt")]
            defmt::warn!("ADC overrun ({} total)", overruns);
        }

        self.charger.set_latest_reading(reading);
        let event = if self.charger.config().is_connected(reading) {
            ChargerEvent::BatteryPresent
        } else {
            ChargerEvent::Unplugged
        };
        self.dispatch(event)
    }

    fn on_tick(&mut self) -> AppResult<()> {
        self.start_conversion()?;

        if self.state() == ChargerState::Charging {
            let timed_out = self.charger.count_charge_tick();
            charger_trace::timer_expired(self.charger.charge_ticks());
            if timed_out {
                charger_trace::charge_timeout(self.charger.charge_ticks());

                #[cfg(feature = "defmt")]
                defmt::warn!("charge timeout after {} ticks", self.charger.charge_ticks());

                self.dispatch(ChargerEvent::TimerExpired)?;
            }
        }

        self.update_led()
    }

    /// Trigger the next conversion unless one is still running
    fn start_conversion(&mut self) -> AppResult<()> {
        let adc = self.resources.adc;
        if adc.begin_conversion() {
            self.peripherals
                .adc
                .start_conversion(adc.channel().number())?;
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("ADC still busy at tick, skipping trigger");
        }
        Ok(())
    }

    fn update_led(&mut self) -> AppResult<()> {
        let command = match self.state() {
            ChargerState::WaitForBattery => IoControl::Off,
            ChargerState::WaitForUnplug => IoControl::Toggle,
            ChargerState::Charging => IoControl::On,
        };
        self.peripherals.led.control(command)?;
        Ok(())
    }

    /// Dispatch `event`, then every follow-up event its actions raised
    fn dispatch(&mut self, event: ChargerEvent) -> AppResult<()> {
        let mut next: Option<EventId> = Some(event.id());
        while let Some(event) = next {
            let outcome = self.machines.event(self.machine, &mut self.charger, event)?;
            if let Outcome::Ignored { state, event } = outcome {
                charger_trace::ignored(self.machine, state, event);
            }
            if let Some(command) = self.charger.take_charge_command() {
                self.peripherals.charge.control(command)?;
            }
            next = self.charger.next_deferred();
        }
        Ok(())
    }

    fn on_idle() {
        #[cfg(target_arch = "arm")]
        {
            // Wait for interrupt on ARM
            cortex_m::asm::wfi();
        }
    }
}

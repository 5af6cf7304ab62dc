//! Charger state machine: states, events, transition table and actions

use crate::config::{ChargerConfig, AVERAGING_WINDOW};
use charger_adc::{ChargeFilter, Reading};
use charger_core::{CoreResult, EventId, MachineId, StateId};
use charger_hal::gpio::IoControl;
use charger_sm::{Definition, EventQueue, State, Step, Transition};

/// Charger states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargerState {
    WaitForBattery = 0,
    WaitForUnplug = 1,
    Charging = 2,
}

impl ChargerState {
    pub const COUNT: usize = 3;

    pub const fn id(self) -> StateId {
        StateId(self as u8)
    }

    pub const fn from_id(id: StateId) -> Option<Self> {
        match id.0 {
            0 => Some(Self::WaitForBattery),
            1 => Some(Self::WaitForUnplug),
            2 => Some(Self::Charging),
            _ => None,
        }
    }
}

impl From<ChargerState> for StateId {
    fn from(state: ChargerState) -> Self {
        state.id()
    }
}

/// Charger events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargerEvent {
    BatteryPresent = 0,
    Unplugged = 1,
    Charged = 2,
    TimerExpired = 3,
}

impl ChargerEvent {
    pub const COUNT: usize = 4;

    pub const fn id(self) -> EventId {
        EventId(self as u8)
    }

    pub const fn from_id(id: EventId) -> Option<Self> {
        match id.0 {
            0 => Some(Self::BatteryPresent),
            1 => Some(Self::Unplugged),
            2 => Some(Self::Charged),
            3 => Some(Self::TimerExpired),
            _ => None,
        }
    }
}

impl From<ChargerEvent> for EventId {
    fn from(event: ChargerEvent) -> Self {
        event.id()
    }
}

/// Room for follow-up events raised during one dispatch
pub const DEFERRED_EVENTS: usize = 4;

/// Context owned by the application and handed to every action and hook
pub struct Charger {
    config: ChargerConfig,
    machine: MachineId,
    filter: ChargeFilter<AVERAGING_WINDOW>,
    latest_reading: Reading,
    charge_ticks: u32,
    charge_command: Option<IoControl>,
    deferred: EventQueue<DEFERRED_EVENTS>,
}

impl Charger {
    pub const fn new(config: ChargerConfig) -> Self {
        Self {
            config,
            machine: MachineId::new(0),
            filter: ChargeFilter::new(config.negative_delta_v),
            latest_reading: 0,
            charge_ticks: 0,
            charge_command: None,
            deferred: EventQueue::new(),
        }
    }

    pub fn config(&self) -> &ChargerConfig {
        &self.config
    }

    /// Handle the machine was registered under, used in trace records
    pub fn set_machine(&mut self, machine: MachineId) {
        self.machine = machine;
    }

    /// Record the reading the next `BatteryPresent` dispatch works on
    pub fn set_latest_reading(&mut self, reading: Reading) {
        self.latest_reading = reading;
    }

    pub fn latest_reading(&self) -> Reading {
        self.latest_reading
    }

    pub fn filter(&self) -> &ChargeFilter<AVERAGING_WINDOW> {
        &self.filter
    }

    /// Application ticks spent in the current charge
    pub fn charge_ticks(&self) -> u32 {
        self.charge_ticks
    }

    /// Count one application tick; returns `true` once the timeout is reached
    pub fn count_charge_tick(&mut self) -> bool {
        self.charge_ticks = self.charge_ticks.saturating_add(1);
        self.charge_ticks >= self.config.timeout_counts()
    }

    /// Charge output command left by the last action, if any
    pub fn take_charge_command(&mut self) -> Option<IoControl> {
        self.charge_command.take()
    }

    /// Next follow-up event raised by an action
    pub fn next_deferred(&mut self) -> Option<EventId> {
        self.deferred.pop()
    }

    fn raise(&mut self, event: ChargerEvent) {
        if self.deferred.post(event.id()).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("deferred queue full, dropping {}", event);
        }
    }
}

fn start_charging(ctx: &mut Charger, _step: Step) {
    ctx.filter.reset();
    ctx.charge_ticks = 0;
    ctx.charge_command = Some(IoControl::On);

    #[cfg(feature = "defmt")]
    defmt::info!("charging started");
}

fn stop_charging(ctx: &mut Charger, _step: Step) {
    ctx.charge_command = Some(IoControl::Off);

    #[cfg(feature = "defmt")]
    defmt::info!("charging stopped on {}", _step.event);
}

fn test_charge_state(ctx: &mut Charger, _step: Step) {
    if ctx.filter.new_data(ctx.latest_reading) {
        let peak = ctx.filter.highest();
        let average = ctx.filter.average();
        charger_trace::charged(peak, average);

        #[cfg(feature = "defmt")]
        defmt::info!("negative delta V: peak {} average {}", peak, average);

        ctx.raise(ChargerEvent::Charged);
    }
}

fn on_entry(ctx: &mut Charger, step: Step) {
    charger_trace::state_entry(ctx.machine, step.from, step.to, step.event);

    #[cfg(feature = "defmt")]
    defmt::debug!("enter {}", step);
}

const WAIT_FOR_BATTERY: StateId = ChargerState::WaitForBattery.id();
const WAIT_FOR_UNPLUG: StateId = ChargerState::WaitForUnplug.id();
const CHARGING: StateId = ChargerState::Charging.id();

const BATTERY_PRESENT: EventId = ChargerEvent::BatteryPresent.id();
const UNPLUGGED: EventId = ChargerEvent::Unplugged.id();
const CHARGED: EventId = ChargerEvent::Charged.id();
const TIMER_EXPIRED: EventId = ChargerEvent::TimerExpired.id();

/// Charger states, each tracing its entry
pub static STATES: [State<Charger>; ChargerState::COUNT] = [
    State::with_entry(WAIT_FOR_BATTERY, on_entry),
    State::with_entry(WAIT_FOR_UNPLUG, on_entry),
    State::with_entry(CHARGING, on_entry),
];

/// Charger transition table
pub static TRANSITIONS: [Transition<Charger>; 8] = [
    Transition::with_action(WAIT_FOR_BATTERY, BATTERY_PRESENT, start_charging, CHARGING),
    Transition::new(WAIT_FOR_BATTERY, UNPLUGGED, WAIT_FOR_BATTERY),
    Transition::new(WAIT_FOR_UNPLUG, UNPLUGGED, WAIT_FOR_BATTERY),
    Transition::new(WAIT_FOR_UNPLUG, BATTERY_PRESENT, WAIT_FOR_UNPLUG),
    Transition::with_action(CHARGING, BATTERY_PRESENT, test_charge_state, CHARGING),
    Transition::with_action(CHARGING, CHARGED, stop_charging, WAIT_FOR_UNPLUG),
    Transition::with_action(CHARGING, UNPLUGGED, stop_charging, WAIT_FOR_BATTERY),
    Transition::with_action(CHARGING, TIMER_EXPIRED, stop_charging, WAIT_FOR_UNPLUG),
];

/// Validated charger definition
pub fn definition() -> CoreResult<Definition<Charger>> {
    Definition::new(&STATES, &TRANSITIONS, ChargerEvent::COUNT, ChargerState::COUNT)
}

//! Temperature schedules and Boltzmann-factor helpers.

/// 1 / k_B expressed in kelvin per electron-volt.
pub const KELVIN_PER_EV: f64 = 11_604.522_110_5;

/// Inverse thermal energy β = 1 / (k_B · T) in 1/eV for a temperature in
/// kelvin. Non-positive temperatures yield a non-positive β, which the
/// sampling layer rejects.
pub fn inverse_kt(temperature: f64) -> f64 {
    KELVIN_PER_EV / temperature
}

/// Maps a lap index to the temperature the lap runs at; evaluated once per
/// lap by the driver.
pub trait TemperatureSchedule {
    fn temperature(&self, lap: u64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    kelvin: f64,
}

impl Constant {
    pub fn new(kelvin: f64) -> Self {
        Self { kelvin }
    }
}

impl TemperatureSchedule for Constant {
    fn temperature(&self, _lap: u64) -> f64 {
        self.kelvin
    }
}

/// Linear interpolation from `start` at lap 0 to `end` at the final lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRamp {
    start: f64,
    end: f64,
    laps: u64,
}

impl LinearRamp {
    pub fn new(start: f64, end: f64, laps: u64) -> Self {
        Self { start, end, laps }
    }
}

impl TemperatureSchedule for LinearRamp {
    fn temperature(&self, lap: u64) -> f64 {
        if self.laps <= 1 {
            return self.end;
        }
        let t = lap.min(self.laps - 1) as f64 / (self.laps - 1) as f64;
        self.start + (self.end - self.start) * t
    }
}

/// Exponential quench: `start · exp(-rate · lap)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialCooling {
    start: f64,
    rate: f64,
}

impl ExponentialCooling {
    pub fn new(start: f64, rate: f64) -> Self {
        Self { start, rate }
    }
}

impl TemperatureSchedule for ExponentialCooling {
    fn temperature(&self, lap: u64) -> f64 {
        self.start * (-self.rate * lap as f64).exp()
    }
}

//! Ports — traits the hardware adapters must implement.
//!
//! The engine drives relays and reads sensors through these traits so the
//! same control logic runs against GPIO pins, a virtual board or a test
//! recorder. Calls are synchronous; the underlying operations are pin writes
//! and 1-wire reads, not IO worth suspending on.

/// One reading of all sensors, temperatures in whole degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorSample {
    pub room_temperature: i32,
    pub room_humidity: i32,
    pub terrarium_temperature: i32,
}

/// Outbound port for switching devices.
pub trait ActuatorDriver {
    /// Drive the named device's output high.
    fn switch_on(&mut self, device: &str);

    /// Drive the named device's output low.
    fn switch_off(&mut self, device: &str);
}

/// Outbound port for the temperature/humidity sensors.
pub trait SensorReader {
    /// Take a fresh reading from the hardware.
    fn sample(&mut self) -> SensorSample;
}

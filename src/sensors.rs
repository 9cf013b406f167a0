//! Quantities tracked by the monitor and the per-cycle reading.
//!
//! Drivers live outside this crate; whatever reads the SHT-class sensor hands
//! the cascade a [`Reading`] in physical units.

/// Physical quantity with its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Degrees Celsius
    Temperature,
    /// Relative humidity, percent
    Humidity,
}

impl Quantity {
    pub const ALL: [Quantity; 2] = [Self::Temperature, Self::Humidity];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
        }
    }
}

/// One temperature/humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity, percent
    pub humidity: f32,
}

impl Reading {
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Value of `quantity` in physical units.
    pub const fn value(&self, quantity: Quantity) -> f32 {
        match quantity {
            Quantity::Temperature => self.temperature,
            Quantity::Humidity => self.humidity,
        }
    }
}

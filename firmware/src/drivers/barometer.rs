use core::fmt;

/// Which conversion the barometer should start next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaroRequest {
    Pressure,
    Temperature,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaroFault {
    Bus,
    NotReady,
}

impl fmt::Display for BaroFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaroFault::Bus => write!(f, "barometer bus error"),
            BaroFault::NotReady => write!(f, "barometer conversion not ready"),
        }
    }
}

/// A barometer whose readout is split into request / read / compensate phases so that
/// conversions run while the sampling task sleeps.
pub trait Barometer {
    /// Starts a conversion; its result is collected by the next `read`.
    async fn prepare(&mut self, request: BaroRequest) -> Result<(), BaroFault>;

    /// Collects the result of the conversion started by the last `prepare`.
    async fn read(&mut self) -> Result<(), BaroFault>;

    /// Compensated (pressure in Pa, temperature in 0.01 °C) from the latest pressure and
    /// temperature conversions.
    async fn get_measurement(&mut self) -> Result<(i32, i32), BaroFault>;
}

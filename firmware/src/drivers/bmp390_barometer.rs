use bmp390::Bmp390;
use embedded_hal_async::i2c::I2c;
use log::warn;
use uom::si::{pressure::pascal, thermodynamic_temperature::degree_celsius};

use crate::drivers::barometer::{BaroFault, BaroRequest, Barometer};

/// Splits the BMP390's continuous (normal mode) conversions into the request / read /
/// compensate cycle of [`Barometer`]: `read` fetches whichever quantity the last `prepare`
/// asked for.
pub struct Bmp390Barometer<I2C> {
    bmp: Bmp390<I2C>,
    pending: Option<BaroRequest>,
    // in Pa
    pressure: Option<f32>,
    // in degrees celsius
    temperature: Option<f32>,
}

impl<I2C, E> Bmp390Barometer<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(bmp: Bmp390<I2C>) -> Self {
        Self {
            bmp,
            pending: None,
            pressure: None,
            temperature: None,
        }
    }
}

impl<I2C, E> Barometer for Bmp390Barometer<I2C>
where
    I2C: I2c<Error = E>,
{
    async fn prepare(&mut self, request: BaroRequest) -> Result<(), BaroFault> {
        self.pending = Some(request);
        Ok(())
    }

    async fn read(&mut self) -> Result<(), BaroFault> {
        match self.pending.take() {
            Some(BaroRequest::Pressure) => {
                let pressure = self.bmp.pressure().await.map_err(|_| BaroFault::Bus)?;
                self.pressure = Some(pressure.get::<pascal>());
            }
            Some(BaroRequest::Temperature) => {
                let temperature = self.bmp.temperature().await.map_err(|_| BaroFault::Bus)?;
                self.temperature = Some(temperature.get::<degree_celsius>());
            }
            None => {
                warn!("Barometer read without a pending request");
                return Err(BaroFault::NotReady);
            }
        }
        Ok(())
    }

    async fn get_measurement(&mut self) -> Result<(i32, i32), BaroFault> {
        match (self.pressure, self.temperature) {
            (Some(pressure), Some(temperature)) => {
                Ok((pressure as i32, (temperature * 100.0) as i32))
            }
            _ => Err(BaroFault::NotReady),
        }
    }
}

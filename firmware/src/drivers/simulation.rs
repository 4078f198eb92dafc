use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

/// Externally supplied sensor values that replace live reads while a simulation runs.
pub trait SimulationInput {
    fn is_active(&self) -> bool;

    /// Injected pressure (Pa) for barometer `index`.
    fn baro_pressure(&self, index: usize) -> Option<i32>;

    /// Injected accelerometer triple for IMU `index`.
    fn imu_accel(&self, index: usize) -> Option<[i16; 3]>;
}

impl<T: SimulationInput> SimulationInput for &T {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn baro_pressure(&self, index: usize) -> Option<i32> {
        (**self).baro_pressure(index)
    }

    fn imu_accel(&self, index: usize) -> Option<[i16; 3]> {
        (**self).imu_accel(index)
    }
}

/// Live sensors only.
#[derive(Clone, Copy, Default)]
pub struct NoSimulation;

impl SimulationInput for NoSimulation {
    fn is_active(&self) -> bool {
        false
    }

    fn baro_pressure(&self, _index: usize) -> Option<i32> {
        None
    }

    fn imu_accel(&self, _index: usize) -> Option<[i16; 3]> {
        None
    }
}

struct SimulatedSensors<const IMUS: usize, const BAROS: usize> {
    active: bool,
    baro_pressure: [i32; BAROS],
    imu_accel: [[i16; 3]; IMUS],
}

/// Simulation values shared between whoever feeds them (e.g. a host link task) and the
/// sampling task.
pub struct SharedSimulation<M: RawMutex, const IMUS: usize, const BAROS: usize> {
    inner: Mutex<M, RefCell<SimulatedSensors<IMUS, BAROS>>>,
}

impl<M: RawMutex, const IMUS: usize, const BAROS: usize> SharedSimulation<M, IMUS, BAROS> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(SimulatedSensors {
                active: false,
                baro_pressure: [0; BAROS],
                imu_accel: [[0; 3]; IMUS],
            })),
        }
    }

    pub fn start(&self) {
        self.inner.lock(|s| s.borrow_mut().active = true);
    }

    pub fn stop(&self) {
        self.inner.lock(|s| s.borrow_mut().active = false);
    }

    pub fn set_baro_pressure(&self, index: usize, pressure: i32) {
        self.inner.lock(|s| {
            if let Some(slot) = s.borrow_mut().baro_pressure.get_mut(index) {
                *slot = pressure;
            }
        });
    }

    pub fn set_imu_accel(&self, index: usize, accel: [i16; 3]) {
        self.inner.lock(|s| {
            if let Some(slot) = s.borrow_mut().imu_accel.get_mut(index) {
                *slot = accel;
            }
        });
    }
}

impl<M: RawMutex, const IMUS: usize, const BAROS: usize> SimulationInput
    for SharedSimulation<M, IMUS, BAROS>
{
    fn is_active(&self) -> bool {
        self.inner.lock(|s| s.borrow().active)
    }

    fn baro_pressure(&self, index: usize) -> Option<i32> {
        self.inner.lock(|s| s.borrow().baro_pressure.get(index).copied())
    }

    fn imu_accel(&self, index: usize) -> Option<[i16; 3]> {
        self.inner.lock(|s| s.borrow().imu_accel.get(index).copied())
    }
}

//! Host stand-ins for the sampling task's collaborators.

use fc_interface::{ChannelId, RecordEntry, RecordPayload, RecordType};

use crate::{
    drivers::{
        barometer::{BaroFault, BaroRequest, Barometer},
        recorder::Recorder,
    },
    tools::tick_clock::TickClock,
};

#[derive(Default)]
pub struct VecRecorder {
    pub entries: Vec<RecordEntry>,
}

impl VecRecorder {
    pub fn of_kind(&self, kind: RecordType) -> Vec<RecordEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.channel.kind == kind)
            .copied()
            .collect()
    }
}

impl Recorder for VecRecorder {
    async fn record(&mut self, tick: u32, channel: ChannelId, payload: RecordPayload) {
        self.entries.push(RecordEntry {
            tick,
            channel,
            payload,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaroCall {
    Prepare(BaroRequest),
    Read,
    GetMeasurement,
}

pub struct FakeBarometer {
    pub calls: Vec<BaroCall>,
    pub measurement: (i32, i32),
    pub fail_measurement: bool,
}

impl FakeBarometer {
    pub fn new(pressure: i32, temperature: i32) -> Self {
        Self {
            calls: Vec::new(),
            measurement: (pressure, temperature),
            fail_measurement: false,
        }
    }

    pub fn requests(&self) -> Vec<BaroRequest> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BaroCall::Prepare(request) => Some(*request),
                _ => None,
            })
            .collect()
    }
}

impl Barometer for FakeBarometer {
    async fn prepare(&mut self, request: BaroRequest) -> Result<(), BaroFault> {
        self.calls.push(BaroCall::Prepare(request));
        Ok(())
    }

    async fn read(&mut self) -> Result<(), BaroFault> {
        self.calls.push(BaroCall::Read);
        Ok(())
    }

    async fn get_measurement(&mut self) -> Result<(i32, i32), BaroFault> {
        self.calls.push(BaroCall::GetMeasurement);
        if self.fail_measurement {
            return Err(BaroFault::Bus);
        }
        Ok(self.measurement)
    }
}

/// Clock that only moves when told to. `wait_until` jumps straight to the deadline unless the
/// clock is already past it, and records every deadline it was given.
pub struct ManualClock {
    pub now: u32,
    pub deadlines: Vec<u32>,
    // added to `now` on every wait, to model a tick that overran its slot
    pub lateness: u32,
}

impl ManualClock {
    pub fn starting_at(now: u32) -> Self {
        Self {
            now,
            deadlines: Vec::new(),
            lateness: 0,
        }
    }
}

impl TickClock for ManualClock {
    fn now(&self) -> u32 {
        self.now
    }

    async fn wait_until(&mut self, deadline: u32) {
        self.deadlines.push(deadline);
        self.now = self.now.wrapping_add(self.lateness);
        if (deadline.wrapping_sub(self.now) as i32) > 0 {
            self.now = deadline;
        }
    }
}

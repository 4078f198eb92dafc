use embassy_time::{Instant, Timer};

/// Scheduler time base in 1 ms ticks. Tick values wrap at `u32::MAX`.
pub trait TickClock {
    fn now(&self) -> u32;

    /// Suspends until the absolute tick `deadline`. Returns immediately if it already passed.
    async fn wait_until(&mut self, deadline: u32);

    async fn delay(&mut self, ticks: u32) {
        let deadline = self.now().wrapping_add(ticks);
        self.wait_until(deadline).await
    }
}

/// Tick clock on top of the embassy time driver.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTickClock;

impl TickClock for EmbassyTickClock {
    fn now(&self) -> u32 {
        Instant::now().as_millis() as u32
    }

    async fn wait_until(&mut self, deadline: u32) {
        Timer::at(deadline_instant(Instant::now(), deadline)).await
    }
}

/*
The deadline is a wrapping 32 bit tick, so it is placed relative to the
current 64 bit time: anything within +-24 days of now resolves to the
nearest matching instant. The Timer still waits on an absolute instant.
*/
fn deadline_instant(now: Instant, deadline: u32) -> Instant {
    let now_ms = now.as_millis();
    let offset = deadline.wrapping_sub(now_ms as u32) as i32;
    Instant::from_millis(now_ms.saturating_add_signed(offset as i64))
}

#[cfg(test)]
pub mod fake_lsm6dso32;
#[cfg(test)]
pub mod fakes;
pub mod tick_clock;

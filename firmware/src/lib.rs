#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod consts;
pub mod drivers;
pub mod global;
pub mod tasks;
pub mod tools;

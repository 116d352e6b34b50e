#![forbid(unsafe_code)]

pub mod badges;
pub mod model;
pub mod time;

pub use time::Clock;

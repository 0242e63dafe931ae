pub mod monitor;
pub mod mru;
pub mod tree;
mod world;

pub use monitor::{Monitor, MonitorId};
pub use world::{BindingData, Components, NodeKind, SpecialContainer, World};

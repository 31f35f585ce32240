pub mod bootstrap;
pub mod journal;
pub mod timer;

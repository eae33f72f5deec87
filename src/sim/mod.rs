pub mod actions;
pub mod damage;
pub mod events;
pub mod state;
pub mod stats;
pub mod status;
pub mod switching;
pub mod turn;

pub mod enemy;
pub mod lookahead;

// Lottery number generation.
// win_pool owns all randomness; generator maps template slots onto it.

pub mod generator;
pub mod handlers;
pub mod win_pool;

// Game session core for playing against an external FEN-for-move bot
pub mod board;
pub mod engine;
pub mod session;

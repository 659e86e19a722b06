pub mod codec;
pub mod engine;
pub mod operation;
pub mod ports;
pub mod wallet;

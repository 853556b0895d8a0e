pub mod abi;
pub mod contracts;
pub mod errors;
pub mod rpc;
pub mod transport;

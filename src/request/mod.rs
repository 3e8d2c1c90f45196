//! Request layer - assembling the call from collected values and sending it

pub mod client;
pub mod input;

pub use client::{Exchange, HttpTransport, RequestSummary, Transport, TransportResponse};
pub use input::{assemble, Assembly, FormValues, InputResult, PrefilledProvider, ValueProvider};

pub mod crop;
pub mod negotiation;
pub mod quote;

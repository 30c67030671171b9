// Domain layer - Pure models with no I/O
pub mod chart;
pub mod reading;

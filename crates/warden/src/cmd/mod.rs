pub mod action;
pub mod exec_data;
pub mod multisend;
pub mod proposal;
pub mod safe;
pub mod tx;

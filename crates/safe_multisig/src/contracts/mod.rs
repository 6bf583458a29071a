pub mod multisend;
pub mod safe;
pub mod timelock;

pub use self::multisend::IMultiSend;
pub use self::safe::Safe;
pub use self::timelock::ITimelock;

pub mod channel;
pub mod fault;

pub use channel::{ChannelReading, Snapshot, BED_CHANNEL, SOC_CHANNEL};
pub use fault::{Bound, FaultEvent, Notification, NotificationKind};

//! Single-board-computer support: figure out which board we run on and read
//! its SoC temperature through the vendor tooling.

pub mod doctor;
pub mod error;
pub mod platform;
pub mod runner;
pub mod soc;

pub use error::SocError;
pub use platform::{PlatformProbe, PlatformVariant};
pub use runner::{CommandOutput, CommandRunner, SocCommand, TokioRunner};
pub use soc::{SocReader, SocSupport};

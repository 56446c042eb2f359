//! Quote source strategies, one per upstream-backed provider

pub mod frog;
pub mod ghsol;
pub mod pushx;

pub use frog::{classify_frog_error, FrogSource};
pub use ghsol::GhsolSource;
pub use pushx::PushxSource;

use haul_types::ErrorKind;

use crate::provider::Classified;

fn classified(kind: ErrorKind) -> Classified {
	(kind, kind.default_message().to_string())
}

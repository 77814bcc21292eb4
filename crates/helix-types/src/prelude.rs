pub use crate::error::{Error, HxResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4

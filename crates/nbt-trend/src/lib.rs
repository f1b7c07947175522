//! nbt-trend
//!
//! Daily top-N net-buy selection and multi-day presence tracking.
//!
//! Pure over in-memory rows. The only I/O happens inside the caller-supplied
//! [`DailyRecordLoader`], once per date in the window.

mod engine;
mod loader;
mod topn;
mod types;
mod volume;

pub use engine::{build_trend, build_trend_concurrent, DEFAULT_MAX_WORKERS};
pub use loader::{DailyRecordLoader, LoadError};
pub use topn::select_top_n;
pub use types::*;
pub use volume::{is_security_code, normalize_code, parse_net_volume, shares_to_lots, LOT_SIZE};

//! Per-day top-N selection.

use chrono::NaiveDate;
use tracing::debug;

use crate::types::{DailyTopNRecord, RawTradeRow, TopNEntry};
use crate::volume::{is_security_code, normalize_code, parse_net_volume};

/// Rank one day's raw rows into its [`DailyTopNRecord`].
///
/// 1. Rows whose volume field does not parse are dropped (not zeroed).
/// 2. Only four-digit security codes are kept.
/// 3. Only volumes strictly greater than `volume_floor` are kept.
/// 4. Stable sort by volume descending: ties keep the source row order.
/// 5. The first `top_n` rows form the record.
pub fn select_top_n(
    date: NaiveDate,
    rows: &[RawTradeRow],
    top_n: usize,
    volume_floor: i64,
) -> DailyTopNRecord {
    let mut unparseable = 0usize;
    let mut entries: Vec<TopNEntry> = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(net_volume) = parse_net_volume(&row.volume_field) else {
            unparseable += 1;
            continue;
        };
        if !is_security_code(&row.code) || net_volume <= volume_floor {
            continue;
        }
        entries.push(TopNEntry {
            code: normalize_code(&row.code).to_string(),
            name: row.name.trim().to_string(),
            net_volume,
        });
    }

    // `sort_by` is stable.
    entries.sort_by(|a, b| b.net_volume.cmp(&a.net_volume));
    let qualifying = entries.len();
    entries.truncate(top_n);

    debug!(
        %date,
        rows = rows.len(),
        unparseable,
        qualifying,
        kept = entries.len(),
        "daily top-n selected"
    );

    DailyTopNRecord { date, entries }
}

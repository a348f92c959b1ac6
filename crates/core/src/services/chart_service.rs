use std::collections::BTreeMap;
use std::f64::consts::TAU;

use crate::models::chart::{CurrencySeries, HistorySeries, PieSlice, SeriesPoint};
use crate::models::symbol::Symbol;
use crate::models::transaction::TransactionRecord;

/// Turns ledger data into chart-ready data sets.
///
/// The core computes all the numbers; the front end only renders.
/// Pure functions: no I/O, no clock, no prices.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build one balance line per symbol from the full log.
    ///
    /// Each line starts with a `"Start"` point at 0, then gets one point per
    /// record of its symbol, in log order. The peak is the first point whose
    /// total is strictly above every earlier total (starting from 0), so a
    /// balance that never rises above zero has no peak.
    pub fn build_series(&self, full_log: &[TransactionRecord]) -> HistorySeries {
        let mut series: Vec<CurrencySeries> =
            Symbol::ALL.iter().map(|s| CurrencySeries::new(*s)).collect();
        let mut maxima = vec![0.0_f64; Symbol::ALL.len()];

        for record in full_log {
            let idx = record.currency.index();
            let point = SeriesPoint {
                label: record.label(),
                total: record.total,
                movement: Some(record.amount),
            };
            if point.total > maxima[idx] {
                maxima[idx] = point.total;
                series[idx].peak = Some(point.clone());
            }
            series[idx].points.push(point);
        }

        HistorySeries { series }
    }

    /// Split the pie between symbols proportionally to their balances.
    ///
    /// Slices follow canonical symbol order and are laid out clockwise from
    /// angle 0. Missing symbols count as 0. Returns no slices when the
    /// balances sum to zero.
    pub fn pie_proportions(&self, balances: &BTreeMap<Symbol, f64>) -> Vec<PieSlice> {
        let values: Vec<(Symbol, f64)> = Symbol::ALL
            .iter()
            .map(|s| (*s, balances.get(s).copied().unwrap_or(0.0).max(0.0)))
            .collect();
        let total: f64 = values.iter().map(|(_, v)| v).sum();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }

        let mut start_angle = 0.0;
        values
            .into_iter()
            .map(|(symbol, value)| {
                let share = value / total;
                let sweep_angle = share * TAU;
                let slice = PieSlice {
                    symbol,
                    value,
                    share,
                    start_angle,
                    sweep_angle,
                };
                start_angle += sweep_angle;
                slice
            })
            .collect()
    }

    /// Find the slice under `angle` (radians).
    ///
    /// Negative angles are wrapped into `[0, 2π)`. Slices are scanned in
    /// order, so an angle on a shared boundary resolves to the earlier slice.
    pub fn slice_at<'a>(&self, slices: &'a [PieSlice], angle: f64) -> Option<&'a PieSlice> {
        if !angle.is_finite() {
            return None;
        }
        let pos = normalize_angle(angle);
        slices.iter().find(|s| s.contains(pos))
    }

    /// Find the slice under a pointer at offset `(dx, dy)` from the pie centre.
    pub fn slice_at_offset<'a>(
        &self,
        slices: &'a [PieSlice],
        dx: f64,
        dy: f64,
    ) -> Option<&'a PieSlice> {
        self.slice_at(slices, dy.atan2(dx))
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

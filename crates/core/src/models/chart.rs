use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Label of the sentinel point every series starts from.
pub const START_LABEL: &str = "Start";

/// A single point of a per-currency balance line.
///
/// Generated by the core, rendered by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// X-axis label: `"Start"` or the transaction timestamp
    pub label: String,

    /// Balance after the transaction
    pub total: f64,

    /// Signed movement of the transaction; `None` for the start sentinel
    pub movement: Option<f64>,
}

impl SeriesPoint {
    pub fn start() -> Self {
        Self {
            label: START_LABEL.to_string(),
            total: 0.0,
            movement: None,
        }
    }

    /// Hover text for this point, e.g. `"BTC\nTotal: 2\nMovement: 2"`.
    pub fn tooltip(&self, symbol: Symbol) -> String {
        format!(
            "{symbol}\nTotal: {}\nMovement: {}",
            self.total,
            self.movement.unwrap_or(0.0)
        )
    }
}

/// Balance history of one currency, ready for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySeries {
    pub symbol: Symbol,

    /// Start sentinel followed by one point per transaction, in log order
    pub points: Vec<SeriesPoint>,

    /// First point whose total exceeded every earlier total; `None` if the
    /// balance never rose above zero
    pub peak: Option<SeriesPoint>,
}

impl CurrencySeries {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            points: vec![SeriesPoint::start()],
            peak: None,
        }
    }

    /// Balance after the last transaction (0 when there is none).
    pub fn latest_total(&self) -> f64 {
        self.points.last().map(|p| p.total).unwrap_or(0.0)
    }

    /// Number of transaction points, excluding the start sentinel.
    pub fn transaction_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Line-chart data for every supported currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    /// One series per symbol, in canonical symbol order
    pub series: Vec<CurrencySeries>,
}

impl HistorySeries {
    pub fn get(&self, symbol: Symbol) -> Option<&CurrencySeries> {
        self.series.iter().find(|s| s.symbol == symbol)
    }

    /// True when no currency has any transaction point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.transaction_count() == 0)
    }

    /// Upper bound for the y-axis: 10% headroom above the highest total.
    pub fn y_axis_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.total)
            .fold(0.0_f64, f64::max);
        max * 1.1
    }
}

/// One slice of the current-holdings pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub symbol: Symbol,

    /// Balance represented by this slice
    pub value: f64,

    /// Fraction of the whole pie, in `[0, 1]`
    pub share: f64,

    /// Angle (radians) where this slice begins
    pub start_angle: f64,

    /// Angular extent (radians): `share × 2π`
    pub sweep_angle: f64,
}

impl PieSlice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Closed-interval test; boundary angles belong to both neighbours and
    /// the caller's iteration order decides.
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle <= self.end_angle()
    }

    /// Hover text, e.g. `"BTC: 3"`.
    pub fn tooltip(&self) -> String {
        format!("{}: {}", self.symbol, self.value)
    }
}

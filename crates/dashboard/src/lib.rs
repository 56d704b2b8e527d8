//! Views, series and chart payloads for the health tracker dashboard.
//!
//! A [`View`] names one measurement type (sleep stage, heart rate, blood
//! oxygenation, stress) and carries everything needed to read and draw it:
//! the value column inside a stored series, the line shape, and for sleep
//! the ordinal-to-label mapping of the y-axis.
//!
//! The plot builders ([`build_single`], [`build_pair`] and
//! [`build_comparison`]) turn one or two [`Series`] into a [`ChartPayload`],
//! a plain tree of traces and layout axes that serializes to the figure
//! format the front end hands to Plotly.

mod plot;
mod series;
mod view;

pub use plot::{build_comparison, build_pair, build_single, Axis, ChartPayload, Layout, Line, Trace};
pub use series::{plateau_mask, Series};
pub use view::{all_ids, get, AxisOverride, LineShape, UnknownViewError, View, ViewId};

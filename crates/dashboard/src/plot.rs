use crate::{Series, View};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// vertical layout of a two row grid with a shared x-axis
const TOP_ROW: [f64; 2] = [0.575, 1.0];
const BOTTOM_ROW: [f64; 2] = [0.0, 0.425];

/// A complete chart: the traces and the layout axes they are drawn on.
///
/// Serializes to a Plotly figure (`{"data": [...], "layout": {...}}`) with no
/// references to external resources, so it can be sent as a whole response
/// body.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChartPayload {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// Axes keyed the way the renderer names them: `xaxis`, `yaxis2`, ...
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub line: Line,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Line {
    pub shape: crate::LineShape,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Axis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

impl Axis {
    fn anchored<T: Into<String>>(anchor: T) -> Self {
        Self {
            anchor: Some(anchor.into()),
            ..Default::default()
        }
    }

    fn with_domain(mut self, domain: [f64; 2]) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Applies the view's category labels, if it has any.
    fn with_override(mut self, view: &View) -> Self {
        if let Some(labels) = view.axis_overrides {
            self.tickvals = Some(labels.tickvals());
            self.ticktext = Some(labels.ticktext());
        }
        self
    }
}

impl Trace {
    fn new<T: Into<String>>(name: T, series: &Series, view: &View, row: usize) -> Self {
        let suffix = if row > 1 {
            row.to_string()
        } else {
            String::new()
        };

        Self {
            kind: "scatter".to_string(),
            mode: "lines".to_string(),
            name: name.into(),
            x: series.timestamps().to_vec(),
            y: series.values().to_vec(),
            line: Line {
                shape: view.line_shape,
            },
            xaxis: format!("x{suffix}"),
            yaxis: format!("y{suffix}"),
        }
    }
}

impl ChartPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of stacked rows, one per y-axis.
    pub fn rows(&self) -> usize {
        self.layout
            .axes
            .keys()
            .filter(|k| k.starts_with("yaxis"))
            .count()
    }

    pub fn axis(&self, key: &str) -> Option<&Axis> {
        self.layout.axes.get(key)
    }

    /// Two rows sharing the x-axis, with the top row on `x`/`y` and the
    /// bottom row on `x2`/`y2`.
    fn stacked(top: Trace, bottom: Trace, top_axis: Axis, bottom_axis: Axis) -> Self {
        let mut axes = BTreeMap::new();

        axes.insert(
            "xaxis".to_string(),
            Axis {
                matches: Some("x2".to_string()),
                showticklabels: Some(false),
                ..Axis::anchored("y").with_domain([0.0, 1.0])
            },
        );
        axes.insert(
            "xaxis2".to_string(),
            Axis::anchored("y2").with_domain([0.0, 1.0]),
        );
        axes.insert("yaxis".to_string(), top_axis.with_domain(TOP_ROW));
        axes.insert("yaxis2".to_string(), bottom_axis.with_domain(BOTTOM_ROW));

        Self {
            data: vec![top, bottom],
            layout: Layout { axes },
        }
    }
}

/// One series on a single plot.
pub fn build_single(series: &Series, view: &View) -> ChartPayload {
    let mut axes = BTreeMap::new();

    if view.axis_overrides.is_some() {
        axes.insert("yaxis".to_string(), Axis::default().with_override(view));
    }

    ChartPayload {
        data: vec![Trace::new(view.display_name, series, view, 1)],
        layout: Layout { axes },
    }
}

/// Two different views stacked over a shared time axis.
///
/// Category labels are only applied to the top row. A labelled view in the
/// bottom row shows raw ordinals.
pub fn build_pair(
    series_a: &Series,
    view_a: &View,
    series_b: &Series,
    view_b: &View,
) -> ChartPayload {
    ChartPayload::stacked(
        Trace::new(view_a.display_name, series_a, view_a, 1),
        Trace::new(view_b.display_name, series_b, view_b, 2),
        Axis::anchored("x").with_override(view_a),
        Axis::anchored("x2"),
    )
}

/// The same view for two users stacked over a shared time axis. Category
/// labels, if the view has them, apply to both rows.
pub fn build_comparison(
    series_user1: &Series,
    series_user2: &Series,
    view: &View,
    label1: &str,
    label2: &str,
) -> ChartPayload {
    ChartPayload::stacked(
        Trace::new(format!("{label1} {}", view.display_name), series_user1, view, 1),
        Trace::new(format!("{label2} {}", view.display_name), series_user2, view, 2),
        Axis::anchored("x").with_override(view),
        Axis::anchored("x2").with_override(view),
    )
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown view: {0:?}")]
pub struct UnknownViewError(pub String);

/// Identifies one measurement type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    Sleep,
    HeartRate,
    BloodOxygenation,
    Stress,
}

impl ViewId {
    pub const ALL: [ViewId; 4] = [
        ViewId::Sleep,
        ViewId::HeartRate,
        ViewId::BloodOxygenation,
        ViewId::Stress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::HeartRate => "heart_rate",
            Self::BloodOxygenation => "blood_oxygenation",
            Self::Stress => "stress",
        }
    }

    pub fn view(&self) -> &'static View {
        // VIEWS is laid out in the same order as the enum
        &VIEWS[*self as usize]
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = UnknownViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownViewError(s.to_string()))
    }
}

/// How consecutive samples are joined when drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineShape {
    #[serde(rename = "linear")]
    Linear,
    /// Horizontal then vertical, for categorical levels that hold until the
    /// next sample.
    #[serde(rename = "hv")]
    Step,
}

/// Replaces raw ordinal ticks on a y-axis with category labels.
#[derive(Debug, PartialEq)]
pub struct AxisOverride {
    pub ticks: &'static [(i64, &'static str)],
}

impl AxisOverride {
    pub fn tickvals(&self) -> Vec<f64> {
        self.ticks.iter().map(|(v, _)| *v as f64).collect()
    }

    pub fn ticktext(&self) -> Vec<String> {
        self.ticks.iter().map(|(_, t)| t.to_string()).collect()
    }
}

#[derive(Debug, PartialEq)]
pub struct View {
    pub id: ViewId,
    pub display_name: &'static str,
    /// Name of the value column within a stored series.
    pub column: &'static str,
    pub line_shape: LineShape,
    pub axis_overrides: Option<&'static AxisOverride>,
}

static SLEEP_STAGES: AxisOverride = AxisOverride {
    ticks: &[(0, "REM"), (1, "deep sleep"), (2, "light sleep"), (3, "awake")],
};

static VIEWS: [View; 4] = [
    View {
        id: ViewId::Sleep,
        display_name: "Sleep",
        column: "level",
        line_shape: LineShape::Step,
        axis_overrides: Some(&SLEEP_STAGES),
    },
    View {
        id: ViewId::HeartRate,
        display_name: "BPM",
        column: "bpm",
        line_shape: LineShape::Linear,
        axis_overrides: None,
    },
    View {
        id: ViewId::BloodOxygenation,
        display_name: "SpO2",
        column: "spo2",
        line_shape: LineShape::Linear,
        axis_overrides: None,
    },
    View {
        id: ViewId::Stress,
        display_name: "Stress",
        column: "stress",
        line_shape: LineShape::Linear,
        axis_overrides: None,
    },
];

/// Looks up a view by its string key.
pub fn get(view_id: &str) -> Result<&'static View, UnknownViewError> {
    view_id.parse::<ViewId>().map(|id| id.view())
}

/// All view ids in registry order.
pub fn all_ids() -> &'static [ViewId] {
    &ViewId::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_matching_view() {
        for id in all_ids() {
            let view = get(id.as_str()).unwrap();
            assert_eq!(view.id, *id);
        }
    }

    #[test]
    fn unknown_view_is_rejected() {
        for bad in ["", "Sleep", "bpm", "heart-rate", "steps"] {
            assert_eq!(get(bad), Err(UnknownViewError(bad.to_string())));
        }
    }

    #[test]
    fn registry_order() {
        let ids: Vec<&str> = all_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["sleep", "heart_rate", "blood_oxygenation", "stress"]);
    }

    #[test]
    fn only_sleep_is_stepped_with_labels() {
        for id in all_ids() {
            let view = id.view();
            if *id == ViewId::Sleep {
                assert_eq!(view.line_shape, LineShape::Step);
                let labels = view.axis_overrides.unwrap();
                assert_eq!(labels.tickvals(), vec![0.0, 1.0, 2.0, 3.0]);
                assert_eq!(
                    labels.ticktext(),
                    vec!["REM", "deep sleep", "light sleep", "awake"]
                );
            } else {
                assert_eq!(view.line_shape, LineShape::Linear);
                assert!(view.axis_overrides.is_none());
            }
        }
    }

    #[test]
    fn columns() {
        assert_eq!(ViewId::Sleep.view().column, "level");
        assert_eq!(ViewId::HeartRate.view().column, "bpm");
        assert_eq!(ViewId::BloodOxygenation.view().column, "spo2");
        assert_eq!(ViewId::Stress.view().column, "stress");
    }

    #[test]
    fn id_serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&ViewId::BloodOxygenation).unwrap(),
            "\"blood_oxygenation\""
        );
        assert_eq!(serde_json::to_string(&LineShape::Step).unwrap(), "\"hv\"");
    }
}

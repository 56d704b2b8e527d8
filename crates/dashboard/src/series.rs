/// One user's samples for one view.
///
/// Timestamps are kept as the text the device export wrote; the renderer is
/// responsible for interpreting them. Sampling is irregular so no interval is
/// assumed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    timestamps: Vec<String>,
    values: Vec<f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push<T: Into<String>>(&mut self, timestamp: T, value: f64) {
        self.timestamps.push(timestamp.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns a copy without the samples that sit in the middle of a flat
    /// run. See [`plateau_mask`].
    pub fn compact(&self) -> Self {
        let mask = plateau_mask(&self.values);
        let mut compacted = Self::new();

        for ((timestamp, value), keep) in self.timestamps.iter().zip(&self.values).zip(mask) {
            if keep {
                compacted.push(timestamp.clone(), *value);
            }
        }

        compacted
    }
}

impl<T: Into<String>> FromIterator<(T, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (timestamp, value) in iter {
            series.push(timestamp, value);
        }
        series
    }
}

/// Marks which samples carry information under linear interpolation.
///
/// A sample is redundant when it equals both neighbours. The first and last
/// samples have a missing neighbour and are always kept.
pub fn plateau_mask(values: &[f64]) -> Vec<bool> {
    (0..values.len())
        .map(|i| {
            let value = values[i];
            let differs_prev = i == 0 || values[i - 1] != value;
            let differs_next = i + 1 == values.len() || values[i + 1] != value;
            differs_prev || differs_next
        })
        .collect()
}

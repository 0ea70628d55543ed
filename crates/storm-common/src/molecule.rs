//! Per-channel molecule lists.

use serde::{Deserialize, Serialize};

use crate::{StormError, StormResult};

/// Localized molecules from one imaging channel.
///
/// All sequences are parallel: molecule `i` is the `i`-th element of each.
/// `xc`/`yc`/`zc` hold drift-corrected coordinates when available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoleculeList {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<f64>>,
    /// Fitted amplitude, used to derive the localization precision proxy.
    pub a: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xc: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yc: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zc: Option<Vec<f64>>,
}

/// Borrowed coordinate view selected from a [`MoleculeList`].
#[derive(Debug, Clone, Copy)]
pub struct Positions<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: Option<&'a [f64]>,
}

impl MoleculeList {
    /// Molecule list with raw positions only.
    pub fn new(x: Vec<f64>, y: Vec<f64>, a: Vec<f64>) -> Self {
        Self {
            x,
            y,
            a,
            ..Default::default()
        }
    }

    pub fn with_z(mut self, z: Vec<f64>) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_drift_corrected(mut self, xc: Vec<f64>, yc: Vec<f64>, zc: Option<Vec<f64>>) -> Self {
        self.xc = Some(xc);
        self.yc = Some(yc);
        self.zc = zc;
        self
    }

    /// Number of molecules.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Whether drift-corrected x/y are both present.
    pub fn has_drift_correction(&self) -> bool {
        self.xc.is_some() && self.yc.is_some()
    }

    /// Check that every present sequence matches the length of `x`.
    pub fn validate(&self, channel: usize) -> StormResult<()> {
        let expected = self.len();
        let fields: [(&'static str, Option<usize>); 6] = [
            ("y", Some(self.y.len())),
            ("a", Some(self.a.len())),
            ("z", self.z.as_ref().map(Vec::len)),
            ("xc", self.xc.as_ref().map(Vec::len)),
            ("yc", self.yc.as_ref().map(Vec::len)),
            ("zc", self.zc.as_ref().map(Vec::len)),
        ];

        for (field, actual) in fields {
            if let Some(actual) = actual {
                if actual != expected {
                    return Err(StormError::LengthMismatch {
                        channel,
                        field,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Select drift-corrected or raw coordinates.
    ///
    /// Falls back to raw fields (with a warning) when correction is requested
    /// but the corrected fields are absent. The corrected z falls back to raw z
    /// independently of x/y.
    pub fn positions(&self, correct_drift: bool) -> Positions<'_> {
        if correct_drift {
            if let (Some(xc), Some(yc)) = (&self.xc, &self.yc) {
                return Positions {
                    x: xc,
                    y: yc,
                    z: self.zc.as_deref().or(self.z.as_deref()),
                };
            }
            tracing::warn!(
                molecules = self.len(),
                "Drift-corrected coordinates requested but absent, using raw positions"
            );
        }

        Positions {
            x: &self.x,
            y: &self.y,
            z: self.z.as_deref(),
        }
    }
}

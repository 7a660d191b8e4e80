//! User-mutable controls.
//!
//! A control holds one integer inside a stepped domain and a stamp that
//! increments on every accepted write. Writing never evaluates anything;
//! propagation is the runtime's job.

use crate::error::{ConstructionError, Error, Result};
use serde::{Deserialize, Serialize};

/// Version counter of a control
pub type Stamp = u64;

/// Closed integer range `[min, max]` with a fixed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Domain {
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        Self { min, max, step }
    }

    pub fn is_well_formed(&self) -> bool {
        self.step > 0 && self.min <= self.max
    }

    /// Check if `value` is on the grid `min, min + step, ..` and within `max`
    pub fn contains(&self, value: i64) -> bool {
        // i128 so that the offset of a full-width i64 range cannot overflow
        self.is_well_formed()
            && (self.min..=self.max).contains(&value)
            && (i128::from(value) - i128::from(self.min)) % i128::from(self.step) == 0
    }

    /// All accepted values, ascending
    pub fn values(&self) -> impl Iterator<Item = i64> + use<> {
        let step = self.step.max(1) as usize;
        (self.min..=self.max).step_by(step)
    }
}

/// Declaration of a control, consumed by the graph builder
#[derive(Debug, Clone)]
pub struct ControlSpec {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) domain: Domain,
    pub(crate) initial: i64,
}

impl ControlSpec {
    pub fn new(name: impl Into<String>, domain: Domain, initial: i64) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            domain,
            initial,
        }
    }

    /// Human-readable label, for whatever renders the widget
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// A control node's live state
#[derive(Debug, Clone)]
pub struct Control {
    name: String,
    label: String,
    domain: Domain,
    value: i64,
    stamp: Stamp,
}

impl Control {
    pub(crate) fn from_spec(spec: ControlSpec) -> std::result::Result<Self, ConstructionError> {
        let ControlSpec {
            name,
            label,
            domain,
            initial,
        } = spec;

        if !domain.is_well_formed() {
            return Err(ConstructionError::InvalidDomain {
                control: name,
                min: domain.min,
                max: domain.max,
                step: domain.step,
            });
        }
        if !domain.contains(initial) {
            return Err(ConstructionError::InitialOutOfRange {
                control: name,
                value: initial,
                min: domain.min,
                max: domain.max,
                step: domain.step,
            });
        }

        Ok(Self {
            name,
            label,
            domain,
            value: initial,
            stamp: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn read(&self) -> i64 {
        self.value
    }

    pub fn stamp(&self) -> Stamp {
        self.stamp
    }

    /// Replace the value and advance the stamp by exactly one.
    ///
    /// Out-of-domain values are rejected and leave value and stamp untouched.
    pub fn write(&mut self, value: i64) -> Result<Stamp> {
        if !self.domain.contains(value) {
            return Err(Error::invalid_parameter(
                self.name.clone(),
                value,
                format!(
                    "outside [{}, {}] step {}",
                    self.domain.min, self.domain.max, self.domain.step
                ),
            ));
        }
        self.value = value;
        self.stamp += 1;
        Ok(self.stamp)
    }
}

//! Synthetic linear dataset.
//!
//! `y = slope * x + noise` over evenly spaced `x`, with Gaussian noise drawn
//! from a seeded generator so the same seed always produces the same bits.

use cellflow::Value;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Output name of the evenly spaced abscissa
pub const X: &str = "x";
/// Output name of the noisy ordinate
pub const Y: &str = "y";

/// Generated values by output name, in generation order
pub type NamedValues = IndexMap<String, Value>;

/// Shape of the generated data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticParams {
    pub samples: usize,
    pub x_start: f64,
    pub x_end: f64,
    pub slope: f64,
    pub noise_std: f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            samples: 100,
            x_start: 0.0,
            x_end: 10.0,
            slope: 3.0,
            noise_std: 3.0,
        }
    }
}

/// Generate with the default parameters
pub fn generate(seed: u64) -> NamedValues {
    generate_with(seed, &SyntheticParams::default())
}

pub fn generate_with(seed: u64, params: &SyntheticParams) -> NamedValues {
    let x = linspace(params.x_start, params.x_end, params.samples);
    let mut rng = StdRng::seed_from_u64(seed);
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| params.slope * xi + params.noise_std * standard_normal(&mut rng))
        .collect();

    let mut values = NamedValues::new();
    values.insert(X.to_string(), Value::series(x));
    values.insert(Y.to_string(), Value::series(y));
    values
}

/// `samples` evenly spaced points from `start` to `end`, both inclusive
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (samples - 1) as f64;
            (0..samples)
                .map(|i| {
                    if i == samples - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

// Box-Muller; u1 is drawn from (0, 1) so the log is finite
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1 = loop {
        let u: f64 = rng.random();
        if u > 0.0 {
            break u;
        }
    };
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

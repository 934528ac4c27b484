pub use crate::config::*;

use log::{debug, warn};

/// A builder for assembling a decision problem under a set of input rules.
///
/// The rules cover what a data entry form enforces before the computation
/// (weight scale and total, value clamping, dimension limits). The engine
/// itself does not apply any of them.
///
/// ```
/// use topsis::builder::Builder;
/// use topsis::{Criterion, CriterionDirection, InputRules};
/// # use topsis::TopsisError;
///
/// let mut builder = Builder::new(&InputRules::FORM_RULES)?.criteria(&[
///     Criterion { name: "Price".to_string(), weight: 40.0, direction: CriterionDirection::Cost },
///     Criterion { name: "Quality".to_string(), weight: 60.0, direction: CriterionDirection::Benefit },
/// ])?;
///
/// builder.add_alternative("Laptop A", &[8.0, 6.0])?;
/// builder.add_alternative("Laptop B", &[7.0, 9.0])?;
///
/// let result = builder.build()?.rank()?;
/// assert_eq!(result.weights, vec![0.4, 0.6]);
///
/// # Ok::<(), TopsisError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: InputRules,
    pub(crate) _criteria: Vec<Criterion>,
    pub(crate) _alternatives: Vec<(String, Vec<f64>)>,
}

/// A problem ready to be handed to the engine.
#[derive(PartialEq, Debug, Clone)]
pub struct DecisionProblem {
    pub matrix: Vec<Vec<f64>>,
    /// Weights in the fraction scale.
    pub weights: Vec<f64>,
    pub directions: Vec<CriterionDirection>,
    pub alternative_names: Vec<String>,
    pub criterion_names: Vec<String>,
}

impl DecisionProblem {
    pub fn rank(&self) -> Result<TopsisResult, TopsisError> {
        crate::compute_ranking(
            &self.matrix,
            &self.weights,
            &self.directions,
            Some(self.alternative_names.as_slice()),
            Some(self.criterion_names.as_slice()),
        )
    }
}

impl Builder {
    pub fn new(rules: &InputRules) -> Result<Builder, TopsisError> {
        Ok(Builder {
            _rules: rules.clone(),
            _criteria: Vec::new(),
            _alternatives: Vec::new(),
        })
    }

    /// Declares the criteria. Any alternative added before is discarded.
    pub fn criteria(self, criteria: &[Criterion]) -> Result<Builder, TopsisError> {
        if let Some((min, max)) = self._rules.criterion_limits {
            if criteria.len() < min || criteria.len() > max {
                return Err(TopsisError::CriterionCount {
                    min,
                    max,
                    found: criteria.len(),
                });
            }
        }
        Ok(Builder {
            _rules: self._rules,
            _criteria: criteria.to_vec(),
            _alternatives: Vec::new(),
        })
    }

    /// Adds an alternative with one score per criterion.
    ///
    /// Scores outside of the range of the rules are clamped.
    pub fn add_alternative(&mut self, name: &str, values: &[f64]) -> Result<(), TopsisError> {
        if values.len() != self._criteria.len() {
            return Err(TopsisError::RaggedMatrix {
                row: self._alternatives.len(),
                expected: self._criteria.len(),
                found: values.len(),
            });
        }
        let values: Vec<f64> = match self._rules.value_range {
            ValueRange::Unbounded => values.to_vec(),
            ValueRange::Clamp(min, max) => values
                .iter()
                .map(|x| {
                    let c = x.clamp(min, max);
                    if c != *x {
                        warn!(
                            "add_alternative: {}: value {} clamped to {}",
                            name, x, c
                        );
                    }
                    c
                })
                .collect(),
        };
        self._alternatives.push((name.to_string(), values));
        Ok(())
    }

    /// Applies the weight rules and produces the problem.
    pub fn build(&self) -> Result<DecisionProblem, TopsisError> {
        if let Some((min, max)) = self._rules.alternative_limits {
            let found = self._alternatives.len();
            if found < min || found > max {
                return Err(TopsisError::AlternativeCount { min, max, found });
            }
        }

        let raw_weights: Vec<f64> = self._criteria.iter().map(|c| c.weight).collect();
        if let WeightSumPolicy::RequireTotal { total, tolerance } = self._rules.weight_sum {
            let found: f64 = raw_weights.iter().sum();
            if (found - total).abs() > tolerance {
                return Err(TopsisError::WeightTotal {
                    expected: total,
                    found,
                });
            }
        }
        let weights: Vec<f64> = match self._rules.weight_scale {
            WeightScale::Fraction => raw_weights,
            WeightScale::Percent => raw_weights.iter().map(|w| w / 100.0).collect(),
        };
        debug!("build: weights: {:?}", weights);

        Ok(DecisionProblem {
            matrix: self._alternatives.iter().map(|(_, v)| v.clone()).collect(),
            weights,
            directions: self._criteria.iter().map(|c| c.direction).collect(),
            alternative_names: self._alternatives.iter().map(|(n, _)| n.clone()).collect(),
            criterion_names: self._criteria.iter().map(|c| c.name.clone()).collect(),
        })
    }
}

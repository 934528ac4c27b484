// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The preferred direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CriterionDirection {
    /// A higher raw value is more desirable (quality, battery life, ...).
    Benefit,
    /// A lower raw value is more desirable (price, weight, ...).
    Cost,
}

impl CriterionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionDirection::Benefit => "benefit",
            CriterionDirection::Cost => "cost",
        }
    }
}

impl FromStr for CriterionDirection {
    type Err = TopsisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "benefit" => Ok(CriterionDirection::Benefit),
            "cost" => Ok(CriterionDirection::Cost),
            _ => Err(TopsisError::InvalidDirection {
                tag: s.to_string(),
            }),
        }
    }
}

impl Display for CriterionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A criterion as declared by the input provider.
///
/// The weight is expressed in the scale of the [InputRules] in use
/// (a fraction or a percentage).
#[derive(PartialEq, Debug, Clone)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub direction: CriterionDirection,
}

// ******** Output data structures *********

/// The outcome of the computation for one alternative.
#[derive(PartialEq, Debug, Clone)]
pub struct RankingEntry {
    pub alternative: String,
    /// Relative closeness to the ideal point, in [0, 1].
    pub closeness: f64,
    pub distance_to_positive: f64,
    pub distance_to_negative: f64,
    /// Position of the alternative in the input matrix.
    pub index: usize,
    /// 1 is the best alternative.
    pub rank: usize,
    /// Set when the alternative coincides with both the ideal and the anti-ideal
    /// points. The closeness is then reported as 0.
    pub degenerate: bool,
}

/// All the stages of one computation.
///
/// Every intermediate structure is kept so that a report can explain each
/// step. Vectors indexed by alternative follow the input order; only
/// `ranking` is sorted.
#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    pub decision_matrix: Vec<Vec<f64>>,
    pub weights: Vec<f64>,
    pub directions: Vec<CriterionDirection>,
    pub normalized_matrix: Vec<Vec<f64>>,
    pub weighted_matrix: Vec<Vec<f64>>,
    pub ideal_positive: Vec<f64>,
    pub ideal_negative: Vec<f64>,
    pub separation_from_ideal: Vec<f64>,
    pub separation_from_negative_ideal: Vec<f64>,
    pub closeness: Vec<f64>,
    pub ranking: Vec<RankingEntry>,
    pub alternative_names: Vec<String>,
    pub criterion_names: Vec<String>,
    /// Criteria whose column is entirely zero. Their normalized entries are 0.
    pub zero_columns: Vec<usize>,
}

impl TopsisResult {
    /// The best ranked alternative.
    pub fn winner(&self) -> Option<&RankingEntry> {
        self.ranking.first()
    }

    /// The ranking entry of the alternative at the given input position.
    pub fn entry_for(&self, index: usize) -> Option<&RankingEntry> {
        self.ranking.iter().find(|e| e.index == index)
    }
}

// ******** Errors *********

/// Broad classification of the errors.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ErrorKind {
    /// The dimensions of the inputs do not agree.
    Shape,
    /// A value is outside of its domain.
    Value,
    /// An input rule of the caller was violated (weight total, dimension limits).
    Policy,
}

/// Errors that prevent the ranking from being computed.
///
/// They are all raised before any numeric work takes place.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisError {
    EmptyMatrix,
    NoCriteria,
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    WeightsLength {
        expected: usize,
        found: usize,
    },
    DirectionsLength {
        expected: usize,
        found: usize,
    },
    AlternativeNamesLength {
        expected: usize,
        found: usize,
    },
    CriterionNamesLength {
        expected: usize,
        found: usize,
    },
    InvalidDirection {
        tag: String,
    },
    NegativeWeight {
        criterion: usize,
        weight: f64,
    },
    NonFiniteWeight {
        criterion: usize,
    },
    NonFiniteValue {
        row: usize,
        column: usize,
    },
    WeightTotal {
        expected: f64,
        found: f64,
    },
    AlternativeCount {
        min: usize,
        max: usize,
        found: usize,
    },
    CriterionCount {
        min: usize,
        max: usize,
        found: usize,
    },
}

impl TopsisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopsisError::EmptyMatrix
            | TopsisError::NoCriteria
            | TopsisError::RaggedMatrix { .. }
            | TopsisError::WeightsLength { .. }
            | TopsisError::DirectionsLength { .. }
            | TopsisError::AlternativeNamesLength { .. }
            | TopsisError::CriterionNamesLength { .. } => ErrorKind::Shape,
            TopsisError::InvalidDirection { .. }
            | TopsisError::NegativeWeight { .. }
            | TopsisError::NonFiniteWeight { .. }
            | TopsisError::NonFiniteValue { .. } => ErrorKind::Value,
            TopsisError::WeightTotal { .. }
            | TopsisError::AlternativeCount { .. }
            | TopsisError::CriterionCount { .. } => ErrorKind::Policy,
        }
    }
}

impl Error for TopsisError {}

impl Display for TopsisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisError::EmptyMatrix => write!(f, "the decision matrix has no alternatives"),
            TopsisError::NoCriteria => write!(f, "the decision matrix has no criteria"),
            TopsisError::RaggedMatrix {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} of the decision matrix has {} values, expected {}",
                row, found, expected
            ),
            TopsisError::WeightsLength { expected, found } => {
                write!(f, "expected {} weights, found {}", expected, found)
            }
            TopsisError::DirectionsLength { expected, found } => {
                write!(f, "expected {} criterion directions, found {}", expected, found)
            }
            TopsisError::AlternativeNamesLength { expected, found } => {
                write!(f, "expected {} alternative names, found {}", expected, found)
            }
            TopsisError::CriterionNamesLength { expected, found } => {
                write!(f, "expected {} criterion names, found {}", expected, found)
            }
            TopsisError::InvalidDirection { tag } => write!(
                f,
                "unknown criterion direction {:?}: expected 'benefit' or 'cost'",
                tag
            ),
            TopsisError::NegativeWeight { criterion, weight } => {
                write!(f, "weight of criterion {} is negative: {}", criterion, weight)
            }
            TopsisError::NonFiniteWeight { criterion } => {
                write!(f, "weight of criterion {} is not a finite number", criterion)
            }
            TopsisError::NonFiniteValue { row, column } => write!(
                f,
                "value at row {}, column {} is not a finite number",
                row, column
            ),
            TopsisError::WeightTotal { expected, found } => {
                write!(f, "weights must sum to {}, found {}", expected, found)
            }
            TopsisError::AlternativeCount { min, max, found } => write!(
                f,
                "between {} and {} alternatives are allowed, found {}",
                min, max, found
            ),
            TopsisError::CriterionCount { min, max, found } => write!(
                f,
                "between {} and {} criteria are allowed, found {}",
                min, max, found
            ),
        }
    }
}

// ********* Input rules **********

// The rules only apply to the builder. The engine itself accepts any
// non-negative weight vector, normalized or not.

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum WeightScale {
    /// Weights are used as given.
    Fraction,
    /// Weights are percentages and get divided by 100.
    Percent,
}

/// How far the raw weights may be from the required total.
pub const WEIGHT_TOTAL_TOLERANCE: f64 = 1e-9;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum WeightSumPolicy {
    Unchecked,
    /// The raw weights (before scaling) must add up to `total`, up to `tolerance`.
    RequireTotal { total: f64, tolerance: f64 },
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ValueRange {
    Unbounded,
    Clamp(f64, f64),
}

/// How the input provider constrains a problem before it reaches the engine.
#[derive(PartialEq, Debug, Clone)]
pub struct InputRules {
    pub weight_scale: WeightScale,
    pub weight_sum: WeightSumPolicy,
    pub value_range: ValueRange,
    /// Inclusive bounds on the number of alternatives.
    pub alternative_limits: Option<(usize, usize)>,
    /// Inclusive bounds on the number of criteria.
    pub criterion_limits: Option<(usize, usize)>,
}

impl InputRules {
    /// No constraint: weights are fractions and are passed through untouched.
    pub const DEFAULT_RULES: InputRules = InputRules {
        weight_scale: WeightScale::Fraction,
        weight_sum: WeightSumPolicy::Unchecked,
        value_range: ValueRange::Unbounded,
        alternative_limits: None,
        criterion_limits: None,
    };

    /// The rules of the calculator form: percentages summing to exactly 100,
    /// scores clamped to [0, 100], and 2 to 10 alternatives and criteria.
    pub const FORM_RULES: InputRules = InputRules {
        weight_scale: WeightScale::Percent,
        weight_sum: WeightSumPolicy::RequireTotal {
            total: 100.0,
            tolerance: WEIGHT_TOTAL_TOLERANCE,
        },
        value_range: ValueRange::Clamp(0.0, 100.0),
        alternative_limits: Some((2, 10)),
        criterion_limits: Some((2, 10)),
    };
}

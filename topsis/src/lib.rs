/*!
Ranking of alternatives with the TOPSIS method (Technique for Order of
Preference by Similarity to Ideal Solution).

The computation is a pure function of the decision matrix, the criterion
weights and the criterion directions:

```
use topsis::{compute_ranking, CriterionDirection::*};

let matrix = vec![vec![8.0, 6.0, 7.0], vec![7.0, 9.0, 8.0], vec![9.0, 7.0, 6.0]];
let names: Vec<String> = vec!["Laptop A".into(), "Laptop B".into(), "Laptop C".into()];
let result = compute_ranking(
    &matrix,
    &[0.3, 0.5, 0.2],
    &[Cost, Benefit, Benefit],
    Some(&names[..]),
    None,
)?;
assert_eq!(result.winner().map(|e| e.alternative.as_str()), Some("Laptop B"));
# Ok::<(), topsis::TopsisError>(())
```

See the [manual] for the command line interface.
*/

pub mod builder;
mod config;
pub mod manual;

use log::{debug, info};
use std::cmp::Ordering;

pub use crate::config::*;

// **** Private structures ****

// Shape of a validated problem.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Dimensions {
    alternatives: usize,
    criteria: usize,
}

/// Computes the TOPSIS ranking of the alternatives.
///
/// Arguments:
/// * `matrix` one row per alternative, one column per criterion
/// * `weights` one non-negative weight per criterion. They are not renormalized:
/// enforcing a total is the job of the caller (see [builder::Builder]).
/// * `directions` whether each criterion is a benefit or a cost
/// * `alternative_names`, `criterion_names` labels copied into the result. If not
/// provided, positional names are generated.
///
/// All the checks happen before the computation starts. The result keeps every
/// intermediate stage.
pub fn compute_ranking(
    matrix: &[Vec<f64>],
    weights: &[f64],
    directions: &[CriterionDirection],
    alternative_names: Option<&[String]>,
    criterion_names: Option<&[String]>,
) -> Result<TopsisResult, TopsisError> {
    let dims = checks(matrix, weights, directions, alternative_names, criterion_names)?;
    info!(
        "Ranking {} alternatives over {} criteria, weights: {:?}, directions: {:?}",
        dims.alternatives, dims.criteria, weights, directions
    );

    let alternative_names: Vec<String> = match alternative_names {
        Some(names) => names.to_vec(),
        None => (1..=dims.alternatives)
            .map(|i| format!("Alternative {}", i))
            .collect(),
    };
    let criterion_names: Vec<String> = match criterion_names {
        Some(names) => names.to_vec(),
        None => (1..=dims.criteria)
            .map(|j| format!("Criterion {}", j))
            .collect(),
    };

    let (normalized_matrix, zero_columns) = normalize(matrix, dims);
    debug!("compute_ranking: normalized: {:?}", normalized_matrix);
    if !zero_columns.is_empty() {
        info!(
            "Criteria with an all-zero column (normalized to 0): {:?}",
            zero_columns
        );
    }

    let weighted_matrix = apply_weights(&normalized_matrix, weights);
    debug!("compute_ranking: weighted: {:?}", weighted_matrix);

    let (ideal_positive, ideal_negative) = ideal_points(&weighted_matrix, directions, dims);
    debug!(
        "compute_ranking: ideal: {:?} anti-ideal: {:?}",
        ideal_positive, ideal_negative
    );

    let separation_from_ideal = separations(&weighted_matrix, &ideal_positive);
    let separation_from_negative_ideal = separations(&weighted_matrix, &ideal_negative);
    debug!(
        "compute_ranking: separations: {:?} {:?}",
        separation_from_ideal, separation_from_negative_ideal
    );

    let closeness: Vec<f64> = separation_from_ideal
        .iter()
        .zip(separation_from_negative_ideal.iter())
        .map(|(pos, neg)| relative_closeness(*pos, *neg))
        .collect();

    let ranking = rank(
        &closeness,
        &separation_from_ideal,
        &separation_from_negative_ideal,
        &alternative_names,
    );
    for e in ranking.iter() {
        info!(
            "Rank {}: {} closeness: {}{}",
            e.rank,
            e.alternative,
            e.closeness,
            if e.degenerate { " (degenerate)" } else { "" }
        );
    }

    Ok(TopsisResult {
        decision_matrix: matrix.to_vec(),
        weights: weights.to_vec(),
        directions: directions.to_vec(),
        normalized_matrix,
        weighted_matrix,
        ideal_positive,
        ideal_negative,
        separation_from_ideal,
        separation_from_negative_ideal,
        closeness,
        ranking,
        alternative_names,
        criterion_names,
        zero_columns,
    })
}

// Structural checks first, then values. Nothing is computed on invalid input.
fn checks(
    matrix: &[Vec<f64>],
    weights: &[f64],
    directions: &[CriterionDirection],
    alternative_names: Option<&[String]>,
    criterion_names: Option<&[String]>,
) -> Result<Dimensions, TopsisError> {
    let first = matrix.first().ok_or(TopsisError::EmptyMatrix)?;
    let n = first.len();
    if n == 0 {
        return Err(TopsisError::NoCriteria);
    }
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != n {
            return Err(TopsisError::RaggedMatrix {
                row,
                expected: n,
                found: values.len(),
            });
        }
    }
    if weights.len() != n {
        return Err(TopsisError::WeightsLength {
            expected: n,
            found: weights.len(),
        });
    }
    if directions.len() != n {
        return Err(TopsisError::DirectionsLength {
            expected: n,
            found: directions.len(),
        });
    }
    if let Some(names) = alternative_names {
        if names.len() != matrix.len() {
            return Err(TopsisError::AlternativeNamesLength {
                expected: matrix.len(),
                found: names.len(),
            });
        }
    }
    if let Some(names) = criterion_names {
        if names.len() != n {
            return Err(TopsisError::CriterionNamesLength {
                expected: n,
                found: names.len(),
            });
        }
    }

    for (criterion, w) in weights.iter().enumerate() {
        if !w.is_finite() {
            return Err(TopsisError::NonFiniteWeight { criterion });
        }
        if *w < 0.0 {
            return Err(TopsisError::NegativeWeight {
                criterion,
                weight: *w,
            });
        }
    }
    for (row, values) in matrix.iter().enumerate() {
        if let Some(column) = values.iter().position(|x| !x.is_finite()) {
            return Err(TopsisError::NonFiniteValue { row, column });
        }
    }

    Ok(Dimensions {
        alternatives: matrix.len(),
        criteria: n,
    })
}

/// Vector normalization of each column.
///
/// A column with a zero norm is normalized to zeros and its index is returned.
fn normalize(matrix: &[Vec<f64>], dims: Dimensions) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut normalized = vec![vec![0.0; dims.criteria]; dims.alternatives];
    let mut zero_columns: Vec<usize> = Vec::new();
    for j in 0..dims.criteria {
        // hypot keeps the norm finite for large finite values.
        let denominator = matrix.iter().fold(0.0_f64, |acc, row| acc.hypot(row[j]));
        if denominator == 0.0 {
            zero_columns.push(j);
            continue;
        }
        for (i, row) in matrix.iter().enumerate() {
            normalized[i][j] = row[j] / denominator;
        }
    }
    (normalized, zero_columns)
}

fn apply_weights(normalized: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
    normalized
        .iter()
        .map(|row| row.iter().zip(weights.iter()).map(|(x, w)| x * w).collect())
        .collect()
}

/// The ideal and anti-ideal points of the weighted matrix.
fn ideal_points(
    weighted: &[Vec<f64>],
    directions: &[CriterionDirection],
    dims: Dimensions,
) -> (Vec<f64>, Vec<f64>) {
    let mut ideal: Vec<f64> = Vec::with_capacity(dims.criteria);
    let mut anti_ideal: Vec<f64> = Vec::with_capacity(dims.criteria);
    for (j, direction) in directions.iter().enumerate() {
        let max = weighted
            .iter()
            .map(|row| row[j])
            .fold(f64::NEG_INFINITY, f64::max);
        let min = weighted
            .iter()
            .map(|row| row[j])
            .fold(f64::INFINITY, f64::min);
        match direction {
            CriterionDirection::Benefit => {
                ideal.push(max);
                anti_ideal.push(min);
            }
            CriterionDirection::Cost => {
                ideal.push(min);
                anti_ideal.push(max);
            }
        }
    }
    (ideal, anti_ideal)
}

/// Euclidean distance of every row to the given point.
fn separations(weighted: &[Vec<f64>], point: &[f64]) -> Vec<f64> {
    weighted
        .iter()
        .map(|row| {
            row.iter()
                .zip(point.iter())
                .fold(0.0_f64, |acc, (x, p)| acc.hypot(x - p))
        })
        .collect()
}

// An alternative that sits on both points (single alternative, identical rows)
// gets a closeness of 0.
fn relative_closeness(to_positive: f64, to_negative: f64) -> f64 {
    let total = to_positive + to_negative;
    if total == 0.0 {
        0.0
    } else {
        to_negative / total
    }
}

/// Sorts by decreasing closeness. Ties keep the input order.
fn rank(
    closeness: &[f64],
    to_positive: &[f64],
    to_negative: &[f64],
    names: &[String],
) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = closeness
        .iter()
        .enumerate()
        .map(|(index, c)| RankingEntry {
            alternative: names[index].clone(),
            closeness: *c,
            distance_to_positive: to_positive[index],
            distance_to_negative: to_negative[index],
            index,
            rank: 0,
            degenerate: to_positive[index] + to_negative[index] == 0.0,
        })
        .collect();
    // sort_by is stable.
    entries.sort_by(|a, b| {
        b.closeness
            .partial_cmp(&a.closeness)
            .unwrap_or(Ordering::Equal)
    });
    for (pos, e) in entries.iter_mut().enumerate() {
        e.rank = pos + 1;
    }
    entries
}

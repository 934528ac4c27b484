use crate::analysis::*;
use crate::analysis::io_common::simplify_file_name;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "problemName")]
    pub problem_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "decimalPlaces")]
    pub decimal_places: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "firstValueColumnIndex")]
    pub(crate) _first_value_column_index: Option<JSValue>,
    #[serde(rename = "firstValueRowIndex")]
    pub(crate) _first_value_row_index: Option<JSValue>,
    #[serde(rename = "nameColumnIndex")]
    pub(crate) _name_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    // Only for the inline provider
    pub alternatives: Option<Vec<String>>,
    pub matrix: Option<Vec<Vec<f64>>>,
}

impl DataSource {
    /// A file source with the default layout.
    pub fn from_file(provider: &str, file_path: &str) -> DataSource {
        DataSource {
            provider: provider.to_string(),
            file_path: Some(file_path.to_string()),
            _first_value_column_index: None,
            _first_value_row_index: None,
            _name_column_index: None,
            excel_worksheet_name: None,
            alternatives: None,
            matrix: None,
        }
    }

    // All the indexes are 1-based in the configuration and 0-based here.

    pub fn first_value_column_index(&self) -> AnalysisResult<usize> {
        let x = read_js_int(&self._first_value_column_index, 2)?;
        Ok(x - 1)
    }

    pub fn first_value_row_index(&self) -> AnalysisResult<usize> {
        let x = read_js_int(&self._first_value_row_index, 2)?;
        Ok(x - 1)
    }

    pub fn name_column_index(&self) -> AnalysisResult<usize> {
        let x = read_js_int(&self._name_column_index, 1)?;
        Ok(x - 1)
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CriterionConfig {
    pub name: String,
    pub weight: f64,
    #[serde(rename = "type")]
    pub criterion_type: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RankRules {
    #[serde(rename = "weightScale")]
    pub weight_scale: Option<String>,
    #[serde(rename = "requireWeightTotal")]
    pub require_weight_total: Option<f64>,
    #[serde(rename = "clampValues")]
    pub clamp_values: Option<(f64, f64)>,
    #[serde(rename = "maxAlternatives")]
    pub max_alternatives: Option<usize>,
    #[serde(rename = "maxCriteria")]
    pub max_criteria: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopsisConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource")]
    pub data_source: DataSource,
    #[serde(default)]
    pub criteria: Vec<CriterionConfig>,
    pub rules: Option<RankRules>,
}

impl TopsisConfig {
    /// The configuration used when only an input file is given.
    pub fn from_input(path: &str, provider: &str) -> TopsisConfig {
        TopsisConfig {
            output_settings: OutputSettings {
                problem_name: simplify_file_name(path),
                output_directory: None,
                decimal_places: None,
            },
            data_source: DataSource::from_file(provider, path),
            criteria: Vec::new(),
            rules: None,
        }
    }
}

pub fn read_config(path: &str) -> AnalysisResult<TopsisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TopsisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

pub fn read_summary(path: &str) -> AnalysisResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

/// The rules of the input provider. No section means no constraint.
pub fn validate_rules(rules: &Option<RankRules>) -> AnalysisResult<InputRules> {
    let rules = match rules {
        None => return Ok(InputRules::DEFAULT_RULES),
        Some(r) => r,
    };
    let res = InputRules {
        weight_scale: match rules.weight_scale.as_deref() {
            None | Some("fraction") => WeightScale::Fraction,
            Some("percent") => WeightScale::Percent,
            Some(x) => {
                whatever!("unknown weight scale: {:?}", x)
            }
        },
        weight_sum: match rules.require_weight_total {
            None => WeightSumPolicy::Unchecked,
            Some(total) => WeightSumPolicy::RequireTotal {
                total,
                tolerance: WEIGHT_TOTAL_TOLERANCE,
            },
        },
        value_range: match rules.clamp_values {
            None => ValueRange::Unbounded,
            Some((min, max)) if min <= max => ValueRange::Clamp(min, max),
            Some((min, max)) => {
                whatever!("clampValues: the lower bound {} is above {}", min, max)
            }
        },
        alternative_limits: rules.max_alternatives.map(|x| (1, x)),
        criterion_limits: rules.max_criteria.map(|x| (1, x)),
    };
    Ok(res)
}

/// Reads a 1-based index written either as a number, a string holding a number
/// or spreadsheet column letters.
fn read_js_int(x: &Option<JSValue>, default: usize) -> AnalysisResult<usize> {
    let res = match x {
        None | Some(JSValue::Null) => Some(default),
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add((c as usize) - ('a' as usize) + 1)
            })
        }
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    let idx = res.context(ParsingJsonNumberSnafu {
        content: format!("{:?}", x),
    })?;
    ensure!(
        idx > 0,
        ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }
    );
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn js_indexes() {
        assert_eq!(read_js_int(&None, 2).unwrap(), 2);
        assert_eq!(read_js_int(&Some(json!(3)), 2).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("4")), 2).unwrap(), 4);
        assert_eq!(read_js_int(&Some(json!("A")), 2).unwrap(), 1);
        assert_eq!(read_js_int(&Some(json!("c")), 2).unwrap(), 3);
        assert_eq!(read_js_int(&Some(json!("AA")), 2).unwrap(), 27);
        assert!(read_js_int(&Some(json!(0)), 2).is_err());
        assert!(read_js_int(&Some(json!("x1")), 2).is_err());
    }

    #[test]
    fn js_indexes_too_many_letters() {
        let err = read_js_int(&Some(json!("ZZZZZZZZZZZZZZZ")), 2).unwrap_err();
        assert!(matches!(err, AnalysisError::ParsingJsonNumber { .. }));
        assert_eq!(read_js_int(&Some(json!("ZZ")), 2).unwrap(), 702);
    }

    #[test]
    fn rule_tolerance_matches_the_form() {
        let rules = RankRules {
            weight_scale: Some("percent".to_string()),
            require_weight_total: Some(100.0),
            clamp_values: Some((0.0, 100.0)),
            max_alternatives: Some(10),
            max_criteria: Some(10),
        };
        let parsed = validate_rules(&Some(rules)).unwrap();
        assert_eq!(parsed.weight_sum, InputRules::FORM_RULES.weight_sum);
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"problemName": "laptops"},
            "dataSource": {"provider": "csv", "filePath": "laptops.csv", "firstValueColumnIndex": "B"},
            "criteria": [
                {"name": "Harga", "weight": 30, "type": "cost"},
                {"name": "Kualitas", "weight": 70, "type": "benefit"}
            ],
            "rules": {"weightScale": "percent", "requireWeightTotal": 100, "clampValues": [0, 100]}
        }"#;
        let config: TopsisConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.problem_name, "laptops");
        assert_eq!(config.data_source.first_value_column_index().unwrap(), 1);
        assert_eq!(config.data_source.name_column_index().unwrap(), 0);
        assert_eq!(config.data_source.first_value_row_index().unwrap(), 1);
        assert_eq!(config.criteria[0].weight, 30.0);

        let rules = validate_rules(&config.rules).unwrap();
        assert_eq!(rules.weight_scale, WeightScale::Percent);
        assert_eq!(rules.value_range, ValueRange::Clamp(0.0, 100.0));
        assert_eq!(rules.alternative_limits, None);
    }

    #[test]
    fn missing_rules_are_the_default() {
        assert_eq!(validate_rules(&None).unwrap(), InputRules::DEFAULT_RULES);
    }

    #[test]
    fn invalid_rules() {
        let rules = RankRules {
            weight_scale: Some("permille".to_string()),
            require_weight_total: None,
            clamp_values: None,
            max_alternatives: None,
            max_criteria: None,
        };
        assert!(validate_rules(&Some(rules.clone())).is_err());
        let rules = RankRules {
            weight_scale: None,
            clamp_values: Some((10.0, 0.0)),
            ..rules
        };
        assert!(validate_rules(&Some(rules)).is_err());
    }
}

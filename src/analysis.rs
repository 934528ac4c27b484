mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

use log::{debug, info, warn};

use snafu::{prelude::*, ErrorCompat, Snafu};
use topsis::builder::{Builder, DecisionProblem};
use topsis::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::analysis::config_reader::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AnalysisError {
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Line {lineno}: unsupported cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The input does not contain any alternative"))]
    EmptyInput {},
    #[snafu(display("Line {lineno}: expected {expected} values, found {found}"))]
    RaggedLine {
        lineno: usize,
        expected: usize,
        found: usize,
    },
    #[snafu(display("Line {lineno}, column {column}: {content:?} is not a number"))]
    ParsingValue {
        lineno: usize,
        column: usize,
        content: String,
    },
    #[snafu(display("Invalid layout: {message}"))]
    Layout { message: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot read an index from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("The ranking could not be computed: {source}"))]
    Ranking { source: TopsisError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// One row of the input, before any rule is applied.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedAlternative {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ParsedTable {
    /// The names found in the header, if the input has one.
    pub criterion_names: Option<Vec<String>>,
    pub alternatives: Vec<ParsedAlternative>,
}

/// Everything that can be set from the command line.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RunSettings {
    pub config: Option<String>,
    pub input: Option<String>,
    pub input_type: Option<String>,
    pub weights: Option<Vec<f64>>,
    pub directions: Option<Vec<String>>,
    pub excel_worksheet_name: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

const DEFAULT_DECIMAL_PLACES: usize = 4;

fn read_problem_data(root_path: &Path, ds: &DataSource) -> AnalysisResult<ParsedTable> {
    if ds.provider == "inline" {
        let matrix = match ds.matrix.clone() {
            Some(m) => m,
            None => whatever!("the inline provider requires a matrix"),
        };
        let names: Vec<String> = match ds.alternatives.clone() {
            Some(names) => names,
            None => (0..matrix.len()).map(io_common::make_default_name).collect(),
        };
        ensure_whatever!(
            names.len() == matrix.len(),
            "{} alternative names for {} rows",
            names.len(),
            matrix.len()
        );
        let alternatives = names
            .into_iter()
            .zip(matrix.into_iter())
            .map(|(name, values)| ParsedAlternative { name, values })
            .collect();
        return Ok(ParsedTable {
            criterion_names: None,
            alternatives,
        });
    }

    let file_path = match ds.file_path.clone() {
        Some(p) => p,
        None => whatever!("the {} provider requires a filePath", ds.provider),
    };
    let p: PathBuf = [root_path, Path::new(&file_path)].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read data file {:?}", p2);
    let table = match ds.provider.as_str() {
        "csv" => io_csv::read_csv_matrix(&p2, ds)?,
        "xlsx" => io_xlsx::read_xlsx_matrix(&p2, ds)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    info!(
        "Read {} alternatives, criteria: {:?}",
        table.alternatives.len(),
        table.criterion_names
    );
    Ok(table)
}

/// The criteria of the configuration, or the ones inferred from the input
/// header when the configuration does not declare any. Command line weights
/// and directions take precedence.
fn resolve_criteria(
    config: &TopsisConfig,
    table: &ParsedTable,
    settings: &RunSettings,
) -> AnalysisResult<Vec<CriterionConfig>> {
    let mut criteria: Vec<CriterionConfig> = if config.criteria.is_empty() {
        let names: Vec<String> = match &table.criterion_names {
            Some(names) => names.clone(),
            None => {
                let n = table.alternatives.first().map(|a| a.values.len()).unwrap_or(0);
                (1..=n).map(|j| format!("Criterion {}", j)).collect()
            }
        };
        let weights = match &settings.weights {
            Some(w) => w.clone(),
            None => whatever!("no criteria in the configuration: --weights is required"),
        };
        ensure_whatever!(
            weights.len() == names.len(),
            "{} weights provided for {} criteria",
            weights.len(),
            names.len()
        );
        names
            .into_iter()
            .zip(weights.into_iter())
            .map(|(name, weight)| CriterionConfig {
                name,
                weight,
                criterion_type: "benefit".to_string(),
            })
            .collect()
    } else {
        let mut criteria = config.criteria.clone();
        if let Some(weights) = &settings.weights {
            ensure_whatever!(
                weights.len() == criteria.len(),
                "{} weights provided for {} criteria",
                weights.len(),
                criteria.len()
            );
            for (c, w) in criteria.iter_mut().zip(weights.iter()) {
                c.weight = *w;
            }
        }
        criteria
    };

    if let Some(directions) = &settings.directions {
        ensure_whatever!(
            directions.len() == criteria.len(),
            "{} directions provided for {} criteria",
            directions.len(),
            criteria.len()
        );
        for (c, d) in criteria.iter_mut().zip(directions.iter()) {
            c.criterion_type = d.clone();
        }
    }
    Ok(criteria)
}

fn build_problem(
    config: &TopsisConfig,
    criteria: &[CriterionConfig],
    table: &ParsedTable,
) -> AnalysisResult<DecisionProblem> {
    let rules = validate_rules(&config.rules)?;
    debug!("build_problem: rules: {:?}", rules);

    let criteria: Vec<Criterion> = criteria
        .iter()
        .map(|c| -> Result<Criterion, TopsisError> {
            Ok(Criterion {
                name: c.name.clone(),
                weight: c.weight,
                direction: c.criterion_type.parse::<CriterionDirection>()?,
            })
        })
        .collect::<Result<Vec<Criterion>, TopsisError>>()
        .context(RankingSnafu {})?;

    let mut builder = Builder::new(&rules)
        .and_then(|b| b.criteria(&criteria))
        .context(RankingSnafu {})?;
    for alt in table.alternatives.iter() {
        builder
            .add_alternative(&alt.name, &alt.values)
            .context(RankingSnafu {})?;
    }
    builder.build().context(RankingSnafu {})
}

fn fmt_num(x: f64, decimals: usize) -> JSValue {
    json!(format!("{:.*}", decimals, x))
}

fn fmt_vec(v: &[f64], decimals: usize) -> Vec<JSValue> {
    v.iter().map(|x| fmt_num(*x, decimals)).collect()
}

fn fmt_matrix(m: &[Vec<f64>], decimals: usize) -> Vec<Vec<JSValue>> {
    m.iter().map(|row| fmt_vec(row, decimals)).collect()
}

fn result_to_json(res: &TopsisResult, decimals: usize) -> JSValue {
    let ranking: Vec<JSValue> = res
        .ranking
        .iter()
        .map(|e| {
            json!({
                "rank": e.rank,
                "alternative": e.alternative,
                "closeness": fmt_num(e.closeness, decimals),
                "distanceToPositive": fmt_num(e.distance_to_positive, decimals),
                "distanceToNegative": fmt_num(e.distance_to_negative, decimals),
                "index": e.index,
                "degenerate": e.degenerate,
            })
        })
        .collect();
    json!({
        "alternativeNames": res.alternative_names,
        "criteriaNames": res.criterion_names,
        "criteriaTypes": res.directions.iter().map(|d| d.as_str()).collect::<Vec<&str>>(),
        "decisionMatrix": fmt_matrix(&res.decision_matrix, decimals),
        "weights": fmt_vec(&res.weights, decimals),
        "normalizedMatrix": fmt_matrix(&res.normalized_matrix, decimals),
        "weightedMatrix": fmt_matrix(&res.weighted_matrix, decimals),
        "idealPositive": fmt_vec(&res.ideal_positive, decimals),
        "idealNegative": fmt_vec(&res.ideal_negative, decimals),
        "separationFromIdeal": fmt_vec(&res.separation_from_ideal, decimals),
        "separationFromNegativeIdeal": fmt_vec(&res.separation_from_negative_ideal, decimals),
        "closeness": fmt_vec(&res.closeness, decimals),
        "zeroColumns": res.zero_columns,
        "ranking": ranking,
    })
}

fn build_summary_js(
    config: &TopsisConfig,
    criteria: &[CriterionConfig],
    res: &TopsisResult,
) -> JSValue {
    let decimals = config
        .output_settings
        .decimal_places
        .unwrap_or(DEFAULT_DECIMAL_PLACES);
    json!({
        "config": {
            "problemName": config.output_settings.problem_name,
            "criteria": criteria,
            "rules": config.rules,
        },
        "results": result_to_json(res, decimals),
    })
}

fn write_summary(
    root_path: &Path,
    config: &TopsisConfig,
    settings: &RunSettings,
    pretty_js: &str,
) -> AnalysisResult<()> {
    // The command line wins over the configuration.
    let out_path: Option<PathBuf> = match settings.out.as_deref() {
        Some("stdout") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => config.output_settings.output_directory.as_ref().map(|dir| {
            [
                root_path,
                Path::new(dir),
                Path::new(&format!("{}_summary.json", config.output_settings.problem_name)),
            ]
            .iter()
            .collect()
        }),
    };
    match out_path {
        None => println!("{}", pretty_js),
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {}", path);
            fs::write(&p, pretty_js).context(WritingSummarySnafu { path })?;
        }
    }
    Ok(())
}

/// Runs one analysis end to end and returns the summary.
pub fn run_analysis(settings: &RunSettings) -> AnalysisResult<JSValue> {
    let (mut config, root_path): (TopsisConfig, PathBuf) =
        match (&settings.config, &settings.input) {
            (Some(config_path), _) => {
                let config = read_config(config_path)?;
                let root = Path::new(config_path)
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                (config, root)
            }
            (None, Some(input)) => (
                TopsisConfig::from_input(input, settings.input_type.as_deref().unwrap_or("csv")),
                PathBuf::new(),
            ),
            (None, None) => whatever!("either a configuration file or an input file is required"),
        };
    info!("config: {:?}", config);

    // The data file given on the command line is relative to the working directory.
    let mut data_root = root_path.clone();
    if let Some(input) = &settings.input {
        config.data_source.file_path = Some(input.clone());
        data_root = PathBuf::new();
        if config.data_source.provider == "inline" && settings.input_type.is_none() {
            info!("run_analysis: reading {:?} as csv instead of the inline matrix", input);
            config.data_source.provider = "csv".to_string();
        }
    }
    if let Some(input_type) = &settings.input_type {
        config.data_source.provider = input_type.clone();
    }
    if let Some(worksheet) = &settings.excel_worksheet_name {
        config.data_source.excel_worksheet_name = Some(worksheet.clone());
    }

    let table = read_problem_data(&data_root, &config.data_source)?;
    let criteria = resolve_criteria(&config, &table, settings)?;
    let problem = build_problem(&config, &criteria, &table)?;
    debug!("run_analysis: problem: {:?}", problem);

    let result = problem.rank().context(RankingSnafu {})?;
    if let Some(winner) = result.winner() {
        info!(
            "Best alternative: {} (closeness {})",
            winner.alternative, winner.closeness
        );
    }

    let result_js = build_summary_js(&config, &criteria, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_summary(&root_path, &config, settings, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &settings.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

/// Prints the error with its chain of causes.
pub fn report_error(e: &AnalysisError) {
    eprintln!("An error occured: {}", e);
    for cause in e.iter_chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}

#[cfg(test)]
fn test_dir() -> String {
    format!("{}/test_data", env!("CARGO_MANIFEST_DIR"))
}

#[cfg(test)]
fn run_analysis_test(
    test_name: &str,
    config_lpath: &str,
    summary_lpath: &str,
) -> AnalysisResult<JSValue> {
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    let settings = RunSettings {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        ..RunSettings::default()
    };
    let res = run_analysis(&settings);
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        report_error(e);
    }
    res
}

#[cfg(test)]
fn test_wrapper(test_name: &str) {
    let res = run_analysis_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res.err());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn laptops() {
        init();
        test_wrapper("laptops");
    }

    #[test]
    fn laptops_inline() {
        init();
        test_wrapper("laptops_inline");
    }

    #[test]
    fn laptops_xlsx() {
        init();
        test_wrapper("laptops_xlsx");
    }

    #[test]
    fn zero_column() {
        init();
        test_wrapper("zero_column");
    }

    #[test]
    fn input_without_config() {
        init();
        let settings = RunSettings {
            input: Some(format!("{}/laptops/laptops.csv", test_dir())),
            weights: Some(vec![0.3, 0.5, 0.2]),
            directions: Some(vec![
                "cost".to_string(),
                "benefit".to_string(),
                "benefit".to_string(),
            ]),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        let js = run_analysis(&settings).unwrap();
        assert_eq!(js["config"]["problemName"], json!("laptops"));
        assert_eq!(js["results"]["ranking"][0]["alternative"], json!("Laptop B"));
        assert_eq!(js["results"]["ranking"][0]["closeness"], json!("1.0000"));
        assert_eq!(js["results"]["ranking"][1]["alternative"], json!("Laptop C"));
        assert_eq!(js["results"]["ranking"][2]["alternative"], json!("Laptop A"));
    }

    #[test]
    fn input_file_replaces_inline_matrix() {
        init();
        let settings = RunSettings {
            config: Some(format!("{}/laptops_inline/laptops_inline_config.json", test_dir())),
            input: Some(format!("{}/zero_column/zero_column.csv", test_dir())),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        let js = run_analysis(&settings).unwrap();
        assert_eq!(
            js["results"]["alternativeNames"],
            json!(["North", "South", "East", "West"])
        );
        assert_eq!(js["results"]["zeroColumns"], json!([1]));
        assert_eq!(js["config"]["rules"], JSValue::Null);
    }

    #[test]
    fn summary_reports_the_rules() {
        init();
        let settings = RunSettings {
            config: Some(format!("{}/laptops/laptops_config.json", test_dir())),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        let js = run_analysis(&settings).unwrap();
        assert_eq!(js["config"]["rules"]["weightScale"], json!("percent"));
        assert_eq!(js["config"]["rules"]["requireWeightTotal"], json!(100.0));
        assert_eq!(js["config"]["rules"]["clampValues"], json!([0.0, 100.0]));
    }

    #[test]
    fn weights_must_sum_to_100() {
        init();
        let settings = RunSettings {
            config: Some(format!("{}/laptops/laptops_config.json", test_dir())),
            weights: Some(vec![30.0, 50.0, 10.0]),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        let err = run_analysis(&settings).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Ranking {
                source: TopsisError::WeightTotal { .. }
            }
        ));
    }

    #[test]
    fn unknown_direction() {
        init();
        let settings = RunSettings {
            config: Some(format!("{}/laptops/laptops_config.json", test_dir())),
            directions: Some(vec![
                "cost".to_string(),
                "benefit".to_string(),
                "profit".to_string(),
            ]),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        let err = run_analysis(&settings).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Ranking {
                source: TopsisError::InvalidDirection { .. }
            }
        ));
    }

    #[test]
    fn reference_mismatch_fails() {
        init();
        let settings = RunSettings {
            config: Some(format!("{}/laptops/laptops_config.json", test_dir())),
            reference: Some(format!(
                "{}/zero_column/zero_column_expected_summary.json",
                test_dir()
            )),
            out: Some("stdout".to_string()),
            ..RunSettings::default()
        };
        assert!(matches!(
            run_analysis(&settings),
            Err(AnalysisError::Whatever { .. })
        ));
    }

    #[test]
    fn missing_inputs() {
        assert!(run_analysis(&RunSettings::default()).is_err());
    }

    #[test]
    fn summary_numbers_follow_decimal_places() {
        let res = compute_ranking(
            &[vec![1.0, 2.0], vec![2.0, 1.0]],
            &[0.5, 0.5],
            &[CriterionDirection::Benefit, CriterionDirection::Cost],
            None,
            None,
        )
        .unwrap();
        let js = result_to_json(&res, 2);
        assert_eq!(js["weights"], json!(["0.50", "0.50"]));
        assert_eq!(js["criteriaTypes"], json!(["benefit", "cost"]));
        assert_eq!(js["ranking"][0]["rank"], json!(1));
    }
}

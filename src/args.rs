use clap::Parser;

/// This is a multi-criteria ranking program using the TOPSIS method.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the description of the problem in JSON format.
    /// For more information about the file format, read the documentation of the topsis crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected summary in JSON format. If provided, toprank will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the decision matrix is read from this file. Setting this option
    /// overrides the file path of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of comma-separated numbers) The weight of each criterion. Required when no configuration
    /// file declares the criteria.
    #[clap(short, long, value_parser, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,

    /// (list of comma-separated values: benefit or cost) The direction of each criterion. All the
    /// criteria are benefits by default.
    #[clap(short, long, value_parser, value_delimiter = ',')]
    pub directions: Option<Vec<String>>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

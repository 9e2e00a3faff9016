use anyhow::{bail, Context, Result};
use clap::Parser;
use fprules::data::{load_transactions_from_path, write_rules_to_path, ItemColumn};
use fprules::{run_analysis, DuplicatePolicy, MiningConfig};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mine association rules from trip records
#[derive(Parser, Debug)]
#[command(name = "fprules")]
#[command(about = "FP-Growth association rules over grouped CSV records")]
#[command(version)]
struct Cli {
    /// CSV file with a `trip_id` column
    #[arg(short, long, env = "DELIVERY_TRANSACTIONS_FILE")]
    input: PathBuf,

    /// Columns to analyse in turn (district, road_name, or any header)
    #[arg(
        short,
        long = "column",
        value_delimiter = ',',
        default_value = "district,road_name"
    )]
    columns: Vec<String>,

    /// Threshold preset (district, road); defaults to the column's preset
    #[arg(long)]
    preset: Option<String>,

    /// TOML file with thresholds; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    min_support: Option<f64>,

    #[arg(long)]
    min_confidence: Option<f64>,

    #[arg(long)]
    min_lift: Option<f64>,

    #[arg(long)]
    min_quality_score: Option<f64>,

    #[arg(long)]
    max_rules: Option<usize>,

    /// Count each item once per transaction
    #[arg(long)]
    dedupe: bool,

    /// Mine sibling branches on one thread
    #[arg(long)]
    sequential: bool,

    /// Abort when the trees of one run exceed this many nodes
    #[arg(long)]
    node_budget: Option<usize>,

    /// Rules CSV for a single-column run; defaults to OUTPUT_DISTRICT_RULES /
    /// OUTPUT_ROAD_RULES
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of top rules to log
    #[arg(long, default_value_t = 10)]
    top: usize,
}

impl Cli {
    fn mining_config(&self, column: &ItemColumn) -> Result<MiningConfig> {
        let mut config = match (&self.config, &self.preset) {
            (Some(path), _) => MiningConfig::load(path)?,
            (None, Some(name)) => MiningConfig::preset(name)
                .with_context(|| format!("unknown preset `{}`", name))?,
            (None, None) => {
                MiningConfig::preset(column.header()).unwrap_or_else(MiningConfig::district)
            }
        };

        if let Some(v) = self.min_support {
            config.min_support = v;
        }
        if let Some(v) = self.min_confidence {
            config.min_confidence = v;
        }
        if let Some(v) = self.min_lift {
            config.min_lift = v;
        }
        if let Some(v) = self.min_quality_score {
            config.min_quality_score = v;
        }
        if self.max_rules.is_some() {
            config.max_rules = self.max_rules;
        }
        if self.dedupe {
            config.duplicates = DuplicatePolicy::DedupePerTransaction;
        }
        if self.sequential {
            config.parallel = false;
        }
        if self.node_budget.is_some() {
            config.node_budget = self.node_budget;
        }
        Ok(config)
    }

    fn output_path(&self, column: &ItemColumn) -> Option<PathBuf> {
        let var = match column {
            ItemColumn::District => "OUTPUT_DISTRICT_RULES",
            ItemColumn::Road => "OUTPUT_ROAD_RULES",
            ItemColumn::Other(_) => return self.output.clone(),
        };
        self.output
            .clone()
            .or_else(|| env::var_os(var).map(PathBuf::from))
    }
}

fn analyse_column(cli: &Cli, column: &ItemColumn) -> Result<usize> {
    let config = cli.mining_config(column)?;

    info!(input = %cli.input.display(), column = column.header(), "loading transactions");
    let transactions = load_transactions_from_path(&cli.input, column)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let report = run_analysis(&transactions, &config, column.header())?;

    for (rank, rule) in report.rules.iter().take(cli.top).enumerate() {
        info!(rank = rank + 1, "{}", rule);
    }

    match cli.output_path(column) {
        Some(_) if report.rules.is_empty() => {
            warn!(analysis = %report.name, "no rules, nothing saved");
        }
        Some(path) => write_rules_to_path(&path, &report.rules)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {}
    }

    info!(
        analysis = %report.name,
        rules = report.rules.len(),
        max_rules = ?config.max_rules,
        "analysis done"
    );
    Ok(report.rules.len())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    if cli.output.is_some() && cli.columns.len() > 1 {
        bail!("--output needs exactly one --column");
    }

    let columns: Vec<ItemColumn> = cli.columns.iter().map(|c| ItemColumn::parse(c)).collect();
    let mut total_rules = 0;
    for column in &columns {
        total_rules += analyse_column(&cli, column)?;
    }

    info!(analyses = columns.len(), rules = total_rules, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["fprules", "--input", "trips.csv"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn config_for(args: &[&str]) -> Result<MiningConfig> {
        let cli = parse(args);
        let column = ItemColumn::parse(&cli.columns[0]);
        cli.mining_config(&column)
    }

    #[test]
    fn both_columns_by_default() {
        let cli = parse(&[]);
        assert_eq!(cli.columns, vec!["district", "road_name"]);

        let cli = parse(&["--column", "road_name,district"]);
        assert_eq!(cli.columns, vec!["road_name", "district"]);
    }

    #[test]
    fn column_picks_its_preset() {
        assert_eq!(config_for(&["--column", "road_name"]).unwrap(), MiningConfig::road());
        assert_eq!(config_for(&["--column", "district"]).unwrap(), MiningConfig::district());
        assert_eq!(config_for(&["--column", "ward"]).unwrap(), MiningConfig::district());
        assert_eq!(
            config_for(&["--column", "district", "--preset", "road"]).unwrap(),
            MiningConfig::road()
        );
    }

    #[test]
    fn config_file_beats_preset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_support = 0.2\nmin_confidence = 0.6").unwrap();
        let path = file.path().to_str().unwrap();

        let config = config_for(&["--preset", "road", "--config", path]).unwrap();
        assert_eq!(config.min_support, 0.2);
        assert_eq!(config.min_confidence, 0.6);
        assert_eq!(config.max_rules, None);
    }

    #[test]
    fn flags_override_the_preset() {
        let config = config_for(&[
            "--column",
            "road_name",
            "--max-rules",
            "25",
            "--min-lift",
            "2.5",
            "--dedupe",
            "--sequential",
            "--node-budget",
            "1000",
        ])
        .unwrap();

        assert_eq!(config.min_support, MiningConfig::road().min_support);
        assert_eq!(config.max_rules, Some(25));
        assert_eq!(config.min_lift, 2.5);
        assert_eq!(config.duplicates, DuplicatePolicy::DedupePerTransaction);
        assert!(!config.parallel);
        assert_eq!(config.node_budget, Some(1000));
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = config_for(&["--preset", "city"]).unwrap_err();
        assert!(err.to_string().contains("unknown preset `city`"));
    }

    #[test]
    fn empty_rule_list_is_not_saved() {
        let mut input = tempfile::NamedTempFile::new().unwrap();
        writeln!(input, "trip_id,district\n1,Quận Ba Đình\n2,Quận Tây Hồ").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("rules.csv");

        let cli = Cli::try_parse_from([
            "fprules",
            "--input",
            input.path().to_str().unwrap(),
            "--column",
            "district",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(analyse_column(&cli, &ItemColumn::District).unwrap(), 0);
        assert!(!out.exists());
    }

    #[test]
    fn output_path_falls_back_to_the_column_variable() {
        // The only test touching these variables.
        env::set_var("OUTPUT_ROAD_RULES", "road_rules.csv");
        env::set_var("OUTPUT_DISTRICT_RULES", "district_rules.csv");

        let cli = parse(&[]);
        assert_eq!(
            cli.output_path(&ItemColumn::Road),
            Some(PathBuf::from("road_rules.csv"))
        );
        assert_eq!(
            cli.output_path(&ItemColumn::District),
            Some(PathBuf::from("district_rules.csv"))
        );
        assert_eq!(cli.output_path(&ItemColumn::Other("ward".into())), None);

        let cli = parse(&["--column", "ward", "--output", "ward.csv"]);
        assert_eq!(
            cli.output_path(&ItemColumn::Road),
            Some(PathBuf::from("ward.csv"))
        );
        assert_eq!(
            cli.output_path(&ItemColumn::Other("ward".into())),
            Some(PathBuf::from("ward.csv"))
        );

        env::remove_var("OUTPUT_ROAD_RULES");
        env::remove_var("OUTPUT_DISTRICT_RULES");
    }
}

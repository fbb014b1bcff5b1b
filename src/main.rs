//! Tax Engine CLI
//!
//! Runs the calculators and the scenario store from the command line.
//! Every command prints its structured result as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use tax_engine::calendar::CalendarAmounts;
use tax_engine::input::parse_amount;
use tax_engine::loader::{load_employees, load_expenses, load_vendors};
use tax_engine::scenario::FileStore;
use tax_engine::{
    EngineConfig, FieldMap, IndividualInputs, Regime, ScenarioComparison, ScenarioStore, TaxEngine,
    TaxType,
};

#[derive(Parser, Debug)]
#[command(name = "tax_engine", version, about = "Estimate Nigerian PIT, PAYE, CIT, VAT and WHT")]
struct Cli {
    /// JSON file overriding rates and thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Personal income tax for one individual
    Individual {
        /// Annual gross income
        #[arg(long, value_parser = amount, default_value = "0")]
        income: f64,
        /// Fixed monthly income (overrides --income)
        #[arg(long, value_parser = amount)]
        monthly: Option<f64>,
        /// Twelve comma-separated monthly amounts (overrides --monthly)
        #[arg(long, value_delimiter = ',', value_parser = amount)]
        months: Vec<f64>,
        #[arg(long, value_parser = amount, default_value = "0")]
        pension: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        nhf: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        nhis: f64,
        /// Annual rent paid
        #[arg(long, value_parser = amount, default_value = "0")]
        rent: f64,
        #[arg(long, default_value = "2026+")]
        regime: Regime,
    },
    /// PAYE for one employee
    Paye {
        #[arg(long, value_parser = amount)]
        monthly_salary: f64,
        #[arg(long, default_value = "2026+")]
        regime: Regime,
    },
    /// Company income tax and education tax
    Cit {
        #[arg(long, value_parser = amount)]
        turnover: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        expenses: f64,
    },
    /// Monthly VAT position
    Vat {
        #[arg(long, value_parser = amount)]
        sales: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        purchases: f64,
    },
    /// Withholding tax over a vendor schedule CSV (name,type,amount)
    Wht {
        vendors: PathBuf,
    },
    /// PAYE for every employee in a CSV (name,monthly_salary)
    Payroll {
        employees: PathBuf,
        #[arg(long, default_value = "2026+")]
        regime: Regime,
    },
    /// Summarize an expense CSV (category,amount,vatable[,deductible_percent])
    Expenses {
        expenses: PathBuf,
    },
    /// Upcoming filing deadlines
    Calendar {
        /// Reference date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = amount, default_value = "0")]
        vat: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        paye: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        wht: f64,
        #[arg(long, value_parser = amount, default_value = "0")]
        cit: f64,
    },
    /// Run a calculator over a JSON inputs object and report outputs with alerts
    Evaluate(EvaluateArgs),
    /// Saved scenarios
    #[command(subcommand)]
    Scenario(ScenarioCommand),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[arg(long)]
    tax_type: TaxType,
    #[arg(long, default_value = "2026+")]
    regime: Regime,
    /// Inputs as a JSON object, or @path to read it from a file
    #[arg(long, default_value = "{}")]
    inputs: String,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Directory holding scenario collections
    #[arg(long, default_value = ".tax_engine")]
    data_dir: PathBuf,
    /// Owner of the collection
    #[arg(long, default_value = "default")]
    user: String,
}

impl StoreArgs {
    fn open(&self) -> ScenarioStore<FileStore> {
        ScenarioStore::new(FileStore::new(&self.data_dir), format!("tax_scenarios_{}", self.user))
    }
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// Evaluate inputs and save the result under a name
    Save {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        evaluate: EvaluateArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    List {
        #[command(flatten)]
        store: StoreArgs,
    },
    Delete {
        id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Compare two or more saved scenarios field by field
    Compare {
        #[arg(required = true, num_args = 2..)]
        ids: Vec<String>,
        #[command(flatten)]
        store: StoreArgs,
    },
}

fn amount(raw: &str) -> std::result::Result<f64, String> {
    parse_amount("amount", raw).map_err(|e| e.to_string())
}

fn read_inputs(raw: &str) -> Result<FieldMap> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading inputs from {}", path))?,
        None => raw.to_string(),
    };
    match serde_json::from_str::<Value>(&text).context("parsing inputs JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("inputs must be a JSON object, got {}", other),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = TaxEngine::with_config(config);

    match cli.command {
        Command::Individual { income, monthly, months, pension, nhf, nhis, rent, regime } => {
            let gross_income = if !months.is_empty() {
                months.iter().sum()
            } else if let Some(monthly) = monthly {
                monthly * 12.0
            } else {
                income
            };
            let inputs = IndividualInputs { gross_income, pension, nhf, nhis, rent_paid: rent };
            print(&engine.individual(regime, &inputs))
        }
        Command::Paye { monthly_salary, regime } => print(&engine.paye(regime, monthly_salary)),
        Command::Cit { turnover, expenses } => print(&engine.company(turnover, expenses)),
        Command::Vat { sales, purchases } => print(&engine.vat(sales, purchases)),
        Command::Wht { vendors } => {
            let vendors = load_vendors(&vendors)
                .with_context(|| format!("loading vendors from {}", vendors.display()))?;
            print(&engine.wht(&vendors))
        }
        Command::Payroll { employees, regime } => {
            let employees = load_employees(&employees)
                .with_context(|| format!("loading employees from {}", employees.display()))?;
            print(&engine.payroll(&employees, regime))
        }
        Command::Expenses { expenses } => {
            let expenses = load_expenses(&expenses)
                .with_context(|| format!("loading expenses from {}", expenses.display()))?;
            print(&engine.expenses(&expenses))
        }
        Command::Calendar { date, vat, paye, wht, cit } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let amounts = CalendarAmounts {
                vat_payable: vat,
                monthly_paye: paye,
                total_wht: wht,
                cit_payable: cit,
            };
            print(&engine.calendar(today, &amounts)?)
        }
        Command::Evaluate(args) => {
            let inputs = read_inputs(&args.inputs)?;
            print(&engine.evaluate(args.tax_type, args.regime, &inputs)?)
        }
        Command::Scenario(command) => run_scenario(&engine, command),
    }
}

fn run_scenario(engine: &TaxEngine, command: ScenarioCommand) -> Result<()> {
    match command {
        ScenarioCommand::Save { name, evaluate, store } => {
            let inputs = read_inputs(&evaluate.inputs)?;
            let evaluation = engine.evaluate(evaluate.tax_type, evaluate.regime, &inputs)?;
            let scenario = store
                .open()
                .save(&name, evaluate.tax_type, evaluate.regime, &inputs, &evaluation.outputs)
                .context("saving scenario")?;
            print(&scenario)
        }
        ScenarioCommand::List { store } => print(&store.open().list()?),
        ScenarioCommand::Delete { id, store } => print(&store.open().delete(&id)?),
        ScenarioCommand::Compare { ids, store } => {
            let scenarios = store.open().compare(&ids)?;
            if scenarios.len() < 2 {
                bail!("need at least two saved scenarios to compare, found {}", scenarios.len());
            }
            print(&ScenarioComparison::build(&scenarios))
        }
    }
}

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use u_deploy::experiment::Instance;
use u_deploy::io::{DataLayout, DEFAULT_CONFIG_DIR, DEFAULT_DATA_DIR, DEFAULT_RESULTS_DIR};
use u_deploy::solver::{Backend, SolverParams, SolverSession};

pub mod analyze;
pub mod compare;
pub mod consistency;
pub mod generate;

pub const INSTANCE_ARG_NAME: &str = "instance";
pub const SIZE_ARG_NAME: &str = "size";
pub const PERIODS_ARG_NAME: &str = "periods";
pub const AMBULANCES_ARG_NAME: &str = "ambulances";
pub const TIME_LIMIT_ARG_NAME: &str = "time-limit";
pub const SOLVER_PARAMS_ARG_NAME: &str = "solver-params";
pub const BACKEND_ARG_NAME: &str = "backend";
pub const DATA_DIR_ARG_NAME: &str = "data-dir";
pub const CONFIG_DIR_ARG_NAME: &str = "config-dir";
pub const RESULTS_DIR_ARG_NAME: &str = "results-dir";

/// Arguments naming an instance and its horizon.
fn instance_args() -> Vec<Arg> {
    vec![
        Arg::new(INSTANCE_ARG_NAME)
            .help("Instance name (e.g. 50-3004-6-7-35)")
            .long(INSTANCE_ARG_NAME)
            .short('i')
            .required(true),
        Arg::new(SIZE_ARG_NAME)
            .help("Graph size, the data subdirectory of the instance")
            .long(SIZE_ARG_NAME)
            .value_parser(value_parser!(usize))
            .default_value("50"),
        Arg::new(PERIODS_ARG_NAME)
            .help("Number of time periods")
            .long(PERIODS_ARG_NAME)
            .short('t')
            .value_parser(value_parser!(usize))
            .default_value("6"),
        Arg::new(DATA_DIR_ARG_NAME)
            .help("Directory containing graphs and bases")
            .long(DATA_DIR_ARG_NAME)
            .value_parser(value_parser!(PathBuf))
            .default_value(DEFAULT_DATA_DIR),
        Arg::new(CONFIG_DIR_ARG_NAME)
            .help("Directory containing configuration sets")
            .long(CONFIG_DIR_ARG_NAME)
            .value_parser(value_parser!(PathBuf))
            .default_value(DEFAULT_CONFIG_DIR),
    ]
}

/// Arguments of commands that solve models.
fn solve_args() -> Vec<Arg> {
    vec![
        Arg::new(AMBULANCES_ARG_NAME)
            .help("Number of vehicles to deploy")
            .long(AMBULANCES_ARG_NAME)
            .short('n')
            .value_parser(value_parser!(u32))
            .default_value("50"),
        Arg::new(TIME_LIMIT_ARG_NAME)
            .help("Time limit per solve in seconds; overrides the parameter file")
            .long(TIME_LIMIT_ARG_NAME)
            .value_parser(value_parser!(u64)),
        Arg::new(SOLVER_PARAMS_ARG_NAME)
            .help("Solver parameter file with key=value lines")
            .long(SOLVER_PARAMS_ARG_NAME)
            .value_parser(value_parser!(PathBuf)),
        Arg::new(BACKEND_ARG_NAME)
            .help("MIP backend")
            .long(BACKEND_ARG_NAME)
            .value_parser(["microlp", "highs"])
            .default_value("microlp"),
        Arg::new(RESULTS_DIR_ARG_NAME)
            .help("Directory to save results")
            .long(RESULTS_DIR_ARG_NAME)
            .value_parser(value_parser!(PathBuf))
            .default_value(DEFAULT_RESULTS_DIR),
    ]
}

fn get_path(matches: &ArgMatches, name: &str, default: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default))
}

fn get_layout(matches: &ArgMatches) -> DataLayout {
    let results_dir = match matches.try_get_one::<PathBuf>(RESULTS_DIR_ARG_NAME) {
        Ok(Some(dir)) => dir.clone(),
        _ => PathBuf::from(DEFAULT_RESULTS_DIR),
    };
    DataLayout::new(
        get_path(matches, DATA_DIR_ARG_NAME, DEFAULT_DATA_DIR),
        get_path(matches, CONFIG_DIR_ARG_NAME, DEFAULT_CONFIG_DIR),
        results_dir,
    )
}

fn get_value<T>(matches: &ArgMatches, name: &str) -> Result<T, String>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .get_one::<T>(name)
        .cloned()
        .ok_or_else(|| format!("missing value for '--{name}'"))
}

fn load_instance(matches: &ArgMatches, layout: &DataLayout) -> Result<Instance, String> {
    let name = get_value::<String>(matches, INSTANCE_ARG_NAME)?;
    let size = get_value::<usize>(matches, SIZE_ARG_NAME)?;
    Instance::load(layout, &name, size)
        .map_err(|err| format!("cannot load instance '{name}': {err}"))
}

fn open_session(matches: &ArgMatches) -> Result<SolverSession, String> {
    let params = match matches.get_one::<PathBuf>(SOLVER_PARAMS_ARG_NAME) {
        Some(path) => SolverParams::load(path).map_err(|err| err.to_string())?,
        None => SolverParams::new(),
    };
    let backend = Backend::from_str(&get_value::<String>(matches, BACKEND_ARG_NAME)?)
        .map_err(|err| err.to_string())?;
    let session = SolverSession::with_backend(backend, params).map_err(|err| err.to_string())?;

    Ok(match matches.get_one::<u64>(TIME_LIMIT_ARG_NAME) {
        Some(&seconds) => {
            let limits = session.limits().with_time_limit(Duration::from_secs(seconds));
            session.with_limits(limits)
        }
        None => session,
    })
}

/// Parses a comma-separated list such as `100,500,1000`.
fn parse_list<T: FromStr>(raw: &str, desc: &str) -> Result<Vec<T>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<T>()
                .map_err(|_| format!("cannot parse '{item}' in {desc}"))
        })
        .collect()
}

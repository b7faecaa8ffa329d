use super::*;
use u_deploy::experiment::{log_spaced_sizes, scaling_analysis, Scenario};
use u_deploy::io::{write_records, ConfigurationSetKind};

pub const MIN_CONFIGS_ARG_NAME: &str = "min-configs";
pub const MAX_CONFIGS_ARG_NAME: &str = "max-configs";
pub const NUM_STEPS_ARG_NAME: &str = "num-steps";

pub fn get_analyze_app() -> Command {
    Command::new("analyze")
        .about("Solves the base model over log-spaced numbers of all-bases configurations")
        .args(instance_args())
        .args(solve_args())
        .arg(
            Arg::new(MIN_CONFIGS_ARG_NAME)
                .help("Smallest configuration count")
                .long(MIN_CONFIGS_ARG_NAME)
                .value_parser(value_parser!(usize))
                .default_value("100"),
        )
        .arg(
            Arg::new(MAX_CONFIGS_ARG_NAME)
                .help("Largest configuration count; all stored configurations when omitted")
                .long(MAX_CONFIGS_ARG_NAME)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(NUM_STEPS_ARG_NAME)
                .help("Number of log-spaced steps")
                .long(NUM_STEPS_ARG_NAME)
                .value_parser(value_parser!(usize))
                .default_value("8"),
        )
}

pub fn run_analyze(matches: &ArgMatches) -> Result<(), String> {
    let layout = get_layout(matches);
    let instance = load_instance(matches, &layout)?;
    let periods = get_value::<usize>(matches, PERIODS_ARG_NAME)?;
    let num_vehicles = get_value::<u32>(matches, AMBULANCES_ARG_NAME)?;

    let configurations = instance
        .load_configurations(&layout, ConfigurationSetKind::AllBases, periods, None)
        .map_err(|err| err.to_string())?;

    let min = get_value::<usize>(matches, MIN_CONFIGS_ARG_NAME)?;
    let max = matches
        .get_one::<usize>(MAX_CONFIGS_ARG_NAME)
        .map_or(configurations.len(), |&max| max.min(configurations.len()));
    let steps = get_value::<usize>(matches, NUM_STEPS_ARG_NAME)?;
    let sizes = log_spaced_sizes(min, max, steps).map_err(|err| err.to_string())?;

    let scenario = Scenario {
        graph: instance.graph(),
        configurations: &configurations,
        periods,
        num_vehicles,
        bases: Some(instance.bases()),
    };

    let mut session = open_session(matches)?;
    let records =
        scaling_analysis(&mut session, &scenario, &sizes).map_err(|err| err.to_string())?;
    session.close();

    let path = layout.model_output_dir("all_bases").join("all_bases_analysis.csv");
    write_records(&path, &records).map_err(|err| err.to_string())?;
    println!("{} scaling steps written to {}", records.len(), path.display());

    Ok(())
}

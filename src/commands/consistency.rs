use super::*;
use u_deploy::experiment::{consistency_analysis, Scenario};
use u_deploy::formulation::ConsistencyFormulation;
use u_deploy::io::{write_json, write_records, ConfigurationSetKind, RunSummary};

pub const NUM_CONFIGS_ARG_NAME: &str = "num-configs";
pub const MAX_FREQ_ARG_NAME: &str = "max-freq";
pub const MAX_MOVEMENT_ARG_NAME: &str = "max-movement";

pub fn get_consistency_app() -> Command {
    Command::new("consistency")
        .about("Solves the consistency model and writes coverage over time")
        .args(instance_args())
        .args(solve_args())
        .arg(
            Arg::new(NUM_CONFIGS_ARG_NAME)
                .help("Number of all-bases configurations to use")
                .long(NUM_CONFIGS_ARG_NAME)
                .value_parser(value_parser!(usize))
                .default_value("10000"),
        )
        .arg(
            Arg::new(MAX_FREQ_ARG_NAME)
                .help("Maximum frequency per configuration")
                .long(MAX_FREQ_ARG_NAME)
                .value_parser(value_parser!(u32))
                .default_value("3"),
        )
        .arg(
            Arg::new(MAX_MOVEMENT_ARG_NAME)
                .help("Maximum vehicles moving between zones per period")
                .long(MAX_MOVEMENT_ARG_NAME)
                .value_parser(value_parser!(u32))
                .default_value("10"),
        )
}

pub fn run_consistency(matches: &ArgMatches) -> Result<(), String> {
    let layout = get_layout(matches);
    let instance = load_instance(matches, &layout)?;
    let periods = get_value::<usize>(matches, PERIODS_ARG_NAME)?;
    let num_vehicles = get_value::<u32>(matches, AMBULANCES_ARG_NAME)?;
    let num_configs = get_value::<usize>(matches, NUM_CONFIGS_ARG_NAME)?;
    let formulation = ConsistencyFormulation::new(
        get_value::<u32>(matches, MAX_FREQ_ARG_NAME)?,
        get_value::<u32>(matches, MAX_MOVEMENT_ARG_NAME)?,
    );

    let configurations = instance
        .load_configurations(&layout, ConfigurationSetKind::AllBases, periods, Some(num_configs))
        .map_err(|err| err.to_string())?;

    let scenario = Scenario {
        graph: instance.graph(),
        configurations: &configurations,
        periods,
        num_vehicles,
        bases: Some(instance.bases()),
    };

    let mut session = open_session(matches)?;
    let report =
        consistency_analysis(&mut session, &scenario, &formulation).map_err(|err| err.to_string())?;
    session.close();

    let output_dir = layout.model_output_dir("consistency");
    let summary = RunSummary::from_outcome(&report.run.outcome);
    write_json(output_dir.join("summary.json"), &summary).map_err(|err| err.to_string())?;

    match &report.timeline {
        Some(timeline) => {
            let path = output_dir.join("coverage_timeline.csv");
            write_records(&path, &timeline.rows(instance.graph())).map_err(|err| err.to_string())?;
            println!(
                "status {}, fairness gap {:?}, coverage over time written to {}",
                summary.status,
                summary.objective,
                path.display()
            );
        }
        None => println!("status {}, no solution found", summary.status),
    }

    Ok(())
}

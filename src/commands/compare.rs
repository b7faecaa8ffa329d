use super::*;
use u_deploy::experiment::{compare_formulations, Scenario};
use u_deploy::io::{write_records, ConfigurationSetKind};

pub const CONFIG_SIZES_ARG_NAME: &str = "config-sizes";
pub const FREQ_BOUNDS_ARG_NAME: &str = "freq-bounds";

pub fn get_compare_app() -> Command {
    Command::new("compare")
        .about("Compares the base and frequency-bounded models")
        .args(instance_args())
        .args(solve_args())
        .arg(
            Arg::new(CONFIG_SIZES_ARG_NAME)
                .help("Comma-separated configuration counts")
                .long(CONFIG_SIZES_ARG_NAME)
                .default_value("100,500,1000,2000,5000"),
        )
        .arg(
            Arg::new(FREQ_BOUNDS_ARG_NAME)
                .help("Comma-separated frequency bounds")
                .long(FREQ_BOUNDS_ARG_NAME)
                .default_value("3,5,10"),
        )
}

pub fn run_compare(matches: &ArgMatches) -> Result<(), String> {
    let layout = get_layout(matches);
    let instance = load_instance(matches, &layout)?;
    let periods = get_value::<usize>(matches, PERIODS_ARG_NAME)?;
    let num_vehicles = get_value::<u32>(matches, AMBULANCES_ARG_NAME)?;
    let sizes = parse_list::<usize>(
        &get_value::<String>(matches, CONFIG_SIZES_ARG_NAME)?,
        "config sizes",
    )?;
    let freq_bounds = parse_list::<u32>(
        &get_value::<String>(matches, FREQ_BOUNDS_ARG_NAME)?,
        "frequency bounds",
    )?;

    let max_size = sizes.iter().copied().max();
    let configurations = instance
        .load_configurations(&layout, ConfigurationSetKind::AllBases, periods, max_size)
        .map_err(|err| err.to_string())?;

    let scenario = Scenario {
        graph: instance.graph(),
        configurations: &configurations,
        periods,
        num_vehicles,
        bases: Some(instance.bases()),
    };

    let mut session = open_session(matches)?;
    let records = compare_formulations(&mut session, &scenario, &sizes, &freq_bounds)
        .map_err(|err| err.to_string())?;
    session.close();

    let path = layout.model_output_dir("comparison").join("formulation_comparison.csv");
    write_records(&path, &records).map_err(|err| err.to_string())?;
    println!("{} comparisons written to {}", records.len(), path.display());

    Ok(())
}

use super::*;
use u_deploy::enumeration::MobilityRule;
use u_deploy::io::{write_configurations, ConfigurationSetKind};

pub const BASE_ARG_NAME: &str = "base";
pub const FREE_ROAMING_ARG_NAME: &str = "free-roaming";
pub const LIMIT_ARG_NAME: &str = "limit";

pub fn get_generate_app() -> Command {
    Command::new("generate")
        .about("Enumerates configurations anchored at one base or at all bases")
        .args(instance_args())
        .arg(
            Arg::new(BASE_ARG_NAME)
                .help("Index of the base to anchor at; all bases when omitted")
                .long(BASE_ARG_NAME)
                .short('b')
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(FREE_ROAMING_ARG_NAME)
                .help("Allow moves from non-base zones")
                .long(FREE_ROAMING_ARG_NAME)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(LIMIT_ARG_NAME)
                .help("Refuse to enumerate a base with more configurations than this")
                .long(LIMIT_ARG_NAME)
                .value_parser(value_parser!(usize)),
        )
}

pub fn run_generate(matches: &ArgMatches) -> Result<(), String> {
    let layout = get_layout(matches);
    let instance = load_instance(matches, &layout)?;
    let periods = get_value::<usize>(matches, PERIODS_ARG_NAME)?;

    let kind = match matches.get_one::<usize>(BASE_ARG_NAME) {
        Some(&k) => ConfigurationSetKind::Base(k),
        None => ConfigurationSetKind::AllBases,
    };
    let rule = if matches.get_flag(FREE_ROAMING_ARG_NAME) {
        MobilityRule::FreeRoaming
    } else {
        MobilityRule::BaseAnchored
    };
    let limit = matches.get_one::<usize>(LIMIT_ARG_NAME).copied();

    let configurations = instance
        .generate_configurations(kind, periods, rule, limit)
        .map_err(|err| err.to_string())?;

    let path = layout.configurations_path(instance.name(), instance.size(), kind, periods);
    write_configurations(&path, instance.graph(), periods, &configurations)
        .map_err(|err| err.to_string())?;
    println!("{} configurations written to {}", configurations.len(), path.display());

    Ok(())
}

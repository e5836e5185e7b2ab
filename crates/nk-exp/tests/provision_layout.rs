use std::fs;
use std::path::Path;

use nk_core::{ParameterSet, SeedCounter};
use nk_exp::{provision, Condition, ExperimentPlan, ReplicateStatus};
use tempfile::tempdir;

fn small_plan() -> ExperimentPlan {
    let defaults: ParameterSet = [("N", 20i64), ("K", 3)].into_iter().collect();
    let overrides: ParameterSet = [("K", 10i64)].into_iter().collect();
    let mut plan = ExperimentPlan::new(defaults, vec![Condition::new(overrides)]);
    plan.replicates = 2;
    plan
}

fn flag_value<'a>(tokens: &[&'a str], flag: &str) -> &'a str {
    let idx = tokens
        .iter()
        .position(|token| *token == flag)
        .unwrap_or_else(|| panic!("missing {flag}"));
    tokens[idx + 1]
}

fn read_command(path: &Path) -> String {
    fs::read_to_string(path).expect("command file")
}

#[test]
fn single_condition_lays_out_replicates() {
    let root = tempdir().expect("root");
    let mut seeds = SeedCounter::default();
    let report = provision(root.path(), &small_plan(), &mut seeds).expect("provision");

    let condition_dir = root.path().join("N_20_K_10");
    assert!(condition_dir.is_dir());
    assert_eq!(report.conditions[0].dir_name, "N_20_K_10");

    let mut seen_seeds = Vec::new();
    for index in 0..2 {
        let command = read_command(&condition_dir.join(index.to_string()).join("command.sh"));
        let tokens: Vec<&str> = command.split_whitespace().collect();
        assert_eq!(tokens[0], "./nk_oee");
        assert_eq!(flag_value(&tokens, "-K"), "10");
        assert_eq!(flag_value(&tokens, "-N"), "20");
        assert_eq!(flag_value(&tokens, "-MODES_RESOLUTION"), "10");
        seen_seeds.push(flag_value(&tokens, "-SEED").parse::<u64>().expect("seed"));
    }
    assert!(seen_seeds[0] < seen_seeds[1]);
    assert_eq!(report.seeds_issued, 2);
    assert_eq!(seeds.last(), 2);
}

#[test]
fn command_file_is_single_line_in_flag_order() {
    let root = tempdir().expect("root");
    let mut seeds = SeedCounter::default();
    provision(root.path(), &small_plan(), &mut seeds).expect("provision");
    let command = read_command(&root.path().join("N_20_K_10/0/command.sh"));
    assert_eq!(command, "./nk_oee -MODES_RESOLUTION 10 -SEED 1 -N 20 -K 10");
}

#[test]
fn seeds_are_unique_across_conditions() {
    let root = tempdir().expect("root");
    let mut plan = ExperimentPlan::nk_oee();
    plan.replicates = 3;
    let mut seeds = SeedCounter::default();
    let report = provision(root.path(), &plan, &mut seeds).expect("provision");

    let issued: Vec<u64> = report
        .conditions
        .iter()
        .flat_map(|condition| &condition.replicates)
        .map(|replicate| replicate.seed.expect("fresh tree"))
        .collect();
    assert_eq!(issued.len(), plan.conditions.len() * 3);
    assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(report.last_seed, issued.len() as u64);
    assert!(report
        .conditions
        .iter()
        .all(|condition| condition.replicates.iter().all(|r| r.status == ReplicateStatus::Written)));
}

#[test]
fn historical_plan_names_follow_default_order() {
    let root = tempdir().expect("root");
    let mut plan = ExperimentPlan::nk_oee();
    plan.replicates = 1;
    let report = provision(root.path(), &plan, &mut SeedCounter::default()).expect("provision");
    let names: Vec<&str> = report.conditions.iter().map(|c| c.dir_name.as_str()).collect();
    assert_eq!(
        names[0],
        "N_20_K_3_POPSIZE_200_MUTRATE_0.05_TOURNAMENTSIZE_2_SELECTION_0_CHANGERATE_100000_MAXGENS_5000_FILTERLENGTH_200"
    );
    assert_eq!(
        names[6],
        "N_20_K_3_POPSIZE_2000_MUTRATE_0.05_TOURNAMENTSIZE_2_SELECTION_0_CHANGERATE_100000_MAXGENS_5000_FILTERLENGTH_2000"
    );
    assert!(names[10].ends_with("FILTERLENGTH_200_CHANGETYPE_1"));

    let command = read_command(&root.path().join(names[6]).join("0/command.sh"));
    assert!(command.contains("-POP_SIZE 2000"));
    assert!(command.contains("-FILTER_LENGTH 2000"));
}

//! Demo/report binary: loads the declarative study definitions, derives the
//! sizing-scenario thrust requirements and component masses, and runs the
//! rotor-failure controllability analysis.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use uav_mdo::controllability::degree_of_controllability;
use uav_mdo::mission::MissionDefinition;
use uav_mdo::params::ParamTree;
use uav_mdo::problem::OptimizationProblem;
use uav_mdo::scaling::{self, ScalingReference, SizingScenario};
use uav_mdo::{DocInput, VERSION};

/// Bundled default study definitions.
const DEFAULT_PROBLEM: &str = include_str!("../configurations/multirotor_problem.toml");
const DEFAULT_MISSION: &str = include_str!("../configurations/sizing_mission.toml");

#[derive(Debug, Parser)]
#[command(
    name = "uav-mdo",
    version,
    about = "UAV MDO parameter layer and rotor-failure controllability report"
)]
struct Cli {
    /// Optimization problem definition (TOML); bundled default when omitted.
    #[arg(long)]
    problem: Option<PathBuf>,

    /// Mission definition (TOML); bundled default when omitted.
    #[arg(long)]
    mission: Option<PathBuf>,

    /// Number of rotors for the controllability case.
    #[arg(long, default_value_t = 4)]
    rotors: usize,

    /// Treat rotors as coaxial pairs.
    #[arg(long)]
    coaxial: bool,

    /// Maximum thrust per rotor (N).
    #[arg(long, default_value_t = 6.0)]
    thrust: f64,

    /// Arm length (m).
    #[arg(long, default_value_t = 0.28)]
    arm: f64,

    /// Total UAV mass (kg).
    #[arg(long, default_value_t = 2.0)]
    mass: f64,

    /// Motor mass (kg).
    #[arg(long, default_value_t = 0.03)]
    motor_mass: f64,

    /// Propeller mass (kg).
    #[arg(long, default_value_t = 0.015)]
    propeller_mass: f64,

    /// Time horizon of the discretized model (s).
    #[arg(long, default_value_t = 0.5)]
    horizon: f64,

    /// Discretization step count.
    #[arg(long, default_value_t = 2)]
    steps: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    println!("===================================================");
    println!("UAV MDO Parameter Layer & Controllability Analysis");
    println!("v{VERSION}");
    println!("===================================================");
    println!();

    let problem = match &cli.problem {
        Some(path) => OptimizationProblem::load(path)
            .with_context(|| format!("loading problem definition {}", path.display()))?,
        None => OptimizationProblem::from_toml_str(DEFAULT_PROBLEM)
            .context("parsing bundled problem definition")?,
    };
    let tree = initial_parameter_tree().context("building initial parameter tree")?;
    problem
        .wire(&tree)
        .context("wiring problem definition against the parameter tree")?;
    report_problem(&problem, &tree);

    let mission = match &cli.mission {
        Some(path) => MissionDefinition::load(path)
            .with_context(|| format!("loading mission definition {}", path.display()))?,
        None => MissionDefinition::from_toml_str(DEFAULT_MISSION)
            .context("parsing bundled mission definition")?,
    };
    report_mission(&mission);

    report_sizing(&tree)?;

    let doc_input = DocInput {
        rotors: cli.rotors,
        coaxial: cli.coaxial,
        max_thrust: cli.thrust,
        arm_length: cli.arm,
        uav_mass: cli.mass,
        motor_mass: cli.motor_mass,
        propeller_mass: cli.propeller_mass,
        horizon: cli.horizon,
        steps: cli.steps,
    };
    report_controllability(&doc_input)?;

    Ok(())
}

/// Initial values for the leaves the bundled problem definition names,
/// plus the sizing-scenario inputs.
fn initial_parameter_tree() -> uav_mdo::Result<ParamTree> {
    let mut tree = ParamTree::new();

    // Design variables (solver inputs).
    tree.set_input("optimization:mission:k_M", 3.0, None)?;
    tree.set_input("optimization:settings:k_Mb", 0.5, None)?;
    tree.set_input("optimization:settings:D_ratio_arms", 0.9, None)?;
    tree.set_input("settings:propeller:k_ND", 0.9, None)?;

    // Specifications and environment.
    tree.set_input("specifications:load:mass", 2.0, Some("kg"))?;
    tree.set_input("specifications:climb_speed", 3.0, Some("m/s"))?;
    tree.set_input("specifications:k_maxthrust", 2.0, None)?;
    tree.set_input("data:mission:rho_air", 1.225, Some("kg/m**3"))?;
    tree.set_input("data:structure:aerodynamics:C_D", 1.0, None)?;
    tree.set_input("data:structure:geometry:top_surface", 0.1, Some("m**2"))?;
    tree.set_input("data:structure:geometry:arms:arm_number", 4.0, None)?;
    tree.set_input("data:propeller:prop_number_per_arm", 1.0, None)?;
    tree.set_input("data:propeller:aerodynamics:CT_static", 0.1125, None)?;
    tree.set_input("data:propeller:reference:nD_max", 105.0, Some("m/s"))?;

    // Computed outputs, initialized to zero.
    tree.set_output("optimization:objectives:mass_total", 0.0, Some("kg"))?;
    tree.set_output(
        "optimization:constraints:mass_objective:cons_mass_convergence",
        0.0,
        None,
    )?;
    tree.set_output(
        "optimization:constraints:mass_objective:cons_flight_autonomy",
        0.0,
        None,
    )?;

    Ok(tree)
}

fn report_problem(problem: &OptimizationProblem, tree: &ParamTree) {
    println!("--- Optimization Problem: {} ---", problem.name);
    println!("Design variables:");
    for dv in &problem.design_variables {
        let value = tree.scalar(&dv.name).unwrap_or(f64::NAN);
        println!(
            "  {:<42} = {:>8.3}  in [{}, {}]",
            dv.name, value, dv.lower, dv.upper
        );
    }
    println!("Constraints:");
    for c in &problem.constraints {
        let lo = c.lower.map_or("-inf".to_string(), |v| format!("{v}"));
        let hi = c.upper.map_or("+inf".to_string(), |v| format!("{v}"));
        println!("  {:<42} in [{lo}, {hi}]", c.name);
    }
    println!("Objectives:");
    for obj in &problem.objectives {
        println!("  {:<42} (scaler {})", obj.name, obj.scaler);
    }
    println!();
}

fn report_mission(mission: &MissionDefinition) {
    println!("--- Sizing Mission ---");
    for (name, route) in mission.sizing_routes() {
        println!(
            "  route {:<12} {} phases, {:.0} m cruise, {:.0} s timed",
            name,
            route.phases.len(),
            route.total_distance(),
            route.total_duration()
        );
    }
    println!();
}

fn report_sizing(tree: &ParamTree) -> anyhow::Result<()> {
    let scalar = |name: &str| {
        tree.scalar(name)
            .with_context(|| format!("parameter tree is missing `{name}`"))
    };
    let scenario = SizingScenario {
        payload_mass: scalar("specifications:load:mass")?,
        mass_factor: scalar("optimization:mission:k_M")?,
        props_per_arm: scalar("data:propeller:prop_number_per_arm")? as usize,
        arm_count: scalar("data:structure:geometry:arms:arm_number")? as usize,
        air_density: scalar("data:mission:rho_air")?,
        drag_coefficient: scalar("data:structure:aerodynamics:C_D")?,
        top_surface: scalar("data:structure:geometry:top_surface")?,
        climb_speed: scalar("specifications:climb_speed")?,
        max_thrust_factor: scalar("specifications:k_maxthrust")?,
    };
    let req = scenario.thrust_requirements()?;

    println!("--- Sizing Scenario ---");
    println!("  total mass estimate : {:>8.3} kg", req.total_mass_estimate);
    println!("  propellers          : {:>8}", req.prop_count);
    println!("  hover thrust/prop   : {:>8.3} N", req.hover);
    println!("  climb thrust/prop   : {:>8.3} N", req.climb);
    println!("  takeoff thrust/prop : {:>8.3} N", req.takeoff);

    let reference = ScalingReference::default();
    let diameter = scaling::propeller_diameter(
        req.takeoff,
        scalar("data:propeller:aerodynamics:CT_static")?,
        scalar("data:mission:rho_air")?,
        scalar("data:propeller:reference:nD_max")?,
        scalar("settings:propeller:k_ND")?,
    )?;
    let prop_mass = scaling::propeller_mass(diameter, &reference)?;
    let battery = scaling::battery_mass(
        scalar("specifications:load:mass")?,
        scalar("optimization:settings:k_Mb")?,
    )?;
    println!("  propeller diameter  : {:>8.3} m", diameter);
    println!("  propeller mass      : {:>8.4} kg", prop_mass);
    println!("  battery mass        : {:>8.3} kg", battery);
    println!();
    Ok(())
}

fn report_controllability(input: &DocInput) -> anyhow::Result<()> {
    println!("--- Degree of Controllability ---");
    println!(
        "  {} rotors, coaxial = {}, {:.1} N max thrust, {:.2} m arm",
        input.rotors, input.coaxial, input.max_thrust, input.arm_length
    );
    println!(
        "  horizon {:.2} s in {} steps",
        input.horizon, input.steps
    );

    let result = degree_of_controllability(input).context("controllability analysis failed")?;
    for (rotor, margin) in result.per_rotor.iter().enumerate() {
        println!("  rotor {:>2} failure margin : {:>10.5}", rotor + 1, margin);
    }
    println!(
        "  worst case: rotor {} -> DOC = {:.5}",
        result.worst_rotor() + 1,
        result.doc
    );
    println!();
    println!("===================================================");
    Ok(())
}

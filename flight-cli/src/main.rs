use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use flight_core::{BodyProperties, PresetLoader, Scenario, Termination, Vec3};

mod output;

#[derive(Parser, Debug)]
#[command(name = "flight")]
#[command(
    about = "Simulate the flight of a spinning ball with drag, wind and Magnus lift",
    long_about = None
)]
struct Cli {
    /// Directory holding `bodies/` and `scenarios/` YAML presets
    #[arg(long, global = true, default_value = "presets")]
    presets_dir: PathBuf,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a preset scenario by name or a scenario YAML file
    Run {
        /// Scenario name (file in presets or built in)
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        scenario: Option<String>,

        /// Path to a scenario YAML file
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Run a one-off scenario from command-line parameters
    Custom {
        #[command(flatten)]
        params: CustomArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List available bodies and scenarios
    List,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory the CSV report is written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

#[derive(Args, Debug)]
struct CustomArgs {
    /// Initial position x,y,z (m)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    position: Vec3,

    /// Initial velocity vx,vy,vz (m/s)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    velocity: Vec3,

    /// Spin wx,wy,wz (rad/s)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    spin: Vec3,

    /// Wind velocity x,y,z (m/s)
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    wind: Vec3,

    /// Start from a named body and override only what is given
    #[arg(long)]
    body: Option<String>,

    /// Diameter (m)
    #[arg(long)]
    diameter: Option<f64>,

    /// Mass (kg)
    #[arg(long)]
    mass: Option<f64>,

    /// Drag coefficient (dimensionless)
    #[arg(long)]
    drag_coefficient: Option<f64>,

    /// Air density (kg/m^3)
    #[arg(long)]
    air_density: Option<f64>,

    /// Spin factor S/M (m^2/s)
    #[arg(long)]
    spin_factor: Option<f64>,

    /// Time step (s)
    #[arg(long, default_value = "0.001")]
    time_step: f64,

    /// Maximum simulation time (s)
    #[arg(long, default_value = "10.0")]
    max_time: f64,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", s));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|e| format!("invalid component '{}': {}", part, e))?;
    }
    Ok(Vec3::new(values[0], values[1], values[2]))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn custom_scenario(loader: &PresetLoader, args: CustomArgs) -> Result<Scenario> {
    let base = match &args.body {
        Some(name) => loader
            .load_body(name)
            .with_context(|| format!("loading body '{}'", name))?,
        None => BodyProperties {
            name: "Custom".to_string(),
            ..BodyProperties::ideal()
        },
    };

    let body = BodyProperties {
        radius: args.diameter.map_or(base.radius, |d| d / 2.0),
        mass: args.mass.unwrap_or(base.mass),
        drag_coefficient: args.drag_coefficient.unwrap_or(base.drag_coefficient),
        air_density: args.air_density.unwrap_or(base.air_density),
        spin_factor: args.spin_factor.unwrap_or(base.spin_factor),
        ..base
    };

    Ok(Scenario {
        name: "Custom simulation".to_string(),
        body,
        position: args.position,
        velocity: args.velocity,
        spin: args.spin,
        wind: args.wind,
        time_step: args.time_step,
        max_time: args.max_time,
    })
}

fn run_and_report(scenario: &Scenario, output: &OutputArgs) -> Result<()> {
    info!("running '{}' with {}", scenario.name, scenario.body.name);

    let trajectory = scenario
        .run()
        .with_context(|| format!("invalid scenario '{}'", scenario.name))?;

    if let Some(last) = trajectory.last() {
        let outcome = match trajectory.termination() {
            Some(Termination::Grounded) => "landed",
            _ => "stopped in flight",
        };
        info!(
            "{} at t={:.4} s, range {:.4} m, max height {:.4} m ({} samples)",
            outcome,
            last.time,
            trajectory.range(),
            trajectory.max_height(),
            trajectory.len()
        );
    }

    if output.stdout {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        output::write_report(&mut lock, scenario, &trajectory)?;
        lock.flush()?;
    } else {
        let path = output::save_report(&output.output_dir, scenario, &trajectory)
            .with_context(|| format!("writing report to {}", output.output_dir.display()))?;
        println!("Trajectory data saved to: {}", path.display());
    }
    Ok(())
}

fn list(loader: &PresetLoader) -> Result<()> {
    let mut bodies = loader.list_bodies()?;
    bodies.extend(BodyProperties::BUILTIN.iter().map(|s| s.to_string()));
    bodies.sort();
    bodies.dedup();

    let mut scenarios = loader.list_scenarios()?;
    scenarios.extend(Scenario::BUILTIN.iter().map(|s| s.to_string()));
    scenarios.sort();
    scenarios.dedup();

    println!("Bodies:");
    for name in bodies {
        println!("  {}", name);
    }
    println!("Scenarios:");
    for name in scenarios {
        println!("  {}", name);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let loader = PresetLoader::new(&cli.presets_dir);

    match cli.command {
        Commands::Run {
            scenario,
            file,
            output,
        } => {
            let scenario = match (file, scenario) {
                (Some(path), _) => loader
                    .load_scenario_file(&path)
                    .with_context(|| format!("loading scenario file {}", path.display()))?,
                (None, Some(name)) => loader
                    .load_scenario(&name)
                    .with_context(|| format!("loading scenario '{}'", name))?,
                (None, None) => anyhow::bail!("no scenario given"),
            };
            run_and_report(&scenario, &output)
        }
        Commands::Custom { params, output } => {
            let scenario = custom_scenario(&loader, params)?;
            run_and_report(&scenario, &output)
        }
        Commands::List => list(&loader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3(" -1.5, 0 ,2e1").unwrap(), Vec3::new(-1.5, 0.0, 20.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_custom_overrides_named_body() {
        let cli = Cli::try_parse_from([
            "flight",
            "--presets-dir",
            "/nonexistent",
            "custom",
            "--position",
            "0,0,1",
            "--velocity",
            "10,0,10",
            "--body",
            "ping_pong",
            "--mass",
            "0.003",
        ])
        .unwrap();

        let Commands::Custom { params, .. } = cli.command else {
            panic!("expected custom command");
        };
        let scenario = custom_scenario(&PresetLoader::new("/nonexistent"), params).unwrap();

        assert_eq!(scenario.body.mass, 0.003);
        assert_eq!(scenario.body.radius, BodyProperties::ping_pong().radius);
        assert_eq!(scenario.position, Vec3::new(0.0, 0.0, 1.0));
        assert!(scenario.run().is_ok());
    }

    #[test]
    fn test_custom_rejects_bad_mass() {
        let cli = Cli::try_parse_from([
            "flight",
            "custom",
            "--position",
            "0,0,1",
            "--velocity",
            "1,0,1",
            "--mass=-1",
        ])
        .unwrap();

        let Commands::Custom { params, .. } = cli.command else {
            panic!("expected custom command");
        };
        let scenario = custom_scenario(&PresetLoader::new("/nonexistent"), params).unwrap();
        assert!(scenario.run().is_err());
    }
}

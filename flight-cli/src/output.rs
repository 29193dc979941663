//! CSV report of a run.
//!
//! Layout: `#`-prefixed metadata lines describing the scenario and the
//! outcome, then the header `Time,X,Y,Z` and one row per sample.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flight_core::{Scenario, Trajectory, Vec3};

pub const CSV_HEADER: &str = "Time,X,Y,Z";

fn fmt_vec(v: &Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

/// Write the metadata block describing the scenario and how the run ended.
pub fn write_info<W: Write>(
    out: &mut W,
    scenario: &Scenario,
    trajectory: &Trajectory,
) -> io::Result<()> {
    let body = &scenario.body;
    writeln!(out, "#Projectile Motion Simulation Data")?;
    writeln!(out, "#Scenario: {}", scenario.name)?;
    writeln!(out, "#Body: {}", body.name)?;
    writeln!(out, "#Initial Position (m): {}", fmt_vec(&scenario.position))?;
    writeln!(out, "#Initial Velocity (m/s): {}", fmt_vec(&scenario.velocity))?;
    writeln!(out, "#Initial Spin (rad/s): {}", fmt_vec(&scenario.spin))?;
    writeln!(out, "#Wind (m/s): {}", fmt_vec(&scenario.wind))?;
    writeln!(out, "#Diameter (m): {}", body.diameter())?;
    writeln!(out, "#Mass (kg): {}", body.mass)?;
    writeln!(out, "#Drag Coefficient: {}", body.drag_coefficient)?;
    writeln!(out, "#Air Density (kg/m^3): {}", body.air_density)?;
    writeln!(out, "#Spin Factor S/M (m^2/s): {}", body.spin_factor)?;
    writeln!(out, "#Time Step (s): {}", scenario.time_step)?;

    if let Some(termination) = trajectory.termination() {
        writeln!(out, "#Termination: {:?}", termination)?;
    }
    if let Some(last) = trajectory.last() {
        writeln!(out, "#Final Time (s): {}", last.time)?;
        writeln!(out, "#Final Position (m): {}", fmt_vec(&last.pos))?;
    }
    Ok(())
}

/// Write the full report: metadata, header, one row per sample.
pub fn write_report<W: Write>(
    out: &mut W,
    scenario: &Scenario,
    trajectory: &Trajectory,
) -> io::Result<()> {
    write_info(out, scenario, trajectory)?;
    writeln!(out, "{}", CSV_HEADER)?;
    for s in trajectory.samples() {
        writeln!(out, "{},{},{},{}", s.time, s.pos.x, s.pos.y, s.pos.z)?;
    }
    Ok(())
}

fn numbered_path(dir: &Path, n: u64) -> PathBuf {
    dir.join(format!("trajectory{}.csv", n))
}

/// Create the first `trajectory<N>.csv` in `dir` (N from 1) that does not exist yet.
///
/// The file is claimed with `create_new`, so concurrent runs never share a number.
fn create_numbered_file(dir: &Path) -> io::Result<(PathBuf, File)> {
    let mut n = 1u64;
    loop {
        let path = numbered_path(dir, n);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Write the report into `dir` without overwriting earlier runs.
pub fn save_report(
    dir: &Path,
    scenario: &Scenario,
    trajectory: &Trajectory,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let (path, file) = create_numbered_file(dir)?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, scenario, trajectory)?;
    out.flush()?;
    Ok(path)
}

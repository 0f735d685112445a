mod jobfile;
mod model;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tcam_core::ToolLibrary;
use tcam_pipeline::{ProgressEvent, ProgressReporter};
use tcam_post::{has_errors, validate_toolpaths, write_to_file, MachineProfile, PostConfig};

#[derive(Parser)]
#[command(
    name = "tcam",
    version,
    about = "Slice a mesh against a stock and machine a PathPilot G-code program from a TOML job file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job's operations and write a PathPilot G-code program.
    Generate {
        /// Path to the job TOML file.
        job_file: PathBuf,

        /// Machine profile: a built-in name (pcnc-440, pcnc-770, pcnc-1100)
        /// or a path to a profile TOML file.
        #[arg(short, long, default_value = "pcnc-1100")]
        machine: String,

        /// Output G-code path.
        #[arg(short, long, default_value = "out.nc")]
        output: PathBuf,

        /// Write G-code even if validation reports errors.
        #[arg(long)]
        force: bool,

        /// Emit a coolant-on word (M8) in the preamble.
        #[arg(long)]
        coolant: bool,

        /// Suppress per-operation progress lines.
        #[arg(long)]
        quiet: bool,
    },
    /// Compute a job's toolpaths and report validation issues without
    /// writing any G-code.
    Validate {
        job_file: PathBuf,

        #[arg(short, long, default_value = "pcnc-1100")]
        machine: String,
    },
    /// Print a machine profile's envelope, built-in or loaded from a file.
    Machine {
        /// A built-in name (pcnc-440, pcnc-770, pcnc-1100) or a path to a
        /// profile TOML file.
        name: String,
    },
    /// List the tools in a tool-library TOML file.
    Tools {
        /// Path to a tool-library TOML file (a job file's `[[tool]]`
        /// entries parse the same way).
        library_file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate {
            job_file,
            machine,
            output,
            force,
            coolant,
            quiet,
        } => run_generate(job_file, machine, output, *force, *coolant, *quiet),
        Commands::Validate { job_file, machine } => run_validate(job_file, machine),
        Commands::Machine { name } => run_machine(name),
        Commands::Tools { library_file } => run_tools(library_file),
    }
}

/// Prints each progress event as it arrives, the only consumer of
/// [`ProgressEvent`] in this workspace.
struct PrintReporter {
    quiet: bool,
}

impl ProgressReporter for PrintReporter {
    fn report(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }
        match event {
            ProgressEvent::OperationStarted { name } => println!("-- {name}"),
            ProgressEvent::ZLevelsComputed { name, count } => {
                println!("   {name}: {count} Z level(s)")
            }
            ProgressEvent::ToolpathComplete {
                name,
                segment_count,
            } => println!("   {name}: {segment_count} segment(s)"),
            ProgressEvent::JobComplete { toolpath_count } => {
                println!("done: {toolpath_count} toolpath(s)")
            }
        }
    }
}

fn load_machine(name: &str) -> Result<MachineProfile, Box<dyn std::error::Error>> {
    match name {
        "pcnc-440" | "pcnc440" => Ok(MachineProfile::pcnc_440()),
        "pcnc-770" | "pcnc770" => Ok(MachineProfile::pcnc_770()),
        "pcnc-1100" | "pcnc1100" => Ok(MachineProfile::pcnc_1100()),
        path => {
            let text = fs::read_to_string(path)?;
            Ok(MachineProfile::from_toml(&text)?)
        }
    }
}

fn run_generate(
    job_file: &PathBuf,
    machine: &str,
    output: &PathBuf,
    force: bool,
    coolant: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = jobfile::load(job_file)?;
    println!("Job: {} ({:?})", loaded.job.name, loaded.job.units);

    let reporter = PrintReporter { quiet };
    let toolpaths = loaded.job.compute_toolpaths_with_reporter(&reporter)?;

    let profile = load_machine(machine)?;
    println!("Machine: {}", profile.model);

    let (tool_number, spindle_rpm, safe_z, rapid_z) = loaded
        .job
        .operations
        .last()
        .map(|op| (op.tool.number, op.spindle_rpm, op.safe_z, op.rapid_z))
        .ok_or("job has no operations")?;
    let tool_name = loaded
        .tools
        .get(tool_number)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("T{tool_number}"));

    let issues = validate_toolpaths(&toolpaths, &profile.envelope, spindle_rpm);
    for issue in &issues {
        let tag = if issue.is_error() { "ERROR" } else { "WARNING" };
        println!("  {tag}: {}", issue.message);
    }

    if has_errors(&issues) && !force {
        eprintln!("Validation failed — aborting (pass --force to write anyway).");
        std::process::exit(1);
    }

    let config = PostConfig {
        units: loaded.job.units,
        tool_number,
        spindle_rpm,
        safe_z,
        rapid_z,
        coolant_on: coolant,
    };

    write_to_file(&toolpaths, &config, &tool_name, output)?;
    println!(
        "G-code written to: {} ({} toolpath(s))",
        output.display(),
        toolpaths.len()
    );
    Ok(())
}

fn run_validate(job_file: &PathBuf, machine: &str) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = jobfile::load(job_file)?;
    let toolpaths = loaded.job.compute_toolpaths()?;
    let profile = load_machine(machine)?;

    let spindle_rpm = loaded
        .job
        .operations
        .last()
        .map(|op| op.spindle_rpm)
        .unwrap_or(0);
    let issues = validate_toolpaths(&toolpaths, &profile.envelope, spindle_rpm);

    if issues.is_empty() {
        println!("No issues found against {}.", profile.model);
        return Ok(());
    }

    for issue in &issues {
        let tag = if issue.is_error() { "ERROR" } else { "WARNING" };
        println!("{tag}: {}", issue.message);
    }

    if has_errors(&issues) {
        std::process::exit(1);
    }
    Ok(())
}

fn run_machine(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let profile = load_machine(name)?;
    print!("{}", profile.to_toml()?);
    Ok(())
}

fn run_tools(library_file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(library_file)?;
    let library = ToolLibrary::from_toml(&text)?;
    for tool in library.list_tools() {
        println!(
            "T{} {} ({:?}, dia {:.4})",
            tool.number, tool.name, tool.kind, tool.diameter
        );
    }
    Ok(())
}

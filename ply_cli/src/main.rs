//! # Ply CLI Application
//!
//! Command-line front end for `ply_core`: reads constituent tables, builds a
//! Halpin-Tsai estimator and prints the effective ply properties as a table
//! or as JSON.
//!
//! ```text
//! ply_cli [--fibers FILE] [--matrices FILE] [--library FILE]
//!         [--fiber NAME] [--matrix NAME]
//!         [--at VF | --range MIN MAX] [--json]
//!         [--save-library FILE] [--user NAME]
//! ```
//!
//! Tables are comma-separated with a header row: 3 columns
//! `name,E,v` for isotropic materials, 6 columns `name,E1,E2,G12,G23,v12`
//! for transversely isotropic ones. Without inputs the Carbon/Epoxy demo runs.
//! `--save-library` holds the target's edit lock for the whole run; a library
//! that is only read is opened even while someone else holds its lock.
//! Set `RUST_LOG=debug` for diagnostics on stderr.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ply_core::composite::{CompositeReport, SweepRow};
use ply_core::file_io::load_library_with_lock_check;
use ply_core::{
    load_library, save_library, Constituent, EffectiveProperty, FileLock, FractionQuery,
    HalpinTsai, IsotropicMaterial, MaterialLibrary, PlyError, PlyResult,
    TransverselyIsotropicMaterial,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: ply_cli [--fibers FILE] [--matrices FILE] [--library FILE]
               [--fiber NAME] [--matrix NAME]
               [--at VF | --range MIN MAX] [--json]
               [--save-library FILE] [--user NAME]";

#[derive(Debug, Default)]
struct Args {
    fibers: Option<PathBuf>,
    matrices: Option<PathBuf>,
    library: Option<PathBuf>,
    save_library: Option<PathBuf>,
    fiber: Option<String>,
    matrix: Option<String>,
    query: Option<FractionQuery>,
    json: bool,
    user: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let result = parse_args(&raw).and_then(|args| run(&args));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            if e.is_recoverable() {
                eprintln!();
                eprintln!("Retry once the other session has finished.");
            }
            if matches!(&e, PlyError::InvalidArgument { field, .. } if field == "args") {
                eprintln!();
                eprintln!("{}", USAGE);
            }
            ExitCode::FAILURE
        }
    }
}

fn parse_args(raw: &[String]) -> PlyResult<Args> {
    let mut args = Args::default();
    let mut iter = raw.iter();

    while let Some(flag) = iter.next() {
        let mut value = |name: &str| -> PlyResult<String> {
            iter.next()
                .cloned()
                .ok_or_else(|| usage_error(format!("{} needs a value", name)))
        };
        match flag.as_str() {
            "--fibers" => args.fibers = Some(PathBuf::from(value("--fibers")?)),
            "--matrices" => args.matrices = Some(PathBuf::from(value("--matrices")?)),
            "--library" => args.library = Some(PathBuf::from(value("--library")?)),
            "--save-library" => args.save_library = Some(PathBuf::from(value("--save-library")?)),
            "--fiber" => args.fiber = Some(value("--fiber")?),
            "--matrix" => args.matrix = Some(value("--matrix")?),
            "--user" => args.user = Some(value("--user")?),
            "--json" => args.json = true,
            "--at" => {
                let vf = parse_fraction(&value("--at")?)?;
                args.query = Some(FractionQuery::At(vf));
            }
            "--range" => {
                let min = parse_fraction(&value("--range")?)?;
                let max = parse_fraction(&value("--range")?)?;
                args.query = Some(FractionQuery::Range(min, max));
            }
            other => return Err(usage_error(format!("unknown argument '{}'", other))),
        }
    }

    Ok(args)
}

fn usage_error(reason: String) -> PlyError {
    PlyError::invalid_argument("args", "", reason)
}

fn parse_fraction(s: &str) -> PlyResult<f64> {
    s.trim()
        .parse()
        .map_err(|_| PlyError::invalid_argument("fraction", s, "Not a number"))
}

fn run(args: &Args) -> PlyResult<()> {
    let lock = lock_save_target(args)?;
    let mut library = match &args.library {
        Some(path) if lock.as_ref().is_some_and(|l| l.library_path() == path.as_path()) => {
            load_library(path)?
        }
        Some(path) => open_for_reading(path)?,
        None => MaterialLibrary::new(session_user(args), "Command-line session"),
    };

    let fibers = load_table(args.fibers.as_deref(), &mut library)?;
    let matrices = load_table(args.matrices.as_deref(), &mut library)?;

    if library.material_count() == 0 {
        add_demo_materials(&mut library)?;
    }

    let fiber = pick(&args.fiber, &library.settings.default_fiber, &fibers, "Carbon");
    let matrix = pick(&args.matrix, &library.settings.default_matrix, &matrices, "Epoxy");
    debug!(%fiber, %matrix, "selected constituents");

    let ply = library.estimator_for(&fiber, &matrix)?;

    if let Some(path) = &args.save_library {
        if library.composite(&fiber, &matrix).is_none() {
            library.add_composite(&fiber, &matrix)?;
        }
        save_library(&library, path)?;
    }
    drop(lock);

    let rows = match args.query {
        Some(query) => ply.sweep(query)?,
        None => report_rows(&ply, &library.settings.report_fractions)?,
    };

    if args.json {
        let report = CompositeReport {
            name: ply.name().to_string(),
            fiber: Constituent::clone(ply.fiber()),
            matrix: Constituent::clone(ply.matrix()),
            rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&ply, &rows);
    }

    Ok(())
}

/// Take the edit lock on the `--save-library` target before anything is read.
fn lock_save_target(args: &Args) -> PlyResult<Option<FileLock>> {
    args.save_library
        .as_deref()
        .map(|path| FileLock::acquire(path, session_user(args)))
        .transpose()
}

fn open_for_reading(path: &Path) -> PlyResult<MaterialLibrary> {
    let (library, holder) = load_library_with_lock_check(path)?;
    if let Some(holder) = holder {
        warn!(path = %path.display(), user = %holder.user, "library is being edited elsewhere");
        eprintln!(
            "Note: {} is being edited by {} since {}",
            path.display(),
            holder.user,
            holder.locked_at.to_rfc3339()
        );
    }
    Ok(library)
}

fn session_user(args: &Args) -> String {
    args.user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .unwrap_or_else(|| "ply_cli".to_string())
}

/// Read a CSV table into the library, returning the names it added.
fn load_table(path: Option<&Path>, library: &mut MaterialLibrary) -> PlyResult<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let contents = fs::read_to_string(path)
        .map_err(|e| PlyError::file_error("read", path.display().to_string(), e.to_string()))?;

    let materials = Constituent::read_from_table(&split_csv(&contents))?;
    let mut names = Vec::with_capacity(materials.len());
    for material in materials {
        names.push(material.name().to_string());
        library.add_material(material)?;
    }
    debug!(path = %path.display(), count = names.len(), "read constituent table");
    Ok(names)
}

fn split_csv(contents: &str) -> Vec<Vec<String>> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

fn add_demo_materials(library: &mut MaterialLibrary) -> PlyResult<()> {
    println!("No constituents given; running the Carbon/Epoxy demo.");
    println!();
    library.add_material(
        TransverselyIsotropicMaterial::parse("Carbon", "250", "25", "20", "10", "0.28")?.into(),
    )?;
    library.add_material(IsotropicMaterial::parse("Epoxy", "2.8", "0.3")?.into())?;
    Ok(())
}

fn pick(explicit: &Option<String>, configured: &Option<String>, read: &[String], fallback: &str) -> String {
    explicit
        .clone()
        .or_else(|| configured.clone())
        .or_else(|| read.first().cloned())
        .unwrap_or_else(|| fallback.to_string())
}

fn report_rows(ply: &HalpinTsai, fractions: &[f64]) -> PlyResult<Vec<SweepRow>> {
    let mut rows = Vec::with_capacity(fractions.len());
    for &vf in fractions {
        rows.extend(ply.sweep(FractionQuery::At(vf))?);
    }
    Ok(rows)
}

fn print_report(ply: &HalpinTsai, rows: &[SweepRow]) {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  {}", ply);
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!("Fiber:  {}", ply.fiber());
    println!("Matrix: {}", ply.matrix());
    println!();

    print!("{:>6}", "Vf");
    for property in EffectiveProperty::ALL {
        print!("  {:>10}", property.symbol());
    }
    println!();

    for row in rows {
        print!("{:>6.2}", row.fiber_volume_fraction);
        for property in EffectiveProperty::ALL {
            print!("  {:>10}", row.get(property).to_string());
        }
        println!();
    }
}

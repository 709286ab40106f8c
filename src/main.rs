//! Valleygen CLI - Synthetic river valley generator.
//!
//! Synthesize meandering river valley geometry from a parameter file and
//! export the boundary point cloud, index table, and summary report.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use valleygen::boundary::{assemble_boundary, BoundaryIndexTable};
use valleygen::config::parse_config_file;
use valleygen::export::{
    ensure_fresh, write_index_table, write_planview, write_point_cloud, write_report,
    PlanViewOptions,
};
use valleygen::pipeline::Pipeline;
use valleygen::valley::Valley;

/// Synthetic river valley generator.
#[derive(Parser)]
#[command(name = "valleygen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a valley and write the output files.
    Generate {
        /// Path to the configuration file.
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "valley")]
        name: String,

        /// Replace existing output files.
        #[arg(long)]
        overwrite: bool,

        /// Also export a grayscale plan-view diagnostic map.
        #[arg(long)]
        planview: bool,
    },

    /// Display derived quantities for a configuration without running.
    Info {
        /// Path to the configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            output,
            name,
            overwrite,
            planview,
        } => run_generate(&config, &output, &name, overwrite, planview),
        Commands::Info { config } => run_info(&config),
    }
}

fn run_generate(config: &Path, output: &Path, name: &str, overwrite: bool, planview: bool) {
    let (params, curves) = parse_config_file(config).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", config.display(), e);
        std::process::exit(1);
    });

    let points_path = output.join(format!("{}_points.csv", name));
    let index_path = output.join(format!("{}_boundary_index.csv", name));
    let report_path = output.join(format!("{}_report.txt", name));
    let planview_path = output.join(format!("{}_planview.png", name));

    // Collision check runs before any computation so a long run never
    // dies at write time.
    let mut outputs: Vec<&Path> = vec![&points_path, &index_path, &report_path];
    if planview {
        outputs.push(&planview_path);
    }
    ensure_fresh(&outputs, overwrite).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Valleygen - Synthetic River Valley Generator");
    println!("============================================");
    println!("Config:   {}", config.display());
    println!("Output:   {}", output.display());
    println!("Stations: {}  section points: {}", params.n_stations, params.n_xs_points);

    let start = Instant::now();

    let mut valley = Valley::new(params, curves);
    Pipeline::standard()
        .run_with_callbacks(
            &mut valley,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during synthesis: {}", e);
            std::process::exit(1);
        });

    let gen_time = start.elapsed();
    println!("Synthesis completed in {:.2?}", gen_time);

    let sections = valley.sections.as_ref().expect("pipeline ran");
    let floodplain = valley.floodplain.as_ref().expect("pipeline ran");
    let stats = valley.stats.as_ref().expect("pipeline ran");

    let cloud = assemble_boundary(sections, floodplain);
    let table = BoundaryIndexTable::new(valley.n_stations(), valley.n_xs_points());

    println!("\nWriting outputs...");
    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    write_point_cloud(&cloud, &points_path).unwrap_or_else(|e| {
        eprintln!("Error writing point cloud: {}", e);
        std::process::exit(1);
    });
    println!("  Point cloud:  {} ({} rows)", points_path.display(), cloud.len());

    write_index_table(&table, &index_path).unwrap_or_else(|e| {
        eprintln!("Error writing index table: {}", e);
        std::process::exit(1);
    });
    println!("  Index table:  {}", index_path.display());

    write_report(stats, &report_path).unwrap_or_else(|e| {
        eprintln!("Error writing report: {}", e);
        std::process::exit(1);
    });
    println!("  Report:       {}", report_path.display());

    if planview {
        write_planview(&cloud, &planview_path, &PlanViewOptions::default()).unwrap_or_else(|e| {
            eprintln!("Error writing plan view: {}", e);
            std::process::exit(1);
        });
        println!("  Plan view:    {}", planview_path.display());
    }

    println!("\nSinuosity:     {:.4}", stats.sinuosity);
    println!("Channel slope: {:.6}", stats.channel_slope);
    println!("Total time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_info(config: &Path) {
    let (params, _) = parse_config_file(config).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", config.display(), e);
        std::process::exit(1);
    });

    let n = params.n_stations;
    let m = params.n_xs_points;
    let total_points = params.point_count();
    // Header row plus one CSV row per point, ~40 bytes each.
    let bytes_csv = (total_points as u64 + 1) * 40;

    println!("Valleygen - Configuration Info");
    println!("==============================");
    println!();
    println!("Stations:             {}", n);
    println!("Section points:       {}", m);
    println!("Station spacing:      {:.4}", params.station_spacing());
    println!("Bankfull depth:       {:.4}", params.depth());
    println!("Shape:                {:?}", params.shape);
    println!();
    println!("Point counts:");
    println!("  Cross-sections: {:>10}", n * m);
    println!("  Floodplain:     {:>10}", n * 6);
    println!("  Total:          {:>10}", total_points);
    println!();
    println!(
        "Estimated point-cloud file size: {} bytes ({:.2} MB)",
        bytes_csv,
        bytes_csv as f64 / 1024.0 / 1024.0
    );
}

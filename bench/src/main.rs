//! concatfs read-path load tool

use clap::Parser;
use concatfs::{FileTable, FileTableBuilder, VirtualFileReader};
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

mod metrics;
mod scenarios;

use metrics::ReadMetrics;
use scenarios::Scenario;

#[derive(Parser, Debug, Clone)]
#[command(name = "concatfs-bench")]
#[command(about = "concatfs virtual file read benchmark tool")]
struct Args {
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    #[arg(short = 'd', long, default_value = "10")]
    duration: u64,

    #[arg(short = 's', long, default_value = "random")]
    scenario: String,

    #[arg(long, default_value = "16")]
    members: usize,

    /// Size of each member file in KiB
    #[arg(long, default_value = "1024")]
    member_kb: usize,

    #[arg(short = 'r', long, default_value = "4096")]
    read_size: usize,

    /// Directory for the generated member files
    #[arg(long)]
    dir: Option<PathBuf>,

    #[arg(long, default_value = "0")]
    seed: u64,
}

fn prepare_members(dir: &Path, args: &Args) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let mut paths = Vec::with_capacity(args.members);

    for i in 0..args.members {
        let data: Vec<u8> = (0..args.member_kb * 1024).map(|_| rng.r#gen()).collect();
        let path = dir.join(format!("member.{:05}", i));
        std::fs::write(&path, data)?;
        paths.push(path);
    }
    Ok(paths)
}

fn run_thread(
    thread_id: usize,
    scenario: Arc<dyn Scenario>,
    table: Arc<FileTable>,
    stop_flag: Arc<AtomicBool>,
    metrics: Arc<ReadMetrics>,
    seed: u64,
) {
    let seed = seed.wrapping_add(thread_id as u64 * 0x9e3779b97f4a7c15);
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let reader = VirtualFileReader::new(&table);
    let mut cursor = 0;

    while !stop_flag.load(Ordering::Relaxed) {
        let (offset, length) = scenario.next_read(&table, &mut rng, &mut cursor);
        let start = Instant::now();
        match reader.read(offset, length) {
            Ok(data) => metrics.record_read(length, data.len(), start.elapsed()),
            Err(_) => metrics.record_error(),
        }
    }
}

fn main() {
    let args = Args::parse();

    println!("concatfs Benchmark Tool");
    println!("=======================");
    println!("Scenario: {}", args.scenario);
    println!("Threads: {}", args.threads);
    println!("Duration: {}s", args.duration);
    println!("Members: {} x {} KiB", args.members, args.member_kb);
    println!("Read size: {}", args.read_size);
    println!();

    let scenario: Arc<dyn Scenario> = match args.scenario.as_str() {
        "sequential" => Arc::new(scenarios::Sequential::new(args.read_size)),
        "random" => Arc::new(scenarios::Random::new(args.read_size)),
        "boundary" => Arc::new(scenarios::Boundary::new(args.read_size)),
        _ => {
            eprintln!("Unknown scenario: {}", args.scenario);
            std::process::exit(1);
        }
    };

    if args.members == 0 || args.member_kb == 0 {
        eprintln!("members and member-kb must be non-zero");
        std::process::exit(1);
    }

    println!("Initializing...");
    let dir = args.dir.clone().unwrap_or_else(|| {
        std::env::temp_dir().join(format!("concatfs-bench-{}", std::process::id()))
    });
    let paths = prepare_members(&dir, &args).expect("Failed to write member files");

    let mut builder = FileTableBuilder::new();
    builder.from_args(&paths);
    let table = Arc::new(builder.build().expect("Failed to build member table"));
    println!("Initialization complete: {} bytes.", table.total_size());

    let stop_flag = Arc::new(AtomicBool::new(false));
    let metrics = Arc::new(ReadMetrics::new());

    println!("Running benchmark ({})...", scenario.name());
    let start_time = Instant::now();

    let handles: Vec<_> = (0..args.threads)
        .map(|i| {
            let scenario = Arc::clone(&scenario);
            let table = Arc::clone(&table);
            let stop = Arc::clone(&stop_flag);
            let metrics = Arc::clone(&metrics);
            let seed = args.seed;
            std::thread::spawn(move || run_thread(i, scenario, table, stop, metrics, seed))
        })
        .collect();

    std::thread::sleep(Duration::from_secs(args.duration));
    stop_flag.store(true, Ordering::Relaxed);

    for handle in handles {
        let _ = handle.join();
    }

    let report = metrics.report(start_time.elapsed());
    println!();
    println!("{}", report);

    if args.dir.is_none() {
        drop(table);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

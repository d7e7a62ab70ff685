use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::fs;

// Reference the main crate
extern crate concatfs;

use concatfs::reader::VirtualFileReader;
use concatfs::table::{FileTable, FileTableBuilder};

// Test configuration
const MEMBER_SIZE: usize = 256 * 1024;
const READ_SIZE: usize = 128 * 1024;

// Build a table over `members` temp files of MEMBER_SIZE random bytes each
fn build_table(dir: &tempfile::TempDir, members: usize) -> FileTable {
    let mut rng = rand::thread_rng();
    let mut paths = Vec::with_capacity(members);

    for i in 0..members {
        let data: Vec<u8> = (0..MEMBER_SIZE).map(|_| rng.r#gen()).collect();
        let path = dir.path().join(format!("part.{:04}", i));
        fs::write(&path, data).unwrap();
        paths.push(path);
    }

    let mut builder = FileTableBuilder::new();
    builder.from_args(paths);
    builder.build().unwrap()
}

// Benchmark sequential reads walking the whole virtual file
pub fn bench_sequential_read(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    let table = build_table(&dir, 16);
    let reader = VirtualFileReader::new(&table);

    let mut group = c.benchmark_group("SequentialRead");
    group.throughput(Throughput::Bytes(table.total_size()));

    group.bench_function("whole_file", |b: &mut criterion::Bencher| {
        b.iter(|| {
            let mut offset = 0;
            while offset < table.total_size() {
                let data = reader.read(black_box(offset), READ_SIZE).unwrap();
                offset += data.len() as u64;
            }
        })
    });

    group.finish();
}

// Benchmark random reads for growing member counts (locate cost)
pub fn bench_random_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("RandomRead");
    group.throughput(Throughput::Bytes(4096));

    for members in [1usize, 16, 256] {
        let dir = tempfile::TempDir::new().unwrap();
        let table = build_table(&dir, members);
        let reader = VirtualFileReader::new(&table);
        let mut rng = rand::thread_rng();

        group.bench_with_input(BenchmarkId::from_parameter(members), &members, |b, _| {
            b.iter(|| {
                let offset = rng.gen_range(0..table.total_size());
                reader.read(black_box(offset), 4096).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequential_read, bench_random_read);
criterion_main!(benches);

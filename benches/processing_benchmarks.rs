//! Performance benchmarks for the payroll sheets engine.
//!
//! Payroll exports hold hundreds to low thousands of rows; this suite checks
//! that normalization of such tables stays well below interactive latency:
//! - Number coercion of European text
//! - Normalizing a 500-row export
//! - Scaling from 100 to 5000 rows
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_sheets::config::EngineConfig;
use payroll_sheets::models::{Cell, PeriodInfo, RawTable};
use payroll_sheets::processing::{group_by_operator, normalize, to_currency_string, to_number};

/// Creates a synthetic export with the standard 16 columns plus `Consegna`.
fn create_table(rows: usize) -> RawTable {
    let mut headers: Vec<String> = (0..16).map(|i| format!("Col{}", i)).collect();
    headers[2] = "Codice".to_string();
    headers.push("Consegna".to_string());

    let rows = (0..rows)
        .map(|i| {
            let mut row = vec![Cell::Empty; 17];
            row[0] = Cell::from(i as i64);
            row[1] = Cell::from(format!("Operatore {}", i % 25));
            row[2] = Cell::from(format!("C{:05}", i));
            row[3] = Cell::from(format!("Azienda {}", i));
            row[11] = Cell::from(format!("{}.{:03},50", 1 + i % 9, i % 1000));
            row[12] = Cell::from((i % 7) as i64);
            row[13] = Cell::from("€ 12,30");
            row[15] = Cell::from("4,5");
            row[16] = if i % 10 == 0 {
                Cell::Empty
            } else {
                Cell::from(format!("{:02}/06/2024", 1 + i % 28))
            };
            row
        })
        .collect();

    RawTable::new(headers, rows)
}

fn june_2024(config: &EngineConfig) -> PeriodInfo {
    PeriodInfo::for_month(2024, 6, config.locale()).expect("Failed to build period")
}

/// Benchmark: Number coercion and currency rendering.
fn bench_number_format(c: &mut Criterion) {
    let inputs = [
        Cell::from("1.234,56"),
        Cell::from("€ 9.876.543,21"),
        Cell::from("1234.5"),
        Cell::from("n/d"),
        Cell::from(42),
    ];

    c.bench_function("to_number", |b| {
        b.iter(|| {
            for cell in &inputs {
                black_box(to_number(black_box(cell)));
            }
        })
    });

    c.bench_function("to_currency_string", |b| {
        b.iter(|| {
            for cell in &inputs {
                black_box(to_currency_string(black_box(cell)));
            }
        })
    });
}

/// Benchmark: Normalizing a typical 500-row export and grouping it.
fn bench_normalize_500(c: &mut Criterion) {
    let config = EngineConfig::default();
    let period = june_2024(&config);
    let table = create_table(500);

    c.bench_function("normalize_500_rows", |b| {
        b.iter(|| {
            let payroll = normalize(black_box(&table), &period, &config).unwrap();
            black_box(group_by_operator(&payroll.records, config.currency()))
        })
    });
}

/// Benchmark: Various table sizes to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let config = EngineConfig::default();
    let period = june_2024(&config);

    let mut group = c.benchmark_group("scaling");

    for rows in [100, 500, 1000, 5000].iter() {
        let table = create_table(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(normalize(table, &period, &config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_number_format, bench_normalize_500, bench_scaling);
criterion_main!(benches);

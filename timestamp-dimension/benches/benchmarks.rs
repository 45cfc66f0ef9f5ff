use chrono::{DateTime, NaiveDateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use timestamp_dimension::country::{Country, CountryProfile};
use timestamp_dimension::flags::{
    is_daylight_saving, is_holiday, is_weekend, is_working_hours, WorkingHours,
};
use timestamp_dimension::{BuiltinHolidays, Config, DateRange, DimensionTable, TimestampRow};

fn instant() -> DateTime<Utc> {
    NaiveDateTime::parse_from_str("2024-10-27 01:00", "%Y-%m-%d %H:%M")
        .unwrap()
        .and_utc()
}

fn bench_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("flags");
    let tz = chrono_tz::Europe::Paris;
    let holidays = BuiltinHolidays::new();

    group.bench_function("working_hours", |b| {
        b.iter(|| is_working_hours(black_box(instant()), tz, WorkingHours::default()))
    });

    group.bench_function("weekend", |b| {
        b.iter(|| is_weekend(black_box(instant()), tz))
    });

    group.bench_function("daylight_saving", |b| {
        b.iter(|| is_daylight_saving(black_box(instant()), tz))
    });

    group.bench_function("holiday", |b| {
        b.iter(|| is_holiday(black_box(instant()), tz, Country::FR, &holidays).unwrap())
    });
}

fn bench_row(c: &mut Criterion) {
    let profile = CountryProfile::new(Country::FR, "France", chrono_tz::Europe::Paris);
    let holidays = BuiltinHolidays::new();

    c.bench_function("derive_row", |b| {
        b.iter(|| {
            TimestampRow::derive(
                black_box(instant()),
                &profile,
                WorkingHours::default(),
                &holidays,
            )
            .unwrap()
        })
    });
}

fn bench_table(c: &mut Criterion) {
    let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
    let config = Config::default().with_range(range).with_progress_every(0);
    let mut group = c.benchmark_group("table");
    group.sample_size(20);

    group.bench_function("build_one_month", |b| {
        b.iter(|| DimensionTable::build(black_box(&config), &BuiltinHolidays::new()).unwrap())
    });

    let table = DimensionTable::build(&config, &BuiltinHolidays::new()).unwrap();

    group.bench_function("write_one_month", |b| {
        b.iter(|| {
            let mut buffer = Vec::new();
            black_box(&table).write_csv(&mut buffer).unwrap();
            buffer
        })
    });
}

criterion_group!(benches, bench_flags, bench_row, bench_table);
criterion_main!(benches);

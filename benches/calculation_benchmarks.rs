//! Performance benchmarks for the payroll engine.
//!
//! Measures a single payroll calculation, the effect of a long deal history
//! on the incentive step, and batches of employees.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::calculation::{PayrollEngine, PayrollInput, PayrollOverrides};
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{
    AttendanceRecord, AttendanceStatus, Deal, DealType, Employee, EmployeeCategory, PayMonth,
};

fn create_engine() -> PayrollEngine {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    PayrollEngine::new(config.policy().clone())
}

fn create_employee(id: usize) -> Employee {
    Employee {
        id: format!("emp_{:04}", id),
        category: EmployeeCategory::Skilled,
        position: if id % 5 == 0 { "Manager" } else { "Sales Executive" }.to_string(),
        monthly_ctc: Decimal::from(20_000 + (id as i64 % 40) * 1_000),
    }
}

/// A month of attendance with a weekly off every seventh day and a few late marks.
fn create_attendance() -> Vec<AttendanceRecord> {
    (1..=31)
        .map(|d| AttendanceRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date"),
            check_in_time: None,
            check_out_time: None,
            status: if d % 7 == 0 {
                AttendanceStatus::WeeklyOff
            } else {
                AttendanceStatus::Present
            },
            late_arrival: d % 9 == 0,
        })
        .collect()
}

/// A deal history ending in March 2025, one deal every three days.
fn create_deals(employee_id: &str, count: usize) -> Vec<Deal> {
    let last = NaiveDate::from_ymd_opt(2025, 3, 28).expect("valid date");
    (0..count)
        .map(|i| Deal {
            id: format!("deal_{:05}", i),
            employee_id: employee_id.to_string(),
            date: last - Duration::days(3 * (count - 1 - i) as i64),
            deal_value: Decimal::from(4_000 + (i as i64 % 5) * 1_000),
            cv_count: Decimal::from(1_000_000),
            deal_type: if i % 4 == 0 { DealType::Npl } else { DealType::Normal },
            is_supportive: i % 3 == 0,
            number_of_sales: 1,
            builder_payment_received: i % 6 != 0,
        })
        .collect()
}

fn bench_single_payroll(c: &mut Criterion) {
    let engine = create_engine();
    let employee = create_employee(1);
    let attendance = create_attendance();
    let deals = create_deals(&employee.id, 5);
    let period = PayMonth::new(3, 2025).expect("valid period");

    c.bench_function("single_payroll", |b| {
        b.iter(|| {
            engine.calculate(black_box(&PayrollInput {
                employee: &employee,
                attendance: &attendance,
                deals: &deals,
                period,
                overrides: PayrollOverrides::default(),
            }))
        })
    });
}

fn bench_deal_history(c: &mut Criterion) {
    let engine = create_engine();
    let employee = create_employee(2);
    let attendance = create_attendance();
    let period = PayMonth::new(3, 2025).expect("valid period");

    let mut group = c.benchmark_group("deal_history");
    for count in [10usize, 100, 1_000] {
        let deals = create_deals(&employee.id, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &deals, |b, deals| {
            b.iter(|| {
                engine.calculate(black_box(&PayrollInput {
                    employee: &employee,
                    attendance: &attendance,
                    deals,
                    period,
                    overrides: PayrollOverrides::default(),
                }))
            })
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let engine = create_engine();
    let attendance = create_attendance();
    let period = PayMonth::new(3, 2025).expect("valid period");

    let mut group = c.benchmark_group("batch");
    for size in [100usize, 1_000] {
        let employees: Vec<(Employee, Vec<Deal>)> = (0..size)
            .map(|i| {
                let employee = create_employee(i);
                let deals = create_deals(&employee.id, 8);
                (employee, deals)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &employees, |b, employees| {
            b.iter(|| {
                for (employee, deals) in employees {
                    let _ = black_box(engine.calculate(&PayrollInput {
                        employee,
                        attendance: &attendance,
                        deals,
                        period,
                        overrides: PayrollOverrides::default(),
                    }));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_payroll, bench_deal_history, bench_batch);
criterion_main!(benches);

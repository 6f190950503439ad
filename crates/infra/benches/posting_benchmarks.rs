use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use goldfinance_accounting::chart::CASH_IN_HAND;
use goldfinance_infra::{InMemoryLedgerStore, LedgerReports, LedgerService};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

fn seeded_service(rt: &tokio::runtime::Runtime) -> LedgerService<Arc<InMemoryLedgerStore>> {
    let service = LedgerService::new(Arc::new(InMemoryLedgerStore::new()));
    rt.block_on(service.setup(1_000_000_000)).unwrap();
    service
}

fn bench_posting_latency(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("posting_latency");

    group.bench_function("disbursement", |b| {
        let service = seeded_service(&rt);
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            rt.block_on(service.post_disbursement(
                format!("loan-{i}"),
                black_box(1_000),
                "Asha",
                "bench",
            ))
            .unwrap()
        });
    });

    group.bench_function("repayment_with_interest", |b| {
        let service = seeded_service(&rt);
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            rt.block_on(service.post_repayment(
                format!("loan-{i}"),
                black_box(1_000),
                black_box(50),
                "Asha",
                "bench",
            ))
            .unwrap()
        });
    });

    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let rt = runtime();
    let service = seeded_service(&rt);

    rt.block_on(async {
        for i in 0..1_000 {
            service
                .post_disbursement(format!("loan-{i}"), 1_000, "Asha", "bench")
                .await
                .unwrap();
        }
    });

    let reports = LedgerReports::new(service.store().clone());
    let (start, end) = (
        chrono::Utc::now() - chrono::Duration::days(1),
        chrono::Utc::now() + chrono::Duration::days(1),
    );

    let mut group = c.benchmark_group("reports_over_1k_vouchers");

    group.bench_function("trial_balance", |b| {
        b.iter(|| rt.block_on(reports.trial_balance()).unwrap())
    });

    group.bench_function("account_ledger_cash", |b| {
        b.iter(|| {
            rt.block_on(reports.account_ledger(&CASH_IN_HAND.account_id(), start, end))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_posting_latency, bench_reports);
criterion_main!(benches);

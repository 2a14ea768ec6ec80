use criterion::{Criterion, criterion_group, criterion_main};

use chrono::Utc;
use wareops_core::{CaseKey, UserId};
use wareops_infra::{CaseStore, InMemoryCaseStore};
use wareops_ledger::{AllocationError, ProductionCase};

fn allocation_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");

    c.bench_function("allocate_100_times_single_case", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryCaseStore::new();
                store
                    .insert(ProductionCase::new("S-1", "C-1", 1_000_000))
                    .await
                    .expect("seed case");
                let key = CaseKey::new("S-1", "C-1");

                for _ in 0..100 {
                    let tx_key = key.clone();
                    store
                        .run_transaction(
                            &key,
                            Box::new(move |current| {
                                let mut case = current
                                    .ok_or_else(|| AllocationError::CaseNotFound(tx_key.clone()))?;
                                case.allocate(1, UserId::new("bench"), Utc::now())?;
                                Ok(case)
                            }),
                        )
                        .await
                        .expect("allocate");
                }
            })
        })
    });
}

criterion_group!(benches, allocation_throughput);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use foodsaver_ai::{RecommendationInput, recommend};
use foodsaver_core::{BusinessId, Money, UserId};
use foodsaver_infra::{CollectionKeys, InMemoryKeyValueStore, InventoryStore};
use foodsaver_inventory::{Category, ItemStatus, NewInventoryItem, Unit};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

fn draft(i: u32) -> NewInventoryItem {
    NewInventoryItem {
        business_id: BusinessId::new(),
        business_name: "Bench Grocer".to_string(),
        name: format!("Item {i}"),
        category: Category::Produce,
        quantity: 1 + i % 200,
        unit: Unit::Kg,
        original_price: Money::from_cents(100 + u64::from(i % 5_000)),
        expiry_date: today() + Duration::days(i64::from(i % 40) - 5),
        location: "Bench St".to_string(),
        coordinates: None,
    }
}

fn seeded_store(items: u32) -> InventoryStore<InMemoryKeyValueStore> {
    let store = InventoryStore::new(InMemoryKeyValueStore::new(), CollectionKeys::default());
    for i in 0..items {
        store.add_item(draft(i)).unwrap();
    }
    store
}

fn bench_recommendation(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendation");
    let inputs: Vec<RecommendationInput> = (0..1_000)
        .map(|i| draft(i).recommendation_input())
        .collect();

    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("rule_table_1000_items", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(recommend(black_box(input), today()));
            }
        });
    });

    group.finish();
}

fn bench_add_item_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_item_latency");

    // Every write re-encodes the whole collection, so latency grows with size.
    for existing in [10u32, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("existing_items", existing),
            existing,
            |b, &count| {
                let store = seeded_store(count);
                let mut i = count;
                b.iter(|| {
                    i += 1;
                    black_box(store.add_item(draft(i)).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_accept_bid(c: &mut Criterion) {
    let mut group = c.benchmark_group("accept_bid");

    for bids in [1usize, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::new("pending_bids", bids), bids, |b, &count| {
            b.iter_batched(
                || {
                    let store = seeded_store(50);
                    let item = store.add_item(draft(60)).unwrap();
                    store
                        .update_status(item.id_typed(), ItemStatus::Bidding)
                        .unwrap();
                    let ids: Vec<_> = (0..count)
                        .map(|n| {
                            store
                                .place_bid(
                                    item.id_typed(),
                                    UserId::new(),
                                    "bench@example.com",
                                    Money::from_cents(100 + n as u64),
                                )
                                .unwrap()
                                .id
                        })
                        .collect();
                    (store, ids[count / 2])
                },
                |(store, bid)| black_box(store.accept_bid(bid).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");

    for items in [100u32, 1000].iter() {
        group.throughput(Throughput::Elements(u64::from(*items)));
        group.bench_with_input(BenchmarkId::new("items", items), items, |b, &count| {
            let store = seeded_store(count);
            b.iter(|| black_box(store.items().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_recommendation,
    bench_add_item_latency,
    bench_accept_bid,
    bench_reload
);
criterion_main!(benches);

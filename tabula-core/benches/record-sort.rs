use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_decimal::Decimal;
use std::rc::Rc;
use tabula_core::{Field, FieldList, Kind, Order, Record, Value};

fn ledger(rows: usize) -> Vec<Record> {
    let fields = Rc::new(FieldList::from_fields(vec![
        Field::new("REGION", Kind::String).with_primary_key(true),
        Field::new("ID", Kind::Long).with_primary_key(true),
        Field::new("AMOUNT", Kind::Decimal).with_decimals(2),
    ]));
    let regions = ["EU", "NA", "APAC", "LATAM"];

    (0..rows)
        .map(|i| {
            // scatter ids so the input is far from sorted
            let id = (i as i64 * 7919) % rows as i64;
            Record::with_values(
                Rc::clone(&fields),
                vec![
                    Value::from(regions[i % regions.len()]),
                    Value::from(id),
                    Value::from(Decimal::new(id * 101, 2)),
                ],
            )
            .unwrap()
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let records = ledger(10_000);

    c.bench_function("sort_by_primary_key", |b| {
        b.iter_batched(
            || records.iter().map(Record::copy).collect::<Vec<_>>(),
            |mut rows| {
                rows.sort_by(|a, b| a.compare(b).unwrap());
                black_box(rows)
            },
            BatchSize::LargeInput,
        )
    });

    let mut by_amount = Order::new();
    by_amount.descending(Field::new("AMOUNT", Kind::Decimal));
    c.bench_function("sort_by_cached_keys", |b| {
        b.iter_batched(
            || {
                records
                    .iter()
                    .map(|r| (r.order_key(&by_amount).unwrap(), r.copy()))
                    .collect::<Vec<_>>()
            },
            |mut rows| {
                rows.sort_by(|(a, _), (b, _)| a.compare(b).unwrap());
                black_box(rows)
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_sort);
criterion_main!(benches);

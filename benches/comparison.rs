// ABOUTME: Benchmark comparing bound-serializer encode/decode against serde_json derives.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fieldmap::{record, Field, Serializer, Template};
use serde::{Deserialize, Serialize};

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Metadata {
        created: String,
        updated: String,
        rating: u32,
    }
}

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Account {
        id: u64,
        name: String,
        email: String,
        age: u8,
        metadata: Option<Box<Metadata>>,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct DerivedMetadata {
    created: String,
    updated: String,
    rating: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct DerivedAccount {
    id: u64,
    name: String,
    email: String,
    age: u8,
    metadata: Option<DerivedMetadata>,
}

fn account_serializer() -> Serializer {
    let metadata = Template::from_fields([
        Field::string("created", "created"),
        Field::string("updated", "updated"),
        Field::number("rating", "rating"),
    ])
    .and_then(|t| t.bind::<Metadata>())
    .unwrap();

    Template::from_fields([
        Field::number("id", "id"),
        Field::string("name", "name"),
        Field::string("email", "email"),
        Field::number("age", "age"),
        Field::nested("metadata", "metadata", &metadata),
    ])
    .and_then(|t| t.bind::<Account>())
    .unwrap()
}

fn create_account() -> Account {
    Account {
        id: 12345678901234,
        name: "Bob Smith".to_string(),
        email: "bob.smith@example.com".to_string(),
        age: 42,
        metadata: Some(Box::new(Metadata {
            created: "2024-01-15T10:30:00Z".to_string(),
            updated: "2024-01-18T14:22:33Z".to_string(),
            rating: 47,
        })),
    }
}

fn create_derived_account() -> DerivedAccount {
    DerivedAccount {
        id: 12345678901234,
        name: "Bob Smith".to_string(),
        email: "bob.smith@example.com".to_string(),
        age: 42,
        metadata: Some(DerivedMetadata {
            created: "2024-01-15T10:30:00Z".to_string(),
            updated: "2024-01-18T14:22:33Z".to_string(),
            rating: 47,
        }),
    }
}

fn bench_bind(c: &mut Criterion) {
    c.bench_function("bind_account", |b| b.iter(account_serializer));
}

fn bench_account(c: &mut Criterion) {
    let serializer = account_serializer();
    let data = create_account();
    let derived = create_derived_account();

    let mut group = c.benchmark_group("account");

    // Encoding
    group.bench_function("fieldmap_encode", |b| {
        b.iter(|| serializer.to_vec(black_box(&data)).unwrap())
    });

    group.bench_function("json_encode", |b| {
        b.iter(|| serde_json::to_vec(black_box(&derived)).unwrap())
    });

    // Decoding
    let bytes = serializer.to_vec(&data).unwrap();
    assert_eq!(bytes, serde_json::to_vec(&derived).unwrap());

    group.bench_function("fieldmap_decode", |b| {
        b.iter(|| {
            let mut target = Account::default();
            serializer.decode(black_box(&bytes), &mut target).unwrap();
            target
        })
    });

    group.bench_function("fieldmap_decode_in_place", |b| {
        let mut target = create_account();
        b.iter(|| serializer.decode(black_box(&bytes), &mut target).unwrap())
    });

    group.bench_function("json_decode", |b| {
        b.iter(|| {
            let decoded: DerivedAccount = serde_json::from_slice(black_box(&bytes)).unwrap();
            decoded
        })
    });

    group.finish();
}

fn bench_many_accounts(c: &mut Criterion) {
    let serializer = account_serializer();
    let accounts: Vec<Account> = (0..100)
        .map(|i| Account {
            id: i,
            name: format!("User {}", i),
            email: format!("user{}@example.com", i),
            ..create_account()
        })
        .collect();

    let mut group = c.benchmark_group("accounts_100");
    group.throughput(Throughput::Elements(accounts.len() as u64));

    group.bench_function("fieldmap_encode", |b| {
        b.iter(|| {
            for account in &accounts {
                black_box(serializer.encode(account).unwrap());
            }
        })
    });

    let trees: Vec<_> = accounts.iter().map(|a| serializer.encode(a).unwrap()).collect();
    group.bench_function("fieldmap_decode_value", |b| {
        b.iter(|| {
            for tree in &trees {
                black_box(serializer.decode_fresh::<Account>(tree).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_bind, bench_account, bench_many_accounts);

criterion_main!(benches);

use criterion::*;
use rand::prelude::*;
use skipmap::SkipMap;
use std::collections::BTreeMap;

const SIZES: &[usize] = &[1, 10, 100, 1_000, 10_000];

fn random_keys(n: usize) -> Vec<u64> {
  let mut rng = rand::rng();
  let mut keys: Vec<u64> = (0..n as u64).collect();
  keys.shuffle(&mut rng);
  keys
}

fn bench_insert(c: &mut Criterion) {
  let mut group = c.benchmark_group("insert");
  for &n in SIZES {
    let keys = random_keys(n);
    group.bench_with_input(BenchmarkId::new("skipmap", n), &keys, |b, keys| {
      b.iter_batched(
        SkipMap::new,
        |mut m| {
          for &k in keys {
            m.insert(k, k);
          }
          m
        },
        BatchSize::SmallInput,
      )
    });
    group.bench_with_input(BenchmarkId::new("btreemap", n), &keys, |b, keys| {
      b.iter_batched(
        BTreeMap::new,
        |mut m| {
          for &k in keys {
            m.insert(k, k);
          }
          m
        },
        BatchSize::SmallInput,
      )
    });
  }
  group.finish();
}

fn bench_get(c: &mut Criterion) {
  let mut group = c.benchmark_group("get");
  for &n in SIZES {
    let keys = random_keys(n);
    let skip: SkipMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    let btree: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();

    group.bench_with_input(BenchmarkId::new("skipmap", n), &keys, |b, keys| {
      b.iter(|| {
        for k in keys {
          black_box(skip.get(k));
        }
      })
    });
    group.bench_with_input(BenchmarkId::new("btreemap", n), &keys, |b, keys| {
      b.iter(|| {
        for k in keys {
          black_box(btree.get(k));
        }
      })
    });
  }
  group.finish();
}

fn bench_remove(c: &mut Criterion) {
  let mut group = c.benchmark_group("remove");
  for &n in SIZES {
    let keys = random_keys(n);
    group.bench_with_input(BenchmarkId::new("skipmap", n), &keys, |b, keys| {
      b.iter_batched(
        || keys.iter().map(|&k| (k, k)).collect::<SkipMap<u64, u64>>(),
        |mut m| {
          for k in keys {
            m.remove(k);
          }
        },
        BatchSize::SmallInput,
      )
    });
    group.bench_with_input(BenchmarkId::new("btreemap", n), &keys, |b, keys| {
      b.iter_batched(
        || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<u64, u64>>(),
        |mut m| {
          for k in keys {
            m.remove(k);
          }
        },
        BatchSize::SmallInput,
      )
    });
  }
  group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_remove);
criterion_main!(benches);

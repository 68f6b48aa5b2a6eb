use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use red_black_set::RedBlackSet;
use std::collections::BTreeSet;

const NUM_OF_OPERATIONS: usize = 1000;

fn random_values() -> Vec<u32> {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    (0..NUM_OF_OPERATIONS).map(|_| rng.next_u32()).collect()
}

macro_rules! set_benches {
    ($($module_name:ident: $type_name:ident,)*) => {
        $(
            mod $module_name {
                use super::{random_values, $type_name};
                use criterion::{black_box, Criterion};

                pub fn bench_insert(c: &mut Criterion) {
                    let values = random_values();
                    c.bench_function(&format!("bench {} insert", stringify!($module_name)), move |b| b.iter(|| {
                        let mut set = $type_name::new();
                        for value in &values {
                            set.insert(*value);
                        }
                    }));
                }

                pub fn bench_contains(c: &mut Criterion) {
                    let values = random_values();
                    let set = values.iter().cloned().collect::<$type_name<u32>>();

                    c.bench_function(&format!("bench {} contains", stringify!($module_name)), move |b| b.iter(|| {
                        for value in &values {
                            black_box(set.contains(value));
                        }
                    }));
                }

                pub fn bench_remove(c: &mut Criterion) {
                    let values = random_values();
                    let set = values.iter().cloned().collect::<$type_name<u32>>();

                    c.bench_function(&format!("bench {} remove", stringify!($module_name)), move |b| b.iter(|| {
                        let mut set = set.clone();
                        for value in &values {
                            set.remove(value);
                        }
                    }));
                }

                pub fn bench_iter(c: &mut Criterion) {
                    let set = random_values().into_iter().collect::<$type_name<u32>>();

                    c.bench_function(&format!("bench {} iter", stringify!($module_name)), move |b| b.iter(|| {
                        for value in &set {
                            black_box(value);
                        }
                    }));
                }
            }
        )*

        criterion_group!(
            benches,
            $(
                $module_name::bench_insert,
                $module_name::bench_contains,
                $module_name::bench_remove,
                $module_name::bench_iter,
            )*
        );
    }
}

set_benches!(
    btree_set: BTreeSet,
    red_black_tree: RedBlackSet,
);

fn bench_red_black_set_lower_bound(c: &mut Criterion) {
    let values = random_values();
    let set = values.iter().cloned().collect::<RedBlackSet<u32>>();

    c.bench_function("bench red_black_tree lower_bound", move |b| b.iter(|| {
        for value in &values {
            black_box(set.lower_bound(&value.wrapping_add(1)).get());
        }
    }));
}

criterion_group!(cursor_benches, bench_red_black_set_lower_bound);
criterion_main!(benches, cursor_benches);

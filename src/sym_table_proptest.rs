#![cfg(test)]

// Property tests for SymTable kept inside the crate so they can inspect
// bucket chains directly.

use crate::hash::{bucket_index, BUCKET_COUNTS};
use crate::sym_table::{InsertError, SymTable};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Replace(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Traverse,
}

fn ops_over(pool: Vec<String>) -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    let idxs: Vec<usize> = (0..pool.len()).collect();
    let idx = proptest::sample::select(idxs);
    let contains_pool = proptest::sample::select(pool.clone());
    let op = prop_oneof![
        (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Put(i, v)),
        (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
        idx.clone().prop_map(OpI::Remove),
        idx.clone().prop_map(OpI::Get),
        prop_oneof![contains_pool, "[a-z]{0,5}".prop_map(|s| s)].prop_map(OpI::Contains),
        (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
        Just(OpI::Traverse),
    ];
    proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(ops_over)
}

/// Keys that all land in bucket 0 of the first tier.
fn colliding_keys(n: usize) -> Vec<String> {
    (0..)
        .map(|i| format!("c{i}"))
        .filter(|k| bucket_index(k, BUCKET_COUNTS[0]) == 0)
        .take(n)
        .collect()
}

fn arb_colliding_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    (1usize..=8).prop_flat_map(|n| ops_over(colliding_keys(n)))
}

fn run_against_model(pool: &[String], ops: Vec<OpI>) -> Result<(), TestCaseError> {
    let mut sut: SymTable<i32> = SymTable::new();
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.put(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "put must fail on duplicate");
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::Replace(i, v) => {
                let k = &pool[i];
                let expected = model.get_mut(k).map(|mv| std::mem::replace(mv, v));
                prop_assert_eq!(sut.replace(k, v), expected);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                prop_assert!(!sut.contains(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("model tracks live key");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Traverse => {
                let mut visits = 0usize;
                let mut seen = BTreeSet::new();
                sut.for_each(|k, v| {
                    visits += 1;
                    seen.insert((k.to_string(), *v));
                });
                let expected: BTreeSet<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(visits, model.len());
                prop_assert_eq!(seen, expected);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.bucket_count(), BUCKET_COUNTS[0]);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// - Duplicate puts are rejected; the first value survives.
// - replace/remove/get/contains agree with the model.
// - Traversal yields each live binding exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(&pool, ops)?;
    }

    // Same invariants with every key forced into one chain.
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_colliding_scenario()) {
        run_against_model(&pool, ops)?;
    }
}

/// Bucket count expected after `n` distinct successful puts.
fn expected_bucket_count(n: usize) -> usize {
    let grown = BUCKET_COUNTS[..BUCKET_COUNTS.len() - 1]
        .iter()
        .filter(|&&c| c < n)
        .count();
    BUCKET_COUNTS[grown]
}

// Property: growth keeps every binding reachable in the bucket its hash
// names under the current bucket count.
proptest! {
    #![proptest_config(ProptestConfig { cases: 16, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_rehomes_everything(n in 0usize..2600, removals in proptest::collection::vec(any::<prop::sample::Index>(), 0..50)) {
        let mut sut = SymTable::new();
        for i in 0..n {
            let k = format!("user_{i}");
            prop_assert!(sut.put(&k, i).is_ok());
        }
        prop_assert_eq!(sut.bucket_count(), expected_bucket_count(n));

        let mut live: BTreeSet<usize> = (0..n).collect();
        if n > 0 {
            for r in removals {
                let i = r.index(n);
                let k = format!("user_{i}");
                prop_assert_eq!(sut.remove(&k), live.take(&i));
            }
        }
        prop_assert_eq!(sut.bucket_count(), expected_bucket_count(n));
        prop_assert_eq!(sut.len(), live.len());

        for i in 0..n {
            let k = format!("user_{i}");
            prop_assert_eq!(sut.get(&k), live.get(&i));
        }

        let visited: BTreeSet<usize> = sut.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(&visited, &live);
        prop_assert_eq!(sut.iter().count(), live.len());
    }
}

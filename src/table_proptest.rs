#![cfg(test)]

// Property tests for RobinHoodMap kept inside the crate so they can check
// bucket-level invariants (PSL placement, live count) after every step.

use crate::{Builder, KeyHasher, RobinHoodMap};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one table against a std HashMap model. After every op:
// - live count parity with the model;
// - every entry sits exactly `psl` steps past its home slot and the
//   Robin Hood ordering holds (`assert_invariants`);
// - occupancy never exceeds `load_factor * capacity + 1`.
fn run<H>(
    mut sut: RobinHoodMap<String, i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: KeyHasher<String> + KeyHasher<str>,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut.insert(k.clone(), v).expect("allocation");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::GetOrInsert(i, v) => {
                let k = pool[i].clone();
                let got = *sut.get_or_insert_with(k.clone(), || v).expect("allocation");
                let want = *model.entry(k).or_insert(v);
                prop_assert_eq!(got, want);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                prop_assert!(!sut.contains_key(k.as_str()));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k.as_str()) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.wrapping_add(d);
                }
            }
            OpI::Iterate => {
                let s: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let m: BTreeSet<(String, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let bound = sut.config().load_factor * sut.capacity() as f64 + 1.0;
        prop_assert!(sut.len() as f64 <= bound);
    }
    // Every surviving key is still reachable after the whole sequence.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k.as_str()), Some(v));
    }
    Ok(())
}

// Hashes only the first byte, so keys sharing a first letter collide and
// chains get long enough to exercise swaps and backward shifts.
#[derive(Clone, Copy, Default)]
struct FirstByte;
impl KeyHasher<String> for FirstByte {
    fn hash_key(&self, key: &String, seed: u32) -> u32 {
        <Self as KeyHasher<str>>::hash_key(self, key.as_str(), seed)
    }
}
impl KeyHasher<str> for FirstByte {
    fn hash_key(&self, key: &str, _seed: u32) -> u32 {
        key.bytes().next().map_or(0, u32::from)
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Property: state-machine equivalence against std HashMap with the
    // default MurmurHash3 strategy, starting from a single bucket.
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: RobinHoodMap<String, i32> = RobinHoodMap::with_capacity(1).unwrap();
        run(sut, &pool, ops)?;
    }

    // Property: same invariants under heavy collisions and a range of load
    // factors.
    #[test]
    fn prop_state_machine_with_collisions(
        (pool, ops) in arb_scenario(),
        lf in 0.1f64..0.95,
    ) {
        let sut: RobinHoodMap<String, i32, FirstByte> = Builder::new()
            .capacity(2)
            .load_factor(lf)
            .hasher(FirstByte)
            .build()
            .unwrap();
        run(sut, &pool, ops)?;
    }
}

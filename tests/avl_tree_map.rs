use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use avl_ost::{AvlTreeMap, Error, Rank};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys come from a range smaller than `TEST_SIZE` so that inserts collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Worst-case AVL height for `n` entries, plus one level for leaves having height 0.
fn avl_height_bound(n: usize) -> usize {
    (1.4405 * ((n + 2) as f64).log2() + 1.0) as usize
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Put(i64, Option<i64>),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    Floor(i64),
    Ceiling(i64),
    Min,
    Max,
    DeleteMin,
    DeleteMax,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => (key_strategy(), proptest::option::of(value_strategy())).prop_map(|(k, v)| MapOp::Put(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::Floor),
        1 => key_strategy().prop_map(MapOp::Ceiling),
        1 => Just(MapOp::Min),
        1 => Just(MapOp::Max),
        1 => Just(MapOp::DeleteMin),
        1 => Just(MapOp::DeleteMax),
    ]
}

// ─── Randomized comparison against BTreeMap ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Every operation returns what `BTreeMap` returns for the same sequence.
    #[test]
    fn operations_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(avl.insert(k, v), bt.insert(k, v), "insert({})", k);
                }
                MapOp::Put(k, Some(v)) => {
                    prop_assert_eq!(avl.put(k, Some(v)), bt.insert(k, v), "put({}, Some)", k);
                }
                MapOp::Put(k, None) => {
                    prop_assert_eq!(avl.put(k, None), bt.remove(&k), "put({}, None)", k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(&k), bt.remove(&k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(&k), bt.get(&k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(avl.contains_key(&k), bt.contains_key(&k), "contains_key({})", k);
                }
                MapOp::Floor(k) => {
                    prop_assert_eq!(avl.floor(&k), bt.range(..=k).next_back(), "floor({})", k);
                }
                MapOp::Ceiling(k) => {
                    prop_assert_eq!(avl.ceiling(&k), bt.range(k..).next(), "ceiling({})", k);
                }
                MapOp::Min => {
                    prop_assert_eq!(avl.min_key().ok(), bt.keys().next());
                }
                MapOp::Max => {
                    prop_assert_eq!(avl.max_key().ok(), bt.keys().next_back());
                }
                MapOp::DeleteMin => {
                    let expected = bt.pop_first().ok_or(Error::NoSuchElement);
                    prop_assert_eq!(avl.delete_min(), expected);
                }
                MapOp::DeleteMax => {
                    let expected = bt.pop_last().ok_or(Error::NoSuchElement);
                    prop_assert_eq!(avl.delete_max(), expected);
                }
            }
            prop_assert_eq!(avl.len(), bt.len());
        }

        prop_assert!(avl.height() <= avl_height_bound(avl.len()));
        prop_assert!(avl.iter().eq(bt.iter()));
    }

    /// Forward, reverse and consuming iteration all agree with `BTreeMap`.
    #[test]
    fn iterators_match_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(avl.iter().len(), bt.len());
        prop_assert!(avl.iter().eq(bt.iter()));
        prop_assert!(avl.iter().rev().eq(bt.iter().rev()));
        prop_assert!(avl.keys().eq(bt.keys()));
        prop_assert!(avl.values().eq(bt.values()));
        prop_assert!(avl.clone().into_iter().eq(bt.clone()));
        prop_assert!(avl.clone().into_iter().rev().eq(bt.clone().into_iter().rev()));
        prop_assert!(avl.clone().into_keys().eq(bt.clone().into_keys()));
        prop_assert!(avl.into_values().eq(bt.into_values()));
    }

    /// Taking from both ends of `Iter` visits each entry exactly once.
    #[test]
    fn iter_from_both_ends(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500),
        pattern in proptest::collection::vec(any::<bool>(), 0..600),
    ) {
        let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let mut avl_iter = avl.iter();
        let mut bt_iter = bt.iter();
        for from_back in pattern {
            if from_back {
                prop_assert_eq!(avl_iter.next_back(), bt_iter.next_back());
            } else {
                prop_assert_eq!(avl_iter.next(), bt_iter.next());
            }
            prop_assert_eq!(avl_iter.len(), bt_iter.len());
        }
        prop_assert!(avl_iter.eq(bt_iter));
    }

    /// Mutable iteration updates every value in key order.
    #[test]
    fn iter_mut_updates_values(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for ((ak, av), (bk, bv)) in avl.iter_mut().zip(bt.iter_mut()) {
            prop_assert_eq!(ak, bk);
            *av = av.wrapping_mul(3);
            *bv = bv.wrapping_mul(3);
        }
        for v in avl.values_mut() {
            *v = v.wrapping_add(1);
        }
        for v in bt.values_mut() {
            *v = v.wrapping_add(1);
        }

        prop_assert!(avl.iter().eq(bt.iter()));
    }
}

// ─── Order-statistic operations (compared against Vec) ───────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// `select` returns the entry at each sorted position and rejects the rest.
    #[test]
    fn select_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().copied()).into_iter().collect();

        for (rank, (k, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(avl.select(rank), Ok((k, v)), "select({})", rank);
            prop_assert_eq!(avl[Rank(rank)], *v);
        }

        let len = sorted.len();
        prop_assert_eq!(avl.select(len), Err(Error::InvalidArgument { rank: len, len }));
        prop_assert_eq!(avl.get_by_rank(len + 100), None);
    }

    /// `rank` counts the smaller keys for present and absent keys alike.
    #[test]
    fn rank_matches_vec(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE),
        probes in proptest::collection::vec(-1_100i64..1_100i64, 100),
    ) {
        let avl: AvlTreeMap<i64, i64> = entries.iter().copied().collect();
        let keys: Vec<i64> = BTreeMap::from_iter(entries.iter().copied()).into_keys().collect();

        for probe in probes {
            let expected = keys.partition_point(|k| *k < probe);
            prop_assert_eq!(avl.rank(&probe), expected, "rank({})", probe);
            let rank_of = keys.binary_search(&probe).ok();
            prop_assert_eq!(avl.rank_of(&probe), rank_of, "rank_of({})", probe);
        }

        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(avl.rank(k), i);
            prop_assert_eq!(avl.select(avl.rank(k)).map(|(key, _)| key), Ok(k));
        }
    }

    /// Ranks stay correct after a mix of inserts and removes.
    #[test]
    fn order_stats_after_mutations(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    avl.insert(k, v);
                    bt.insert(k, v);
                }
                MapOp::Remove(k) => {
                    avl.remove(&k);
                    bt.remove(&k);
                }
                _ => {}
            }
        }

        let sorted: Vec<(i64, i64)> = bt.into_iter().collect();
        prop_assert_eq!(avl.len(), sorted.len());
        for (rank, (k, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(avl.get_by_rank(rank), Some((k, v)));
            prop_assert_eq!(avl.rank(k), rank);
        }
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

fn scenario_map() -> AvlTreeMap<i32, i32> {
    let mut map = AvlTreeMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        map.insert(k, k);
    }
    map
}

#[test]
fn nine_key_scenario() {
    let mut map = scenario_map();

    assert_eq!(map.get(&7), Some(&7));
    assert_eq!(map.len(), 9);
    assert_eq!(map.min_key(), Ok(&1));
    assert_eq!(map.max_key(), Ok(&9));
    assert_eq!(map.select(0), Ok((&1, &1)));
    assert_eq!(map.select(8), Ok((&9, &9)));
    assert_eq!(map.rank(&6), 5);

    assert_eq!(map.remove(&5), Some(5));
    assert_eq!(map.len(), 8);
    assert_eq!(map.get(&5), None);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 6, 7, 8, 9]);
    assert_eq!(map.select(4), Ok((&6, &6)));
}

#[test]
fn removing_absent_key_is_idempotent() {
    let mut map = scenario_map();
    assert_eq!(map.remove(&5), Some(5));
    let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
    let height = map.height();

    assert_eq!(map.remove(&5), None);
    assert_eq!(map.remove(&100), None);
    assert_eq!(map.remove_entry(&-1), None);

    assert_eq!(map.len(), 8);
    assert_eq!(map.height(), height);
    assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), before);
}

#[test]
fn overwriting_does_not_change_size() {
    let mut map = scenario_map();
    assert_eq!(map.insert(4, 40), Some(4));
    assert_eq!(map.put(4, Some(400)), Some(40));
    assert_eq!(map.len(), 9);
    assert_eq!(map[&4], 400);
    assert_eq!(map.rank(&4), 3);
}

#[test]
fn put_none_deletes() {
    let mut map = scenario_map();
    assert_eq!(map.put(3, None), Some(3));
    assert_eq!(map.put(3, None), None);
    assert_eq!(map.len(), 8);
    assert!(!map.contains_key(&3));
}

#[test]
fn empty_map_errors() {
    let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();

    assert_eq!(map.min_key(), Err(Error::NoSuchElement));
    assert_eq!(map.max_key(), Err(Error::NoSuchElement));
    assert_eq!(map.delete_min(), Err(Error::NoSuchElement));
    assert_eq!(map.delete_max(), Err(Error::NoSuchElement));
    assert_eq!(map.select(0), Err(Error::InvalidArgument { rank: 0, len: 0 }));
    assert_eq!(map.rank(&42), 0);
    assert_eq!(map.floor(&42), None);
    assert_eq!(map.ceiling(&42), None);
    assert_eq!(map.height(), 0);
    assert!(map.is_empty());
}

#[test]
fn checked_min_and_max_on_owned_map_with_ord_values() {
    let map: AvlTreeMap<i32, i32> = AvlTreeMap::from([(2, 20), (1, 10), (3, 30)]);
    assert_eq!(map.min_key(), Ok(&1));
    assert_eq!(map.max_key(), Ok(&3));

    // The map itself is `Ord`, and `Ord::min`/`Ord::max` still compare whole maps.
    let smaller = AvlTreeMap::from([(0, 0)]);
    assert_eq!(Ord::min(map.clone(), smaller.clone()), smaller);
    assert_eq!(Ord::max(map.clone(), smaller), map);
}

#[test]
fn last_matches_next_back() {
    let map = scenario_map();
    assert_eq!(map.iter().last(), Some((&9, &9)));
    assert_eq!(map.keys().last(), Some(&9));
    assert_eq!(map.values().last(), Some(&9));
    assert_eq!(map.clone().into_iter().last(), Some((9, 9)));
    assert_eq!(map.clone().into_keys().last(), Some(9));
    assert_eq!(map.into_values().last(), Some(9));
    assert_eq!(AvlTreeMap::<i32, i32>::new().keys().last(), None);
}

#[test]
fn delete_min_and_max_drain_in_order() {
    let mut map = scenario_map();
    assert_eq!(map.delete_min(), Ok((1, 1)));
    assert_eq!(map.delete_max(), Ok((9, 9)));
    assert_eq!(map.min_key(), Ok(&2));
    assert_eq!(map.max_key(), Ok(&8));

    let mut drained = Vec::new();
    while let Ok((k, _)) = map.delete_min() {
        drained.push(k);
    }
    assert_eq!(drained, vec![2, 3, 4, 5, 6, 7, 8]);
    assert!(map.is_empty());
}

#[test]
fn clear_resets_the_map() {
    let mut map = scenario_map();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    map.insert(1, 1);
    assert_eq!(map.len(), 1);
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::InvalidArgument { rank: 7, len: 3 }.to_string(),
        "invalid argument: rank 7 is out of bounds for a map of length 3"
    );
    assert_eq!(Error::NoSuchElement.to_string(), "no such element: the map is empty");
}

#[test]
fn std_traits() {
    let map = scenario_map();
    let copy = map.clone();
    assert_eq!(map, copy);
    assert_eq!(AvlTreeMap::<i32, i32>::default(), AvlTreeMap::new());

    let small = AvlTreeMap::from([(1, 1)]);
    let large = AvlTreeMap::from([(2, 1)]);
    assert!(small < large);

    assert_eq!(format!("{:?}", AvlTreeMap::from([(1, "a"), (2, "b")])), r#"{1: "a", 2: "b"}"#);

    let mut extended: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    extended.extend(&map);
    extended.extend([(10, 10)]);
    assert_eq!(extended.len(), 10);
}

// ─── Balance ─────────────────────────────────────────────────────────────────

/// A plain binary search tree with no rebalancing.
#[derive(Default)]
struct UnbalancedBst {
    root: Option<Box<BstNode>>,
}

struct BstNode {
    key: u32,
    left: Option<Box<BstNode>>,
    right: Option<Box<BstNode>>,
}

impl UnbalancedBst {
    fn insert(&mut self, key: u32) {
        Self::insert_at(&mut self.root, key);
    }

    fn insert_at(link: &mut Option<Box<BstNode>>, key: u32) {
        match link {
            Some(node) if key < node.key => Self::insert_at(&mut node.left, key),
            Some(node) => Self::insert_at(&mut node.right, key),
            None => *link = Some(Box::new(BstNode { key, left: None, right: None })),
        }
    }

    /// Height with the same convention as `AvlTreeMap::height`: a leaf is 0.
    fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if let Some(root) = &self.root {
            stack.push((&**root, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in [&node.left, &node.right].into_iter().flatten() {
                stack.push((&**child, depth + 1));
            }
        }
        deepest
    }
}

#[test]
fn sorted_insertions_stay_logarithmic() {
    let mut avl = AvlTreeMap::new();
    let mut bst = UnbalancedBst::default();
    for k in 1..=1000u32 {
        avl.insert(k, ());
        bst.insert(k);
    }

    assert_eq!(avl.len(), 1000);
    assert!(avl.height() <= avl_height_bound(1000), "height {}", avl.height());
    assert_eq!(bst.height(), 999);
}

#[test]
fn seeded_insertion_orders_stay_balanced() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let n = 5_000u32;

    let ascending: Vec<u32> = (0..n).collect();
    let descending: Vec<u32> = (0..n).rev().collect();
    let mut shuffled = ascending.clone();
    shuffled.shuffle(&mut rng);

    for order in [ascending, descending, shuffled] {
        let mut map = AvlTreeMap::new();
        for &k in &order {
            map.insert(k, k);
            assert!(map.height() <= avl_height_bound(map.len()));
        }
        assert_eq!(map.len(), n as usize);
        assert!(map.keys().copied().eq(0..n));

        for _ in 0..n / 2 {
            let k = rng.gen_range(0..n);
            map.remove(&k);
            assert!(map.height() <= avl_height_bound(map.len()));
        }
        for rank in (0..map.len()).step_by(97) {
            let (k, _) = map.select(rank).unwrap();
            assert_eq!(map.rank(k), rank);
        }
    }
}

// ─── Panic tests ─────────────────────────────────────────────────────────────

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_rank_out_of_bounds_panics() {
    let map = scenario_map();
    let _ = map[Rank(9)];
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn index_mut_rank_empty_map_panics() {
    let mut map: AvlTreeMap<i32, i32> = AvlTreeMap::new();
    map[Rank(0)] = 1;
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = scenario_map();
    let _ = map[&42];
}

// ─── Send/Sync ───────────────────────────────────────────────────────────────

mod send_sync_tests {
    use avl_ost::AvlTreeMap;
    use avl_ost::avl_map::{IntoIter, IntoKeys, IntoValues, Iter, IterMut, Keys, Values, ValuesMut};
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    assert_impl_all!(AvlTreeMap<i64, i64>: Send, Sync);
    assert_impl_all!(Iter<'static, i64, i64>: Send, Sync, Clone);
    assert_impl_all!(Keys<'static, i64, i64>: Send, Sync);
    assert_impl_all!(Values<'static, i64, i64>: Send, Sync);
    assert_impl_all!(IterMut<'static, i64, i64>: Send);
    assert_impl_all!(ValuesMut<'static, i64, i64>: Send);
    assert_impl_all!(IntoIter<i64, i64>: Send, Sync);
    assert_impl_all!(IntoKeys<i64, i64>: Send, Sync);
    assert_impl_all!(IntoValues<i64, i64>: Send, Sync);
    assert_not_impl_any!(AvlTreeMap<std::rc::Rc<i64>, i64>: Send, Sync);
}

// ─── Drop semantics ──────────────────────────────────────────────────────────

mod drop_tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use avl_ost::AvlTreeMap;

    struct Droppable(Rc<Cell<usize>>);

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn filled(drops: &Rc<Cell<usize>>) -> AvlTreeMap<i64, Droppable> {
        (0..100).map(|i| (i, Droppable(drops.clone()))).collect()
    }

    #[test]
    fn values_dropped_on_remove() {
        let drops = Rc::new(Cell::new(0));
        let mut map = filled(&drops);
        assert_eq!(drops.get(), 0);

        map.remove(&50);
        assert_eq!(drops.get(), 1);
        drop(map.delete_min());
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn values_dropped_on_map_drop_and_clear() {
        let drops = Rc::new(Cell::new(0));
        drop(filled(&drops));
        assert_eq!(drops.get(), 100);

        let mut map = filled(&drops);
        map.clear();
        assert_eq!(drops.get(), 200);
        assert!(map.is_empty());
    }

    #[test]
    fn old_value_dropped_on_replace() {
        let drops = Rc::new(Cell::new(0));
        let mut map = filled(&drops);
        drop(map.insert(7, Droppable(drops.clone())));
        assert_eq!(drops.get(), 1);
        assert_eq!(map.len(), 100);
    }

    #[test]
    fn partially_consumed_into_iter_drops_rest() {
        let drops = Rc::new(Cell::new(0));
        let mut iter = filled(&drops).into_iter();
        drop(iter.next());
        assert_eq!(drops.get(), 1);
        drop(iter);
        assert_eq!(drops.get(), 100);
    }
}

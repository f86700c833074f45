//! Hash map with separate chaining or linear probing.
//!
//! Keys are hashed with a deliberately simple function so collisions are
//! easy to provoke and follow by hand. The table doubles when the load
//! factor exceeds 0.75, rehashing every live entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::step::{Aux, HashEntry, HashTableSnapshot, ProbeSlot, Step, StepKind, StepRecorder};

/// Collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionStrategy {
    /// One list per bucket.
    Chaining,
    /// Open addressing, step 1, tombstones on delete.
    LinearProbing,
}

/// Key hash before reduction modulo capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HashFunction {
    /// Sum of character code points.
    SumChars,
    /// Number of characters.
    Length,
}

impl HashFunction {
    pub fn bucket(self, key: &str, capacity: usize) -> usize {
        let raw: usize = match self {
            Self::SumChars => key.chars().map(|c| c as usize).sum(),
            Self::Length => key.chars().count(),
        };
        raw % capacity.max(1)
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SumChars => "sum of character codes",
            Self::Length => "key length",
        })
    }
}

/// One map operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum MapOperation {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

impl MapOperation {
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Get { key } | Self::Delete { key } => key,
        }
    }
}

/// Growth threshold: `len / capacity > 3/4`.
const LOAD_NUMERATOR: usize = 3;
const LOAD_DENOMINATOR: usize = 4;

/// Generate the step sequence for applying `ops` to an empty table of
/// `capacity` buckets.
pub fn hash_map_steps(
    strategy: CollisionStrategy,
    function: HashFunction,
    capacity: usize,
    ops: &[MapOperation],
) -> Vec<Step> {
    let capacity = capacity.max(1);
    let table = match strategy {
        CollisionStrategy::Chaining => Table::Chains(vec![Vec::new(); capacity]),
        CollisionStrategy::LinearProbing => Table::Slots(vec![ProbeSlot::Empty; capacity]),
    };
    let mut map = MapStepper {
        function,
        table,
        len: 0,
        rec: StepRecorder::new(),
    };
    map.emit(
        StepKind::Init,
        Vec::new(),
        format!("Empty table with {capacity} buckets, hashing by {function}"),
    );
    for op in ops {
        match op {
            MapOperation::Put { key, value } => map.put(key, value),
            MapOperation::Get { key } => map.get(key),
            MapOperation::Delete { key } => map.delete(key),
        }
    }
    let focus = (0..map.table.capacity()).collect();
    let message = format!("{} entries in {} buckets", map.len, map.table.capacity());
    map.emit(StepKind::Done, focus, message);
    map.rec.finish()
}

#[derive(Debug, Clone)]
enum Table {
    Chains(Vec<Vec<HashEntry>>),
    Slots(Vec<ProbeSlot>),
}

impl Table {
    fn capacity(&self) -> usize {
        match self {
            Self::Chains(c) => c.len(),
            Self::Slots(s) => s.len(),
        }
    }
}

/// Where a probe sequence ended.
enum Probe {
    Hit(usize),
    /// Key absent; first reusable slot on the way, if any.
    Miss(Option<usize>),
}

struct MapStepper {
    function: HashFunction,
    table: Table,
    len: usize,
    rec: StepRecorder,
}

impl MapStepper {
    fn snapshot(&self) -> HashTableSnapshot {
        let (chains, slots) = match &self.table {
            Table::Chains(c) => (Some(c.clone()), None),
            Table::Slots(s) => (None, Some(s.clone())),
        };
        HashTableSnapshot {
            capacity: self.table.capacity(),
            len: self.len,
            chains,
            slots,
        }
    }

    fn emit(&mut self, kind: StepKind, focus: Vec<usize>, message: impl Into<String>) {
        let aux = Aux::HashTable(self.snapshot());
        self.rec.record(Step::new(kind, focus, message).with_aux(aux));
    }

    fn hash(&mut self, key: &str) -> usize {
        let bucket = self.function.bucket(key, self.table.capacity());
        self.rec.emit(
            StepKind::Hash,
            vec![bucket],
            format!("hash(\"{key}\") = {bucket}"),
        );
        bucket
    }

    /// Walk the chain or probe sequence for `key`, emitting a `probe` step
    /// per inspected entry.
    fn locate(&mut self, key: &str, bucket: usize) -> Probe {
        match &self.table {
            Table::Chains(chains) => {
                for (position, entry) in chains[bucket].iter().enumerate() {
                    let existing = &entry.key;
                    let hit = existing == key;
                    self.rec.emit(
                        StepKind::Probe,
                        vec![bucket],
                        format!(
                            "Entry {position} in bucket {bucket} holds \"{existing}\"{}",
                            if hit { ", a match" } else { "" }
                        ),
                    );
                    if hit {
                        return Probe::Hit(position);
                    }
                }
                Probe::Miss(None)
            }
            Table::Slots(slots) => {
                let capacity = slots.len();
                let mut reusable = None;
                for offset in 0..capacity {
                    let index = (bucket + offset) % capacity;
                    match &slots[index] {
                        ProbeSlot::Empty => {
                            self.rec.emit(StepKind::Probe, vec![index], format!("Slot {index} is empty"));
                            return Probe::Miss(reusable.or(Some(index)));
                        }
                        ProbeSlot::Tombstone => {
                            self.rec.emit(
                                StepKind::Probe,
                                vec![index],
                                format!("Slot {index} is a tombstone, keep probing"),
                            );
                            reusable.get_or_insert(index);
                        }
                        ProbeSlot::Occupied { key: existing, .. } => {
                            let hit = existing == key;
                            self.rec.emit(
                                StepKind::Probe,
                                vec![index],
                                format!(
                                    "Slot {index} holds \"{existing}\"{}",
                                    if hit { ", a match" } else { ", keep probing" }
                                ),
                            );
                            if hit {
                                return Probe::Hit(index);
                            }
                        }
                    }
                }
                Probe::Miss(reusable)
            }
        }
    }

    fn put(&mut self, key: &str, value: &str) {
        let bucket = self.hash(key);
        let found = self.locate(key, bucket);
        let entry = HashEntry {
            key: key.to_string(),
            value: value.to_string(),
        };
        let focus = match (&mut self.table, found) {
            (Table::Chains(chains), Probe::Hit(position)) => {
                chains[bucket][position].value = entry.value;
                Some((bucket, false))
            }
            (Table::Chains(chains), Probe::Miss(_)) => {
                chains[bucket].push(entry);
                Some((bucket, true))
            }
            (Table::Slots(slots), Probe::Hit(index)) => {
                slots[index] = ProbeSlot::Occupied {
                    key: entry.key,
                    value: entry.value,
                };
                Some((index, false))
            }
            (Table::Slots(slots), Probe::Miss(Some(index))) => {
                slots[index] = ProbeSlot::Occupied {
                    key: entry.key,
                    value: entry.value,
                };
                Some((index, true))
            }
            (Table::Slots(_), Probe::Miss(None)) => None,
        };

        match focus {
            Some((index, true)) => {
                self.len += 1;
                self.emit(StepKind::Insert, vec![index], format!("Insert \"{key}\" => \"{value}\""));
            }
            Some((index, false)) => {
                self.emit(StepKind::Insert, vec![index], format!("Update \"{key}\" to \"{value}\""));
            }
            None => {
                self.emit(StepKind::Skip, Vec::new(), format!("No free slot for \"{key}\""));
                return;
            }
        }

        let capacity = self.table.capacity();
        if self.len * LOAD_DENOMINATOR > capacity * LOAD_NUMERATOR {
            self.resize();
        }
    }

    fn get(&mut self, key: &str) {
        let bucket = self.hash(key);
        match self.locate(key, bucket) {
            Probe::Hit(position) => {
                let (index, value) = match &self.table {
                    Table::Chains(chains) => (bucket, chains[bucket][position].value.clone()),
                    Table::Slots(slots) => match &slots[position] {
                        ProbeSlot::Occupied { value, .. } => (position, value.clone()),
                        _ => (position, String::new()),
                    },
                };
                self.emit(StepKind::Found, vec![index], format!("\"{key}\" => \"{value}\""));
            }
            Probe::Miss(_) => {
                self.emit(StepKind::NotFound, vec![bucket], format!("\"{key}\" is not in the map"));
            }
        }
    }

    fn delete(&mut self, key: &str) {
        let bucket = self.hash(key);
        match self.locate(key, bucket) {
            Probe::Hit(position) => {
                let index = match &mut self.table {
                    Table::Chains(chains) => {
                        chains[bucket].remove(position);
                        bucket
                    }
                    Table::Slots(slots) => {
                        slots[position] = ProbeSlot::Tombstone;
                        position
                    }
                };
                self.len -= 1;
                self.emit(StepKind::Remove, vec![index], format!("Remove \"{key}\""));
            }
            Probe::Miss(_) => {
                self.emit(
                    StepKind::NotFound,
                    vec![bucket],
                    format!("\"{key}\" is not in the map, nothing to remove"),
                );
            }
        }
    }

    fn resize(&mut self) {
        let old_capacity = self.table.capacity();
        let capacity = old_capacity * 2;
        let entries: Vec<HashEntry> = match &self.table {
            Table::Chains(chains) => chains.iter().flatten().cloned().collect(),
            Table::Slots(slots) => slots
                .iter()
                .filter_map(|slot| match slot {
                    ProbeSlot::Occupied { key, value } => Some(HashEntry {
                        key: key.clone(),
                        value: value.clone(),
                    }),
                    _ => None,
                })
                .collect(),
        };

        let chaining = matches!(self.table, Table::Chains(_));
        self.table = if chaining {
            let mut chains = vec![Vec::new(); capacity];
            for entry in &entries {
                chains[self.function.bucket(&entry.key, capacity)].push(entry.clone());
            }
            Table::Chains(chains)
        } else {
            let mut slots = vec![ProbeSlot::Empty; capacity];
            for entry in entries.iter().cloned() {
                let start = self.function.bucket(&entry.key, capacity);
                // Tombstones are dropped, so an empty slot always exists.
                if let Some(index) = (0..capacity)
                    .map(|offset| (start + offset) % capacity)
                    .find(|&i| slots[i] == ProbeSlot::Empty)
                {
                    slots[index] = ProbeSlot::Occupied {
                        key: entry.key,
                        value: entry.value,
                    };
                }
            }
            Table::Slots(slots)
        };

        let focus = (0..capacity).collect();
        self.emit(
            StepKind::Resize,
            focus,
            format!(
                "Load factor {}/{old_capacity} exceeds 0.75, grow to {capacity} buckets and rehash {} entries",
                self.len,
                entries.len()
            ),
        );
    }
}

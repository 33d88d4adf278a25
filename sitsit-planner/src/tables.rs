//! Table assignment
//!
//! Packs attendees into fixed-capacity tables in a single greedy pass:
//!
//! 1. Parse the table specification ("14 8 6") into seat counts.
//! 2. Number people 1..=N in input order.
//! 3. Resolve friend lists with [`AffinityResolver`].
//! 4. Stable-sort everyone by cluster size, smallest first, so the larger
//!    clusters gather towards the later tables.
//! 5. Cut the sorted list into one chunk per table, each chunk as long as the
//!    table has seats.
//! 6. Fill each table depth-first from an explicit stack: seating a person
//!    pushes all of their friends, so direct friends land next to each other.
//!
//! Friends are pushed even when they belong to another table's chunk. A
//! cluster cut by a chunk boundary therefore pulls people into the earlier
//! table, which is already exactly full, and surfaces as
//! [`Error::TableOverflow`]. Which tables overflow depends on the global sort
//! order.

use crate::affinity::{AffinityResolver, FriendMap};
use serde::Serialize;
use sitsit_common::{AffinityConfig, Error, Person, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;
use tracing::{debug, info};

/// Integer ID of a person within one run (1-based)
///
/// As wide as an index, so every position in the attendee list has an ID.
pub type PersonId = usize;

/// Seat value of an empty seat
pub const EMPTY_SEAT: PersonId = 0;

/// Requested table sizes in specification order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    sizes: Vec<usize>,
}

impl TableSpec {
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of seat pairs of table `index`
    pub fn seat_pairs(&self, index: usize) -> usize {
        self.sizes[index] / 2
    }

    /// Effective seat count of table `index` (odd sizes lose one seat)
    pub fn seats(&self, index: usize) -> usize {
        2 * self.seat_pairs(index)
    }

    pub fn total_seats(&self) -> usize {
        (0..self.sizes.len()).map(|i| self.seats(i)).sum()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl FromStr for TableSpec {
    type Err = Error;

    /// Parse whitespace-separated positive integers
    fn from_str(text: &str) -> Result<Self> {
        let sizes = text
            .split_whitespace()
            .map(|token| match token.parse::<usize>() {
                Ok(0) => Err(Error::InvalidSpec(format!(
                    "table size must be positive, got '{}'",
                    token
                ))),
                Ok(size) => Ok(size),
                Err(_) => Err(Error::InvalidSpec(format!(
                    "table size must be a positive integer, got '{}'",
                    token
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        if sizes.is_empty() {
            return Err(Error::InvalidSpec("no table sizes given".to_string()));
        }

        Ok(Self { sizes })
    }
}

/// One table: a grid of seat-pair rows holding person IDs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Size as written in the specification
    pub requested: usize,
    /// Seat-pair rows, `EMPTY_SEAT` where nobody sits
    pub rows: Vec<[PersonId; 2]>,
}

impl Table {
    fn empty(requested: usize) -> Self {
        Self {
            requested,
            rows: vec![[EMPTY_SEAT; 2]; requested / 2],
        }
    }

    /// Effective seat count
    pub fn seats(&self) -> usize {
        self.rows.len() * 2
    }

    /// Person at linear seat index (row `i / 2`, column `i % 2`)
    pub fn seat(&self, i: usize) -> Option<PersonId> {
        self.rows.get(i / 2).map(|row| row[i % 2])
    }

    /// IDs of occupied seats in seat order
    pub fn occupied(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.iter().copied())
            .filter(|&id| id != EMPTY_SEAT)
    }

    fn place(&mut self, i: usize, id: PersonId) {
        self.rows[i / 2][i % 2] = id;
    }
}

/// Filled tables in specification order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingPlan {
    pub tables: Vec<Table>,
}

impl SeatingPlan {
    /// Every occupied seat across all tables
    pub fn seated_ids(&self) -> Vec<PersonId> {
        self.tables.iter().flat_map(|t| t.occupied()).collect()
    }
}

/// Person IDs (dense 1..=N in input order) to people
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdMap(BTreeMap<PersonId, Person>);

impl IdMap {
    fn from_people(people: &[Person]) -> Self {
        Self(
            people
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, p)| (i + 1, p))
                .collect(),
        )
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.0.iter().map(|(&id, p)| (id, p))
    }
}

/// Greedy table assigner
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAssigner {
    resolver: AffinityResolver,
}

impl TableAssigner {
    pub fn new(config: AffinityConfig) -> Self {
        Self {
            resolver: AffinityResolver::new(config),
        }
    }

    pub fn resolver(&self) -> &AffinityResolver {
        &self.resolver
    }

    /// Assign every person a seat
    ///
    /// # Errors
    /// - `InvalidSpec` for malformed table-size text
    /// - `TableOverflow` when a table is routed more people than it has seats
    /// - `InvalidInput` from friend resolution: any person with a blank name,
    ///   or two people with the same name, fails the whole assignment.
    ///   [`crate::import::read_people`] already drops rows with no name.
    pub fn assign(&self, table_spec_text: &str, people: &[Person]) -> Result<(SeatingPlan, IdMap)> {
        let spec: TableSpec = table_spec_text.parse()?;
        let friends = self.resolver.friend_map(people)?;
        let ids = IdMap::from_people(people);
        let plan = self.assign_with_friends(&spec, people, &friends)?;
        Ok((plan, ids))
    }

    /// Assign seats using an already resolved friend map
    ///
    /// `people` order defines the IDs: the person at index `k` gets `k + 1`.
    pub fn assign_with_friends(
        &self,
        spec: &TableSpec,
        people: &[Person],
        friends: &FriendMap,
    ) -> Result<SeatingPlan> {
        let total_seats = spec.total_seats();
        if people.len() > total_seats {
            let last = spec.len() - 1;
            debug!(
                people = people.len(),
                total_seats, "Population exceeds total seat capacity"
            );
            return Err(Error::TableOverflow {
                table_index: last,
                capacity: spec.seats(last),
            });
        }

        let id_of: HashMap<&str, PersonId> = people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.as_str(), i + 1))
            .collect();

        // Stable: equal cluster sizes keep input order
        let mut sorted: Vec<&Person> = people.iter().collect();
        sorted.sort_by_key(|p| friends.cluster_size(p));

        let mut tables = Vec::with_capacity(spec.len());
        let mut start = 0;
        for index in 0..spec.len() {
            let end = (start + spec.seats(index)).min(sorted.len());
            let candidates = &sorted[start..end];
            start = end;

            let table = pack_table(index, spec.sizes()[index], candidates, friends, &id_of)?;
            debug!(
                table = index + 1,
                candidates = candidates.len(),
                seated = table.occupied().count(),
                seats = table.seats(),
                "Table filled"
            );
            tables.push(table);
        }

        info!(
            "Seated {} people at {} tables ({} seats)",
            people.len(),
            spec.len(),
            total_seats
        );

        Ok(SeatingPlan { tables })
    }
}

/// Depth-first fill of a single table from its candidate chunk
fn pack_table(
    index: usize,
    requested: usize,
    candidates: &[&Person],
    friends: &FriendMap,
    id_of: &HashMap<&str, PersonId>,
) -> Result<Table> {
    let mut table = Table::empty(requested);
    let capacity = table.seats();

    // LIFO: first candidate on top
    let mut stack: Vec<&Person> = candidates.iter().rev().copied().collect();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut i = 0;

    while let Some(person) = stack.pop() {
        if placed.contains(person.name.as_str()) {
            continue;
        }

        if i >= capacity {
            debug!(
                table = index + 1,
                person = %person,
                capacity,
                "No seat left for person"
            );
            return Err(Error::TableOverflow {
                table_index: index,
                capacity,
            });
        }

        let id = id_of.get(person.name.as_str()).copied().ok_or_else(|| {
            Error::InvalidInput(format!("friend '{}' is not on the attendee list", person.name))
        })?;
        table.place(i, id);

        stack.extend(friends.friends_of(person).iter());
        placed.insert(person.name.as_str());
        i += 1;
    }

    Ok(table)
}

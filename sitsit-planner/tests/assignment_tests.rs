//! Integration tests for table assignment against the generic sitsit fixture
//!
//! The fixture has 28 attendees:
//! - 10 with a group nobody else shares
//! - two pairs ("Kaksoset", "Naapurit")
//! - a trio with one typo ("Gang gang" x2, "Gang gnag")
//! - five physicists, one written in lower case
//! - six choir members ("Sitsikuoro")

use sitsit_common::{Error, Person};
use sitsit_planner::import::read_csv;
use sitsit_planner::{IdMap, PersonId, SeatingPlan, TableAssigner, EMPTY_SEAT};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("generic_sitsit.csv")
}

fn people() -> Vec<Person> {
    read_csv(&fixture_path()).expect("fixture should load")
}

/// Table index of every seated person, by name
fn table_of(plan: &SeatingPlan, ids: &IdMap) -> HashMap<String, usize> {
    let mut tables = HashMap::new();
    for (index, table) in plan.tables.iter().enumerate() {
        for id in table.occupied() {
            let person = ids.get(id).expect("seated ID must resolve");
            tables.insert(person.name.clone(), index);
        }
    }
    tables
}

fn assert_everyone_seated_once(plan: &SeatingPlan, ids: &IdMap, population: usize) {
    let seated = plan.seated_ids();
    assert_eq!(seated.len(), population, "every person seated");

    let unique: HashSet<PersonId> = seated.iter().copied().collect();
    assert_eq!(unique.len(), population, "nobody seated twice");

    let expected: HashSet<PersonId> = (1..=population).collect();
    assert_eq!(unique, expected, "IDs are dense 1..=N");
    assert_eq!(ids.len(), population);
}

#[test]
fn test_fixture_loads() {
    let people = people();
    assert_eq!(people.len(), 28);
    assert_eq!(people[0].name, "Aino Virtanen");
    assert_eq!(people[0].group.as_deref(), Some("Sitsikuoro"));
}

#[test]
fn test_assign_succeeds_with_enough_seats() {
    let people = people();

    for tables_text in ["28", "14 14", "14 8 6", "30", "14 8 8"] {
        let (plan, ids) = TableAssigner::default()
            .assign(tables_text, &people)
            .unwrap_or_else(|e| panic!("{:?} should fit: {}", tables_text, e));

        assert_everyone_seated_once(&plan, &ids, people.len());
        assert!(
            plan.tables
                .iter()
                .filter(|t| t.seats() > 0)
                .take(3)
                .all(|t| t.occupied().count() > 0),
            "{:?}: the first tables all get people",
            tables_text
        );
    }
}

#[test]
fn test_single_full_table_has_no_empty_seat() {
    let people = people();
    let (plan, _) = TableAssigner::default().assign("28", &people).unwrap();

    assert_eq!(plan.tables.len(), 1);
    assert_eq!(plan.tables[0].rows.len(), 14);
    assert!(plan.tables[0]
        .rows
        .iter()
        .all(|row| row[0] != EMPTY_SEAT && row[1] != EMPTY_SEAT));
}

#[test]
fn test_clusters_stay_at_one_table() {
    let people = people();
    let (plan, ids) = TableAssigner::default().assign("14 8 6", &people).unwrap();
    let tables = table_of(&plan, &ids);

    let clusters: [&[&str]; 5] = [
        &["Aada Mäkelä", "Sofia Heinonen"],
        &["Leo Heikkinen", "Pihla Salonen"],
        &["Eino Nieminen", "Toivo Lehtinen", "Enni Salo"],
        &[
            "Helmi Mäkinen",
            "Elias Järvinen",
            "Oliver Niemi",
            "Aarni Laitinen",
            "Lauri Jokinen",
        ],
        &[
            "Aino Virtanen",
            "Lilja Laine",
            "Ellen Saarinen",
            "Niilo Kinnunen",
            "Vilho Rantanen",
            "Otto Savolainen",
        ],
    ];

    for cluster in clusters {
        let first = tables[cluster[0]];
        for name in cluster {
            assert_eq!(tables[*name], first, "{} should sit with {}", name, cluster[0]);
        }
    }

    // Largest clusters sort last: the choir fills the last table
    assert_eq!(tables["Aino Virtanen"], 2);
    assert_eq!(plan.tables[2].occupied().count(), 6);
}

#[test]
fn test_exact_layout_is_depth_first() {
    let people = people();
    let (plan, _) = TableAssigner::default().assign("14 8 6", &people).unwrap();

    let seated: Vec<Vec<PersonId>> = plan
        .tables
        .iter()
        .map(|t| t.occupied().collect())
        .collect();

    assert_eq!(
        seated,
        vec![
            vec![2, 6, 9, 11, 14, 17, 20, 23, 25, 27, 5, 15, 8, 19],
            vec![4, 21, 12, 3, 26, 22, 16, 10],
            // Aino first, then her friends in reverse push order
            vec![1, 28, 24, 18, 13, 7],
        ]
    );
}

#[test]
fn test_assign_fails_with_less_space() {
    let people = people();

    for (tables_text, table_index, capacity) in [("27", 0, 26), ("14 8 2", 2, 2)] {
        match TableAssigner::default().assign(tables_text, &people) {
            Err(Error::TableOverflow {
                table_index: t,
                capacity: c,
            }) => {
                assert_eq!((t, c), (table_index, capacity), "{:?}", tables_text);
            }
            other => panic!("{:?}: expected TableOverflow, got {:?}", tables_text, other),
        }
    }
}

#[test]
fn test_zero_table_is_invalid_spec() {
    let people = people();
    let result = TableAssigner::default().assign("0", &people);
    assert!(matches!(result, Err(Error::InvalidSpec(_))));
}

#[test]
fn test_cluster_cut_by_chunk_boundary_overflows() {
    // Enough seats in total, but the boundaries cut a cluster and its
    // members are pulled into an already full table
    let people = people();

    let result = TableAssigner::default().assign("14 6 8", &people);
    assert!(matches!(
        result,
        Err(Error::TableOverflow {
            table_index: 1,
            capacity: 6
        })
    ));

    let result = TableAssigner::default().assign("16 12", &people);
    assert!(matches!(
        result,
        Err(Error::TableOverflow {
            table_index: 0,
            capacity: 16
        })
    ));
}

#[test]
fn test_assign_is_deterministic() {
    let people = people();
    let assigner = TableAssigner::default();

    let first = assigner.assign("14 14", &people).unwrap();
    let second = assigner.assign("14 14", &people).unwrap();
    assert_eq!(first, second);
}

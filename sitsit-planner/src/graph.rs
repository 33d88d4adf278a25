//! Friend graph export
//!
//! Turns a [`FriendMap`] into undirected edges and a Graphviz DOT document,
//! so the affinity clusters can be inspected with `dot -Tpng`.

use crate::affinity::FriendMap;
use sitsit_common::Person;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Undirected friend edges, each pair once, sorted
///
/// Endpoints are ordered so that the first name sorts before the second.
pub fn friend_edges(friends: &FriendMap) -> Vec<(String, String)> {
    let mut edges = BTreeSet::new();
    for (person, companions) in friends.iter() {
        for friend in companions {
            let (a, b) = if person.name <= friend.name {
                (&person.name, &friend.name)
            } else {
                (&friend.name, &person.name)
            };
            edges.insert((a.clone(), b.clone()));
        }
    }
    edges.into_iter().collect()
}

/// Render people and their friend edges as a DOT `graph`
pub fn to_dot(people: &[Person], friends: &FriendMap) -> String {
    let mut out = String::from("graph sitsit {\n");
    out.push_str("    node [shape=box];\n");

    for person in people {
        let label = match person.group.as_deref() {
            Some(group) if !group.trim().is_empty() => {
                format!("{}\\n{}", escape(&person.name), escape(group))
            }
            _ => escape(&person.name),
        };
        // Writing to a String cannot fail
        let _ = writeln!(out, "    \"{}\" [label=\"{}\"];", escape(&person.name), label);
    }

    for (a, b) in friend_edges(friends) {
        let _ = writeln!(out, "    \"{}\" -- \"{}\";", escape(&a), escape(&b));
    }

    out.push_str("}\n");
    out
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

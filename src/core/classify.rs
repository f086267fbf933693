// link topology, degree and crossing classification
use std::collections::HashMap;
use std::ops::AddAssign;

use serde::Serialize;

use crate::core::types::{Link, Position};

/// Bucket of a single link, decided from the degrees of its two endpoints
/// within the same sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topology {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Topology {
    pub fn from_degrees(source_degree: usize, target_degree: usize) -> Self {
        match (source_degree, target_degree) {
            (1, 1) => Topology::OneToOne,
            (s, 1) if s > 1 => Topology::OneToMany,
            (1, t) if t > 1 => Topology::ManyToOne,
            _ => Topology::ManyToMany,
        }
    }
}

/// Out-degree of source positions and in-degree of target positions.
///
/// Built from the raw link list, so a duplicated link counts twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Degrees {
    source: HashMap<Position, usize>,
    target: HashMap<Position, usize>,
}

impl Degrees {
    pub fn from_links(links: &[Link]) -> Self {
        let mut d = Self::default();
        for l in links {
            *d.source.entry(l.source).or_default() += 1;
            *d.target.entry(l.target).or_default() += 1;
        }
        d
    }

    pub fn source_degree(&self, pos: Position) -> usize {
        self.source.get(&pos).copied().unwrap_or(0)
    }

    pub fn target_degree(&self, pos: Position) -> usize {
        self.target.get(&pos).copied().unwrap_or(0)
    }

    pub fn max_source(&self) -> usize {
        self.source.values().copied().max().unwrap_or(0)
    }

    pub fn max_target(&self) -> usize {
        self.target.values().copied().max().unwrap_or(0)
    }

    pub fn classify(&self, link: Link) -> Topology {
        Topology::from_degrees(self.source_degree(link.source), self.target_degree(link.target))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopologyCounts {
    pub one_to_one: usize,
    pub one_to_many: usize,
    pub many_to_one: usize,
    pub many_to_many: usize,
}

impl TopologyCounts {
    pub fn add(&mut self, t: Topology) {
        match t {
            Topology::OneToOne => self.one_to_one += 1,
            Topology::OneToMany => self.one_to_many += 1,
            Topology::ManyToOne => self.many_to_one += 1,
            Topology::ManyToMany => self.many_to_many += 1,
        }
    }

    pub fn get(&self, t: Topology) -> usize {
        match t {
            Topology::OneToOne => self.one_to_one,
            Topology::OneToMany => self.one_to_many,
            Topology::ManyToOne => self.many_to_one,
            Topology::ManyToMany => self.many_to_many,
        }
    }

    pub fn total(&self) -> usize {
        self.one_to_one + self.one_to_many + self.many_to_one + self.many_to_many
    }

    /// Percentage of all classified links in bucket `t`; 0.0 when there are none.
    pub fn percent(&self, t: Topology) -> f64 {
        match self.total() {
            0 => 0.0,
            n => 100.0 * self.get(t) as f64 / n as f64,
        }
    }
}

impl AddAssign for TopologyCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.one_to_one += rhs.one_to_one;
        self.one_to_many += rhs.one_to_many;
        self.many_to_one += rhs.many_to_one;
        self.many_to_many += rhs.many_to_many;
    }
}

pub fn classify_links(links: &[Link]) -> Vec<Topology> {
    let degrees = Degrees::from_links(links);
    links.iter().map(|&l| degrees.classify(l)).collect()
}

pub fn topology_counts(links: &[Link]) -> TopologyCounts {
    let mut counts = TopologyCounts::default();
    for t in classify_links(links) {
        counts.add(t);
    }
    counts
}

/// True if some pair of links inverts order: i1 < i2 while j1 > j2.
pub fn has_crossing(links: &[Link]) -> bool {
    links.iter().any(|a| {
        links
            .iter()
            .any(|b| a.source < b.source && a.target > b.target)
    })
}

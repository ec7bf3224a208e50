use std::collections::HashMap;
use tracing::debug;

use crate::{Field, Measure, Record};

pub mod group;

use group::Group;

/// How many entries a ranking keeps unless told otherwise.
pub const DEFAULT_LIMIT: usize = 10;

/// One line of a ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub value: f64,
    pub code: String,
}

/// Groups records by a column, sums a measure per group and keeps the top
/// groups by that sum.
///
/// Groups with the same sum keep the order in which they first appeared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduce {
    group_by: Field,
    measure: Measure,
    side: Field,
    limit: usize,
}

impl Default for Reduce {
    fn default() -> Reduce {
        Reduce {
            group_by: Field::Product,
            measure: Measure::ExportValue,
            side: Field::ProductCode,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Reduce {
    /// Products ranked by export value, top ten.
    pub fn new() -> Reduce {
        Reduce::default()
    }

    pub fn group_by(mut self, field: Field) -> Reduce {
        self.group_by = field;
        self
    }

    pub fn measure(mut self, measure: Measure) -> Reduce {
        self.measure = measure;
        self
    }

    /// Column whose value, taken from the first record of each group, is
    /// reported next to the group's name.
    pub fn side(mut self, field: Field) -> Reduce {
        self.side = field;
        self
    }

    pub fn limit(mut self, limit: usize) -> Reduce {
        self.limit = limit;
        self
    }

    pub fn rank<'r, I>(&self, records: I) -> Vec<Entry>
    where
        I: IntoIterator<Item = &'r Record>,
    {
        let mut groups: HashMap<&'r str, Group> = HashMap::new();

        for record in records {
            let next = groups.len();

            groups
                .entry(self.group_by.get(record))
                .or_insert_with(|| Group::new(next, self.side.get(record)))
                .update(self.measure.get(record));
        }

        let mut groups: Vec<(&str, Group)> = groups.into_iter().collect();

        groups.sort_by(|(_, a), (_, b)| {
            b.total()
                .total_cmp(&a.total())
                .then_with(|| a.order().cmp(&b.order()))
        });
        groups.truncate(self.limit);

        debug!(groups = groups.len(), "ranked records");

        groups
            .into_iter()
            .map(|(name, group)| Entry {
                name: name.to_string(),
                value: group.total(),
                code: group.into_code(),
            })
            .collect()
    }
}

/*! Grouped sample statistics.

Values arrive as `(key, value)` pairs.  Each distinct key gets one running
accumulator, and the groups come out in the order their keys were first seen.
A `None` value still registers the key, but adds nothing to its group.

## Example

```
# use group_stats::*;
let rows = vec![("X", Some(10.)), ("Y", Some(20.)), ("X", Some(30.))];
let summaries = group_stats(rows, &mut NoopObserver).unwrap();
assert_eq!(summaries[0].key, "X");
assert_eq!(summaries[0].stats.mean, 20.);
assert_eq!(summaries[0].stats.var, 200.);
assert_eq!(summaries[1].key, "Y");
assert!(summaries[1].stats.var.is_nan());
```

Group sizes are never compared with each other: a key seen once sits next to
a key seen a thousand times.
*/

mod stats;

pub use stats::*;
use std::collections::HashMap;

/// The statistics for one distinct key.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub key: String,
    pub stats: Stats,
}

/// Running accumulators, indexed by key.
#[derive(Clone, Debug, Default)]
pub struct Grouped {
    index: HashMap<String, usize>,
    groups: Vec<(String, Accumulator)>,
}

impl Grouped {
    pub fn new() -> Grouped {
        Grouped::default()
    }

    /// Makes sure `key` has a group, without adding a value to it.
    pub fn touch(&mut self, key: &str) -> &mut Accumulator {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                let idx = self.groups.len();
                self.index.insert(key.to_string(), idx);
                self.groups.push((key.to_string(), Accumulator::default()));
                idx
            }
        };
        &mut self.groups[idx].1
    }

    /// The number of distinct keys seen so far
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The groups in first-seen order.
    pub fn summaries(&self) -> impl Iterator<Item = Summary> + '_ {
        self.groups.iter().map(|(key, acc)| Summary {
            key: key.clone(),
            stats: acc.finish(),
        })
    }
}

impl<'a> Extend<(&'a str, Option<f64>)> for Grouped {
    fn extend<T: IntoIterator<Item = (&'a str, Option<f64>)>>(&mut self, iter: T) {
        for (key, x) in iter {
            self.touch(key).push(x);
        }
    }
}

/// Hooks which run alongside [`group_stats`].
///
/// None of these can change the result; they exist for reporting.
pub trait Observer {
    type Error;

    /// Called once, before the first row is consumed
    fn on_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    /// Called once per group, in output order.  `idx` is 0-based.
    fn on_group(&mut self, _idx: usize, _summary: &Summary) -> Result<(), Self::Error> {
        Ok(())
    }
    /// Called once, after the last group has been emitted
    fn on_finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// An observer which does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;
impl Observer for NoopObserver {
    type Error = std::convert::Infallible;
}

/// Groups the values by key in a single pass, and reduces each group to its
/// sample statistics.  The output has one entry per distinct key, in
/// first-seen order.
pub fn group_stats<'a, O: Observer>(
    rows: impl IntoIterator<Item = (&'a str, Option<f64>)>,
    observer: &mut O,
) -> Result<Vec<Summary>, O::Error> {
    observer.on_start()?;
    let mut grouped = Grouped::new();
    grouped.extend(rows);
    let mut out = Vec::with_capacity(grouped.len());
    for (idx, summary) in grouped.summaries().enumerate() {
        observer.on_group(idx, &summary)?;
        out.push(summary);
    }
    observer.on_finish()?;
    Ok(out)
}

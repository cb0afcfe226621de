//! Package splitters.
//!
//! Each splitter refines a list of packages into a possibly longer list. They
//! never add, drop or duplicate units, they drop empty packages, and a package
//! that needs no splitting is passed through untouched.

mod backordered;
mod shipping_category;
mod weight;

pub use backordered::BackorderedSplitter;
pub use shipping_category::ShippingCategorySplitter;
pub use weight::WeightSplitter;

use crate::config::AllocationConfig;
use crate::package::Package;

/// A pipeline stage that partitions packages by some policy.
pub trait Splitter: core::fmt::Debug + Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    fn split(&self, packages: Vec<Package>) -> Vec<Package>;
}

/// Apply `split_one` to every package and flatten, dropping empty results.
pub(crate) fn split_each(
    packages: Vec<Package>,
    split_one: impl FnMut(Package) -> Vec<Package>,
) -> Vec<Package> {
    packages
        .into_iter()
        .flat_map(split_one)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splitters composed in their fixed order: category, backorder, weight.
#[derive(Debug, Default)]
pub struct SplitterChain {
    splitters: Vec<Box<dyn Splitter>>,
}

impl SplitterChain {
    /// A chain that leaves packages as they are.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AllocationConfig) -> Self {
        let mut splitters: Vec<Box<dyn Splitter>> = Vec::new();
        if config.split_by_shipping_category {
            splitters.push(Box::new(ShippingCategorySplitter));
        }
        if config.split_backorders {
            splitters.push(Box::new(BackorderedSplitter));
        }
        if let Some(threshold) = config.weight_threshold() {
            splitters.push(Box::new(WeightSplitter::new(threshold)));
        }
        Self { splitters }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.splitters.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, packages: Vec<Package>) -> Vec<Package> {
        self.splitters.iter().fold(packages, |packages, splitter| {
            let before = packages.len();
            let after = splitter.split(packages);
            tracing::trace!(splitter = splitter.name(), before, after = after.len(), "split packages");
            after
        })
    }
}

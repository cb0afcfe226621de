use super::{Splitter, split_each};
use crate::package::{ContentItem, Package};

/// Separates on-hand units from backordered ones (on-hand package first).
#[derive(Debug, Clone, Copy, Default)]
pub struct BackorderedSplitter;

impl Splitter for BackorderedSplitter {
    fn name(&self) -> &'static str {
        "backordered"
    }

    fn split(&self, packages: Vec<Package>) -> Vec<Package> {
        split_each(packages, |package| {
            let mixed = package.on_hand().next().is_some() && package.backordered().next().is_some();
            if !mixed {
                return vec![package];
            }
            let location = package.stock_location_id;
            let (backordered, ready): (Vec<ContentItem>, Vec<ContentItem>) = package
                .contents
                .into_iter()
                .partition(|c| c.inventory_unit.is_backordered());
            vec![
                Package::with_contents(location, ready),
                Package::with_contents(location, backordered),
            ]
        })
    }
}

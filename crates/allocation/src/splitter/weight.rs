use shipforge_core::Weight;

use super::{Splitter, split_each};
use crate::package::Package;

/// Divides packages heavier than `threshold`.
///
/// Units are placed first-fit, in their original order, into packages that
/// stay within the threshold. A unit heavier than the threshold on its own
/// ships alone.
#[derive(Debug, Clone, Copy)]
pub struct WeightSplitter {
    threshold: Weight,
}

impl WeightSplitter {
    pub fn new(threshold: Weight) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Weight {
        self.threshold
    }

    fn split_package(&self, package: Package) -> Vec<Package> {
        if package.weight() <= self.threshold {
            return vec![package];
        }
        let location = package.stock_location_id;
        let mut bins: Vec<(Weight, Package)> = Vec::new();

        for item in package.contents {
            let weight = item.weight();
            let fit = bins
                .iter_mut()
                .find(|(load, _)| load.saturating_add(weight) <= self.threshold);
            match fit {
                Some((load, bin)) => {
                    *load = load.saturating_add(weight);
                    bin.add(item);
                }
                None => bins.push((weight, Package::with_contents(location, vec![item]))),
            }
        }

        bins.into_iter().map(|(_, bin)| bin).collect()
    }
}

impl Splitter for WeightSplitter {
    fn name(&self) -> &'static str {
        "weight"
    }

    fn split(&self, packages: Vec<Package>) -> Vec<Package> {
        split_each(packages, |package| self.split_package(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::fixtures::{item, package};
    use shipforge_inventory::InventoryUnitState::OnHand;

    fn splitter() -> WeightSplitter {
        WeightSplitter::new(Weight::from_grams(1_000))
    }

    #[test]
    fn light_package_is_untouched() {
        let p = package(vec![item(1, 10, 400, OnHand, 0), item(2, 10, 600, OnHand, 0)]);
        assert_eq!(splitter().split(vec![p.clone()]), vec![p]);
    }

    #[test]
    fn heavy_package_is_packed_first_fit() {
        let p = package(vec![
            item(1, 10, 600, OnHand, 0),
            item(2, 10, 600, OnHand, 0),
            item(3, 10, 300, OnHand, 0),
            item(4, 10, 400, OnHand, 0),
        ]);
        let out = splitter().split(vec![p]);

        let weights: Vec<u64> = out.iter().map(|p| p.weight().grams()).collect();
        assert_eq!(weights, vec![900, 1000]);
        assert_eq!(out.iter().map(Package::quantity).sum::<u32>(), 4);
    }

    #[test]
    fn overweight_unit_ships_alone() {
        let p = package(vec![
            item(1, 10, 2_500, OnHand, 0),
            item(2, 10, 100, OnHand, 0),
        ]);
        let out = splitter().split(vec![p]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].quantity(), 1);
        assert_eq!(out[0].weight().grams(), 2_500);
        assert_eq!(splitter().split(out.clone()), out);
    }
}

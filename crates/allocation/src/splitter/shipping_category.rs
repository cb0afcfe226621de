use std::collections::BTreeMap;

use shipforge_core::ShippingCategoryId;

use super::{Splitter, split_each};
use crate::package::{ContentItem, Package};

/// Items of different shipping categories never share a package.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingCategorySplitter;

impl Splitter for ShippingCategorySplitter {
    fn name(&self) -> &'static str {
        "shipping_category"
    }

    fn split(&self, packages: Vec<Package>) -> Vec<Package> {
        split_each(packages, |package| {
            if package.shipping_categories().len() <= 1 {
                return vec![package];
            }
            let location = package.stock_location_id;
            let mut groups: BTreeMap<ShippingCategoryId, Vec<ContentItem>> = BTreeMap::new();
            for item in package.contents {
                groups.entry(item.shipping_category_id()).or_default().push(item);
            }
            groups
                .into_values()
                .map(|contents| Package::with_contents(location, contents))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::fixtures::{item, package};
    use shipforge_inventory::InventoryUnitState::OnHand;

    #[test]
    fn splits_by_category_keeping_order_within_group() {
        let p = package(vec![
            item(1, 20, 10, OnHand, 0),
            item(2, 10, 10, OnHand, 0),
            item(3, 20, 10, OnHand, 0),
        ]);
        let out = ShippingCategorySplitter.split(vec![p]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].shipping_categories().len(), 1);
        assert_eq!(out[0].contents[0].variant.sku, "SKU-2");
        let skus: Vec<&str> = out[1].contents.iter().map(|c| c.variant.sku.as_str()).collect();
        assert_eq!(skus, vec!["SKU-1", "SKU-3"]);
    }

    #[test]
    fn single_category_package_is_untouched() {
        let p = package(vec![item(1, 10, 10, OnHand, 0), item(2, 10, 10, OnHand, 0)]);
        assert_eq!(ShippingCategorySplitter.split(vec![p.clone()]), vec![p]);
    }

    #[test]
    fn empty_packages_are_dropped() {
        assert!(ShippingCategorySplitter.split(vec![package(Vec::new())]).is_empty());
    }
}

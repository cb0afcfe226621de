//! Quote a JSON scenario: stock, shipping catalog and an order in, priced
//! packages out.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use shipforge_allocation::{AllocationConfig, Coordinator, OrderRequest, Package, Shortfall};
use shipforge_core::Money;
use shipforge_inventory::SnapshotRecords;
use shipforge_shipping::ShippingCatalog;

/// Command line of `shipforge-quote`.
///
/// Allocation settings come from the scenario's `config` block, overridden by
/// `SHIPFORGE_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "shipforge-quote", author, version, about = "Quote shipping for an order scenario")]
pub struct Args {
    /// Scenario JSON file; `-` or nothing reads stdin.
    pub scenario: Option<PathBuf>,

    /// Also offer back-end-only shipping methods.
    #[arg(long)]
    pub all_methods: bool,

    /// Print single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

impl Args {
    pub fn reads_stdin(&self) -> bool {
        self.scenario.as_deref().is_none_or(|p| p == Path::new("-"))
    }
}

/// Everything one quote needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub stock: SnapshotRecords,
    pub shipping: ShippingCatalog,
    pub order: OrderRequest,
    /// Overrides the defaults; `SHIPFORGE_*` variables still apply on top.
    #[serde(default)]
    pub config: Option<AllocationConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub order_number: String,
    pub packages: Vec<Package>,
    /// Sum of the selected rates; packages without a rate contribute nothing.
    pub shipping_total: Money,
    /// Packages no shipping method can carry.
    pub unshippable_packages: usize,
    pub shortfalls: Vec<Shortfall>,
}

impl Quote {
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

pub fn read_scenario(mut reader: impl Read) -> anyhow::Result<Scenario> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .context("failed to read scenario")?;
    serde_json::from_str(&raw).context("scenario is not valid JSON")
}

/// Scenario settings (or defaults) under the process environment, then flags.
pub fn effective_config(
    scenario: Option<AllocationConfig>,
    args: &Args,
) -> anyhow::Result<AllocationConfig> {
    let mut config = match scenario {
        Some(config) => config.with_env(),
        None => AllocationConfig::from_env(),
    }
    .context("invalid allocation settings")?;
    if args.all_methods {
        config.frontend_only = false;
    }
    Ok(config)
}

pub fn quote(scenario: Scenario, config: &AllocationConfig) -> anyhow::Result<Quote> {
    scenario
        .shipping
        .validate()
        .context("shipping catalog is inconsistent")?;
    let snapshot = scenario
        .stock
        .into_snapshot()
        .context("stock records are inconsistent")?;

    let allocation = Coordinator::new(&snapshot, &scenario.shipping, config)
        .allocate(&scenario.order)
        .with_context(|| format!("cannot allocate order {}", scenario.order.number))?;

    let mut shipping_total = Money::zero(scenario.order.currency.clone());
    let mut unshippable_packages = 0;
    for package in &allocation.packages {
        match package.selected_rate() {
            Some(rate) => {
                shipping_total = shipping_total
                    .checked_add(&rate.cost)
                    .context("shipping total overflow")?;
            }
            None => unshippable_packages += 1,
        }
    }

    Ok(Quote {
        order_number: scenario.order.number,
        packages: allocation.packages,
        shipping_total,
        unshippable_packages,
        shortfalls: allocation.shortfalls,
    })
}

//! The per-order sourcing pipeline.
//!
//! One logical task per order: fetch the data snapshot (three concurrent
//! collaborator calls), run the synchronous allocation engine, resolve any
//! freight cost reviews, annotate, and persist. Concurrency exists only for
//! I/O; the allocation algorithm itself runs single-threaded in the
//! documented deterministic order. Nothing is persisted unless the whole run
//! succeeds.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use shipsource_catalog::SourcingGuideline;
use shipsource_core::{ProductId, SourcingError, SourcingResult, SourcingRunId};
use shipsource_engine::{
    allocate_by_line, allocate_bypass, allocate_complete, annotate, classify, clear_assignments,
    commit_preferred, exceeds_threshold, freight_groups, resolve_eligibility, CostReview,
    FreightGroup, InventoryLedger, OrderSnapshot,
};
use shipsource_orders::{SalesOrder, SourcingRecord};

use crate::alert::Alerter;
use crate::config::SourcingConfig;
use crate::retry::with_retry;
use crate::services::{
    InventoryService, ItemDataService, LocationService, OrderStore, ShippingRateService,
};

/// The collaborator set one pipeline run talks to.
#[derive(Clone)]
pub struct Services {
    pub item_data: Arc<dyn ItemDataService>,
    pub inventory: Arc<dyn InventoryService>,
    pub locations: Arc<dyn LocationService>,
    pub shipping_rates: Arc<dyn ShippingRateService>,
    pub order_store: Arc<dyn OrderStore>,
    pub alerter: Arc<dyn Alerter>,
}

/// Source one order end to end and persist the record.
pub async fn source_order(
    order: &SalesOrder,
    services: &Services,
    config: &SourcingConfig,
) -> SourcingResult<SourcingRecord> {
    let run_id = SourcingRunId::new();
    info!(order_id = %order.order_id, %run_id, "sourcing order");

    if order.destination.postal_code.trim().is_empty() {
        return Err(SourcingError::MissingDestination);
    }
    if !order.has_usable_lines() {
        return Err(SourcingError::NoUsableLines);
    }

    let product_ids = distinct_products(order);
    let alerter = services.alerter.as_ref();

    let (item_data, availability, network) = tokio::try_join!(
        with_retry("item-data", &config.item_data_retry, alerter, || {
            services.item_data.fetch_items(&product_ids)
        }),
        with_retry("inventory", &config.inventory_retry, alerter, || {
            services.inventory.fetch_availability(&product_ids)
        }),
        with_retry("locations", &config.location_retry, alerter, || {
            services
                .locations
                .fetch_network(&order.selling_warehouse, &order.destination)
        }),
    )?;

    let snapshot = OrderSnapshot::new(item_data.items, network, order.selling_warehouse.clone());
    let mut ledger = InventoryLedger::from_tables(availability, item_data.stocking);

    let mut groups = classify(order, &snapshot)?;
    resolve_eligibility(&mut groups, &snapshot);

    // Strategy per guideline group: bypass groups commit the selling
    // warehouse, set-shipping groups allocate complete, everything else goes
    // per-line first.
    let mut reviews: Vec<CostReview> = Vec::new();
    let mut per_line: Vec<SourcingGuideline> = Vec::new();
    for (guideline, lines) in groups.iter_mut() {
        if guideline.bypasses_network() {
            allocate_bypass(lines, &ledger, &snapshot);
        } else if guideline.ships_as_set() {
            reviews.extend(allocate_complete(lines, &mut ledger, &snapshot));
        } else {
            allocate_by_line(lines, &mut ledger, &snapshot);
            per_line.push(guideline);
        }
    }

    // Cost is a global decision: a per-line group split across shipments
    // whose summed freight estimate is excessive re-allocates as a set.
    for guideline in per_line {
        let Some(lines) = groups.group_mut(guideline) else {
            continue;
        };
        let freight = freight_groups(lines, &snapshot);
        if freight.len() < 2 {
            continue;
        }
        let total = estimate_freight(order, services, config, &snapshot, &freight).await?;
        if exceeds_threshold(total, order.shipping_price, config.cost_threshold_multiplier) {
            warn!(
                order_id = %order.order_id,
                %guideline,
                total_estimate = total,
                quoted = order.shipping_price,
                "split freight over threshold; re-allocating group complete"
            );
            let lines = groups.group_mut(guideline).expect("group exists");
            clear_assignments(lines);
            reviews.extend(allocate_complete(lines, &mut ledger, &snapshot));
        }
    }

    // Complete-order commits away from the preferred location: estimate the
    // winning shipment and fall back to the preferred location when the cost
    // is excessive.
    for review in reviews {
        let Some(lines) = groups.group_mut(review.guideline) else {
            continue;
        };
        let member: HashSet<u32> = review.line_nos.iter().copied().collect();
        let weight: f64 = lines
            .iter()
            .filter(|l| member.contains(&l.line_no))
            .map(|l| {
                snapshot
                    .item(&l.product_id)
                    .map(|attrs| attrs.weight * l.requested_qty as f64)
                    .unwrap_or(0.0)
            })
            .sum();
        let shipment = FreightGroup {
            ship_from: review.winner.clone(),
            weight,
            line_nos: review.line_nos.clone(),
        };
        let estimate = estimate_freight(order, services, config, &snapshot, &[shipment]).await?;
        if exceeds_threshold(estimate, order.shipping_price, config.cost_threshold_multiplier) {
            debug!(
                order_id = %order.order_id,
                winner = %review.winner,
                preferred = %review.preferred,
                estimate,
                "winner shipment over threshold; committing preferred location"
            );
            commit_preferred(lines, &review, &mut ledger, &snapshot);
        }
    }

    let record = annotate(order, &groups, &snapshot, run_id, Utc::now());
    persist(services, &record).await?;

    info!(
        order_id = %order.order_id,
        complete = record.complete,
        lines = record.lines.len(),
        "sourcing run persisted"
    );
    Ok(record)
}

/// One freight estimate per distinct ship-from, requested concurrently and
/// summed.
async fn estimate_freight(
    order: &SalesOrder,
    services: &Services,
    config: &SourcingConfig,
    snapshot: &OrderSnapshot,
    shipments: &[FreightGroup],
) -> SourcingResult<u64> {
    let mut join = JoinSet::new();
    for shipment in shipments {
        let Some(origin) = snapshot.location(&shipment.ship_from).map(|l| l.address.clone())
        else {
            continue;
        };
        let rates = services.shipping_rates.clone();
        let alerter = services.alerter.clone();
        let policy = config.freight_retry.clone();
        let destination = order.destination.clone();
        let ship_from = shipment.ship_from.clone();
        let weight = shipment.weight;

        join.spawn(async move {
            let cost = with_retry("shipping-rate", &policy, alerter.as_ref(), || {
                rates.estimate(&origin, &destination, weight)
            })
            .await?;
            if cost == 0 {
                warn!(location = %ship_from, weight, "shipping-rate service returned a zero estimate");
            }
            Ok::<u64, SourcingError>(cost)
        });
    }

    let mut total = 0u64;
    while let Some(joined) = join.join_next().await {
        let cost =
            joined.map_err(|e| SourcingError::collaborator("shipping-rate", e.to_string()))??;
        total += cost;
    }
    Ok(total)
}

async fn persist(services: &Services, record: &SourcingRecord) -> SourcingResult<()> {
    services
        .order_store
        .upsert(record)
        .await
        .map_err(|e| SourcingError::collaborator("order-store", e.to_string()))
}

/// Distinct usable product ids, in first appearance order.
fn distinct_products(order: &SalesOrder) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    let mut products = Vec::new();
    for line in order.lines.iter().filter(|l| l.is_usable()) {
        let trimmed = line.product.trim();
        if seen.insert(trimmed.to_string()) {
            if let Ok(product) = ProductId::new(trimmed) {
                products.push(product);
            }
        }
    }
    products
}

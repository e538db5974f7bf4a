use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::InsightSource;
use crate::sync::LoadStatus;
use crate::targets;
use crate::{
    ApiError, CategoryValue, DashboardMetrics, FinancialSummary, LocationValue, LowStockItem,
    format_money,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub note: &'static str,
}

/// Dashboard metrics and the financial summary, loaded side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub status: LoadStatus,
    pub metrics: DashboardMetrics,
    pub financial: FinancialSummary,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            metrics: DashboardMetrics::default(),
            financial: FinancialSummary::default(),
        }
    }
}

impl DashboardSnapshot {
    pub fn metric_cards(&self) -> Vec<MetricCard> {
        let metrics = &self.metrics;
        vec![
            MetricCard {
                label: "Total Items",
                value: metrics.total_items.to_string(),
                note: "Across all locations",
            },
            MetricCard {
                label: "Low Stock",
                value: metrics.low_stock_count.to_string(),
                note: "Below minimum stock",
            },
            MetricCard {
                label: "Locations",
                value: metrics.total_locations.to_string(),
                note: "Schools and offices",
            },
            MetricCard {
                label: "Printers",
                value: metrics.total_printers.to_string(),
                note: "Registered devices",
            },
        ]
    }

    pub fn financial_cards(&self) -> Vec<MetricCard> {
        let metrics = &self.metrics;
        vec![
            MetricCard {
                label: "Total Spent",
                value: format_money(metrics.total_spent),
                note: "All transactions",
            },
            MetricCard {
                label: "Pending Payments",
                value: format_money(metrics.pending_payments),
                note: "Awaiting payment",
            },
            MetricCard {
                label: "Received",
                value: format_money(metrics.paid_amount),
                note: "Paid transactions",
            },
        ]
    }
}

/// Low-stock list and inventory value breakdowns.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportsSnapshot {
    pub status: LoadStatus,
    pub low_stock: Vec<LowStockItem>,
    pub by_category: Vec<CategoryValue>,
    pub by_location: Vec<LocationValue>,
}

impl Default for ReportsSnapshot {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            low_stock: Vec::new(),
            by_category: Vec::new(),
            by_location: Vec::new(),
        }
    }
}

impl ReportsSnapshot {
    pub fn total_inventory_value(&self) -> f64 {
        self.by_category.iter().map(|row| row.total_value).sum()
    }

    pub fn total_quantity(&self) -> u64 {
        self.by_category.iter().map(|row| row.total_quantity).sum()
    }

    /// Percentage of the total inventory value, rounded to one decimal.
    pub fn share_of_total(&self, value: f64) -> f64 {
        let total = self.total_inventory_value();
        if total <= 0.0 {
            return 0.0;
        }
        (value / total * 1000.0).round() / 10.0
    }
}

pub async fn load_dashboard(source: Arc<dyn InsightSource>) -> DashboardSnapshot {
    let (metrics, financial) = tokio::join!(source.dashboard_metrics(), source.financial_summary());
    let status = combined_status([metrics.as_ref().err(), financial.as_ref().err()]);
    debug!(target: targets::SYNC, ?status, "Dashboard loaded");

    DashboardSnapshot {
        status,
        metrics: tolerate(metrics, "dashboard metrics"),
        financial: tolerate(financial, "financial summary"),
    }
}

pub async fn load_reports(source: Arc<dyn InsightSource>) -> ReportsSnapshot {
    let (low_stock, value) = tokio::join!(source.low_stock(), source.inventory_value());
    let status = combined_status([low_stock.as_ref().err(), value.as_ref().err()]);
    debug!(target: targets::SYNC, ?status, "Reports loaded");

    let value = tolerate(value, "inventory value report");
    ReportsSnapshot {
        status,
        low_stock: tolerate(low_stock, "low stock report"),
        by_category: value.by_category,
        by_location: value.by_location,
    }
}

/// `Error` only when every part failed; the first failure is kept.
fn combined_status<const N: usize>(errors: [Option<&ApiError>; N]) -> LoadStatus {
    if errors.iter().all(Option::is_some) {
        if let Some(Some(first)) = errors.first() {
            return LoadStatus::Error((*first).clone());
        }
    }
    LoadStatus::Ready
}

fn tolerate<T: Default>(result: Result<T, ApiError>, part: &str) -> T {
    result.unwrap_or_else(|error| {
        warn!(
            target: targets::SYNC,
            part,
            "Partial data: {}",
            error.technical_detail()
        );
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiFuture;
    use crate::{InventoryValueReport, RecordId};

    fn run_future<T>(future: impl std::future::Future<Output = T>) -> T {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("tokio runtime");
        runtime.block_on(future)
    }

    #[derive(Default)]
    struct FixedInsights {
        metrics: Option<DashboardMetrics>,
        financial: Option<FinancialSummary>,
        low_stock: Option<Vec<LowStockItem>>,
        value: Option<InventoryValueReport>,
    }

    fn answer<T: Clone + Send + 'static>(value: &Option<T>, path: &str) -> ApiFuture<'static, T> {
        let result = value.clone().ok_or_else(|| ApiError::Network {
            endpoint: format!("GET {path}"),
            details: "connection refused".to_string(),
        });
        Box::pin(async move { result })
    }

    impl InsightSource for FixedInsights {
        fn dashboard_metrics(&self) -> ApiFuture<'_, DashboardMetrics> {
            answer(&self.metrics, "/api/dashboard/metrics")
        }

        fn financial_summary(&self) -> ApiFuture<'_, FinancialSummary> {
            answer(&self.financial, "/api/financial/summary")
        }

        fn low_stock(&self) -> ApiFuture<'_, Vec<LowStockItem>> {
            answer(&self.low_stock, "/api/reports/low-stock")
        }

        fn inventory_value(&self) -> ApiFuture<'_, InventoryValueReport> {
            answer(&self.value, "/api/reports/inventory-value")
        }
    }

    fn category(name: &str, total_value: f64, total_quantity: u64) -> CategoryValue {
        CategoryValue {
            category: name.to_string(),
            total_value,
            total_quantity,
        }
    }

    #[test]
    fn dashboard_cards_format_counts_and_money() {
        let snapshot = DashboardSnapshot {
            status: LoadStatus::Ready,
            metrics: DashboardMetrics {
                total_items: 42,
                low_stock_count: 3,
                total_locations: 4,
                total_printers: 7,
                total_spent: 1234.5,
                pending_payments: 10.0,
                paid_amount: 1224.5,
            },
            financial: FinancialSummary::default(),
        };

        let cards = snapshot.metric_cards();
        assert_eq!(cards[0].label, "Total Items");
        assert_eq!(cards[0].value, "42");
        assert_eq!(cards[1].value, "3");

        let money: Vec<_> = snapshot
            .financial_cards()
            .into_iter()
            .map(|card| card.value)
            .collect();
        assert_eq!(money, vec!["$1234.50", "$10.00", "$1224.50"]);
    }

    #[test]
    fn partial_dashboard_is_ready_with_defaults() {
        let source = FixedInsights {
            metrics: Some(DashboardMetrics {
                total_items: 5,
                ..DashboardMetrics::default()
            }),
            ..FixedInsights::default()
        };

        let snapshot = run_future(load_dashboard(Arc::new(source)));

        assert_eq!(snapshot.status, LoadStatus::Ready);
        assert_eq!(snapshot.metrics.total_items, 5);
        assert_eq!(snapshot.financial, FinancialSummary::default());
    }

    #[test]
    fn dashboard_errors_when_every_part_fails() {
        let snapshot = run_future(load_dashboard(Arc::new(FixedInsights::default())));
        match snapshot.status {
            LoadStatus::Error(error) => assert!(error.is_network()),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn report_totals_and_shares() {
        let source = FixedInsights {
            low_stock: Some(vec![LowStockItem {
                id: RecordId(3),
                name: "Paper A4".to_string(),
                sku: "PA4".to_string(),
                category_name: "Paper".to_string(),
                location_name: "Main School".to_string(),
                quantity: 2,
                min_stock: 10,
                price: 4.0,
                total_value: 8.0,
            }]),
            value: Some(InventoryValueReport {
                by_category: vec![category("Toner", 300.0, 6), category("Paper", 100.0, 40)],
                by_location: Vec::new(),
            }),
            ..FixedInsights::default()
        };

        let snapshot = run_future(load_reports(Arc::new(source)));

        assert_eq!(snapshot.status, LoadStatus::Ready);
        assert_eq!(snapshot.low_stock.len(), 1);
        assert_eq!(snapshot.total_inventory_value(), 400.0);
        assert_eq!(snapshot.total_quantity(), 46);
        assert_eq!(snapshot.share_of_total(300.0), 75.0);
        assert_eq!(snapshot.share_of_total(100.0 / 3.0), 8.3);
    }

    #[test]
    fn share_is_zero_without_inventory_value() {
        let snapshot = ReportsSnapshot::default();
        assert_eq!(snapshot.share_of_total(10.0), 0.0);
    }
}

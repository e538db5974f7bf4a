use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: RecordId,
    pub name: String,
    pub sku: String,
    pub category_id: RecordId,
    #[serde(default)]
    pub category_name: String,
    pub quantity: u32,
    pub min_stock: u32,
    pub price: f64,
    #[serde(default)]
    pub total_price: f64,
    pub location_id: RecordId,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub printer_id: Option<RecordId>,
    #[serde(default)]
    pub printer_name: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_stock
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPayload {
    pub name: String,
    pub sku: String,
    pub category_id: RecordId,
    pub quantity: u32,
    pub min_stock: u32,
    pub price: f64,
    pub location_id: RecordId,
    pub printer_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: u32,
    #[serde(default)]
    pub printers: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrinterStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
    Other(String),
}

impl PrinterStatus {
    pub const CHOICES: [PrinterStatus; 3] = [
        PrinterStatus::Active,
        PrinterStatus::Maintenance,
        PrinterStatus::Inactive,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PrinterStatus::Active => "Active",
            PrinterStatus::Maintenance => "Maintenance",
            PrinterStatus::Inactive => "Inactive",
            PrinterStatus::Other(value) => value,
        }
    }
}

impl From<String> for PrinterStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "Active" => PrinterStatus::Active,
            "Maintenance" => PrinterStatus::Maintenance,
            "Inactive" => PrinterStatus::Inactive,
            _ => PrinterStatus::Other(value),
        }
    }
}

impl From<PrinterStatus> for String {
    fn from(value: PrinterStatus) -> Self {
        match value {
            PrinterStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Printer {
    pub id: RecordId,
    pub model: String,
    pub serial_number: String,
    pub location_id: RecordId,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub status: PrinterStatus,
    #[serde(default)]
    pub supplies: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterPayload {
    pub model: String,
    pub serial_number: String,
    pub location_id: RecordId,
    pub status: PrinterStatus,
    pub supplies: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
}

/// Lookup list feeding a selection input. Only ever fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Categories,
    Locations,
    Printers,
}

impl ReferenceKind {
    pub fn path(self) -> &'static str {
        match self {
            ReferenceKind::Categories => "categories",
            ReferenceKind::Locations => "locations",
            ReferenceKind::Printers => "printers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOption {
    pub id: RecordId,
    pub label: String,
}

impl ReferenceOption {
    pub fn new(id: RecordId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

impl From<Category> for ReferenceOption {
    fn from(value: Category) -> Self {
        Self::new(value.id, value.name)
    }
}

impl From<Location> for ReferenceOption {
    fn from(value: Location) -> Self {
        Self::new(value.id, value.name)
    }
}

impl From<Printer> for ReferenceOption {
    fn from(value: Printer) -> Self {
        Self::new(value.id, format!("{} ({})", value.model, value.location_name))
    }
}

impl fmt::Display for ReferenceOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    pub categories: Vec<ReferenceOption>,
    pub locations: Vec<ReferenceOption>,
    pub printers: Vec<ReferenceOption>,
}

impl ReferenceSet {
    pub fn get(&self, kind: ReferenceKind) -> &[ReferenceOption] {
        match kind {
            ReferenceKind::Categories => &self.categories,
            ReferenceKind::Locations => &self.locations,
            ReferenceKind::Printers => &self.printers,
        }
    }

    pub fn set(&mut self, kind: ReferenceKind, options: Vec<ReferenceOption>) {
        match kind {
            ReferenceKind::Categories => self.categories = options,
            ReferenceKind::Locations => self.locations = options,
            ReferenceKind::Printers => self.printers = options,
        }
    }

    pub fn label_of(&self, kind: ReferenceKind, id: RecordId) -> Option<&str> {
        self.get(kind)
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.label.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardMetrics {
    pub total_items: u64,
    pub low_stock_count: u64,
    pub total_locations: u64,
    pub total_printers: u64,
    pub total_spent: f64,
    pub pending_payments: f64,
    pub paid_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSpend {
    pub location: String,
    pub total: f64,
    pub pending: f64,
    pub paid: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSummary {
    pub total_spent: f64,
    pub total_pending: f64,
    pub total_paid: f64,
    pub transactions_by_location: Vec<LocationSpend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub id: RecordId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub location_name: String,
    pub quantity: u32,
    pub min_stock: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryValue {
    pub category: String,
    pub total_value: f64,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationValue {
    pub location: String,
    pub total_value: f64,
    pub item_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryValueReport {
    pub by_category: Vec<CategoryValue>,
    pub by_location: Vec<LocationValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    #[default]
    Manager,
    Other(String),
}

impl Role {
    pub const SIGNUP_CHOICES: [Role; 2] = [Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Other(value) => value,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.trim() {
            "Admin" => Role::Admin,
            "Manager" => Role::Manager,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub fn format_money(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_item_tolerates_missing_joined_fields() {
        let json = r#"{
            "id": 7, "name": "Toner", "sku": "TCB-001", "category_id": 2,
            "quantity": 1, "min_stock": 4, "price": 19.5, "location_id": 3
        }"#;
        let item: InventoryItem = serde_json::from_str(json).expect("decode item");
        assert_eq!(item.id, RecordId(7));
        assert_eq!(item.printer_id, None);
        assert!(item.location_name.is_empty());
        assert!(item.is_low_stock());
    }

    #[test]
    fn printer_status_keeps_unknown_values() {
        let printer: Printer = serde_json::from_str(
            r#"{"id":1,"model":"IM C3000","serial_number":"S1","location_id":2,
                "location_name":"Main School","status":"Retired","supplies":null}"#,
        )
        .expect("decode printer");
        assert_eq!(printer.status, PrinterStatus::Other("Retired".to_string()));

        let encoded = serde_json::to_value(&printer).expect("encode printer");
        assert_eq!(encoded["status"], "Retired");
    }

    #[test]
    fn missing_status_and_role_fall_back_to_defaults() {
        let printer: Printer = serde_json::from_str(
            r#"{"id":1,"model":"IM C3000","serial_number":"S1","location_id":2}"#,
        )
        .expect("decode printer");
        assert_eq!(printer.status, PrinterStatus::Active);
        assert_eq!(Role::default(), Role::Manager);
    }

    #[test]
    fn printer_reference_label_includes_location() {
        let printer = Printer {
            id: RecordId(4),
            model: "IM C3000".to_string(),
            serial_number: "S1".to_string(),
            location_id: RecordId(2),
            location_name: "Main School".to_string(),
            status: PrinterStatus::Active,
            supplies: None,
        };
        let option = ReferenceOption::from(printer);
        assert_eq!(option.label, "IM C3000 (Main School)");
    }

    #[test]
    fn reference_set_resolves_labels_by_kind() {
        let mut references = ReferenceSet::default();
        references.set(
            ReferenceKind::Locations,
            vec![ReferenceOption::new(RecordId(3), "Central Office")],
        );
        assert_eq!(
            references.label_of(ReferenceKind::Locations, RecordId(3)),
            Some("Central Office")
        );
        assert_eq!(references.label_of(ReferenceKind::Categories, RecordId(3)), None);
    }

    #[test]
    fn session_defaults_role_when_missing() {
        let session: Session =
            serde_json::from_str(r#"{"username":"dana","email":"dana@example.com"}"#)
                .expect("decode session");
        assert_eq!(session.role, Role::Manager);
    }
}

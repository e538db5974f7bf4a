use crate::form::Draft;
use crate::{
    FormError, InventoryItem, InventoryPayload, Location, LocationPayload, Printer,
    PrinterPayload, PrinterStatus, RecordId,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryDraft {
    pub name: String,
    pub sku: String,
    pub category_id: String,
    pub quantity: String,
    pub min_stock: String,
    pub price: String,
    pub location_id: String,
    pub printer_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryField {
    Name,
    Sku,
    CategoryId,
    Quantity,
    MinStock,
    Price,
    LocationId,
    PrinterId,
}

impl InventoryDraft {
    /// Quantity times unit price, when both inputs read as numbers.
    ///
    /// Presentation only: the payload never carries it.
    pub fn line_total(&self) -> Option<f64> {
        let quantity = parse_number(&self.quantity)?;
        let price = parse_number(&self.price)?;
        Some(quantity * price)
    }

    pub fn line_total_label(&self) -> Option<String> {
        self.line_total().map(|total| format!("{total:.2}"))
    }
}

impl Draft for InventoryDraft {
    type Record = InventoryItem;
    type Payload = InventoryPayload;
    type Field = InventoryField;

    fn from_record(record: &InventoryItem) -> Self {
        Self {
            name: record.name.clone(),
            sku: record.sku.clone(),
            category_id: record.category_id.to_string(),
            quantity: record.quantity.to_string(),
            min_stock: record.min_stock.to_string(),
            price: record.price.to_string(),
            location_id: record.location_id.to_string(),
            printer_id: optional_id_text(record.printer_id),
        }
    }

    fn field(&self, field: InventoryField) -> &str {
        match field {
            InventoryField::Name => &self.name,
            InventoryField::Sku => &self.sku,
            InventoryField::CategoryId => &self.category_id,
            InventoryField::Quantity => &self.quantity,
            InventoryField::MinStock => &self.min_stock,
            InventoryField::Price => &self.price,
            InventoryField::LocationId => &self.location_id,
            InventoryField::PrinterId => &self.printer_id,
        }
    }

    fn set_field(&mut self, field: InventoryField, value: String) {
        let slot = match field {
            InventoryField::Name => &mut self.name,
            InventoryField::Sku => &mut self.sku,
            InventoryField::CategoryId => &mut self.category_id,
            InventoryField::Quantity => &mut self.quantity,
            InventoryField::MinStock => &mut self.min_stock,
            InventoryField::Price => &mut self.price,
            InventoryField::LocationId => &mut self.location_id,
            InventoryField::PrinterId => &mut self.printer_id,
        };
        *slot = value;
    }

    fn build_payload(&self) -> Result<InventoryPayload, FormError> {
        Ok(InventoryPayload {
            name: required_text(&self.name, "name", "Item name")?,
            sku: required_text(&self.sku, "sku", "SKU")?,
            category_id: required_id(&self.category_id, "category_id", "a category")?,
            quantity: required_count(&self.quantity, "quantity", "Quantity")?,
            min_stock: required_count(&self.min_stock, "min_stock", "Min stock")?,
            price: required_price(&self.price, "price", "Price")?,
            location_id: required_id(&self.location_id, "location_id", "a location")?,
            printer_id: optional_id(&self.printer_id, "printer_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationDraft {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Name,
    Address,
}

impl Draft for LocationDraft {
    type Record = Location;
    type Payload = LocationPayload;
    type Field = LocationField;

    fn from_record(record: &Location) -> Self {
        Self {
            name: record.name.clone(),
            address: record.address.clone(),
        }
    }

    fn field(&self, field: LocationField) -> &str {
        match field {
            LocationField::Name => &self.name,
            LocationField::Address => &self.address,
        }
    }

    fn set_field(&mut self, field: LocationField, value: String) {
        match field {
            LocationField::Name => self.name = value,
            LocationField::Address => self.address = value,
        }
    }

    fn build_payload(&self) -> Result<LocationPayload, FormError> {
        Ok(LocationPayload {
            name: required_text(&self.name, "name", "Location name")?,
            address: self.address.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrinterDraft {
    pub model: String,
    pub serial_number: String,
    pub location_id: String,
    pub status: String,
    pub supplies: String,
}

impl Default for PrinterDraft {
    fn default() -> Self {
        Self {
            model: String::new(),
            serial_number: String::new(),
            location_id: String::new(),
            status: PrinterStatus::default().to_string(),
            supplies: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterField {
    Model,
    SerialNumber,
    LocationId,
    Status,
    Supplies,
}

impl Draft for PrinterDraft {
    type Record = Printer;
    type Payload = PrinterPayload;
    type Field = PrinterField;

    fn from_record(record: &Printer) -> Self {
        Self {
            model: record.model.clone(),
            serial_number: record.serial_number.clone(),
            location_id: record.location_id.to_string(),
            status: record.status.to_string(),
            supplies: record.supplies.clone().unwrap_or_default(),
        }
    }

    fn field(&self, field: PrinterField) -> &str {
        match field {
            PrinterField::Model => &self.model,
            PrinterField::SerialNumber => &self.serial_number,
            PrinterField::LocationId => &self.location_id,
            PrinterField::Status => &self.status,
            PrinterField::Supplies => &self.supplies,
        }
    }

    fn set_field(&mut self, field: PrinterField, value: String) {
        let slot = match field {
            PrinterField::Model => &mut self.model,
            PrinterField::SerialNumber => &mut self.serial_number,
            PrinterField::LocationId => &mut self.location_id,
            PrinterField::Status => &mut self.status,
            PrinterField::Supplies => &mut self.supplies,
        };
        *slot = value;
    }

    fn build_payload(&self) -> Result<PrinterPayload, FormError> {
        let status = required_text(&self.status, "status", "Status")?;
        let supplies = self.supplies.trim();
        Ok(PrinterPayload {
            model: required_text(&self.model, "model", "Model")?,
            serial_number: required_text(&self.serial_number, "serial_number", "Serial number")?,
            location_id: required_id(&self.location_id, "location_id", "a location")?,
            status: PrinterStatus::from(status),
            supplies: (!supplies.is_empty()).then(|| supplies.to_string()),
        })
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn optional_id_text(id: Option<RecordId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn required_text(value: &str, field: &'static str, label: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::new(field, format!("{label} is required.")));
    }
    Ok(trimmed.to_string())
}

fn required_count(value: &str, field: &'static str, label: &str) -> Result<u32, FormError> {
    value.trim().parse::<u32>().map_err(|_| {
        FormError::new(field, format!("{label} must be a whole number of zero or more."))
    })
}

fn required_price(value: &str, field: &'static str, label: &str) -> Result<f64, FormError> {
    match parse_number(value) {
        Some(price) if price >= 0.0 => Ok(price),
        _ => Err(FormError::new(
            field,
            format!("{label} must be a number of zero or more."),
        )),
    }
}

fn required_id(value: &str, field: &'static str, what: &str) -> Result<RecordId, FormError> {
    value
        .trim()
        .parse::<u64>()
        .map(RecordId)
        .map_err(|_| FormError::new(field, format!("Select {what}.")))
}

fn optional_id(value: &str, field: &'static str) -> Result<Option<RecordId>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(|id| Some(RecordId(id)))
        .map_err(|_| FormError::new(field, format!("Unknown selection: {trimmed}.")))
}

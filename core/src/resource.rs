use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::draft::{InventoryDraft, LocationDraft, PrinterDraft};
use crate::form::Draft;
use crate::{
    InventoryItem, InventoryPayload, Location, LocationPayload, Printer, PrinterPayload,
    RecordId, ReferenceKind,
};

/// One REST collection under `/api/<PATH>` together with its typed record,
/// payload and draft.
pub trait Resource: fmt::Debug + Clone + Send + Sync + 'static {
    type Record: fmt::Debug
        + Clone
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Payload: fmt::Debug
        + Clone
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;
    type Draft: Draft<Record = Self::Record, Payload = Self::Payload>;

    const PATH: &'static str;
    /// Singular noun used in user-facing messages.
    const LABEL: &'static str;
    /// Reference collections the view loads next to the primary list.
    const REFERENCES: &'static [ReferenceKind];

    fn record_id(record: &Self::Record) -> RecordId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryResource;

impl Resource for InventoryResource {
    type Record = InventoryItem;
    type Payload = InventoryPayload;
    type Draft = InventoryDraft;

    const PATH: &'static str = "inventory";
    const LABEL: &'static str = "item";
    const REFERENCES: &'static [ReferenceKind] = &[
        ReferenceKind::Categories,
        ReferenceKind::Locations,
        ReferenceKind::Printers,
    ];

    fn record_id(record: &InventoryItem) -> RecordId {
        record.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationResource;

impl Resource for LocationResource {
    type Record = Location;
    type Payload = LocationPayload;
    type Draft = LocationDraft;

    const PATH: &'static str = "locations";
    const LABEL: &'static str = "location";
    const REFERENCES: &'static [ReferenceKind] = &[];

    fn record_id(record: &Location) -> RecordId {
        record.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterResource;

impl Resource for PrinterResource {
    type Record = Printer;
    type Payload = PrinterPayload;
    type Draft = PrinterDraft;

    const PATH: &'static str = "printers";
    const LABEL: &'static str = "printer";
    const REFERENCES: &'static [ReferenceKind] = &[ReferenceKind::Locations];

    fn record_id(record: &Printer) -> RecordId {
        record.id
    }
}

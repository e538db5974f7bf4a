pub mod auth;
pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod insights;
#[cfg(test)]
mod mock;
pub mod model;
pub mod resource;
pub mod sync;
pub mod targets;

pub use auth::{
    AuthFuture, Authenticator, Credentials, DemoAuthenticator, DemoUser, Registrar, SignupForm,
    sign_up,
};
pub use client::{
    ApiFuture, ClientConfig, CollectionClient, InsightSource, ReferenceSource, RestClient,
};
pub use config::{AppConfig, LogLevel};
pub use draft::{
    InventoryDraft, InventoryField, LocationDraft, LocationField, PrinterDraft, PrinterField,
};
pub use error::{ApiError, AuthError, CONNECTION_FAILURE, ConfigError, FormError, StorageAction};
pub use form::{Draft, FormController, FormMode, FormState, OpenForm, Submission};
pub use insights::{DashboardSnapshot, MetricCard, ReportsSnapshot, load_dashboard, load_reports};
pub use model::{
    Category, CategoryValue, DashboardMetrics, FinancialSummary, InventoryItem, InventoryPayload,
    InventoryValueReport, Location, LocationPayload, LocationSpend, LocationValue, LowStockItem,
    Printer, PrinterPayload, PrinterStatus, RecordId, ReferenceKind, ReferenceOption,
    ReferenceSet, Registration, Role, Session, format_money,
};
pub use resource::{InventoryResource, LocationResource, PrinterResource, Resource};
pub use sync::{
    CollectionState, CollectionView, DeleteOutcome, LoadOutcome, LoadStatus, Mutation,
    Reconciliation, TaskFuture,
};

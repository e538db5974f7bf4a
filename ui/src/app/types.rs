use std::path::PathBuf;
use std::sync::Arc;

use ims_core::{
    ApiError, AppConfig, AuthError, Authenticator, CollectionView, DashboardSnapshot,
    DeleteOutcome, Draft, InventoryResource, LoadOutcome, LocationResource, LogLevel,
    PrinterResource, RecordId, ReportsSnapshot, Resource, RestClient, Role, Session, SignupForm,
};

use crate::logging::{LogStore, ReloadHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Inventory,
    Locations,
    Printers,
    Reports,
    Diagnostics,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Inventory,
        Tab::Locations,
        Tab::Printers,
        Tab::Reports,
        Tab::Diagnostics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Inventory => "Inventory",
            Tab::Locations => "Locations",
            Tab::Printers => "Printers",
            Tab::Reports => "Reports",
            Tab::Diagnostics => "Diagnostics",
        }
    }
}

/// Everything one CRUD view can be asked to do.
#[derive(Debug, Clone)]
pub enum CollectionMessage<R: Resource> {
    Refresh,
    Loaded(LoadOutcome<R>),
    OpenCreate,
    OpenEdit(RecordId),
    FieldChanged(<R::Draft as Draft>::Field, String),
    Cancel,
    Submit,
    Submitted(Result<R::Record, ApiError>),
    RequestDelete(RecordId),
    DeclineDelete,
    ConfirmDelete,
    Deleted(DeleteOutcome),
    DismissAlert,
}

#[derive(Debug, Clone)]
pub enum Message {
    LoginUsernameChanged(String),
    LoginPasswordChanged(String),
    SubmitLogin,
    LoginFinished(Result<Session, AuthError>),
    ShowSignup,
    ShowLogin,
    SignupUsernameChanged(String),
    SignupEmailChanged(String),
    SignupPasswordChanged(String),
    SignupConfirmChanged(String),
    SignupRoleChanged(Role),
    SubmitSignup,
    SignupFinished(Result<Session, AuthError>),
    Logout,
    SelectTab(Tab),
    Inventory(CollectionMessage<InventoryResource>),
    Locations(CollectionMessage<LocationResource>),
    Printers(CollectionMessage<PrinterResource>),
    RefreshDashboard,
    DashboardLoaded(DashboardSnapshot),
    RefreshReports,
    ReportsLoaded(ReportsSnapshot),
    LogTick,
    LogLevelChanged(LogLevel),
    ToggleTarget(String, bool),
    CopyDiagnostics,
    SaveLogLevel,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LoginState {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) error: Option<String>,
    pub(crate) submitting: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SignupState {
    pub(crate) form: SignupForm,
    pub(crate) error: Option<String>,
    pub(crate) submitting: bool,
}

/// Per-session state; dropped wholesale on logout.
pub(crate) struct Workspace {
    pub(crate) session: Session,
    pub(crate) tab: Tab,
    pub(crate) inventory: CollectionView<InventoryResource>,
    pub(crate) locations: CollectionView<LocationResource>,
    pub(crate) printers: CollectionView<PrinterResource>,
    pub(crate) dashboard: DashboardSnapshot,
    pub(crate) reports: ReportsSnapshot,
}

impl Workspace {
    pub(crate) fn new(session: Session, client: &Arc<RestClient>) -> Self {
        Self {
            session,
            tab: Tab::Dashboard,
            inventory: CollectionView::new(client.clone(), client.clone()),
            locations: CollectionView::new(client.clone(), client.clone()),
            printers: CollectionView::new(client.clone(), client.clone()),
            dashboard: DashboardSnapshot::default(),
            reports: ReportsSnapshot::default(),
        }
    }
}

pub(crate) enum Screen {
    Login(LoginState),
    Signup(SignupState),
    Dashboard(Box<Workspace>),
}

pub struct Flags {
    pub log_store: LogStore,
    pub reload_handle: ReloadHandle,
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub client: RestClient,
    pub authenticator: Arc<dyn Authenticator>,
}

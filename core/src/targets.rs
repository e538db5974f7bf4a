pub const HTTP: &str = "ims::http";
pub const SYNC: &str = "ims::sync";
pub const FORM: &str = "ims::form";
pub const AUTH: &str = "ims::auth";
pub const CONFIG: &str = "ims::config";
pub const UI: &str = "ims::ui";

pub const ALL: [&str; 6] = [HTTP, SYNC, FORM, AUTH, CONFIG, UI];

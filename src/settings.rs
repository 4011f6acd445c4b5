//! Process-wide system settings.
//!
//! One manager instance is constructed at application start and passed by
//! reference to whatever needs it. Persistence sits behind the small
//! [`SettingsStore`] seam so tests can swap in a memory double.
//!
//! Loading deep-merges the persisted blob over the hard-coded defaults, so
//! fields added in later releases backfill from defaults while old persisted
//! values win where present. The blob carries no schema-version field; a
//! field rename would silently lose the old value on merge. That is
//! reproduced from the system being replicated, not an endorsement.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SettingsError;
use crate::validation::{validate_email, validate_hex_color};

/// Company identity and locale defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub timezone: String,
    pub currency: String,
    pub date_format: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            company_name: "OpsDesk".into(),
            contact_email: "admin@opsdesk.example".into(),
            contact_phone: String::new(),
            timezone: "Asia/Kolkata".into(),
            currency: "INR".into(),
            date_format: "DD/MM/YYYY".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingSettings {
    pub primary_color: String,
    pub accent_color: String,
    pub logo_url: String,
    pub dark_mode: bool,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        BrandingSettings {
            primary_color: "#1D4ED8".into(),
            accent_color: "#F59E0B".into(),
            logo_url: String::new(),
            dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub whatsapp_enabled: bool,
    pub digest_hour: u8,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            email_enabled: true,
            sms_enabled: false,
            whatsapp_enabled: false,
            digest_hour: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordPolicy {
    pub min_length: u32,
    pub require_uppercase: bool,
    pub require_number: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_length: 10,
            require_uppercase: true,
            require_number: true,
            require_symbol: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySettings {
    pub session_timeout_minutes: u32,
    pub two_factor_required: bool,
    pub password_policy: PasswordPolicy,
    pub ip_allowlist: Vec<String>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        SecuritySettings {
            session_timeout_minutes: 30,
            two_factor_required: false,
            password_policy: PasswordPolicy::default(),
            ip_allowlist: Vec::new(),
        }
    }
}

/// Map-shaped by design: unknown persisted keys survive the typed boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationSettings {
    pub endpoints: HashMap<String, String>,
    pub api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureSettings {
    pub modules: HashMap<String, bool>,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        let enabled = [
            "clients",
            "orders",
            "leads",
            "finance",
            "employees",
            "consultants",
            "documents",
            "communications",
            "notifications",
            "security",
            "analytics",
        ];
        let mut modules: HashMap<String, bool> =
            enabled.iter().map(|m| (m.to_string(), true)).collect();
        modules.insert("payroll".into(), false);
        modules.insert("inventory".into(), false);
        FeatureSettings { modules }
    }
}

/// The full persisted configuration object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub general: GeneralSettings,
    pub branding: BrandingSettings,
    pub notifications: NotificationSettings,
    pub security: SecuritySettings,
    pub integrations: IntegrationSettings,
    pub features: FeatureSettings,
}

/// Top-level section names recognized by the update methods.
const SECTIONS: [&str; 6] = [
    "general",
    "branding",
    "notifications",
    "security",
    "integrations",
    "features",
];

/// Storage seam for the settings blob.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Option<Value>;

    fn save(&self, blob: &Value) -> Result<(), SettingsError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for std::sync::Arc<T> {
    fn load(&self) -> Option<Value> {
        (**self).load()
    }

    fn save(&self, blob: &Value) -> Result<(), SettingsError> {
        (**self).save(blob)
    }
}

/// File-backed store under `~/.opsdesk/settings.json`.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        FileSettingsStore {
            path: home.join(".opsdesk").join("settings.json"),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        FileSettingsStore { path }
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Option<Value> {
        if !self.path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable settings file: {}", e);
                None
            }
        }
    }

    fn save(&self, blob: &Value) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::Write(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(blob)
            .map_err(|e| SettingsError::Write(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| SettingsError::Write(e.to_string()))
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemorySettingsStore {
    blob: RwLock<Option<Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Option<Value> {
        self.blob.read().clone()
    }

    fn save(&self, blob: &Value) -> Result<(), SettingsError> {
        *self.blob.write() = Some(blob.clone());
        Ok(())
    }
}

/// Recursively merge `overlay` into `base`: objects merge key-by-key,
/// anything else is overwritten by the overlay value.
fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value.clone(),
    }
}

/// Shallow-merge a patch into one section, with the password policy merged
/// one level deeper as the single special case.
fn merge_section(target: &mut Value, patch: &Value) {
    let (Some(target_map), Some(patch_map)) = (target.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch_map {
        if key == "passwordPolicy" && value.is_object() {
            if let Some(existing) = target_map.get_mut(key).filter(|e| e.is_object()) {
                deep_merge(existing, value);
                continue;
            }
        }
        target_map.insert(key.clone(), value.clone());
    }
}

/// The settings manager. Loaded once at construction; every update re-merges
/// in memory and persists synchronously.
pub struct SettingsManager<S: SettingsStore> {
    store: S,
    settings: RwLock<SystemSettings>,
}

impl<S: SettingsStore> SettingsManager<S> {
    /// Load persisted settings merged over defaults.
    pub fn new(store: S) -> Self {
        let mut base =
            serde_json::to_value(SystemSettings::default()).unwrap_or_else(|_| json!({}));
        if let Some(persisted) = store.load() {
            deep_merge(&mut base, &persisted);
        }
        let settings = match serde_json::from_value(base) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Persisted settings unusable, falling back to defaults: {}", e);
                SystemSettings::default()
            }
        };
        SettingsManager {
            store,
            settings: RwLock::new(settings),
        }
    }

    /// Snapshot of the full settings object.
    pub fn settings(&self) -> SystemSettings {
        self.settings.read().clone()
    }

    pub fn general(&self) -> GeneralSettings {
        self.settings.read().general.clone()
    }

    pub fn branding(&self) -> BrandingSettings {
        self.settings.read().branding.clone()
    }

    pub fn security(&self) -> SecuritySettings {
        self.settings.read().security.clone()
    }

    /// Merge a multi-section partial (`{"general": {...}, "security": {...}}`)
    /// into the current settings and persist the result.
    ///
    /// Sections merge shallowly; the nested password policy merges one level
    /// deeper. Unrecognized top-level keys are ignored. A persistence failure
    /// is logged but the in-memory update stands, so memory and disk can
    /// diverge until the next successful save.
    pub fn update_settings(&self, partial: Value) -> Result<SystemSettings, SettingsError> {
        let mut guard = self.settings.write();
        let mut current =
            serde_json::to_value(guard.clone()).map_err(|e| SettingsError::Parse(e.to_string()))?;

        if let Some(sections) = partial.as_object() {
            for (section, patch) in sections {
                if !SECTIONS.contains(&section.as_str()) {
                    log::debug!("Ignoring unknown settings section '{}'", section);
                    continue;
                }
                if let Some(target) = current.get_mut(section) {
                    merge_section(target, patch);
                }
            }
        }

        let updated: SystemSettings =
            serde_json::from_value(current).map_err(|e| SettingsError::Parse(e.to_string()))?;
        *guard = updated.clone();
        drop(guard);

        self.persist(&updated);
        Ok(updated)
    }

    /// Merge a partial into one named section.
    pub fn update_section(
        &self,
        section: &str,
        patch: Value,
    ) -> Result<SystemSettings, SettingsError> {
        self.update_settings(json!({ section: patch }))
    }

    /// Advisory checks; violations never block an update.
    pub fn validate_settings(&self) -> Vec<String> {
        let settings = self.settings.read();
        let mut violations = Vec::new();

        if settings.general.company_name.trim().is_empty() {
            violations.push("Company name must not be empty".to_string());
        }
        if !validate_email(&settings.general.contact_email) {
            violations.push("Contact email is not a valid address".to_string());
        }
        if settings.security.password_policy.min_length < 8 {
            violations.push("Password minimum length must be at least 8".to_string());
        }
        if !validate_hex_color(&settings.branding.primary_color) {
            violations.push("Primary color must be a 6-digit hex value".to_string());
        }

        violations
    }

    // --- feature flags ---

    /// Flag lookup; unknown modules are disabled.
    pub fn is_feature_enabled(&self, module: &str) -> bool {
        self.settings
            .read()
            .features
            .modules
            .get(module)
            .copied()
            .unwrap_or(false)
    }

    pub fn enable_feature(&self, module: &str) {
        self.set_feature(module, true);
    }

    pub fn disable_feature(&self, module: &str) {
        self.set_feature(module, false);
    }

    fn set_feature(&self, module: &str, enabled: bool) {
        let updated = {
            let mut guard = self.settings.write();
            guard.features.modules.insert(module.to_string(), enabled);
            guard.clone()
        };
        self.persist(&updated);
    }

    /// Restore defaults and persist them.
    pub fn reset(&self) {
        let defaults = SystemSettings::default();
        *self.settings.write() = defaults.clone();
        self.persist(&defaults);
    }

    fn persist(&self, settings: &SystemSettings) {
        match serde_json::to_value(settings) {
            Ok(blob) => {
                if let Err(e) = self.store.save(&blob) {
                    log::warn!("Failed to persist settings: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

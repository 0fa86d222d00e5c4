//! Settings domain types and validation.
//!
//! This module contains the configuration consumed by the resolver and the
//! host adapters. These are pure domain types with no infrastructure
//! dependencies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::{
    DEFAULT_EXECUTABLE_NAME, DEFAULT_INSTALL_MODULE, DEFAULT_INSTALL_VERSION,
    DEFAULT_TOOLCHAIN_PROGRAM, HostOs, InstallReference, ResolutionRequest, Toolchain,
};

/// Default timeout for `which`/`where` probes.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Default timeout for the toolchain version query.
pub const DEFAULT_TOOLCHAIN_TIMEOUT_SECS: u64 = 10;

/// Default timeout for `go install` (module download plus compile).
pub const DEFAULT_INSTALL_TIMEOUT_SECS: u64 = 300;

/// Application settings structure.
///
/// All fields are optional to support layered configuration (file, env,
/// flags) and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Custom language-server path. Bypasses discovery when non-blank.
    pub server_path: Option<String>,

    /// Executable to look up on PATH.
    pub executable_name: Option<String>,

    /// Go toolchain program used for installation.
    pub toolchain_program: Option<String>,

    /// Module path passed to `go install`.
    pub install_module: Option<String>,

    /// Version tag passed to `go install`.
    pub install_version: Option<String>,

    /// Timeout for PATH probes, in seconds.
    pub lookup_timeout_secs: Option<u64>,

    /// Timeout for the toolchain version query, in seconds.
    pub toolchain_timeout_secs: Option<u64>,

    /// Timeout for the install command, in seconds.
    pub install_timeout_secs: Option<u64>,

    /// Return the probed absolute path instead of the bare executable name.
    pub prefer_absolute_path: Option<bool>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_path: None,
            executable_name: Some(DEFAULT_EXECUTABLE_NAME.to_string()),
            toolchain_program: Some(DEFAULT_TOOLCHAIN_PROGRAM.to_string()),
            install_module: Some(DEFAULT_INSTALL_MODULE.to_string()),
            install_version: Some(DEFAULT_INSTALL_VERSION.to_string()),
            lookup_timeout_secs: Some(DEFAULT_LOOKUP_TIMEOUT_SECS),
            toolchain_timeout_secs: Some(DEFAULT_TOOLCHAIN_TIMEOUT_SECS),
            install_timeout_secs: Some(DEFAULT_INSTALL_TIMEOUT_SECS),
            prefer_absolute_path: Some(false),
        }
    }

    /// Parse settings from a JSON document. Missing fields stay `None`.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Overlay every field that is `Some` in `other` onto this one.
    pub fn merge(&mut self, other: &Self) {
        if other.server_path.is_some() {
            self.server_path.clone_from(&other.server_path);
        }
        if other.executable_name.is_some() {
            self.executable_name.clone_from(&other.executable_name);
        }
        if other.toolchain_program.is_some() {
            self.toolchain_program.clone_from(&other.toolchain_program);
        }
        if other.install_module.is_some() {
            self.install_module.clone_from(&other.install_module);
        }
        if other.install_version.is_some() {
            self.install_version.clone_from(&other.install_version);
        }
        if other.lookup_timeout_secs.is_some() {
            self.lookup_timeout_secs = other.lookup_timeout_secs;
        }
        if other.toolchain_timeout_secs.is_some() {
            self.toolchain_timeout_secs = other.toolchain_timeout_secs;
        }
        if other.install_timeout_secs.is_some() {
            self.install_timeout_secs = other.install_timeout_secs;
        }
        if other.prefer_absolute_path.is_some() {
            self.prefer_absolute_path = other.prefer_absolute_path;
        }
    }

    /// Get the effective executable name (with default fallback).
    pub fn effective_executable_name(&self) -> &str {
        self.executable_name
            .as_deref()
            .unwrap_or(DEFAULT_EXECUTABLE_NAME)
    }

    /// Get the effective install reference (with default fallback).
    #[must_use]
    pub fn effective_install_ref(&self) -> InstallReference {
        InstallReference::new(
            self.install_module
                .as_deref()
                .unwrap_or(DEFAULT_INSTALL_MODULE),
            self.install_version
                .as_deref()
                .unwrap_or(DEFAULT_INSTALL_VERSION),
        )
    }

    /// Build the request for one activation on the given host.
    #[must_use]
    pub fn to_request(&self, host_os: HostOs) -> ResolutionRequest {
        ResolutionRequest::new()
            .with_override_path(self.server_path.clone())
            .with_executable_name(self.effective_executable_name())
            .with_install_ref(self.effective_install_ref())
            .with_host_os(host_os)
    }

    /// Resolver tuning derived from these settings.
    #[must_use]
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            toolchain: Toolchain::new(
                self.toolchain_program
                    .as_deref()
                    .unwrap_or(DEFAULT_TOOLCHAIN_PROGRAM),
            ),
            lookup_timeout: Duration::from_secs(
                self.lookup_timeout_secs
                    .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS),
            ),
            toolchain_timeout: Duration::from_secs(
                self.toolchain_timeout_secs
                    .unwrap_or(DEFAULT_TOOLCHAIN_TIMEOUT_SECS),
            ),
            install_timeout: Duration::from_secs(
                self.install_timeout_secs
                    .unwrap_or(DEFAULT_INSTALL_TIMEOUT_SECS),
            ),
            prefer_absolute_path: self.prefer_absolute_path.unwrap_or(false),
        }
    }
}

/// Resolver tuning: which toolchain to call and how long each stage may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub toolchain: Toolchain,
    pub lookup_timeout: Duration,
    pub toolchain_timeout: Duration,
    pub install_timeout: Duration,
    /// Return the probed absolute path instead of the bare executable name.
    pub prefer_absolute_path: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Settings::with_defaults().resolver_settings()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be at least 1 second, got 0")]
    ZeroTimeout { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    #[error("Executable name must not contain path separators, got {0:?}")]
    InvalidExecutableName(String),

    #[error("Invalid settings document: {0}")]
    Parse(String),
}

/// Validate settings values.
///
/// The server path is not checked: blank means unset, and a non-blank path
/// is trusted as-is.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    let timeouts = [
        ("lookup_timeout_secs", settings.lookup_timeout_secs),
        ("toolchain_timeout_secs", settings.toolchain_timeout_secs),
        ("install_timeout_secs", settings.install_timeout_secs),
    ];
    for (field, value) in timeouts {
        if value == Some(0) {
            return Err(SettingsError::ZeroTimeout { field });
        }
    }

    let names = [
        ("executable_name", &settings.executable_name),
        ("toolchain_program", &settings.toolchain_program),
        ("install_module", &settings.install_module),
        ("install_version", &settings.install_version),
    ];
    for (field, value) in names {
        if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
            return Err(SettingsError::EmptyValue { field });
        }
    }

    if let Some(name) = &settings.executable_name {
        if name.contains('/') || name.contains('\\') {
            return Err(SettingsError::InvalidExecutableName(name.clone()));
        }
    }

    Ok(())
}

// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for wptreport.
//!
//! Configuration is layered: the defaults in `default-config.toml` come first, and a repository
//! config file, `.config/wptreport.toml` unless another file is specified, is merged on top. Most
//! settings live in [profiles](ReportProfile). Custom profiles fall back to the default profile
//! for any setting they don't specify.

use crate::{
    analyzer::AnalysisOptions,
    errors::{ConfigParseError, ConfigParseErrorKind, ProfileNotFound},
    severity::{SeverityModel, UnrankedStatus},
};
use camino::Utf8Path;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeSet;
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// Overall configuration for wptreport.
///
/// Obtain settings through [`profile`](Self::profile).
#[derive(Clone, Debug)]
pub struct ReportConfig {
    inner: ReportConfigImpl,
    unknown_keys: BTreeSet<String>,
}

impl ReportConfig {
    /// The default location of the config within a directory: `.config/wptreport.toml`.
    pub const CONFIG_PATH: &'static str = ".config/wptreport.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// The name of the default profile.
    pub const DEFAULT_PROFILE: &'static str = "default";

    /// Reads the config from the given file, or if not specified from `.config/wptreport.toml`
    /// in `root`.
    ///
    /// A file passed in as `config_file` must exist. If no file is passed in and `root` doesn't
    /// have `.config/wptreport.toml`, the default config is used.
    pub fn from_sources(
        root: impl AsRef<Utf8Path>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.as_ref().join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };
        debug!(%config_file, "reading config");

        let builder = Self::make_default_config().add_source(source);
        let (inner, unknown_keys) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file.clone(), kind))?;

        if !unknown_keys.is_empty() {
            warn!(
                "in config file {config_file}, ignoring unknown configuration {}",
                format_unknown_keys(&unknown_keys)
            );
        }

        Ok(Self {
            inner,
            unknown_keys,
        })
    }

    /// Returns the profile with the given name, or an error if the profile isn't known.
    pub fn profile(&self, name: impl AsRef<str>) -> Result<ReportProfile<'_>, ProfileNotFound> {
        let name = name.as_ref();
        let custom_profile = self.inner.get_profile(name)?;
        Ok(ReportProfile {
            name: name.to_owned(),
            default_profile: &self.inner.default_profile,
            custom_profile,
        })
    }

    /// Returns the configuration keys that were present but not recognized.
    pub fn unknown_keys(&self) -> &BTreeSet<String> {
        &self.unknown_keys
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReportConfigImpl, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut unknown = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            unknown.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReportConfigDeserialize =
            serde_path_to_error::deserialize(ignored_de).map_err(|error| {
                // serde_path_to_error already tracks the key.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config.into_config_impl(), unknown))
    }
}

fn format_unknown_keys(unknown: &BTreeSet<String>) -> String {
    let mut out = String::new();
    if unknown.len() == 1 {
        out.push_str("key: ");
        out.extend(unknown.iter().map(String::as_str));
    } else {
        out.push_str("keys:\n");
        for key in unknown {
            swrite!(out, "\n  - {key}");
        }
    }
    out
}

/// A configuration profile for wptreport.
///
/// Returned by [`ReportConfig::profile`].
#[derive(Clone, Debug)]
pub struct ReportProfile<'cfg> {
    name: String,
    default_profile: &'cfg DefaultProfileImpl,
    custom_profile: Option<&'cfg CustomProfileImpl>,
}

impl ReportProfile<'_> {
    /// Returns the name of this profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the severity order used to find regressions.
    pub fn severity_order(&self) -> &SeverityModel {
        self.custom_profile
            .and_then(|profile| profile.severity_order.as_ref())
            .unwrap_or(&self.default_profile.severity_order)
    }

    /// Returns what happens when a regression comparison involves an unranked status.
    pub fn unranked_status(&self) -> UnrankedStatus {
        self.custom_profile
            .and_then(|profile| profile.unranked_status)
            .unwrap_or(self.default_profile.unranked_status)
    }

    /// Returns whether `OK` counts as passing for subtests.
    pub fn subtest_ok_passes(&self) -> bool {
        self.custom_profile
            .and_then(|profile| profile.subtest_ok_passes)
            .unwrap_or(self.default_profile.subtest_ok_passes)
    }

    /// Returns the analysis options for this profile.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            severity: self.severity_order().clone(),
            unranked_status: self.unranked_status(),
            subtest_ok_passes: self.subtest_ok_passes(),
        }
    }
}

// This is the form of the config that gets deserialized.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigDeserialize {
    #[serde(rename = "profile")]
    profiles: IndexMap<String, CustomProfileImpl>,
}

impl ReportConfigDeserialize {
    fn into_config_impl(mut self) -> ReportConfigImpl {
        let default = self
            .profiles
            .shift_remove(ReportConfig::DEFAULT_PROFILE)
            .unwrap_or_default();
        ReportConfigImpl {
            default_profile: DefaultProfileImpl::new(default),
            other_profiles: self.profiles,
        }
    }
}

#[derive(Clone, Debug)]
struct ReportConfigImpl {
    default_profile: DefaultProfileImpl,
    other_profiles: IndexMap<String, CustomProfileImpl>,
}

impl ReportConfigImpl {
    fn get_profile(&self, profile: &str) -> Result<Option<&CustomProfileImpl>, ProfileNotFound> {
        let custom_profile = match profile {
            ReportConfig::DEFAULT_PROFILE => None,
            other => Some(
                self.other_profiles
                    .get(other)
                    .ok_or_else(|| ProfileNotFound::new(profile, self.all_profiles()))?,
            ),
        };
        Ok(custom_profile)
    }

    fn all_profiles(&self) -> impl Iterator<Item = &str> {
        self.other_profiles
            .keys()
            .map(|key| key.as_str())
            .chain(std::iter::once(ReportConfig::DEFAULT_PROFILE))
    }
}

#[derive(Clone, Debug)]
struct DefaultProfileImpl {
    severity_order: SeverityModel,
    unranked_status: UnrankedStatus,
    subtest_ok_passes: bool,
}

impl DefaultProfileImpl {
    // The embedded default config sets every key, so the fallbacks here only apply if it is
    // edited to leave one out.
    fn new(p: CustomProfileImpl) -> Self {
        Self {
            severity_order: p.severity_order.unwrap_or_default(),
            unranked_status: p.unranked_status.unwrap_or_default(),
            subtest_ok_passes: p.subtest_ok_passes.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CustomProfileImpl {
    #[serde(default)]
    severity_order: Option<SeverityModel>,
    #[serde(default)]
    unranked_status: Option<UnrankedStatus>,
    #[serde(default)]
    subtest_ok_passes: Option<bool>,
}

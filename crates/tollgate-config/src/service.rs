// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wiring an [`AuthService`] from configuration.

use tollgate_core::{AuthService, AuthServiceBuilder, SharedClock};

use crate::error::ConfigResult;
use crate::schema::TollgateConfig;

/// Construction from a validated [`TollgateConfig`].
pub trait FromConfig: Sized {
    /// Builds `Self` from configuration.
    fn from_config(config: &TollgateConfig) -> ConfigResult<Self>;
}

impl FromConfig for AuthService {
    fn from_config(config: &TollgateConfig) -> ConfigResult<Self> {
        Ok(builder_from_config(config)?.build()?)
    }
}

/// Returns a service builder pre-populated from configuration, for callers
/// that still need to inject a clock.
pub fn builder_from_config(config: &TollgateConfig) -> ConfigResult<AuthServiceBuilder> {
    config.validate()?;

    Ok(AuthService::builder()
        .token_config(config.token_config()?)
        .hashing(config.hashing_params())
        .revocation_ttl(config.revocation_ttl())
        .purge_interval(config.revocation.purge_interval))
}

/// Builds a service from configuration with an explicit clock.
pub fn service_with_clock(config: &TollgateConfig, clock: SharedClock) -> ConfigResult<AuthService> {
    Ok(builder_from_config(config)?.clock(clock).build()?)
}

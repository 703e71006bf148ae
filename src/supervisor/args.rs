// src/supervisor/args.rs

use tracing::error;

use crate::errors::{Result, SupervisorError};
use crate::identity::IdentityProvider;
use crate::proxy::ProxySettings;

/// Launch command line: `[instance_id, region, extra..., proxy...]`.
///
/// Instance id and region are mandatory.
pub fn build_launch_arguments(
    identity: &dyn IdentityProvider,
    extra: &[String],
    proxy: &ProxySettings,
) -> Result<Vec<String>> {
    let instance_id = identity.instance_id().map_err(|e| {
        error!(error = %e, "cannot get the current instance id");
        SupervisorError::IdentityUnavailable(format!("instance id: {e:#}"))
    })?;
    let region = identity.region().map_err(|e| {
        error!(error = %e, "cannot get the current instance region");
        SupervisorError::IdentityUnavailable(format!("region: {e:#}"))
    })?;

    let mut args = vec![instance_id, region];
    args.extend(extra.iter().cloned());
    args.extend(proxy.launch_arguments());
    Ok(args)
}

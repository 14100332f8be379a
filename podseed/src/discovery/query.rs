//! SRV query name built from service name and optional container port name.

use std::fmt;

use podseed_core::CoreError;

/// Immutable SRV query.
///
/// With a container port name the query is `_<port>._tcp.<service>`; without one the
/// service name is used verbatim as the fully-qualified query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SrvQuery {
    service_name: String,
    container_port_name: Option<String>,
    fqdn: String,
}

impl SrvQuery {
    /// Query for a service name used as-is.
    pub fn service(service_name: impl Into<String>) -> Result<Self, CoreError> {
        Self::from_parts(Some(service_name.into()), None)
    }

    /// Query `_<port>._tcp.<service>`.
    pub fn port(
        container_port_name: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Result<Self, CoreError> {
        Self::from_parts(Some(service_name.into()), Some(container_port_name.into()))
    }

    /// Validate both parts. A port name without a service name is rejected rather
    /// than turned into a malformed query.
    pub fn from_parts(
        service_name: Option<String>,
        container_port_name: Option<String>,
    ) -> Result<Self, CoreError> {
        let service_name = match (service_name, &container_port_name) {
            (Some(s), _) => s,
            (None, Some(port)) => {
                return Err(CoreError::Config(format!(
                    "container port name {:?} set without a service name",
                    port
                )))
            }
            (None, None) => return Err(CoreError::Config("service name is required".into())),
        };
        check_name("service name", &service_name)?;
        if let Some(port) = &container_port_name {
            check_name("container port name", port)?;
        }
        let fqdn = match &container_port_name {
            Some(port) => format!("_{}._tcp.{}", port, service_name),
            None => service_name.clone(),
        };
        Ok(Self {
            service_name,
            container_port_name,
            fqdn,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn container_port_name(&self) -> Option<&str> {
        self.container_port_name.as_deref()
    }

    /// Full query string sent to DNS.
    pub fn as_str(&self) -> &str {
        &self.fqdn
    }
}

impl fmt::Display for SrvQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn)
    }
}

/// Reject empty or whitespace-containing names. Used by setters and `from_parts`.
pub(crate) fn check_name(what: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Config(format!("{} must not be empty", what)));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CoreError::Config(format!(
            "{} {:?} must not contain whitespace",
            what, value
        )));
    }
    Ok(())
}

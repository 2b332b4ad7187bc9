//! SNMP SET requests.
//!
//! Requests are built from a button's settings and sent through an
//! [`SnmpClient`]. [`UdpSnmpClient`] opens a fresh session for every request.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Serialize;
use ::snmp::{SyncSession, Value};
use tracing::{debug, info, warn};

use crate::config::{SnmpAction, SnmpDevice, SnmpVersion, ValueType};
use crate::error::{Result, StroomerError};

/// Default time to wait for an agent's response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A typed SNMP value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SnmpValue {
    Integer(i64),
    String(String),
}

/// One variable to set on an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetRequest {
    /// OID as configured, for logging.
    pub oid_text: String,
    pub oid: Vec<u32>,
    pub value: SnmpValue,
}

impl SetRequest {
    /// Build the request for an `snmp` button.
    pub fn from_action(action: &SnmpAction) -> Result<Self> {
        Ok(Self {
            oid_text: action.oid.clone(),
            oid: parse_oid(&action.oid)?,
            value: encode_value(&action.oid, &action.value, action.value_type)?,
        })
    }
}

/// Parse a dotted-decimal OID. A leading dot is allowed.
pub fn parse_oid(s: &str) -> Result<Vec<u32>> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(StroomerError::InvalidOid(s.to_string()));
    }
    digits
        .split('.')
        .map(|arc| arc.parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| StroomerError::InvalidOid(s.to_string()))
}

/// Encode `value` according to the configured value type.
pub fn encode_value(oid: &str, value: &str, value_type: ValueType) -> Result<SnmpValue> {
    match value_type {
        ValueType::Integer => value
            .trim()
            .parse::<i64>()
            .map(SnmpValue::Integer)
            .map_err(|_| StroomerError::InvalidInteger {
                oid: oid.to_string(),
                value: value.to_string(),
            }),
        ValueType::String => Ok(SnmpValue::String(value.to_string())),
    }
}

/// `host:port` for an agent; bare IPv6 addresses get brackets.
pub fn destination(device: &SnmpDevice) -> String {
    let host = device.host.trim();
    if host.parse::<SocketAddr>().is_ok() {
        return host.to_string();
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(addr)) => format!("[{addr}]:{}", device.port),
        _ => format!("{host}:{}", device.port),
    }
}

/// Sends SET requests to SNMP agents.
pub trait SnmpClient: Send + Sync {
    fn set(&self, device: &SnmpDevice, request: &SetRequest) -> Result<()>;
}

/// [`SnmpClient`] speaking SNMP v2c over UDP.
#[derive(Debug, Clone)]
pub struct UdpSnmpClient {
    timeout: Duration,
}

impl UdpSnmpClient {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for UdpSnmpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SnmpClient for UdpSnmpClient {
    fn set(&self, device: &SnmpDevice, request: &SetRequest) -> Result<()> {
        let destination = destination(device);
        if device.version != SnmpVersion::V2c {
            warn!(
                device = %device.name,
                version = %device.version,
                "SNMP version not supported; sending as v2c"
            );
        }
        debug!(%destination, oid = %request.oid_text, "Opening SNMP session");

        let snmp_error = |reason: String| StroomerError::Snmp {
            host: destination.clone(),
            reason,
        };

        let mut session = SyncSession::new(
            destination.as_str(),
            device.community.as_bytes(),
            Some(self.timeout),
            0,
        )
        .map_err(|e| snmp_error(e.to_string()))?;

        let value = match &request.value {
            SnmpValue::Integer(i) => Value::Integer(*i),
            SnmpValue::String(s) => Value::OctetString(s.as_bytes()),
        };

        let response = session
            .set(&[(request.oid.as_slice(), value)])
            .map_err(|e| snmp_error(format!("{e:?}")))?;
        if response.error_status != 0 {
            return Err(snmp_error(format!(
                "agent returned error-status {} at index {}",
                response.error_status, response.error_index
            )));
        }

        info!(
            device = %device.name,
            oid = %request.oid_text,
            value = ?request.value,
            "SNMP set"
        );
        Ok(())
    }
}

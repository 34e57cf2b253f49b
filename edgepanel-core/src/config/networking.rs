use std::net::IpAddr;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Networking options for the http api
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NetworkingConfig {
    /// The listening port of the api
    #[serde(deserialize_with = "port_from_num_or_string")]
    pub port: u16,
    /// The IP address to bind to
    pub bind: Option<IpAddr>,
}

impl Default for NetworkingConfig {
    fn default() -> Self {
        Self {
            port: 3030,
            bind: None,
        }
    }
}

pub(crate) fn port_from_num_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<u16, D::Error> {
    parse_port(Value::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("port cannot be empty"))
}

pub(crate) fn opt_port_from_num_or_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u16>, D::Error> {
    parse_port(Value::deserialize(deserializer)?)
}

fn parse_port<E: de::Error>(value: Value) -> Result<Option<u16>, E> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().parse().map_err(de::Error::custom)?),
        Value::Number(num) => Some(
            num.as_u64()
                .and_then(|num| u16::try_from(num).ok())
                .ok_or_else(|| de::Error::custom("failed to parse number as u16"))?,
        ),
        _ => return Err(de::Error::custom("must be integer or string")),
    })
}

//! Protocol versions ("dialects") and the capability resolver.
//!
//! ARI revisions expose slightly different resource sets. Each supported
//! version carries a compile-time table of the capabilities it implements;
//! resolution is a pure table lookup with no I/O. The session surfaces a
//! missing mapping as a distinct [`Kind::NotSupported`](crate::error::Kind)
//! error rather than a generic fault, since callers are expected to probe
//! for version-specific features.

use std::fmt;

use phf::phf_map;

use crate::Result;
use crate::error::{NotSupported, UnsupportedVersion};

/// A named revision of the server's REST+WebSocket interface.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AriVersion {
    /// Asterisk 11 dialect, before device states and mailboxes existed
    V0_0_1,
    V1_0_0,
    V1_5_0,
    V2_0_0,
    V3_0_0,
    V4_0_0,
    V5_0_0,
    V6_0_0,
}

/// An abstract operation category, independent of protocol version.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Applications,
    Asterisk,
    Bridges,
    Channels,
    DeviceStates,
    Endpoints,
    Events,
    Mailboxes,
    Playbacks,
    Recordings,
    Sounds,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Applications,
        Capability::Asterisk,
        Capability::Bridges,
        Capability::Channels,
        Capability::DeviceStates,
        Capability::Endpoints,
        Capability::Events,
        Capability::Mailboxes,
        Capability::Playbacks,
        Capability::Recordings,
        Capability::Sounds,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Applications => "applications",
            Capability::Asterisk => "asterisk",
            Capability::Bridges => "bridges",
            Capability::Channels => "channels",
            Capability::DeviceStates => "deviceStates",
            Capability::Endpoints => "endpoints",
            Capability::Events => "events",
            Capability::Mailboxes => "mailboxes",
            Capability::Playbacks => "playbacks",
            Capability::Recordings => "recordings",
            Capability::Sounds => "sounds",
        };
        f.write_str(name)
    }
}

/// Wire version string to dialect. Exact matches only; major-based fallback
/// happens in [`AriVersion::from_version_string`].
static VERSIONS: phf::Map<&'static str, AriVersion> = phf_map! {
    "0.0.1" => AriVersion::V0_0_1,
    "1.0.0" => AriVersion::V1_0_0,
    "1.5.0" => AriVersion::V1_5_0,
    "2.0.0" => AriVersion::V2_0_0,
    "3.0.0" => AriVersion::V3_0_0,
    "4.0.0" => AriVersion::V4_0_0,
    "5.0.0" => AriVersion::V5_0_0,
    "6.0.0" => AriVersion::V6_0_0,
};

/// Capabilities of the pre-Asterisk-12 dialect.
static CAPS_V0: &[Capability] = &[
    Capability::Applications,
    Capability::Asterisk,
    Capability::Bridges,
    Capability::Channels,
    Capability::Endpoints,
    Capability::Events,
    Capability::Playbacks,
    Capability::Recordings,
    Capability::Sounds,
];

/// Capabilities of every dialect from 1.0.0 on.
static CAPS_FULL: &[Capability] = &Capability::ALL;

impl AriVersion {
    /// Map a server-reported version string to a supported dialect.
    ///
    /// Tries an exact match first, then falls back to the newest known
    /// dialect sharing the same major component (servers report patch
    /// revisions this crate has no dedicated bindings for).
    pub fn from_version_string(version: &str) -> Result<AriVersion> {
        if let Some(v) = VERSIONS.get(version) {
            return Ok(*v);
        }

        let major = version.split('.').next().unwrap_or(version);
        VERSIONS
            .entries()
            .filter(|(wire, _)| wire.split('.').next() == Some(major))
            .map(|(_, v)| *v)
            .max()
            .ok_or_else(|| {
                UnsupportedVersion {
                    version: Some(version.to_owned()),
                }
                .into()
            })
    }

    fn capabilities(self) -> &'static [Capability] {
        match self {
            AriVersion::V0_0_1 => CAPS_V0,
            _ => CAPS_FULL,
        }
    }

    /// Check that this dialect implements `capability`.
    ///
    /// Pure map read; fails with a catchable `NotSupported` when the
    /// mapping is absent.
    pub fn resolve(self, capability: Capability) -> Result<()> {
        if self.capabilities().contains(&capability) {
            Ok(())
        } else {
            Err(NotSupported {
                capability,
                version: self,
            }
            .into())
        }
    }
}

impl fmt::Display for AriVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = match self {
            AriVersion::V0_0_1 => "0.0.1",
            AriVersion::V1_0_0 => "1.0.0",
            AriVersion::V1_5_0 => "1.5.0",
            AriVersion::V2_0_0 => "2.0.0",
            AriVersion::V3_0_0 => "3.0.0",
            AriVersion::V4_0_0 => "4.0.0",
            AriVersion::V5_0_0 => "5.0.0",
            AriVersion::V6_0_0 => "6.0.0",
        };
        f.write_str(wire)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Kind;

    use super::*;

    #[test]
    fn exact_version_strings_resolve() {
        assert_eq!(
            AriVersion::from_version_string("2.0.0").expect("known version"),
            AriVersion::V2_0_0
        );
        assert_eq!(
            AriVersion::from_version_string("0.0.1").expect("known version"),
            AriVersion::V0_0_1
        );
    }

    #[test]
    fn patch_revision_falls_back_to_major() {
        assert_eq!(
            AriVersion::from_version_string("6.0.2").expect("major fallback"),
            AriVersion::V6_0_0
        );
        // Two known dialects share major 1; the newest wins.
        assert_eq!(
            AriVersion::from_version_string("1.10.2").expect("major fallback"),
            AriVersion::V1_5_0
        );
    }

    #[test]
    fn unknown_major_is_unsupported() {
        let err = AriVersion::from_version_string("99.0.0").expect_err("unknown major");
        assert_eq!(err.kind(), Kind::UnsupportedVersion);
        let detail = err
            .downcast_ref::<UnsupportedVersion>()
            .expect("carries the reported string");
        assert_eq!(detail.version.as_deref(), Some("99.0.0"));
    }

    #[test]
    fn full_dialects_resolve_every_capability() {
        for capability in Capability::ALL {
            AriVersion::V6_0_0
                .resolve(capability)
                .expect("6.0.0 implements everything");
        }
    }

    #[test]
    fn v0_dialect_lacks_device_states_and_mailboxes() {
        for capability in [Capability::DeviceStates, Capability::Mailboxes] {
            let err = AriVersion::V0_0_1
                .resolve(capability)
                .expect_err("absent in 0.0.1");
            assert_eq!(err.kind(), Kind::NotSupported);
        }
        AriVersion::V0_0_1
            .resolve(Capability::Channels)
            .expect("channels exist in every dialect");
    }
}

use core::fmt::Display;

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::core::ics03_connection::error::Error;
use crate::core::ics04_channel::channel::Order;

#[derive(Clone, PartialEq, Message)]
pub struct RawVersion {
    #[prost(string, tag = "1")]
    pub identifier: String,
    #[prost(string, repeated, tag = "2")]
    pub features: Vec<String>,
}

/// Stores the identifier and the features supported by a version
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// unique version identifier
    identifier: String,
    /// list of features compatible with the specified identifier
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: String, features: Vec<String>) -> Result<Self, Error> {
        if identifier.trim().is_empty() {
            return Err(Error::empty_versions());
        }
        if features.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::empty_features());
        }
        Ok(Self {
            identifier,
            features,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Checks whether or not the given feature is supported in this version
    pub fn is_supported_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Whether channels of the given ordering may be opened on top of a
    /// connection that negotiated this version.
    pub fn supports_order(&self, order: Order) -> bool {
        self.is_supported_feature(order.as_str())
    }
}

impl From<Version> for RawVersion {
    fn from(value: Version) -> Self {
        Self {
            identifier: value.identifier,
            features: value.features,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version {
            identifier: "1".to_string(),
            features: vec![
                Order::Ordered.as_str().to_owned(),
                Order::Unordered.as_str().to_owned(),
            ],
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Version {{ identifier: {}, features: [{}] }}",
            self.identifier,
            self.features.join(", ")
        )
    }
}

/// Whether `proposed` is allowed by one of the `supported` versions: same
/// identifier, and a non-empty subset of its features.
pub fn is_supported_version(supported: &[Version], proposed: &Version) -> bool {
    !proposed.features.is_empty()
        && supported.iter().any(|s| {
            s.identifier == proposed.identifier
                && proposed.features.iter().all(|f| s.features.contains(f))
        })
}

/// Returns the lists of supported versions
pub fn get_compatible_versions() -> Vec<Version> {
    vec![Version::default()]
}

/// Selects a version from the intersection of locally supported and counterparty versions.
///
/// Versions are matched by identifier and their feature sets intersected. The
/// lowest identifier with at least one common feature wins.
pub fn pick_version(
    supported_versions: &[Version],
    counterparty_versions: &[Version],
) -> Result<Version, Error> {
    let mut intersection: Vec<Version> = Vec::new();

    for s in supported_versions {
        for c in counterparty_versions {
            if c.identifier != s.identifier {
                continue;
            }
            if c.features.iter().any(|f| f.trim().is_empty()) {
                return Err(Error::empty_features());
            }

            let features: Vec<String> = s
                .features
                .iter()
                .filter(|f| c.features.contains(f))
                .cloned()
                .collect();

            if !features.is_empty() {
                intersection.push(Version {
                    identifier: s.identifier.clone(),
                    features,
                });
            }
        }
    }

    intersection.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    intersection
        .into_iter()
        .next()
        .ok_or_else(Error::version_negotiation_failed)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::core::ics03_connection::error::ErrorDetail;

    fn version(identifier: &str, features: &[&str]) -> Version {
        Version::new(
            identifier.to_string(),
            features.iter().map(|f| f.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn verify() {
        struct Test {
            name: String,
            supported: Vec<Version>,
            counterparty: Vec<Version>,
            picked: Option<Version>,
        }

        let tests: Vec<Test> = vec![
            Test {
                name: "Compatible versions".to_string(),
                supported: get_compatible_versions(),
                counterparty: get_compatible_versions(),
                picked: Some(Version::default()),
            },
            Test {
                name: "Multiple versions".to_string(),
                supported: vec![
                    version("1", &["ORDER_ORDERED"]),
                    version("2", &["ORDER_UNORDERED"]),
                ],
                counterparty: vec![
                    version("2", &["ORDER_UNORDERED"]),
                    version("1", &["ORDER_ORDERED", "ORDER_UNORDERED"]),
                ],
                picked: Some(version("1", &["ORDER_ORDERED"])),
            },
            Test {
                name: "Features are intersected".to_string(),
                supported: get_compatible_versions(),
                counterparty: vec![version("1", &["ORDER_UNORDERED", "ORDER_DAG"])],
                picked: Some(version("1", &["ORDER_UNORDERED"])),
            },
            Test {
                name: "Same identifier, disjoint features".to_string(),
                supported: vec![version("1", &["ORDER_ORDERED"])],
                counterparty: vec![version("1", &["ORDER_UNORDERED"])],
                picked: None,
            },
            Test {
                name: "No common identifier".to_string(),
                supported: get_compatible_versions(),
                counterparty: vec![version("7", &["ORDER_ORDERED"])],
                picked: None,
            },
            Test {
                name: "Empty counterparty versions".to_string(),
                supported: get_compatible_versions(),
                counterparty: vec![],
                picked: None,
            },
        ];

        for test in tests {
            let res = pick_version(&test.supported, &test.counterparty);
            match test.picked {
                Some(want) => assert_eq!(res.unwrap(), want, "{}", test.name),
                None => assert!(
                    matches!(
                        res,
                        Err(Error(ErrorDetail::VersionNegotiationFailed(_), _))
                    ),
                    "{}",
                    test.name
                ),
            }
        }
    }

    #[test]
    fn empty_identifier_or_feature_is_rejected() {
        assert!(Version::new(" ".to_string(), vec![]).is_err());
        assert!(Version::new("1".to_string(), vec!["".to_string()]).is_err());
    }

    #[test]
    fn default_version_supports_both_orderings() {
        let v = Version::default();
        assert!(v.supports_order(Order::Ordered));
        assert!(v.supports_order(Order::Unordered));
        assert!(!version("1", &["ORDER_ORDERED"]).supports_order(Order::Unordered));
    }

    #[test]
    fn proposed_versions_may_narrow_the_supported_features() {
        let supported = get_compatible_versions();

        assert!(is_supported_version(&supported, &Version::default()));
        assert!(is_supported_version(&supported, &version("1", &["ORDER_ORDERED"])));
        assert!(!is_supported_version(&supported, &version("1", &[])));
        assert!(!is_supported_version(&supported, &version("1", &["ORDER_DAG"])));
        assert!(!is_supported_version(&supported, &version("2", &["ORDER_ORDERED"])));
    }
}

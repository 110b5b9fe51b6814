use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for input that does not have the
/// `arn:partition:service:region:account:resource` shape.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Malformed ARN: {0}")]
pub struct ArnError(String);

/// Parsed Amazon Resource Name.
///
/// Region and account sections may be empty; the resource section keeps any
/// embedded colons verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    partition: String,
    service: String,
    region: String,
    account_id: String,
    resource: String,
}

impl Arn {
    /// Partition the resource lives in, e.g. `aws`.
    #[must_use]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Owning service, e.g. `sqs` or `sns`.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Region section; may be empty.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Account id section; may be empty.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Resource section, e.g. the queue or topic name.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sections = s.splitn(6, ':');
        let (
            Some("arn"),
            Some(partition),
            Some(service),
            Some(region),
            Some(account_id),
            Some(resource),
        ) = (
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
            sections.next(),
        )
        else {
            return Err(ArnError(s.to_string()));
        };

        Ok(Self {
            partition: partition.to_owned(),
            service: service.to_owned(),
            region: region.to_owned(),
            account_id: account_id.to_owned(),
            resource: resource.to_owned(),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

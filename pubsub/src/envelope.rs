//! Message body envelopes.
//!
//! A queue body is either the payload verbatim, a notification delivered by
//! an SNS topic subscription, or an S3 event notification. The consumer
//! decodes the body into the shape the handler expects before dispatch; a
//! body that cannot be decoded is treated as a retryable failure so the
//! message is redelivered instead of silently dropped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Failure to interpret a raw message body as the expected envelope.
#[derive(Debug, Error)]
#[error("Malformed message body")]
pub struct DecodeError(#[from] serde_json::Error);

/// A body shape the consumer can decode before handler dispatch.
pub trait Envelope: Sized {
    /// Decodes a raw queue message body.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the body does not have the expected shape.
    fn decode(body: &str) -> Result<Self, DecodeError>;
}

impl Envelope for String {
    fn decode(body: &str) -> Result<Self, DecodeError> {
        Ok(body.to_owned())
    }
}

/// Message delivered to a queue by an SNS topic subscription.
///
/// The `message` field carries the payload that was published to the topic;
/// the remaining fields are the notification metadata SNS wraps around it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SnsEvent {
    /// Notification type, e.g. `Notification` or `SubscriptionConfirmation`.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Service-assigned notification id.
    pub message_id: String,
    /// The published payload.
    pub message: String,
    /// Confirmation token, present on subscription confirmations.
    pub token: String,
    /// ARN of the topic the notification originated from.
    pub topic_arn: String,
    /// Confirmation URL, present on subscription confirmations.
    #[serde(rename = "SubscribeURL", skip_serializing_if = "Option::is_none")]
    pub subscribe_url: Option<String>,
    /// Publish time.
    pub timestamp: String,
    /// Notification signature.
    pub signature: String,
    /// Signature scheme version.
    pub signature_version: String,
    /// URL of the certificate the signature was produced with.
    #[serde(rename = "SigningCertURL")]
    pub signing_cert_url: String,
    /// Attributes published with the message, keyed by attribute name.
    pub message_attributes: HashMap<String, HashMap<String, String>>,
}

impl Envelope for SnsEvent {
    fn decode(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body).map_err(DecodeError::from)
    }
}

/// Event notification emitted by S3 and delivered through a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct S3Event {
    /// One entry per object-level event.
    pub records: Vec<S3EventRecord>,
}

impl Envelope for S3Event {
    fn decode(body: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(body).map_err(DecodeError::from)
    }
}

/// One object-level event within an [`S3Event`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3EventRecord {
    /// Event format version.
    pub event_version: String,
    /// Emitting service, e.g. `aws:s3`.
    pub event_source: String,
    /// Region the bucket lives in.
    pub aws_region: String,
    /// Time the event occurred.
    pub event_time: String,
    /// Event name, e.g. `ObjectCreated:Put`.
    pub event_name: String,
    /// Identity that triggered the event.
    pub user_identity: S3UserIdentity,
    /// Metadata of the request that triggered the event.
    pub request_parameters: S3RequestParameters,
    /// Metadata of the service response.
    pub response_elements: S3ResponseElements,
    /// Bucket and object the event refers to.
    pub s3: S3Entity,
}

/// Principal identity attached to an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3UserIdentity {
    /// Principal that performed the action.
    pub principal_id: String,
}

/// Request metadata attached to an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3RequestParameters {
    /// Address the triggering request came from.
    #[serde(rename = "sourceIPAddress")]
    pub source_ip_address: String,
}

/// Response metadata attached to an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3ResponseElements {
    /// Id of the request that produced the event.
    #[serde(rename = "x-amz-request-id")]
    pub request_id: String,
    /// Host-level id pair for the request.
    #[serde(rename = "x-amz-id-2")]
    pub id_2: String,
}

/// Bucket and object descriptor of an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Entity {
    /// Event schema version.
    pub s3_schema_version: String,
    /// Notification configuration the event matched.
    pub configuration_id: String,
    /// Bucket the object lives in.
    pub bucket: S3Bucket,
    /// The object the event refers to.
    pub object: S3Object,
}

/// Bucket descriptor of an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Bucket {
    /// Bucket name.
    pub name: String,
    /// Bucket owner.
    pub owner_identity: S3UserIdentity,
    /// Bucket ARN.
    pub arn: String,
}

/// Object descriptor of an S3 event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Object {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: i64,
    /// Object checksum.
    pub e_tag: String,
    /// Object version, when bucket versioning is enabled.
    pub version_id: String,
    /// Opaque token ordering events for the same key.
    pub sequencer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_decode_is_identity() {
        let body = "not json at all {{";

        assert_eq!(String::decode(body).unwrap(), body);
    }

    #[test]
    fn test_sns_event_decode() {
        let body = r#"{
            "Type": "Notification",
            "MessageId": "3ce44b69-8dc4-471b-a389-b6a32d69fbd8",
            "TopicArn": "arn:aws:sns:us-east-1:123456789012:order-events",
            "Message": "{\"order_id\":42}",
            "Timestamp": "2024-05-14T09:26:30.000Z",
            "SignatureVersion": "1",
            "Signature": "EXAMPLEpH+DcEwjAPg8O9mY8dReBSwksfg2S7WKQcikcNKWLQjwu6A4VbeS0QHVCkhRS7fUQvi2egU3N858fiTDN6bkkOxYDVrY0Ad8L10Hs3zH81mtnPk5uvvolIC1CXGu43obcgFxeL3khZl8IKvO61GWB6jI9b5+gLPoBc1Q=",
            "SigningCertURL": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService-0123456789abcdef.pem",
            "MessageAttributes": {
                "origin": {"Type": "String", "Value": "checkout"}
            }
        }"#;

        let event = SnsEvent::decode(body).unwrap();

        assert_eq!(event.kind, "Notification");
        assert_eq!(event.message, r#"{"order_id":42}"#);
        assert_eq!(
            event.topic_arn,
            "arn:aws:sns:us-east-1:123456789012:order-events"
        );
        assert_eq!(event.subscribe_url, None);
        assert_eq!(
            event.message_attributes["origin"]["Value"],
            "checkout".to_string()
        );
    }

    #[test]
    fn test_sns_event_round_trip() {
        let mut attribute = HashMap::new();
        attribute.insert("Type".to_string(), "String".to_string());
        attribute.insert("Value".to_string(), "checkout".to_string());
        let mut attributes = HashMap::new();
        attributes.insert("origin".to_string(), attribute);

        let event = SnsEvent {
            kind: "Notification".to_string(),
            message_id: "3ce44b69-8dc4-471b-a389-b6a32d69fbd8".to_string(),
            message: r#"{"order_id":42}"#.to_string(),
            topic_arn: "arn:aws:sns:us-east-1:123456789012:order-events".to_string(),
            timestamp: "2024-05-14T09:26:30.000Z".to_string(),
            message_attributes: attributes,
            ..SnsEvent::default()
        };

        let body = serde_json::to_string(&event).unwrap();
        let decoded = SnsEvent::decode(&body).unwrap();

        assert_eq!(decoded.message, event.message);
        assert_eq!(decoded.message_attributes, event.message_attributes);
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_sns_event_decode_rejects_malformed_body() {
        assert!(SnsEvent::decode("definitely not json").is_err());
    }

    #[test]
    fn test_s3_event_decode() {
        let body = r#"{
            "Records": [
                {
                    "eventVersion": "2.1",
                    "eventSource": "aws:s3",
                    "awsRegion": "us-east-1",
                    "eventTime": "2024-05-14T09:26:30.000Z",
                    "eventName": "ObjectCreated:Put",
                    "userIdentity": {"principalId": "AWS:AIDAEXAMPLE"},
                    "requestParameters": {"sourceIPAddress": "203.0.113.7"},
                    "responseElements": {
                        "x-amz-request-id": "C3D13FE58DE4C810",
                        "x-amz-id-2": "FMyUVURIY8/IgAtTv8xRjskZQpcIZ9KG4V5Wp6S7S/JRWeUWerMUE5JgHvANOjpD"
                    },
                    "s3": {
                        "s3SchemaVersion": "1.0",
                        "configurationId": "invoice-uploads",
                        "bucket": {
                            "name": "invoice-archive",
                            "ownerIdentity": {"principalId": "A3NL1KOZZKExample"},
                            "arn": "arn:aws:s3:::invoice-archive"
                        },
                        "object": {
                            "key": "2024/05/invoice-42.pdf",
                            "size": 1024,
                            "eTag": "d41d8cd98f00b204e9800998ecf8427e",
                            "sequencer": "0055AED6DCD90281E5"
                        }
                    }
                }
            ]
        }"#;

        let event = S3Event::decode(body).unwrap();

        assert_eq!(event.records.len(), 1);
        let record = &event.records[0];
        assert_eq!(record.event_name, "ObjectCreated:Put");
        assert_eq!(record.aws_region, "us-east-1");
        assert_eq!(record.user_identity.principal_id, "AWS:AIDAEXAMPLE");
        assert_eq!(record.request_parameters.source_ip_address, "203.0.113.7");
        assert_eq!(record.response_elements.request_id, "C3D13FE58DE4C810");
        assert_eq!(record.s3.bucket.name, "invoice-archive");
        assert_eq!(record.s3.object.key, "2024/05/invoice-42.pdf");
        assert_eq!(record.s3.object.size, 1024);
        assert_eq!(record.s3.object.e_tag, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(record.s3.object.sequencer, "0055AED6DCD90281E5");
    }

    #[test]
    fn test_s3_event_decode_rejects_malformed_body() {
        assert!(S3Event::decode(r#"{"Records": "nope"}"#).is_err());
    }
}

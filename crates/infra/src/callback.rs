//! Inbound callback payloads
//!
//! Parses the plaintext XML documents pushed for directory changes and
//! finished bulk jobs. Signature checks and message decryption happen before
//! these functions are called.

use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;
use wecom_domain::{BatchJob, CallbackEvent, WecomError};

/// Parse a callback event document.
///
/// # Errors
///
/// Returns [`WecomError::Serialization`] on malformed XML
pub fn parse_event(xml: &str) -> Result<CallbackEvent, WecomError> {
    let event: CallbackEvent = from_str(xml)
        .map_err(|e| WecomError::Serialization(format!("Invalid callback event: {e}")))?;
    debug!(event = %event.event, msg_type = %event.msg_type, "callback event parsed");
    Ok(event)
}

#[derive(Deserialize)]
struct BatchJobs {
    #[serde(rename = "BatchJob", default)]
    jobs: Vec<BatchJob>,
}

/// Every `<BatchJob>` element directly under the document root. A document
/// without any yields an empty list.
///
/// # Errors
///
/// Returns [`WecomError::Serialization`] on malformed XML
pub fn parse_batch_jobs(xml: &str) -> Result<Vec<BatchJob>, WecomError> {
    let doc: BatchJobs = from_str(xml)
        .map_err(|e| WecomError::Serialization(format!("Invalid batch job document: {e}")))?;
    Ok(doc.jobs)
}

// SPDX-License-Identifier: MIT

//! [`MessageDeliveryLog`]: append-only record of scheduled-message fires (spec §3).

use crate::scheduled_message::ScheduledMessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a delivery log row.
    pub struct DeliveryLogId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeliveryLog {
    pub id: DeliveryLogId,
    pub scheduled_message_id: ScheduledMessageId,
    /// Snapshot of the message's name at fire time.
    pub name: String,
    /// Snapshot of the resolved target session at fire time.
    pub target_session: String,
    /// Snapshot of the message body at fire time.
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub success: bool,
    pub error: Option<String>,
}

impl MessageDeliveryLog {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DeliveryLogId,
        scheduled_message_id: ScheduledMessageId,
        name: impl Into<String>,
        target_session: impl Into<String>,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
        success: bool,
        error: Option<String>,
    ) -> Self {
        Self {
            id,
            scheduled_message_id,
            name: name.into(),
            target_session: target_session.into(),
            body: body.into(),
            sent_at,
            success,
            error,
        }
    }
}

use std::cell::RefCell;

use tracing::{info, warn};

use crate::accepted::AcceptedTable;
use crate::error::{CamReadyError, Result};
use crate::models::{NotificationRecord, PaperId};

pub const DEFAULT_CONFERENCE: &str = "EMNLP 2025";
pub const DEFAULT_DEADLINE: &str = "Friday, September 19";

/// Outbound messaging channel. One call per reminder; implementations must not
/// batch or retry on their own.
pub trait MessageSender {
    fn send_message(
        &self,
        subject: &str,
        recipients: &[String],
        body: &str,
        invitation: &str,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTemplate {
    pub conference: String,
    pub deadline: String,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self {
            conference: DEFAULT_CONFERENCE.to_string(),
            deadline: DEFAULT_DEADLINE.to_string(),
        }
    }
}

impl ReminderTemplate {
    pub fn subject(&self) -> String {
        format!("OVERDUE: {} camera-ready submission", self.conference)
    }

    pub fn body(&self, paper_id: &PaperId, title: &str) -> String {
        let raw = format!(
            r#"
            This email is to notify you that the camera-ready deadline for
            {conference} was {deadline}. As soon as possible, please
            submit the final version of:

            Paper {paper_id}: "{title}"

            Thank you,
            The {conference} Publication Chairs
            "#,
            conference = self.conference,
            deadline = self.deadline,
        );
        strip_lines(&raw)
    }
}

fn strip_lines(text: &str) -> String {
    text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n")
}

#[must_use]
pub fn recipient_group(venue: &str, paper_id: &PaperId) -> String {
    format!("{venue}/Submission{paper_id}/Authors")
}

#[must_use]
pub fn invitation_for_venue(venue: &str) -> String {
    format!("{venue}/-/Edit")
}

#[must_use]
pub fn render_notification(
    venue: &str,
    template: &ReminderTemplate,
    paper_id: &PaperId,
    title: &str,
) -> NotificationRecord {
    NotificationRecord {
        paper_id: paper_id.clone(),
        title: title.to_string(),
        recipient_group: recipient_group(venue, paper_id),
        subject: template.subject(),
        body: template.body(paper_id, title),
    }
}

/// Sends one reminder per missing paper, in order, and returns how many were
/// sent. Stops at the first paper without a table row or whose send fails;
/// reminders already sent stay sent.
pub fn dispatch<S: MessageSender + ?Sized>(
    missing: &[PaperId],
    table: &AcceptedTable,
    venue: &str,
    template: &ReminderTemplate,
    sender: &S,
) -> Result<usize> {
    let invitation = invitation_for_venue(venue);
    let mut sent = 0;
    for paper_id in missing {
        let Some(row) = table.find(paper_id) else {
            warn!(%paper_id, sent, "missing paper has no accepted-table row, halting dispatch");
            return Err(CamReadyError::Integrity {
                paper_id: paper_id.clone(),
            });
        };
        let notification = render_notification(venue, template, paper_id, &row.title);
        let recipients = vec![notification.recipient_group.clone()];
        sender
            .send_message(
                &notification.subject,
                &recipients,
                &notification.body,
                &invitation,
            )
            .map_err(|source| CamReadyError::Dispatch {
                paper_id: paper_id.clone(),
                sent,
                source: Box::new(source),
            })?;
        sent += 1;
        info!(%paper_id, recipient = %notification.recipient_group, "reminder sent");
    }
    Ok(sent)
}

/// Records what would have been sent instead of sending it.
#[derive(Debug, Default)]
pub struct DryRunSender {
    recorded: RefCell<Vec<OutboundMessage>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub recipients: Vec<String>,
    pub body: String,
    pub invitation: String,
}

impl DryRunSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<OutboundMessage> {
        self.recorded.borrow().clone()
    }
}

impl MessageSender for DryRunSender {
    fn send_message(
        &self,
        subject: &str,
        recipients: &[String],
        body: &str,
        invitation: &str,
    ) -> Result<()> {
        info!(recipients = ?recipients, subject, "dry run: reminder not sent");
        self.recorded.borrow_mut().push(OutboundMessage {
            subject: subject.to_string(),
            recipients: recipients.to_vec(),
            body: body.to_string(),
            invitation: invitation.to_string(),
        });
        Ok(())
    }
}

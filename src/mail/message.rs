use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

use super::MailError;
use crate::models::EmailRequest;

/// Display name shown next to every sender address
pub const SENDER_NAME: &str = "PyTune Support";

/// Build the SMTP message for `request`, sent from `from`.
///
/// The body travels as the single part of a `multipart/mixed` container,
/// HTML or plain text depending on `is_html`.
pub fn build_message(request: &EmailRequest, from: &str) -> Result<Message, MailError> {
    let from_address: Address = from
        .trim()
        .parse()
        .map_err(|_| MailError::InvalidAddress(from.to_string()))?;

    let to: Mailbox = request
        .to_address
        .parse()
        .map_err(|_| MailError::InvalidAddress(request.to_address.clone()))?;

    let mut builder = Message::builder()
        .from(Mailbox::new(Some(SENDER_NAME.to_string()), from_address))
        .to(to)
        .subject(&request.subject);

    if let Some(reply_to) = request.reply_to.as_deref().filter(|r| !r.trim().is_empty()) {
        let mailbox: Mailbox = reply_to
            .parse()
            .map_err(|_| MailError::InvalidAddress(reply_to.to_string()))?;
        builder = builder.reply_to(mailbox);
    }

    let part = if request.is_html {
        SinglePart::html(request.body.clone())
    } else {
        SinglePart::plain(request.body.clone())
    };

    builder
        .multipart(MultiPart::mixed().singlepart(part))
        .map_err(|e| MailError::Build(e.to_string()))
}

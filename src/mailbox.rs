//! Named attachments from an mbox mailbox
//!
//! Every MIME part of every message that carries a file name is an
//! attachment. Parts are decoded from their transfer encoding; forwarded
//! messages are descended into. The mailbox is only read.

use crate::store::Blob;
use crate::{Error, Result};
use mail_parser::mailbox::mbox::MessageIterator;
use mail_parser::{Message, MessageParser, MimeHeaders, PartType};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One named part of a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// File name from the part's headers
    pub name: String,
    /// Decoded body
    pub content: Vec<u8>,
}

/// An mbox file, read message by message
#[derive(Clone, Debug)]
pub struct MboxSource {
    path: PathBuf,
}

impl MboxSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        MboxSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Iterate every named part, empty ones included
    ///
    /// Messages that do not parse are skipped with a warning.
    pub fn attachments(&self) -> Result<impl Iterator<Item = Result<Attachment>>> {
        let file = File::open(&self.path).map_err(|source| Error::Mailbox {
            path: self.path.clone(),
            source,
        })?;
        debug!(mbox = %self.path.display(), "scanning mbox for attachments");

        let path = self.path.clone();
        let parser = MessageParser::default();
        Ok(MessageIterator::new(BufReader::new(file))
            .enumerate()
            .flat_map(move |(index, raw)| match raw {
                Ok(raw) => match parser.parse(raw.contents()) {
                    Some(message) => {
                        let mut found = Vec::new();
                        collect_named_parts(&message, &mut found);
                        found.into_iter().map(Ok).collect::<Vec<_>>()
                    }
                    None => {
                        warn!(index, "skipping message that does not parse");
                        Vec::new()
                    }
                },
                Err(_) => vec![Err(Error::MailboxRead(path.clone()))],
            }))
    }

    /// Attachments with a non-empty body, as blobs named after the attachment
    pub fn blobs(&self) -> Result<impl Iterator<Item = Result<Blob>>> {
        Ok(self.attachments()?.filter_map(|attachment| match attachment {
            Ok(attachment) if attachment.content.is_empty() => None,
            Ok(attachment) => {
                debug!(
                    name = %attachment.name,
                    size = attachment.content.len(),
                    "found attachment"
                );
                Some(Ok(Blob::named(attachment.content, attachment.name)))
            }
            Err(e) => Some(Err(e)),
        }))
    }

    /// How often each attachment name matching any of `filters` occurs
    pub fn name_counts(&self, filters: &[Regex]) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for attachment in self.attachments()? {
            let attachment = attachment?;
            if filters.iter().any(|re| re.is_match(&attachment.name)) {
                *counts.entry(attachment.name).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

fn collect_named_parts(message: &Message<'_>, found: &mut Vec<Attachment>) {
    for part in &message.parts {
        match &part.body {
            PartType::Message(inner) => collect_named_parts(inner, found),
            PartType::Multipart(_) => {}
            _ => {
                if let Some(name) = part.attachment_name() {
                    found.push(Attachment {
                        name: name.to_string(),
                        content: part.contents().to_vec(),
                    });
                }
            }
        }
    }
}

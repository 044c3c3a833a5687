use std::sync::Mutex;

use async_trait::async_trait;

use super::{Mail, Mailer};

/// Records outgoing mail instead of delivering it. The integration tests
/// inspect the captured messages.
#[derive(Default)]
pub struct MailTrap {
    sent: Mutex<Vec<Mail>>,
}

impl MailTrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MailTrap {
    async fn send(&self, mail: Mail) -> Result<(), String> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

//! Records and session keys stored by the recorder.

mod message_record;
mod session;

pub use message_record::{MessageRecord, MessageType, NewMessageRecord};
pub use session::{SessionKey, UninfoSession};

//! Journal reads: time range, start-after.

use crate::codec::ReadJournalRequest;
use crate::error::MmsError;
use crate::outstanding_calls::CallKind;
use crate::session::Session;
use crate::value::JournalEntry;

use super::{complete_async, decode_or_parsing_error};

impl Session {
    pub fn read_journal(&self, req: ReadJournalRequest) -> Result<(Vec<JournalEntry>, bool), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_journal(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_journal(&buf, offset))
    }

    pub fn read_journal_async(
        &self,
        req: ReadJournalRequest,
        on_complete: impl FnOnce(u32, Result<(Vec<JournalEntry>, bool), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadJournal,
            |enc, id| enc.encode_read_journal(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_journal(buf, off), on_complete),
        )
    }
}

//! Client-initiated file transfer and obtain-file. Distinct from the
//! server-initiated file service in [`crate::file_service`], which answers
//! requests the *server* sends during obtain-file instead of issuing them.

use crate::codec::{
    FileCloseRequest, FileDeleteRequest, FileDirectoryRequest, FileDirectoryResult, FileOpenRequest,
    FileOpenResult, FileReadRequest, FileReadResult, FileRenameRequest, ObtainFileRequest,
};
use crate::error::MmsError;
use crate::outstanding_calls::CallKind;
use crate::session::Session;

use super::{complete_async, decode_or_parsing_error};

impl Session {
    pub fn file_open(&self, req: FileOpenRequest) -> Result<FileOpenResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_open(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_open(&buf, offset))
    }

    pub fn file_open_async(
        &self,
        req: FileOpenRequest,
        on_complete: impl FnOnce(u32, Result<FileOpenResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileOpen,
            |enc, id| enc.encode_file_open(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_open(buf, off), on_complete),
        )
    }

    pub fn file_read(&self, req: FileReadRequest) -> Result<FileReadResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_read(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_read(&buf, offset))
    }

    pub fn file_read_async(
        &self,
        req: FileReadRequest,
        on_complete: impl FnOnce(u32, Result<FileReadResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileRead,
            |enc, id| enc.encode_file_read(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_read(buf, off), on_complete),
        )
    }

    pub fn file_close(&self, req: FileCloseRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_close(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_close(&buf, offset))
    }

    pub fn file_close_async(
        &self,
        req: FileCloseRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileClose,
            |enc, id| enc.encode_file_close(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_close(buf, off), on_complete),
        )
    }

    pub fn file_rename(&self, req: FileRenameRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_rename(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_rename(&buf, offset))
    }

    pub fn file_rename_async(
        &self,
        req: FileRenameRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileRename,
            |enc, id| enc.encode_file_rename(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_rename(buf, off), on_complete),
        )
    }

    pub fn file_delete(&self, req: FileDeleteRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_delete(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_delete(&buf, offset))
    }

    pub fn file_delete_async(
        &self,
        req: FileDeleteRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileDelete,
            |enc, id| enc.encode_file_delete(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_delete(buf, off), on_complete),
        )
    }

    pub fn file_directory(&self, req: FileDirectoryRequest) -> Result<FileDirectoryResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_file_directory(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_file_directory(&buf, offset))
    }

    pub fn file_directory_async(
        &self,
        req: FileDirectoryRequest,
        on_complete: impl FnOnce(u32, Result<FileDirectoryResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::FileDirectory,
            |enc, id| enc.encode_file_directory(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_file_directory(buf, off), on_complete),
        )
    }

    /// Directory browse that pages through every entry via `continue_after`,
    /// mirroring [`Session::get_name_list_all`].
    pub fn file_directory_all(&self, path: Option<String>) -> Result<Vec<crate::codec::FileDirectoryEntry>, MmsError> {
        let mut entries = Vec::new();
        let mut continue_after = None;
        loop {
            let page = self.file_directory(FileDirectoryRequest {
                path: path.clone(),
                continue_after: continue_after.take(),
            })?;
            let more_follows = page.more_follows;
            let last = page.entries.last().map(|e| e.filename.clone());
            entries.extend(page.entries);
            if !more_follows {
                break;
            }
            continue_after = last;
        }
        Ok(entries)
    }

    /// Instructs the server to pull `source_file` from this client's own
    /// filestore ("obtain-file"). Requires obtain-file mode to be enabled (a
    /// filestore collaborator configured on this session), since the server
    /// will answer with file-open/read/close requests this client must
    /// serve.
    pub fn obtain_file(&self, req: ObtainFileRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_obtain_file(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_obtain_file(&buf, offset))
    }

    pub fn obtain_file_async(
        &self,
        req: ObtainFileRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ObtainFile,
            |enc, id| enc.encode_obtain_file(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_obtain_file(buf, off), on_complete),
        )
    }
}

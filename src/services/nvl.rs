//! Named-variable-list services: read/write values, directory, define/delete
//! (domain- and association-specific).

use crate::codec::{DefineNvlRequest, DeleteNvlRequest, NvlDirectoryResult, ReadNvlDirectoryRequest, ReadNvlValuesRequest, WriteNvlRequest};
use crate::error::MmsError;
use crate::outstanding_calls::CallKind;
use crate::session::Session;
use crate::value::AccessResult;

use super::{complete_async, decode_or_parsing_error};

impl Session {
    pub fn read_nvl_values(&self, req: ReadNvlValuesRequest) -> Result<Vec<AccessResult>, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_nvl_values(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_nvl_values(&buf, offset))
    }

    pub fn read_nvl_values_async(
        &self,
        req: ReadNvlValuesRequest,
        on_complete: impl FnOnce(u32, Result<Vec<AccessResult>, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadNvlValues,
            |enc, id| enc.encode_read_nvl_values(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_nvl_values(buf, off), on_complete),
        )
    }

    pub fn read_nvl_directory(&self, req: ReadNvlDirectoryRequest) -> Result<NvlDirectoryResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_nvl_directory(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_nvl_directory(&buf, offset))
    }

    pub fn read_nvl_directory_async(
        &self,
        req: ReadNvlDirectoryRequest,
        on_complete: impl FnOnce(u32, Result<NvlDirectoryResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadNvlDirectory,
            |enc, id| enc.encode_read_nvl_directory(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_nvl_directory(buf, off), on_complete),
        )
    }

    pub fn define_nvl(&self, req: DefineNvlRequest) -> Result<bool, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_define_nvl(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_define_nvl(&buf, offset))
    }

    pub fn define_nvl_async(
        &self,
        req: DefineNvlRequest,
        on_complete: impl FnOnce(u32, Result<bool, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::DefineNvl,
            |enc, id| enc.encode_define_nvl(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_define_nvl(buf, off), on_complete),
        )
    }

    pub fn delete_nvl(&self, req: DeleteNvlRequest) -> Result<bool, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_delete_nvl(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_delete_nvl(&buf, offset))
    }

    pub fn delete_nvl_async(
        &self,
        req: DeleteNvlRequest,
        on_complete: impl FnOnce(u32, Result<bool, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::DeleteNvl,
            |enc, id| enc.encode_delete_nvl(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_delete_nvl(buf, off), on_complete),
        )
    }

    pub fn write_nvl(&self, req: WriteNvlRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_write_nvl(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_write_nvl(&buf, offset))
    }

    pub fn write_nvl_async(
        &self,
        req: WriteNvlRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::WriteNvl,
            |enc, id| enc.encode_write_nvl(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_write_nvl(buf, off), on_complete),
        )
    }
}

//! Write-side services: single variable, array elements, multiple variables.

use crate::codec::{WriteArrayElementsRequest, WriteMultipleVariablesRequest, WriteVariableRequest};
use crate::error::{MmsError, ServiceError};
use crate::outstanding_calls::CallKind;
use crate::session::Session;

use super::{complete_async, decode_or_parsing_error};

impl Session {
    pub fn write_variable(&self, req: WriteVariableRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_write_variable(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_write_variable(&buf, offset))
    }

    pub fn write_variable_async(
        &self,
        req: WriteVariableRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::WriteVariable,
            |enc, id| enc.encode_write_variable(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_write_variable(buf, off), on_complete),
        )
    }

    pub fn write_array_elements(&self, req: WriteArrayElementsRequest) -> Result<(), MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_write_array_elements(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_write_array_elements(&buf, offset))
    }

    pub fn write_array_elements_async(
        &self,
        req: WriteArrayElementsRequest,
        on_complete: impl FnOnce(u32, Result<(), MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::WriteArrayElements,
            |enc, id| enc.encode_write_array_elements(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_write_array_elements(buf, off), on_complete),
        )
    }

    pub fn write_multiple_variables(
        &self,
        req: WriteMultipleVariablesRequest,
    ) -> Result<Vec<Result<(), ServiceError>>, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_write_multiple_variables(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_write_multiple_variables(&buf, offset))
    }

    pub fn write_multiple_variables_async(
        &self,
        req: WriteMultipleVariablesRequest,
        on_complete: impl FnOnce(u32, Result<Vec<Result<(), ServiceError>>, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::WriteMultipleVariables,
            |enc, id| enc.encode_write_multiple_variables(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_write_multiple_variables(buf, off), on_complete),
        )
    }
}

//! Read-side services: variable reads, directory lookups, identify/status.

use crate::codec::{
    GetNameListRequest, GetNameListResult, GetVariableAccessAttributesRequest, IdentifyResult,
    NameListObjectClass, ReadArrayElementsRequest, ReadMultipleVariablesRequest, ReadVariableRequest,
    StatusResult,
};
use crate::error::MmsError;
use crate::outstanding_calls::CallKind;
use crate::session::Session;
use crate::value::{AccessResult, MmsValue, VariableAccessAttributes};

use super::{complete_async, decode_or_parsing_error};

impl Session {
    pub fn read_variable(&self, req: ReadVariableRequest) -> Result<MmsValue, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_variable(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_variable(&buf, offset))
    }

    pub fn read_variable_async(
        &self,
        req: ReadVariableRequest,
        on_complete: impl FnOnce(u32, Result<MmsValue, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadVariable,
            |enc, id| enc.encode_read_variable(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_variable(buf, off), on_complete),
        )
    }

    pub fn read_array_elements(&self, req: ReadArrayElementsRequest) -> Result<Vec<MmsValue>, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_array_elements(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_array_elements(&buf, offset))
    }

    pub fn read_array_elements_async(
        &self,
        req: ReadArrayElementsRequest,
        on_complete: impl FnOnce(u32, Result<Vec<MmsValue>, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadArrayElements,
            |enc, id| enc.encode_read_array_elements(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_array_elements(buf, off), on_complete),
        )
    }

    pub fn read_multiple_variables(&self, req: ReadMultipleVariablesRequest) -> Result<Vec<AccessResult>, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_read_multiple_variables(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_read_multiple_variables(&buf, offset))
    }

    pub fn read_multiple_variables_async(
        &self,
        req: ReadMultipleVariablesRequest,
        on_complete: impl FnOnce(u32, Result<Vec<AccessResult>, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::ReadMultipleVariables,
            |enc, id| enc.encode_read_multiple_variables(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_read_multiple_variables(buf, off), on_complete),
        )
    }

    pub fn get_variable_access_attributes(
        &self,
        req: GetVariableAccessAttributesRequest,
    ) -> Result<VariableAccessAttributes, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_get_variable_access_attributes(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_get_variable_access_attributes(&buf, offset))
    }

    pub fn get_variable_access_attributes_async(
        &self,
        req: GetVariableAccessAttributesRequest,
        on_complete: impl FnOnce(u32, Result<VariableAccessAttributes, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::GetVariableAccessAttributes,
            |enc, id| enc.encode_get_variable_access_attributes(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_get_variable_access_attributes(buf, off), on_complete),
        )
    }

    /// One page of get-name-list. Callers wanting the full set should use
    /// [`Self::get_name_list_all`], which drives the "continue-after"
    /// pagination loop.
    pub fn get_name_list(&self, req: GetNameListRequest) -> Result<GetNameListResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_get_name_list(id, &req))?;
        decode_or_parsing_error(self.decoder().decode_get_name_list(&buf, offset))
    }

    pub fn get_name_list_async(
        &self,
        req: GetNameListRequest,
        on_complete: impl FnOnce(u32, Result<GetNameListResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::GetNameList,
            |enc, id| enc.encode_get_name_list(id, &req),
            complete_async(decoder, |d, buf, off| d.decode_get_name_list(buf, off), on_complete),
        )
    }

    /// Repeats get-name-list with `continue_after` set to the last
    /// identifier of the previous page until the server reports no more.
    pub fn get_name_list_all(
        &self,
        domain_id: Option<String>,
        object_class: NameListObjectClass,
    ) -> Result<Vec<String>, MmsError> {
        let mut identifiers = Vec::new();
        let mut continue_after = None;
        loop {
            let page = self.get_name_list(GetNameListRequest {
                domain_id: domain_id.clone(),
                object_class,
                continue_after: continue_after.take(),
            })?;
            let more_follows = page.more_follows;
            let last = page.identifiers.last().cloned();
            identifiers.extend(page.identifiers);
            if !more_follows {
                break;
            }
            continue_after = last;
        }
        Ok(identifiers)
    }

    pub fn identify(&self) -> Result<IdentifyResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_identify(id))?;
        decode_or_parsing_error(self.decoder().decode_identify(&buf, offset))
    }

    pub fn identify_async(
        &self,
        on_complete: impl FnOnce(u32, Result<IdentifyResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::Identify,
            |enc, id| enc.encode_identify(id),
            complete_async(decoder, |d, buf, off| d.decode_identify(buf, off), on_complete),
        )
    }

    pub fn status(&self) -> Result<StatusResult, MmsError> {
        let (buf, offset) = self.call_sync(|enc, id| enc.encode_status(id))?;
        decode_or_parsing_error(self.decoder().decode_status(&buf, offset))
    }

    pub fn status_async(
        &self,
        on_complete: impl FnOnce(u32, Result<StatusResult, MmsError>) + Send + 'static,
    ) -> Result<u32, MmsError> {
        let decoder = self.decoder_arc();
        self.call_async(
            CallKind::Status,
            |enc, id| enc.encode_status(id),
            complete_async(decoder, |d, buf, off| d.decode_status(buf, off), on_complete),
        )
    }
}

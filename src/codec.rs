//! # Encoder / Decoder (consumed)
//!
//! BER/ASN.1 body encoding and decoding is an external collaborator: this
//! module only defines the trait boundary and the service-specific
//! argument/result types the call surface (`services/`) passes across it.
//! One method per service, pairing a request encoder with its matching
//! response decoder.
//!
//! A real implementation encodes full ISO 9506 ASN.1 bodies. This crate
//! ships only [`test_codec`] (feature-gated), a deliberately non-BER
//! stand-in used to exercise correlation and dispatch in this crate's own
//! tests — it is not a protocol implementation.

use crate::error::CodecError;
use crate::value::{AccessResult, JournalEntry, MmsValue, ObjectName, VariableAccessAttributes};

/// Scope of a named-variable-list operation: domain- or
/// association-specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NvlScope {
    Domain(String),
    Association,
}

#[derive(Debug, Clone)]
pub struct ReadVariableRequest {
    pub domain_id: String,
    pub item_id: String,
}

#[derive(Debug, Clone)]
pub struct ReadArrayElementsRequest {
    pub domain_id: String,
    pub item_id: String,
    pub start_index: u32,
    pub number_of_elements: u32,
    pub component: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReadMultipleVariablesRequest {
    pub domain_id: String,
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReadNvlValuesRequest {
    pub scope: NvlScope,
    pub list_name: String,
}

#[derive(Debug, Clone)]
pub struct ReadNvlDirectoryRequest {
    pub scope: NvlScope,
    pub list_name: String,
}

#[derive(Debug, Clone)]
pub struct DefineNvlRequest {
    pub scope: NvlScope,
    pub list_name: String,
    pub variables: Vec<ObjectName>,
}

#[derive(Debug, Clone)]
pub struct DeleteNvlRequest {
    pub scope: NvlScope,
    pub list_name: String,
}

#[derive(Debug, Clone)]
pub struct GetVariableAccessAttributesRequest {
    pub name: ObjectName,
}

/// Object class for get-name-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameListObjectClass {
    DomainNames,
    Variable,
    NamedVariableList,
    Journal,
}

#[derive(Debug, Clone)]
pub struct GetNameListRequest {
    pub domain_id: Option<String>,
    pub object_class: NameListObjectClass,
    /// "continue-after" = last identifier from the previous page.
    pub continue_after: Option<String>,
}

#[derive(Debug, Clone)]
pub enum JournalRange {
    TimeRange { start_ms: u64, end_ms: u64 },
    StartAfter(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct ReadJournalRequest {
    pub domain_id: String,
    pub journal_name: String,
    pub range: JournalRange,
}

#[derive(Debug, Clone)]
pub struct WriteVariableRequest {
    pub domain_id: String,
    pub item_id: String,
    pub value: MmsValue,
}

#[derive(Debug, Clone)]
pub struct WriteArrayElementsRequest {
    pub domain_id: String,
    pub item_id: String,
    pub start_index: u32,
    pub values: Vec<MmsValue>,
}

#[derive(Debug, Clone)]
pub struct WriteMultipleVariablesRequest {
    pub domain_id: String,
    pub items: Vec<(String, MmsValue)>,
}

#[derive(Debug, Clone)]
pub struct WriteNvlRequest {
    pub scope: NvlScope,
    pub list_name: String,
    pub values: Vec<MmsValue>,
}

#[derive(Debug, Clone)]
pub struct FileOpenRequest {
    pub filename: String,
    pub initial_position: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FileReadRequest {
    pub frsm_id: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct FileCloseRequest {
    pub frsm_id: i32,
}

#[derive(Debug, Clone)]
pub struct FileRenameRequest {
    pub current_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone)]
pub struct FileDeleteRequest {
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct FileDirectoryRequest {
    pub path: Option<String>,
    pub continue_after: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObtainFileRequest {
    pub source_file: String,
    pub dest_file: String,
}

#[derive(Debug, Clone)]
pub struct InitiateParameters {
    pub local_detail_calling: u32,
    pub proposed_max_serv_outstanding_calling: u16,
    pub proposed_max_serv_outstanding_called: u16,
    pub proposed_data_structure_nesting_level: u8,
}

#[derive(Debug, Clone)]
pub struct GetNameListResult {
    pub identifiers: Vec<String>,
    pub more_follows: bool,
}

#[derive(Debug, Clone)]
pub struct FileOpenResult {
    pub frsm_id: i32,
    pub file_size: u64,
    pub last_modified_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct FileReadResult {
    pub data: Vec<u8>,
    pub more_follows: bool,
}

#[derive(Debug, Clone)]
pub struct FileDirectoryEntry {
    pub filename: String,
    pub size: u64,
    pub last_modified_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct FileDirectoryResult {
    pub entries: Vec<FileDirectoryEntry>,
    pub more_follows: bool,
}

#[derive(Debug, Clone)]
pub struct IdentifyResult {
    pub vendor_name: String,
    pub model_name: String,
    pub revision: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusResult {
    pub vmd_logical_status: i32,
    pub vmd_physical_status: i32,
}

#[derive(Debug, Clone)]
pub struct NvlDirectoryResult {
    pub variables: Vec<ObjectName>,
    pub deletable: bool,
}

/// A server-initiated file-service request body, decoded from a
/// confirmed-request PDU with extended tag `0x48`/`0x49`/`0x4a`.
#[derive(Debug, Clone)]
pub enum FilestoreRequest {
    Open { filename: String, initial_position: u32 },
    Read { frsm_id: i32 },
    Close { frsm_id: i32 },
}

/// The client's response to a server-initiated file-service request.
#[derive(Debug, Clone)]
pub enum FilestoreResponse {
    Open {
        frsm_id: i32,
        file_size: u64,
        last_modified_ms: Option<u64>,
    },
    Read {
        data: Vec<u8>,
        more_follows: bool,
    },
    Close,
    Error(crate::error::ServiceError),
}

/// Decoded unconfirmed information-report body. Only VMD-specific list
/// names are reported for the list-name case (domain and
/// association-specific list names are ignored by this core); both
/// VMD-specific and domain-specific names are reported for the per-variable
/// case.
#[derive(Debug, Clone)]
pub enum InformationReportKind {
    ListName { list_name: String, values: MmsValue },
    Variables(Vec<AccessResult>),
    /// Domain or association-specific list name — ignored by this core.
    Ignored,
}

/// Serializes one MMS service request into wire bytes, given the invoke-id
/// already assigned by the session.
pub trait Encoder: Send + Sync {
    fn encode_initiate_request(&self, params: &InitiateParameters) -> Result<Vec<u8>, CodecError>;
    fn encode_conclude_request(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError>;
    fn encode_read_variable(&self, invoke_id: u32, req: &ReadVariableRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_read_array_elements(&self, invoke_id: u32, req: &ReadArrayElementsRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_read_multiple_variables(&self, invoke_id: u32, req: &ReadMultipleVariablesRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_read_nvl_values(&self, invoke_id: u32, req: &ReadNvlValuesRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_read_nvl_directory(&self, invoke_id: u32, req: &ReadNvlDirectoryRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_define_nvl(&self, invoke_id: u32, req: &DefineNvlRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_delete_nvl(&self, invoke_id: u32, req: &DeleteNvlRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_get_variable_access_attributes(
        &self,
        invoke_id: u32,
        req: &GetVariableAccessAttributesRequest,
    ) -> Result<Vec<u8>, CodecError>;
    fn encode_get_name_list(&self, invoke_id: u32, req: &GetNameListRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_identify(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError>;
    fn encode_status(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError>;
    fn encode_read_journal(&self, invoke_id: u32, req: &ReadJournalRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_write_variable(&self, invoke_id: u32, req: &WriteVariableRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_write_array_elements(&self, invoke_id: u32, req: &WriteArrayElementsRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_write_multiple_variables(
        &self,
        invoke_id: u32,
        req: &WriteMultipleVariablesRequest,
    ) -> Result<Vec<u8>, CodecError>;
    fn encode_write_nvl(&self, invoke_id: u32, req: &WriteNvlRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_open(&self, invoke_id: u32, req: &FileOpenRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_read(&self, invoke_id: u32, req: &FileReadRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_close(&self, invoke_id: u32, req: &FileCloseRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_rename(&self, invoke_id: u32, req: &FileRenameRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_delete(&self, invoke_id: u32, req: &FileDeleteRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_file_directory(&self, invoke_id: u32, req: &FileDirectoryRequest) -> Result<Vec<u8>, CodecError>;
    fn encode_obtain_file(&self, invoke_id: u32, req: &ObtainFileRequest) -> Result<Vec<u8>, CodecError>;

    /// Encodes the client's response to a server-initiated file-service
    /// request — the only path where this client acts as responder rather
    /// than initiator.
    fn encode_file_service_response(&self, invoke_id: u32, response: &FilestoreResponse) -> Result<Vec<u8>, CodecError>;
}

/// Parses one MMS service response body. `buf_pos` is the offset at which
/// the service-specific body starts (after the outer tag and invoke-id),
/// mirroring the C original's `(buffer, bufPos)` convention.
pub trait Decoder: Send + Sync {
    fn decode_initiate_response(&self, buf: &[u8]) -> Result<(), CodecError>;
    fn decode_read_variable(&self, buf: &[u8], buf_pos: usize) -> Result<MmsValue, CodecError>;
    fn decode_read_array_elements(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<MmsValue>, CodecError>;
    fn decode_read_multiple_variables(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<AccessResult>, CodecError>;
    fn decode_read_nvl_values(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<AccessResult>, CodecError>;
    fn decode_read_nvl_directory(&self, buf: &[u8], buf_pos: usize) -> Result<NvlDirectoryResult, CodecError>;
    fn decode_define_nvl(&self, buf: &[u8], buf_pos: usize) -> Result<bool, CodecError>;
    fn decode_delete_nvl(&self, buf: &[u8], buf_pos: usize) -> Result<bool, CodecError>;
    fn decode_get_variable_access_attributes(
        &self,
        buf: &[u8],
        buf_pos: usize,
    ) -> Result<VariableAccessAttributes, CodecError>;
    fn decode_get_name_list(&self, buf: &[u8], buf_pos: usize) -> Result<GetNameListResult, CodecError>;
    fn decode_identify(&self, buf: &[u8], buf_pos: usize) -> Result<IdentifyResult, CodecError>;
    fn decode_status(&self, buf: &[u8], buf_pos: usize) -> Result<StatusResult, CodecError>;
    fn decode_read_journal(&self, buf: &[u8], buf_pos: usize) -> Result<(Vec<JournalEntry>, bool), CodecError>;
    fn decode_write_variable(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_write_array_elements(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_write_multiple_variables(
        &self,
        buf: &[u8],
        buf_pos: usize,
    ) -> Result<Vec<Result<(), crate::error::ServiceError>>, CodecError>;
    fn decode_write_nvl(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_file_open(&self, buf: &[u8], buf_pos: usize) -> Result<FileOpenResult, CodecError>;
    fn decode_file_read(&self, buf: &[u8], buf_pos: usize) -> Result<FileReadResult, CodecError>;
    fn decode_file_close(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_file_rename(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_file_delete(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;
    fn decode_file_directory(&self, buf: &[u8], buf_pos: usize) -> Result<FileDirectoryResult, CodecError>;
    fn decode_obtain_file(&self, buf: &[u8], buf_pos: usize) -> Result<(), CodecError>;

    /// Parses a confirmed-error PDU (outer tag `0xa2`), returning the
    /// invoke-id and the mapped service error. Accepts sub-tags in any
    /// order and silently ignores unrecognized ones.
    fn decode_confirmed_error(&self, buf: &[u8]) -> Result<(u32, crate::error::ServiceError), CodecError>;

    /// Parses a reject PDU (outer tag `0xa4`), returning the invoke-id and
    /// the mapped reject error.
    fn decode_reject(&self, buf: &[u8]) -> Result<(u32, crate::error::RejectError), CodecError>;

    /// Parses the BER universal INTEGER invoke-id (tag `0x02`) that leads
    /// every confirmed-response/request body, returning the invoke-id and
    /// the offset at which the service-specific body begins.
    fn decode_invoke_id(&self, buf: &[u8]) -> Result<(u32, usize), CodecError>;

    /// Parses an unconfirmed PDU's information-report body (outer tag `0xa3`).
    fn decode_information_report(&self, buf: &[u8]) -> Result<InformationReportKind, CodecError>;

    /// Parses a server-initiated confirmed-request (outer tag `0xa0`,
    /// extended sub-tag `0x48`/`0x49`/`0x4a`) into its invoke-id and body.
    fn decode_server_file_request(&self, buf: &[u8]) -> Result<(u32, FilestoreRequest), CodecError>;
}

/// A non-BER test codec used only by this crate's own tests and the
/// loopback transport. Frames each request/response as
/// `[invoke_id: u32 LE][json payload]`; this lets the session engine's
/// correlation and timeout logic be exercised end-to-end without a real
/// ASN.1 stack, which remains an external collaborator.
#[cfg(any(test, feature = "test-support"))]
pub mod test_codec {
    use super::*;
    use serde::{Deserialize, Serialize};

    pub struct JsonTestCodec;

    fn frame<T: Serialize>(invoke_id: u32, body: &T) -> Result<Vec<u8>, CodecError> {
        let json = serde_json::to_vec(body).map_err(|e| CodecError::Malformed(e.to_string()))?;
        let mut out = Vec::with_capacity(4 + json.len());
        out.extend_from_slice(&invoke_id.to_le_bytes());
        out.extend_from_slice(&json);
        Ok(out)
    }

    fn unframe<'a, T: Deserialize<'a>>(buf: &'a [u8], buf_pos: usize) -> Result<T, CodecError> {
        let bytes = buf.get(buf_pos..).ok_or(CodecError::Truncated)?;
        serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
    }

    impl Encoder for JsonTestCodec {
        fn encode_initiate_request(&self, params: &InitiateParameters) -> Result<Vec<u8>, CodecError> {
            frame(0, &(
                params.local_detail_calling,
                params.proposed_max_serv_outstanding_calling,
                params.proposed_max_serv_outstanding_called,
                params.proposed_data_structure_nesting_level,
            ))
        }

        fn encode_conclude_request(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &())
        }

        fn encode_read_variable(&self, invoke_id: u32, req: &ReadVariableRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.domain_id.clone(), req.item_id.clone()))
        }

        fn encode_read_array_elements(&self, invoke_id: u32, req: &ReadArrayElementsRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.domain_id.clone(), req.item_id.clone(), req.start_index, req.number_of_elements))
        }

        fn encode_read_multiple_variables(&self, invoke_id: u32, req: &ReadMultipleVariablesRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.domain_id.clone(), req.item_ids.clone()))
        }

        fn encode_read_nvl_values(&self, invoke_id: u32, req: &ReadNvlValuesRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.list_name)
        }

        fn encode_read_nvl_directory(&self, invoke_id: u32, req: &ReadNvlDirectoryRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.list_name)
        }

        fn encode_define_nvl(&self, invoke_id: u32, req: &DefineNvlRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.list_name)
        }

        fn encode_delete_nvl(&self, invoke_id: u32, req: &DeleteNvlRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.list_name)
        }

        fn encode_get_variable_access_attributes(
            &self,
            invoke_id: u32,
            _req: &GetVariableAccessAttributesRequest,
        ) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &())
        }

        fn encode_get_name_list(&self, invoke_id: u32, req: &GetNameListRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.continue_after)
        }

        fn encode_identify(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &())
        }

        fn encode_status(&self, invoke_id: u32) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &())
        }

        fn encode_read_journal(&self, invoke_id: u32, req: &ReadJournalRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.journal_name)
        }

        fn encode_write_variable(&self, invoke_id: u32, req: &WriteVariableRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.domain_id.clone(), req.item_id.clone()))
        }

        fn encode_write_array_elements(&self, invoke_id: u32, req: &WriteArrayElementsRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.domain_id.clone(), req.item_id.clone()))
        }

        fn encode_write_multiple_variables(
            &self,
            invoke_id: u32,
            req: &WriteMultipleVariablesRequest,
        ) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.domain_id)
        }

        fn encode_write_nvl(&self, invoke_id: u32, req: &WriteNvlRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.list_name)
        }

        fn encode_file_open(&self, invoke_id: u32, req: &FileOpenRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.filename.clone(), req.initial_position))
        }

        fn encode_file_read(&self, invoke_id: u32, req: &FileReadRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.frsm_id)
        }

        fn encode_file_close(&self, invoke_id: u32, req: &FileCloseRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.frsm_id)
        }

        fn encode_file_rename(&self, invoke_id: u32, req: &FileRenameRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.current_name.clone(), req.new_name.clone()))
        }

        fn encode_file_delete(&self, invoke_id: u32, req: &FileDeleteRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.filename)
        }

        fn encode_file_directory(&self, invoke_id: u32, req: &FileDirectoryRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &req.continue_after)
        }

        fn encode_obtain_file(&self, invoke_id: u32, req: &ObtainFileRequest) -> Result<Vec<u8>, CodecError> {
            frame(invoke_id, &(req.source_file.clone(), req.dest_file.clone()))
        }

        fn encode_file_service_response(&self, invoke_id: u32, response: &FilestoreResponse) -> Result<Vec<u8>, CodecError> {
            #[derive(Serialize)]
            enum Wire {
                Open { frsm_id: i32, file_size: u64 },
                Read { data: Vec<u8>, more_follows: bool },
                Close,
                Error,
            }
            let wire = match response {
                FilestoreResponse::Open { frsm_id, file_size, .. } => Wire::Open { frsm_id: *frsm_id, file_size: *file_size },
                FilestoreResponse::Read { data, more_follows } => Wire::Read { data: data.clone(), more_follows: *more_follows },
                FilestoreResponse::Close => Wire::Close,
                FilestoreResponse::Error(_) => Wire::Error,
            };
            frame(invoke_id, &wire)
        }
    }

    impl Decoder for JsonTestCodec {
        fn decode_initiate_response(&self, _buf: &[u8]) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_read_variable(&self, buf: &[u8], buf_pos: usize) -> Result<MmsValue, CodecError> {
            let v: i64 = unframe(buf, buf_pos)?;
            Ok(MmsValue::Integer(v))
        }

        fn decode_read_array_elements(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<MmsValue>, CodecError> {
            let v: Vec<i64> = unframe(buf, buf_pos)?;
            Ok(v.into_iter().map(MmsValue::Integer).collect())
        }

        fn decode_read_multiple_variables(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<AccessResult>, CodecError> {
            let v: Vec<i64> = unframe(buf, buf_pos)?;
            Ok(v.into_iter()
                .map(|i| AccessResult { name: None, value: Ok(MmsValue::Integer(i)) })
                .collect())
        }

        fn decode_read_nvl_values(&self, buf: &[u8], buf_pos: usize) -> Result<Vec<AccessResult>, CodecError> {
            self.decode_read_multiple_variables(buf, buf_pos)
        }

        fn decode_read_nvl_directory(&self, buf: &[u8], buf_pos: usize) -> Result<NvlDirectoryResult, CodecError> {
            let names: Vec<String> = unframe(buf, buf_pos)?;
            Ok(NvlDirectoryResult {
                variables: names.into_iter().map(ObjectName::VmdSpecific).collect(),
                deletable: true,
            })
        }

        fn decode_define_nvl(&self, buf: &[u8], buf_pos: usize) -> Result<bool, CodecError> {
            unframe(buf, buf_pos)
        }

        fn decode_delete_nvl(&self, buf: &[u8], buf_pos: usize) -> Result<bool, CodecError> {
            unframe(buf, buf_pos)
        }

        fn decode_get_variable_access_attributes(
            &self,
            buf: &[u8],
            buf_pos: usize,
        ) -> Result<VariableAccessAttributes, CodecError> {
            let mms_type_description: String = unframe(buf, buf_pos)?;
            Ok(VariableAccessAttributes { mms_type_description })
        }

        fn decode_get_name_list(&self, buf: &[u8], buf_pos: usize) -> Result<GetNameListResult, CodecError> {
            let (identifiers, more_follows): (Vec<String>, bool) = unframe(buf, buf_pos)?;
            Ok(GetNameListResult { identifiers, more_follows })
        }

        fn decode_identify(&self, buf: &[u8], buf_pos: usize) -> Result<IdentifyResult, CodecError> {
            let (vendor_name, model_name, revision): (String, String, String) = unframe(buf, buf_pos)?;
            Ok(IdentifyResult { vendor_name, model_name, revision })
        }

        fn decode_status(&self, buf: &[u8], buf_pos: usize) -> Result<StatusResult, CodecError> {
            let (vmd_logical_status, vmd_physical_status): (i32, i32) = unframe(buf, buf_pos)?;
            Ok(StatusResult { vmd_logical_status, vmd_physical_status })
        }

        fn decode_read_journal(&self, buf: &[u8], buf_pos: usize) -> Result<(Vec<JournalEntry>, bool), CodecError> {
            let more_follows: bool = unframe(buf, buf_pos)?;
            Ok((Vec::new(), more_follows))
        }

        fn decode_write_variable(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_write_array_elements(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_write_multiple_variables(
            &self,
            buf: &[u8],
            buf_pos: usize,
        ) -> Result<Vec<Result<(), crate::error::ServiceError>>, CodecError> {
            let count: usize = unframe(buf, buf_pos)?;
            Ok((0..count).map(|_| Ok(())).collect())
        }

        fn decode_write_nvl(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_file_open(&self, buf: &[u8], buf_pos: usize) -> Result<FileOpenResult, CodecError> {
            let (frsm_id, file_size): (i32, u64) = unframe(buf, buf_pos)?;
            Ok(FileOpenResult { frsm_id, file_size, last_modified_ms: None })
        }

        fn decode_file_read(&self, buf: &[u8], buf_pos: usize) -> Result<FileReadResult, CodecError> {
            let (data, more_follows): (Vec<u8>, bool) = unframe(buf, buf_pos)?;
            Ok(FileReadResult { data, more_follows })
        }

        fn decode_file_close(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_file_rename(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_file_delete(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_file_directory(&self, buf: &[u8], buf_pos: usize) -> Result<FileDirectoryResult, CodecError> {
            let (names, more_follows): (Vec<String>, bool) = unframe(buf, buf_pos)?;
            Ok(FileDirectoryResult {
                entries: names
                    .into_iter()
                    .map(|filename| FileDirectoryEntry { filename, size: 0, last_modified_ms: None })
                    .collect(),
                more_follows,
            })
        }

        fn decode_obtain_file(&self, _buf: &[u8], _buf_pos: usize) -> Result<(), CodecError> {
            Ok(())
        }

        fn decode_confirmed_error(&self, buf: &[u8]) -> Result<(u32, crate::error::ServiceError), CodecError> {
            let invoke_id = u32::from_le_bytes(buf.get(0..4).ok_or(CodecError::Truncated)?.try_into().unwrap());
            let (class, code): (i32, i32) = unframe(buf, 4)?;
            let err = match crate::error::MmsError::from_service_error(class, code) {
                crate::error::MmsError::Service(s) => s,
                _ => unreachable!(),
            };
            Ok((invoke_id, err))
        }

        fn decode_reject(&self, buf: &[u8]) -> Result<(u32, crate::error::RejectError), CodecError> {
            let invoke_id = u32::from_le_bytes(buf.get(0..4).ok_or(CodecError::Truncated)?.try_into().unwrap());
            let (reject_type, reject_reason): (i32, i32) = unframe(buf, 4)?;
            let err = match crate::error::MmsError::from_reject(reject_type, reject_reason) {
                crate::error::MmsError::Reject(r) => r,
                _ => unreachable!(),
            };
            Ok((invoke_id, err))
        }

        fn decode_invoke_id(&self, buf: &[u8]) -> Result<(u32, usize), CodecError> {
            let invoke_id = u32::from_le_bytes(buf.get(0..4).ok_or(CodecError::Truncated)?.try_into().unwrap());
            Ok((invoke_id, 4))
        }

        fn decode_information_report(&self, buf: &[u8]) -> Result<InformationReportKind, CodecError> {
            let wire: ReportWire = serde_json::from_slice(buf).map_err(|e| CodecError::Malformed(e.to_string()))?;
            Ok(match wire {
                ReportWire::ListName(list_name, v) => InformationReportKind::ListName {
                    list_name,
                    values: MmsValue::Integer(v),
                },
                ReportWire::Variables(items) => InformationReportKind::Variables(
                    items
                        .into_iter()
                        .map(|(name, v)| AccessResult {
                            name: name.map(ObjectName::VmdSpecific),
                            value: Ok(MmsValue::Integer(v)),
                        })
                        .collect(),
                ),
                ReportWire::Ignored => InformationReportKind::Ignored,
            })
        }

        fn decode_server_file_request(&self, buf: &[u8]) -> Result<(u32, FilestoreRequest), CodecError> {
            #[derive(Deserialize)]
            enum Wire {
                Open(String, u32),
                Read(i32),
                Close(i32),
            }
            let invoke_id = u32::from_le_bytes(buf.get(0..4).ok_or(CodecError::Truncated)?.try_into().unwrap());
            let wire: Wire = unframe(buf, 4)?;
            let req = match wire {
                Wire::Open(filename, initial_position) => FilestoreRequest::Open { filename, initial_position },
                Wire::Read(frsm_id) => FilestoreRequest::Read { frsm_id },
                Wire::Close(frsm_id) => FilestoreRequest::Close { frsm_id },
            };
            Ok((invoke_id, req))
        }
    }

    /// Wire shape for test information-report bodies; public so integration
    /// tests can build bytes for a mock server to push at the client.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum ReportWire {
        ListName(String, i64),
        Variables(Vec<(Option<String>, i64)>),
        Ignored,
    }
}

//! # Server-Initiated File Service
//!
//! When obtain-file mode is enabled, the server may send a confirmed-request
//! asking the client to open/read/close a file from the client's own
//! filestore. This is the only path where the client acts as responder. The
//! local filestore itself is an external collaborator; [`Filestore`] is the
//! narrow interface the engine needs from it, plus a small filesystem-backed
//! reference implementation rooted at `filestore_basepath`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::Mutex;

use crate::codec::{Decoder, Encoder, FilestoreRequest, FilestoreResponse};
use crate::error::{FileError, MmsError, ServiceError};

/// Maximum bytes returned per file-read response.
const FILE_READ_CHUNK: usize = 4096;

/// A handle returned by [`Filestore::open`].
pub struct OpenedFile {
    pub frsm_id: i32,
    pub file_size: u64,
    pub last_modified_ms: Option<u64>,
}

/// The narrow interface the engine needs from the local filestore.
pub trait Filestore: Send + Sync {
    fn open(&self, filename: &str, initial_position: u32) -> Result<OpenedFile, ServiceError>;
    fn read(&self, frsm_id: i32) -> Result<(Vec<u8>, bool), ServiceError>;
    fn close(&self, frsm_id: i32) -> Result<(), ServiceError>;
}

/// Parses a server-initiated file-service confirmed-request, serves it
/// through `filestore`, encodes the response, and returns the bytes to
/// send. Errors here are ordinary `Result` returns, not panics — a
/// malformed request or an absent file both produce a valid, sendable
/// response PDU (an MMS service-error), not a dropped connection.
pub fn handle_request(
    encoder: &dyn Encoder,
    decoder: &dyn Decoder,
    filestore: &dyn Filestore,
    buf: &[u8],
) -> Result<Vec<u8>, MmsError> {
    let (invoke_id, request) = decoder.decode_server_file_request(buf)?;

    let response = match request {
        FilestoreRequest::Open { filename, initial_position } => {
            match filestore.open(&filename, initial_position) {
                Ok(opened) => FilestoreResponse::Open {
                    frsm_id: opened.frsm_id,
                    file_size: opened.file_size,
                    last_modified_ms: opened.last_modified_ms,
                },
                Err(e) => FilestoreResponse::Error(e),
            }
        }
        FilestoreRequest::Read { frsm_id } => match filestore.read(frsm_id) {
            Ok((data, more_follows)) => FilestoreResponse::Read { data, more_follows },
            Err(e) => FilestoreResponse::Error(e),
        },
        FilestoreRequest::Close { frsm_id } => match filestore.close(frsm_id) {
            Ok(()) => FilestoreResponse::Close,
            Err(e) => FilestoreResponse::Error(e),
        },
    };

    encoder
        .encode_file_service_response(invoke_id, &response)
        .map_err(MmsError::from)
}

struct FileState {
    file: File,
    position: u64,
}

/// Filesystem-backed [`Filestore`] rooted at a configurable base path
/// (`ClientConfig::filestore_basepath`). Paths are resolved relative to the
/// base and rejected if they would escape it.
pub struct FilesystemFilestore {
    base_path: PathBuf,
    next_frsm_id: AtomicI32,
    open_files: Mutex<HashMap<i32, FileState>>,
}

impl FilesystemFilestore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            next_frsm_id: AtomicI32::new(1),
            open_files: Mutex::new(HashMap::new()),
        }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        let candidate = Path::new(filename);
        if filename.contains("..") || candidate.is_absolute() {
            return Err(ServiceError::File(FileError::SyntaxError));
        }
        Ok(self.base_path.join(candidate))
    }
}

impl Filestore for FilesystemFilestore {
    fn open(&self, filename: &str, initial_position: u32) -> Result<OpenedFile, ServiceError> {
        let path = self.resolve(filename)?;
        let mut file = File::open(&path).map_err(|_| ServiceError::File(FileError::NonExistent))?;
        let metadata = file.metadata().map_err(|_| ServiceError::File(FileError::Other))?;
        let last_modified_ms = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);

        file.seek(SeekFrom::Start(initial_position as u64))
            .map_err(|_| ServiceError::File(FileError::PositionInvalid))?;

        let frsm_id = self.next_frsm_id.fetch_add(1, Ordering::SeqCst);
        self.open_files.lock().insert(
            frsm_id,
            FileState {
                file,
                position: initial_position as u64,
            },
        );

        Ok(OpenedFile {
            frsm_id,
            file_size: metadata.len(),
            last_modified_ms,
        })
    }

    fn read(&self, frsm_id: i32) -> Result<(Vec<u8>, bool), ServiceError> {
        let mut open_files = self.open_files.lock();
        let state = open_files.get_mut(&frsm_id).ok_or(ServiceError::File(FileError::NonExistent))?;

        let mut buf = vec![0u8; FILE_READ_CHUNK];
        let n = state.file.read(&mut buf).map_err(|_| ServiceError::File(FileError::Other))?;
        buf.truncate(n);
        state.position += n as u64;

        let file_len = state
            .file
            .metadata()
            .map(|m| m.len())
            .map_err(|_| ServiceError::File(FileError::Other))?;
        let more_follows = state.position < file_len;

        Ok((buf, more_follows))
    }

    fn close(&self, frsm_id: i32) -> Result<(), ServiceError> {
        self.open_files
            .lock()
            .remove(&frsm_id)
            .map(|_| ())
            .ok_or(ServiceError::File(FileError::NonExistent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_codec::JsonTestCodec;
    use std::io::Write;

    #[test]
    fn open_read_close_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.txt");
        std::fs::File::create(&path).unwrap().write_all(b"hello world").unwrap();

        let store = FilesystemFilestore::new(dir.path());
        let opened = store.open("example.txt", 0).unwrap();
        assert_eq!(opened.file_size, 11);

        let (data, more) = store.read(opened.frsm_id).unwrap();
        assert_eq!(data, b"hello world");
        assert!(!more);

        store.close(opened.frsm_id).unwrap();
        assert!(matches!(
            store.read(opened.frsm_id),
            Err(ServiceError::File(FileError::NonExistent))
        ));
    }

    #[test]
    fn open_missing_file_yields_non_existent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemFilestore::new(dir.path());
        assert!(matches!(
            store.open("missing.txt", 0),
            Err(ServiceError::File(FileError::NonExistent))
        ));
    }

    #[test]
    fn path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemFilestore::new(dir.path());
        assert!(matches!(
            store.open("../escape.txt", 0),
            Err(ServiceError::File(FileError::SyntaxError))
        ));
    }

    #[test]
    fn handle_request_encodes_service_error_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemFilestore::new(dir.path());
        let codec = JsonTestCodec;

        let open_req = codec
            .encode_file_open(3, &crate::codec::FileOpenRequest {
                filename: "missing.txt".into(),
                initial_position: 0,
            })
            .unwrap();
        // Re-frame as a server-initiated request using the same wire shape
        // the decoder expects (invoke-id + JSON body); `encode_file_open`'s
        // body already matches `FilestoreRequest::Open`'s wire shape.
        let response_bytes = handle_request(&codec, &codec, &store, &open_req).unwrap();
        assert!(!response_bytes.is_empty());
    }
}

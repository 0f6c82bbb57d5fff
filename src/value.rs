//! # Value Model (stand-in)
//!
//! The real `MmsValue`/variable-specification tree is an external
//! collaborator out of scope here. This module provides just enough of a
//! stand-in to compile and test the session engine's correlation and
//! dispatch logic against realistic decoded shapes — it is not a full
//! ASN.1 value model and does not attempt to cover every MMS data type.

use std::collections::BTreeMap;

/// A minimal decoded MMS value, covering the variants exercised by the
/// session engine's own tests.
#[derive(Debug, Clone, PartialEq)]
pub enum MmsValue {
    Integer(i64),
    Unsigned(u64),
    Boolean(bool),
    BitString(Vec<u8>),
    OctetString(Vec<u8>),
    VisibleString(String),
    Structure(Vec<MmsValue>),
}

/// A variable specification naming a variable in a domain or the VMD scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectName {
    VmdSpecific(String),
    DomainSpecific { domain_id: String, item_id: String },
}

/// `{variable-spec, access-result}` pair as delivered to the report handler
/// or decoded from a read-multiple-variables response.
#[derive(Debug, Clone)]
pub struct AccessResult {
    pub name: Option<ObjectName>,
    pub value: Result<MmsValue, crate::error::ServiceError>,
}

/// A named-variable-list directory entry.
#[derive(Debug, Clone)]
pub struct VariableListEntry {
    pub name: ObjectName,
}

/// Attributes returned by get-variable-access-attributes.
#[derive(Debug, Clone)]
pub struct VariableAccessAttributes {
    pub mms_type_description: String,
}

/// A single journal entry returned by read-journal.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub entry_id: Vec<u8>,
    pub occurrence_time_ms: u64,
    pub entries: BTreeMap<String, MmsValue>,
}

//! # Unsolicited Report Handling
//!
//! Dispatches a decoded information-report PDU to the registered report
//! handler. VMD-specific list-name reports deliver the whole value tree in
//! one call; list-of-variable reports deliver one call per element; and
//! domain/association-specific list-name reports are ignored, since this
//! core only defines list-of-variable semantics for IEC 61850 and not
//! list-name domain/association scoping.

use crate::codec::InformationReportKind;
use crate::value::{MmsValue, ObjectName};

/// One report delivered to the user's `information_report` callback.
#[derive(Debug, Clone)]
pub struct ReportEvent {
    pub domain_id: Option<String>,
    pub item_or_list_name: String,
    pub is_list: bool,
    pub value: MmsValue,
}

pub type ReportHandler = dyn Fn(ReportEvent) + Send + Sync;

/// Dispatches a decoded report to `handler`. If no handler is registered,
/// the PDU is silently dropped — the caller should skip calling this at all
/// when `handler` is `None`; this function assumes a handler is present so
/// that the dispatch/drop decision stays visible at the call site in
/// `demux.rs`.
pub fn dispatch(kind: InformationReportKind, handler: &ReportHandler) {
    match kind {
        InformationReportKind::ListName { list_name, values } => {
            handler(ReportEvent {
                domain_id: None,
                item_or_list_name: list_name,
                is_list: true,
                value: values,
            });
        }
        InformationReportKind::Variables(results) => {
            for result in results {
                let Some(name) = result.name else { continue };
                let (domain_id, item_or_list_name) = match name {
                    ObjectName::VmdSpecific(n) => (None, n),
                    ObjectName::DomainSpecific { domain_id, item_id } => (Some(domain_id), item_id),
                };
                let value = match result.value {
                    Ok(v) => v,
                    // A per-element access error has no value to deliver.
                    Err(_) => continue,
                };
                handler(ReportEvent {
                    domain_id,
                    item_or_list_name,
                    is_list: false,
                    value,
                });
            }
        }
        InformationReportKind::Ignored => {
            tracing::trace!("ignoring domain/association-specific list-name report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AccessResult;
    use std::sync::{Arc, Mutex};

    #[test]
    fn list_name_report_delivers_whole_tree_once() {
        let events: Arc<Mutex<Vec<ReportEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let events2 = events.clone();
        let handler: Box<ReportHandler> = Box::new(move |e| events2.lock().unwrap().push(e));

        dispatch(
            InformationReportKind::ListName {
                list_name: "MyList".into(),
                values: MmsValue::Integer(7),
            },
            &*handler,
        );

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_list);
        assert_eq!(events[0].item_or_list_name, "MyList");
    }

    #[test]
    fn variables_report_delivers_one_call_per_element() {
        let events: Arc<Mutex<Vec<ReportEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let events2 = events.clone();
        let handler: Box<ReportHandler> = Box::new(move |e| events2.lock().unwrap().push(e));

        dispatch(
            InformationReportKind::Variables(vec![
                AccessResult {
                    name: Some(ObjectName::VmdSpecific("A".into())),
                    value: Ok(MmsValue::Integer(1)),
                },
                AccessResult {
                    name: Some(ObjectName::DomainSpecific {
                        domain_id: "D".into(),
                        item_id: "B".into(),
                    }),
                    value: Ok(MmsValue::Integer(2)),
                },
            ]),
            &*handler,
        );

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(!events[0].is_list);
        assert_eq!(events[0].domain_id, None);
        assert_eq!(events[1].domain_id.as_deref(), Some("D"));
    }

    #[test]
    fn ignored_report_delivers_nothing() {
        let events: Arc<Mutex<Vec<ReportEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let events2 = events.clone();
        let handler: Box<ReportHandler> = Box::new(move |e| events2.lock().unwrap().push(e));

        dispatch(InformationReportKind::Ignored, &*handler);
        assert!(events.lock().unwrap().is_empty());
    }
}

//! Input validation for record/zone pairs

use crate::error::{AggregateError, Error};
use crate::record::{DesiredRecord, ZoneDescriptor};

/// Check a record and zone for required fields
///
/// Every violated rule produces its own cause; validation never stops at
/// the first problem. The record is optional so callers holding a
/// possibly-absent record (e.g. a deserialized resource) can validate it
/// directly.
pub fn validate_input(
    record: Option<&DesiredRecord>,
    zone: &ZoneDescriptor,
) -> Result<(), AggregateError> {
    let mut errs = AggregateError::new();

    match record {
        None => errs.push(Error::invalid_input("dns record is nil")),
        Some(record) => {
            if record.name.is_empty() {
                errs.push(Error::invalid_input("dns record name is empty"));
            }
            if record.record_type.is_empty() {
                errs.push(Error::invalid_input("dns record type is empty"));
            }
            if record.targets.is_empty() {
                errs.push(Error::invalid_input("dns record content is empty"));
            }
        }
    }

    if zone.id.is_empty() {
        errs.push(Error::invalid_input("dns zone id is empty"));
    }

    errs.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DesiredRecord {
        DesiredRecord::new("example.com", "A", ["1.2.3.4"], 120)
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate_input(Some(&record()), &ZoneDescriptor::new("zone-1")).is_ok());
    }

    #[test]
    fn test_missing_record() {
        let errs = validate_input(None, &ZoneDescriptor::new("zone-1")).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs.to_string().contains("nil"));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let empty = DesiredRecord::new("", "", Vec::<String>::new(), 0);

        let errs = validate_input(Some(&empty), &ZoneDescriptor::new("")).unwrap_err();

        assert_eq!(errs.len(), 4);
        assert!(errs.iter().all(|e| matches!(e, Error::InvalidInput(_))));
        let text = errs.to_string();
        assert!(text.contains("name is empty"));
        assert!(text.contains("type is empty"));
        assert!(text.contains("content is empty"));
        assert!(text.contains("zone id is empty"));
    }

    #[test]
    fn test_missing_record_and_zone() {
        let errs = validate_input(None, &ZoneDescriptor::new("")).unwrap_err();
        assert_eq!(errs.len(), 2);
    }
}

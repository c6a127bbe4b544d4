//! Integration tests for the report parser
//!
//! These tests cover the full parse path against realistic AIDE reports:
//! - Structural validation gating (markers, banner)
//! - Section assignment and ordering of change entries
//! - Summary counter extraction
//! - Truncation of long paths
//! - Empty reports and edge variants

use aidelog_parser::{ParseError, ReportParser};

/// Helper to build a report from body lines, wrapped in valid markers and
/// the differences banner.
fn make_report(body: &[&str]) -> String {
    let mut lines = vec![
        "Start timestamp: 2024-01-01 00:00:00 +0000 (AIDE 0.18.6)".to_string(),
        "AIDE found differences between database and filesystem!!".to_string(),
    ];
    lines.extend(body.iter().map(|l| l.to_string()));
    lines.push("End timestamp: 2024-01-01 00:00:12 +0000 (run time: 0m 12s)".to_string());
    lines.join("\n")
}

mod structural_tests {
    use super::*;

    #[test]
    fn test_empty_input_fails() {
        let err = ReportParser::new().parse("").unwrap_err();
        assert_eq!(err, ParseError::EmptyReport);
    }

    #[test]
    fn test_missing_start_marker_fails() {
        let report = "AIDE found differences between database and filesystem!!\n\
                      End timestamp: 2024-01-01 00:00:01";
        let err = ReportParser::new().parse(report).unwrap_err();
        assert_eq!(err, ParseError::MissingStartMarker);
    }

    #[test]
    fn test_missing_end_marker_fails() {
        let report = "Start timestamp: 2024-01-01 00:00:00\n\
                      AIDE found differences between database and filesystem!!\n\
                      Added entries:";
        let err = ReportParser::new().parse(report).unwrap_err();
        assert_eq!(err, ParseError::MissingEndMarker);
    }

    #[test]
    fn test_unrecognized_banner_fails() {
        let report = "Start timestamp: 2024-01-01 00:00:00\n\
                      something unexpected\n\
                      End timestamp: 2024-01-01 00:00:01";
        let err = ReportParser::new().parse(report).unwrap_err();
        assert_eq!(err, ParseError::UnrecognizedBanner);
    }

    #[test]
    fn test_version_banner_is_accepted() {
        let report = "Start timestamp: 2024-01-01 00:00:00\n\
                      AIDE, version 0.18.6\n\
                      End timestamp: 2024-01-01 00:00:01";
        let record = ReportParser::new().parse(report).unwrap();
        assert!(record.added_entries.is_empty());
        assert!(record.removed_entries.is_empty());
        assert!(record.changed_entries.is_empty());
    }

    #[test]
    fn test_failure_yields_no_partial_record() {
        // Entries are present but the end marker is missing; the parser
        // must fail outright rather than return what it saw.
        let report = "Start timestamp: 2024-01-01 00:00:00\n\
                      AIDE found differences between database and filesystem!!\n\
                      Added entries:\n\
                      f++++++++++++++: /etc/passwd";
        assert!(ReportParser::new().parse(report).is_err());
    }
}

mod section_tests {
    use super::*;

    #[test]
    fn test_single_added_entry() {
        let report = make_report(&["Added entries:", "f++++++++++++++: /etc/passwd"]);
        let record = ReportParser::new().parse(&report).unwrap();

        assert_eq!(record.added_entries, vec!["/etc/passwd"]);
        assert!(record.removed_entries.is_empty());
        assert!(record.changed_entries.is_empty());
    }

    #[test]
    fn test_entries_assigned_by_active_section_only() {
        let report = make_report(&[
            "Added entries:",
            "f++++++++++++++: /etc/new.conf",
            "Removed entries:",
            "f--------------: /etc/old.conf",
            "Changed entries:",
            "f   ...    .C..: /etc/shadow",
            "d = ...     . ..: /var/spool/cron",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();

        assert_eq!(record.added_entries, vec!["/etc/new.conf"]);
        assert_eq!(record.removed_entries, vec!["/etc/old.conf"]);
        assert_eq!(
            record.changed_entries,
            vec!["/etc/shadow", "/var/spool/cron"]
        );

        // Section exclusivity: every path lives in exactly one sequence.
        for path in &record.added_entries {
            assert!(!record.removed_entries.contains(path));
            assert!(!record.changed_entries.contains(path));
        }
    }

    #[test]
    fn test_order_within_section_is_preserved() {
        let report = make_report(&[
            "Changed entries:",
            "f   ...    .C..: /etc/a",
            "f   ...    .C..: /etc/b",
            "f   ...    .C..: /etc/c",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.changed_entries, vec!["/etc/a", "/etc/b", "/etc/c"]);
    }

    #[test]
    fn test_entries_before_any_section_are_dropped() {
        let report = make_report(&[
            "f++++++++++++++: /etc/orphan",
            "Added entries:",
            "f++++++++++++++: /etc/kept",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.added_entries, vec!["/etc/kept"]);
        assert_eq!(record.entry_count(), 1);
    }

    #[test]
    fn test_empty_sections_are_valid() {
        let report = make_report(&["Added entries:", "Removed entries:", "Changed entries:"]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.entry_count(), 0);
    }
}

mod summary_tests {
    use super::*;

    #[test]
    fn test_total_entries_recorded_regardless_of_section() {
        let report = make_report(&[
            "Added entries:",
            "f++++++++++++++: /etc/passwd",
            "Total number of entries:\t42",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.total_entries, Some(42));
        // The summary line must not have become a path entry.
        assert_eq!(record.added_entries, vec!["/etc/passwd"]);
    }

    #[test]
    fn test_all_four_counters() {
        let report = make_report(&[
            "Summary:",
            "  Total number of entries:\t7154",
            "  Added entries:\t\t1",
            "  Removed entries:\t\t2",
            "  Changed entries:\t\t3",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.total_entries, Some(7154));
        assert_eq!(record.added_summary, Some(1));
        assert_eq!(record.removed_summary, Some(2));
        assert_eq!(record.changed_summary, Some(3));
    }

    #[test]
    fn test_summary_line_does_not_change_section() {
        // A counter carrying the "Removed entries" label appears while the
        // added section is active; the following entry must still land in
        // added_entries.
        let report = make_report(&[
            "Added entries:",
            "Removed entries:  5",
            "f++++++++++++++: /etc/passwd",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.removed_summary, Some(5));
        assert_eq!(record.added_entries, vec!["/etc/passwd"]);
        assert!(record.removed_entries.is_empty());
    }

    #[test]
    fn test_absent_counters_stay_none() {
        let report = make_report(&["Added entries:", "f++++++++++++++: /etc/passwd"]);
        let record = ReportParser::new().parse(&report).unwrap();
        assert_eq!(record.total_entries, None);
        assert_eq!(record.added_summary, None);
    }
}

mod truncation_tests {
    use super::*;

    #[test]
    fn test_long_path_truncated_to_exact_limit() {
        let long_path = format!("/var/lib/{}", "x".repeat(121));
        assert_eq!(long_path.len(), 130);

        let entry_line = format!("f++++++++++++++: {long_path}");
        let report = make_report(&["Added entries:", &entry_line]);
        let record = ReportParser::new().parse(&report).unwrap();

        let published = &record.added_entries[0];
        assert_eq!(published.chars().count(), 100);
        assert!(published.ends_with("..."));
    }

    #[test]
    fn test_custom_limit() {
        let report = make_report(&["Added entries:", "f++++++++++++++: /etc/verylongname"]);
        let record = ReportParser::with_max_entry_length(10)
            .parse(&report)
            .unwrap();
        assert_eq!(record.added_entries, vec!["/etc/ve..."]);
    }

    #[test]
    fn test_undersized_limit_still_bounded() {
        // Limits below the marker size are clamped rather than producing
        // strings longer than the configured maximum.
        let report = make_report(&["Added entries:", "f++++++++++++++: /etc/passwd"]);
        let record = ReportParser::with_max_entry_length(1)
            .parse(&report)
            .unwrap();
        assert_eq!(record.added_entries, vec!["/..."]);
    }
}

mod record_tests {
    use super::*;

    #[test]
    fn test_timestamp_is_capture_time_not_report_time() {
        let report = make_report(&[]);
        let record = ReportParser::new().parse(&report).unwrap();

        // The report claims 2024; the capture timestamp is from the wall
        // clock of the parse run.
        assert!(!record.timestamp.starts_with("2024-01-01"));
        assert_eq!(record.timestamp.len(), 23);
    }

    #[test]
    fn test_wire_form_matches_ingestor_contract() {
        let report = make_report(&[
            "Added entries:",
            "f++++++++++++++: /etc/passwd",
            "Total number of entries:\t42",
        ]);
        let record = ReportParser::new().parse(&report).unwrap();
        let json = record.to_json_line().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error_severity"], "LOG");
        assert_eq!(value["application_name"], "AIDE");
        assert_eq!(value["backend_type"], "log_analyzer");
        assert_eq!(value["message"], "AIDE Log Analysis");
        assert_eq!(value["added_entries"][0], "/etc/passwd");
        assert_eq!(value["total_entries"], 42);
        assert!(value.get("added_summary").is_none());
    }
}

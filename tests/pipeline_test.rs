use chartgrid::chart_data::{project, DISPLAY_CAP};
use chartgrid::classify::numeric_headers;
use chartgrid::export::{write_csv, EXPORT_FILE_NAME};
use chartgrid::ingest::{load_csv, load_csv_from_bytes, IngestError};
use chartgrid::pagination::{page_info, visible_pages, PageToken};
use chartgrid::statistics::column_stats;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

#[test]
fn test_three_rows_two_numeric_columns() {
    let dataset = load_csv_from_bytes("a,b\n1,2\n3,4\n5,6").unwrap();
    assert_eq!(dataset.headers, vec!["a", "b"]);
    assert_eq!(dataset.row_count(), 3);

    let numeric = numeric_headers(&dataset.rows, &dataset.headers);
    assert_eq!(numeric, vec!["a", "b"]);

    let records = project(&dataset.rows, &dataset.headers, &numeric, DISPLAY_CAP);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].index, 1);
    assert_eq!(records[0].name, "1");
    assert_eq!(records[0].value("a"), 1.0);
    assert_eq!(records[0].value("b"), 2.0);
}

#[test]
fn test_missing_numeric_value_projects_to_zero() {
    let dataset = load_csv_from_bytes("name,age\nBob,30\nAmy,").unwrap();
    let numeric = numeric_headers(&dataset.rows, &dataset.headers);
    assert_eq!(numeric, vec!["age"]);

    let records = project(&dataset.rows, &dataset.headers, &numeric, DISPLAY_CAP);
    assert_eq!(records[1].name, "Amy");
    assert_eq!(records[1].value("age"), 0.0);

    let stats = column_stats(&records, &numeric);
    assert_eq!(stats.len(), 1);
    let (header, age) = &stats[0];
    assert_eq!(header, "age");
    assert_eq!(age.count, 2);
    assert_eq!(age.min, 0.0);
    assert_eq!(age.max, 30.0);
    assert_eq!(age.avg, age.sum / age.count as f64);
}

#[test]
fn test_header_only_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "empty.csv", "name,age\n");
    let err = load_csv(&path).unwrap_err();
    assert!(matches!(err, IngestError::EmptyData), "got {err:?}");
    assert_eq!(err.to_string(), "The CSV file appears to be empty.");
}

#[test]
fn test_wrong_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "data.tsv", "a\n1\n");
    let err = load_csv(&path).unwrap_err();
    assert!(matches!(err, IngestError::Format(_)));
    assert_eq!(err.to_string(), "Please upload a CSV file.");

    // extension check ignores case
    let upper = write_fixture(&dir, "DATA.CSV", "a\n1\n");
    assert_eq!(load_csv(&upper).unwrap().row_count(), 1);
}

#[test]
fn test_projection_is_capped_and_finite() {
    let mut text = String::from("label,value,note\n");
    for i in 0..120 {
        text.push_str(&format!("row{i},{i}px,n/a\n"));
    }
    let dataset = load_csv_from_bytes(text).unwrap();
    assert_eq!(dataset.row_count(), 120);

    let numeric = numeric_headers(&dataset.rows, &dataset.headers);
    // "12px" is not numeric as a whole string, so the column is not classified
    assert!(numeric.is_empty());

    let numeric = vec!["value".to_string()];
    let records = project(&dataset.rows, &dataset.headers, &numeric, DISPLAY_CAP);
    assert_eq!(records.len(), DISPLAY_CAP);
    assert_eq!(records[12].value("value"), 12.0);
    assert!(records.iter().all(|r| r.value("value").is_finite()));
}

#[test]
fn test_stats_bounds_hold() {
    let dataset = load_csv_from_bytes("x,y\n-1.5,10\n4,abc\n2.25,\n").unwrap();
    let numeric = numeric_headers(&dataset.rows, &dataset.headers);
    assert_eq!(numeric, vec!["x", "y"]);

    let records = project(&dataset.rows, &dataset.headers, &numeric, DISPLAY_CAP);
    for (header, stats) in column_stats(&records, &numeric) {
        assert_eq!(stats.avg, stats.sum / stats.count as f64);
        for record in &records {
            let v = record.value(&header);
            assert!(stats.min <= v && v <= stats.max, "{header}: {v}");
        }
    }
}

#[test]
fn test_export_round_trip_through_loader() {
    let dir = TempDir::new().unwrap();
    let source = write_fixture(
        &dir,
        "people.csv",
        "name,quote\nAlice,\"she said \"\"hi\"\"\"\nBob,plain\n",
    );
    let dataset = load_csv(&source).unwrap();

    let out = TempDir::new().unwrap();
    let written = write_csv(&dataset, out.path()).unwrap().unwrap();
    assert_eq!(written, out.path().join(EXPORT_FILE_NAME));

    let reloaded = load_csv(&written).unwrap();
    assert_eq!(reloaded.headers, dataset.headers);
    assert_eq!(reloaded.rows, dataset.rows);
}

#[test]
fn test_page_window_for_95_items() {
    let info = page_info(5, 10, 95);
    assert_eq!(info.total_pages, 10);
    assert_eq!((info.start_item, info.end_item), (41, 50));

    use PageToken::{Ellipsis, Page};
    assert_eq!(
        visible_pages(info.current_page, info.total_pages),
        vec![
            Page(1),
            Ellipsis,
            Page(3),
            Page(4),
            Page(5),
            Page(6),
            Page(7),
            Ellipsis,
            Page(10)
        ]
    );
}

#[test]
fn test_row_count_matches_data_lines() {
    // (input, headers, data rows)
    let cases: [(&str, &[&str], usize); 6] = [
        ("a,b\n1,2\n3,4\n5,6", &["a", "b"], 3),
        ("a,b\n1,2\n\n3,4\n\n", &["a", "b"], 2),
        ("a\n1\n\n3\n", &["a"], 2),
        ("\na,b\n1,2\n", &["a", "b"], 1),
        ("a,b\r\n1,2\r\n\r\n3,4\r\n", &["a", "b"], 2),
        ("note,n\n\"x\n\ny\",1\n", &["note", "n"], 1),
    ];
    for (text, headers, rows) in cases {
        let dataset = load_csv_from_bytes(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
        assert_eq!(dataset.headers, headers, "{text:?}");
        assert_eq!(dataset.row_count(), rows, "{text:?}");
    }
}

#[test]
fn test_blank_lines_do_not_skew_stats() {
    let dataset = load_csv_from_bytes("name,score\nA,10\n\nB,20\n\n").unwrap();
    let numeric = numeric_headers(&dataset.rows, &dataset.headers);
    let records = project(&dataset.rows, &dataset.headers, &numeric, DISPLAY_CAP);
    assert!(records.iter().all(|r| !r.name.starts_with("Row ")));

    let stats = column_stats(&records, &numeric);
    let (_, score) = &stats[0];
    assert_eq!((score.min, score.max, score.count), (10.0, 20.0, 2));
    assert_eq!(score.avg, 15.0);
}

#[test]
fn test_malformed_structure_is_rejected() {
    let cases = [
        ("a,b\n1,2\n3\n", "expected 2 fields"),
        ("a,b\n1,2\n3,4,5\n", "expected 2 fields"),
        ("a,a\n1,2\n", "Duplicate column name: a"),
        ("a , a\n1,2\n", "Duplicate column name: a"),
    ];
    for (text, detail) in cases {
        match load_csv_from_bytes(text) {
            Err(IngestError::Parse(msg)) => assert!(msg.contains(detail), "{text:?}: {msg}"),
            other => panic!("{text:?}: expected a parse error, got {other:?}"),
        }
    }
}

use std::fs;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use kira_pseudotimeqc::io::tables::{read_curves, read_embedding, read_pseudotime};
use tempfile::TempDir;

#[test]
fn embedding_table_parses() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("embedding.tsv");
    fs::write(&path, "cell_id\tx\ty\n# comment\nc1\t0.5\t1\n\nc2\t-2\t3e-1\n").unwrap();
    let emb = read_embedding(&path).unwrap();
    assert_eq!(emb.cells(), &["c1".to_string(), "c2".to_string()]);
    assert_eq!(emb.coords(), &[[0.5, 1.0], [-2.0, 0.3]]);
}

#[test]
fn gzipped_embedding_is_read_transparently() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("embedding.tsv.gz");
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(b"cell_id\tx\ty\nc1\t1\t2\n").unwrap();
    fs::write(&path, enc.finish().unwrap()).unwrap();
    let emb = read_embedding(&path).unwrap();
    assert_eq!(emb.len(), 1);
}

#[test]
fn pseudotime_missing_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("pseudotime.tsv");
    fs::write(&path, "cell_id\tL1\tL2\nc1\t0.1\tNA\nc2\t\t2.5\nc3\tNaN\tnull\n").unwrap();
    let pt = read_pseudotime(&path).unwrap();
    assert_eq!(pt.lineages(), &["L1".to_string(), "L2".to_string()]);
    assert_eq!(pt.value(0, 0), Some(0.1));
    assert_eq!(pt.value(0, 1), None);
    assert_eq!(pt.value(1, 0), None);
    assert_eq!(pt.value(1, 1), Some(2.5));
    assert!(!pt.is_assigned_anywhere(2));
}

#[test]
fn curves_group_by_lineage_in_file_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("curves.tsv");
    fs::write(
        &path,
        "lineage\tx\ty\nB\t0\t0\nA\t0\t0\nB\t1\t0\nA\t0\t2\nA\t0\t5\n",
    )
    .unwrap();
    let curve = read_curves(&path).unwrap();
    let names: Vec<&str> = curve.lineages().iter().map(|l| l.lineage.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert_eq!(curve.get("A").unwrap().segments.len(), 2);
    assert_eq!(curve.get("A").unwrap().total_length(), 5.0);
}

#[test]
fn malformed_number_reports_line() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("embedding.tsv");
    fs::write(&path, "cell_id\tx\ty\nc1\tabc\t1\n").unwrap();
    let err = read_embedding(&path).unwrap_err();
    assert!(format!("{:#}", err).contains(":2:"));
}

#[test]
fn duplicate_cell_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("embedding.tsv");
    fs::write(&path, "cell_id\tx\ty\nc1\t0\t1\nc1\t2\t3\n").unwrap();
    assert!(read_embedding(&path).is_err());
}

use tri_catalog::{calc_primes, export_csv, export_json, export_records, CatalogOpts, Selector};

#[test]
fn csv_export_has_header_and_one_row_per_entry() {
    let mut catalog = CatalogOpts::in_memory().primes(true).open().expect("open");
    calc_primes(&mut catalog, 2).expect("generate");

    let mut out = Vec::new();
    let rows = export_csv(&catalog, &Selector::default(), "primes", &mut out).expect("export");
    assert_eq!(rows, 29);

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let header = reader.headers().expect("header").clone();
    assert_eq!(
        header.iter().collect::<Vec<_>>(),
        vec!["label", "index", "verts", "parts", "uid", "graph", "T1", "T2"]
    );
    let records: Vec<_> = reader.records().collect::<Result<_, _>>().expect("records");
    assert_eq!(records.len(), 29);
    assert_eq!(&records[0][0], "primes");
    assert_eq!(&records[0][1], "1");
    assert_eq!(&records[0][2], "1");
    assert_eq!(&records[28][2], "2");
    assert!(records.iter().all(|r| r[4].len() == 80));
}

#[test]
fn json_export_matches_records() {
    let mut catalog = CatalogOpts::in_memory().primes(true).open().expect("open");
    calc_primes(&mut catalog, 2).expect("generate");
    let selector = Selector::builder().verts(2, 2).primes(true).build();

    let records = export_records(&catalog, &selector, "level2").expect("records");
    let mut out = Vec::new();
    let rows = export_json(&catalog, &selector, "level2", &mut out).expect("export");
    assert_eq!(rows, records.len());

    let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
    let array = value.as_array().expect("array");
    assert_eq!(array.len(), records.len());
    assert_eq!(array[0]["uid"], records[0].uid.as_str());
    assert_eq!(array[0]["is_prime"], true);
    assert_eq!(array[0]["traces"].as_array().map(Vec::len), Some(2));
}

use std::process::Command;

use tempfile::tempdir;

fn tri(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_tri"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run tri");
    assert!(
        output.status.success(),
        "tri {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn traces_and_canon_print_invariants() {
    assert_eq!(tri(&["traces", "1-2"]), "[4,10]\n");
    assert_eq!(tri(&["traces", "1-2", "--count", "3"]), "[4,10,28]\n");

    let canon = tri(&["canon", "1-2-3-1"]);
    assert!(canon.contains("automorphisms: 6"), "{canon}");
    let uid_line = canon
        .lines()
        .find(|line| line.starts_with("uid: "))
        .expect("uid line");
    assert_eq!(uid_line.len(), "uid: ".len() + 80);
}

#[test]
fn enumerate_lists_distinct_graphs() {
    let pure = tri(&["enumerate", "--from", "1", "--to", "3"]);
    assert_eq!(pure.lines().count(), 8);

    let signed = tri(&["enumerate", "--to", "1", "--signs", "vertex"]);
    assert_eq!(signed.lines().count(), 4);
}

#[test]
fn build_select_and_digest_share_a_catalog_file() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("primes.db");
    let db = db.to_str().expect("utf8 path");

    let build = tri(&["build", "--to", "2", "--db", db]);
    assert_eq!(build.lines().count(), 2);

    let digest = tri(&["digest", "--db", db]);
    assert_eq!(digest.trim().len(), 64);

    let rows = tri(&[
        "select",
        "--db",
        db,
        "--min-verts",
        "2",
        "--max-verts",
        "2",
        "--unique",
    ]);
    assert_eq!(rows.lines().count(), 1 + 11);
    assert!(rows.starts_with("label,index,verts,parts,uid,graph,T1,T2"));

    let again = tri(&["build", "--to", "2", "--db", db]);
    assert!(again.lines().all(|line| line.ends_with("(present)")));
    assert_eq!(tri(&["digest", "--db", db]), digest);
}

#[test]
fn select_bounds_cover_every_census_field() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("primes.db");
    let db = db.to_str().expect("utf8 path");
    tri(&["build", "--to", "2", "--db", db]);

    let rows = |extra: &[&str]| {
        let mut args = vec!["select", "--db", db, "--max-verts", "1"];
        args.extend_from_slice(extra);
        tri(&args).lines().count() - 1
    };
    assert_eq!(rows(&[]), 4);
    assert_eq!(rows(&["--min-neg-loops", "3"]), 1);
    assert_eq!(rows(&["--min-pos-loops", "1", "--max-neg-loops", "1"]), 2);
    assert_eq!(rows(&["--min-pos-edges", "1"]), 0);
    assert_eq!(rows(&["--min-neg-edges", "2", "--max-neg-edges", "1"]), 0);
    assert_eq!(rows(&["--max-pos-edges", "0", "--bosons"]), 1);
}

//! Hot reload of a regenerated table while readers keep querying

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use symdex::{IndexHandle, TableFormat, TableSource};

fn table(prefix: &str, count: usize) -> String {
    let mut out = String::from("var searchData=\n[\n");
    for i in 0..count {
        out.push_str(&format!(
            "  ['{p}_5f{i}_{i}',['{p}_{i}',['../{p}.html#a{i}',1,'ns::{p}']]],\n",
            p = prefix,
            i = i
        ));
    }
    out.push_str("];\n");
    out
}

#[test]
fn readers_always_see_a_complete_table() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("all_0.js");
    fs::write(&path, table("alpha", 50)).unwrap();

    let handle = Arc::new(IndexHandle::open(TableSource::file(&path, TableFormat::Doxygen)).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = handle.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut observed = 0usize;
                loop {
                    let index = handle.current();
                    let alpha = index.lookup("alpha").len();
                    let beta = index.lookup("BETA").len();
                    // Either the old table or the new one, never a mix
                    assert!(
                        (alpha == 50 && beta == 0) || (alpha == 0 && beta == 80),
                        "alpha={} beta={}",
                        alpha,
                        beta
                    );
                    observed += 1;
                    if done.load(Ordering::Acquire) {
                        break;
                    }
                }
                observed
            })
        })
        .collect();

    for round in 0..10 {
        let next = if round % 2 == 0 { table("beta", 80) } else { table("alpha", 50) };
        fs::write(&path, next).unwrap();
        handle.reload().unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(handle.generation(), 11);
}

#[test]
fn failed_reload_keeps_serving_previous_table() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("all_0.js");
    fs::write(&path, table("alpha", 3)).unwrap();

    let handle = IndexHandle::open(TableSource::file(&path, TableFormat::Doxygen)).unwrap();

    fs::write(&path, "var searchData=[['x_0',['x',['#anchor-only',1,'']]]];").unwrap();
    assert!(handle.reload().unwrap_err().is_table_error());
    assert_eq!(handle.current().lookup("alpha").len(), 3);

    fs::remove_file(&path).unwrap();
    assert!(!handle.reload().unwrap_err().is_table_error());
    assert_eq!(handle.current().len(), 3);
    assert_eq!(handle.generation(), 1);
}

//! End-to-end tests over the library driver: the scenarios a user would
//! hit from the command line, run against real fixture trees.

use crate::DiskUsage;
use rand::{RngExt, SeedableRng, rngs::StdRng};
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("mdu_e2e_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(&root).unwrap();
    root
}

fn blocks_of(path: &Path) -> u64 {
    fs::symlink_metadata(path).unwrap().blocks()
}

/// Independent reimplementation of the accounting over `std::fs`, used as
/// the oracle: a directory counts twice (own inode plus its `.`
/// self-entry), everything else once.
fn expected_tree_blocks(path: &Path) -> u64 {
    let meta = fs::symlink_metadata(path).unwrap();
    if !meta.is_dir() {
        return meta.blocks();
    }
    let mut sum = meta.blocks() * 2;
    for entry in fs::read_dir(path).unwrap() {
        let child = entry.unwrap().path();
        let child_meta = fs::symlink_metadata(&child).unwrap();
        if child_meta.is_dir() {
            sum += expected_tree_blocks(&child);
        } else {
            sum += child_meta.blocks();
        }
    }
    sum
}

fn measure_with(threads: usize, root: &Path) -> u64 {
    DiskUsage::new(threads).measure(root)
}

#[test]
fn empty_directory_reports_its_blocks_twice() {
    let root = fixture("empty");
    let expected = blocks_of(&root) * 2;

    assert_eq!(measure_with(1, &root), expected);
    assert_eq!(measure_with(4, &root), expected);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn flat_directory_matches_the_oracle_at_any_thread_count() {
    let root = fixture("flat");
    fs::write(root.join("a"), b"a").unwrap();
    fs::write(root.join("b"), b"b").unwrap();
    fs::write(root.join("c"), b"c").unwrap();
    let expected = expected_tree_blocks(&root);

    assert_eq!(measure_with(1, &root), expected);
    assert_eq!(measure_with(8, &root), expected);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn nested_tree_sums_every_level() {
    let root = fixture("nested");
    let leaf = root.join("sub1").join("sub2");
    fs::create_dir_all(&leaf).unwrap();
    fs::write(leaf.join("file"), vec![0u8; 4096]).unwrap();
    let expected = expected_tree_blocks(&root);

    assert_eq!(measure_with(2, &root), expected);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn single_file_root_reports_its_own_blocks() {
    let root = fixture("file_root");
    let file = root.join("lonely.bin");
    fs::write(&file, vec![0u8; 2048]).unwrap();

    assert_eq!(measure_with(1, &file), blocks_of(&file));
    assert_eq!(measure_with(4, &file), blocks_of(&file));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_root_reports_zero() {
    let ghost = std::env::temp_dir().join(format!("mdu_e2e_ghost_{}", std::process::id()));
    let _ = fs::remove_dir_all(&ghost);

    assert_eq!(measure_with(1, &ghost), 0);
    assert_eq!(measure_with(2, &ghost), 0);
}

#[test]
fn multiple_roots_print_one_line_each_in_input_order() {
    let a = fixture("multi_a");
    let b = fixture("multi_b");
    let c = fixture("multi_c");
    fs::write(a.join("x"), b"x").unwrap();

    let du = DiskUsage::new(2);
    let roots = [a.clone(), b.clone(), c.clone()];
    let mut out = Vec::new();
    du.report(&roots, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    for (line, root) in lines.iter().zip(&roots) {
        let (count, path) = line.split_once('\t').expect("tab-separated line");
        assert!(count.bytes().all(|byte| byte.is_ascii_digit()));
        assert_eq!(Path::new(path), root.as_path());
    }

    for root in &roots {
        fs::remove_dir_all(root).unwrap();
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let root = fixture("stable");
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("file"), vec![0u8; 1024]).unwrap();

    let run = || {
        let du = DiskUsage::new(4);
        let mut out = Vec::new();
        du.report(&[root.clone()], &mut out).unwrap();
        out
    };
    assert_eq!(run(), run());

    fs::remove_dir_all(&root).unwrap();
}

fn build_random_tree(rng: &mut StdRng, dir: &Path, depth: u32) {
    for index in 0..rng.random_range(1..6usize) {
        let len = rng.random_range(0..8192usize);
        fs::write(dir.join(format!("f{index}")), vec![0u8; len]).unwrap();
    }
    if depth == 0 {
        return;
    }
    for index in 0..rng.random_range(0..4usize) {
        let sub = dir.join(format!("d{index}"));
        fs::create_dir(&sub).unwrap();
        build_random_tree(rng, &sub, depth - 1);
    }
}

#[test]
fn totals_are_schedule_independent_on_a_random_tree() {
    let root = fixture("random");
    let mut rng = StdRng::seed_from_u64(0x00D1_5C0B);
    build_random_tree(&mut rng, &root, 3);
    let expected = expected_tree_blocks(&root);

    for threads in [1, 2, 4, 16] {
        assert_eq!(measure_with(threads, &root), expected, "-j {threads}");
    }

    fs::remove_dir_all(&root).unwrap();
}

// The quiescence protocol earns its keep on wide trees: a thousand
// directory tasks per run, every worker both producing and consuming.
#[test]
fn stress_wide_tree_is_schedule_independent() {
    let root = fixture("stress");
    for dir_index in 0..1000 {
        let dir = root.join(format!("d{dir_index}"));
        fs::create_dir(&dir).unwrap();
        for file_index in 0..10 {
            fs::write(dir.join(format!("f{file_index}")), b"x").unwrap();
        }
    }
    let expected = expected_tree_blocks(&root);

    for threads in [1, 2, 4, 16] {
        assert_eq!(measure_with(threads, &root), expected, "-j {threads}");
    }

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unreadable_directory_still_counts_its_inode_and_flips_the_flag() {
    use std::os::unix::fs::PermissionsExt;

    // Root ignores permission bits; the opendir would succeed anyway.
    // SAFETY: geteuid cannot fail.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let root = fixture("locked");
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0)).unwrap();
    let expected = blocks_of(&root) * 2 + blocks_of(&locked);

    for threads in [1, 2] {
        let du = DiskUsage::new(threads);
        assert_eq!(du.measure(&root), expected, "-j {threads}");
        assert!(!du.permission_ok(), "-j {threads}");
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn permission_flag_spans_multiple_roots() {
    use std::os::unix::fs::PermissionsExt;

    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let clean = fixture("flag_clean");
    let dirty = fixture("flag_dirty");
    let locked = dirty.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0)).unwrap();

    let du = DiskUsage::new(2);
    let mut out = Vec::new();
    du.report(&[clean.clone(), dirty.clone()], &mut out).unwrap();
    assert!(!du.permission_ok());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    fs::remove_dir_all(&clean).unwrap();
    fs::remove_dir_all(&dirty).unwrap();
}

use warranty_scanner::util::{cpu_core_count, default_concurrency};

#[test]
fn core_count_nonzero() {
    assert!(cpu_core_count() >= 1);
}

#[test]
fn default_concurrency_is_bounded() {
    let jobs = default_concurrency();
    assert!(jobs >= 5);
    assert!(jobs <= 32);
}
